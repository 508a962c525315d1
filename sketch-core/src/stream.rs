//! # Event Log
//!
//! Append/pop history of raw drawing events.
//!
//! ## Usage
//!
//! ```text
//! 1. Drawing controls push events as the user draws
//! 2. Undo pops the most recent event
//! 3. Persistence, copy and debugging ask for the normalized document
//! ```
//!
//! The log never edits an event in place. Changes to a shape are new events
//! whose `target_id` points at it.

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::SketchResult;
use crate::event::{Event, EventType};
use crate::normalize::Normalizer;

/// Ordered, append-only history of drawing events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log from existing history.
    #[must_use]
    pub fn from_events(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Append an event, returning the new length.
    pub fn push(&mut self, event: Event) -> usize {
        self.events.push(event);
        self.events.len()
    }

    /// Remove and return the most recent event, or `None` if empty.
    pub fn pop(&mut self) -> Option<Event> {
        self.events.pop()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Iterate over recorded events, oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// Swap the whole history for another one, returning the previous one.
    pub fn replace(&mut self, events: Vec<Event>) -> Vec<Event> {
        std::mem::replace(&mut self.events, events)
    }

    /// Drop all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Normalize the log with the default normalizer.
    #[must_use]
    pub fn normalize(&self) -> Document {
        self.normalize_with(&Normalizer::new())
    }

    /// Normalize the log with the given normalizer.
    #[must_use]
    pub fn normalize_with(&self, normalizer: &Normalizer) -> Document {
        normalizer.normalize(&self.events)
    }

    /// The stroke colour in effect after replaying the log: the `stroke` of
    /// the last `style` event that sets one.
    #[must_use]
    pub fn active_stroke(&self) -> Option<&str> {
        self.events
            .iter()
            .rev()
            .filter(|e| e.kind == EventType::Style)
            .find_map(|e| {
                e.args
                    .get("stroke")
                    .and_then(serde_json::Value::as_str)
                    .filter(|s| !s.is_empty())
            })
    }

    /// Render the raw history and its normalized document as indented JSON,
    /// and emit it at `debug` level.
    ///
    /// Raw events are shown without ids or links so the dump reads like the
    /// user's actions.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn debug_dump(&self) -> SketchResult<String> {
        let raw: Vec<serde_json::Value> = self
            .events
            .iter()
            .map(|e| {
                let mut entry = serde_json::Map::new();
                entry.insert("type".to_string(), e.kind.as_str().into());
                entry.insert("args".to_string(), e.args.clone().into());
                if let Some(layout) = &e.layout {
                    entry.insert("layout".to_string(), layout.clone().into());
                }
                serde_json::Value::Object(entry)
            })
            .collect();

        let dump = format!(
            "{}\nnormalized\n{}",
            serde_json::to_string_pretty(&raw)?,
            self.normalize().to_json_pretty()?
        );
        tracing::debug!(events = self.events.len(), "{dump}");
        Ok(dump)
    }

    /// Serialize the raw history for persistence.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> SketchResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore raw history from persisted JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> SketchResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Extend<Event> for EventLog {
    fn extend<T: IntoIterator<Item = Event>>(&mut self, iter: T) {
        self.events.extend(iter);
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
