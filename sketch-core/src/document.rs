//! Canonical serialized representation of a drawing, used for persistence,
//! clipboard copy and change notification.

use serde::{Deserialize, Serialize};

use crate::error::SketchResult;
use crate::event::{Args, Event, EventType, Layout};

/// One entry of a normalized document.
///
/// Carries no id and no link: entries describe final state, not history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEvent {
    /// Event type.
    #[serde(rename = "type")]
    pub kind: EventType,
    /// Merged, colour-canonicalized args.
    #[serde(default, deserialize_with = "crate::event::null_as_empty")]
    pub args: Args,
    /// Layout hints, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
}

impl From<NormalizedEvent> for Event {
    fn from(entry: NormalizedEvent) -> Self {
        let event = Event::new(entry.kind, entry.args);
        match entry.layout {
            Some(layout) => event.with_layout(layout),
            None => event,
        }
    }
}

/// Ordered sequence of normalized events.
///
/// Serializes as a bare JSON array of `{type, args, layout}` objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Vec<NormalizedEvent>);

impl Document {
    /// Wrap a list of normalized events.
    #[must_use]
    pub fn new(events: Vec<NormalizedEvent>) -> Self {
        Self(events)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the document has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedEvent> {
        self.0.iter()
    }

    /// Entries as a slice.
    #[must_use]
    pub fn events(&self) -> &[NormalizedEvent] {
        &self.0
    }

    /// Re-expand the document into raw events that can be pushed onto a
    /// fresh log. The events carry no ids; the renderer assigns new ones
    /// when it draws them.
    #[must_use]
    pub fn into_events(self) -> Vec<Event> {
        self.0.into_iter().map(Event::from).collect()
    }

    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> SketchResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON, as used by debug dumps.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> SketchResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a document from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not an array of document entries.
    pub fn from_json(json: &str) -> SketchResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl IntoIterator for Document {
    type Item = NormalizedEvent;
    type IntoIter = std::vec::IntoIter<NormalizedEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a NormalizedEvent;
    type IntoIter = std::slice::Iter<'a, NormalizedEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
