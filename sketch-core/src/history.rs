//! Undo/redo over an [`EventLog`].

use crate::document::Document;
use crate::event::Event;
use crate::stream::EventLog;

/// An event log paired with the stack of undone events.
///
/// Undo pops the log onto the redo stack; redo pushes it back. Recording a
/// new event discards anything left to redo.
#[derive(Debug, Clone, Default)]
pub struct History {
    log: EventLog,
    undone: Vec<Event>,
}

impl History {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing log.
    #[must_use]
    pub fn with_log(log: EventLog) -> Self {
        Self {
            log,
            undone: Vec::new(),
        }
    }

    /// Record a new event, returning the log length.
    pub fn record(&mut self, event: Event) -> usize {
        self.undone.clear();
        self.log.push(event)
    }

    /// Undo the most recent event. Returns `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<&Event> {
        let event = self.log.pop()?;
        tracing::debug!(kind = %event.kind, "undo");
        self.undone.push(event);
        self.undone.last()
    }

    /// Redo the most recently undone event. Returns `None` when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> Option<&Event> {
        let event = self.undone.pop()?;
        tracing::debug!(kind = %event.kind, "redo");
        self.log.push(event);
        self.log.events().last()
    }

    /// Whether [`History::undo`] would do anything.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.log.is_empty()
    }

    /// Whether [`History::redo`] would do anything.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Replace the history with loaded events, dropping the redo stack.
    pub fn load(&mut self, events: Vec<Event>) {
        self.undone.clear();
        self.log.replace(events);
    }

    /// The underlying log.
    #[must_use]
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Normalized document for the current state.
    #[must_use]
    pub fn document(&self) -> Document {
        self.log.normalize()
    }
}
