//! Raw drawing events as recorded by the drawing controls.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{SketchError, SketchResult};

/// Attribute map carried by an event (`d`, `x`, `stroke`, `value`, ...).
pub type Args = Map<String, Value>;

/// Presentation hints (font, CSS class, rotation). Opaque to the core.
pub type Layout = Map<String, Value>;

/// Identifier assigned by the renderer when a drawable element is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EventId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// The kind of action an event records.
///
/// The set is open: types the core has no special rules for are carried
/// through as [`EventType::Other`] and judged generically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    /// Freehand or polyline path; `args.d` holds the SVG path description.
    Path,
    /// Text label; `args.value` holds the content.
    Text,
    /// Ellipse shape.
    Ellipse,
    /// Rectangle shape.
    Rect,
    /// Style change applied to subsequent shapes.
    Style,
    /// Logical deletion of a previously drawn shape.
    Delete,
    /// Move of a previously drawn shape.
    Move,
    /// Any other renderer-defined type.
    Other(String),
}

impl EventType {
    /// The wire name of this type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Path => "path",
            Self::Text => "text",
            Self::Ellipse => "ellipse",
            Self::Rect => "rect",
            Self::Style => "style",
            Self::Delete => "delete",
            Self::Move => "move",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for EventType {
    fn from(name: &str) -> Self {
        match name {
            "path" => Self::Path,
            "text" => Self::Text,
            "ellipse" => Self::Ellipse,
            "rect" => Self::Rect,
            "style" => Self::Style,
            "delete" => Self::Delete,
            "move" => Self::Move,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for EventType {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<EventType> for String {
    fn from(kind: EventType) -> Self {
        match kind {
            EventType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded user drawing or styling action.
///
/// Amendments to an existing shape are new events whose `target_id` points
/// at the original's `id`; the log is history, never a mutable table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// What the event does.
    #[serde(rename = "type")]
    pub kind: EventType,
    /// Renderer-assigned id of the element this event created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EventId>,
    /// Attributes of the action.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub args: Args,
    /// Optional presentation hints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    /// Id of the earlier event this one amends or deletes.
    #[serde(
        default,
        rename = "targetId",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_id: Option<EventId>,
}

impl Event {
    /// Create an event with the given type and args.
    #[must_use]
    pub fn new(kind: impl Into<EventType>, args: Args) -> Self {
        Self {
            kind: kind.into(),
            id: None,
            args,
            layout: None,
            target_id: None,
        }
    }

    /// Create a `delete` event targeting the given element.
    #[must_use]
    pub fn delete(target: impl Into<EventId>) -> Self {
        Self::new(EventType::Delete, Args::new()).targeting(target)
    }

    /// Set the element id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<EventId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the layout hints.
    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Link this event to an earlier one.
    #[must_use]
    pub fn targeting(mut self, target: impl Into<EventId>) -> Self {
        self.target_id = Some(target.into());
        self
    }

    /// Decode a single event from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::Serialization`] for malformed JSON and
    /// [`SketchError::InvalidEvent`] when the event has an empty type.
    pub fn from_json(json: &str) -> SketchResult<Self> {
        let event: Self = serde_json::from_str(json)?;
        if event.kind.as_str().is_empty() {
            return Err(SketchError::InvalidEvent("empty event type".to_string()));
        }
        Ok(event)
    }
}

/// Read a missing or `null` attribute map as empty.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<Args, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Args>::deserialize(deserializer)?.unwrap_or_default())
}
