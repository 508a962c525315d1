//! # Event stream normalization
//!
//! Reduces raw drawing history to the minimal document that reproduces the
//! current visual state.
//!
//! ## Passes
//!
//! ```text
//! 1. Canonicalize: copy args, rewrite colour keys into rgba(...) form
//! 2. Link: merge each targeting event into the event it points at;
//!    a `delete` suppresses its target as well
//! 3. Reduce: drop suppressed and contentless events, collapse runs of
//!    adjacent `style` events to the last one
//! ```
//!
//! The input log is never mutated; every pass works on fresh copies.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color;
use crate::document::{Document, NormalizedEvent};
use crate::event::{Args, Event, EventId, EventType, Layout};

/// Normalizer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Arg keys whose values are rewritten into canonical colour form.
    pub color_keys: Vec<String>,
    /// Whether adjacent `style` events collapse to the last one.
    pub collapse_styles: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            color_keys: vec!["stroke".to_string(), "fill".to_string()],
            collapse_styles: true,
        }
    }
}

/// Pure `events -> document` reduction.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

/// Working copy of an event during a normalization pass.
#[derive(Debug)]
struct Staged {
    kind: EventType,
    id: Option<EventId>,
    args: Args,
    layout: Option<Layout>,
    target_id: Option<EventId>,
    suppressed: bool,
}

/// Fold state for the reduce pass.
#[derive(Debug, Default)]
struct Accumulator {
    accepted: Vec<NormalizedEvent>,
    last_type: Option<EventType>,
}

impl Normalizer {
    /// Create a normalizer with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a normalizer with a custom configuration.
    #[must_use]
    pub fn with_config(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize a sequence of raw events into a document.
    #[must_use]
    pub fn normalize(&self, events: &[Event]) -> Document {
        let mut staged: Vec<Staged> = events.iter().map(|e| self.canonicalize(e)).collect();
        link(&mut staged);

        let acc = staged
            .into_iter()
            .fold(Accumulator::default(), |acc, event| self.accept(acc, event));
        Document::new(acc.accepted)
    }

    /// Whether an event carries drawable content on its own.
    ///
    /// This ignores linking: a valid event may still be suppressed by a
    /// later `delete`.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn is_valid(&self, event: &Event) -> bool {
        has_content(&event.kind, &event.args, event.layout.as_ref())
    }

    fn canonicalize(&self, event: &Event) -> Staged {
        let mut args = event.args.clone();
        for key in &self.config.color_keys {
            if let Some(value) = args.get_mut(key) {
                if is_truthy(value) {
                    *value = color::canonicalize(value);
                }
            }
        }
        Staged {
            kind: event.kind.clone(),
            id: event.id,
            args,
            layout: event.layout.clone(),
            target_id: event.target_id,
            suppressed: false,
        }
    }

    fn accept(&self, mut acc: Accumulator, event: Staged) -> Accumulator {
        if event.suppressed {
            tracing::debug!(kind = %event.kind, id = ?event.id, "dropping suppressed event");
            return acc;
        }
        if !has_content(&event.kind, &event.args, event.layout.as_ref()) {
            tracing::debug!(kind = %event.kind, id = ?event.id, "dropping event without content");
            return acc;
        }

        if self.config.collapse_styles
            && event.kind == EventType::Style
            && acc.last_type == Some(EventType::Style)
        {
            acc.accepted.pop();
        }

        tracing::trace!(kind = %event.kind, "accepted event");
        acc.last_type = Some(event.kind.clone());
        acc.accepted.push(NormalizedEvent {
            kind: event.kind,
            args: event.args,
            layout: event.layout,
        });
        acc
    }
}

/// Merge every targeting event into its target.
///
/// Targets are found by id, first occurrence wins. When the target was
/// itself merged into another event, the merge follows through to that
/// event so chains of amendments land on the original shape.
fn link(staged: &mut [Staged]) {
    let mut index: HashMap<EventId, usize> = HashMap::new();
    for (i, event) in staged.iter().enumerate() {
        if let Some(id) = event.id {
            if index.contains_key(&id) {
                tracing::warn!(%id, "duplicate event id, keeping first occurrence");
            } else {
                index.insert(id, i);
            }
        }
    }

    let mut merged_into: Vec<Option<usize>> = vec![None; staged.len()];
    for i in 0..staged.len() {
        let Some(target_id) = staged[i].target_id else {
            continue;
        };
        let Some(&found) = index.get(&target_id) else {
            tracing::debug!(%target_id, "dangling target reference");
            continue;
        };

        let mut root = found;
        while let Some(next) = merged_into[root] {
            root = next;
        }
        if root == i {
            tracing::debug!(%target_id, "self-referencing link");
            if staged[i].kind == EventType::Delete {
                staged[i].suppressed = true;
            }
            continue;
        }

        let amendment = staged[i].args.clone();
        staged[i].suppressed = true;
        staged[root].args.extend(amendment);
        if staged[i].kind == EventType::Delete {
            staged[root].suppressed = true;
        }
        merged_into[i] = Some(root);
    }
}

/// Content check applied to every unsuppressed event.
fn has_content(kind: &EventType, args: &Args, layout: Option<&Layout>) -> bool {
    match kind {
        EventType::Text => args.get("value").is_some_and(is_truthy),
        EventType::Path => args
            .get("d")
            .and_then(Value::as_str)
            .is_some_and(has_line_or_arc),
        _ => args.len() + layout.map_or(0, Layout::len) > 0,
    }
}

/// Whether an SVG path description contains a line or arc command.
fn has_line_or_arc(d: &str) -> bool {
    d.chars().any(|c| matches!(c, 'a' | 'A' | 'l' | 'L'))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: serde_json::Value) -> Args {
        match value {
            Value::Object(map) => map,
            _ => Args::new(),
        }
    }

    fn path(id: u64, d: &str) -> Event {
        Event::new(EventType::Path, args(json!({ "d": d }))).with_id(id)
    }

    fn style(stroke: &str) -> Event {
        Event::new(EventType::Style, args(json!({ "stroke": stroke })))
    }

    fn normalize(events: &[Event]) -> serde_json::Value {
        serde_json::to_value(Normalizer::new().normalize(events)).expect("serializes")
    }

    #[test]
    fn test_end_to_end_path_and_styles() {
        let events = vec![path(1, "M0,0 L10,10"), style("red"), style("blue")];
        assert_eq!(
            normalize(&events),
            json!([
                {"type": "path", "args": {"d": "M0,0 L10,10"}},
                {"type": "style", "args": {"stroke": "rgba(0,0,255,1)"}}
            ])
        );
    }

    #[test]
    fn test_delete_cascades_to_target() {
        let events = vec![path(1, "M0,0 L10,10"), Event::delete(1u64)];
        assert_eq!(normalize(&events), json!([]));
    }

    #[test]
    fn test_amendment_merges_into_target() {
        let events = vec![
            Event::new(EventType::Rect, args(json!({"x": 1, "y": 2, "width": 5}))).with_id(3u64),
            Event::new(EventType::Move, args(json!({"x": 10}))).targeting(3u64),
        ];
        assert_eq!(
            normalize(&events),
            json!([{"type": "rect", "args": {"x": 10, "y": 2, "width": 5}}])
        );
    }

    #[test]
    fn test_multiple_amendments_apply_in_order() {
        let events = vec![
            path(1, "M0,0 L1,1"),
            Event::new(EventType::Move, args(json!({"transform": "a"}))).targeting(1u64),
            Event::new(EventType::Move, args(json!({"transform": "b"}))).targeting(1u64),
        ];
        assert_eq!(
            normalize(&events),
            json!([{"type": "path", "args": {"d": "M0,0 L1,1", "transform": "b"}}])
        );
    }

    #[test]
    fn test_chained_links_reach_original() {
        let events = vec![
            path(1, "M0,0 L1,1"),
            Event::new(EventType::Move, args(json!({"x": 1})))
                .with_id(2u64)
                .targeting(1u64),
            Event::new(EventType::Move, args(json!({"y": 2}))).targeting(2u64),
        ];
        assert_eq!(
            normalize(&events),
            json!([{"type": "path", "args": {"d": "M0,0 L1,1", "x": 1, "y": 2}}])
        );
    }

    #[test]
    fn test_delete_through_chain_removes_original() {
        let events = vec![
            path(1, "M0,0 L1,1"),
            Event::new(EventType::Move, args(json!({"x": 1})))
                .with_id(2u64)
                .targeting(1u64),
            Event::delete(2u64),
        ];
        assert_eq!(normalize(&events), json!([]));
    }

    #[test]
    fn test_deletion_is_sticky() {
        let events = vec![
            path(1, "M0,0 L1,1"),
            Event::delete(1u64),
            Event::new(EventType::Move, args(json!({"x": 5}))).targeting(1u64),
        ];
        assert_eq!(normalize(&events), json!([]));
    }

    #[test]
    fn test_dangling_target_judged_on_its_own() {
        let events = vec![Event::new(EventType::Move, args(json!({"x": 5}))).targeting(99u64)];
        assert_eq!(normalize(&events), json!([{"type": "move", "args": {"x": 5}}]));

        let events = vec![Event::delete(99u64)];
        assert_eq!(normalize(&events), json!([]));
    }

    #[test]
    fn test_duplicate_ids_first_match_wins() {
        let events = vec![
            path(1, "M0,0 L1,1"),
            path(1, "M5,5 L6,6"),
            Event::delete(1u64),
        ];
        assert_eq!(
            normalize(&events),
            json!([{"type": "path", "args": {"d": "M5,5 L6,6"}}])
        );
    }

    #[test]
    fn test_self_link_is_ignored() {
        let events = vec![path(1, "M0,0 L1,1").targeting(1u64)];
        assert_eq!(
            normalize(&events),
            json!([{"type": "path", "args": {"d": "M0,0 L1,1"}}])
        );
    }

    #[test]
    fn test_self_targeting_delete_is_dropped() {
        let events = vec![Event::new(EventType::Delete, args(json!({"x": 1})))
            .with_id(3u64)
            .targeting(3u64)];
        assert_eq!(normalize(&events), json!([]));
    }

    #[test]
    fn test_invalid_text_dropped() {
        let events = vec![
            Event::new(EventType::Text, Args::new()),
            Event::new(EventType::Text, args(json!({"value": ""}))),
        ];
        assert_eq!(normalize(&events), json!([]));
    }

    #[test]
    fn test_valid_text_kept_with_layout() {
        let layout = args(json!({"font": {"name": "Heading"}}));
        let events =
            vec![Event::new(EventType::Text, args(json!({"value": "maison"}))).with_layout(layout)];
        assert_eq!(
            normalize(&events),
            json!([{
                "type": "text",
                "args": {"value": "maison"},
                "layout": {"font": {"name": "Heading"}}
            }])
        );
    }

    #[test]
    fn test_path_requires_line_or_arc() {
        assert_eq!(normalize(&[path(1, "M0,0")]), json!([]));
        assert_eq!(normalize(&[path(1, "M0,0 a1,1 0 0 1 2,2")]).as_array().map(Vec::len), Some(1));
        assert_eq!(normalize(&[path(1, "M0,0 L1,1")]).as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_path_without_d_dropped() {
        let events = vec![Event::new(EventType::Path, Args::new())];
        assert_eq!(normalize(&events), json!([]));
    }

    #[test]
    fn test_contentless_generic_events_dropped() {
        let events = vec![
            Event::new(EventType::Ellipse, Args::new()),
            Event::new(EventType::Other("arrow".to_string()), Args::new())
                .with_layout(args(json!({"class": "thick"}))),
        ];
        assert_eq!(
            normalize(&events),
            json!([{"type": "arrow", "args": {}, "layout": {"class": "thick"}}])
        );
    }

    #[test]
    fn test_style_run_collapses_to_last() {
        let events: Vec<Event> = ["red", "green", "#00f", "black"]
            .iter()
            .map(|c| style(c))
            .collect();
        assert_eq!(
            normalize(&events),
            json!([{"type": "style", "args": {"stroke": "rgba(0,0,0,1)"}}])
        );
    }

    #[test]
    fn test_styles_separated_by_shape_survive() {
        let events = vec![style("red"), path(1, "M0,0 L1,1"), style("blue")];
        let doc = normalize(&events);
        assert_eq!(doc.as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_style_collapse_skips_dropped_events() {
        let events = vec![style("red"), path(1, "M0,0"), style("blue")];
        assert_eq!(
            normalize(&events),
            json!([{"type": "style", "args": {"stroke": "rgba(0,0,255,1)"}}])
        );
    }

    #[test]
    fn test_collapse_can_be_disabled() {
        let normalizer = Normalizer::with_config(NormalizerConfig {
            collapse_styles: false,
            ..NormalizerConfig::default()
        });
        let doc = normalizer.normalize(&[style("red"), style("blue")]);
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_equivalent_colors_canonicalize_equal() {
        let a = normalize(&[style("#0000ff")]);
        let b = normalize(&[style("rgb(0, 0, 255)")]);
        let c = normalize(&[style("blue")]);
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_fill_canonicalized_and_other_keys_untouched() {
        let events = vec![Event::new(
            EventType::Style,
            args(json!({"fill": "white", "stroke-width": "red"})),
        )];
        assert_eq!(
            normalize(&events),
            json!([{"type": "style", "args": {"fill": "rgba(255,255,255,1)", "stroke-width": "red"}}])
        );
    }

    #[test]
    fn test_source_events_not_mutated() {
        let events = vec![
            style("red"),
            path(1, "M0,0 L1,1"),
            Event::new(EventType::Move, args(json!({"x": 3}))).targeting(1u64),
        ];
        let before = events.clone();
        let _ = Normalizer::new().normalize(&events);
        assert_eq!(events, before);
    }

    #[test]
    fn test_is_valid_ignores_links() {
        let normalizer = Normalizer::new();
        assert!(normalizer.is_valid(&path(1, "M0,0 L1,1")));
        assert!(!normalizer.is_valid(&path(1, "M0,0")));
        assert!(!normalizer.is_valid(&Event::delete(1u64)));
        assert!(normalizer.is_valid(&Event::new(EventType::Text, args(json!({"value": 4})))));
        assert!(!normalizer.is_valid(&Event::new(EventType::Text, args(json!({"value": 0})))));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: NormalizerConfig =
            serde_json::from_str(r#"{"collapse_styles": false}"#).expect("valid config");
        assert!(!config.collapse_styles);
        assert_eq!(config.color_keys, vec!["stroke", "fill"]);
    }
}
