//! # Saorsa Sketch Core
//!
//! Event-stream normalization for the sketch surface.
//! Compiles to WASM so the browser drawing surface and native tooling share
//! one definition of what a drawing is.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              sketch-core.wasm               │
//! ├─────────────────────────────────────────────┤
//! │  Event Log       │  Normalizer              │
//! │  - push / pop    │  - colour canonicalizing │
//! │  - undo / redo   │  - target linking        │
//! │  - raw history   │  - validity + collapse   │
//! ├─────────────────────────────────────────────┤
//! │  Document: ordered {type, args, layout}     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use sketch_core::{Args, Event, EventLog, EventType};
//! use serde_json::json;
//!
//! let mut log = EventLog::new();
//! let mut d = Args::new();
//! d.insert("d".into(), json!("M0,0 L10,10"));
//! log.push(Event::new(EventType::Path, d).with_id(1u64));
//! log.push(Event::delete(1u64));
//!
//! assert!(log.normalize().is_empty());
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod color;
pub mod document;
pub mod error;
pub mod event;
pub mod history;
pub mod normalize;
pub mod stream;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use color::Rgba;
pub use document::{Document, NormalizedEvent};
pub use error::{SketchError, SketchResult};
pub use event::{Args, Event, EventId, EventType, Layout};
pub use history::History;
pub use normalize::{Normalizer, NormalizerConfig};
pub use stream::EventLog;

/// Sketch core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
