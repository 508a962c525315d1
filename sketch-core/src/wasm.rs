//! WebAssembly bindings for sketch-core.
//!
//! This module provides JavaScript-callable functions when compiled to WASM.

use wasm_bindgen::prelude::*;

use crate::{Event, History};

/// Initialize the sketch WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Event stream instance for WASM.
#[wasm_bindgen]
pub struct WasmEventStream {
    history: History,
}

#[wasm_bindgen]
impl WasmEventStream {
    /// Create a new, empty event stream.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self {
            history: History::new(),
        }
    }

    /// Push a raw event given as JSON. Returns the new length.
    ///
    /// # Errors
    ///
    /// Returns an error string if the event cannot be decoded.
    pub fn push(&mut self, json: &str) -> Result<usize, String> {
        let event = Event::from_json(json).map_err(|e| e.to_string())?;
        Ok(self.history.record(event))
    }

    /// Undo the most recent event, returning it as JSON.
    pub fn undo(&mut self) -> Option<String> {
        self.history
            .undo()
            .and_then(|e| serde_json::to_string(e).ok())
    }

    /// Redo the most recently undone event, returning it as JSON.
    pub fn redo(&mut self) -> Option<String> {
        self.history
            .redo()
            .and_then(|e| serde_json::to_string(e).ok())
    }

    /// Number of recorded events.
    #[wasm_bindgen(getter)]
    #[must_use]
    pub fn length(&self) -> usize {
        self.history.log().len()
    }

    /// Get the normalized document as JSON.
    #[wasm_bindgen(js_name = toJSON)]
    #[must_use]
    pub fn to_json(&self) -> String {
        self.history.document().to_json().unwrap_or_default()
    }

    /// Replace the recorded history with events given as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error string if JSON parsing fails.
    #[wasm_bindgen(js_name = setEvents)]
    pub fn set_events(&mut self, json: &str) -> Result<(), String> {
        let events: Vec<Event> = serde_json::from_str(json).map_err(|e| e.to_string())?;
        self.history.load(events);
        Ok(())
    }

    /// Get the stroke colour in effect, if any style set one.
    #[wasm_bindgen(js_name = activeStroke)]
    #[must_use]
    pub fn active_stroke(&self) -> Option<String> {
        self.history.log().active_stroke().map(str::to_string)
    }
}

impl Default for WasmEventStream {
    fn default() -> Self {
        Self::new()
    }
}
