//! Browser binding
//!
//! The page drives the board through `WebBoard`: it forwards taps and swaps,
//! then calls `advance` on a timer using `delay_ms` for pacing and drains the
//! recorded events as JSON for its own animation and audio.

use wasm_bindgen::prelude::*;

use crate::feedback::Recorder;
use crate::settings::Rules;
use crate::sim::{BoardInput, CascadePhase, Controller};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Mochi Match core loaded");
}

/// A board session owned by the page
#[wasm_bindgen]
pub struct WebBoard {
    ctrl: Controller<Recorder>,
}

#[wasm_bindgen]
impl WebBoard {
    /// New board. `rules_json` may be empty for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(rules_json: &str) -> Result<WebBoard, JsValue> {
        let rules = if rules_json.trim().is_empty() {
            Rules::default()
        } else {
            Rules::from_json(rules_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        let seed = js_sys::Date::now() as u64;
        log::info!("Board initialized with seed: {}", seed);
        Ok(Self {
            ctrl: Controller::new(seed, rules, Recorder::new()),
        })
    }

    /// Returns true if a cascade started. Rejections show up in the event stream.
    pub fn swap(&mut self, from_row: i32, from_col: i32, to_row: i32, to_col: i32) -> bool {
        let input = BoardInput::Swap {
            from: (from_row as i64, from_col as i64),
            to: (to_row as i64, to_col as i64),
        };
        self.ctrl.apply(&input).unwrap_or(false)
    }

    pub fn activate(&mut self, row: i32, col: i32) -> bool {
        let input = BoardInput::Activate {
            at: (row as i64, col as i64),
        };
        self.ctrl.apply(&input).unwrap_or(false)
    }

    pub fn reset(&mut self) {
        self.ctrl.reset(js_sys::Date::now() as u64);
    }

    /// Run one resolver transition; returns true while more remain
    pub fn advance(&mut self) -> bool {
        self.ctrl.advance() != CascadePhase::Idle
    }

    pub fn is_processing(&self) -> bool {
        self.ctrl.is_processing()
    }

    /// Milliseconds the page should wait before the next `advance`
    pub fn delay_ms(&self) -> f64 {
        self.ctrl.rules().pacing.delay_before(self.ctrl.phase()).as_millis() as f64
    }

    pub fn clear_count(&self) -> f64 {
        self.ctrl.clear_count() as f64
    }

    /// Kinds as a JSON 6x6 array
    pub fn grid_json(&self) -> String {
        serde_json::to_string(&self.ctrl.board().grid().kinds()).unwrap_or_default()
    }

    /// Everything emitted since the last drain, as JSON `{ events, cues }`
    pub fn drain_events(&mut self) -> String {
        let (events, cues) = self.ctrl.port_mut().drain();
        serde_json::json!({ "events": events, "cues": cues }).to_string()
    }
}
