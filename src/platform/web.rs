//! Browser bindings
//!
//! The JS renderer owns the frame loop and the vehicle; it feeds frame
//! deltas and the player's state in, and reads tornado, terrain and events
//! back out as plain values or JSON.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::Settings;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::sim::{SessionState, TickInput, tick};

/// Session handle exported to JS
#[wasm_bindgen]
pub struct WasmSession {
    state: SessionState,
    accumulator: f32,
    input: TickInput,
}

#[wasm_bindgen]
impl WasmSession {
    /// Start a session. `seed` of 0 picks one from the clock.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> WasmSession {
        let seed = if seed == 0 {
            js_sys::Date::now() as u64
        } else {
            seed
        };
        Self {
            state: SessionState::new(seed, Settings::load()),
            accumulator: 0.0,
            input: TickInput::default(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.state.seed
    }

    /// Player state for the coming frame
    pub fn set_player(&mut self, x: f32, y: f32, aiming: bool) {
        self.input.player_pos = Some(Vec2::new(x, y));
        self.input.aiming = aiming;
    }

    /// No vehicle on the map (e.g. destroyed)
    pub fn clear_player(&mut self) {
        self.input.player_pos = None;
        self.input.aiming = false;
    }

    pub fn toggle_pause(&mut self) {
        self.input.pause = true;
    }

    /// Run simulation ticks for a frame of `dt` seconds
    pub fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.pause = false;
        }
    }

    pub fn time_left(&self) -> f32 {
        self.state.time_left
    }

    pub fn score(&self) -> f64 {
        self.state.score as f64
    }

    pub fn combo(&self) -> f32 {
        self.state.combo
    }

    pub fn health(&self) -> f32 {
        self.state.health
    }

    pub fn aim_progress(&self) -> f32 {
        self.state.camera.aim_progress()
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn tornado_phase(&self) -> String {
        self.state.tornado_phase().as_str().to_string()
    }

    /// `[x, y, strength, radius]` of the live tornado, empty when none
    pub fn tornado(&self) -> Vec<f32> {
        self.state
            .current_tornado()
            .map(|t| vec![t.pos.x, t.pos.y, t.strength, t.radius()])
            .unwrap_or_default()
    }

    /// `[x, y]` wind force on the player this tick
    pub fn wind(&self) -> Vec<f32> {
        vec![self.state.wind.force.x, self.state.wind.force.y]
    }

    /// Speed multiplier of the terrain under a world point
    pub fn speed_modifier_at(&self, x: f32, y: f32) -> f32 {
        self.state.terrain.speed_modifier_at(x, y)
    }

    /// Tile under a world point as JSON, or `null`
    pub fn query_at(&self, x: f32, y: f32) -> String {
        serde_json::to_string(&self.state.query_at(x, y)).unwrap_or_else(|_| "null".into())
    }

    /// The whole grid as JSON (for the terrain renderer)
    pub fn terrain_json(&self) -> String {
        serde_json::to_string(&self.state.terrain).unwrap_or_else(|e| {
            log::warn!("Failed to encode terrain: {}", e);
            "null".into()
        })
    }

    /// Events since the last call, as a JSON array
    pub fn drain_events(&mut self) -> String {
        let events = self.state.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::warn!("Failed to encode events: {}", e);
            "[]".into()
        })
    }

    /// Best photo of the session as JSON, or `null`
    pub fn best_photo(&self) -> String {
        serde_json::to_string(&self.state.best_photo()).unwrap_or_else(|_| "null".into())
    }
}

/// Current settings as JSON
#[wasm_bindgen]
pub fn load_settings() -> String {
    Settings::load().to_json().unwrap_or_else(|_| "{}".into())
}

/// Store settings from a (possibly partial) JSON document
#[wasm_bindgen]
pub fn save_settings(json: &str) -> bool {
    match Settings::from_json(json) {
        Ok(settings) => settings.save(),
        Err(e) => {
            log::warn!("Rejected settings: {}", e);
            false
        }
    }
}
