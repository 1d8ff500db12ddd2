//! Session state
//!
//! Everything a chase session owns: the terrain, the tornado lifecycle, the
//! clock, the player's health and score, and the pending UI events.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::event::{EndCause, SessionEvent};
use super::generator::TerrainGenerator;
use super::kinematics::WindForce;
use super::lifecycle::{Lifecycle, TornadoPhase};
use super::photo::{Camera, Photo};
use super::rng::{LIFECYCLE_STREAM, stream_rng};
use super::terrain::Terrain;
use super::tile::TerrainTile;
use super::tornado::Tornado;
use crate::Settings;

/// Starting (and minimum) combo
pub const BASE_COMBO: f32 = 1.0;
pub const MAX_COMBO: f32 = 5.0;
/// Combo gained per photo
pub const PHOTO_COMBO_BONUS: f32 = 0.5;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Clock running
    Playing,
    /// Session is paused
    Paused,
    /// Session ended (see `end_cause`)
    Over,
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub settings: Settings,
    pub phase: SessionPhase,
    pub end_cause: Option<EndCause>,
    pub terrain: Terrain,
    pub lifecycle: Lifecycle,
    /// Lifecycle random stream
    pub(crate) rng: Pcg32,
    /// Seconds left on the session clock
    pub time_left: f32,
    /// Seconds played (paused time excluded)
    pub elapsed: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub score: u64,
    pub combo: f32,
    pub health: f32,
    /// Wind acting on the player this tick
    pub wind: WindForce,
    pub camera: Camera,
    /// Pending events, oldest first
    pub(crate) events: Vec<SessionEvent>,
}

impl SessionState {
    /// Generate the town and start the clock
    pub fn new(seed: u64, settings: Settings) -> Self {
        let settings = settings.sanitized();
        let terrain = TerrainGenerator::new(seed, settings.tile_size)
            .generate(settings.world_width, settings.world_height);
        let lifecycle = Lifecycle::new(settings.bounds(), settings.difficulty);
        log::info!(
            "Session {} started: {}x{} tiles, {:.0}s",
            seed,
            terrain.tiles_x,
            terrain.tiles_y,
            settings.session_seconds
        );

        Self {
            seed,
            phase: SessionPhase::Playing,
            end_cause: None,
            terrain,
            lifecycle,
            rng: stream_rng(seed, LIFECYCLE_STREAM),
            time_left: settings.session_seconds,
            elapsed: 0.0,
            time_ticks: 0,
            score: 0,
            combo: BASE_COMBO,
            health: settings.max_health,
            wind: WindForce::NONE,
            camera: Camera::default(),
            events: Vec::new(),
            settings,
        }
    }

    pub fn current_tornado(&self) -> Option<&Tornado> {
        self.lifecycle.current_tornado()
    }

    pub fn tornado_phase(&self) -> TornadoPhase {
        self.lifecycle.current_phase()
    }

    /// Terrain tile under a world point
    pub fn query_at(&self, x: f32, y: f32) -> Option<&TerrainTile> {
        self.terrain.query_at(x, y)
    }

    /// Distance from a point to the live tornado
    pub fn distance_to_tornado(&self, p: Vec2) -> Option<f32> {
        self.current_tornado().map(|t| t.pos.distance(p))
    }

    pub fn is_over(&self) -> bool {
        self.phase == SessionPhase::Over
    }

    pub fn photos(&self) -> &[Photo] {
        self.camera.photos()
    }

    pub fn best_photo(&self) -> Option<&Photo> {
        self.camera.best()
    }

    /// Take the events published since the last drain
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// End the session. Only the first call has any effect.
    pub fn end(&mut self, cause: EndCause) -> bool {
        if self.is_over() {
            return false;
        }
        self.phase = SessionPhase::Over;
        self.end_cause = Some(cause);
        self.lifecycle.halt();
        self.camera.cancel();
        self.wind = WindForce::NONE;
        log::info!(
            "Session ended ({}): score {}, {} photos",
            cause.as_str(),
            self.score,
            self.camera.photos().len()
        );
        self.events.push(SessionEvent::SessionEnded {
            cause,
            score: self.score,
        });
        true
    }
}
