//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (named streams per subsystem)
//! - Stable iteration order (row-major tiles)
//! - No rendering or platform dependencies

pub mod event;
pub mod generator;
pub mod kinematics;
pub mod lifecycle;
pub mod pattern;
pub mod photo;
pub mod rng;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod tile;
pub mod tornado;

pub use event::{EndCause, SessionEvent};
pub use generator::{TerrainGenerator, Zone, generate};
pub use kinematics::{WindForce, format_speed, to_game_units, to_mph};
pub use lifecycle::{Lifecycle, TornadoPhase};
pub use pattern::{MovementPattern, PatternState, next_target};
pub use photo::{Camera, Photo, PhotoQuality, best_photo, score_photo};
pub use state::{SessionPhase, SessionState};
pub use terrain::Terrain;
pub use tick::{TickInput, tick};
pub use tile::{TerrainTile, TileKind};
pub use tornado::Tornado;
