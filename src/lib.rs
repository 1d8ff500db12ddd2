//! Storm Chaser - chase a tornado through a procedurally generated town
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain generation, tornado lifecycle, scoring)
//! - `settings`: Session configuration, injected into the simulation
//! - `platform`: Browser bindings for the JS renderer (wasm32 only)

pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default world dimensions
    pub const WORLD_WIDTH: f32 = 2400.0;
    pub const WORLD_HEIGHT: f32 = 1350.0;
    /// Default terrain tile edge (larger tiles = fewer objects)
    pub const TILE_SIZE: f32 = 75.0;

    /// Scale between game units and real-world speed: 1 game unit = 0.3 mph
    pub const UNITS_TO_MPH: f32 = 0.3;
}

/// Axis-aligned world rectangle anchored at the origin
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

impl WorldBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Clamp a point into the bounds shrunk by `margin` on every side.
    /// If the margin swallows an axis, that axis collapses to its midpoint.
    pub fn clamp_inset(&self, p: Vec2, margin: f32) -> Vec2 {
        Vec2::new(
            clamp_axis(p.x, margin, self.width - margin),
            clamp_axis(p.y, margin, self.height - margin),
        )
    }

    /// True when `p` lies within `buffer` of any edge (or outside entirely)
    pub fn near_edge(&self, p: Vec2, buffer: f32) -> bool {
        p.x <= buffer
            || p.y <= buffer
            || p.x >= self.width - buffer
            || p.y >= self.height - buffer
    }

    /// Uniform random point inside the bounds shrunk by `margin`
    pub fn random_point<R: rand::Rng + ?Sized>(&self, rng: &mut R, margin: f32) -> Vec2 {
        Vec2::new(
            random_axis(rng, margin, self.width - margin),
            random_axis(rng, margin, self.height - margin),
        )
    }
}

#[inline]
fn clamp_axis(v: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi { (lo + hi) * 0.5 } else { v.clamp(lo, hi) }
}

#[inline]
fn random_axis<R: rand::Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if lo >= hi {
        (lo + hi) * 0.5
    } else {
        rng.random_range(lo..=hi)
    }
}
