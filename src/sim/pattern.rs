//! Tornado movement patterns
//!
//! Each pattern turns a base target (picked elsewhere, away from water) into
//! the point the funnel actually heads for.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::WorldBounds;

/// Keep pattern targets this far from the world edge
pub const PATTERN_MARGIN: f32 = 150.0;
pub const ZIGZAG_AMPLITUDE: f32 = 200.0;
pub const ZIGZAG_FREQUENCY: f32 = 2.0;
pub const CIRCLE_RADIUS: f32 = 300.0;
/// Angle advanced per circular retarget (radians)
pub const CIRCLE_STEP: f32 = 0.3;
/// Chance per call that a chaotic funnel jumps to a fresh random point
pub const CHAOS_CHANCE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementPattern {
    #[default]
    Straight,
    Zigzag,
    Circular,
    Chaotic,
}

impl MovementPattern {
    pub const ALL: [MovementPattern; 4] = [
        MovementPattern::Straight,
        MovementPattern::Zigzag,
        MovementPattern::Circular,
        MovementPattern::Chaotic,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MovementPattern::Straight => "straight",
            MovementPattern::Zigzag => "zigzag",
            MovementPattern::Circular => "circular",
            MovementPattern::Chaotic => "chaotic",
        }
    }
}

/// Per-tornado memory the patterns carry between calls
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternState {
    /// Seconds since the current pattern was chosen
    pub elapsed: f32,
    /// Circular pattern's angle accumulator
    pub angle: f32,
    /// Last target handed out (chaotic keeps it until it re-rolls)
    pub last_target: Option<Vec2>,
}

impl PatternState {
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    /// Called when a new pattern is rolled
    pub fn restart(&mut self) {
        self.elapsed = 0.0;
    }
}

/// Next heading target for `pattern`
pub fn next_target<R: Rng + ?Sized>(
    pattern: MovementPattern,
    state: &mut PatternState,
    position: Vec2,
    base_target: Vec2,
    bounds: &WorldBounds,
    rng: &mut R,
) -> Vec2 {
    let target = match pattern {
        MovementPattern::Straight => base_target,
        MovementPattern::Zigzag => {
            let offset = (state.elapsed * ZIGZAG_FREQUENCY).sin() * ZIGZAG_AMPLITUDE;
            bounds.clamp_inset(
                Vec2::new(base_target.x + offset, base_target.y),
                PATTERN_MARGIN,
            )
        }
        MovementPattern::Circular => {
            state.angle += CIRCLE_STEP;
            let swing = Vec2::new(state.angle.cos(), state.angle.sin()) * CIRCLE_RADIUS;
            bounds.clamp_inset(position + swing, PATTERN_MARGIN)
        }
        MovementPattern::Chaotic => {
            if rng.random_bool(CHAOS_CHANCE) {
                bounds.random_point(rng, PATTERN_MARGIN)
            } else {
                state.last_target.unwrap_or(base_target)
            }
        }
    };
    state.last_target = Some(target);
    target
}
