//! Tornado kinematics and hazard falloff
//!
//! Pure functions of strength (EF scale, 0-5) and distance, shared by the
//! lifecycle and the vehicle-physics collaborator.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::UNITS_TO_MPH;

/// Lowest and highest EF ratings
pub const MIN_STRENGTH: f32 = 0.0;
pub const MAX_STRENGTH: f32 = 5.0;

/// Real-world forward speed per EF band (mph), EF0..=EF5
pub const EF_SPEEDS_MPH: [f32; 6] = [15.0, 20.0, 30.0, 40.0, 55.0, 70.0];

/// Game units → mph
pub fn to_mph(units: f32) -> f32 {
    (units * UNITS_TO_MPH).abs()
}

/// mph → game units
pub fn to_game_units(mph: f32) -> f32 {
    mph / UNITS_TO_MPH
}

/// Human-readable speed, e.g. `"67 mph"`
pub fn format_speed(units: f32) -> String {
    format!("{} mph", to_mph(units).round() as i64)
}

/// Whole EF rating for a continuous strength
pub fn ef_rating(strength: f32) -> u8 {
    strength.clamp(MIN_STRENGTH, MAX_STRENGTH).floor() as u8
}

/// Forward speed (game units/s) of the EF band containing `strength`
pub fn band_speed(strength: f32) -> f32 {
    to_game_units(EF_SPEEDS_MPH[ef_rating(strength) as usize])
}

/// Visual funnel radius
pub fn base_radius(strength: f32) -> f32 {
    30.0 + strength * 20.0
}

/// Inner ring where vehicles take damage
pub fn danger_radius(strength: f32) -> f32 {
    base_radius(strength) * 0.4
}

/// Outer ring where wind pulls vehicles inward
pub fn wind_radius(strength: f32) -> f32 {
    base_radius(strength) * 3.0
}

/// Ring in which buildings and trees are flattened
pub fn destruction_radius(strength: f32) -> f32 {
    base_radius(strength) * 0.8
}

/// Ideal distance for photographing the funnel
pub fn filming_radius(strength: f32) -> f32 {
    base_radius(strength) + 80.0
}

/// Damage per second at `distance`: linear falloff to zero at the danger ring
pub fn damage_per_second(distance: f32, strength: f32) -> f32 {
    let radius = danger_radius(strength);
    if distance < radius {
        let closeness = 1.0 - distance / radius;
        strength * closeness * 5.0
    } else {
        0.0
    }
}

/// Wind acting on a vehicle, pointing from the vehicle toward the funnel
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindForce {
    pub force: Vec2,
    pub magnitude: f32,
}

impl WindForce {
    pub const NONE: WindForce = WindForce {
        force: Vec2::ZERO,
        magnitude: 0.0,
    };
}

/// Wind magnitude at `distance`: linear falloff to zero at the wind ring
pub fn wind_magnitude(distance: f32, strength: f32) -> f32 {
    let radius = wind_radius(strength);
    if distance < radius {
        (1.0 - distance / radius) * strength * 0.3
    } else {
        0.0
    }
}

/// Wind on a vehicle at `victim` from a tornado at `center`
pub fn wind_force(center: Vec2, victim: Vec2, strength: f32) -> WindForce {
    let magnitude = wind_magnitude(center.distance(victim), strength);
    if magnitude <= 0.0 {
        return WindForce::NONE;
    }
    // Pulls inward; a vehicle dead-center feels no net direction
    let dir = (center - victim).normalize_or_zero();
    WindForce {
        force: dir * magnitude,
        magnitude,
    }
}
