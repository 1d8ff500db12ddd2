//! Fixed timestep simulation tick
//!
//! Advances one session deterministically. Order within a tick: clock,
//! tornado lifecycle (strength, pattern, movement, edge, destruction),
//! player hazards, camera, end conditions.

use glam::Vec2;

use super::event::{EndCause, SessionEvent};
use super::kinematics::{self, WindForce};
use super::state::{BASE_COMBO, MAX_COMBO, PHOTO_COMBO_BONUS, SessionPhase, SessionState};

/// Input from the vehicle and UI collaborators for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Player vehicle position, when one exists
    pub player_pos: Option<Vec2>,
    /// Camera button held
    pub aiming: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the session by one fixed timestep
pub fn tick(state: &mut SessionState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            SessionPhase::Playing => {
                state.phase = SessionPhase::Paused;
                log::info!("Paused");
                return;
            }
            SessionPhase::Paused => {
                state.phase = SessionPhase::Playing;
                log::info!("Resumed");
            }
            SessionPhase::Over => {}
        }
    }

    // Don't tick if paused or over
    match state.phase {
        SessionPhase::Paused | SessionPhase::Over => return,
        SessionPhase::Playing => {}
    }

    state.time_ticks += 1;
    state.elapsed += dt;
    state.time_left -= dt;

    state.lifecycle.update(
        dt,
        state.time_left,
        &mut state.terrain,
        &mut state.rng,
        &mut state.events,
    );

    let live = state.lifecycle.current_tornado().map(|t| (t.pos, t.strength));

    // Player hazards
    state.wind = WindForce::NONE;
    let mut distance = None;
    if let (Some(player), Some((center, strength))) = (input.player_pos, live) {
        let d = center.distance(player);
        distance = Some(d);
        state.health = (state.health - kinematics::damage_per_second(d, strength) * dt).max(0.0);
        state.wind = kinematics::wind_force(center, player, strength);
    }

    update_camera(state, input, dt, distance, live.map(|(_, s)| s));

    if state.time_left <= 0.0 {
        state.time_left = 0.0;
        state.end(EndCause::Time);
    } else if state.health <= 0.0 {
        state.end(EndCause::Crash);
    } else if state.lifecycle.is_complete() {
        state.end(EndCause::Time);
    }
}

/// Aim while the button is held with a tornado in play; shoot on release
fn update_camera(
    state: &mut SessionState,
    input: &TickInput,
    dt: f32,
    distance: Option<f32>,
    strength: Option<f32>,
) {
    if input.aiming && strength.is_some() {
        state.camera.hold(dt);
        return;
    }

    if state.camera.is_aiming() {
        if let (Some(distance), Some(strength)) = (distance, strength) {
            if let Some(photo) = state.camera.release(distance, strength, state.elapsed) {
                state.score += u64::from(photo.score);
                state.combo = (state.combo + PHOTO_COMBO_BONUS).min(MAX_COMBO);
                log::info!(
                    "Photo: {} pts ({}), {:.0} units",
                    photo.score,
                    photo.quality.as_str(),
                    distance
                );
                state.events.push(SessionEvent::PhotoTaken {
                    score: photo.score,
                    quality: photo.quality,
                });
                return;
            }
        }
    }

    // No tornado (or no vehicle) to shoot at: the aim is wasted
    state.camera.cancel();
    state.combo = (state.combo - state.settings.combo_decay_per_second * dt).max(BASE_COMBO);
}
