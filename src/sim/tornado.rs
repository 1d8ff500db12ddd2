//! The tornado entity
//!
//! Strength drifts toward a target that is re-rolled on a timer; the
//! movement pattern and a speed wobble are re-rolled on their own timers.
//! Movement speed comes from the EF band of the current strength.
//! Zigzag, circular and chaotic patterns re-aim once a second around a
//! stored base point until the funnel passes its target.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::kinematics::{self, MAX_STRENGTH, MIN_STRENGTH, WindForce};
use super::pattern::{MovementPattern, PATTERN_MARGIN, PatternState, next_target};
use super::terrain::Terrain;
use crate::WorldBounds;

/// Strength change per second while drifting toward the target
pub const STRENGTH_DRIFT_RATE: f32 = 0.3;
/// Drift stops once strength is this close to the target
const STRENGTH_EPSILON: f32 = 0.01;
/// Seconds between target-strength re-rolls
pub const STRENGTH_REROLL_SECS: f32 = 3.0;
pub const TARGET_STRENGTH_MIN: f32 = 0.3;
pub const TARGET_STRENGTH_MAX: f32 = 5.0;
/// Default seconds between movement-pattern re-rolls
pub const PATTERN_REROLL_SECS: f32 = 8.0;
/// Seconds between speed-variation re-rolls
pub const VARIATION_REROLL_SECS: f32 = 2.0;
pub const VARIATION_MIN: f32 = -0.3;
pub const VARIATION_MAX: f32 = 0.5;
/// Below this speed the funnel picks a new heading
pub const NEEDS_HEADING_SPEED: f32 = 20.0;
/// Rejection-sampling attempts when avoiding water
pub const DRY_POINT_ATTEMPTS: u32 = 10;
/// How often a non-straight pattern re-aims while its target is still ahead
pub const RETARGET_SECS: f32 = 1.0;

/// Random point inside `bounds` (minus `margin`) that avoids water when possible.
/// After `DRY_POINT_ATTEMPTS` misses the last sample is used anyway.
pub fn sample_dry_point<R: Rng + ?Sized>(
    rng: &mut R,
    terrain: &Terrain,
    bounds: &WorldBounds,
    margin: f32,
) -> Vec2 {
    let mut p = bounds.random_point(rng, margin);
    for _ in 1..DRY_POINT_ATTEMPTS {
        if !terrain.is_water_at(p) {
            break;
        }
        p = bounds.random_point(rng, margin);
    }
    p
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tornado {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Continuous EF strength, always within [0, 5]
    pub strength: f32,
    pub target_strength: f32,
    pub pattern: MovementPattern,
    pub pattern_state: PatternState,
    /// External difficulty scalar
    pub speed_multiplier: f32,
    /// Short-term speed wobble in [-0.3, 0.5]
    pub speed_variation: f32,
    /// Point the funnel is currently heading for
    pub heading_target: Option<Vec2>,
    /// Dry point the current pattern is built around
    pub base_target: Option<Vec2>,
    pattern_interval: f32,
    strength_timer: f32,
    pattern_timer: f32,
    variation_timer: f32,
    retarget_timer: f32,
}

impl Tornado {
    pub fn new(pos: Vec2, strength: f32, speed_multiplier: f32) -> Self {
        let strength = strength.clamp(MIN_STRENGTH, MAX_STRENGTH);
        Self {
            pos,
            vel: Vec2::ZERO,
            strength,
            target_strength: strength,
            pattern: MovementPattern::Straight,
            pattern_state: PatternState::default(),
            speed_multiplier,
            speed_variation: 0.0,
            heading_target: None,
            base_target: None,
            pattern_interval: PATTERN_REROLL_SECS,
            strength_timer: 0.0,
            pattern_timer: 0.0,
            variation_timer: 0.0,
            retarget_timer: 0.0,
        }
    }

    /// Override how often the movement pattern is re-rolled
    pub fn with_pattern_interval(mut self, secs: f32) -> Self {
        self.pattern_interval = secs.max(f32::EPSILON);
        self
    }

    pub fn pattern_interval(&self) -> f32 {
        self.pattern_interval
    }

    /// Request a new target strength (clamped to the EF scale)
    pub fn set_target_strength(&mut self, value: f32) {
        self.target_strength = value.clamp(MIN_STRENGTH, MAX_STRENGTH);
    }

    pub fn ef_rating(&self) -> u8 {
        kinematics::ef_rating(self.strength)
    }

    /// Effective forward speed (game units/s)
    pub fn move_speed(&self) -> f32 {
        kinematics::band_speed(self.strength)
            * (1.0 + self.speed_variation)
            * self.speed_multiplier
    }

    pub fn radius(&self) -> f32 {
        kinematics::base_radius(self.strength)
    }

    pub fn danger_radius(&self) -> f32 {
        kinematics::danger_radius(self.strength)
    }

    pub fn wind_radius(&self) -> f32 {
        kinematics::wind_radius(self.strength)
    }

    pub fn destruction_radius(&self) -> f32 {
        kinematics::destruction_radius(self.strength)
    }

    pub fn filming_radius(&self) -> f32 {
        kinematics::filming_radius(self.strength)
    }

    pub fn damage_per_second(&self, distance: f32) -> f32 {
        kinematics::damage_per_second(distance, self.strength)
    }

    pub fn wind_on(&self, victim: Vec2) -> WindForce {
        kinematics::wind_force(self.pos, victim, self.strength)
    }

    /// Advance strength, pattern and speed wobble by `dt`.
    /// Random draws happen in that order: strength, pattern, variation.
    pub fn advance<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        // Drift toward target
        let gap = self.target_strength - self.strength;
        if gap.abs() > STRENGTH_EPSILON {
            let step = STRENGTH_DRIFT_RATE * dt;
            self.strength += gap.clamp(-step, step);
        }
        self.strength = self.strength.clamp(MIN_STRENGTH, MAX_STRENGTH);

        self.strength_timer += dt;
        if self.strength_timer >= STRENGTH_REROLL_SECS {
            self.strength_timer = 0.0;
            self.target_strength = rng.random_range(TARGET_STRENGTH_MIN..=TARGET_STRENGTH_MAX);
        }

        self.pattern_state.advance(dt);
        self.pattern_timer += dt;
        if self.pattern_timer >= self.pattern_interval {
            self.pattern_timer = 0.0;
            self.pattern = MovementPattern::random(rng);
            self.pattern_state.restart();
            // Drop the old heading so the new pattern steers from the next move
            self.vel = Vec2::ZERO;
            log::debug!("Tornado pattern -> {}", self.pattern.as_str());
        }

        self.variation_timer += dt;
        if self.variation_timer >= VARIATION_REROLL_SECS {
            self.variation_timer = 0.0;
            self.speed_variation = rng.random_range(VARIATION_MIN..=VARIATION_MAX);
        }
    }

    /// Heading target still lies in front of the funnel
    fn target_ahead(&self) -> bool {
        self.heading_target
            .is_some_and(|t| (t - self.pos).dot(self.vel) > 0.0)
    }

    /// Update heading and position for this tick.
    ///
    /// A stalled funnel samples a fresh base point. Non-straight patterns
    /// re-aim around that base every `RETARGET_SECS` until they pass their
    /// target, after which the heading is held so the funnel can leave.
    pub fn steer<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        rng: &mut R,
        terrain: &Terrain,
        bounds: &WorldBounds,
    ) {
        let speed = self.move_speed();
        self.retarget_timer += dt;
        let stalled = self.vel.length() < NEEDS_HEADING_SPEED;
        let retarget = !stalled
            && self.pattern != MovementPattern::Straight
            && self.retarget_timer >= RETARGET_SECS
            && self.target_ahead();

        if stalled || retarget {
            let base = match self.base_target {
                Some(base) if retarget => base,
                _ => sample_dry_point(rng, terrain, bounds, PATTERN_MARGIN),
            };
            let target = next_target(
                self.pattern,
                &mut self.pattern_state,
                self.pos,
                base,
                bounds,
                rng,
            );
            self.base_target = Some(base);
            self.heading_target = Some(target);
            self.retarget_timer = 0.0;
            self.vel = (target - self.pos).normalize_or_zero() * speed;
        } else {
            // Keep heading, track the freshly computed speed
            self.vel = self.vel.normalize_or_zero() * speed;
        }
        self.pos += self.vel * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tile::{TerrainTile, TileKind};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn flat_terrain(kind: TileKind, tiles_x: u32, tiles_y: u32, tile_size: f32) -> Terrain {
        let tiles = (0..tiles_y)
            .flat_map(|ty| (0..tiles_x).map(move |tx| TerrainTile::new(kind, tx, ty, tile_size)))
            .collect();
        Terrain::from_tiles(tile_size, tiles_x, tiles_y, tiles).unwrap()
    }

    #[test]
    fn test_new_clamps_strength() {
        let t = Tornado::new(Vec2::ZERO, 9.0, 1.0);
        assert_eq!(t.strength, 5.0);
        assert_eq!(t.target_strength, 5.0);
    }

    #[test]
    fn test_drift_toward_target() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut t = Tornado::new(Vec2::ZERO, 1.0, 1.0);
        t.set_target_strength(2.0);
        t.advance(1.0, &mut rng);
        assert!((t.strength - 1.3).abs() < 1e-5);
        // Does not overshoot
        t.set_target_strength(1.35);
        t.advance(1.0, &mut rng);
        assert!((t.strength - 1.35).abs() < 1e-5);
    }

    #[test]
    fn test_target_strength_rerolls_on_cadence() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut t = Tornado::new(Vec2::ZERO, 1.0, 1.0);
        let before = t.target_strength;
        for _ in 0..(STRENGTH_REROLL_SECS / 0.1) as usize - 2 {
            t.advance(0.1, &mut rng);
        }
        assert_eq!(t.target_strength, before);
        for _ in 0..3 {
            t.advance(0.1, &mut rng);
        }
        assert_ne!(t.target_strength, before);
        assert!(t.target_strength >= TARGET_STRENGTH_MIN && t.target_strength <= TARGET_STRENGTH_MAX);
    }

    #[test]
    fn test_pattern_reroll_clears_heading() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut t = Tornado::new(Vec2::ZERO, 1.0, 1.0).with_pattern_interval(1.0);
        t.vel = Vec2::new(100.0, 0.0);
        t.advance(1.0, &mut rng);
        assert_eq!(t.vel, Vec2::ZERO);
        assert_eq!(t.pattern_state.elapsed, 0.0);
    }

    #[test]
    fn test_move_speed_composition() {
        let mut t = Tornado::new(Vec2::ZERO, 3.2, 2.0);
        t.speed_variation = 0.5;
        let expected = kinematics::to_game_units(40.0) * 1.5 * 2.0;
        assert!((t.move_speed() - expected).abs() < 1e-3);
    }

    #[test]
    fn test_steer_picks_heading_and_moves() {
        let terrain = flat_terrain(TileKind::Grass, 32, 18, 75.0);
        let bounds = WorldBounds::new(2400.0, 1350.0);
        let mut rng = Pcg32::seed_from_u64(11);
        let mut t = Tornado::new(Vec2::new(1200.0, 675.0), 2.0, 1.0);

        t.steer(0.5, &mut rng, &terrain, &bounds);
        let target = t.heading_target.expect("heading chosen");
        assert!((t.vel.length() - t.move_speed()).abs() < 1e-3);
        let moved = t.pos - Vec2::new(1200.0, 675.0);
        assert!((moved.length() - t.move_speed() * 0.5).abs() < 1e-2);
        // Moving toward the chosen target
        assert!(moved.dot(target - Vec2::new(1200.0, 675.0)) > 0.0);

        // Heading persists while fast enough
        let heading = t.vel.normalize();
        t.steer(0.5, &mut rng, &terrain, &bounds);
        assert!(t.vel.normalize().dot(heading) > 0.999);
        assert_eq!(t.heading_target, Some(target));
    }

    #[test]
    fn test_speed_variation_rerolls_every_two_seconds() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut t = Tornado::new(Vec2::ZERO, 2.0, 1.0).with_pattern_interval(1000.0);
        for _ in 0..3 {
            t.advance(0.5, &mut rng);
        }
        assert_eq!(t.speed_variation, 0.0);
        t.advance(0.5, &mut rng);
        assert_ne!(t.speed_variation, 0.0);

        let mut seen = Vec::new();
        for _ in 0..400 {
            t.advance(0.5, &mut rng);
            assert!(t.speed_variation >= VARIATION_MIN && t.speed_variation <= VARIATION_MAX);
            seen.push(t.speed_variation);
        }
        // Both slowdowns and speedups show up
        assert!(seen.iter().any(|v| *v < 0.0));
        assert!(seen.iter().any(|v| *v > 0.0));
    }

    #[test]
    fn test_zigzag_retarget_offsets_base() {
        let terrain = flat_terrain(TileKind::Grass, 32, 18, 75.0);
        let bounds = WorldBounds::new(2400.0, 1350.0);
        let mut rng = Pcg32::seed_from_u64(5);
        let base = Vec2::new(1200.0, 1000.0);
        let mut t = Tornado::new(Vec2::new(1200.0, 300.0), 2.0, 1.0);
        t.pattern = MovementPattern::Zigzag;
        t.vel = Vec2::new(0.0, 100.0);
        t.base_target = Some(base);
        t.heading_target = Some(base);
        t.pattern_state.elapsed = 0.6;
        t.retarget_timer = RETARGET_SECS;

        t.steer(0.1, &mut rng, &terrain, &bounds);
        let target = t.heading_target.expect("heading chosen");
        assert_eq!(t.base_target, Some(base));
        let expected = (0.6f32 * 2.0).sin() * 200.0;
        assert!((target.x - base.x - expected).abs() < 1e-2);
        assert_eq!(target.y, base.y);
        // Swung toward the new target
        assert!(t.vel.x > 0.0);
    }

    #[test]
    fn test_zigzag_heading_differs_from_base() {
        let terrain = flat_terrain(TileKind::Grass, 32, 18, 75.0);
        let bounds = WorldBounds::new(2400.0, 1350.0);
        let mut rng = Pcg32::seed_from_u64(17);
        let mut t = Tornado::new(Vec2::new(1200.0, 675.0), 2.0, 1.0).with_pattern_interval(1000.0);
        t.pattern = MovementPattern::Zigzag;

        let mut offsets = 0;
        for _ in 0..12 {
            t.advance(0.25, &mut rng);
            t.steer(0.25, &mut rng, &terrain, &bounds);
            if t.heading_target != t.base_target {
                offsets += 1;
            }
        }
        assert!(offsets > 0);
    }

    #[test]
    fn test_circular_keeps_turning() {
        let terrain = flat_terrain(TileKind::Grass, 32, 18, 75.0);
        let bounds = WorldBounds::new(2400.0, 1350.0);
        let mut rng = Pcg32::seed_from_u64(6);
        let mut t = Tornado::new(Vec2::new(1200.0, 675.0), 2.0, 1.0).with_pattern_interval(1000.0);
        t.pattern = MovementPattern::Circular;

        let mut headings: Vec<Vec2> = Vec::new();
        for _ in 0..12 {
            t.advance(0.25, &mut rng);
            t.steer(0.25, &mut rng, &terrain, &bounds);
            let target = t.heading_target.expect("heading chosen");
            if headings.last() != Some(&target) {
                headings.push(target);
            }
        }
        // Initial heading plus a re-aim at 1s and 2s
        assert_eq!(headings.len(), 3);
        assert!((t.pattern_state.angle - 3.0 * crate::sim::pattern::CIRCLE_STEP).abs() < 1e-4);
    }

    #[test]
    fn test_straight_holds_heading() {
        let terrain = flat_terrain(TileKind::Grass, 32, 18, 75.0);
        let bounds = WorldBounds::new(2400.0, 1350.0);
        let mut rng = Pcg32::seed_from_u64(6);
        let mut t = Tornado::new(Vec2::new(1200.0, 675.0), 2.0, 1.0).with_pattern_interval(1000.0);

        t.steer(0.25, &mut rng, &terrain, &bounds);
        let first = t.heading_target;
        for _ in 0..12 {
            t.advance(0.25, &mut rng);
            t.steer(0.25, &mut rng, &terrain, &bounds);
        }
        assert_eq!(t.heading_target, first);
    }

    #[test]
    fn test_chaotic_targets_stay_on_map() {
        let terrain = flat_terrain(TileKind::Grass, 32, 18, 75.0);
        let bounds = WorldBounds::new(2400.0, 1350.0);
        let mut rng = Pcg32::seed_from_u64(12);
        let mut t = Tornado::new(Vec2::new(1200.0, 675.0), 1.0, 1.0).with_pattern_interval(1000.0);
        t.pattern = MovementPattern::Chaotic;

        for _ in 0..40 {
            t.advance(0.25, &mut rng);
            t.steer(0.25, &mut rng, &terrain, &bounds);
            let target = t.heading_target.expect("heading chosen");
            assert_eq!(t.pattern_state.last_target, Some(target));
            assert!(target.x >= PATTERN_MARGIN && target.x <= 2400.0 - PATTERN_MARGIN);
            assert!(target.y >= PATTERN_MARGIN && target.y <= 1350.0 - PATTERN_MARGIN);
        }
    }

    #[test]
    fn test_dry_point_avoids_water() {
        // Left half water, right half grass
        let mut terrain = flat_terrain(TileKind::Grass, 32, 18, 75.0);
        for ty in 0..18 {
            for tx in 0..16 {
                let x = tx as f32 * 75.0 + 1.0;
                let y = ty as f32 * 75.0 + 1.0;
                terrain.mutate(x, y, TileKind::Water);
            }
        }
        let bounds = WorldBounds::new(2400.0, 1350.0);
        let mut rng = Pcg32::seed_from_u64(8);
        let dry = (0..200)
            .filter(|_| !terrain.is_water_at(sample_dry_point(&mut rng, &terrain, &bounds, 150.0)))
            .count();
        // Each sample has ten tries at a coin flip
        assert!(dry >= 195, "dry = {}", dry);
    }

    proptest! {
        #[test]
        fn strength_stays_on_scale(seed in any::<u64>(), start in -2.0f32..8.0, steps in 1usize..400, dt in 0.001f32..2.0) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut t = Tornado::new(Vec2::ZERO, start, 1.0);
            for i in 0..steps {
                if i % 37 == 0 {
                    t.set_target_strength(start * 3.0 - 4.0);
                }
                t.advance(dt, &mut rng);
                prop_assert!(t.strength >= 0.0 && t.strength <= 5.0);
            }
        }
    }
}
