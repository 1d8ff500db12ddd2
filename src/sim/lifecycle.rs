//! Tornado lifecycle state machine
//!
//! `Watch -> Warning -> Active -> Ended -> (Waiting -> Warning -> Active -> Ended)*`
//!
//! The lifecycle is the only owner of the live tornado. At most one exists at
//! a time and at most [`MAX_EVENTS`] are spawned per session.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::event::SessionEvent;
use super::terrain::Terrain;
use super::tornado::{Tornado, sample_dry_point};
use crate::WorldBounds;

/// Tornado events per session
pub const MAX_EVENTS: u32 = 3;
/// Delay before the first warning
pub const WATCH_SECS: f32 = 5.0;
/// Spawn points keep this far from every edge
pub const SPAWN_INSET: f32 = 400.0;
/// A tornado this close to the edge has left the area
pub const EDGE_BUFFER: f32 = 50.0;
/// Another event is only scheduled if more session time than this remains
pub const MIN_SECS_FOR_NEXT: f32 = 20.0;
/// Session time kept free after the last event is scheduled
pub const RESERVE_SECS: f32 = 15.0;
/// Delay after the final tornado before the session completes
pub const FINAL_GRACE_SECS: f32 = 5.0;
/// Speed multiplier of the final tornado
pub const FINAL_EVENT_SPEED: f32 = 2.0;

/// Initial strength range per event (1-based index - 1)
const SPAWN_STRENGTH: [(f32, f32); MAX_EVENTS as usize] = [(1.0, 3.0), (2.0, 4.0), (3.0, 5.0)];
/// Movement pattern cadence per event; later tornadoes change course sooner
const PATTERN_SECS: [f32; MAX_EVENTS as usize] = [8.0, 6.0, 4.0];
/// Gap between events 1 and 2
const FIRST_GAP: (f32, f32) = (10.0, 15.0);
/// Gap between events 2 and 3 (upper end shrinks to keep the reserve)
const LATER_GAP: (f32, f32) = (5.0, 10.0);

/// Tornado phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TornadoPhase {
    /// Session start, no tornado yet
    Watch,
    /// A new event is being announced
    Warning,
    /// Tornado on the ground
    Active,
    /// Tornado gone; terminal unless another event was scheduled
    Ended,
    /// Countdown to the next event
    Waiting,
}

impl TornadoPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TornadoPhase::Watch => "watch",
            TornadoPhase::Warning => "warning",
            TornadoPhase::Active => "active",
            TornadoPhase::Ended => "ended",
            TornadoPhase::Waiting => "waiting",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lifecycle {
    phase: TornadoPhase,
    /// Seconds left in `Watch`/`Waiting`
    countdown: f32,
    /// Final grace period, running only after the last event ended
    grace: Option<f32>,
    tornado: Option<Tornado>,
    tornado_count: u32,
    /// External difficulty scalar applied to every tornado
    difficulty: f32,
    bounds: WorldBounds,
    complete: bool,
}

impl Lifecycle {
    pub fn new(bounds: WorldBounds, difficulty: f32) -> Self {
        Self {
            phase: TornadoPhase::Watch,
            countdown: WATCH_SECS,
            grace: None,
            tornado: None,
            tornado_count: 0,
            difficulty,
            bounds,
            complete: false,
        }
    }

    pub fn current_phase(&self) -> TornadoPhase {
        self.phase
    }

    pub fn current_tornado(&self) -> Option<&Tornado> {
        self.tornado.as_ref()
    }

    pub fn tornado_count(&self) -> u32 {
        self.tornado_count
    }

    /// Seconds until the next warning, while one is pending
    pub fn countdown(&self) -> Option<f32> {
        match self.phase {
            TornadoPhase::Watch | TornadoPhase::Waiting => Some(self.countdown.max(0.0)),
            _ => None,
        }
    }

    /// True once the final tornado's grace period has elapsed
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// True when no further tornado will appear this session
    pub fn is_terminal(&self) -> bool {
        self.phase == TornadoPhase::Ended
    }

    /// Advance the lifecycle by `dt`.
    ///
    /// `remaining_secs` is the session clock, used to decide whether another
    /// event fits. Tiles destroyed this tick are flattened in `terrain`.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        remaining_secs: f32,
        terrain: &mut Terrain,
        rng: &mut R,
        events: &mut Vec<SessionEvent>,
    ) {
        match self.phase {
            TornadoPhase::Watch | TornadoPhase::Waiting => {
                self.countdown -= dt;
                if self.countdown <= 0.0 {
                    self.begin_event(terrain, rng, events);
                }
            }
            TornadoPhase::Warning => {
                self.begin_event(terrain, rng, events);
            }
            TornadoPhase::Active => {
                self.update_active(dt, remaining_secs, terrain, rng, events);
            }
            TornadoPhase::Ended => {
                if let Some(grace) = self.grace.as_mut() {
                    *grace -= dt;
                    if *grace <= 0.0 {
                        self.grace = None;
                        self.complete = true;
                        log::info!("Final tornado grace period over");
                    }
                }
            }
        }
    }

    fn begin_event<R: Rng + ?Sized>(
        &mut self,
        terrain: &Terrain,
        rng: &mut R,
        events: &mut Vec<SessionEvent>,
    ) {
        if self.tornado_count >= MAX_EVENTS {
            self.phase = TornadoPhase::Ended;
            return;
        }
        self.phase = TornadoPhase::Warning;
        events.push(SessionEvent::TornadoWarning {
            event: self.tornado_count + 1,
        });
        log::info!("Tornado warning {}", self.tornado_count + 1);
        if !self.spawn(terrain, rng, events) {
            self.phase = TornadoPhase::Ended;
        }
    }

    /// Start the next tornado event.
    /// Returns false (and changes nothing) if a tornado is live or the event budget is spent.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        terrain: &Terrain,
        rng: &mut R,
        events: &mut Vec<SessionEvent>,
    ) -> bool {
        if self.tornado.is_some() {
            log::debug!("Spawn ignored: tornado already live");
            return false;
        }
        if self.tornado_count >= MAX_EVENTS {
            log::debug!("Spawn ignored: all {} events used", MAX_EVENTS);
            return false;
        }

        self.tornado_count += 1;
        let idx = (self.tornado_count - 1) as usize;
        let (lo, hi) = SPAWN_STRENGTH[idx];
        let pos = sample_dry_point(rng, terrain, &self.bounds, SPAWN_INSET);
        let strength = rng.random_range(lo..=hi);
        let mut speed = self.difficulty;
        if self.tornado_count == MAX_EVENTS {
            speed *= FINAL_EVENT_SPEED;
        }

        let tornado = Tornado::new(pos, strength, speed).with_pattern_interval(PATTERN_SECS[idx]);
        log::info!(
            "Tornado {} spawned at ({:.0}, {:.0}), EF{} (strength {:.2})",
            self.tornado_count,
            pos.x,
            pos.y,
            tornado.ef_rating(),
            strength
        );
        events.push(SessionEvent::TornadoSpawned {
            event: self.tornado_count,
            pos,
            ef: tornado.ef_rating(),
        });
        self.tornado = Some(tornado);
        self.phase = TornadoPhase::Active;
        true
    }

    fn update_active<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        remaining_secs: f32,
        terrain: &mut Terrain,
        rng: &mut R,
        events: &mut Vec<SessionEvent>,
    ) {
        let bounds = self.bounds;
        let Some(tornado) = self.tornado.as_mut() else {
            // Lost the tornado without retiring it
            self.retire(remaining_secs, rng, events);
            return;
        };

        let ef_before = tornado.ef_rating();
        tornado.advance(dt, rng);
        tornado.steer(dt, rng, terrain, &bounds);
        let ef_after = tornado.ef_rating();
        if ef_after != ef_before {
            events.push(SessionEvent::StrengthChanged {
                from: ef_before,
                to: ef_after,
            });
        }

        if bounds.near_edge(tornado.pos, EDGE_BUFFER) {
            self.retire(remaining_secs, rng, events);
            return;
        }

        for tile in terrain.destroy_within(tornado.pos, tornado.destruction_radius()) {
            log::debug!("Destroyed {} at ({}, {})", tile.kind.as_str(), tile.tx, tile.ty);
            events.push(SessionEvent::TileDestroyed {
                tx: tile.tx,
                ty: tile.ty,
                was: tile.kind,
            });
        }
    }

    /// Stop everything: the tornado is removed and nothing else is scheduled
    pub fn halt(&mut self) {
        if self.tornado.take().is_some() {
            log::info!("Tornado {} removed at session end", self.tornado_count);
        }
        self.phase = TornadoPhase::Ended;
        self.grace = None;
    }

    /// End the live tornado and schedule what comes next.
    /// Returns false if no tornado was live.
    pub fn retire<R: Rng + ?Sized>(
        &mut self,
        remaining_secs: f32,
        rng: &mut R,
        events: &mut Vec<SessionEvent>,
    ) -> bool {
        if self.phase != TornadoPhase::Active {
            log::debug!("Retire ignored in phase {}", self.phase.as_str());
            return false;
        }
        let had_tornado = self.tornado.take().is_some();
        self.phase = TornadoPhase::Ended;
        events.push(SessionEvent::TornadoDissipated {
            event: self.tornado_count,
        });
        log::info!("Tornado {} dissipated", self.tornado_count);

        if self.tornado_count < MAX_EVENTS && remaining_secs > MIN_SECS_FOR_NEXT {
            let delay = if self.tornado_count == 1 {
                rng.random_range(FIRST_GAP.0..=FIRST_GAP.1)
            } else {
                let hi = LATER_GAP.1.min(remaining_secs - RESERVE_SECS);
                rng.random_range(LATER_GAP.0..=hi.max(LATER_GAP.0))
            };
            self.phase = TornadoPhase::Waiting;
            self.countdown = delay;
            log::info!("Next tornado in {:.1}s", delay);
        } else if self.tornado_count == MAX_EVENTS {
            self.grace = Some(FINAL_GRACE_SECS);
        } else {
            log::info!("Not enough time left for another tornado");
        }
        had_tornado
    }
}
