//! Storm Chaser entry point
//!
//! On the web the JS renderer drives `WasmSession`; this only sets up
//! logging. Natively it runs a headless session with an autopilot chaser
//! and logs a summary.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger init failed: {}", e).into());
    }
    log::info!("Storm Chaser ready");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use storm_chaser::Settings;
    use storm_chaser::consts::{MAX_SUBSTEPS, SIM_DT};
    use storm_chaser::sim::kinematics::filming_radius;
    use storm_chaser::sim::photo::{FULL_AIM_SECS, IDEAL_DISTANCE_MAX, IDEAL_DISTANCE_MIN};
    use storm_chaser::sim::{SessionEvent, SessionState, TickInput, format_speed, tick};

    /// Render frame length the headless loop pretends to run at
    const FRAME_DT: f32 = 1.0 / 30.0;
    /// Autopilot top speed (game units/s)
    const CHASER_SPEED: f32 = 220.0;

    /// Demo driver: keeps filming distance and shoots whenever it can
    struct Autopilot {
        pos: Vec2,
        aim_secs: f32,
    }

    impl Autopilot {
        fn new(pos: Vec2) -> Self {
            Self { pos, aim_secs: 0.0 }
        }

        fn drive(&mut self, state: &SessionState, dt: f32) -> TickInput {
            let Some(tornado) = state.current_tornado() else {
                self.aim_secs = 0.0;
                return TickInput {
                    player_pos: Some(self.pos),
                    ..Default::default()
                };
            };

            // Head for the point at filming distance on our side of the funnel
            let away = (self.pos - tornado.pos).normalize_or(Vec2::Y);
            let goal = tornado.pos + away * filming_radius(tornado.strength);
            let step = (goal - self.pos).clamp_length_max(CHASER_SPEED * dt);
            // Never fully stall, even when starting on a building
            let grip = state.terrain.speed_modifier_at(self.pos.x, self.pos.y).max(0.3);
            let next = self.pos + step * grip;
            if !state
                .query_at(next.x, next.y)
                .is_some_and(|t| t.collidable)
            {
                self.pos = next;
            }

            let distance = self.pos.distance(tornado.pos);
            let in_range = (IDEAL_DISTANCE_MIN..=IDEAL_DISTANCE_MAX).contains(&distance);
            let aiming = in_range && self.aim_secs < FULL_AIM_SECS;
            self.aim_secs = if aiming { self.aim_secs + dt } else { 0.0 };

            TickInput {
                player_pos: Some(self.pos),
                aiming,
                pause: false,
            }
        }
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let mut seed = None;
        let mut settings = Settings::load();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => match args.next() {
                    Some(path) => settings = Settings::load_from_path(std::path::Path::new(&path)),
                    None => log::warn!("--config needs a path"),
                },
                other => match other.parse::<u64>() {
                    Ok(s) => seed = Some(s),
                    Err(_) => log::warn!("Ignoring argument {:?}", other),
                },
            }
        }
        let seed = seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

        let mut state = SessionState::new(seed, settings);
        let mut pilot = Autopilot::new(state.settings.bounds().center());
        let mut accumulator = 0.0;
        let mut destroyed = 0usize;
        let mut top_speed: f32 = 0.0;

        while !state.is_over() {
            accumulator += FRAME_DT;
            let mut substeps = 0;
            while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = pilot.drive(&state, SIM_DT);
                tick(&mut state, &input, SIM_DT);
                accumulator -= SIM_DT;
                substeps += 1;
            }

            if let Some(t) = state.current_tornado() {
                top_speed = top_speed.max(t.move_speed());
            }
            for event in state.drain_events() {
                match event {
                    SessionEvent::TileDestroyed { .. } => destroyed += 1,
                    SessionEvent::StrengthChanged { from, to } => {
                        log::info!("Tornado EF{} -> EF{}", from, to);
                    }
                    SessionEvent::PhotoTaken { score, quality } => {
                        log::info!("Snap! {} ({})", score, quality.as_str());
                    }
                    _ => {}
                }
            }
        }

        log::info!(
            "Seed {}: {} after {:.1}s, score {}, {} photos, {} tiles flattened, top speed {}",
            seed,
            state.end_cause.map(|c| c.as_str()).unwrap_or("unknown"),
            state.elapsed,
            state.score,
            state.photos().len(),
            destroyed,
            format_speed(top_speed)
        );
        if let Some(best) = state.best_photo() {
            log::info!(
                "Best photo: {} pts, {} at {:.0} units",
                best.score,
                best.quality.as_str(),
                best.distance
            );
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Storm Chaser (native, headless) starting...");
    headless::run();
}
