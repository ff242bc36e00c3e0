//! Castle Defense headless runner
//!
//! Stands in for the window/input/render layers: feeds frame times into a
//! fixed-timestep accumulator, drives the player with a simple autopilot and
//! logs what happened.
//!
//! Usage: `castle-defense [config.json] [seconds] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod runner {
    use castle_defense::consts::*;
    use castle_defense::sim::{Direction, GameEvent, GamePhase, GameState, Spatial, TickInput, tick};

    /// Simulated frame length handed to the accumulator (30 fps display)
    const FRAME_MS: f64 = 1000.0 / 30.0;
    /// Below this much stardust the autopilot goes foraging
    const LOW_STARDUST: u32 = 5;
    /// Vertical slack when lining up a shot on the castle
    const AIM_TOLERANCE: f32 = 20.0;
    /// Horizontal distance the autopilot closes before it stops walking
    const FIRING_RANGE: f32 = 300.0;

    /// Fixed-timestep driver around a game state
    pub struct Runner {
        pub state: GameState,
        accumulator: f64,
        pub runs: u32,
        pub summary: Summary,
    }

    #[derive(Debug, Default)]
    pub struct Summary {
        pub castles: u32,
        pub wizards: u32,
        pub pickups: u32,
        pub hits_taken: u32,
        pub best_level: u32,
    }

    impl Runner {
        pub fn new(state: GameState) -> Self {
            Self {
                state,
                accumulator: 0.0,
                runs: 1,
                summary: Summary::default(),
            }
        }

        /// Run simulation ticks for one frame
        pub fn frame(&mut self, dt_ms: f64) {
            self.accumulator += dt_ms.min(100.0);

            let step = SIM_TICK_MS as f64;
            let mut substeps = 0;
            while self.accumulator >= step && substeps < MAX_SUBSTEPS {
                let input = autopilot(&self.state);
                tick(&mut self.state, &input);
                self.accumulator -= step;
                substeps += 1;
            }

            for event in self.state.drain_events() {
                self.record(&event);
            }

            if self.state.phase == GamePhase::GameOver {
                self.runs += 1;
                let restart = TickInput {
                    restart: true,
                    ..Default::default()
                };
                tick(&mut self.state, &restart);
                self.state.drain_events();
            }
        }

        fn record(&mut self, event: &GameEvent) {
            match event {
                GameEvent::CastleDestroyed { .. } => self.summary.castles += 1,
                GameEvent::WizardKilled { .. } => self.summary.wizards += 1,
                GameEvent::PickupCollected { .. } => self.summary.pickups += 1,
                GameEvent::PlayerHit { .. } => self.summary.hits_taken += 1,
                GameEvent::LevelUp { level } => {
                    self.summary.best_level = self.summary.best_level.max(*level);
                }
                GameEvent::GameOver { level } => {
                    log::info!("Run {} over at level {}", self.runs, level);
                }
                _ => {}
            }
        }
    }

    /// Forage when low on stardust, otherwise line up on the castle and shoot
    fn autopilot(state: &GameState) -> TickInput {
        let player = &state.player;
        let low = player.stardust < LOW_STARDUST && player.shoot_interval_ms() == SHOOT_INTERVAL_MS;

        if low {
            let nearest = state
                .pickups
                .iter()
                .min_by(|a, b| {
                    let da = a.pos.distance_squared(player.pos);
                    let db = b.pos.distance_squared(player.pos);
                    da.total_cmp(&db)
                });
            return TickInput {
                movement: nearest.and_then(|p| steer(player.pos, p.pos, player.speed())),
                ..Default::default()
            };
        }

        let target = state.castle.center();
        let dy = target.y - player.pos.y;
        let dx = target.x - player.pos.x;
        if dy.abs() > AIM_TOLERANCE {
            let movement = if dy < 0.0 { Direction::Up } else { Direction::Down };
            return TickInput {
                movement: Some(movement),
                ..Default::default()
            };
        }

        let toward = if dx < 0.0 { Direction::Left } else { Direction::Right };
        let facing_castle = player.facing.x.signum() == dx.signum() && player.facing.y == 0.0;
        TickInput {
            movement: (dx.abs() > FIRING_RANGE || !facing_castle).then_some(toward),
            fire: facing_castle,
            ..Default::default()
        }
    }

    fn steer(from: glam::Vec2, to: glam::Vec2, speed: f32) -> Option<Direction> {
        let delta = to - from;
        Direction::from_keys(
            delta.x < -speed,
            delta.x > speed,
            delta.y < -speed,
            delta.y > speed,
        )
    }

    pub fn frame_ms() -> f64 {
        FRAME_MS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{Instant, SystemTime, UNIX_EPOCH};

    use castle_defense::{GameConfig, sim::GameState};

    env_logger::init();
    log::info!("Castle Defense (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match args.first().filter(|path| path.as_str() != "-") {
        Some(path) => match GameConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("{err}");
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    };

    let seconds = match args.get(1).map(|s| s.parse::<u64>()) {
        Some(Ok(seconds)) => seconds,
        Some(Err(err)) => {
            log::warn!("Ignoring bad duration ({err}); running 60s");
            60
        }
        None => 60,
    };

    let seed = args
        .get(2)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

    let state = match GameState::new(config, seed) {
        Ok(state) => state,
        Err(err) => {
            log::error!("Invalid game config: {err}");
            std::process::exit(1);
        }
    };

    let mut runner = runner::Runner::new(state);
    let started = Instant::now();
    let frames = (seconds as f64 * 1000.0 / runner::frame_ms()).ceil() as u64;
    for _ in 0..frames {
        runner.frame(runner::frame_ms());
    }

    let state = &runner.state;
    let summary = &runner.summary;
    log::info!(
        "Simulated {}s ({} ticks) in {:.1?}",
        seconds,
        state.ticks,
        started.elapsed()
    );
    log::info!(
        "Runs: {}, castles: {}, wizards: {}, pickups: {}, hits taken: {}, best level: {}",
        runner.runs,
        summary.castles,
        summary.wizards,
        summary.pickups,
        summary.hits_taken,
        summary.best_level.max(state.player.level())
    );
    log::info!(
        "Final: level {}, health {:.0}/{:.0}, stardust {}, castle multiplier {:.1}",
        state.player.level(),
        state.player.health,
        state.player.max_health,
        state.player.stardust,
        state.session.castle_damage_multiplier
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser shell drives `castle_defense::sim::tick` directly
}
