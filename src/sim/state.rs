//! Game state and session-wide bookkeeping
//!
//! Everything the render layer reads lives here. `GameState` is the only
//! owner of the entity collections; `tick` is the only writer.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::castle::Castle;
use super::geom::{self, Spatial};
use super::pickup::{Pickup, PickupKind};
use super::player::Player;
use super::projectile::Projectile;
use super::wizard::WizardPopulation;
use crate::config::GameConfig;
use crate::consts::*;
use crate::error::ConfigError;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Frozen: no entity moves and no timer runs
    Paused,
    /// Player health reached 0; only a restart is accepted
    GameOver,
}

/// Notable things that happened during a tick, for render/audio consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PickupCollected { kind: PickupKind },
    /// A player laser destroyed a pickup
    PickupDestroyed { kind: PickupKind },
    CastleHit { health: f32 },
    CastleDestroyed { at: Vec2, defeats: u32 },
    WizardSpawned { id: u32 },
    WizardKilled { id: u32, at: Vec2 },
    PlayerHit { damage: f32, health: f32 },
    LevelUp { level: u32 },
    GameOver { level: u32 },
    Restarted,
}

/// Session-wide counters shared by every subsystem
///
/// `castle_damage_multiplier` and `castles_destroyed` persist across castle
/// defeats and reset only on a full restart. `power_ups_on_field` mirrors the
/// field and is reset whenever the field is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Scales castle counter-laser damage; only ever grows within a session
    pub castle_damage_multiplier: f32,
    pub castles_destroyed: u32,
    /// Power-ups currently lying on the field
    pub power_ups_on_field: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            castle_damage_multiplier: 1.0,
            castles_destroyed: 0,
            power_ups_on_field: 0,
        }
    }
}

impl Session {
    pub fn record_castle_defeat(&mut self) {
        self.castles_destroyed += 1;
        self.castle_damage_multiplier += CASTLE_MULTIPLIER_STEP;
    }

    /// A power-up left the field (collected or shot)
    pub fn power_up_removed(&mut self) {
        self.power_ups_on_field = self.power_ups_on_field.saturating_sub(1);
    }
}

/// Monotonic entity id source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Simulation clock (ms); only advances while playing
    pub time_ms: u64,
    /// Simulation tick counter
    pub ticks: u64,
    pub phase: GamePhase,
    pub player: Player,
    pub castle: Castle,
    pub wizards: WizardPopulation,
    /// Counter-lasers fired by the castle
    pub castle_lasers: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    pub session: Session,
    /// Events since the last `drain_events`
    pub events: Vec<GameEvent>,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    pub(crate) ids: EntityIds,
}

impl GameState {
    /// Build a new session; rejects configurations the world cannot hold
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        if let Err(err) = config.validate() {
            log::error!("Rejected game config: {err}");
            return Err(err);
        }

        let mut rng = Pcg32::seed_from_u64(seed);
        let player = Player::new(&config);
        let castle = Castle::new(&config, &mut rng, &[player.bounds()]);
        let wizards = WizardPopulation::new(config.wizard_respawn_delay_ms, 0);

        let mut state = Self {
            config,
            seed,
            time_ms: 0,
            ticks: 0,
            phase: GamePhase::Playing,
            player,
            castle,
            wizards,
            castle_lasers: Vec::new(),
            pickups: Vec::new(),
            session: Session::default(),
            events: Vec::new(),
            rng,
            ids: EntityIds::default(),
        };
        state.seed_pickup_field();

        log::info!(
            "New session: seed={}, world={}, castle at ({:.0}, {:.0})",
            seed,
            state.config.world_size,
            state.castle.pos.x,
            state.castle.pos.y
        );
        Ok(state)
    }

    /// Full restart: player, castle, wizards, field and session counters
    pub fn restart(&mut self) {
        self.player.reset(&self.config);
        let avoid = [self.player.bounds()];
        self.castle.reset(&mut self.rng, &avoid);
        self.wizards.reset(self.time_ms);
        self.castle_lasers.clear();
        self.session = Session::default();
        self.seed_pickup_field();
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::Restarted);
        log::info!("Session restarted at t={}ms", self.time_ms);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        self.ids.next()
    }

    /// Take every event recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Replace the field with the configured number of random pickups
    fn seed_pickup_field(&mut self) {
        self.pickups.clear();
        self.session.power_ups_on_field = 0;
        for _ in 0..self.config.initial_pickups {
            let kind = PickupKind::roll_regular(&mut self.rng);
            let pos = self.random_pickup_position();
            self.spawn_pickup(kind, pos);
        }
    }

    /// Place a pickup, bypassing the field cap (used for loot drops)
    pub fn spawn_pickup(&mut self, kind: PickupKind, pos: Vec2) -> u32 {
        let id = self.ids.next();
        if kind.is_power_up() {
            self.session.power_ups_on_field += 1;
        }
        self.pickups.push(Pickup { id, kind, pos });
        id
    }

    /// Top up the field by one pickup if it is below its cap
    ///
    /// A power-up is placed while fewer than `power_up_cap` are out;
    /// otherwise a weighted regular pickup.
    pub fn spawn_field_pickup(&mut self) -> Option<u32> {
        if self.pickups.len() >= self.config.pickup_cap {
            return None;
        }
        let kind = if self.session.power_ups_on_field < self.config.power_up_cap {
            PickupKind::roll_power_up(&mut self.rng)
        } else {
            PickupKind::roll_regular(&mut self.rng)
        };
        let pos = self.random_pickup_position();
        Some(self.spawn_pickup(kind, pos))
    }

    fn random_pickup_position(&mut self) -> Vec2 {
        let size = Vec2::splat(PICKUP_SIZE);
        geom::random_top_left(&mut self.rng, self.config.world_size, size, SPAWN_MARGIN) + size * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new(GameConfig::default(), 12345).expect("default config");
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.pickups.len(), INITIAL_PICKUPS);
        assert_eq!(state.session.power_ups_on_field, 0);
        assert!(state.pickups.iter().all(|p| !p.kind.is_power_up()));
        assert!(!state.castle.overlaps(&state.player));
        assert!(state.wizards.is_empty());
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let config = GameConfig {
            world_size: 40.0,
            ..Default::default()
        };
        assert!(GameState::new(config, 1).is_err());
    }

    #[test]
    fn test_small_world_keeps_castle_off_player() {
        let config = GameConfig {
            world_size: 170.0,
            pickup_cap: 0,
            power_up_cap: 0,
            initial_pickups: 0,
            ..Default::default()
        };
        for seed in 0..20 {
            let mut state = GameState::new(config.clone(), seed).expect("valid config");
            assert!(!state.castle.overlaps(&state.player), "seed {seed}");
            state.castle.reset(&mut state.rng, &[state.player.bounds()]);
            assert!(!state.castle.overlaps(&state.player), "seed {seed}");
        }
    }

    #[test]
    fn test_field_respects_caps() {
        let config = GameConfig {
            pickup_cap: 10,
            power_up_cap: 2,
            initial_pickups: 5,
            ..Default::default()
        };
        let mut state = GameState::new(config, 7).expect("valid config");
        let mut spawned = 0;
        while state.spawn_field_pickup().is_some() {
            spawned += 1;
        }
        assert_eq!(spawned, 5);
        assert_eq!(state.pickups.len(), 10);
        let power_ups = state.pickups.iter().filter(|p| p.kind.is_power_up()).count();
        assert_eq!(power_ups, 2);
        assert_eq!(state.session.power_ups_on_field, 2);
    }

    #[test]
    fn test_loot_bypasses_cap() {
        let config = GameConfig {
            pickup_cap: 5,
            initial_pickups: 5,
            power_up_cap: 1,
            ..Default::default()
        };
        let mut state = GameState::new(config, 7).expect("valid config");
        assert!(state.spawn_field_pickup().is_none());
        state.spawn_pickup(PickupKind::Health, Vec2::splat(300.0));
        assert_eq!(state.pickups.len(), 6);
    }

    #[test]
    fn test_restart_resets_session() {
        let mut state = GameState::new(GameConfig::default(), 3).expect("default config");
        state.session.record_castle_defeat();
        state.player.stardust = 40;
        state.player.health = 0.0;
        state.phase = GamePhase::GameOver;
        state.pickups.clear();

        state.restart();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.session, Session::default());
        assert_eq!(state.player.stardust, 0);
        assert_eq!(state.player.health, state.player.max_health);
        assert_eq!(state.pickups.len(), INITIAL_PICKUPS);
        assert_eq!(state.drain_events(), vec![GameEvent::Restarted]);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(GameConfig::default(), 1).expect("default config");
        let json = serde_json::to_string(&state).expect("serializable");
        assert!(json.contains("\"phase\":\"Playing\""));
    }
}
