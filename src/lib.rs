//! Castle Defense - top-down arcade survival simulation core
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (entities, collisions, spawning, progression)
//! - `config`: Construction-time game configuration
//! - `error`: Fatal configuration errors
//!
//! Rendering, audio, input polling and persistence live outside this crate.
//! They read [`sim::GameState`] and feed [`sim::TickInput`] once per tick.

pub mod config;
pub mod error;
pub mod sim;

pub use config::GameConfig;
pub use error::ConfigError;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const SIM_HZ: u64 = 60;
    /// Simulation clock advance per tick (ms)
    pub const SIM_TICK_MS: u64 = 1000 / SIM_HZ;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playable area side length (square, origin top-left)
    pub const WORLD_SIZE: f32 = 5000.0;
    /// Wall thickness the player may not cross
    pub const BORDER_THICKNESS: f32 = 25.0;
    /// Inset used when placing spawned objects
    pub const SPAWN_MARGIN: f32 = 10.0;
    /// Retries when looking for an unoccupied spawn position
    pub const PLACEMENT_ATTEMPTS: u32 = 16;

    /// Player defaults
    pub const PLAYER_HALF_SIZE: f32 = 25.0;
    pub const PLAYER_BASE_SPEED: f32 = 5.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    pub const PLAYER_BASE_DAMAGE: f32 = 2.0;
    pub const SHOOT_INTERVAL_MS: u64 = 500;
    pub const SHOT_COST: u32 = 1;
    pub const STARDUST_CAP: u32 = 100;

    /// Timed effects
    pub const STATUS_DURATION_MS: u64 = 10_000;
    pub const BOOST_MULTIPLIER: f32 = 1.5;
    pub const DOUBLE_DAMAGE_MULTIPLIER: f32 = 2.0;
    pub const RAPID_FIRE_INTERVAL_MS: u64 = 200;

    /// Progression
    pub const LEVEL_CAP: u32 = 25;
    pub const MAX_HEALTH_PER_LEVEL: f32 = 5.0;
    pub const CASTLE_XP: u32 = 10;
    pub const WIZARD_XP: u32 = 5;

    /// Projectiles (speeds are world units per tick)
    pub const LASER_SPEED: f32 = 10.0;
    pub const LASER_HALF_SIZE: f32 = 2.5;
    pub const CASTLE_LASER_SPEED: f32 = 10.0;
    pub const CASTLE_LASER_BASE_DAMAGE: f32 = 2.0;
    pub const ORB_SPEED: f32 = 3.0;
    pub const ORB_HALF_SIZE: f32 = 8.0;
    pub const ORB_DAMAGE: f32 = 5.0;

    /// Castle
    pub const CASTLE_SIZE: f32 = 50.0;
    pub const CASTLE_MAX_HEALTH: f32 = 25.0;
    pub const CASTLE_LOOT_SCATTER: f32 = 30.0;
    pub const CASTLE_MULTIPLIER_STEP: f32 = 0.1;

    /// Wizards
    pub const WIZARD_HALF_SIZE: f32 = 25.0;
    pub const WIZARD_SPEED: f32 = 2.0;
    pub const WIZARD_MAX_HEALTH: f32 = 25.0;
    pub const WIZARD_SHOT_INTERVAL_MS: u64 = 4000;
    pub const WIZARD_MIN_APPROACH: f32 = 100.0;
    pub const WIZARD_RESPAWN_DELAY_MS: u64 = 5000;

    /// Pickups
    pub const PICKUP_SIZE: f32 = 30.0;
    pub const PICKUP_CAP: usize = 100;
    pub const POWER_UP_CAP: u32 = 4;
    pub const INITIAL_PICKUPS: usize = 40;
}
