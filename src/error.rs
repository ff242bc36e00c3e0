//! Fatal configuration errors
//!
//! The simulation itself never fails at runtime: health and currency are
//! clamped and degenerate directions are skipped. Anything that cannot be
//! clamped into shape is rejected once, at startup, as a [`ConfigError`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// An object cannot be placed inside the world margins
    #[error("{entity} of size {size} does not fit a world of side {world_size} with margin {margin}")]
    DoesNotFit {
        entity: &'static str,
        size: f32,
        world_size: f32,
        margin: f32,
    },

    /// No spot for the castle that keeps clear of the starting player
    #[error("castle of size {castle} needs room beside the player, only {room} available")]
    CastleCrowdsPlayer { castle: f32, room: f32 },

    /// A numeric setting that must be strictly positive
    #[error("{name} must be positive and finite, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("power-up cap {power_up_cap} exceeds pickup cap {pickup_cap}")]
    PowerUpCapTooLarge { power_up_cap: u32, pickup_cap: usize },

    #[error("initial pickup count {initial} exceeds pickup cap {pickup_cap}")]
    TooManyInitialPickups { initial: usize, pickup_cap: usize },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}
