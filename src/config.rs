//! Game configuration
//!
//! Fixed at construction time. Every field defaults to the matching constant
//! in [`crate::consts`], so a JSON override only needs the keys it changes.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Construction-time settings for one game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === World ===
    /// Side length of the square playable area
    pub world_size: f32,

    // === Castle ===
    /// Castle footprint (width, height)
    pub castle_size: Vec2,
    pub castle_max_health: f32,

    // === Player ===
    pub player_max_health: f32,

    // === Timed effects (ms) ===
    pub boost_duration_ms: u64,
    pub invincibility_duration_ms: u64,
    pub double_damage_duration_ms: u64,
    pub rapid_fire_duration_ms: u64,

    // === Spawning ===
    /// Maximum pickups on the field (loot drops may exceed it)
    pub pickup_cap: usize,
    /// Maximum power-ups on the field
    pub power_up_cap: u32,
    /// Pickups placed when a session starts or restarts
    pub initial_pickups: usize,
    pub wizard_respawn_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_size: WORLD_SIZE,

            castle_size: Vec2::splat(CASTLE_SIZE),
            castle_max_health: CASTLE_MAX_HEALTH,

            player_max_health: PLAYER_MAX_HEALTH,

            boost_duration_ms: STATUS_DURATION_MS,
            invincibility_duration_ms: STATUS_DURATION_MS,
            double_damage_duration_ms: STATUS_DURATION_MS,
            rapid_fire_duration_ms: STATUS_DURATION_MS,

            pickup_cap: PICKUP_CAP,
            power_up_cap: POWER_UP_CAP,
            initial_pickups: INITIAL_PICKUPS,
            wizard_respawn_delay_ms: WIZARD_RESPAWN_DELAY_MS,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject settings the simulation cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("world_size", self.world_size as f64)?;
        positive("castle_size.x", self.castle_size.x as f64)?;
        positive("castle_size.y", self.castle_size.y as f64)?;
        positive("castle_max_health", self.castle_max_health as f64)?;
        positive("player_max_health", self.player_max_health as f64)?;
        positive("boost_duration_ms", self.boost_duration_ms as f64)?;
        positive("invincibility_duration_ms", self.invincibility_duration_ms as f64)?;
        positive("double_damage_duration_ms", self.double_damage_duration_ms as f64)?;
        positive("rapid_fire_duration_ms", self.rapid_fire_duration_ms as f64)?;
        positive("wizard_respawn_delay_ms", self.wizard_respawn_delay_ms as f64)?;

        self.fits("castle", self.castle_size.max_element(), SPAWN_MARGIN)?;
        self.fits("pickup", PICKUP_SIZE, SPAWN_MARGIN)?;
        self.fits("wizard", WIZARD_HALF_SIZE * 2.0, SPAWN_MARGIN)?;
        self.fits("player", PLAYER_HALF_SIZE * 2.0, BORDER_THICKNESS)?;

        // The player starts centered; the castle needs a corner clear of it
        let beside_player = self.world_size / 2.0 - PLAYER_HALF_SIZE;
        if self.castle_size.min_element() + SPAWN_MARGIN > beside_player {
            return Err(ConfigError::CastleCrowdsPlayer {
                castle: self.castle_size.min_element(),
                room: beside_player - SPAWN_MARGIN,
            });
        }

        if self.power_up_cap as usize > self.pickup_cap {
            return Err(ConfigError::PowerUpCapTooLarge {
                power_up_cap: self.power_up_cap,
                pickup_cap: self.pickup_cap,
            });
        }
        if self.initial_pickups > self.pickup_cap {
            return Err(ConfigError::TooManyInitialPickups {
                initial: self.initial_pickups,
                pickup_cap: self.pickup_cap,
            });
        }
        Ok(())
    }

    fn fits(&self, entity: &'static str, size: f32, margin: f32) -> Result<(), ConfigError> {
        if size + 2.0 * margin > self.world_size {
            return Err(ConfigError::DoesNotFit {
                entity,
                size,
                world_size: self.world_size,
                margin,
            });
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.castle_max_health, 25.0);
        assert_eq!(config.player_max_health, 100.0);
        assert_eq!(config.power_up_cap, 4);
        assert_eq!(config.pickup_cap, 100);
        assert_eq!(config.wizard_respawn_delay_ms, 5000);
    }

    #[test]
    fn test_partial_json_override() {
        let config = GameConfig::from_json(r#"{ "world_size": 2000.0, "power_up_cap": 2 }"#)
            .expect("valid override");
        assert_eq!(config.world_size, 2000.0);
        assert_eq!(config.power_up_cap, 2);
        // Untouched keys keep their defaults
        assert_eq!(config.boost_duration_ms, STATUS_DURATION_MS);
    }

    #[test]
    fn test_castle_too_large_is_rejected() {
        let config = GameConfig {
            world_size: 100.0,
            castle_size: Vec2::new(90.0, 40.0),
            ..Default::default()
        };
        match config.validate() {
            Err(ConfigError::DoesNotFit { entity, .. }) => assert_eq!(entity, "castle"),
            other => panic!("expected DoesNotFit, got {other:?}"),
        }
    }

    #[test]
    fn test_castle_must_fit_beside_player() {
        // Every entity fits on its own, but the castle cannot clear the centered player
        let crowded = GameConfig {
            world_size: 150.0,
            ..Default::default()
        };
        assert!(matches!(
            crowded.validate(),
            Err(ConfigError::CastleCrowdsPlayer { .. })
        ));

        // 50 + 10 exactly fills the 60 units left of the player's box
        let snug = GameConfig {
            world_size: 170.0,
            ..Default::default()
        };
        assert!(snug.validate().is_ok());
    }

    #[test]
    fn test_zero_duration_is_rejected() {
        let config = GameConfig {
            rapid_fire_duration_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { name: "rapid_fire_duration_ms", .. })
        ));
    }

    #[test]
    fn test_cap_ordering() {
        let config = GameConfig {
            pickup_cap: 3,
            power_up_cap: 4,
            initial_pickups: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PowerUpCapTooLarge { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            GameConfig::from_json("{ world_size: "),
            Err(ConfigError::Json(_))
        ));
    }
}
