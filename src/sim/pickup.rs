//! Pickup kinds, their effects and the spawn-weight table

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geom::Spatial;
use super::status::StatusKind;
use crate::config::GameConfig;
use crate::consts::*;

/// Everything that can lie on the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// +1 stardust
    Stardust,
    /// +5 stardust
    StardustBundle,
    /// +10 health (castle loot)
    Health,
    /// +5 health (wizard loot)
    HealingBonus,
    SpeedBoost,
    Invincibility,
    DoubleDamage,
    RapidFire,
}

/// What collecting a pickup does to the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickupEffect {
    AddStardust(u32),
    Heal(f32),
    Status {
        kind: StatusKind,
        duration_ms: u64,
        magnitude: f32,
    },
}

/// Relative weights for regular (non power-up) field spawns
pub const SPAWN_WEIGHTS: [(PickupKind, u32); 4] = [
    (PickupKind::Stardust, 3),
    (PickupKind::StardustBundle, 1),
    (PickupKind::HealingBonus, 1),
    (PickupKind::SpeedBoost, 1),
];

impl PickupKind {
    /// World-capped timed power-ups
    pub const POWER_UPS: [PickupKind; 3] = [
        PickupKind::Invincibility,
        PickupKind::DoubleDamage,
        PickupKind::RapidFire,
    ];

    pub fn is_power_up(self) -> bool {
        Self::POWER_UPS.contains(&self)
    }

    pub fn effect(self, config: &GameConfig) -> PickupEffect {
        match self {
            PickupKind::Stardust => PickupEffect::AddStardust(1),
            PickupKind::StardustBundle => PickupEffect::AddStardust(5),
            PickupKind::Health => PickupEffect::Heal(10.0),
            PickupKind::HealingBonus => PickupEffect::Heal(5.0),
            PickupKind::SpeedBoost => PickupEffect::Status {
                kind: StatusKind::SpeedBoost,
                duration_ms: config.boost_duration_ms,
                magnitude: BOOST_MULTIPLIER,
            },
            PickupKind::Invincibility => PickupEffect::Status {
                kind: StatusKind::Invincibility,
                duration_ms: config.invincibility_duration_ms,
                magnitude: 1.0,
            },
            PickupKind::DoubleDamage => PickupEffect::Status {
                kind: StatusKind::DoubleDamage,
                duration_ms: config.double_damage_duration_ms,
                magnitude: DOUBLE_DAMAGE_MULTIPLIER,
            },
            PickupKind::RapidFire => PickupEffect::Status {
                kind: StatusKind::RapidFire,
                duration_ms: config.rapid_fire_duration_ms,
                magnitude: RAPID_FIRE_INTERVAL_MS as f32,
            },
        }
    }

    /// Weighted draw from [`SPAWN_WEIGHTS`]
    pub fn roll_regular<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let total: u32 = SPAWN_WEIGHTS.iter().map(|(_, w)| w).sum();
        let mut roll = rng.random_range(0..total);
        for (kind, weight) in SPAWN_WEIGHTS {
            if roll < weight {
                return kind;
            }
            roll -= weight;
        }
        PickupKind::Stardust
    }

    /// Uniform draw among the power-ups
    pub fn roll_power_up<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::POWER_UPS[rng.random_range(0..Self::POWER_UPS.len())]
    }
}

/// A pickup lying on the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    /// Center position
    pub pos: Vec2,
}

impl Spatial for Pickup {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn half_extents(&self) -> Vec2 {
        Vec2::splat(PICKUP_SIZE / 2.0)
    }
}
