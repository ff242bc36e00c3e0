//! Timed status effects
//!
//! One slot per effect kind. Applying an effect that is already active
//! overwrites its expiry, so a player never holds two copies of the same
//! status. Expiry is checked against the simulation clock sampled once per
//! tick.

use serde::{Deserialize, Serialize};

/// Effect kinds a player can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    /// Movement speed multiplier
    SpeedBoost,
    /// Damage immunity
    Invincibility,
    /// Laser damage multiplier
    DoubleDamage,
    /// Shortened shoot cadence (magnitude is the interval in ms), free shots
    RapidFire,
}

impl StatusKind {
    pub const ALL: [StatusKind; 4] = [
        StatusKind::SpeedBoost,
        StatusKind::Invincibility,
        StatusKind::DoubleDamage,
        StatusKind::RapidFire,
    ];

    fn slot(self) -> usize {
        match self {
            StatusKind::SpeedBoost => 0,
            StatusKind::Invincibility => 1,
            StatusKind::DoubleDamage => 2,
            StatusKind::RapidFire => 3,
        }
    }
}

/// A running effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveStatus {
    /// Simulation time (ms) after which the effect ends
    pub expires_at: u64,
    pub magnitude: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusTable {
    slots: [Option<ActiveStatus>; 4],
}

impl StatusTable {
    /// Start (or refresh) an effect
    pub fn apply(&mut self, kind: StatusKind, now: u64, duration_ms: u64, magnitude: f32) {
        self.slots[kind.slot()] = Some(ActiveStatus {
            expires_at: now.saturating_add(duration_ms),
            magnitude,
        });
    }

    pub fn get(&self, kind: StatusKind) -> Option<&ActiveStatus> {
        self.slots[kind.slot()].as_ref()
    }

    /// Magnitude of a held effect, whether or not it has been expired yet
    pub fn magnitude(&self, kind: StatusKind) -> Option<f32> {
        self.get(kind).map(|s| s.magnitude)
    }

    /// True while `now` has not passed the stored expiry
    pub fn is_active(&self, kind: StatusKind, now: u64) -> bool {
        self.get(kind).is_some_and(|s| now <= s.expires_at)
    }

    /// Milliseconds left on an effect (for HUD timers)
    pub fn remaining_ms(&self, kind: StatusKind, now: u64) -> Option<u64> {
        self.get(kind)
            .filter(|s| now <= s.expires_at)
            .map(|s| s.expires_at - now)
    }

    /// Drop every effect whose expiry `now` has passed; returns the kinds removed
    pub fn expire(&mut self, now: u64) -> Vec<StatusKind> {
        let mut expired = Vec::new();
        for kind in StatusKind::ALL {
            let slot = &mut self.slots[kind.slot()];
            if slot.is_some_and(|s| now > s.expires_at) {
                *slot = None;
                expired.push(kind);
            }
        }
        expired
    }

    pub fn clear(&mut self) {
        self.slots = [None; 4];
    }

    /// Held effects, for render consumers
    pub fn iter(&self) -> impl Iterator<Item = (StatusKind, &ActiveStatus)> {
        StatusKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|s| (kind, s)))
    }
}
