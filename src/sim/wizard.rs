//! Wizards and the population that spawns them
//!
//! A wizard walks toward the player until it is close enough, then holds
//! its ground and lobs orbs on a fixed cadence. The population grows by one
//! wizard per respawn interval until it matches the player's level.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geom::{self, Aabb, Spatial};
use super::projectile::{Projectile, ProjectileKind};
use super::state::EntityIds;
use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wizard {
    pub id: u32,
    /// Center position
    pub pos: Vec2,
    pub health: f32,
    pub max_health: f32,
    /// Angle toward the player (radians, cosmetic)
    pub facing: f32,
    pub last_shot_ms: u64,
    /// Orbs in flight; they vanish with the wizard
    pub orbs: Vec<Projectile>,
}

impl Wizard {
    /// New wizard; its first shot comes one full cadence after `now`
    pub fn new(id: u32, pos: Vec2, now: u64) -> Self {
        Self {
            id,
            pos,
            health: WIZARD_MAX_HEALTH,
            max_health: WIZARD_MAX_HEALTH,
            facing: 0.0,
            last_shot_ms: now,
            orbs: Vec::new(),
        }
    }

    /// Move, face and shoot for one tick
    pub fn update(&mut self, now: u64, target: Vec2, castle: &Aabb, ids: &mut EntityIds) {
        self.step_toward(target, castle);
        let to_target = target - self.pos;
        if to_target != Vec2::ZERO {
            self.facing = to_target.y.atan2(to_target.x);
        }
        self.try_shoot(now, target, ids);
    }

    /// One step toward `target` unless already within approach range
    ///
    /// A step that would overlap the castle is rejected whole.
    pub fn step_toward(&mut self, target: Vec2, castle: &Aabb) -> bool {
        if self.pos.distance(target) <= WIZARD_MIN_APPROACH {
            return false;
        }
        let Some(dir) = geom::direction_to(self.pos, target) else {
            return false;
        };
        let candidate = self.pos + dir * WIZARD_SPEED;
        if Aabb::from_center(candidate, self.half_extents()).overlaps(castle) {
            return false;
        }
        self.pos = candidate;
        true
    }

    /// Fire an orb at `target` if the cadence allows
    pub fn try_shoot(&mut self, now: u64, target: Vec2, ids: &mut EntityIds) -> bool {
        if now.saturating_sub(self.last_shot_ms) < WIZARD_SHOT_INTERVAL_MS {
            return false;
        }
        let Some(dir) = geom::direction_to(self.pos, target) else {
            return false;
        };
        self.orbs.push(Projectile::new(
            ids.next(),
            ProjectileKind::WizardOrb,
            self.pos,
            dir,
            ORB_DAMAGE,
        ));
        self.last_shot_ms = now;
        true
    }

    pub fn take_damage(&mut self, amount: f32) {
        if amount > 0.0 {
            self.health = (self.health - amount).max(0.0);
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

impl Spatial for Wizard {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn half_extents(&self) -> Vec2 {
        Vec2::splat(WIZARD_HALF_SIZE)
    }
}

/// Live wizards plus the respawn clock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardPopulation {
    pub wizards: Vec<Wizard>,
    pub last_spawn_ms: u64,
    pub respawn_delay_ms: u64,
}

impl WizardPopulation {
    pub fn new(respawn_delay_ms: u64, now: u64) -> Self {
        Self {
            wizards: Vec::new(),
            last_spawn_ms: now,
            respawn_delay_ms,
        }
    }

    pub fn len(&self) -> usize {
        self.wizards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wizards.is_empty()
    }

    pub fn reset(&mut self, now: u64) {
        self.wizards.clear();
        self.last_spawn_ms = now;
    }

    /// True when below the level bound and the respawn delay has elapsed
    pub fn should_spawn(&self, now: u64, level: u32) -> bool {
        self.wizards.len() < level as usize
            && now.saturating_sub(self.last_spawn_ms) >= self.respawn_delay_ms
    }

    /// Spawn at most one wizard this tick; returns its id
    ///
    /// The new wizard is placed clear of `avoid` and of every live wizard
    /// when a free spot turns up within the placement budget.
    pub fn try_spawn<R: Rng + ?Sized>(
        &mut self,
        now: u64,
        level: u32,
        rng: &mut R,
        ids: &mut EntityIds,
        world_size: f32,
        avoid: &[Aabb],
    ) -> Option<u32> {
        if !self.should_spawn(now, level) {
            return None;
        }
        let mut blocked: Vec<Aabb> = avoid.to_vec();
        blocked.extend(self.wizards.iter().map(|w| w.bounds()));

        let size = Vec2::splat(WIZARD_HALF_SIZE * 2.0);
        let top_left =
            geom::random_clear_top_left(rng, world_size, size, SPAWN_MARGIN, &blocked, PLACEMENT_ATTEMPTS);
        let id = ids.next();
        self.wizards.push(Wizard::new(id, top_left + size * 0.5, now));
        self.last_spawn_ms = now;
        log::debug!("Wizard {} spawned ({} alive, level {})", id, self.wizards.len(), level);
        Some(id)
    }

    /// Advance every wizard one tick
    pub fn update_all(&mut self, now: u64, target: Vec2, castle: &Aabb, ids: &mut EntityIds) {
        for wizard in &mut self.wizards {
            wizard.update(now, target, castle, ids);
        }
    }

    /// Remove and return every dead wizard
    pub fn remove_dead(&mut self) -> Vec<Wizard> {
        let (dead, alive): (Vec<_>, Vec<_>) = self.wizards.drain(..).partition(Wizard::is_dead);
        self.wizards = alive;
        dead
    }
}
