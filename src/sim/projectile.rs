//! Lasers and orbs
//!
//! Every projectile flies in a straight line at a per-kind speed. Each tick it
//! either leaves the world, hits the first matching target, or keeps flying.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Spatial;
use crate::consts::*;

/// Projectile families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Fired by the player; hits the castle, wizards and pickups
    PlayerLaser,
    /// Fired by the castle when struck; hits the player
    CastleLaser,
    /// Fired by wizards; hits the player
    WizardOrb,
}

impl ProjectileKind {
    /// World units per tick
    pub fn speed(self) -> f32 {
        match self {
            ProjectileKind::PlayerLaser => LASER_SPEED,
            ProjectileKind::CastleLaser => CASTLE_LASER_SPEED,
            ProjectileKind::WizardOrb => ORB_SPEED,
        }
    }

    pub fn half_size(self) -> f32 {
        match self {
            ProjectileKind::PlayerLaser | ProjectileKind::CastleLaser => LASER_HALF_SIZE,
            ProjectileKind::WizardOrb => ORB_HALF_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub kind: ProjectileKind,
    pub pos: Vec2,
    /// Unit direction of travel
    pub dir: Vec2,
    /// Damage dealt on hit, fixed when fired
    pub damage: f32,
}

impl Projectile {
    pub fn new(id: u32, kind: ProjectileKind, pos: Vec2, dir: Vec2, damage: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            dir,
            damage,
        }
    }

    pub fn advance(&mut self) {
        self.pos += self.dir * self.kind.speed();
    }

    pub fn in_world(&self, world_size: f32) -> bool {
        (0.0..=world_size).contains(&self.pos.x) && (0.0..=world_size).contains(&self.pos.y)
    }
}

impl Spatial for Projectile {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn half_extents(&self) -> Vec2 {
        Vec2::splat(self.kind.half_size())
    }
}

/// Move every projectile one step and drop those that left the world
///
/// Returns how many were removed.
pub fn advance_all(projectiles: &mut Vec<Projectile>, world_size: f32) -> usize {
    let before = projectiles.len();
    projectiles.retain_mut(|p| {
        p.advance();
        p.in_world(world_size)
    });
    before - projectiles.len()
}

/// Index of the first target the projectile overlaps, ignoring those `skip` rejects
pub fn first_hit<T: Spatial>(
    projectile: &Projectile,
    targets: &[T],
    skip: impl Fn(&T) -> bool,
) -> Option<usize> {
    targets
        .iter()
        .position(|t| !skip(t) && projectile.overlaps(t))
}
