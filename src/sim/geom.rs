//! Axis-aligned collision primitives shared by every entity
//!
//! Everything in the world (player, castle, wizards, projectiles, pickups) is
//! a box with a center and half extents. Overlap is strict: boxes that only
//! touch along an edge do not collide.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn from_top_left(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Strict overlap test (shared edges do not count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// True if the box lies inside a square world shrunk by `inset` on every side
    pub fn within_inset(&self, world_size: f32, inset: f32) -> bool {
        self.min.x >= inset
            && self.min.y >= inset
            && self.max.x <= world_size - inset
            && self.max.y <= world_size - inset
    }
}

/// Anything with a position and a collision box
pub trait Spatial {
    fn center(&self) -> Vec2;

    fn half_extents(&self) -> Vec2;

    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.center(), self.half_extents())
    }

    fn overlaps<T: Spatial + ?Sized>(&self, other: &T) -> bool {
        self.bounds().overlaps(&other.bounds())
    }
}

/// Unit vector from `from` toward `to`, or `None` when the points coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Option<Vec2> {
    (to - from).try_normalize()
}

/// Random top-left corner for an object of `size`, `margin` away from every wall
///
/// Callers guarantee the object fits (checked by `GameConfig::validate`).
pub fn random_top_left<R: Rng + ?Sized>(rng: &mut R, world_size: f32, size: Vec2, margin: f32) -> Vec2 {
    let max_x = (world_size - size.x - margin).max(margin);
    let max_y = (world_size - size.y - margin).max(margin);
    Vec2::new(
        rng.random_range(margin..=max_x),
        rng.random_range(margin..=max_y),
    )
}

/// Random top-left corner that avoids every box in `avoid`
///
/// After `attempts` random tries it falls back to the four margin corners.
/// If those are blocked too it returns the last random candidate, so a
/// crowded world degrades to overlapping spawns instead of stalling the tick.
pub fn random_clear_top_left<R: Rng + ?Sized>(
    rng: &mut R,
    world_size: f32,
    size: Vec2,
    margin: f32,
    avoid: &[Aabb],
    attempts: u32,
) -> Vec2 {
    let is_clear = |pos: Vec2| {
        let bounds = Aabb::from_top_left(pos, size);
        !avoid.iter().any(|b| b.overlaps(&bounds))
    };

    let mut candidate = random_top_left(rng, world_size, size, margin);
    for _ in 1..attempts.max(1) {
        if is_clear(candidate) {
            return candidate;
        }
        candidate = random_top_left(rng, world_size, size, margin);
    }
    if is_clear(candidate) {
        return candidate;
    }

    let far = (Vec2::splat(world_size) - size - Vec2::splat(margin)).max(Vec2::splat(margin));
    let corners = [
        Vec2::splat(margin),
        Vec2::new(far.x, margin),
        Vec2::new(margin, far.y),
        far,
    ];
    corners.into_iter().find(|&c| is_clear(c)).unwrap_or(candidate)
}
