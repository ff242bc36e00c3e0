//! The player: movement, pickups, shooting, damage and timed statuses

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::{Aabb, Spatial};
use super::pickup::{Pickup, PickupEffect, PickupKind};
use super::progression::Progression;
use super::projectile::{Projectile, ProjectileKind};
use super::state::Session;
use super::status::{StatusKind, StatusTable};
use crate::config::GameConfig;
use crate::consts::*;

/// Logical movement intent (8-way)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    /// Combine held arrow keys into an intent (opposing keys: left beats right, up beats down)
    pub fn from_keys(left: bool, right: bool, up: bool, down: bool) -> Option<Self> {
        let horizontal = if left {
            Some(Direction::Left)
        } else if right {
            Some(Direction::Right)
        } else {
            None
        };
        let vertical = if up {
            Some(Direction::Up)
        } else if down {
            Some(Direction::Down)
        } else {
            None
        };
        match (horizontal, vertical) {
            (Some(Direction::Left), Some(Direction::Up)) => Some(Direction::UpLeft),
            (Some(Direction::Left), Some(Direction::Down)) => Some(Direction::DownLeft),
            (Some(Direction::Right), Some(Direction::Up)) => Some(Direction::UpRight),
            (Some(Direction::Right), Some(Direction::Down)) => Some(Direction::DownRight),
            (Some(h), None) => Some(h),
            (None, v) => v,
            _ => None,
        }
    }

    /// Unit step along the single axis that moves this tick
    ///
    /// Precedence is left > right > up > down, so diagonals resolve to their
    /// horizontal component.
    pub fn step_axis(self) -> Vec2 {
        match self {
            Direction::Left | Direction::UpLeft | Direction::DownLeft => Vec2::NEG_X,
            Direction::Right | Direction::UpRight | Direction::DownRight => Vec2::X,
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Center position
    pub pos: Vec2,
    /// Unit vector of the last accepted move; lasers fly this way
    pub facing: Vec2,
    pub half_size: f32,
    pub health: f32,
    pub max_health: f32,
    /// Currency spent on shots
    pub stardust: u32,
    pub statuses: StatusTable,
    pub last_fired_ms: Option<u64>,
    /// Lasers in flight
    pub lasers: Vec<Projectile>,
    pub progress: Progression,
    world_size: f32,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            pos: Vec2::splat(config.world_size / 2.0),
            facing: Vec2::X,
            half_size: PLAYER_HALF_SIZE,
            health: config.player_max_health,
            max_health: config.player_max_health,
            stardust: 0,
            statuses: StatusTable::default(),
            last_fired_ms: None,
            lasers: Vec::new(),
            progress: Progression::default(),
            world_size: config.world_size,
        }
    }

    /// Back to a fresh session (the player object itself is kept)
    pub fn reset(&mut self, config: &GameConfig) {
        *self = Self::new(config);
    }

    pub fn level(&self) -> u32 {
        self.progress.level
    }

    /// Current movement speed, boosted while a speed boost is held
    pub fn speed(&self) -> f32 {
        PLAYER_BASE_SPEED * self.statuses.magnitude(StatusKind::SpeedBoost).unwrap_or(1.0)
    }

    /// Damage of the next laser
    pub fn damage(&self) -> f32 {
        PLAYER_BASE_DAMAGE * self.statuses.magnitude(StatusKind::DoubleDamage).unwrap_or(1.0)
    }

    pub fn shoot_interval_ms(&self) -> u64 {
        self.statuses
            .magnitude(StatusKind::RapidFire)
            .map_or(SHOOT_INTERVAL_MS, |ms| ms as u64)
    }

    pub fn is_invincible(&self, now: u64) -> bool {
        self.statuses.is_active(StatusKind::Invincibility, now)
    }

    /// Try one step; returns whether it was accepted
    ///
    /// A step that would overlap the castle or cross the border wall is
    /// rejected outright: position and facing stay as they were.
    pub fn move_intent(&mut self, direction: Direction, castle: &Aabb) -> bool {
        let step = direction.step_axis();
        let candidate = self.pos + step * self.speed();
        let bounds = Aabb::from_center(candidate, self.half_extents());

        if bounds.overlaps(castle) || !bounds.within_inset(self.world_size, BORDER_THICKNESS) {
            return false;
        }
        self.pos = candidate;
        self.facing = step;
        true
    }

    pub fn in_reach(&self, pickup: &Pickup) -> bool {
        self.pos.distance(pickup.pos) < self.half_size + PICKUP_SIZE / 2.0
    }

    /// Consume every pickup within reach
    ///
    /// Each collected pickup is removed from `pickups` as it is applied, so it
    /// can never be collected twice. Returns the kinds collected, in order.
    pub fn collect(
        &mut self,
        pickups: &mut Vec<Pickup>,
        session: &mut Session,
        config: &GameConfig,
        now: u64,
    ) -> Vec<PickupKind> {
        let mut collected = Vec::new();
        pickups.retain(|pickup| {
            if !self.in_reach(pickup) {
                return true;
            }
            self.apply_pickup(pickup.kind, config, now);
            if pickup.kind.is_power_up() {
                session.power_up_removed();
            }
            collected.push(pickup.kind);
            false
        });
        collected
    }

    pub fn apply_pickup(&mut self, kind: PickupKind, config: &GameConfig, now: u64) {
        match kind.effect(config) {
            PickupEffect::AddStardust(amount) => {
                self.stardust = (self.stardust + amount).min(STARDUST_CAP);
            }
            PickupEffect::Heal(amount) => self.heal(amount),
            PickupEffect::Status {
                kind,
                duration_ms,
                magnitude,
            } => self.statuses.apply(kind, now, duration_ms, magnitude),
        }
    }

    /// Cadence gate applied by the orchestrator before `fire`
    pub fn can_fire(&self, now: u64) -> bool {
        self.last_fired_ms
            .is_none_or(|last| now.saturating_sub(last) >= self.shoot_interval_ms())
    }

    /// Launch a laser along `facing`
    ///
    /// Free while rapid fire is active, otherwise costs stardust. Returns
    /// false (and fires nothing) when the player cannot pay.
    pub fn fire(&mut self, now: u64, id: u32) -> bool {
        if !self.statuses.is_active(StatusKind::RapidFire, now) {
            if self.stardust < SHOT_COST {
                return false;
            }
            self.stardust -= SHOT_COST;
        }
        self.lasers.push(Projectile::new(
            id,
            ProjectileKind::PlayerLaser,
            self.pos,
            self.facing,
            self.damage(),
        ));
        self.last_fired_ms = Some(now);
        true
    }

    /// Returns true if health actually changed hands
    pub fn take_damage(&mut self, amount: f32, now: u64) -> bool {
        if amount <= 0.0 || self.is_invincible(now) {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        true
    }

    pub fn heal(&mut self, amount: f32) {
        if amount > 0.0 {
            self.health = (self.health + amount).min(self.max_health);
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Sweep expired statuses; derived speed, damage and cadence fall back to base
    pub fn tick_statuses(&mut self, now: u64) -> Vec<StatusKind> {
        self.statuses.expire(now)
    }

    /// Award experience; each level gained raises max health (current health is not topped up)
    pub fn gain_experience(&mut self, amount: u32) -> u32 {
        let gained = self.progress.gain(amount);
        self.max_health += MAX_HEALTH_PER_LEVEL * gained as f32;
        gained
    }
}

impl Spatial for Player {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn half_extents(&self) -> Vec2 {
        Vec2::splat(self.half_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player() -> Player {
        Player::new(&GameConfig::default())
    }

    fn far_castle() -> Aabb {
        Aabb::from_top_left(Vec2::new(100.0, 100.0), Vec2::splat(50.0))
    }

    fn pickup(id: u32, kind: PickupKind, pos: Vec2) -> Pickup {
        Pickup { id, kind, pos }
    }

    #[test]
    fn test_direction_precedence() {
        assert_eq!(Direction::from_keys(true, true, false, false), Some(Direction::Left));
        assert_eq!(Direction::from_keys(false, false, true, true), Some(Direction::Up));
        assert_eq!(Direction::from_keys(false, true, false, true), Some(Direction::DownRight));
        assert_eq!(Direction::from_keys(false, false, false, false), None);

        assert_eq!(Direction::UpLeft.step_axis(), Vec2::NEG_X);
        assert_eq!(Direction::DownRight.step_axis(), Vec2::X);
        assert_eq!(Direction::Up.step_axis(), Vec2::NEG_Y);
    }

    #[test]
    fn test_accepted_move_updates_facing() {
        let mut p = player();
        let start = p.pos;
        assert!(p.move_intent(Direction::Up, &far_castle()));
        assert_eq!(p.pos, start + Vec2::new(0.0, -5.0));
        assert_eq!(p.facing, Vec2::NEG_Y);

        // Diagonal moves horizontally only
        assert!(p.move_intent(Direction::DownLeft, &far_castle()));
        assert_eq!(p.pos, start + Vec2::new(-5.0, -5.0));
        assert_eq!(p.facing, Vec2::NEG_X);
    }

    #[test]
    fn test_move_into_castle_rejected() {
        let mut p = player();
        // Castle edge 3 units right of the player's box
        let castle = Aabb::from_top_left(p.pos + Vec2::new(28.0, -25.0), Vec2::splat(50.0));
        p.facing = Vec2::NEG_Y;
        let before = p.pos;
        assert!(!p.move_intent(Direction::Right, &castle));
        assert_eq!(p.pos, before);
        assert_eq!(p.facing, Vec2::NEG_Y);
    }

    #[test]
    fn test_move_across_border_rejected() {
        let mut p = player();
        // Left edge of the box sits 2 units from the wall
        p.pos = Vec2::new(BORDER_THICKNESS + p.half_size + 2.0, 500.0);
        let before = p.pos;
        assert!(!p.move_intent(Direction::Left, &far_castle()));
        assert_eq!(p.pos, before);
        assert_eq!(p.facing, Vec2::X);
        // Moving away from the wall is fine
        assert!(p.move_intent(Direction::Right, &far_castle()));
    }

    #[test]
    fn test_speed_boost_scales_step() {
        let config = GameConfig::default();
        let mut p = player();
        p.apply_pickup(PickupKind::SpeedBoost, &config, 0);
        let start = p.pos;
        assert!(p.move_intent(Direction::Right, &far_castle()));
        assert_eq!(p.pos.x - start.x, 7.5);
    }

    #[test]
    fn test_collect_multiple_and_once() {
        let config = GameConfig::default();
        let mut session = Session::default();
        let mut p = player();
        session.power_ups_on_field = 1;
        let mut pickups = vec![
            pickup(1, PickupKind::Stardust, p.pos + Vec2::new(10.0, 0.0)),
            pickup(2, PickupKind::StardustBundle, p.pos - Vec2::new(0.0, 30.0)),
            pickup(3, PickupKind::Invincibility, p.pos),
            pickup(4, PickupKind::Stardust, p.pos + Vec2::new(40.0, 0.0)),
        ];

        let collected = p.collect(&mut pickups, &mut session, &config, 0);
        assert_eq!(
            collected,
            vec![PickupKind::Stardust, PickupKind::StardustBundle, PickupKind::Invincibility]
        );
        assert_eq!(p.stardust, 6);
        assert!(p.is_invincible(0));
        assert_eq!(session.power_ups_on_field, 0);
        assert_eq!(pickups.len(), 1);
        assert_eq!(pickups[0].id, 4);

        // Nothing left in reach: a second pass collects nothing
        assert!(p.collect(&mut pickups, &mut session, &config, 0).is_empty());
        assert_eq!(p.stardust, 6);
    }

    #[test]
    fn test_stardust_and_health_caps() {
        let config = GameConfig::default();
        let mut p = player();
        p.stardust = 98;
        p.apply_pickup(PickupKind::StardustBundle, &config, 0);
        assert_eq!(p.stardust, STARDUST_CAP);

        p.health = 95.0;
        p.apply_pickup(PickupKind::Health, &config, 0);
        assert_eq!(p.health, p.max_health);
        p.health = 50.0;
        p.apply_pickup(PickupKind::HealingBonus, &config, 0);
        assert_eq!(p.health, 55.0);
    }

    #[test]
    fn test_fire_costs_stardust() {
        let mut p = player();
        assert!(!p.fire(0, 1));
        assert!(p.lasers.is_empty());

        p.stardust = 2;
        p.facing = Vec2::NEG_Y;
        assert!(p.fire(0, 1));
        assert_eq!(p.stardust, 1);
        assert_eq!(p.lasers.len(), 1);
        assert_eq!(p.lasers[0].dir, Vec2::NEG_Y);
        assert_eq!(p.lasers[0].damage, PLAYER_BASE_DAMAGE);
        assert_eq!(p.last_fired_ms, Some(0));
    }

    #[test]
    fn test_rapid_fire_is_free_and_fast() {
        let config = GameConfig::default();
        let mut p = player();
        p.apply_pickup(PickupKind::RapidFire, &config, 1_000);
        assert_eq!(p.shoot_interval_ms(), RAPID_FIRE_INTERVAL_MS);
        assert!(p.fire(1_000, 1));
        assert!(!p.can_fire(1_100));
        assert!(p.can_fire(1_200));
        assert!(p.fire(1_200, 2));
        assert_eq!(p.stardust, 0);
        assert_eq!(p.lasers.len(), 2);
    }

    #[test]
    fn test_double_damage_lasers() {
        let config = GameConfig::default();
        let mut p = player();
        p.stardust = 1;
        p.apply_pickup(PickupKind::DoubleDamage, &config, 0);
        assert!(p.fire(0, 1));
        assert_eq!(p.lasers[0].damage, 4.0);
    }

    #[test]
    fn test_invincibility_expiry_scenario() {
        let config = GameConfig::default();
        let mut p = player();
        p.apply_pickup(PickupKind::Invincibility, &config, 0);

        assert!(!p.take_damage(30.0, 5_000));
        assert_eq!(p.health, 100.0);

        let expired = p.tick_statuses(10_001);
        assert_eq!(expired, vec![StatusKind::Invincibility]);
        assert!(p.take_damage(30.0, 10_001));
        assert_eq!(p.health, 70.0);
    }

    #[test]
    fn test_tick_statuses_restores_base_values() {
        let config = GameConfig::default();
        let mut p = player();
        p.apply_pickup(PickupKind::SpeedBoost, &config, 0);
        p.apply_pickup(PickupKind::DoubleDamage, &config, 5_000);
        p.apply_pickup(PickupKind::RapidFire, &config, 0);

        p.tick_statuses(10_001);
        assert_eq!(p.speed(), PLAYER_BASE_SPEED);
        assert_eq!(p.shoot_interval_ms(), SHOOT_INTERVAL_MS);
        assert_eq!(p.damage(), 4.0);

        p.tick_statuses(15_001);
        assert_eq!(p.damage(), PLAYER_BASE_DAMAGE);
    }

    #[test]
    fn test_level_up_raises_max_health_only() {
        let mut p = player();
        p.health = 80.0;
        assert_eq!(p.gain_experience(10), 1);
        assert_eq!(p.level(), 2);
        assert_eq!(p.max_health, 105.0);
        assert_eq!(p.health, 80.0);
    }

    proptest! {
        #[test]
        fn prop_take_damage_clamps(start in 0.0f32..=100.0, amount in -50.0f32..500.0) {
            let mut p = player();
            p.health = start;
            p.take_damage(amount, 0);
            prop_assert!(p.health >= 0.0);
            prop_assert!(p.health <= start);
        }
    }
}
