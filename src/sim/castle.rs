//! The castle: takes laser fire, retaliates, and respawns when destroyed

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geom::{self, Aabb, Spatial};
use super::pickup::PickupKind;
use super::state::Session;
use crate::config::GameConfig;
use crate::consts::*;

/// What a castle defeat leaves behind
#[derive(Debug, Clone, PartialEq)]
pub struct CastleDefeat {
    /// Castle center at the moment it fell
    pub fell_at: Vec2,
    /// Pickups to place on the field
    pub loot: Vec<(PickupKind, Vec2)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Castle {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub health: f32,
    pub max_health: f32,
    world_size: f32,
}

impl Castle {
    /// Place a fresh castle at a random spot clear of `avoid`
    pub fn new<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R, avoid: &[Aabb]) -> Self {
        let mut castle = Self::at(Vec2::ZERO, config.castle_size, config.castle_max_health, config.world_size);
        castle.relocate(rng, avoid);
        castle
    }

    /// Castle at a fixed position
    pub fn at(pos: Vec2, size: Vec2, max_health: f32, world_size: f32) -> Self {
        Self {
            pos,
            size,
            health: max_health,
            max_health,
            world_size,
        }
    }

    /// Pick a new random spot, margin-respecting, clear of `avoid` when possible
    pub fn relocate<R: Rng + ?Sized>(&mut self, rng: &mut R, avoid: &[Aabb]) {
        self.pos = geom::random_clear_top_left(
            rng,
            self.world_size,
            self.size,
            SPAWN_MARGIN,
            avoid,
            PLACEMENT_ATTEMPTS,
        );
    }

    /// Full health at a new spot
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R, avoid: &[Aabb]) {
        self.health = self.max_health;
        self.relocate(rng, avoid);
    }

    /// Apply laser damage
    ///
    /// On the hit that takes health to 0 the castle drops its loot, bumps the
    /// session damage multiplier, and respawns in place with full health. The
    /// returned record carries the loot for the caller to place.
    pub fn take_damage<R: Rng + ?Sized>(
        &mut self,
        amount: f32,
        session: &mut Session,
        rng: &mut R,
        avoid: &[Aabb],
    ) -> Option<CastleDefeat> {
        if amount <= 0.0 || self.health <= 0.0 {
            return None;
        }
        self.health = (self.health - amount).max(0.0);
        if self.health > 0.0 {
            return None;
        }

        let fell_at = self.center();
        let loot = self.drop_loot(rng);
        session.record_castle_defeat();
        self.reset(rng, avoid);
        log::info!(
            "Castle destroyed at ({:.0}, {:.0}); defeats={}, multiplier={:.1}, respawned at ({:.0}, {:.0})",
            fell_at.x,
            fell_at.y,
            session.castles_destroyed,
            session.castle_damage_multiplier,
            self.pos.x,
            self.pos.y
        );
        Some(CastleDefeat { fell_at, loot })
    }

    /// Two stardust bundles and a health pack scattered around the castle
    fn drop_loot<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<(PickupKind, Vec2)> {
        let center = self.center();
        [PickupKind::StardustBundle, PickupKind::StardustBundle, PickupKind::Health]
            .into_iter()
            .map(|kind| {
                let offset = Vec2::new(
                    rng.random_range(-CASTLE_LOOT_SCATTER..=CASTLE_LOOT_SCATTER),
                    rng.random_range(-CASTLE_LOOT_SCATTER..=CASTLE_LOOT_SCATTER),
                );
                (kind, center + offset)
            })
            .collect()
    }

    /// Direction of a counter-laser aimed at `target`, if it is not on top of the castle
    pub fn aim_at(&self, target: Vec2) -> Option<Vec2> {
        geom::direction_to(self.center(), target)
    }
}

impl Spatial for Castle {
    fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn scenario_castle() -> Castle {
        Castle::at(Vec2::new(100.0, 100.0), Vec2::splat(50.0), CASTLE_MAX_HEALTH, 5000.0)
    }

    #[test]
    fn test_thirteen_hits_destroy_the_castle() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut session = Session::default();
        let mut castle = scenario_castle();

        for hit in 1..=12 {
            assert!(castle.take_damage(2.0, &mut session, &mut rng, &[]).is_none(), "hit {hit}");
        }
        assert_eq!(castle.health, 1.0);

        let defeat = castle
            .take_damage(2.0, &mut session, &mut rng, &[])
            .expect("13th hit destroys the castle");
        assert_eq!(defeat.fell_at, Vec2::new(125.0, 125.0));
        assert_eq!(castle.health, CASTLE_MAX_HEALTH);
        assert_eq!(session.castles_destroyed, 1);
        assert!((session.castle_damage_multiplier - 1.1).abs() < 1e-6);
    }

    #[test]
    fn test_defeat_loot_and_relocation() {
        let mut rng = Pcg32::seed_from_u64(99);
        let mut session = Session::default();
        let mut castle = scenario_castle();
        castle.health = 1.0;

        let defeat = castle.take_damage(5.0, &mut session, &mut rng, &[]).expect("defeat");
        assert_eq!(defeat.loot.len(), 3);
        let bundles = defeat
            .loot
            .iter()
            .filter(|(k, _)| *k == PickupKind::StardustBundle)
            .count();
        assert_eq!(bundles, 2);
        assert!(defeat.loot.iter().any(|(k, _)| *k == PickupKind::Health));
        for (_, pos) in &defeat.loot {
            let offset = *pos - defeat.fell_at;
            assert!(offset.x.abs() <= CASTLE_LOOT_SCATTER && offset.y.abs() <= CASTLE_LOOT_SCATTER);
        }
        assert!(castle.bounds().within_inset(5000.0, SPAWN_MARGIN));
    }

    #[test]
    fn test_multiplier_compounds_across_defeats() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut session = Session::default();
        let mut castle = scenario_castle();
        for _ in 0..3 {
            castle.health = 1.0;
            assert!(castle.take_damage(1.0, &mut session, &mut rng, &[]).is_some());
        }
        assert_eq!(session.castles_destroyed, 3);
        assert!((session.castle_damage_multiplier - 1.3).abs() < 1e-5);
    }

    #[test]
    fn test_relocation_avoids_player() {
        let mut rng = Pcg32::seed_from_u64(8);
        let config = GameConfig {
            world_size: 400.0,
            ..Default::default()
        };
        let player = Aabb::from_center(Vec2::splat(200.0), Vec2::splat(25.0));
        for _ in 0..50 {
            let castle = Castle::new(&config, &mut rng, &[player]);
            assert!(!castle.bounds().overlaps(&player));
        }
    }

    #[test]
    fn test_aim_at_guards_zero_distance() {
        let castle = scenario_castle();
        assert_eq!(castle.aim_at(castle.center()), None);
        assert_eq!(castle.aim_at(Vec2::new(125.0, 500.0)), Some(Vec2::Y));
    }

    proptest! {
        #[test]
        fn prop_damage_never_heals_or_underflows(amount in -10.0f32..40.0, start in 0.5f32..=25.0) {
            let mut rng = Pcg32::seed_from_u64(0);
            let mut session = Session::default();
            let mut castle = scenario_castle();
            castle.health = start;
            let defeated = castle.take_damage(amount, &mut session, &mut rng, &[]).is_some();
            if defeated {
                prop_assert_eq!(castle.health, castle.max_health);
            } else {
                prop_assert!(castle.health > 0.0);
                prop_assert!(castle.health <= start);
            }
        }
    }
}
