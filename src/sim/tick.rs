//! Fixed timestep simulation tick
//!
//! One call advances the world by `SIM_TICK_MS`, in a fixed order:
//! player → projectiles → wizards → collisions → cleanup → spawning.
//! Collision passes only record loot and experience; both are applied during
//! cleanup, so nothing spawned this tick can be hit this tick.

use glam::Vec2;

use super::geom::Spatial;
use super::pickup::PickupKind;
use super::player::{Direction, Player};
use super::projectile::{self, Projectile, ProjectileKind};
use super::state::{GameEvent, GamePhase, GameState};
use super::wizard::Wizard;
use crate::consts::*;

/// Logical intents for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement direction, if any
    pub movement: Option<Direction>,
    /// Fire button held
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Restart request (honored while paused or after game over)
    pub restart: bool,
}

/// Rewards gathered during collision passes
#[derive(Debug, Default)]
struct Pending {
    loot: Vec<(PickupKind, Vec2)>,
    experience: u32,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.restart && state.phase != GamePhase::Playing {
        state.restart();
        return;
    }

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::debug!("Paused at t={}ms", state.time_ms);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::debug!("Resumed at t={}ms", state.time_ms);
            }
            GamePhase::GameOver => {}
        }
    }

    // Nothing moves and no timer runs unless playing
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ms += SIM_TICK_MS;
    state.ticks += 1;
    let now = state.time_ms;
    let world_size = state.config.world_size;
    let mut pending = Pending::default();

    // --- Player ---
    for kind in state.player.tick_statuses(now) {
        log::debug!("{kind:?} expired at t={now}ms");
    }
    if let Some(direction) = input.movement {
        let castle = state.castle.bounds();
        state.player.move_intent(direction, &castle);
    }
    if input.fire && state.player.can_fire(now) {
        let id = state.ids.next();
        state.player.fire(now, id);
    }

    // --- Projectiles ---
    projectile::advance_all(&mut state.player.lasers, world_size);
    projectile::advance_all(&mut state.castle_lasers, world_size);
    for wizard in &mut state.wizards.wizards {
        projectile::advance_all(&mut wizard.orbs, world_size);
    }

    // --- Wizards ---
    let castle = state.castle.bounds();
    state
        .wizards
        .update_all(now, state.player.pos, &castle, &mut state.ids);

    // --- Collisions ---
    collect_pickups(state, now);
    resolve_player_lasers(state, &mut pending);
    resolve_hostile_fire(state, now);

    // --- Cleanup ---
    remove_dead_wizards(state, &mut pending);
    apply_rewards(state, pending);

    // --- Spawning ---
    state.spawn_field_pickup();
    let avoid = [state.castle.bounds(), state.player.bounds()];
    let level = state.player.level();
    if let Some(id) =
        state
            .wizards
            .try_spawn(now, level, &mut state.rng, &mut state.ids, world_size, &avoid)
    {
        state.events.push(GameEvent::WizardSpawned { id });
    }

    if state.player.is_dead() {
        state.phase = GamePhase::GameOver;
        let level = state.player.level();
        state.events.push(GameEvent::GameOver { level });
        log::info!("Game over at t={}ms, level {}", now, level);
    }
}

fn collect_pickups(state: &mut GameState, now: u64) {
    let collected = state
        .player
        .collect(&mut state.pickups, &mut state.session, &state.config, now);
    for kind in collected {
        state.events.push(GameEvent::PickupCollected { kind });
    }
}

/// Player lasers against castle, then wizards, then pickups; first match wins
///
/// A wizard killed earlier in the pass or a pickup already shot is no longer
/// a target, so later lasers fly on instead of hitting a removed entity.
fn resolve_player_lasers(state: &mut GameState, pending: &mut Pending) {
    let lasers = std::mem::take(&mut state.player.lasers);
    let mut in_flight = Vec::with_capacity(lasers.len());
    let mut shot_pickups: Vec<u32> = Vec::new();

    for laser in lasers {
        if laser.overlaps(&state.castle) {
            hit_castle(state, laser.damage, pending);
            continue;
        }
        if let Some(i) = projectile::first_hit(&laser, &state.wizards.wizards, Wizard::is_dead) {
            state.wizards.wizards[i].take_damage(laser.damage);
            continue;
        }
        if let Some(i) =
            projectile::first_hit(&laser, &state.pickups, |p| shot_pickups.contains(&p.id))
        {
            shot_pickups.push(state.pickups[i].id);
            continue;
        }
        in_flight.push(laser);
    }
    state.player.lasers = in_flight;

    if shot_pickups.is_empty() {
        return;
    }
    let session = &mut state.session;
    let events = &mut state.events;
    state.pickups.retain(|p| {
        if !shot_pickups.contains(&p.id) {
            return true;
        }
        if p.kind.is_power_up() {
            session.power_up_removed();
        }
        events.push(GameEvent::PickupDestroyed { kind: p.kind });
        false
    });
}

/// Damage the castle and fire its counter-laser at the player
fn hit_castle(state: &mut GameState, damage: f32, pending: &mut Pending) {
    if let Some(dir) = state.castle.aim_at(state.player.pos) {
        let id = state.ids.next();
        let counter_damage = CASTLE_LASER_BASE_DAMAGE * state.session.castle_damage_multiplier;
        state.castle_lasers.push(Projectile::new(
            id,
            ProjectileKind::CastleLaser,
            state.castle.center(),
            dir,
            counter_damage,
        ));
    }

    let mut avoid = vec![state.player.bounds()];
    avoid.extend(state.wizards.wizards.iter().map(|w| w.bounds()));
    match state
        .castle
        .take_damage(damage, &mut state.session, &mut state.rng, &avoid)
    {
        Some(defeat) => {
            state.events.push(GameEvent::CastleHit { health: 0.0 });
            state.events.push(GameEvent::CastleDestroyed {
                at: defeat.fell_at,
                defeats: state.session.castles_destroyed,
            });
            pending.loot.extend(defeat.loot);
            pending.experience += CASTLE_XP;
        }
        None => state.events.push(GameEvent::CastleHit {
            health: state.castle.health,
        }),
    }
}

/// Castle lasers and wizard orbs against the player
fn resolve_hostile_fire(state: &mut GameState, now: u64) {
    let player = &mut state.player;
    let events = &mut state.events;
    state
        .castle_lasers
        .retain(|laser| !strike_player(player, laser, now, events));
    for wizard in &mut state.wizards.wizards {
        wizard
            .orbs
            .retain(|orb| !strike_player(player, orb, now, events));
    }
}

/// Returns true if the projectile is spent (it hit, even an invincible player)
fn strike_player(
    player: &mut Player,
    projectile: &Projectile,
    now: u64,
    events: &mut Vec<GameEvent>,
) -> bool {
    if !projectile.overlaps(player) {
        return false;
    }
    if player.take_damage(projectile.damage, now) {
        events.push(GameEvent::PlayerHit {
            damage: projectile.damage,
            health: player.health,
        });
    }
    true
}

fn remove_dead_wizards(state: &mut GameState, pending: &mut Pending) {
    for wizard in state.wizards.remove_dead() {
        log::debug!("Wizard {} killed at ({:.0}, {:.0})", wizard.id, wizard.pos.x, wizard.pos.y);
        pending.loot.push((PickupKind::HealingBonus, wizard.pos));
        pending.experience += WIZARD_XP;
        state.events.push(GameEvent::WizardKilled {
            id: wizard.id,
            at: wizard.pos,
        });
    }
}

fn apply_rewards(state: &mut GameState, pending: Pending) {
    let half = PICKUP_SIZE / 2.0;
    let min = Vec2::splat(half);
    let max = Vec2::splat(state.config.world_size - half);
    for (kind, pos) in pending.loot {
        state.spawn_pickup(kind, pos.clamp(min, max));
    }

    if pending.experience == 0 {
        return;
    }
    let before = state.player.level();
    let gained = state.player.gain_experience(pending.experience);
    for level in before + 1..=before + gained {
        log::info!("Level up: {} (max health {})", level, state.player.max_health);
        state.events.push(GameEvent::LevelUp { level });
    }
}
