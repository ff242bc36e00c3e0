//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Simulation clock only (pausing stops it)
//! - No rendering or platform dependencies

pub mod castle;
pub mod geom;
pub mod pickup;
pub mod player;
pub mod progression;
pub mod projectile;
pub mod state;
pub mod status;
pub mod tick;
pub mod wizard;

pub use castle::{Castle, CastleDefeat};
pub use geom::{Aabb, Spatial};
pub use pickup::{Pickup, PickupEffect, PickupKind};
pub use player::{Direction, Player};
pub use progression::{Progression, experience_for_level};
pub use projectile::{Projectile, ProjectileKind};
pub use state::{EntityIds, GameEvent, GamePhase, GameState, Session};
pub use status::{ActiveStatus, StatusKind, StatusTable};
pub use tick::{TickInput, tick};
pub use wizard::{Wizard, WizardPopulation};
