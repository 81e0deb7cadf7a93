//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod path;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::Aabb;
pub use path::{CubicSegment, FlightPath, Motion, Mover};
pub use spawn::{SpawnKind, kind_for_roll, roll_triggers_spawn};
pub use state::{
    Body, Effect, EffectKind, EntityId, EntityKind, GameEvent, GamePhase, GameState, Lives,
    Obstacle, ObstacleKind, Pickup, PickupKind, Projectile, Ship, Sprite,
};
pub use tick::{TickInput, tick};
pub use timer::{TimedAction, TimerQueue};
