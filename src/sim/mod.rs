//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (collection order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod geometry;
pub mod player;
pub mod score;
pub mod state;
pub mod tick;

pub use collision::{COLLISION_RULES, CollisionRule, Group};
pub use entity::{
    Beam, Body, Bomb, BombParams, Enemy, EnemyParams, EnemyState, Explosion, Gravity,
    ScreenPulse, Shield,
};
pub use geometry::{Aabb, Hitbox, direction_to, in_bounds};
pub use player::{Expression, Facing, HeldDirections, Mode, Player};
pub use score::Score;
pub use state::{GameEvent, GamePhase, GameState, PowerUp, Rejection};
pub use tick::{TickInput, purchase, tick};
