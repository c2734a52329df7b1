//! Deterministic round simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Aabb, collisions};
pub use state::{
    FallingExpression, GameEvent, GamePhase, GameState, Player, RoundEnd, ShapeKind,
};
pub use tick::{TickInput, spawn_wave, tick};
