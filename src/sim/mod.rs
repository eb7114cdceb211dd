//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick, no wall-clock time
//! - Stable iteration order (level order for platforms and coins)
//! - No rendering or platform dependencies

pub mod collision;
pub mod input;
pub mod state;
pub mod tick;

pub use collision::{Aabb, CollisionReport, collect_coins, resolve, resolve_platforms};
pub use input::{Action, InputState, KeyBindings, TickInput};
pub use state::{Coin, GameState, Platform, generate_coins, generate_platforms};
pub use tick::{TickOutcome, tick};
