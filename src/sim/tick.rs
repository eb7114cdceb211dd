//! Fixed-step simulation tick
//!
//! One call advances the run by exactly one frame: movement, jump, gravity,
//! fall-out check, then collision resolution.

use super::collision::{self, CollisionReport};
use super::input::TickInput;
use super::state::GameState;
use crate::consts::*;

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// State was not running (paused, idle or already over); nothing changed
    Inert,
    /// State advanced and the run continues
    Advanced(CollisionReport),
    /// State advanced and the player fell out this tick
    GameOver(CollisionReport),
}

impl TickOutcome {
    /// Whether the state was mutated (and so must be broadcast)
    pub fn advanced(&self) -> bool {
        !matches!(self, TickOutcome::Inert)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TickOutcome::GameOver(_))
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) -> TickOutcome {
    if !state.is_active() {
        return TickOutcome::Inert;
    }

    integrate(state, input);
    let report = collision::resolve(state);
    state.ticks += 1;

    if state.game_over {
        TickOutcome::GameOver(report)
    } else {
        TickOutcome::Advanced(report)
    }
}

/// Apply input, gravity and the fall-out check
fn integrate(state: &mut GameState, input: &TickInput) {
    // Each direction clamps on its own, so holding both from the left wall
    // still nets a step to the right.
    if input.left {
        state.player_x = (state.player_x - MOVE_SPEED).max(0.0);
    }
    if input.right {
        state.player_x = (state.player_x + MOVE_SPEED).min(CANVAS_WIDTH - PLAYER_SIZE);
    }

    // Exact comparison is the jump guard: velocity is exactly 0.0 only after
    // a landing snap or at the apex of an arc.
    if input.jump && state.velocity_y == 0.0 {
        state.velocity_y = JUMP_STRENGTH;
    }

    state.velocity_y += GRAVITY;
    state.player_y += state.velocity_y;

    if state.player_y > CANVAS_HEIGHT {
        state.game_over = true;
        state.running = false;
    }
}
