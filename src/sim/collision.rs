//! Collision detection and response for axis-aligned boxes
//!
//! Only two interactions exist: the player landing on a platform and the
//! player touching a coin. Both are box/box tests in screen space (+y is down).

use glam::Vec2;

use super::state::{Coin, GameState, Platform};
use crate::consts::*;

/// Axis-aligned bounding box in screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    /// Strict horizontal overlap (touching edges do not count)
    #[inline]
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.max().x > other.min.x && self.min.x < other.max().x
    }

    /// Strict overlap on both axes
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.overlaps_x(other) && self.max().y > other.min.y && self.min.y < other.max().y
    }
}

impl From<&Platform> for Aabb {
    fn from(p: &Platform) -> Self {
        Aabb::new(Vec2::new(p.x, p.y), Vec2::new(p.width, p.height))
    }
}

impl From<&Coin> for Aabb {
    fn from(c: &Coin) -> Self {
        Aabb::new(Vec2::new(c.x, c.y), Vec2::splat(COIN_SIZE))
    }
}

/// The player's hit-box at its current position
#[inline]
pub fn player_box(state: &GameState) -> Aabb {
    Aabb::new(
        Vec2::new(state.player_x, state.player_y),
        Vec2::splat(PLAYER_SIZE),
    )
}

/// What collision resolution did during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Index of the platform the player was snapped onto
    pub landed_on: Option<usize>,
    /// Number of coins picked up
    pub coins_collected: u32,
}

/// Whether a descending player box should land on `platform`
///
/// The player's bottom edge must lie inside the platform's vertical span
/// (inclusive on both ends).
pub fn lands_on(player: &Aabb, velocity_y: f32, platform: &Platform) -> bool {
    let plat = Aabb::from(platform);
    let bottom = player.bottom();
    velocity_y >= 0.0
        && player.overlaps_x(&plat)
        && bottom >= plat.min.y
        && bottom <= plat.bottom()
}

/// Snap the player onto the first eligible platform in level order
///
/// First match wins, not the closest one.
pub fn resolve_platforms(state: &mut GameState) -> Option<usize> {
    let player = player_box(state);
    let index = state
        .platforms
        .iter()
        .position(|p| lands_on(&player, state.velocity_y, p))?;

    let platform = state.platforms[index];
    state.player_y = platform.y - PLAYER_SIZE;
    state.velocity_y = 0.0;
    Some(index)
}

/// Collect every uncollected coin overlapping the player
pub fn collect_coins(state: &mut GameState) -> u32 {
    let player = player_box(state);
    let mut collected = 0;
    for coin in state.coins.iter_mut().filter(|c| !c.collected) {
        if player.overlaps(&Aabb::from(&*coin)) {
            coin.collected = true;
            collected += 1;
        }
    }
    state.score += u64::from(collected) * COIN_VALUE;
    collected
}

/// Run platform landing then coin pickup
pub fn resolve(state: &mut GameState) -> CollisionReport {
    let landed_on = resolve_platforms(state);
    let coins_collected = collect_coins(state);
    CollisionReport {
        landed_on,
        coins_collected,
    }
}
