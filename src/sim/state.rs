//! Game state and core simulation types
//!
//! Everything a renderer or score keeper needs lives in `GameState`.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A static rectangular platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Platform {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A collectible coin (top-left corner of its hit-box)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub x: f32,
    pub y: f32,
    /// Flips false -> true once and never reverts
    pub collected: bool,
}

impl Coin {
    pub const fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            collected: false,
        }
    }
}

/// Complete game state for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// True while the tick loop is active
    pub running: bool,
    /// Terminal flag, set when the player falls past the bottom edge
    pub game_over: bool,
    /// Score (never decreases within a run)
    pub score: u64,
    /// Player box top-left corner
    pub player_x: f32,
    pub player_y: f32,
    /// Vertical velocity; exactly 0.0 means grounded or at apex
    pub velocity_y: f32,
    /// Level geometry, fixed for the run
    pub platforms: Vec<Platform>,
    pub coins: Vec<Coin>,
    /// Number of ticks advanced this run
    #[serde(default)]
    pub ticks: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Idle state shown before the first run starts
    pub fn new() -> Self {
        Self {
            running: false,
            game_over: false,
            score: 0,
            player_x: SPAWN_X,
            player_y: SPAWN_Y,
            velocity_y: 0.0,
            platforms: generate_platforms(),
            coins: generate_coins(),
            ticks: 0,
        }
    }

    /// Fresh state for a new run, already running
    pub fn fresh_run() -> Self {
        Self {
            running: true,
            ..Self::new()
        }
    }

    /// Whether a tick would advance this state
    #[inline]
    pub fn is_active(&self) -> bool {
        self.running && !self.game_over
    }

    /// Coins still available for pickup
    pub fn remaining_coins(&self) -> usize {
        self.coins.iter().filter(|c| !c.collected).count()
    }
}

/// Fixed level layout; the first entry is the ground
pub fn generate_platforms() -> Vec<Platform> {
    vec![
        Platform::new(0.0, 550.0, 800.0, 50.0),
        Platform::new(200.0, 450.0, 150.0, 20.0),
        Platform::new(450.0, 350.0, 150.0, 20.0),
        Platform::new(150.0, 250.0, 150.0, 20.0),
        Platform::new(500.0, 200.0, 150.0, 20.0),
        Platform::new(300.0, 150.0, 150.0, 20.0),
    ]
}

/// Fixed coin placement, mostly just above each platform
pub fn generate_coins() -> Vec<Coin> {
    vec![
        Coin::new(260.0, 400.0),
        Coin::new(510.0, 300.0),
        Coin::new(210.0, 200.0),
        Coin::new(560.0, 150.0),
        Coin::new(360.0, 100.0),
        Coin::new(400.0, 500.0),
        Coin::new(650.0, 450.0),
    ]
}
