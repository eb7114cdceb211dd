//! Jump and Run - A coin-collecting 2D platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `engine`: Run lifecycle, tick scheduling and snapshot broadcast
//! - `render`: Draw list generation from a state snapshot
//! - `highscores`: Score history store
//! - `persistence`: Key-value storage backends
//! - `settings`: Persisted player preferences (key bindings)
//! - `platform`: Browser/native platform abstraction
//! - `ui`: HUD state and game-over bookkeeping

pub mod engine;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod render;
pub mod settings;
pub mod sim;
pub mod ui;

pub use engine::{Engine, ManualScheduler, Scheduler, SubscriptionId, TickHandle};
pub use highscores::{HighScoreEntry, PersistentScoreStore, ScoreLog, ScoreStore};
pub use persistence::{MemoryStorage, Storage, StoreError};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Logical canvas dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Player box edge length
    pub const PLAYER_SIZE: f32 = 30.0;
    /// Coin hit-box edge length
    pub const COIN_SIZE: f32 = 20.0;

    /// Downward acceleration applied every tick
    pub const GRAVITY: f32 = 0.5;
    /// Vertical velocity set by a jump (negative = up)
    pub const JUMP_STRENGTH: f32 = -12.0;
    /// Horizontal displacement per tick while a direction is held
    pub const MOVE_SPEED: f32 = 5.0;

    /// Points awarded per coin
    pub const COIN_VALUE: u64 = 100;

    /// Player spawn point (top-left corner)
    pub const SPAWN_X: f32 = 100.0;
    pub const SPAWN_Y: f32 = 450.0;
}
