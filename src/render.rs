//! Draw list generation for 2D primitives
//!
//! `draw_list` turns a snapshot into canvas commands; the platform layer
//! paints them. Nothing here feeds back into the simulation.

use glam::Vec2;

use crate::consts::*;
use crate::sim::GameState;

pub const BACKGROUND_COLOR: &str = "#F0F4F8";
pub const PRIMARY_COLOR: &str = "#0066CC";
pub const SECONDARY_COLOR: &str = "#FFFFFF";
pub const COIN_COLOR: &str = "#FFD700";
pub const COIN_RIM_COLOR: &str = "#FFA500";
pub const PLATFORM_COLOR: &str = "#4A90E2";

pub const SCORE_FONT: &str = "bold 24px Arial";

/// Optional outline around a filled shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: &'static str,
    pub width: f32,
}

/// A single canvas drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole canvas
    Clear { color: &'static str, size: Vec2 },
    Rect {
        pos: Vec2,
        size: Vec2,
        fill: &'static str,
        stroke: Option<Stroke>,
    },
    Circle {
        center: Vec2,
        radius: f32,
        fill: &'static str,
        stroke: Option<Stroke>,
    },
    Text {
        pos: Vec2,
        text: String,
        font: &'static str,
        color: &'static str,
    },
}

/// Build the draw commands for one frame, back to front
pub fn draw_list(state: &GameState) -> Vec<DrawCommand> {
    let mut cmds = Vec::with_capacity(state.platforms.len() + state.coins.len() + 3);

    cmds.push(DrawCommand::Clear {
        color: BACKGROUND_COLOR,
        size: Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT),
    });

    for p in &state.platforms {
        cmds.push(DrawCommand::Rect {
            pos: Vec2::new(p.x, p.y),
            size: Vec2::new(p.width, p.height),
            fill: PLATFORM_COLOR,
            stroke: Some(Stroke {
                color: PRIMARY_COLOR,
                width: 2.0,
            }),
        });
    }

    let half = COIN_SIZE / 2.0;
    for coin in state.coins.iter().filter(|c| !c.collected) {
        cmds.push(DrawCommand::Circle {
            center: Vec2::new(coin.x + half, coin.y + half),
            radius: half,
            fill: COIN_COLOR,
            stroke: Some(Stroke {
                color: COIN_RIM_COLOR,
                width: 2.0,
            }),
        });
    }

    cmds.push(DrawCommand::Rect {
        pos: Vec2::new(state.player_x, state.player_y),
        size: Vec2::splat(PLAYER_SIZE),
        fill: PRIMARY_COLOR,
        stroke: Some(Stroke {
            color: SECONDARY_COLOR,
            width: 3.0,
        }),
    });

    cmds.push(DrawCommand::Text {
        pos: Vec2::new(20.0, 40.0),
        text: format!("Score: {}", state.score),
        font: SCORE_FONT,
        color: PRIMARY_COLOR,
    });

    cmds
}
