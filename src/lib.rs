//! Torchlit - A dark top-down maze game
//!
//! Core modules:
//! - `sim`: Level simulation (movement, collisions, oscillating entities)
//! - `game`: Controller (timer, keys, level sequencing)
//! - `renderer`: Software surface, darkness/light compositing, HUD, WebGPU presenter
//! - `editor`: Tile editor model with JSON export/import
//! - `level`, `theme`, `settings`: Data-driven levels and configuration

pub mod editor;
pub mod error;
pub mod game;
pub mod level;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod theme;
pub mod timer;

pub use error::LevelError;
pub use game::{Game, GameEvent, GamePhase};
pub use level::{Level, LevelPack};
pub use settings::Settings;
pub use theme::{Color, Theme};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Edge length of one grid tile
    pub const TILE_SIZE: f32 = 40.0;
    /// Tiles per row/column
    pub const GRID_TILES: usize = 20;
    /// Logical play field size (20 tiles of 40 units)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 800.0;

    /// Player spawn, also the snap-back point for reset triggers
    pub const PLAYER_SPAWN_X: f32 = 10.0;
    pub const PLAYER_SPAWN_Y: f32 = 60.0;
    pub const PLAYER_SIZE: f32 = 50.0;
    /// Units per tick per pressed direction
    pub const PLAYER_SPEED: f32 = 2.0;

    pub const EXIT_SIZE: f32 = 40.0;
    /// Torches are invisible but keep a small footprint
    pub const TORCH_SIZE: f32 = 10.0;
}

/// Logical play field bounds
#[inline]
pub fn field_bounds() -> Vec2 {
    Vec2::new(consts::FIELD_WIDTH, consts::FIELD_HEIGHT)
}

/// Player spawn position
#[inline]
pub fn player_spawn() -> Vec2 {
    Vec2::new(consts::PLAYER_SPAWN_X, consts::PLAYER_SPAWN_Y)
}
