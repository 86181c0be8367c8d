//! Trolley Dash - a vertically scrolling trolley racer for handheld hardware
//!
//! Core modules:
//! - `sim`: Race simulation (track, rival AI, player physics, collisions, outcomes)
//! - `catalog`: Fixed vehicle and upgrade archetypes
//! - `garage`: Player money, owned vehicles and shop flows
//! - `platform`: Clock and input sources that feed the race loop
//! - `settings`: Difficulty table and data-driven tuning

pub mod catalog;
pub mod error;
pub mod garage;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::{RaceError, Result};
pub use garage::PlayerStats;
pub use settings::{Difficulty, Tuning};

/// Game configuration constants
pub mod consts {
    /// Driver frame step (the handheld refreshes at 60 fps)
    pub const FRAME_DT: f64 = 1.0 / 60.0;

    /// Arena dimensions (logical pixels)
    pub const ARENA_WIDTH: f32 = 160.0;
    pub const ARENA_HEIGHT: f32 = 128.0;

    /// Every entity is a 16x16 sprite
    pub const SPRITE_SIZE: f32 = 16.0;

    /// Obstacles below this line are evicted (one sprite past the bottom edge)
    pub const EVICTION_Y: f32 = ARENA_HEIGHT + SPRITE_SIZE;

    /// Where the player and rival line up at race start
    pub const PLAYER_START: (f32, f32) = (70.0, 90.0);
    pub const RIVAL_START: (f32, f32) = (70.0, 50.0);

    /// Money a fresh save starts with
    pub const STARTING_MONEY: u64 = 500;
}
