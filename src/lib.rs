//! Bombfall - a single-screen arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, game state)
//! - `renderer`: Scene building (ordered sprite draw list per frame)
//! - `settings`: Runtime preferences loaded from JSON
//! - `tuning`: Data-driven game balance

pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{Settings, SettingsError};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Playfield extent (pixels, y grows downward)
    pub const WIDTH: f32 = 1600.0;
    pub const HEIGHT: f32 = 900.0;

    /// Fixed tick rate of the frame loop
    pub const TICK_RATE_HZ: u32 = 50;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 900.0;
    pub const PLAYER_START_Y: f32 = 400.0;
    pub const PLAYER_SIZE: f32 = 100.0;

    /// Enemy sprite extent (square)
    pub const ENEMY_SIZE: f32 = 70.0;
    /// Number of alien sprite variants
    pub const ENEMY_VARIANTS: u8 = 3;

    /// Beam sprite extent before rotation
    pub const BEAM_LENGTH: f32 = 100.0;
    pub const BEAM_WIDTH: f32 = 20.0;

    /// Shield wall is this thick and twice the player's height long
    pub const SHIELD_THICKNESS: f32 = 20.0;

    /// Explosion sprite extent
    pub const EXPLOSION_SIZE: f32 = 60.0;
    /// Explosion flips between its two frames this often
    pub const EXPLOSION_FRAME_TICKS: i32 = 10;

    /// How long the happy face stays up after a kill
    pub const HAPPY_TICKS: u32 = 25;

    /// Score overlay anchor (center of the text)
    pub const SCORE_X: f32 = 100.0;
    pub const SCORE_Y: f32 = HEIGHT - 50.0;
}
