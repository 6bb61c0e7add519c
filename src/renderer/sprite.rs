//! Sprite identities handed to whatever draws the frame
//!
//! The simulation never loads images. A frontend maps each [`Sprite`] (entity
//! kind plus variant) to its own representation.

use crate::sim::Facing;

/// What the bird looks like this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirdPose {
    /// Directional sprite
    Facing(Facing),
    Happy,
    Sad,
}

/// Visual identity of one draw command
#[derive(Debug, Clone, PartialEq)]
pub enum Sprite {
    Background,
    Bird { pose: BirdPose, hyper: bool },
    /// Rotated counter-clockwise by `angle_degrees`
    Beam { angle_degrees: f32 },
    Enemy { variant: u8 },
    Bomb { radius: f32, color: [u8; 3] },
    /// One of the two flicker frames
    Explosion { frame: u8 },
    Shield { horizontal: bool },
    Gravity { radius: f32 },
    ScreenPulse,
    ScoreText(String),
}

/// Colors for game elements (RGBA)
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
    pub const BIRD: [f32; 4] = [1.0, 0.8, 0.2, 1.0];
    pub const BIRD_HYPER: [f32; 4] = [0.9, 0.3, 1.0, 1.0];
    pub const BEAM: [f32; 4] = [0.3, 0.9, 1.0, 1.0];
    pub const ENEMY: [[f32; 4]; 3] = [
        [0.3, 0.9, 0.3, 1.0],
        [0.9, 0.5, 0.2, 1.0],
        [0.6, 0.6, 1.0, 1.0],
    ];
    pub const EXPLOSION: [[f32; 4]; 2] = [[1.0, 0.6, 0.1, 1.0], [1.0, 0.9, 0.3, 1.0]];
    pub const SHIELD: [f32; 4] = [0.1, 0.1, 0.1, 1.0];
    /// Drawn at low alpha over everything else
    pub const GRAVITY: [f32; 4] = [0.04, 0.04, 0.04, 0.4];
    pub const PULSE: [f32; 4] = [0.0, 0.0, 0.0, 0.5];
    pub const SCORE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
}

/// Scale a unit RGBA color to 8-bit RGB
pub fn to_rgb8(color: [f32; 4]) -> [u8; 3] {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    [channel(color[0]), channel(color[1]), channel(color[2])]
}
