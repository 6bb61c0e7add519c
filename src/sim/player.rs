//! The player character (the bird)

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Aabb, Hitbox, fully_in_bounds};
use crate::consts::*;

/// One of the eight cardinal/diagonal directions the bird can face
///
/// Components are -1, 0 or +1 and never both zero. Screen coordinates, so
/// `dy = -1` is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Facing {
    dx: i8,
    dy: i8,
}

impl Facing {
    pub const RIGHT: Facing = Facing { dx: 1, dy: 0 };
    pub const UP_RIGHT: Facing = Facing { dx: 1, dy: -1 };
    pub const UP: Facing = Facing { dx: 0, dy: -1 };
    pub const UP_LEFT: Facing = Facing { dx: -1, dy: -1 };
    pub const LEFT: Facing = Facing { dx: -1, dy: 0 };
    pub const DOWN_LEFT: Facing = Facing { dx: -1, dy: 1 };
    pub const DOWN: Facing = Facing { dx: 0, dy: 1 };
    pub const DOWN_RIGHT: Facing = Facing { dx: 1, dy: 1 };

    /// Image table order, counter-clockwise starting from right
    pub const ALL: [Facing; 8] = [
        Facing::RIGHT,
        Facing::UP_RIGHT,
        Facing::UP,
        Facing::UP_LEFT,
        Facing::LEFT,
        Facing::DOWN_LEFT,
        Facing::DOWN,
        Facing::DOWN_RIGHT,
    ];

    /// Quantize a net input direction; `None` when there is no movement
    pub fn from_components(dx: i32, dy: i32) -> Option<Self> {
        if dx == 0 && dy == 0 {
            return None;
        }
        Some(Self {
            dx: dx.signum() as i8,
            dy: dy.signum() as i8,
        })
    }

    #[inline]
    pub fn dx(&self) -> i8 {
        self.dx
    }

    #[inline]
    pub fn dy(&self) -> i8 {
        self.dy
    }

    /// Raw integer step (diagonals are not normalized)
    pub fn step(&self) -> Vec2 {
        Vec2::new(self.dx as f32, self.dy as f32)
    }

    /// Normalized direction
    pub fn unit(&self) -> Vec2 {
        self.step().normalize()
    }

    /// Facing straight up or straight down
    pub fn is_vertical(&self) -> bool {
        self.dx == 0
    }

    /// Position in [`Facing::ALL`], used to pick the sprite
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    /// Counter-clockwise angle from the +x axis in degrees, in (-180, 180]
    pub fn angle_degrees(&self) -> f32 {
        // `+ 0.0` turns a negated zero back into +0.0 so left is 180, not -180
        (-(self.dy as f32) + 0.0).atan2(self.dx as f32).to_degrees()
    }
}

impl Default for Facing {
    fn default() -> Self {
        Facing::RIGHT
    }
}

/// Player mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Normal,
    /// Invulnerable: bombs explode on contact instead of ending the run
    Hyper,
}

/// Face the bird shows instead of its directional sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Expression {
    #[default]
    Neutral,
    /// Shown briefly after a kill; `ticks` remaining
    Happy { ticks: u32 },
    /// Shown at game over
    Sad,
}

/// Direction keys held during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeldDirections {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldDirections {
    /// Sum of the unit deltas of every held key
    pub fn net(&self) -> (i32, i32) {
        let dx = self.right as i32 - self.left as i32;
        let dy = self.down as i32 - self.up as i32;
        (dx, dy)
    }
}

/// The player's bird
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Center position
    pub pos: Vec2,
    pub facing: Facing,
    /// Pixels per tick per held axis
    pub speed: f32,
    pub mode: Mode,
    /// Remaining Hyper ticks; the mode flips back once this drops below zero
    pub hyper_ticks: i32,
    pub expression: Expression,
}

impl Player {
    pub fn new(pos: Vec2, speed: f32) -> Self {
        Self {
            pos,
            facing: Facing::default(),
            speed,
            mode: Mode::Normal,
            hyper_ticks: -1,
            expression: Expression::Neutral,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(PLAYER_SIZE))
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::Box(self.bounds())
    }

    #[inline]
    pub fn is_hyper(&self) -> bool {
        self.mode == Mode::Hyper
    }

    /// Switch mode; `duration` only matters for Hyper
    pub fn set_mode(&mut self, mode: Mode, duration: i32) {
        self.mode = mode;
        self.hyper_ticks = match mode {
            Mode::Hyper => duration,
            Mode::Normal => -1,
        };
    }

    /// Show the happy face (a sad bird stays sad)
    pub fn cheer(&mut self) {
        if self.expression != Expression::Sad {
            self.expression = Expression::Happy { ticks: HAPPY_TICKS };
        }
    }

    /// Move by the held directions
    ///
    /// The whole displacement is undone if the bird would leave the screen on
    /// either axis, even the component that stayed inside. Facing still follows
    /// the input. Returns whether the position changed.
    pub fn apply_movement(&mut self, held: HeldDirections) -> bool {
        let (dx, dy) = held.net();
        let delta = Vec2::new(dx as f32, dy as f32) * self.speed;

        let before = self.pos;
        self.pos += delta;
        let moved = if fully_in_bounds(&self.bounds()) {
            delta != Vec2::ZERO
        } else {
            self.pos = before;
            false
        };

        if let Some(facing) = Facing::from_components(dx, dy) {
            self.facing = facing;
            // A directional sprite replaces the happy face
            if matches!(self.expression, Expression::Happy { .. }) {
                self.expression = Expression::Neutral;
            }
        }
        moved
    }

    /// Per-tick update: movement, Hyper decay, expression timeout
    ///
    /// Returns true when Hyper ran out during this update.
    pub fn update(&mut self, held: HeldDirections) -> bool {
        self.apply_movement(held);

        let mut expired = false;
        if self.mode == Mode::Hyper {
            self.hyper_ticks -= 1;
            if self.hyper_ticks < 0 {
                self.set_mode(Mode::Normal, -1);
                expired = true;
            }
        }

        if let Expression::Happy { ticks } = self.expression {
            self.expression = match ticks.saturating_sub(1) {
                0 => Expression::Neutral,
                left => Expression::Happy { ticks: left },
            };
        }
        expired
    }
}
