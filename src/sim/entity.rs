//! Enemies, projectiles and timed effects
//!
//! Each kind lives in its own collection on [`GameState`](super::GameState).
//! `update` returns whether the entity is still alive, so collections are
//! advanced with `retain_mut`.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::{Aabb, Hitbox, direction_to, fully_in_bounds};
use super::player::Player;
use crate::Tuning;
use crate::consts::*;

/// Bomb colors (RGB)
pub const BOMB_COLORS: [[u8; 3]; 6] = [
    [255, 0, 0],
    [0, 255, 0],
    [0, 0, 255],
    [255, 255, 0],
    [255, 0, 255],
    [0, 255, 255],
];

/// Anything that takes part in collision resolution
pub trait Body {
    fn id(&self) -> u32;
    fn center(&self) -> Vec2;
    fn hitbox(&self) -> Hitbox;
}

/// Random parameters fixed when an enemy spawns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyParams {
    /// Spawn x (enemies enter at the top edge)
    pub x: f32,
    /// Descent ends once the center passes this y
    pub stop_altitude: f32,
    /// Drop a bomb whenever `frame % bomb_interval == 0`
    pub bomb_interval: u64,
    /// Alien sprite
    pub variant: u8,
}

impl EnemyParams {
    pub fn roll<R: Rng>(rng: &mut R, tuning: &Tuning) -> Self {
        Self {
            x: rng.random_range(0..=WIDTH as u32) as f32,
            stop_altitude: rng.random_range(tuning.stop_altitude_min..=tuning.stop_altitude_max)
                as f32,
            bomb_interval: rng.random_range(tuning.bomb_interval_min..=tuning.bomb_interval_max),
            variant: rng.random_range(0..ENEMY_VARIANTS),
        }
    }
}

/// Cosmetic parameters fixed when a bomb is dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BombParams {
    pub radius: u32,
    pub color: [u8; 3],
}

impl BombParams {
    pub fn roll<R: Rng>(rng: &mut R, tuning: &Tuning) -> Self {
        Self {
            radius: rng.random_range(tuning.bomb_radius_min..=tuning.bomb_radius_max),
            color: BOMB_COLORS[rng.random_range(0..BOMB_COLORS.len())],
        }
    }
}

/// Enemy movement state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    Descending,
    /// Parked at its stop altitude, dropping bombs
    Stopped,
}

/// An alien that descends and then bombs the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub vy: f32,
    pub stop_altitude: f32,
    pub state: EnemyState,
    pub bomb_interval: u64,
    pub variant: u8,
}

impl Enemy {
    pub fn new(id: u32, params: EnemyParams, descent_speed: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(params.x, 0.0),
            vy: descent_speed,
            stop_altitude: params.stop_altitude,
            state: EnemyState::Descending,
            bomb_interval: params.bomb_interval.max(1),
            variant: params.variant,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(ENEMY_SIZE))
    }

    /// Descend; once past the stop altitude the enemy parks for good
    pub fn update(&mut self) {
        if self.state == EnemyState::Descending && self.pos.y > self.stop_altitude {
            self.vy = 0.0;
            self.state = EnemyState::Stopped;
            log::debug!("enemy {} stopped at y={}", self.id, self.pos.y);
        }
        self.pos.y += self.vy;
    }

    /// Bomb cadence follows the global frame counter, not time since stopping
    pub fn drops_bomb_at(&self, frame: u64) -> bool {
        self.state == EnemyState::Stopped && frame % self.bomb_interval == 0
    }

    /// Bombs leave from the bottom center of the sprite
    pub fn bomb_origin(&self) -> Vec2 {
        self.pos + Vec2::new(0.0, ENEMY_SIZE / 2.0)
    }
}

impl Body for Enemy {
    fn id(&self) -> u32 {
        self.id
    }

    fn center(&self) -> Vec2 {
        self.pos
    }

    fn hitbox(&self) -> Hitbox {
        Hitbox::Box(self.bounds())
    }
}

/// A bomb falling toward where the player was when it was dropped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomb {
    pub id: u32,
    pub pos: Vec2,
    /// Unit direction
    pub vel: Vec2,
    pub speed: f32,
    pub radius: f32,
    pub color: [u8; 3],
}

impl Bomb {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, speed: f32, params: BombParams) -> Self {
        Self {
            id,
            pos,
            vel,
            speed,
            radius: params.radius as f32,
            color: params.color,
        }
    }

    /// Aim is taken from the enemy's center, the bomb itself starts below it
    pub fn dropped_by(id: u32, enemy: &Enemy, target: Vec2, speed: f32, params: BombParams) -> Self {
        let vel = direction_to(enemy.pos, target);
        Self::new(id, enemy.bomb_origin(), vel, speed, params)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(self.radius * 2.0))
    }

    pub fn update(&mut self) -> bool {
        self.pos += self.vel * self.speed;
        fully_in_bounds(&self.bounds())
    }
}

impl Body for Bomb {
    fn id(&self) -> u32 {
        self.id
    }

    fn center(&self) -> Vec2 {
        self.pos
    }

    fn hitbox(&self) -> Hitbox {
        Hitbox::Circle {
            center: self.pos,
            radius: self.radius,
        }
    }
}

/// A beam fired by the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beam {
    pub id: u32,
    pub pos: Vec2,
    /// Unit direction
    pub vel: Vec2,
    pub speed: f32,
}

impl Beam {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, speed: f32) -> Self {
        Self { id, pos, vel, speed }
    }

    /// Spawns one player-width ahead of the bird along its facing
    pub fn fired_by(id: u32, player: &Player, speed: f32) -> Self {
        let dir = player.facing.unit();
        let pos = player.pos + dir * PLAYER_SIZE;
        Self::new(id, pos, dir, speed)
    }

    /// Counter-clockwise sprite rotation in degrees, in (-180, 180]
    pub fn angle_degrees(&self) -> f32 {
        (-self.vel.y + 0.0).atan2(self.vel.x).to_degrees()
    }

    /// Bounding box of the rotated sprite
    pub fn bounds(&self) -> Aabb {
        let (ax, ay) = (self.vel.x.abs(), self.vel.y.abs());
        let size = Vec2::new(
            ax * BEAM_LENGTH + ay * BEAM_WIDTH,
            ay * BEAM_LENGTH + ax * BEAM_WIDTH,
        );
        Aabb::from_center(self.pos, size)
    }

    pub fn update(&mut self) -> bool {
        self.pos += self.vel * self.speed;
        fully_in_bounds(&self.bounds())
    }
}

impl Body for Beam {
    fn id(&self) -> u32 {
        self.id
    }

    fn center(&self) -> Vec2 {
        self.pos
    }

    fn hitbox(&self) -> Hitbox {
        Hitbox::Box(self.bounds())
    }
}

/// A stationary explosion effect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub id: u32,
    pub pos: Vec2,
    /// Lifetime it was created with
    pub lifetime: i32,
    /// Remaining ticks
    pub life: i32,
}

impl Explosion {
    pub fn new(id: u32, pos: Vec2, lifetime: i32) -> Self {
        Self {
            id,
            pos,
            lifetime,
            life: lifetime,
        }
    }

    pub fn update(&mut self) -> bool {
        self.life -= 1;
        self.life >= 0
    }

    /// Which of the two flicker frames to show
    pub fn frame(&self) -> u8 {
        (self.life / EXPLOSION_FRAME_TICKS).rem_euclid(2) as u8
    }
}

/// A wall in front of the player that eats bombs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shield {
    pub id: u32,
    pub pos: Vec2,
    /// Wide wall (player facing up/down) instead of a tall one
    pub horizontal: bool,
    pub life: i32,
}

impl Shield {
    /// Placed one player extent ahead along the facing
    ///
    /// Diagonal facings get the tall wall, same as left/right.
    pub fn raised_by(id: u32, player: &Player, life: i32) -> Self {
        Self {
            id,
            pos: player.pos + player.facing.step() * PLAYER_SIZE,
            horizontal: player.facing.is_vertical(),
            life,
        }
    }

    pub fn bounds(&self) -> Aabb {
        let size = if self.horizontal {
            Vec2::new(PLAYER_SIZE * 2.0, SHIELD_THICKNESS)
        } else {
            Vec2::new(SHIELD_THICKNESS, PLAYER_SIZE * 2.0)
        };
        Aabb::from_center(self.pos, size)
    }

    pub fn update(&mut self) -> bool {
        self.life -= 1;
        self.life >= 0
    }
}

impl Body for Shield {
    fn id(&self) -> u32 {
        self.id
    }

    fn center(&self) -> Vec2 {
        self.pos
    }

    fn hitbox(&self) -> Hitbox {
        Hitbox::Box(self.bounds())
    }
}

/// A circular gravity well that swallows bombs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gravity {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub life: i32,
}

impl Gravity {
    pub fn new(id: u32, pos: Vec2, radius: f32, life: i32) -> Self {
        Self {
            id,
            pos,
            radius,
            life,
        }
    }

    pub fn update(&mut self) -> bool {
        self.life -= 1;
        self.life >= 0
    }
}

impl Body for Gravity {
    fn id(&self) -> u32 {
        self.id
    }

    fn center(&self) -> Vec2 {
        self.pos
    }

    fn hitbox(&self) -> Hitbox {
        Hitbox::Circle {
            center: self.pos,
            radius: self.radius,
        }
    }
}

/// Full-screen pulse that destroys every bomb and enemy while it lasts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenPulse {
    pub id: u32,
    pub life: i32,
}

impl ScreenPulse {
    pub fn new(id: u32, life: i32) -> Self {
        Self { id, life }
    }

    pub fn update(&mut self) -> bool {
        self.life -= 1;
        self.life >= 0
    }
}

impl Body for ScreenPulse {
    fn id(&self) -> u32 {
        self.id
    }

    fn center(&self) -> Vec2 {
        Aabb::screen().center
    }

    fn hitbox(&self) -> Hitbox {
        Hitbox::Box(Aabb::screen())
    }
}
