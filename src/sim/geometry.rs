//! Screen-space geometry for sprites
//!
//! Everything collides as either an axis-aligned box or a circle. Boxes are
//! half-open: two boxes that only share an edge do not overlap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{HEIGHT, WIDTH};

/// Direction used when asked for the direction between two coincident points
pub const FALLBACK_DIRECTION: Vec2 = Vec2::Y;

/// An axis-aligned box stored as center + half extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size / 2.0,
        }
    }

    /// Box covering the whole playfield
    pub fn screen() -> Self {
        Self::from_center(Vec2::new(WIDTH / 2.0, HEIGHT / 2.0), Vec2::new(WIDTH, HEIGHT))
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.half.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.half.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y - self.half.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y + self.half.y
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.half * 2.0
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Closest point inside the box to `point`
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.center - self.half, self.center + self.half)
    }
}

/// Collision shape of an entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Hitbox {
    Box(Aabb),
    Circle { center: Vec2, radius: f32 },
}

impl Hitbox {
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        match (self, other) {
            (Hitbox::Box(a), Hitbox::Box(b)) => a.overlaps(b),
            (
                Hitbox::Circle {
                    center: c1,
                    radius: r1,
                },
                Hitbox::Circle {
                    center: c2,
                    radius: r2,
                },
            ) => {
                let reach = r1 + r2;
                c1.distance_squared(*c2) < reach * reach
            }
            (Hitbox::Box(b), Hitbox::Circle { center, radius })
            | (Hitbox::Circle { center, radius }, Hitbox::Box(b)) => {
                b.closest_point(*center).distance_squared(*center) < radius * radius
            }
        }
    }
}

/// Check whether a box lies inside the playfield, per axis
///
/// Returns `(horizontal, vertical)`. Any part of the box outside the screen on
/// an axis makes that axis `false`; nothing is clamped.
pub fn in_bounds(bounds: &Aabb) -> (bool, bool) {
    let horizontal = bounds.left() >= 0.0 && bounds.right() <= WIDTH;
    let vertical = bounds.top() >= 0.0 && bounds.bottom() <= HEIGHT;
    (horizontal, vertical)
}

/// True when the box is inside the playfield on both axes
#[inline]
pub fn fully_in_bounds(bounds: &Aabb) -> bool {
    in_bounds(bounds) == (true, true)
}

/// Unit vector pointing from `from` toward `to`
///
/// Coincident points have no direction; they yield [`FALLBACK_DIRECTION`].
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    match (to - from).try_normalize() {
        Some(dir) => dir,
        None => {
            log::warn!(
                "direction requested between coincident points {:?}, falling back",
                from
            );
            FALLBACK_DIRECTION
        }
    }
}
