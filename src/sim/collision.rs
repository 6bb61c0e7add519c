//! Group-versus-group collision resolution
//!
//! Collisions are resolved as an ordered list of rules, each pairing a target
//! group (what gets destroyed) with a hazard group (what destroys it). Rules run
//! in table order and each removes its matches before the next rule looks, so
//! nothing can be destroyed twice in one tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Body;
use super::geometry::Hitbox;
use crate::Tuning;

/// Entity collections that take part in collisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    Enemies,
    Bombs,
    Beams,
    Shields,
    Pulses,
    Gravities,
}

/// Size of the explosion left behind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blast {
    /// Destroyed enemy
    Large,
    /// Destroyed bomb
    Small,
}

impl Blast {
    pub fn life(&self, tuning: &Tuning) -> i32 {
        match self {
            Blast::Large => tuning.enemy_explosion_life,
            Blast::Small => tuning.bomb_explosion_life,
        }
    }
}

/// Score awarded per destroyed target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reward {
    Nothing,
    EnemyKill,
    BombKill,
}

impl Reward {
    pub fn points(&self, tuning: &Tuning) -> i64 {
        match self {
            Reward::Nothing => 0,
            Reward::EnemyKill => tuning.enemy_kill_score,
            Reward::BombKill => tuning.bomb_kill_score,
        }
    }
}

/// One row of the collision table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionRule {
    pub target: Group,
    pub hazard: Group,
    /// Hazard is destroyed along with the target
    pub consumes_hazard: bool,
    pub blast: Blast,
    pub reward: Reward,
    /// Player shows the happy face
    pub cheers: bool,
}

/// Resolution order; bombs hitting the player are handled after these
pub const COLLISION_RULES: [CollisionRule; 6] = [
    CollisionRule {
        target: Group::Enemies,
        hazard: Group::Beams,
        consumes_hazard: true,
        blast: Blast::Large,
        reward: Reward::EnemyKill,
        cheers: true,
    },
    CollisionRule {
        target: Group::Bombs,
        hazard: Group::Beams,
        consumes_hazard: true,
        blast: Blast::Small,
        reward: Reward::BombKill,
        cheers: false,
    },
    CollisionRule {
        target: Group::Bombs,
        hazard: Group::Shields,
        consumes_hazard: false,
        blast: Blast::Small,
        reward: Reward::Nothing,
        cheers: false,
    },
    CollisionRule {
        target: Group::Bombs,
        hazard: Group::Pulses,
        consumes_hazard: false,
        blast: Blast::Small,
        reward: Reward::Nothing,
        cheers: true,
    },
    CollisionRule {
        target: Group::Enemies,
        hazard: Group::Pulses,
        consumes_hazard: false,
        blast: Blast::Large,
        reward: Reward::Nothing,
        cheers: true,
    },
    CollisionRule {
        target: Group::Bombs,
        hazard: Group::Gravities,
        consumes_hazard: false,
        blast: Blast::Small,
        reward: Reward::BombKill,
        cheers: false,
    },
];

/// Snapshot of one entity for collision purposes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub id: u32,
    pub center: Vec2,
    pub hitbox: Hitbox,
}

impl Contact {
    pub fn of<T: Body>(body: &T) -> Self {
        Self {
            id: body.id(),
            center: body.center(),
            hitbox: body.hitbox(),
        }
    }
}

/// Contacts for a whole collection, in collection order
pub fn contacts<T: Body>(bodies: &[T]) -> Vec<Contact> {
    bodies.iter().map(Contact::of).collect()
}

/// Which members of each side were hit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupHits {
    pub targets: Vec<bool>,
    pub hazards: Vec<bool>,
}

impl GroupHits {
    pub fn any(&self) -> bool {
        self.targets.contains(&true)
    }
}

/// Resolve every target against every hazard
///
/// Targets are scanned in order. A target touching any live hazard is hit, and
/// when `consumes_hazard` is set every hazard it touched is used up and cannot
/// hit a later target.
pub fn resolve_groups(targets: &[Contact], hazards: &[Contact], consumes_hazard: bool) -> GroupHits {
    let mut hits = GroupHits {
        targets: vec![false; targets.len()],
        hazards: vec![false; hazards.len()],
    };

    for (ti, target) in targets.iter().enumerate() {
        for (hi, hazard) in hazards.iter().enumerate() {
            if consumes_hazard && hits.hazards[hi] {
                continue;
            }
            if target.hitbox.overlaps(&hazard.hitbox) {
                hits.targets[ti] = true;
                hits.hazards[hi] = true;
            }
        }
    }

    hits
}

/// Drop the members flagged in `hit`, keeping the rest in order
pub fn remove_hit<T>(items: &mut Vec<T>, hit: &[bool]) {
    let mut flags = hit.iter();
    items.retain(|_| !flags.next().copied().unwrap_or(false));
}
