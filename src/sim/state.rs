//! Game state and core simulation types
//!
//! Everything one run needs lives in [`GameState`]: the seeded RNG, the frame
//! counter, the player and one collection per entity kind.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Contact, Group, contacts, remove_hit};
use super::entity::{
    Beam, Bomb, BombParams, Enemy, EnemyParams, Explosion, Gravity, ScreenPulse, Shield,
};
use super::player::Player;
use super::score::Score;
use crate::Tuning;
use crate::consts::*;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Player was bombed while in Normal mode
    GameOver,
    /// Quit was requested
    Quit,
}

/// Purchasable power-ups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUp {
    Shield,
    ScreenPulse,
    Gravity,
    Hyper,
}

impl PowerUp {
    pub fn cost(&self, tuning: &Tuning) -> i64 {
        match self {
            PowerUp::Shield => tuning.shield_cost,
            PowerUp::ScreenPulse => tuning.pulse_cost,
            PowerUp::Gravity => tuning.gravity_cost,
            PowerUp::Hyper => tuning.hyper_cost,
        }
    }
}

/// Why a purchase was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    InsufficientScore,
    /// Only one shield may be up at a time
    AlreadyActive,
}

/// Things that happened during the last tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemySpawned { id: u32 },
    BombDropped { id: u32, enemy: u32 },
    BeamFired { id: u32 },
    Destroyed { group: Group, id: u32, by: Group },
    /// Bomb exploded against the player in Hyper mode
    BombAbsorbed { id: u32 },
    Purchased { power_up: PowerUp, cost: i64 },
    PurchaseRejected { power_up: PowerUp, reason: Rejection },
    HyperExpired,
    GameOver { score: i64 },
    Quit,
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    rng: Pcg32,
    /// Global tick counter; spawn and bomb cadence key off this
    pub frame: u64,
    pub phase: GamePhase,
    pub score: Score,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bombs: Vec<Bomb>,
    pub beams: Vec<Beam>,
    pub explosions: Vec<Explosion>,
    pub shields: Vec<Shield>,
    pub pulses: Vec<ScreenPulse>,
    pub gravities: Vec<Gravity>,
    /// Events produced by the most recent tick
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed and default tuning
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    /// Create a game state with custom tuning
    ///
    /// Tuning the simulation cannot run with (zero intervals, inverted ranges)
    /// is rejected with the reason.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, String> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        let player = Player::new(
            Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            tuning.walk_speed,
        );
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            frame: 0,
            phase: GamePhase::Running,
            score: Score::new(),
            player,
            enemies: Vec::new(),
            bombs: Vec::new(),
            beams: Vec::new(),
            explosions: Vec::new(),
            shields: Vec::new(),
            pulses: Vec::new(),
            gravities: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Spawn an enemy with freshly rolled parameters
    pub fn spawn_enemy(&mut self) -> u32 {
        let params = EnemyParams::roll(&mut self.rng, &self.tuning);
        self.spawn_enemy_with(params)
    }

    pub fn spawn_enemy_with(&mut self, params: EnemyParams) -> u32 {
        let id = self.next_entity_id();
        self.enemies
            .push(Enemy::new(id, params, self.tuning.enemy_descent_speed));
        log::debug!("enemy {} spawned at x={} (frame {})", id, params.x, self.frame);
        self.events.push(GameEvent::EnemySpawned { id });
        id
    }

    /// Drop a bomb from the enemy at `index`, aimed at the player's current spot
    pub fn drop_bomb(&mut self, index: usize) -> Option<u32> {
        let enemy = self.enemies.get(index)?;
        let params = BombParams::roll(&mut self.rng, &self.tuning);
        let id = self.next_id;
        let bomb = Bomb::dropped_by(id, enemy, self.player.pos, self.tuning.bomb_speed, params);
        let enemy_id = enemy.id;
        self.next_id += 1;
        self.bombs.push(bomb);
        self.events.push(GameEvent::BombDropped { id, enemy: enemy_id });
        Some(id)
    }

    pub fn fire_beam(&mut self) -> u32 {
        let id = self.next_entity_id();
        self.beams
            .push(Beam::fired_by(id, &self.player, self.tuning.beam_speed));
        self.events.push(GameEvent::BeamFired { id });
        id
    }

    pub fn spawn_explosion(&mut self, pos: Vec2, lifetime: i32) -> u32 {
        let id = self.next_entity_id();
        self.explosions.push(Explosion::new(id, pos, lifetime));
        id
    }

    pub fn raise_shield(&mut self) -> u32 {
        let id = self.next_entity_id();
        self.shields
            .push(Shield::raised_by(id, &self.player, self.tuning.shield_life));
        id
    }

    pub fn emit_pulse(&mut self) -> u32 {
        let id = self.next_entity_id();
        self.pulses.push(ScreenPulse::new(id, self.tuning.pulse_life));
        id
    }

    /// Gravity well centered on the player
    pub fn open_gravity(&mut self) -> u32 {
        let id = self.next_entity_id();
        self.gravities.push(Gravity::new(
            id,
            self.player.pos,
            self.tuning.gravity_radius,
            self.tuning.gravity_life,
        ));
        id
    }

    /// Collision snapshot of one collection
    pub fn contacts(&self, group: Group) -> Vec<Contact> {
        match group {
            Group::Enemies => contacts(&self.enemies),
            Group::Bombs => contacts(&self.bombs),
            Group::Beams => contacts(&self.beams),
            Group::Shields => contacts(&self.shields),
            Group::Pulses => contacts(&self.pulses),
            Group::Gravities => contacts(&self.gravities),
        }
    }

    /// Destroy the members of `group` flagged in `hit`
    pub fn remove_hit(&mut self, group: Group, hit: &[bool]) {
        match group {
            Group::Enemies => remove_hit(&mut self.enemies, hit),
            Group::Bombs => remove_hit(&mut self.bombs, hit),
            Group::Beams => remove_hit(&mut self.beams, hit),
            Group::Shields => remove_hit(&mut self.shields, hit),
            Group::Pulses => remove_hit(&mut self.pulses, hit),
            Group::Gravities => remove_hit(&mut self.gravities, hit),
        }
    }

    pub fn live_count(&self, group: Group) -> usize {
        match group {
            Group::Enemies => self.enemies.len(),
            Group::Bombs => self.bombs.len(),
            Group::Beams => self.beams.len(),
            Group::Shields => self.shields.len(),
            Group::Pulses => self.pulses.len(),
            Group::Gravities => self.gravities.len(),
        }
    }
}
