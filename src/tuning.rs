//! Data-driven game balance
//!
//! Every number a designer might want to tweak lives here. The defaults are the
//! shipped balance; a settings file may override any subset of them.

use serde::{Deserialize, Serialize};

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Movement (pixels per tick) ===
    pub walk_speed: f32,
    /// Player speed while the boost modifier is held
    pub boost_speed: f32,
    pub beam_speed: f32,
    pub bomb_speed: f32,
    pub enemy_descent_speed: f32,

    // === Spawning ===
    /// A new enemy appears whenever `frame % enemy_spawn_interval == 0`
    pub enemy_spawn_interval: u64,
    /// Inclusive range for the altitude where an enemy stops descending
    pub stop_altitude_min: u32,
    pub stop_altitude_max: u32,
    /// Inclusive range for the per-enemy bomb interval
    pub bomb_interval_min: u64,
    pub bomb_interval_max: u64,
    /// Inclusive range for bomb radius (cosmetic, also sizes the hitbox)
    pub bomb_radius_min: u32,
    pub bomb_radius_max: u32,

    // === Rewards ===
    pub enemy_kill_score: i64,
    pub bomb_kill_score: i64,
    pub enemy_explosion_life: i32,
    pub bomb_explosion_life: i32,

    // === Power-ups ===
    pub shield_cost: i64,
    pub shield_life: i32,
    pub pulse_cost: i64,
    pub pulse_life: i32,
    pub gravity_cost: i64,
    pub gravity_life: i32,
    pub gravity_radius: f32,
    pub hyper_cost: i64,
    pub hyper_duration: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            walk_speed: 10.0,
            boost_speed: 20.0,
            beam_speed: 10.0,
            bomb_speed: 6.0,
            enemy_descent_speed: 6.0,

            enemy_spawn_interval: 200,
            stop_altitude_min: 50,
            stop_altitude_max: 450,
            bomb_interval_min: 50,
            bomb_interval_max: 300,
            bomb_radius_min: 10,
            bomb_radius_max: 50,

            enemy_kill_score: 10,
            bomb_kill_score: 1,
            enemy_explosion_life: 100,
            bomb_explosion_life: 50,

            shield_cost: 50,
            shield_life: 400,
            pulse_cost: 200,
            pulse_life: 400,
            gravity_cost: 50,
            gravity_life: 500,
            gravity_radius: 200.0,
            hyper_cost: 100,
            hyper_duration: 500,
        }
    }
}

impl Tuning {
    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), String> {
        if self.enemy_spawn_interval == 0 {
            return Err("enemy_spawn_interval must be positive".into());
        }
        if self.bomb_interval_min == 0 {
            return Err("bomb_interval_min must be positive".into());
        }
        if self.bomb_interval_min > self.bomb_interval_max {
            return Err("bomb_interval_min exceeds bomb_interval_max".into());
        }
        if self.stop_altitude_min > self.stop_altitude_max {
            return Err("stop_altitude_min exceeds stop_altitude_max".into());
        }
        if self.bomb_radius_min == 0 || self.bomb_radius_min > self.bomb_radius_max {
            return Err("bomb radius range is empty".into());
        }
        let costs = [
            self.shield_cost,
            self.pulse_cost,
            self.gravity_cost,
            self.hyper_cost,
        ];
        if costs.iter().any(|c| *c < 0) {
            return Err("power-up costs cannot be negative".into());
        }
        Ok(())
    }
}
