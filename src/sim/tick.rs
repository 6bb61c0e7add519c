//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. One call is one
//! frame; rendering and pacing are the caller's business.

use super::collision::{COLLISION_RULES, CollisionRule, Group, resolve_groups};
use super::player::{Expression, HeldDirections, Mode};
use super::state::{GameEvent, GamePhase, GameState, PowerUp, Rejection};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Direction keys currently held
    pub held: HeldDirections,
    /// Speed boost modifier held
    pub boost: bool,
    /// Fire a beam
    pub fire: bool,
    /// Buy a shield
    pub shield: bool,
    /// Buy a screen pulse
    pub pulse: bool,
    /// Buy a gravity well
    pub gravity: bool,
    /// Buy hyper mode
    pub hyper: bool,
    /// End the run before this tick does anything
    pub quit: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    // Nothing runs once the game has ended
    if !state.is_running() {
        return;
    }

    if input.quit {
        state.phase = GamePhase::Quit;
        state.events.push(GameEvent::Quit);
        log::info!("quit requested at frame {}", state.frame);
        return;
    }

    state.player.speed = if input.boost {
        state.tuning.boost_speed
    } else {
        state.tuning.walk_speed
    };

    handle_actions(state, input);

    if state.frame % state.tuning.enemy_spawn_interval == 0 {
        state.spawn_enemy();
    }

    drop_bombs(state);

    for rule in &COLLISION_RULES {
        apply_rule(state, rule);
    }
    if bomb_player(state) {
        return;
    }

    update_entities(state, input);
    state.frame += 1;
}

/// One-shot actions in a fixed order: fire, then purchases
fn handle_actions(state: &mut GameState, input: &TickInput) {
    if input.fire {
        state.fire_beam();
    }

    let requested = [
        (input.shield, PowerUp::Shield),
        (input.pulse, PowerUp::ScreenPulse),
        (input.gravity, PowerUp::Gravity),
        (input.hyper, PowerUp::Hyper),
    ];
    for (pressed, power_up) in requested {
        if pressed {
            purchase(state, power_up);
        }
    }
}

/// Check, deduct, then spawn
///
/// Returns whether the power-up was bought.
pub fn purchase(state: &mut GameState, power_up: PowerUp) -> bool {
    if power_up == PowerUp::Shield && !state.shields.is_empty() {
        reject(state, power_up, Rejection::AlreadyActive);
        return false;
    }

    let cost = power_up.cost(&state.tuning);
    if !state.score.spend(cost) {
        reject(state, power_up, Rejection::InsufficientScore);
        return false;
    }

    match power_up {
        PowerUp::Shield => {
            state.raise_shield();
        }
        PowerUp::ScreenPulse => {
            state.emit_pulse();
        }
        PowerUp::Gravity => {
            state.open_gravity();
        }
        PowerUp::Hyper => {
            let duration = state.tuning.hyper_duration;
            state.player.set_mode(Mode::Hyper, duration);
        }
    }

    log::debug!(
        "bought {:?} for {} (score now {})",
        power_up,
        cost,
        state.score.value()
    );
    state.events.push(GameEvent::Purchased { power_up, cost });
    true
}

fn reject(state: &mut GameState, power_up: PowerUp, reason: Rejection) {
    log::debug!("{:?} purchase rejected: {:?}", power_up, reason);
    state
        .events
        .push(GameEvent::PurchaseRejected { power_up, reason });
}

/// Parked enemies drop bombs on their interval
fn drop_bombs(state: &mut GameState) {
    let frame = state.frame;
    let droppers: Vec<usize> = state
        .enemies
        .iter()
        .enumerate()
        .filter(|(_, enemy)| enemy.drops_bomb_at(frame))
        .map(|(i, _)| i)
        .collect();

    for index in droppers {
        state.drop_bomb(index);
    }
}

/// Resolve one row of the collision table
fn apply_rule(state: &mut GameState, rule: &CollisionRule) {
    let targets = state.contacts(rule.target);
    let hazards = state.contacts(rule.hazard);
    if targets.is_empty() || hazards.is_empty() {
        return;
    }

    let hits = resolve_groups(&targets, &hazards, rule.consumes_hazard);
    if !hits.any() {
        return;
    }

    state.remove_hit(rule.target, &hits.targets);
    if rule.consumes_hazard {
        state.remove_hit(rule.hazard, &hits.hazards);
    }

    let life = rule.blast.life(&state.tuning);
    let points = rule.reward.points(&state.tuning);
    for (target, _) in targets.iter().zip(&hits.targets).filter(|(_, hit)| **hit) {
        state.spawn_explosion(target.center, life);
        state.score.add(points);
        if rule.cheers {
            state.player.cheer();
        }
        state.events.push(GameEvent::Destroyed {
            group: rule.target,
            id: target.id,
            by: rule.hazard,
        });
    }
}

/// Bombs touching the player; returns true when the run ended
fn bomb_player(state: &mut GameState) -> bool {
    let bombs = state.contacts(Group::Bombs);
    let player = state.player.hitbox();
    let hit: Vec<bool> = bombs.iter().map(|b| b.hitbox.overlaps(&player)).collect();
    if !hit.contains(&true) {
        return false;
    }

    // Every touching bomb is gone either way
    state.remove_hit(Group::Bombs, &hit);

    if state.player.mode == Mode::Normal {
        state.player.expression = Expression::Sad;
        state.phase = GamePhase::GameOver;
        let score = state.score.value();
        state.events.push(GameEvent::GameOver { score });
        log::info!("game over at frame {} with score {}", state.frame, score);
        return true;
    }

    let life = state.tuning.bomb_explosion_life;
    let points = state.tuning.bomb_kill_score;
    for (bomb, _) in bombs.iter().zip(&hit).filter(|(_, hit)| **hit) {
        state.spawn_explosion(bomb.center, life);
        state.score.add(points);
        state.events.push(GameEvent::BombAbsorbed { id: bomb.id });
    }
    false
}

/// Move everything and expire what ran out
fn update_entities(state: &mut GameState, input: &TickInput) {
    if state.player.update(input.held) {
        log::debug!("hyper expired at frame {}", state.frame);
        state.events.push(GameEvent::HyperExpired);
    }

    state.beams.retain_mut(|beam| beam.update());
    for enemy in &mut state.enemies {
        enemy.update();
    }
    state.bombs.retain_mut(|bomb| bomb.update());
    state.explosions.retain_mut(|explosion| explosion.update());
    state.pulses.retain_mut(|pulse| pulse.update());
    state.shields.retain_mut(|shield| shield.update());
    state.gravities.retain_mut(|gravity| gravity.update());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Beam, Bomb, BombParams, EnemyParams, EnemyState, Shield};
    use crate::sim::player::Facing;
    use glam::Vec2;

    const BOMB: BombParams = BombParams {
        radius: 10,
        color: [0, 0, 255],
    };

    /// A state past frame 0 so no random enemy shows up uninvited
    fn quiet_state() -> GameState {
        let mut state = GameState::new(12345);
        state.frame = 1;
        state
    }

    fn parked_enemy(state: &mut GameState, x: f32, y: f32) -> u32 {
        let id = state.spawn_enemy_with(EnemyParams {
            x,
            stop_altitude: 0.0,
            bomb_interval: 300,
            variant: 0,
        });
        if let Some(enemy) = state.enemies.last_mut() {
            enemy.pos.y = y;
        }
        id
    }

    #[test]
    fn test_first_frame_spawns_enemy() {
        let mut state = GameState::new(12345);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.frame, 1);

        // Next spawn is keyed to frame 200
        state.enemies.clear();
        state.frame = 199;
        tick(&mut state, &TickInput::default());
        assert!(state.enemies.is_empty());
        tick(&mut state, &TickInput::default());
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_quit_stops_before_any_work() {
        let mut state = GameState::new(12345);
        let input = TickInput {
            quit: true,
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::Quit);
        assert!(state.beams.is_empty());
        assert!(state.enemies.is_empty());
        assert_eq!(state.frame, 0);
    }

    #[test]
    fn test_boost_doubles_speed() {
        let mut state = quiet_state();
        let input = TickInput {
            held: HeldDirections {
                left: true,
                ..Default::default()
            },
            boost: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.player.pos.x, 880.0);
    }

    #[test]
    fn test_shield_purchase_rules() {
        let mut state = quiet_state();
        assert!(!purchase(&mut state, PowerUp::Shield));
        assert_eq!(state.score.value(), 0);

        state.score.add(30);
        assert!(!purchase(&mut state, PowerUp::Shield));
        assert_eq!(state.score.value(), 30);

        state.score.add(70);
        assert!(purchase(&mut state, PowerUp::Shield));
        assert_eq!(state.score.value(), 50);
        assert_eq!(state.shields.len(), 1);

        // Affordable, but one is already up
        assert!(!purchase(&mut state, PowerUp::Shield));
        assert_eq!(state.score.value(), 50);
        assert!(state.events.contains(&GameEvent::PurchaseRejected {
            power_up: PowerUp::Shield,
            reason: Rejection::AlreadyActive,
        }));
    }

    #[test]
    fn test_power_up_costs_and_effects() {
        let mut state = quiet_state();
        state.score.add(400);

        assert!(purchase(&mut state, PowerUp::ScreenPulse));
        assert_eq!(state.score.value(), 200);
        assert_eq!(state.pulses[0].life, 400);

        assert!(purchase(&mut state, PowerUp::Gravity));
        assert_eq!(state.score.value(), 150);

        assert!(purchase(&mut state, PowerUp::Hyper));
        assert_eq!(state.score.value(), 50);
        assert_eq!(state.player.mode, Mode::Hyper);
        assert_eq!(state.player.hyper_ticks, 500);

        // Gravity can stack, pulse cannot be afforded
        assert!(purchase(&mut state, PowerUp::Gravity));
        assert!(!purchase(&mut state, PowerUp::ScreenPulse));
        assert_eq!(state.gravities.len(), 2);
        assert_eq!(state.score.value(), 0);
    }

    #[test]
    fn test_beam_kills_enemy() {
        let mut state = quiet_state();
        parked_enemy(&mut state, 500.0, 300.0);
        state
            .beams
            .push(Beam::new(99, Vec2::new(500.0, 300.0), Vec2::X, 10.0));

        tick(&mut state, &TickInput::default());
        assert!(state.enemies.is_empty());
        assert!(state.beams.is_empty());
        assert_eq!(state.score.value(), 10);
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.explosions[0].lifetime, 100);
        assert!(matches!(state.player.expression, Expression::Happy { .. }));
    }

    #[test]
    fn test_beam_and_pulse_destroy_enemy_once() {
        let mut state = quiet_state();
        let id = parked_enemy(&mut state, 500.0, 300.0);
        state
            .beams
            .push(Beam::new(99, Vec2::new(500.0, 300.0), Vec2::X, 10.0));
        state.emit_pulse();

        tick(&mut state, &TickInput::default());

        // The beam rule runs first and claims the kill
        let kills: Vec<_> = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Destroyed { id: got, .. } if *got == id))
            .collect();
        assert_eq!(
            kills,
            vec![&GameEvent::Destroyed {
                group: Group::Enemies,
                id,
                by: Group::Beams,
            }]
        );
        assert_eq!(state.score.value(), 10);
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.pulses.len(), 1);
    }

    #[test]
    fn test_pulse_clears_screen_without_score() {
        let mut state = quiet_state();
        parked_enemy(&mut state, 300.0, 200.0);
        parked_enemy(&mut state, 1300.0, 200.0);
        state.bombs.push(Bomb::new(50, Vec2::new(200.0, 700.0), Vec2::Y, 6.0, BOMB));
        state.emit_pulse();

        tick(&mut state, &TickInput::default());
        assert!(state.enemies.is_empty());
        assert!(state.bombs.is_empty());
        assert_eq!(state.score.value(), 0);
        assert_eq!(state.explosions.len(), 3);
        assert_eq!(state.pulses.len(), 1);
    }

    #[test]
    fn test_shield_blocks_bomb_and_persists() {
        let mut state = quiet_state();
        state.score.add(50);
        assert!(purchase(&mut state, PowerUp::Shield));
        let wall = state.shields[0].pos;
        state.bombs.push(Bomb::new(50, wall, Vec2::Y, 6.0, BOMB));

        tick(&mut state, &TickInput::default());
        assert!(state.bombs.is_empty());
        assert_eq!(state.shields.len(), 1);
        assert_eq!(state.explosions[0].lifetime, 50);
        assert_eq!(state.score.value(), 0);
    }

    #[test]
    fn test_gravity_scores_bombs() {
        let mut state = quiet_state();
        state.score.add(50);
        assert!(purchase(&mut state, PowerUp::Gravity));
        let near_edge = state.player.pos + Vec2::new(180.0, 0.0);
        state.bombs.push(Bomb::new(50, near_edge, Vec2::Y, 6.0, BOMB));

        tick(&mut state, &TickInput::default());
        assert!(state.bombs.is_empty());
        assert_eq!(state.score.value(), 1);
        assert_eq!(state.gravities.len(), 1);
    }

    #[test]
    fn test_bomb_ends_normal_run() {
        let mut state = quiet_state();
        let pos = state.player.pos;
        state.bombs.push(Bomb::new(50, pos, Vec2::Y, 6.0, BOMB));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.player.expression, Expression::Sad);
        assert!(state.bombs.is_empty());
        assert_eq!(state.frame, 1);

        // Further ticks are ignored entirely
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert!(state.beams.is_empty());
        assert!(state.events.is_empty());
        assert_eq!(state.frame, 1);
    }

    #[test]
    fn test_bombs_drop_on_interval_once_parked() {
        let mut state = quiet_state();
        let dropper = state.spawn_enemy_with(EnemyParams {
            x: 300.0,
            stop_altitude: 30.0,
            bomb_interval: 5,
            variant: 0,
        });
        let right = TickInput {
            held: HeldDirections {
                right: true,
                ..Default::default()
            },
            ..Default::default()
        };

        let mut drops = Vec::new();
        while state.frame <= 20 {
            let frame = state.frame;
            let target = state.player.pos;
            let parked = state.enemies[0].state == EnemyState::Stopped;
            tick(&mut state, &right);

            for event in &state.events {
                let GameEvent::BombDropped { id, enemy } = event else {
                    continue;
                };
                assert_eq!(*enemy, dropper);
                assert!(parked, "bomb dropped while descending at frame {frame}");

                // Aimed from the enemy's center at where the player stood this tick
                let bomb = state.bombs.iter().find(|b| b.id == *id).unwrap();
                let aim = (target - state.enemies[0].pos).normalize();
                assert!((bomb.vel - aim).length() < 1e-5);
                drops.push(frame);
            }
        }

        // Frame 5 comes while the enemy is still descending
        assert_eq!(drops, vec![10, 15, 20]);
        assert_eq!(state.bombs.len(), 3);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_spawn_then_drop_then_collide() {
        let mut state = GameState::new(12345);
        state.frame = 200;
        let dropper = state.spawn_enemy_with(EnemyParams {
            x: 300.0,
            stop_altitude: 0.0,
            bomb_interval: 50,
            variant: 0,
        });
        let origin = {
            let enemy = &mut state.enemies[0];
            enemy.pos.y = 200.0;
            enemy.vy = 0.0;
            enemy.state = EnemyState::Stopped;
            enemy.bomb_origin()
        };
        state.shields.push(Shield {
            id: 900,
            pos: origin,
            horizontal: true,
            life: 400,
        });

        tick(&mut state, &TickInput::default());

        let events = &state.events;
        let spawned = events
            .iter()
            .position(|e| matches!(e, GameEvent::EnemySpawned { .. }))
            .unwrap();
        let dropped = events
            .iter()
            .position(|e| matches!(e, GameEvent::BombDropped { .. }))
            .unwrap();
        let blocked = events
            .iter()
            .position(|e| {
                matches!(
                    e,
                    GameEvent::Destroyed {
                        group: Group::Bombs,
                        by: Group::Shields,
                        ..
                    }
                )
            })
            .unwrap();
        assert!(spawned < dropped && dropped < blocked);

        // Only the parked enemy dropped; the fresh one is still descending
        let drops: Vec<_> = state
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::BombDropped { enemy, .. } => Some(*enemy),
                _ => None,
            })
            .collect();
        assert_eq!(drops, vec![dropper]);
        assert_eq!(state.enemies.len(), 2);
        assert!(state.bombs.is_empty());
        assert_eq!(state.explosions.len(), 1);
    }

    #[test]
    fn test_hyper_absorbs_bombs() {
        let mut state = quiet_state();
        state.player.set_mode(Mode::Hyper, 500);
        let pos = state.player.pos;
        state.bombs.push(Bomb::new(50, pos, Vec2::Y, 6.0, BOMB));
        state
            .bombs
            .push(Bomb::new(51, pos + Vec2::new(20.0, 0.0), Vec2::Y, 6.0, BOMB));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.bombs.is_empty());
        assert_eq!(state.score.value(), 2);
        assert_eq!(state.explosions.len(), 2);
    }

    #[test]
    fn test_fire_uses_facing() {
        let mut state = quiet_state();
        state.player.facing = Facing::LEFT;
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.beams.len(), 1);
        // Spawned 100 left of the player, then moved once
        assert_eq!(state.beams[0].pos, Vec2::new(790.0, 400.0));
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let inputs = [
            TickInput {
                fire: true,
                ..Default::default()
            },
            TickInput {
                held: HeldDirections {
                    up: true,
                    ..Default::default()
                },
                ..Default::default()
            },
            TickInput::default(),
        ];

        for n in 0..1200 {
            let input = &inputs[n % inputs.len()];
            tick(&mut state1, input);
            tick(&mut state2, input);
        }

        assert_eq!(state1.frame, state2.frame);
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        assert_eq!(state1.bombs.len(), state2.bombs.len());
        for (a, b) in state1.bombs.iter().zip(&state2.bombs) {
            assert_eq!(a.pos, b.pos);
        }
    }
}
