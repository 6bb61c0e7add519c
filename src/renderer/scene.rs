//! Scene building: game state to an ordered draw list

use glam::Vec2;

use super::sprite::{BirdPose, Sprite};
use crate::consts::*;
use crate::sim::geometry::Aabb;
use crate::sim::{Expression, GameState};

/// Draw layers, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Background,
    Player,
    Beams,
    Enemies,
    Bombs,
    Explosions,
    Pulses,
    Shields,
    Gravities,
    Overlay,
}

/// One sprite to draw
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCmd {
    pub layer: Layer,
    pub sprite: Sprite,
    pub center: Vec2,
    /// Extent on screen (the rotated bounding box for beams)
    pub size: Vec2,
}

/// Something that can show a scene
pub trait Canvas {
    type Error;

    fn draw(&mut self, cmd: &DrawCmd) -> Result<(), Self::Error>;

    /// Called once after every command was drawn
    fn present(&mut self) -> Result<(), Self::Error>;
}

/// A full frame, already in draw order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub commands: Vec<DrawCmd>,
}

impl Scene {
    fn push(&mut self, layer: Layer, sprite: Sprite, center: Vec2, size: Vec2) {
        self.commands.push(DrawCmd {
            layer,
            sprite,
            center,
            size,
        });
    }

    fn push_box(&mut self, layer: Layer, sprite: Sprite, bounds: Aabb) {
        self.push(layer, sprite, bounds.center, bounds.size());
    }

    /// Draw every command in order, then present
    pub fn paint<C: Canvas>(&self, canvas: &mut C) -> Result<(), C::Error> {
        for cmd in &self.commands {
            canvas.draw(cmd)?;
        }
        canvas.present()
    }

    pub fn count(&self, layer: Layer) -> usize {
        self.commands.iter().filter(|c| c.layer == layer).count()
    }
}

/// Build the frame for the current state
pub fn build_scene(state: &GameState) -> Scene {
    let mut scene = Scene::default();
    let screen = Aabb::screen();

    scene.push_box(Layer::Background, Sprite::Background, screen);

    let player = &state.player;
    let pose = match player.expression {
        Expression::Neutral => BirdPose::Facing(player.facing),
        Expression::Happy { .. } => BirdPose::Happy,
        Expression::Sad => BirdPose::Sad,
    };
    scene.push_box(
        Layer::Player,
        Sprite::Bird {
            pose,
            hyper: player.is_hyper(),
        },
        player.bounds(),
    );

    for beam in &state.beams {
        let sprite = Sprite::Beam {
            angle_degrees: beam.angle_degrees(),
        };
        scene.push_box(Layer::Beams, sprite, beam.bounds());
    }
    for enemy in &state.enemies {
        let sprite = Sprite::Enemy {
            variant: enemy.variant,
        };
        scene.push_box(Layer::Enemies, sprite, enemy.bounds());
    }
    for bomb in &state.bombs {
        let sprite = Sprite::Bomb {
            radius: bomb.radius,
            color: bomb.color,
        };
        scene.push_box(Layer::Bombs, sprite, bomb.bounds());
    }
    for explosion in &state.explosions {
        let sprite = Sprite::Explosion {
            frame: explosion.frame(),
        };
        scene.push(
            Layer::Explosions,
            sprite,
            explosion.pos,
            Vec2::splat(EXPLOSION_SIZE),
        );
    }
    for _ in &state.pulses {
        scene.push_box(Layer::Pulses, Sprite::ScreenPulse, screen);
    }
    for shield in &state.shields {
        let sprite = Sprite::Shield {
            horizontal: shield.horizontal,
        };
        scene.push_box(Layer::Shields, sprite, shield.bounds());
    }
    for gravity in &state.gravities {
        let sprite = Sprite::Gravity {
            radius: gravity.radius,
        };
        scene.push(
            Layer::Gravities,
            sprite,
            gravity.pos,
            Vec2::splat(gravity.radius * 2.0),
        );
    }

    scene.push(
        Layer::Overlay,
        Sprite::ScoreText(state.score.render()),
        Vec2::new(SCORE_X, SCORE_Y),
        Vec2::ZERO,
    );

    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Beam, GamePhase, Mode, TickInput, tick};

    /// Records what it was asked to draw
    #[derive(Default)]
    struct Recorder {
        layers: Vec<Layer>,
        presented: bool,
    }

    impl Canvas for Recorder {
        type Error = ();

        fn draw(&mut self, cmd: &DrawCmd) -> Result<(), ()> {
            self.layers.push(cmd.layer);
            Ok(())
        }

        fn present(&mut self) -> Result<(), ()> {
            self.presented = true;
            Ok(())
        }
    }

    #[test]
    fn test_layers_in_order() {
        let mut state = GameState::new(3);
        state.score.add(1000);
        let input = TickInput {
            fire: true,
            shield: true,
            pulse: true,
            gravity: true,
            ..Default::default()
        };
        tick(&mut state, &input);

        let mut recorder = Recorder::default();
        build_scene(&state).paint(&mut recorder).unwrap();

        assert!(recorder.presented);
        assert_eq!(recorder.layers.first(), Some(&Layer::Background));
        assert_eq!(recorder.layers.last(), Some(&Layer::Overlay));
        assert!(recorder.layers.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_score_text_and_bird_pose() {
        let mut state = GameState::new(3);
        state.score.add(42);
        state.player.set_mode(Mode::Hyper, 10);

        let scene = build_scene(&state);
        let last = scene.commands.last().unwrap();
        assert_eq!(last.sprite, Sprite::ScoreText("Score: 42".into()));
        assert_eq!(last.center, Vec2::new(SCORE_X, SCORE_Y));

        let bird = &scene.commands[1];
        assert_eq!(
            bird.sprite,
            Sprite::Bird {
                pose: BirdPose::Facing(crate::sim::Facing::RIGHT),
                hyper: true,
            }
        );
    }

    #[test]
    fn test_game_over_shows_sad_bird() {
        let mut state = GameState::new(3);
        state.frame = 1;
        let pos = state.player.pos;
        state.beams.clear();
        state.bombs.push(crate::sim::Bomb::new(
            7,
            pos,
            Vec2::Y,
            6.0,
            crate::sim::BombParams {
                radius: 12,
                color: [255, 0, 0],
            },
        ));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);

        let scene = build_scene(&state);
        assert!(scene.commands.iter().any(|c| matches!(
            c.sprite,
            Sprite::Bird {
                pose: BirdPose::Sad,
                ..
            }
        )));
    }

    #[test]
    fn test_beam_sprite_angle() {
        let mut state = GameState::new(3);
        state
            .beams
            .push(Beam::new(5, Vec2::new(800.0, 450.0), Vec2::new(0.0, -1.0), 10.0));
        let scene = build_scene(&state);
        assert_eq!(scene.count(Layer::Beams), 1);
        let beam = scene
            .commands
            .iter()
            .find(|c| c.layer == Layer::Beams)
            .unwrap();
        match beam.sprite {
            Sprite::Beam { angle_degrees } => assert!((angle_degrees - 90.0).abs() < 1e-4),
            ref other => panic!("unexpected sprite {other:?}"),
        }
    }
}
