//! Rendering module
//!
//! Turns the simulation state into a back-to-front list of sprites. Drawing
//! them is up to a [`Canvas`] implementation supplied by the frontend.

pub mod scene;
pub mod sprite;

pub use scene::{Canvas, DrawCmd, Layer, Scene, build_scene};
pub use sprite::{BirdPose, Sprite, colors};
