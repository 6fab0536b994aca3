//! Infinite tile-exploration sandbox: a sparse, lazily generated grid of
//! grass and resource nodes that a player walks around and harvests.

pub mod config;
pub mod data;
pub mod game;
pub mod input;
pub mod map;
pub mod player;
pub mod render;
pub mod viewport;

pub use config::{ConfigError, GameConfig};
pub use game::{Flow, Game, run_headless};
