pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod input;
pub mod rng;
pub mod sim;

pub use config::{GameConfig, Viewport};
pub use error::{ConfigError, ReplayError, RuleCode};
pub use input::FrameInput;
pub use sim::{replay, replay_strict, Game, GameMode, WorldSnapshot};
