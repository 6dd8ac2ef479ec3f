use serde::Serialize;

use crate::config::GameConfig;
use crate::error::{ConfigError, ReplayError};
use crate::input::{decode_input_byte, first_reserved_input};

mod collision;
mod game;
pub mod motion;
pub mod spawner;

pub use game::Game;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ReplayResult {
    pub final_score: u32,
    pub final_level: u32,
    pub final_lives: u32,
    pub final_rng_state: u32,
    pub frames: u32,
    pub game_over: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ReplayCheckpoint {
    pub frame: u32,
    pub tick: u32,
    pub rng_state: u32,
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    pub asteroids: usize,
    pub bullets: usize,
    pub alien_active: bool,
    pub alien_bullets: usize,
    pub particles: usize,
    pub ship_x: f64,
    pub ship_y: f64,
    pub ship_vx: f64,
    pub ship_vy: f64,
    pub ship_angle: f64,
    pub ship_respawn_timer: u32,
    pub ship_fire_cooldown: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ShipSnapshot {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub angle: f64,
    pub size: f64,
    pub thrusting: bool,
    pub respawn_timer: u32,
    pub fire_cooldown: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AsteroidSnapshot {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: u32,
    pub health: u32,
    pub offsets: Vec<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BulletSnapshot {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AlienSnapshot {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ParticleSnapshot {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub life: f64,
}

/// Read-only view of one tick, everything a renderer needs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub tick: u32,
    pub mode: GameMode,
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    pub rng_state: u32,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub ship: ShipSnapshot,
    pub asteroids: Vec<AsteroidSnapshot>,
    pub bullets: Vec<BulletSnapshot>,
    pub alien: Option<AlienSnapshot>,
    pub alien_bullets: Vec<BulletSnapshot>,
    pub particles: Vec<ParticleSnapshot>,
}

impl WorldSnapshot {
    #[inline]
    pub fn is_game_over(&self) -> bool {
        matches!(self.mode, GameMode::GameOver)
    }
}

/// Plays a recorded input stream (one byte per tick) from a fresh game.
pub fn replay(config: &GameConfig, seed: u32, inputs: &[u8]) -> Result<ReplayResult, ConfigError> {
    let mut game = Game::new(config.clone(), seed)?;

    for input in inputs {
        game.step(decode_input_byte(*input));
    }

    Ok(game.result(inputs.len() as u32))
}

/// Like [`replay`], but rejects streams with reserved input bits and checks
/// every game invariant after each tick.
pub fn replay_strict(
    config: &GameConfig,
    seed: u32,
    inputs: &[u8],
) -> Result<ReplayResult, ReplayError> {
    if let Some((index, byte)) = first_reserved_input(inputs) {
        return Err(ReplayError::ReservedInputBits {
            frame: index as u32 + 1,
            byte,
        });
    }

    let mut game = Game::new(config.clone(), seed)?;
    game.validate_invariants()
        .map_err(|rule| ReplayError::RuleViolation { frame: 0, rule })?;

    for (index, input) in inputs.iter().enumerate() {
        game.step(decode_input_byte(*input));
        game.validate_invariants()
            .map_err(|rule| ReplayError::RuleViolation {
                frame: index as u32 + 1,
                rule,
            })?;
    }

    Ok(game.result(inputs.len() as u32))
}

pub fn replay_with_checkpoints(
    config: &GameConfig,
    seed: u32,
    inputs: &[u8],
    sample_every: u32,
) -> Result<Vec<ReplayCheckpoint>, ConfigError> {
    let mut game = Game::new(config.clone(), seed)?;
    let stride = if sample_every == 0 { 1 } else { sample_every };
    let total_frames = inputs.len() as u32;
    let mut checkpoints = Vec::new();
    checkpoints.push(game.checkpoint(0));

    for (index, input) in inputs.iter().enumerate() {
        game.step(decode_input_byte(*input));
        let frame = (index + 1) as u32;
        if frame % stride == 0 || frame == total_frames {
            checkpoints.push(game.checkpoint(frame));
        }
    }

    Ok(checkpoints)
}
