use crate::bots::{bot_fingerprint, create_bot, AutopilotBot};
use anyhow::{anyhow, Context, Result};
use asteroids_core::input::{encode_input_byte, INPUT_DOWN, INPUT_FIRE, INPUT_LEFT, INPUT_RIGHT, INPUT_UP};
use asteroids_core::sim::WorldSnapshot;
use asteroids_core::{replay, replay_strict, Game, GameConfig, RuleCode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// First invariant a run broke, and the tick it broke on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvariantBreach {
    pub tick: u32,
    pub rule: RuleCode,
}

#[derive(Clone, Debug, Serialize)]
pub struct RunMetrics {
    pub bot_id: String,
    pub bot_fingerprint: String,
    pub seed: u32,
    pub max_ticks: u32,
    pub tick_count: u32,
    pub final_score: u32,
    pub final_rng_state: u32,
    pub final_lives: u32,
    pub final_level: u32,
    pub game_over: bool,
    pub asteroids_destroyed: u32,
    pub aliens_destroyed: u32,
    /// `None` when every tick passed `Game::validate_invariants`.
    pub invariant_breach: Option<InvariantBreach>,
    pub action_ticks: u32,
    pub turn_ticks: u32,
    pub thrust_ticks: u32,
    pub fire_ticks: u32,
}

#[derive(Clone, Debug)]
pub struct RunArtifact {
    pub metrics: RunMetrics,
    /// One encoded input byte per tick, replayable with `asteroids_core::replay`.
    pub inputs: Vec<u8>,
    pub final_world: WorldSnapshot,
}

pub fn run_bot(bot_id: &str, config: &GameConfig, seed: u32, max_ticks: u32) -> Result<RunArtifact> {
    let mut bot = create_bot(bot_id).ok_or_else(|| anyhow!("unknown bot '{bot_id}'"))?;
    run_bot_instance(bot.as_mut(), config, seed, max_ticks)
}

/// Plays one game until it ends or `max_ticks` have run, then replays the
/// recorded inputs from scratch and fails if the outcome differs.
pub fn run_bot_instance(
    bot: &mut dyn AutopilotBot,
    config: &GameConfig,
    seed: u32,
    max_ticks: u32,
) -> Result<RunArtifact> {
    if max_ticks == 0 {
        return Err(anyhow!("max_ticks must be > 0"));
    }

    bot.reset(seed);

    let mut game = Game::new(config.clone(), seed).context("failed to start game")?;
    game.validate_invariants()
        .map_err(|rule| anyhow!("initial invariant failure: {rule}"))?;

    let mut world = game.snapshot();
    let mut inputs = Vec::with_capacity(max_ticks as usize);
    let mut invariant_breach = None;

    while (inputs.len() as u32) < max_ticks && !world.is_game_over() {
        let input = bot.next_input(&world);
        inputs.push(encode_input_byte(input));
        game.step(input);
        if invariant_breach.is_none() {
            if let Err(rule) = game.validate_invariants() {
                tracing::warn!(bot = bot.id(), seed, tick = game.tick(), %rule, "invariant broken");
                invariant_breach = Some(InvariantBreach {
                    tick: game.tick(),
                    rule,
                });
            }
        }
        world = game.snapshot();
    }

    let tick_count = inputs.len() as u32;
    let result = game.result(tick_count);
    let replayed = replay(config, seed, &inputs).context("failed to replay recorded inputs")?;
    if replayed != result {
        return Err(anyhow!(
            "replay diverged for bot={} seed={seed:#x}: live={result:?} replay={replayed:?}",
            bot.id()
        ));
    }

    tracing::debug!(
        bot = bot.id(),
        seed,
        ticks = tick_count,
        score = result.final_score,
        level = result.final_level,
        "run finished"
    );

    let mut action_ticks = 0u32;
    let mut turn_ticks = 0u32;
    let mut thrust_ticks = 0u32;
    let mut fire_ticks = 0u32;
    for byte in &inputs {
        if *byte != 0 {
            action_ticks += 1;
        }
        if (*byte & (INPUT_LEFT | INPUT_RIGHT)) != 0 {
            turn_ticks += 1;
        }
        if (*byte & (INPUT_UP | INPUT_DOWN)) != 0 {
            thrust_ticks += 1;
        }
        if (*byte & INPUT_FIRE) != 0 {
            fire_ticks += 1;
        }
    }

    Ok(RunArtifact {
        metrics: RunMetrics {
            bot_id: bot.id().to_string(),
            bot_fingerprint: bot_fingerprint(bot.id()).unwrap_or_else(|| "unknown".to_string()),
            seed,
            max_ticks,
            tick_count,
            final_score: result.final_score,
            final_rng_state: result.final_rng_state,
            final_lives: result.final_lives,
            final_level: result.final_level,
            game_over: result.game_over,
            asteroids_destroyed: game.asteroids_destroyed(),
            aliens_destroyed: game.aliens_destroyed(),
            invariant_breach,
            action_ticks,
            turn_ticks,
            thrust_ticks,
            fire_ticks,
        },
        inputs,
        final_world: world,
    })
}

/// Replays a recorded input file. With `strict`, reserved input bits and
/// invariant violations are errors.
pub fn replay_inputs(
    config: &GameConfig,
    seed: u32,
    inputs: &[u8],
    strict: bool,
) -> Result<asteroids_core::sim::ReplayResult> {
    if strict {
        Ok(replay_strict(config, seed, inputs)?)
    } else {
        Ok(replay(config, seed, inputs)?)
    }
}

pub fn write_inputs(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("failed writing {}", path.display()))
}

pub fn read_inputs(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed reading {}", path.display()))
}
