use anyhow::{anyhow, Context, Result};
use asteroids_autopilot::benchmark::{resolve_bots, run_benchmark, BenchmarkConfig, Objective};
use asteroids_autopilot::bots::{bot_ids, bot_manifest_entries, create_bot, describe_bots};
use asteroids_autopilot::config::{
    load_game_config, read_env_optional_usize, read_env_u32, DEFAULT_MAX_TICKS, JOBS_ENV,
    MAX_TICKS_ENV,
};
use asteroids_autopilot::runner::{read_inputs, replay_inputs, run_bot, write_inputs};
use asteroids_autopilot::util::{parse_seed, parse_seed_csv, parse_seed_file, seed_range, seed_to_hex};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser, Debug)]
#[command(name = "asteroids-autopilot")]
#[command(about = "Scripted pilots, replays and benchmarks for the Asteroids simulation")]
struct Cli {
    /// Game config JSON; falls back to $ASTEROIDS_CONFIG, then built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available bots
    ListBots {
        /// Print the full manifest (including config fingerprints) as JSON
        #[arg(long, default_value_t = false)]
        manifest: bool,
    },
    /// Play one game with a bot and record its inputs
    Run {
        #[arg(long)]
        bot: String,
        #[arg(long)]
        seed: String,
        #[arg(long)]
        max_ticks: Option<u32>,
        /// Where to write the recorded input stream (one byte per tick)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Also write the final world snapshot as JSON
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Replay a recorded input stream and print the outcome
    Replay {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        seed: String,
        /// Reject reserved input bits and check invariants every tick
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// Run a multi-seed benchmark across one or more bots
    Benchmark {
        #[arg(long)]
        bots: Option<String>,
        #[arg(long)]
        seeds: Option<String>,
        #[arg(long)]
        seed_file: Option<PathBuf>,
        #[arg(long)]
        seed_start: Option<String>,
        #[arg(long, default_value_t = 12)]
        seed_count: u32,
        #[arg(long)]
        max_ticks: Option<u32>,
        #[arg(long, value_enum, default_value_t = CliObjective::Score)]
        objective: CliObjective,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long, default_value_t = 3)]
        save_top: usize,
        #[arg(long)]
        jobs: Option<usize>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliObjective {
    Score,
    Survival,
    Progress,
}

impl From<CliObjective> for Objective {
    fn from(value: CliObjective) -> Self {
        match value {
            CliObjective::Score => Objective::Score,
            CliObjective::Survival => Objective::Survival,
            CliObjective::Progress => Objective::Progress,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let Cli { config, command } = Cli::parse();
    let game_config = load_game_config(config.as_deref())?;
    let default_max_ticks = read_env_u32(MAX_TICKS_ENV, DEFAULT_MAX_TICKS);

    match command {
        Commands::ListBots { manifest } => {
            if manifest {
                let encoded = serde_json::to_string_pretty(&bot_manifest_entries())?;
                println!("{encoded}");
            } else {
                for (id, description) in describe_bots() {
                    println!("{id:12} {description}");
                }
            }
        }
        Commands::Run {
            bot,
            seed,
            max_ticks,
            output,
            snapshot,
        } => {
            if create_bot(&bot).is_none() {
                let available = bot_ids().join(", ");
                return Err(anyhow!("unknown bot '{bot}'. available: {available}"));
            }
            let seed = parse_seed(&seed)?;
            let max_ticks = max_ticks.unwrap_or(default_max_ticks);
            let artifact = run_bot(&bot, &game_config, seed, max_ticks)?;
            let output_path = output.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "runs/{}-{}-score{}-ticks{}.inputs",
                    bot,
                    seed_to_hex(seed).replace("0x", "seed"),
                    artifact.metrics.final_score,
                    artifact.metrics.tick_count
                ))
            });
            write_inputs(&output_path, &artifact.inputs)?;

            if let Some(path) = snapshot {
                let encoded = serde_json::to_vec_pretty(&artifact.final_world)
                    .context("failed to serialize final snapshot")?;
                fs::write(&path, encoded)
                    .with_context(|| format!("failed writing {}", path.display()))?;
                println!("snapshot={}", path.display());
            }

            println!("bot={}", artifact.metrics.bot_id);
            println!("bot_fingerprint={}", artifact.metrics.bot_fingerprint);
            println!("seed={}", seed_to_hex(seed));
            println!("ticks={}", artifact.metrics.tick_count);
            println!("score={}", artifact.metrics.final_score);
            println!("lives={}", artifact.metrics.final_lives);
            println!("level={}", artifact.metrics.final_level);
            println!("game_over={}", artifact.metrics.game_over);
            println!("asteroids_destroyed={}", artifact.metrics.asteroids_destroyed);
            println!("aliens_destroyed={}", artifact.metrics.aliens_destroyed);
            match artifact.metrics.invariant_breach {
                Some(breach) => println!("invariants={}@{}", breach.rule, breach.tick),
                None => println!("invariants=ok"),
            }
            println!("rng={:#010x}", artifact.metrics.final_rng_state);
            println!("output={}", output_path.display());
        }
        Commands::Replay {
            input,
            seed,
            strict,
        } => {
            let seed = parse_seed(&seed)?;
            let inputs = read_inputs(&input)?;
            let result = replay_inputs(&game_config, seed, &inputs, strict)
                .with_context(|| format!("replay of {} failed", input.display()))?;

            println!("seed={}", seed_to_hex(seed));
            println!("frames={}", result.frames);
            println!("score={}", result.final_score);
            println!("lives={}", result.final_lives);
            println!("level={}", result.final_level);
            println!("game_over={}", result.game_over);
            println!("rng={:#010x}", result.final_rng_state);
        }
        Commands::Benchmark {
            bots,
            seeds,
            seed_file,
            seed_start,
            seed_count,
            max_ticks,
            objective,
            out_dir,
            save_top,
            jobs,
        } => {
            let bots = resolve_bots(bots.as_deref())?;
            let seeds = if let Some(raw) = seeds {
                parse_seed_csv(&raw)?
            } else if let Some(path) = seed_file {
                parse_seed_file(&path)?
            } else {
                let start = match seed_start {
                    Some(raw) => parse_seed(&raw)?,
                    None => 1,
                };
                if seed_count == 0 {
                    return Err(anyhow!("--seed-count must be >= 1"));
                }
                seed_range(start, seed_count)
            };

            let objective: Objective = objective.into();
            let out_dir = out_dir.unwrap_or_else(|| {
                let stamp = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_secs();
                PathBuf::from(format!("benchmarks/{}-{stamp}", objective.as_str()))
            });

            let report = run_benchmark(BenchmarkConfig {
                bots,
                seeds,
                max_ticks: max_ticks.unwrap_or(default_max_ticks),
                objective,
                game: game_config,
                out_dir: out_dir.clone(),
                save_top,
                jobs: jobs.or_else(|| read_env_optional_usize(JOBS_ENV)),
            })?;

            println!("runs={} clean={}", report.run_count, report.clean_runs);
            for (rank, standing) in report.standings.iter().enumerate() {
                println!(
                    "#{:<2} {:12} objective={:.1} mean_level={:.2} best_level={} mean_kills={:.1} mean_score={:.1} survival={:.2}",
                    rank + 1,
                    standing.bot_id,
                    standing.mean_objective,
                    standing.mean_level,
                    standing.best_level,
                    standing.mean_asteroids_destroyed,
                    standing.mean_score,
                    standing.survival_rate
                );
            }
            println!("out_dir={}", out_dir.display());
        }
    }

    Ok(())
}
