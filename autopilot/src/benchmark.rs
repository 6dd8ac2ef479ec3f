//! Multi-seed benchmark: every bot plays every seed, the runs are ranked by
//! an [`Objective`], and the results land in `out_dir` as `summary.json`,
//! `runs.csv`, `standings.csv` plus the input streams of the best runs.

use crate::bots::bot_ids;
use crate::runner::{run_bot, write_inputs, RunMetrics};
use crate::util::seed_to_hex;
use anyhow::{anyhow, ensure, Context, Result};
use asteroids_core::GameConfig;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Points, with a small bonus for lives left.
    Score,
    /// Ticks alive, with a bonus for lives left.
    Survival,
    /// Levels cleared first, then asteroids and aliens destroyed.
    Progress,
}

impl Objective {
    pub fn run_value(self, metrics: &RunMetrics) -> f64 {
        let lives = f64::from(metrics.final_lives);
        match self {
            Self::Score => f64::from(metrics.final_score) + lives * 100.0,
            Self::Survival => f64::from(metrics.tick_count) + lives * 600.0,
            Self::Progress => {
                f64::from(metrics.final_level.saturating_sub(1)) * 1_000.0
                    + f64::from(metrics.asteroids_destroyed) * 25.0
                    + f64::from(metrics.aliens_destroyed) * 100.0
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Survival => "survival",
            Self::Progress => "progress",
        }
    }
}

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub bots: Vec<String>,
    pub seeds: Vec<u32>,
    pub max_ticks: u32,
    pub objective: Objective,
    pub game: GameConfig,
    pub out_dir: PathBuf,
    /// Input streams of this many best runs are kept under `best/`.
    pub save_top: usize,
    /// Worker threads; `None` lets rayon pick.
    pub jobs: Option<usize>,
}

/// One row of `runs.csv`. Flat so it serializes to a single CSV line.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RunRecord {
    pub bot_id: String,
    pub bot_fingerprint: String,
    pub seed: String,
    pub ticks: u32,
    pub score: u32,
    pub level: u32,
    pub lives: u32,
    pub asteroids_destroyed: u32,
    pub aliens_destroyed: u32,
    pub game_over: bool,
    /// `ok`, or `RULE@tick` for the first broken invariant.
    pub invariants: String,
    pub objective_value: f64,
}

impl RunRecord {
    fn new(metrics: &RunMetrics, objective: Objective) -> Self {
        let invariants = match metrics.invariant_breach {
            Some(breach) => format!("{}@{}", breach.rule, breach.tick),
            None => "ok".to_string(),
        };
        Self {
            bot_id: metrics.bot_id.clone(),
            bot_fingerprint: metrics.bot_fingerprint.clone(),
            seed: seed_to_hex(metrics.seed),
            ticks: metrics.tick_count,
            score: metrics.final_score,
            level: metrics.final_level,
            lives: metrics.final_lives,
            asteroids_destroyed: metrics.asteroids_destroyed,
            aliens_destroyed: metrics.aliens_destroyed,
            game_over: metrics.game_over,
            invariants,
            objective_value: objective.run_value(metrics),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.invariants == "ok"
    }
}

/// One row of `standings.csv`: a bot's results over every seed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BotStanding {
    pub bot_id: String,
    pub bot_fingerprint: String,
    pub runs: usize,
    pub clean_runs: usize,
    pub mean_objective: f64,
    pub mean_score: f64,
    pub best_score: u32,
    pub mean_level: f64,
    pub best_level: u32,
    pub mean_asteroids_destroyed: f64,
    pub aliens_destroyed: u32,
    /// Share of runs still alive at `max_ticks`.
    pub survival_rate: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SavedRun {
    pub rank: usize,
    pub bot_id: String,
    pub seed: String,
    pub objective_value: f64,
    pub inputs_path: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub objective: Objective,
    pub max_ticks: u32,
    pub jobs: Option<usize>,
    pub bots: Vec<String>,
    pub seeds: Vec<u32>,
    pub game: GameConfig,
    pub run_count: usize,
    pub clean_runs: usize,
    pub standings: Vec<BotStanding>,
    /// Best first.
    pub runs: Vec<RunRecord>,
    pub saved_runs: Vec<SavedRun>,
}

struct CompletedRun {
    record: RunRecord,
    inputs: Vec<u8>,
}

/// Comma-separated bot ids, checked against the roster and de-duplicated.
/// `None` selects every bot.
pub fn resolve_bots(list: Option<&str>) -> Result<Vec<String>> {
    let known = bot_ids();
    let Some(list) = list else {
        return Ok(known.iter().map(|id| (*id).to_string()).collect());
    };

    let mut bots: Vec<String> = Vec::new();
    for id in list.split(',').map(str::trim).filter(|id| !id.is_empty()) {
        if !known.iter().any(|known_id| *known_id == id) {
            return Err(anyhow!(
                "unknown bot '{id}'. available: {}",
                known.join(", ")
            ));
        }
        if !bots.iter().any(|bot| bot == id) {
            bots.push(id.to_string());
        }
    }
    ensure!(!bots.is_empty(), "--bots lists no bot ids");
    Ok(bots)
}

pub fn run_benchmark(config: BenchmarkConfig) -> Result<BenchmarkReport> {
    ensure!(!config.seeds.is_empty(), "benchmark needs at least one seed");
    ensure!(!config.bots.is_empty(), "benchmark needs at least one bot");
    ensure!(config.jobs != Some(0), "--jobs must be at least 1");
    config
        .game
        .validate()
        .context("benchmark game config is invalid")?;

    let tasks: Vec<(&str, u32)> = config
        .bots
        .iter()
        .flat_map(|bot| config.seeds.iter().map(move |seed| (bot.as_str(), *seed)))
        .collect();

    tracing::info!(
        runs = tasks.len(),
        max_ticks = config.max_ticks,
        objective = config.objective.as_str(),
        "benchmark started"
    );

    // num_threads(0) means rayon's default.
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs.unwrap_or(0))
        .build()
        .context("failed to build benchmark thread pool")?;
    let mut completed: Vec<CompletedRun> = pool.install(|| {
        tasks
            .par_iter()
            .map(|&(bot_id, seed)| -> Result<CompletedRun> {
                let artifact = run_bot(bot_id, &config.game, seed, config.max_ticks)
                    .with_context(|| format!("run failed for bot={bot_id} seed={seed:#x}"))?;
                Ok(CompletedRun {
                    record: RunRecord::new(&artifact.metrics, config.objective),
                    inputs: artifact.inputs,
                })
            })
            .collect::<Result<Vec<_>>>()
    })?;

    completed.sort_by(|a, b| compare_runs(&a.record, &b.record));

    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed creating {}", config.out_dir.display()))?;
    let saved_runs = save_best_runs(&config.out_dir, &completed, config.save_top)?;

    let runs: Vec<RunRecord> = completed.into_iter().map(|run| run.record).collect();
    let standings = standings(&runs);
    let clean_runs = runs.iter().filter(|run| run.is_clean()).count();
    if clean_runs < runs.len() {
        tracing::warn!(broken = runs.len() - clean_runs, "runs broke invariants");
    }

    write_csv(&config.out_dir.join("runs.csv"), &runs)?;
    write_csv(&config.out_dir.join("standings.csv"), &standings)?;

    let report = BenchmarkReport {
        objective: config.objective,
        max_ticks: config.max_ticks,
        jobs: config.jobs,
        bots: config.bots.clone(),
        seeds: config.seeds.clone(),
        game: config.game.clone(),
        run_count: runs.len(),
        clean_runs,
        standings,
        runs,
        saved_runs,
    };

    let summary_path = config.out_dir.join("summary.json");
    let encoded = serde_json::to_vec_pretty(&report).context("failed to serialize summary")?;
    fs::write(&summary_path, encoded)
        .with_context(|| format!("failed writing {}", summary_path.display()))?;
    tracing::info!(path = %summary_path.display(), "benchmark finished");

    Ok(report)
}

/// Clean runs before broken ones, then objective, level and kills, best first.
fn compare_runs(a: &RunRecord, b: &RunRecord) -> Ordering {
    b.is_clean()
        .cmp(&a.is_clean())
        .then_with(|| b.objective_value.total_cmp(&a.objective_value))
        .then_with(|| b.level.cmp(&a.level))
        .then_with(|| b.asteroids_destroyed.cmp(&a.asteroids_destroyed))
        .then_with(|| a.bot_id.cmp(&b.bot_id))
        .then_with(|| a.seed.cmp(&b.seed))
}

#[derive(Default)]
struct Tally {
    fingerprint: String,
    runs: usize,
    clean: usize,
    survived: usize,
    objective: f64,
    score: u64,
    best_score: u32,
    level: u64,
    best_level: u32,
    asteroids: u64,
    aliens: u32,
}

impl Tally {
    fn add(&mut self, run: &RunRecord) {
        if self.fingerprint.is_empty() {
            self.fingerprint = run.bot_fingerprint.clone();
        }
        self.runs += 1;
        self.clean += usize::from(run.is_clean());
        // A run that is not over stopped at the tick cap.
        self.survived += usize::from(!run.game_over);
        self.objective += run.objective_value;
        self.score += u64::from(run.score);
        self.best_score = self.best_score.max(run.score);
        self.level += u64::from(run.level);
        self.best_level = self.best_level.max(run.level);
        self.asteroids += u64::from(run.asteroids_destroyed);
        self.aliens = self.aliens.saturating_add(run.aliens_destroyed);
    }

    fn finish(self, bot_id: String) -> BotStanding {
        let runs = self.runs.max(1) as f64;
        BotStanding {
            bot_id,
            bot_fingerprint: self.fingerprint,
            runs: self.runs,
            clean_runs: self.clean,
            mean_objective: self.objective / runs,
            mean_score: self.score as f64 / runs,
            best_score: self.best_score,
            mean_level: self.level as f64 / runs,
            best_level: self.best_level,
            mean_asteroids_destroyed: self.asteroids as f64 / runs,
            aliens_destroyed: self.aliens,
            survival_rate: self.survived as f64 / runs,
        }
    }
}

fn standings(runs: &[RunRecord]) -> Vec<BotStanding> {
    let mut tallies: BTreeMap<&str, Tally> = BTreeMap::new();
    for run in runs {
        tallies.entry(run.bot_id.as_str()).or_default().add(run);
    }

    let mut standings: Vec<BotStanding> = tallies
        .into_iter()
        .map(|(bot_id, tally)| tally.finish(bot_id.to_string()))
        .collect();
    standings.sort_by(|a, b| {
        b.mean_objective
            .total_cmp(&a.mean_objective)
            .then_with(|| b.mean_level.total_cmp(&a.mean_level))
            .then_with(|| a.bot_id.cmp(&b.bot_id))
    });
    standings
}

/// `runs` must already be sorted best first.
fn save_best_runs(out_dir: &Path, runs: &[CompletedRun], count: usize) -> Result<Vec<SavedRun>> {
    let best_dir = out_dir.join("best");
    let mut saved = Vec::new();

    for (index, run) in runs.iter().take(count).enumerate() {
        let rank = index + 1;
        let record = &run.record;
        let stem = format!("{rank:02}-{}-{}", record.bot_id, record.seed);

        let inputs_path = best_dir.join(format!("{stem}.inputs"));
        write_inputs(&inputs_path, &run.inputs)?;
        let record_path = best_dir.join(format!("{stem}.json"));
        let encoded = serde_json::to_vec_pretty(record).context("failed to serialize run record")?;
        fs::write(&record_path, encoded)
            .with_context(|| format!("failed writing {}", record_path.display()))?;

        saved.push(SavedRun {
            rank,
            bot_id: record.bot_id.clone(),
            seed: record.seed.clone(),
            objective_value: record.objective_value,
            inputs_path: inputs_path.to_string_lossy().into_owned(),
        });
    }

    Ok(saved)
}

/// Writes rows of a flat serde struct as CSV, one column per field.
fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut out = String::new();
    for (index, row) in rows.iter().enumerate() {
        let Value::Object(fields) = serde_json::to_value(row)? else {
            return Err(anyhow!("csv rows must serialize to objects"));
        };
        if index == 0 {
            let header: Vec<&str> = fields.keys().map(String::as_str).collect();
            out.push_str(&header.join(","));
            out.push('\n');
        }
        let cells: Vec<String> = fields.values().map(csv_cell).collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    fs::write(path, out).with_context(|| format!("failed writing {}", path.display()))
}

fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) if text.contains(&[',', '"', '\n'][..]) => {
            format!("\"{}\"", text.replace('"', "\"\""))
        }
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
