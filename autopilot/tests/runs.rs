use asteroids_autopilot::benchmark::{run_benchmark, BenchmarkConfig, BenchmarkReport, Objective};
use asteroids_autopilot::bots::{bot_ids, bot_manifest_entries};
use asteroids_autopilot::runner::{read_inputs, replay_inputs, run_bot, write_inputs};
use asteroids_core::GameConfig;
use std::fs;

const SMOKE_SEED: u32 = 0xC0FF_EE01;
const SMOKE_TICKS: u32 = 1_500;

#[test]
fn every_bot_completes_a_smoke_run() {
    let config = GameConfig::default();
    for id in bot_ids() {
        let artifact = run_bot(id, &config, SMOKE_SEED, SMOKE_TICKS)
            .unwrap_or_else(|err| panic!("bot {id} failed: {err:#}"));

        assert_eq!(artifact.metrics.bot_id, id);
        assert_eq!(artifact.inputs.len() as u32, artifact.metrics.tick_count);
        assert!(artifact.metrics.tick_count <= SMOKE_TICKS);
        assert!(artifact.metrics.game_over || artifact.metrics.tick_count == SMOKE_TICKS);
        assert!(artifact.metrics.fire_ticks <= artifact.metrics.action_ticks);
        assert_eq!(artifact.metrics.invariant_breach, None, "bot {id}");
    }
}

#[test]
fn recorded_inputs_replay_from_disk() {
    let config = GameConfig::default();
    let artifact = run_bot("hunter", &config, SMOKE_SEED, SMOKE_TICKS).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("hunter.inputs");
    write_inputs(&path, &artifact.inputs).unwrap();
    let inputs = read_inputs(&path).unwrap();
    assert_eq!(inputs, artifact.inputs);

    let replayed = replay_inputs(&config, SMOKE_SEED, &inputs, true).unwrap();

    assert_eq!(replayed.frames, artifact.metrics.tick_count);
    assert_eq!(replayed.final_score, artifact.metrics.final_score);
    assert_eq!(replayed.final_rng_state, artifact.metrics.final_rng_state);
    assert_eq!(replayed.final_level, artifact.metrics.final_level);
    assert_eq!(replayed.final_lives, artifact.metrics.final_lives);
}

#[test]
fn strict_replay_rejects_reserved_bits() {
    let config = GameConfig::default();
    let mut inputs = vec![0u8; 10];
    inputs[4] = 0x80;

    assert!(replay_inputs(&config, SMOKE_SEED, &inputs, false).is_ok());
    let err = replay_inputs(&config, SMOKE_SEED, &inputs, true).unwrap_err();
    assert!(format!("{err:#}").contains("frame 5"), "{err:#}");
}

#[test]
fn unknown_bot_is_an_error() {
    let err = run_bot("no-such-bot", &GameConfig::default(), 1, 10).unwrap_err();
    assert!(err.to_string().contains("no-such-bot"));
}

#[test]
fn manifest_hashes_are_stable_and_distinct() {
    let first = bot_manifest_entries();
    let second = bot_manifest_entries();
    assert_eq!(first.len(), bot_ids().len());

    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.config_hash, b.config_hash);
        assert!(a.config_hash.starts_with("fnv1a:"));
    }
    for (i, a) in first.iter().enumerate() {
        for b in &first[i + 1..] {
            assert_ne!(a.config_hash, b.config_hash, "{} vs {}", a.id, b.id);
        }
    }
}

#[test]
fn benchmark_writes_reports() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("bench");

    let report = run_benchmark(BenchmarkConfig {
        bots: vec!["hunter".to_string(), "idle".to_string()],
        seeds: vec![1, 2, 3],
        max_ticks: 600,
        objective: Objective::Progress,
        game: GameConfig::default(),
        out_dir: out_dir.clone(),
        save_top: 2,
        jobs: Some(2),
    })
    .unwrap();

    assert_eq!(report.run_count, 6);
    assert_eq!(report.clean_runs, 6);
    assert_eq!(report.standings.len(), 2);
    assert_eq!(report.saved_runs.len(), 2);
    for window in report.runs.windows(2) {
        assert!(window[0].objective_value >= window[1].objective_value);
    }
    for saved in &report.saved_runs {
        assert!(fs::metadata(&saved.inputs_path).is_ok(), "missing {}", saved.inputs_path);
    }
    // The idle bot never fires, so it cannot destroy anything.
    let idle = report
        .standings
        .iter()
        .find(|standing| standing.bot_id == "idle")
        .unwrap();
    assert_eq!(idle.mean_asteroids_destroyed, 0.0);
    assert_eq!(idle.mean_objective, 0.0);

    let summary = fs::read(out_dir.join("summary.json")).unwrap();
    let parsed: BenchmarkReport = serde_json::from_slice(&summary).unwrap();
    assert_eq!(parsed.run_count, 6);
    assert_eq!(parsed.objective, Objective::Progress);
    assert_eq!(parsed.runs.len(), report.runs.len());
    assert_eq!(parsed.runs[0].seed, report.runs[0].seed);

    let runs_csv = fs::read_to_string(out_dir.join("runs.csv")).unwrap();
    let mut lines = runs_csv.lines();
    let header = lines.next().unwrap();
    assert!(header.contains("asteroids_destroyed"));
    assert!(header.contains("invariants"));
    assert_eq!(lines.count(), 6);
    let standings_csv = fs::read_to_string(out_dir.join("standings.csv")).unwrap();
    assert_eq!(standings_csv.lines().count(), 3);
}

#[test]
fn benchmark_rejects_empty_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_benchmark(BenchmarkConfig {
        bots: vec!["idle".to_string()],
        seeds: Vec::new(),
        max_ticks: 10,
        objective: Objective::Score,
        game: GameConfig::default(),
        out_dir: dir.path().to_path_buf(),
        save_top: 0,
        jobs: None,
    })
    .unwrap_err();
    assert!(err.to_string().contains("seed"));
}
