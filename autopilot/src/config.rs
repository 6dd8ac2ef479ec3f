use anyhow::{Context, Result};
use asteroids_core::GameConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "ASTEROIDS_CONFIG";
pub const JOBS_ENV: &str = "AUTOPILOT_JOBS";
pub const MAX_TICKS_ENV: &str = "AUTOPILOT_MAX_TICKS";

pub const DEFAULT_MAX_TICKS: u32 = 18_000; // 5 minutes at 60 ticks/s

/// Game tuning for a run. An explicit `--config` wins over `ASTEROIDS_CONFIG`;
/// with neither, the built-in defaults are used. Missing keys in the JSON
/// keep their defaults.
pub fn load_game_config(path: Option<&Path>) -> Result<GameConfig> {
    let path = path
        .map(Path::to_path_buf)
        .or_else(|| env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));

    let Some(path) = path else {
        return Ok(GameConfig::default());
    };

    let config = read_game_config(&path)?;
    tracing::info!(path = %path.display(), "loaded game config");
    Ok(config)
}

pub fn read_game_config(path: &Path) -> Result<GameConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading game config {}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .with_context(|| format!("failed parsing game config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid game config {}", path.display()))?;
    Ok(config)
}

pub fn read_env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

pub fn read_env_optional_usize(name: &str) -> Option<usize> {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use asteroids_core::ConfigError;

    #[test]
    fn partial_config_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        fs::write(
            &path,
            r#"{ "starting_lives": 2, "viewport": { "width": 1024.0, "height": 768.0 } }"#,
        )
        .unwrap();

        let config = load_game_config(Some(&path)).unwrap();

        assert_eq!(config.starting_lives, 2);
        assert_eq!(config.viewport.width, 1024.0);
        assert_eq!(config.ship_size, GameConfig::default().ship_size);
    }

    #[test]
    fn invalid_config_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        fs::write(&path, r#"{ "base_asteroid_count": 0 }"#).unwrap();

        let err = read_game_config(&path).unwrap_err();

        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::ZeroAsteroidCount)
        );
    }

    #[test]
    fn unparsable_env_values_fall_back() {
        // Unique names so parallel tests never race on the same variable.
        env::set_var("AUTOPILOT_TEST_U32_BAD", "nope");
        env::set_var("AUTOPILOT_TEST_U32_ZERO", "0");
        env::set_var("AUTOPILOT_TEST_USIZE_OK", "3");

        assert_eq!(read_env_u32("AUTOPILOT_TEST_U32_BAD", 7), 7);
        assert_eq!(read_env_u32("AUTOPILOT_TEST_U32_ZERO", 7), 7);
        assert_eq!(read_env_optional_usize("AUTOPILOT_TEST_USIZE_OK"), Some(3));
        assert_eq!(read_env_optional_usize("AUTOPILOT_TEST_UNSET"), None);
    }
}
