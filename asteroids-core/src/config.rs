//! Runtime game configuration.
//!
//! [`GameConfig::default`] reproduces the classic tuning in
//! [`crate::constants`]. Configs are plain serde structs so a driver can load
//! a partial JSON file and keep defaults for every missing key.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

/// Smallest `asteroid_verts` that still yields at least a triangle.
pub const MIN_ASTEROID_VERTS: u32 = 6;

/// Wrap domain and spawn bounds. May change between ticks.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Result<Self, ConfigError> {
        let viewport = Self { width, height };
        viewport.validate()?;
        Ok(viewport)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0;
        if !valid {
            return Err(ConfigError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub viewport: Viewport,
    pub starting_lives: u32,

    pub ship_size: f64,
    pub ship_thrust: f64,
    pub ship_friction: f64,
    pub ship_turn_speed: f64,
    pub max_ship_speed: f64,
    pub ship_respawn_ticks: u32,
    pub fire_cooldown_ticks: u32,
    pub bullet_speed: f64,
    pub bullet_radius: f64,

    pub asteroid_verts: u32,
    pub asteroid_jag: f64,
    pub asteroid_max_size: u32,
    pub asteroid_min_size: u32,
    pub asteroid_health: u32,
    pub base_asteroid_count: u32,
    pub base_asteroid_speed: f64,
    pub spawn_retry_limit: u32,

    pub alien_size: f64,
    pub alien_min_level: u32,
    pub alien_fire_interval_ticks: u32,
    pub alien_bullet_speed: f64,
    pub alien_score: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            starting_lives: STARTING_LIVES,
            ship_size: SHIP_SIZE,
            ship_thrust: SHIP_THRUST,
            ship_friction: SHIP_FRICTION,
            ship_turn_speed: SHIP_TURN_SPEED,
            max_ship_speed: SHIP_MAX_SPEED,
            ship_respawn_ticks: SHIP_RESPAWN_TICKS,
            fire_cooldown_ticks: SHIP_FIRE_COOLDOWN_TICKS,
            bullet_speed: BULLET_SPEED,
            bullet_radius: BULLET_RADIUS,
            asteroid_verts: ASTEROID_VERTS,
            asteroid_jag: ASTEROID_JAG,
            asteroid_max_size: ASTEROID_MAX_SIZE,
            asteroid_min_size: ASTEROID_MIN_SIZE,
            asteroid_health: ASTEROID_HEALTH,
            base_asteroid_count: BASE_ASTEROID_COUNT,
            base_asteroid_speed: BASE_ASTEROID_SPEED,
            spawn_retry_limit: SPAWN_RETRY_LIMIT,
            alien_size: ALIEN_SIZE,
            alien_min_level: ALIEN_MIN_LEVEL,
            alien_fire_interval_ticks: ALIEN_FIRE_INTERVAL_TICKS,
            alien_bullet_speed: ALIEN_BULLET_SPEED,
            alien_score: ALIEN_SCORE,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.viewport.validate()?;

        if self.starting_lives == 0 {
            return Err(ConfigError::ZeroStartingLives);
        }
        if self.base_asteroid_count == 0 {
            return Err(ConfigError::ZeroAsteroidCount);
        }
        if self.spawn_retry_limit == 0 {
            return Err(ConfigError::ZeroSpawnRetryLimit);
        }

        let positive_fields = [
            ("ship_size", self.ship_size),
            ("ship_thrust", self.ship_thrust),
            ("ship_turn_speed", self.ship_turn_speed),
            ("max_ship_speed", self.max_ship_speed),
            ("bullet_speed", self.bullet_speed),
            ("bullet_radius", self.bullet_radius),
            ("base_asteroid_speed", self.base_asteroid_speed),
            ("alien_size", self.alien_size),
            ("alien_bullet_speed", self.alien_bullet_speed),
        ];
        for (field, value) in positive_fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if !(self.ship_friction > 0.0 && self.ship_friction <= 1.0) {
            return Err(ConfigError::FrictionOutOfRange {
                value: self.ship_friction,
            });
        }
        if !(self.asteroid_jag >= 0.0 && self.asteroid_jag < 1.0) {
            return Err(ConfigError::JagOutOfRange {
                value: self.asteroid_jag,
            });
        }
        if self.asteroid_min_size == 0 || self.asteroid_min_size > self.asteroid_max_size {
            return Err(ConfigError::AsteroidSizeRange {
                min: self.asteroid_min_size,
                max: self.asteroid_max_size,
            });
        }
        if self.asteroid_verts < MIN_ASTEROID_VERTS {
            return Err(ConfigError::TooFewVertices {
                verts: self.asteroid_verts,
                min: MIN_ASTEROID_VERTS,
            });
        }
        if self.asteroid_health == 0 {
            return Err(ConfigError::NonPositive {
                field: "asteroid_health",
                value: 0.0,
            });
        }

        Ok(())
    }

    /// Size of every asteroid in a freshly spawned field.
    #[inline]
    pub fn field_asteroid_size(&self) -> u32 {
        child_asteroid_size(self.asteroid_max_size)
    }

    /// Keep-out radius around the ship when placing a new field.
    #[inline]
    pub fn field_clearance(&self) -> f64 {
        f64::from(self.asteroid_max_size) * 2.0 + self.ship_size
    }

    #[inline]
    pub fn asteroid_count_for_level(&self, level: u32) -> u32 {
        level.saturating_mul(self.base_asteroid_count)
    }

    #[inline]
    pub fn asteroid_speed_for_level(&self, level: u32) -> f64 {
        f64::from(level) * self.base_asteroid_speed
    }
}
