use core::fmt;

use serde::{Deserialize, Serialize};

/// Names a simulation invariant that a game state failed to uphold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleCode {
    GlobalModeLivesConsistency,
    GlobalLevelNonZero,
    ShipBounds,
    ShipSpeedClamp,
    ShipCooldownRange,
    AsteroidBounds,
    AsteroidShape,
    AsteroidSize,
    BulletBounds,
    AlienBulletBounds,
    ParticleLife,
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GlobalModeLivesConsistency => write!(f, "GLOBAL_MODE_LIVES_CONSISTENCY"),
            Self::GlobalLevelNonZero => write!(f, "GLOBAL_LEVEL_NONZERO"),
            Self::ShipBounds => write!(f, "SHIP_BOUNDS"),
            Self::ShipSpeedClamp => write!(f, "SHIP_SPEED_CLAMP"),
            Self::ShipCooldownRange => write!(f, "SHIP_COOLDOWN_RANGE"),
            Self::AsteroidBounds => write!(f, "ASTEROID_BOUNDS"),
            Self::AsteroidShape => write!(f, "ASTEROID_SHAPE"),
            Self::AsteroidSize => write!(f, "ASTEROID_SIZE"),
            Self::BulletBounds => write!(f, "BULLET_BOUNDS"),
            Self::AlienBulletBounds => write!(f, "ALIEN_BULLET_BOUNDS"),
            Self::ParticleLife => write!(f, "PARTICLE_LIFE"),
        }
    }
}

/// Rejected game configuration. Raised before any tick runs so a bad config
/// never turns into an endless spawn loop or a division by zero mid-game.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    InvalidViewport { width: f64, height: f64 },
    ZeroAsteroidCount,
    NonPositive { field: &'static str, value: f64 },
    FrictionOutOfRange { value: f64 },
    JagOutOfRange { value: f64 },
    AsteroidSizeRange { min: u32, max: u32 },
    TooFewVertices { verts: u32, min: u32 },
    ZeroStartingLives,
    ZeroSpawnRetryLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidViewport { width, height } => write!(
                f,
                "viewport must be finite and positive: got {width}x{height}"
            ),
            Self::ZeroAsteroidCount => write!(f, "base asteroid count must be at least 1"),
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be finite and positive: got {value}")
            }
            Self::FrictionOutOfRange { value } => {
                write!(f, "ship friction must be in (0, 1]: got {value}")
            }
            Self::JagOutOfRange { value } => {
                write!(f, "asteroid jag must be in [0, 1): got {value}")
            }
            Self::AsteroidSizeRange { min, max } => write!(
                f,
                "asteroid sizes out of order: min={min} must be in 1..={max}"
            ),
            Self::TooFewVertices { verts, min } => write!(
                f,
                "asteroid vertex count too small: {verts} (need at least {min})"
            ),
            Self::ZeroStartingLives => write!(f, "starting lives must be at least 1"),
            Self::ZeroSpawnRetryLimit => write!(f, "spawn retry limit must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure while replaying a recorded input stream. `frame` is 1-based; frame
/// 0 is the freshly created game.
#[derive(Clone, Debug, PartialEq)]
pub enum ReplayError {
    Config(ConfigError),
    ReservedInputBits { frame: u32, byte: u8 },
    RuleViolation { frame: u32, rule: RuleCode },
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid config: {err}"),
            Self::ReservedInputBits { frame, byte } => write!(
                f,
                "input byte reserved bits set at frame {frame}: 0x{byte:02x}"
            ),
            Self::RuleViolation { frame, rule } => {
                write!(f, "rule violation at frame {frame}: {rule}")
            }
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for ReplayError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
