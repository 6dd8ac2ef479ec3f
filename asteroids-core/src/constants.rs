//! Default game constants.
//!
//! Every timer is expressed in simulation ticks, not wall-clock time. The
//! simulation assumes one tick per rendered frame at `TICKS_PER_SECOND`.

pub const TICKS_PER_SECOND: u32 = 60;

// Viewport
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 800.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 600.0;

// Starting state
pub const STARTING_LIVES: u32 = 4;
pub const STARTING_LEVEL: u32 = 1;

// Ship
pub const SHIP_SIZE: f64 = 20.0;
pub const SHIP_THRUST: f64 = 0.1;
pub const SHIP_FRICTION: f64 = 0.99;
pub const SHIP_TURN_SPEED: f64 = 0.05; // radians per tick
pub const SHIP_MAX_SPEED: f64 = 5.0;
pub const SHIP_RESPAWN_TICKS: u32 = TICKS_PER_SECOND; // 1s

// Player bullets
pub const BULLET_SPEED: f64 = 5.0;
pub const BULLET_RADIUS: f64 = 2.0;
pub const SHIP_FIRE_COOLDOWN_TICKS: u32 = TICKS_PER_SECOND / 4; // 4 shots per second

// Asteroids
pub const ASTEROID_VERTS: u32 = 10;
pub const ASTEROID_JAG: f64 = 0.4; // 0 = circle, 1 = very jagged
pub const ASTEROID_MAX_SIZE: u32 = 100;
pub const ASTEROID_MIN_SIZE: u32 = 25;
pub const ASTEROID_HEALTH: u32 = 3;
pub const ASTEROID_SCORE_UNIT: u32 = 10;
pub const BASE_ASTEROID_COUNT: u32 = 5;
pub const BASE_ASTEROID_SPEED: f64 = 1.0;
pub const SPAWN_RETRY_LIMIT: u32 = 100;

// Alien ship
pub const ALIEN_SIZE: f64 = 30.0;
pub const ALIEN_MIN_LEVEL: u32 = 3;
pub const ALIEN_FIRE_INTERVAL_TICKS: u32 = 2 * TICKS_PER_SECOND; // 2s
pub const ALIEN_BULLET_SPEED: f64 = 3.0;
pub const ALIEN_SPEED_MIN: f64 = 1.0;
pub const ALIEN_SPEED_SPREAD: f64 = 0.5;
pub const ALIEN_SCORE: u32 = 100;

// Exhaust particles
pub const PARTICLE_SIZE_MIN: f64 = 2.0;
pub const PARTICLE_SIZE_SPREAD: f64 = 4.0;
pub const PARTICLE_LIFE_MIN: f64 = 5.0;
pub const PARTICLE_LIFE_SPREAD: f64 = 5.0;
pub const PARTICLE_SHIP_VELOCITY_SHARE: f64 = 0.1;

/// Score for destroying an asteroid of `size`: smaller rocks are worth more.
pub fn asteroid_score(max_size: u32, size: u32) -> u32 {
    let ratio = f64::from(max_size) / f64::from(size.max(1));
    (ratio.round() as u32) * ASTEROID_SCORE_UNIT
}

/// Size of each child when an asteroid of `size` splits. Ceiling division so
/// integer sizes never round down to zero.
pub fn child_asteroid_size(size: u32) -> u32 {
    size.div_ceil(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asteroid_score_follows_size_ratio() {
        assert_eq!(asteroid_score(ASTEROID_MAX_SIZE, 100), 10);
        assert_eq!(asteroid_score(ASTEROID_MAX_SIZE, 50), 20);
        assert_eq!(asteroid_score(ASTEROID_MAX_SIZE, 25), 40);
        // 100 / 13 = 7.69 rounds to 8
        assert_eq!(asteroid_score(ASTEROID_MAX_SIZE, 13), 80);
    }

    #[test]
    fn child_size_rounds_up() {
        assert_eq!(child_asteroid_size(100), 50);
        assert_eq!(child_asteroid_size(25), 13);
        assert_eq!(child_asteroid_size(1), 1);
    }
}
