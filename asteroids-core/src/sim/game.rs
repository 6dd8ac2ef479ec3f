use crate::config::{GameConfig, Viewport};
use crate::constants::STARTING_LEVEL;
use crate::entity::{AlienShip, Asteroid, Bullet, Particle, Ship};
use crate::error::{ConfigError, RuleCode};
use crate::geometry::{outside_viewport, speed, wrap_position};
use crate::input::FrameInput;
use crate::rng::SeededRng;

use super::motion;
use super::spawner::Spawner;
use super::{
    AlienSnapshot, AsteroidSnapshot, BulletSnapshot, GameMode, ParticleSnapshot,
    ReplayCheckpoint, ReplayResult, ShipSnapshot, WorldSnapshot,
};

const SPEED_EPSILON: f64 = 1e-9;

/// The whole simulation: one ship, its surroundings and the score/level/lives
/// state machine. Advance it with [`Game::step`], once per tick.
#[derive(Clone, Debug)]
pub struct Game {
    pub(super) config: GameConfig,
    pub(super) seed: u32,
    pub(super) rng: SeededRng,
    pub(super) mode: GameMode,
    pub(super) score: u32,
    pub(super) level: u32,
    pub(super) lives: u32,
    pub(super) asteroid_count: u32,
    pub(super) asteroid_speed: f64,
    pub(super) tick: u32,
    pub(super) asteroids_destroyed: u32,
    pub(super) aliens_destroyed: u32,
    pub(super) ship: Ship,
    pub(super) asteroids: Vec<Asteroid>,
    pub(super) bullets: Vec<Bullet>,
    pub(super) alien: Option<AlienShip>,
    pub(super) alien_bullets: Vec<Bullet>,
    pub(super) particles: Vec<Particle>,
}

impl Game {
    pub fn new(config: GameConfig, seed: u32) -> Result<Self, ConfigError> {
        config.validate()?;
        let game = Self::fresh(config, seed);
        tracing::debug!(
            seed,
            asteroids = game.asteroids.len(),
            "game created"
        );
        Ok(game)
    }

    fn fresh(config: GameConfig, seed: u32) -> Self {
        let (x, y) = config.viewport.center();
        let ship = Ship::new(&config, x, y);
        let asteroid_count = config.asteroid_count_for_level(STARTING_LEVEL);
        let asteroid_speed = config.asteroid_speed_for_level(STARTING_LEVEL);
        let lives = config.starting_lives;

        let mut game = Self {
            config,
            seed,
            rng: SeededRng::new(seed),
            mode: GameMode::Playing,
            score: 0,
            level: STARTING_LEVEL,
            lives,
            asteroid_count,
            asteroid_speed,
            tick: 0,
            asteroids_destroyed: 0,
            aliens_destroyed: 0,
            ship,
            asteroids: Vec::new(),
            bullets: Vec::new(),
            alien: None,
            alien_bullets: Vec::new(),
            particles: Vec::new(),
        };

        game.spawn_field();
        game
    }

    /// Back to the state [`Game::new`] produced, including the generator.
    /// The current viewport is kept.
    pub fn reset(&mut self) {
        *self = Self::fresh(self.config.clone(), self.seed);
        tracing::info!(seed = self.seed, "game reset");
    }

    fn spawn_field(&mut self) {
        let count = self.asteroid_count;
        let size = self.config.field_asteroid_size();
        let clearance = self.config.field_clearance();
        let ship_pos = (self.ship.x, self.ship.y);

        let mut spawner = Spawner::new(&mut self.rng, &self.config, self.asteroid_speed);
        self.asteroids = spawner.spawn_asteroid_field(count, size, ship_pos, clearance);
    }

    /// Runs one tick. While the game is over only `input.reset` is looked at.
    pub fn step(&mut self, input: FrameInput) {
        if matches!(self.mode, GameMode::GameOver) {
            if input.reset {
                self.reset();
            }
            return;
        }

        self.tick = self.tick.wrapping_add(1);
        let viewport = self.config.viewport;

        if let Some(bullet) = motion::update_ship(&mut self.ship, input, &self.config, &viewport) {
            self.bullets.push(bullet);
        }
        motion::update_asteroids(&mut self.asteroids, &viewport);
        motion::update_projectiles(&mut self.bullets, &viewport);
        self.update_alien(&viewport);
        motion::update_projectiles(&mut self.alien_bullets, &viewport);
        self.update_particles();

        self.resolve_collisions();

        if matches!(self.mode, GameMode::Playing) && self.asteroids.is_empty() {
            self.advance_level();
        }
    }

    fn update_alien(&mut self, viewport: &Viewport) {
        let active = self.level >= self.config.alien_min_level && !self.asteroids.is_empty();
        let was_present = self.alien.is_some();

        let mut spawner = Spawner::new(&mut self.rng, &self.config, self.asteroid_speed);
        motion::update_alien(
            &mut self.alien,
            &mut self.alien_bullets,
            active,
            &mut spawner,
            &self.config,
            viewport,
        );

        match (was_present, &self.alien) {
            (false, Some(alien)) => {
                tracing::debug!(tick = self.tick, x = alien.x, y = alien.y, "alien ship entered");
            }
            (true, None) => tracing::debug!(tick = self.tick, "alien ship left"),
            _ => {}
        }
    }

    fn update_particles(&mut self) {
        if self.ship.thrusting {
            let mut spawner = Spawner::new(&mut self.rng, &self.config, self.asteroid_speed);
            let particle = spawner.spawn_exhaust_particle(&self.ship);
            self.particles.push(particle);
        }
        motion::update_particles(&mut self.particles);
    }

    fn advance_level(&mut self) {
        self.level = self.level.saturating_add(1);
        self.asteroid_count = self.config.asteroid_count_for_level(self.level);
        self.asteroid_speed = self.config.asteroid_speed_for_level(self.level);
        self.spawn_field();

        tracing::info!(
            level = self.level,
            asteroids = self.asteroid_count,
            speed = self.asteroid_speed,
            "level cleared"
        );
    }

    /// Changes the wrap domain between ticks. Ship and asteroids are folded
    /// into the new bounds; projectiles now outside are dropped.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<(), ConfigError> {
        viewport.validate()?;
        self.config.viewport = viewport;

        (self.ship.x, self.ship.y) = wrap_position(self.ship.x, self.ship.y, &viewport);
        for asteroid in &mut self.asteroids {
            (asteroid.x, asteroid.y) = wrap_position(asteroid.x, asteroid.y, &viewport);
        }
        self.bullets
            .retain(|bullet| !outside_viewport(bullet.x, bullet.y, &viewport));
        self.alien_bullets
            .retain(|bullet| !outside_viewport(bullet.x, bullet.y, &viewport));

        Ok(())
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    #[inline]
    pub fn seed(&self) -> u32 {
        self.seed
    }

    #[inline]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        matches!(self.mode, GameMode::GameOver)
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[inline]
    pub fn lives(&self) -> u32 {
        self.lives
    }

    #[inline]
    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// Asteroids shot to zero health since the last reset, children included.
    #[inline]
    pub fn asteroids_destroyed(&self) -> u32 {
        self.asteroids_destroyed
    }

    #[inline]
    pub fn aliens_destroyed(&self) -> u32 {
        self.aliens_destroyed
    }

    #[inline]
    pub fn asteroid_speed(&self) -> f64 {
        self.asteroid_speed
    }

    #[inline]
    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn alien(&self) -> Option<&AlienShip> {
        self.alien.as_ref()
    }

    pub fn alien_bullets(&self) -> &[Bullet] {
        &self.alien_bullets
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            mode: self.mode,
            score: self.score,
            lives: self.lives,
            level: self.level,
            rng_state: self.rng.state(),
            viewport_width: self.config.viewport.width,
            viewport_height: self.config.viewport.height,
            ship: Self::ship_snapshot(&self.ship),
            asteroids: self.asteroids.iter().map(Self::asteroid_snapshot).collect(),
            bullets: self.bullets.iter().map(Self::bullet_snapshot).collect(),
            alien: self.alien.as_ref().map(Self::alien_snapshot),
            alien_bullets: self.alien_bullets.iter().map(Self::bullet_snapshot).collect(),
            particles: self
                .particles
                .iter()
                .map(|particle| ParticleSnapshot {
                    x: particle.x,
                    y: particle.y,
                    size: particle.size,
                    life: particle.life,
                })
                .collect(),
        }
    }

    #[inline]
    fn ship_snapshot(ship: &Ship) -> ShipSnapshot {
        ShipSnapshot {
            x: ship.x,
            y: ship.y,
            vx: ship.vx,
            vy: ship.vy,
            angle: ship.angle,
            size: ship.size,
            thrusting: ship.thrusting,
            respawn_timer: ship.respawn_timer,
            fire_cooldown: ship.fire_cooldown,
        }
    }

    #[inline]
    fn asteroid_snapshot(asteroid: &Asteroid) -> AsteroidSnapshot {
        AsteroidSnapshot {
            x: asteroid.x,
            y: asteroid.y,
            vx: asteroid.vx,
            vy: asteroid.vy,
            size: asteroid.size,
            health: asteroid.health,
            offsets: asteroid.offsets.clone(),
        }
    }

    #[inline]
    fn bullet_snapshot(bullet: &Bullet) -> BulletSnapshot {
        BulletSnapshot {
            x: bullet.x,
            y: bullet.y,
            vx: bullet.vx,
            vy: bullet.vy,
        }
    }

    #[inline]
    fn alien_snapshot(alien: &AlienShip) -> AlienSnapshot {
        AlienSnapshot {
            x: alien.x,
            y: alien.y,
            vx: alien.vx,
            vy: alien.vy,
            size: alien.size,
        }
    }

    pub fn checkpoint(&self, frame: u32) -> ReplayCheckpoint {
        ReplayCheckpoint {
            frame,
            tick: self.tick,
            rng_state: self.rng.state(),
            score: self.score,
            lives: self.lives,
            level: self.level,
            asteroids: self.asteroids.len(),
            bullets: self.bullets.len(),
            alien_active: self.alien.is_some(),
            alien_bullets: self.alien_bullets.len(),
            particles: self.particles.len(),
            ship_x: self.ship.x,
            ship_y: self.ship.y,
            ship_vx: self.ship.vx,
            ship_vy: self.ship.vy,
            ship_angle: self.ship.angle,
            ship_respawn_timer: self.ship.respawn_timer,
            ship_fire_cooldown: self.ship.fire_cooldown,
        }
    }

    pub fn result(&self, frames: u32) -> ReplayResult {
        ReplayResult {
            final_score: self.score,
            final_level: self.level,
            final_lives: self.lives,
            final_rng_state: self.rng.state(),
            frames,
            game_over: self.is_game_over(),
        }
    }

    pub fn validate_invariants(&self) -> Result<(), RuleCode> {
        let viewport = self.config.viewport;
        let in_wrap_domain = |x: f64, y: f64| {
            (0.0..viewport.width).contains(&x) && (0.0..viewport.height).contains(&y)
        };

        if self.level == 0 {
            return Err(RuleCode::GlobalLevelNonZero);
        }

        let mode_lives_consistent = match self.mode {
            GameMode::Playing => self.lives > 0,
            GameMode::GameOver => self.lives == 0,
        };
        if !mode_lives_consistent {
            return Err(RuleCode::GlobalModeLivesConsistency);
        }

        if !in_wrap_domain(self.ship.x, self.ship.y) {
            return Err(RuleCode::ShipBounds);
        }

        if speed(self.ship.vx, self.ship.vy) > self.config.max_ship_speed + SPEED_EPSILON {
            return Err(RuleCode::ShipSpeedClamp);
        }

        if self.ship.fire_cooldown > self.config.fire_cooldown_ticks {
            return Err(RuleCode::ShipCooldownRange);
        }

        for asteroid in &self.asteroids {
            if !in_wrap_domain(asteroid.x, asteroid.y) {
                return Err(RuleCode::AsteroidBounds);
            }
            if asteroid.verts < 3 || asteroid.offsets.len() != asteroid.verts as usize {
                return Err(RuleCode::AsteroidShape);
            }
            if asteroid.size == 0 || asteroid.size > self.config.asteroid_max_size {
                return Err(RuleCode::AsteroidSize);
            }
        }

        if self
            .bullets
            .iter()
            .any(|bullet| outside_viewport(bullet.x, bullet.y, &viewport))
        {
            return Err(RuleCode::BulletBounds);
        }

        if self
            .alien_bullets
            .iter()
            .any(|bullet| outside_viewport(bullet.x, bullet.y, &viewport))
        {
            return Err(RuleCode::AlienBulletBounds);
        }

        if self.particles.iter().any(|particle| particle.life <= 0.0) {
            return Err(RuleCode::ParticleLife);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
