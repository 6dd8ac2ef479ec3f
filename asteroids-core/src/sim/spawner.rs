//! Creation of every randomly initialised entity.

use core::f64::consts::TAU;

use crate::config::{GameConfig, Viewport};
use crate::constants::{
    ALIEN_SPEED_MIN, ALIEN_SPEED_SPREAD, PARTICLE_LIFE_MIN, PARTICLE_LIFE_SPREAD,
    PARTICLE_SHIP_VELOCITY_SHARE, PARTICLE_SIZE_MIN, PARTICLE_SIZE_SPREAD,
};
use crate::entity::{AlienShip, Asteroid, Bullet, Particle, Ship};
use crate::geometry::{
    dist_between, heading, jag_offsets, polygon_vertex_count, random_between, random_symmetric,
};
use crate::rng::SeededRng;

/// Borrows the game's generator and tuning for one or more spawns.
/// `asteroid_speed` is the current level's per-axis speed bound.
pub struct Spawner<'a> {
    rng: &'a mut SeededRng,
    config: &'a GameConfig,
    asteroid_speed: f64,
}

impl<'a> Spawner<'a> {
    pub fn new(rng: &'a mut SeededRng, config: &'a GameConfig, asteroid_speed: f64) -> Self {
        Self {
            rng,
            config,
            asteroid_speed,
        }
    }

    #[inline]
    fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    fn random_point(&mut self) -> (f64, f64) {
        let viewport = self.viewport();
        let x = (self.rng.next_f64() * viewport.width).floor();
        let y = (self.rng.next_f64() * viewport.height).floor();
        (x, y)
    }

    /// `count` asteroids scattered over the viewport, none closer than
    /// `min_clearance` to `ship_pos`. Each placement re-draws at most
    /// `spawn_retry_limit` times and then accepts whatever it last drew.
    pub fn spawn_asteroid_field(
        &mut self,
        count: u32,
        base_size: u32,
        ship_pos: (f64, f64),
        min_clearance: f64,
    ) -> Vec<Asteroid> {
        let (ship_x, ship_y) = ship_pos;
        let mut field = Vec::with_capacity(count as usize);

        for index in 0..count {
            let (mut x, mut y) = self.random_point();
            let mut attempts = 0;

            while dist_between(ship_x, ship_y, x, y) < min_clearance {
                if attempts >= self.config.spawn_retry_limit {
                    tracing::warn!(
                        index,
                        attempts,
                        min_clearance,
                        "no clear spawn point found; placing asteroid unconstrained"
                    );
                    break;
                }
                (x, y) = self.random_point();
                attempts += 1;
            }

            field.push(self.new_asteroid(x, y, base_size));
        }

        field
    }

    /// One fragment at the parent's last position with its own heading and
    /// outline.
    pub fn spawn_child_asteroid(&mut self, parent_pos: (f64, f64), half_size: u32) -> Asteroid {
        self.new_asteroid(parent_pos.0, parent_pos.1, half_size)
    }

    pub fn new_asteroid(&mut self, x: f64, y: f64, size: u32) -> Asteroid {
        let vx = random_symmetric(self.rng, self.asteroid_speed);
        let vy = random_symmetric(self.rng, self.asteroid_speed);
        let verts = polygon_vertex_count(self.rng, self.config.asteroid_verts);
        let offsets = jag_offsets(self.rng, verts, self.config.asteroid_jag);

        Asteroid {
            x,
            y,
            vx,
            vy,
            size,
            health: self.config.asteroid_health,
            verts,
            offsets,
        }
    }

    /// Exhaust puff just behind the stern, drifting with a share of the
    /// ship's own velocity.
    pub fn spawn_exhaust_particle(&mut self, ship: &Ship) -> Particle {
        let (dx, dy) = heading(ship.angle, ship.size);
        let vx = self.rng.next_f64() - 0.5 + ship.vx * PARTICLE_SHIP_VELOCITY_SHARE;
        let vy = self.rng.next_f64() - 0.5 + ship.vy * PARTICLE_SHIP_VELOCITY_SHARE;
        let size = random_between(
            self.rng,
            PARTICLE_SIZE_MIN,
            PARTICLE_SIZE_MIN + PARTICLE_SIZE_SPREAD,
        );
        let life = random_between(
            self.rng,
            PARTICLE_LIFE_MIN,
            PARTICLE_LIFE_MIN + PARTICLE_LIFE_SPREAD,
        );

        Particle {
            x: ship.x - dx,
            y: ship.y - dy,
            vx,
            vy,
            size,
            life,
        }
    }

    /// Alien entering just outside a random edge, heading straight inward.
    pub fn spawn_alien(&mut self) -> AlienShip {
        let viewport = self.viewport();
        let size = self.config.alien_size;
        let edge = self.rng.next_f64();

        let (x, y, vx, vy) = if edge < 0.25 {
            let y = self.rng.next_f64() * viewport.height;
            (-size, y, self.alien_speed(), 0.0)
        } else if edge < 0.5 {
            let y = self.rng.next_f64() * viewport.height;
            (viewport.width + size, y, -self.alien_speed(), 0.0)
        } else if edge < 0.75 {
            let x = self.rng.next_f64() * viewport.width;
            (x, -size, 0.0, self.alien_speed())
        } else {
            let x = self.rng.next_f64() * viewport.width;
            (x, viewport.height + size, 0.0, -self.alien_speed())
        };

        AlienShip {
            x,
            y,
            vx,
            vy,
            size,
            fire_cooldown: 0,
        }
    }

    fn alien_speed(&mut self) -> f64 {
        random_between(
            self.rng,
            ALIEN_SPEED_MIN,
            ALIEN_SPEED_MIN + ALIEN_SPEED_SPREAD,
        )
    }

    /// Unaimed shot in a uniformly random direction.
    pub fn spawn_alien_bullet(&mut self, alien: &AlienShip) -> Bullet {
        let angle = self.rng.next_f64() * TAU;
        let (vx, vy) = heading(angle, self.config.alien_bullet_speed);
        Bullet {
            x: alien.x,
            y: alien.y,
            vx,
            vy,
            radius: self.config.bullet_radius,
        }
    }
}
