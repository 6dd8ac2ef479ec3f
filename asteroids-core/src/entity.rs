//! Game entity types.
//!
//! Entities are plain data. The `sim` module owns every instance and is the
//! only place that mutates them.

use crate::config::GameConfig;

/// Player ship. One instance per game; reset on death, never destroyed.
#[derive(Debug, Clone, PartialEq)]
pub struct Ship {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub angle: f64, // radians
    pub size: f64,
    pub thrust: f64,
    pub friction: f64,
    pub turn_speed: f64,
    pub thrusting: bool,
    /// Ticks until the ship is back under control after a hit. Non-zero means
    /// exploding / waiting to respawn.
    pub respawn_timer: u32,
    pub fire_cooldown: u32,
}

impl Ship {
    pub fn new(config: &GameConfig, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            angle: 0.0,
            size: config.ship_size,
            thrust: config.ship_thrust,
            friction: config.ship_friction,
            turn_speed: config.ship_turn_speed,
            thrusting: false,
            respawn_timer: 0,
            fire_cooldown: 0,
        }
    }

    #[inline]
    pub fn is_respawning(&self) -> bool {
        self.respawn_timer > 0
    }

    /// Puts the ship back at `(x, y)` at rest. Facing is kept.
    pub fn recenter(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
        self.vx = 0.0;
        self.vy = 0.0;
        self.thrusting = false;
        self.fire_cooldown = 0;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Asteroid {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Collision radius.
    pub size: u32,
    /// Hits remaining.
    pub health: u32,
    pub verts: u32,
    /// Per-vertex radius multipliers, `offsets.len() == verts`.
    pub offsets: Vec<f64>,
}

impl Asteroid {
    #[inline]
    pub fn radius(&self) -> f64 {
        f64::from(self.size)
    }

    /// Outline vertices in world space, for renderers.
    pub fn outline(&self) -> Vec<(f64, f64)> {
        let step = core::f64::consts::TAU / f64::from(self.verts.max(1));
        self.offsets
            .iter()
            .enumerate()
            .map(|(index, offset)| {
                let theta = step * index as f64;
                let r = self.radius() * offset;
                (self.x + r * theta.cos(), self.y + r * theta.sin())
            })
            .collect()
    }
}

/// Player or alien projectile. Never wraps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bullet {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
}

/// Hostile ship crossing the screen from one edge to the opposite one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlienShip {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub fire_cooldown: u32,
}

/// Cosmetic exhaust puff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    /// Remaining lifetime in ticks; removed at or below zero.
    pub life: f64,
}
