use asteroids_core::rng::SeededRng;
use asteroids_core::sim::WorldSnapshot;
use asteroids_core::FrameInput;
use serde::Serialize;
use std::f64::consts::{PI, TAU};

mod roster;

pub use roster::{bot_fingerprint, bot_ids, bot_manifest_entries, create_bot, describe_bots};

pub trait AutopilotBot {
    fn id(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn reset(&mut self, seed: u32);
    fn next_input(&mut self, world: &WorldSnapshot) -> FrameInput;
}

#[derive(Clone, Debug, Serialize)]
pub struct BotManifestEntry {
    pub id: String,
    pub family: String,
    pub description: String,
    pub config_hash: String,
    pub config: serde_json::Value,
}

/// Tuning for the steering pilot. Distances are pixels, angles radians.
#[derive(Clone, Copy, Debug, Serialize)]
struct PilotConfig {
    id: &'static str,
    description: &'static str,
    aim_tolerance: f64,
    fire_distance: f64,
    /// Thrust toward the target while it is farther than this.
    approach_distance: f64,
    /// Turn away and burn when a rock's edge is closer than this.
    evade_distance: f64,
    cruise_speed: f64,
    alien_priority: f64,
    /// Chance per tick of an extra random turn, to break symmetric stand-offs.
    jitter: f64,
}

#[derive(Clone, Copy, Debug, Serialize)]
struct RandomConfig {
    id: &'static str,
    description: &'static str,
    turn_chance: f64,
    thrust_chance: f64,
    fire_chance: f64,
}

#[derive(Clone, Copy, Debug)]
struct Target {
    dx: f64,
    dy: f64,
    distance: f64,
    radius: f64,
}

impl Target {
    #[inline]
    fn bearing(&self) -> f64 {
        self.dy.atan2(self.dx)
    }

    #[inline]
    fn gap(&self) -> f64 {
        self.distance - self.radius
    }
}

/// Shortest signed offset from `from` to `to` on a ring of length `extent`.
fn shortest_delta(from: f64, to: f64, extent: f64) -> f64 {
    (to - from + extent / 2.0).rem_euclid(extent) - extent / 2.0
}

/// Signed turn from `current` to `desired`, folded into `[-PI, PI)`.
fn angle_delta(current: f64, desired: f64) -> f64 {
    (desired - current + PI).rem_euclid(TAU) - PI
}

fn toroidal_target(world: &WorldSnapshot, x: f64, y: f64, radius: f64) -> Target {
    let dx = shortest_delta(world.ship.x, x, world.viewport_width);
    let dy = shortest_delta(world.ship.y, y, world.viewport_height);
    Target {
        dx,
        dy,
        distance: dx.hypot(dy),
        radius,
    }
}

fn nearest_asteroid(world: &WorldSnapshot) -> Option<Target> {
    world
        .asteroids
        .iter()
        .map(|asteroid| toroidal_target(world, asteroid.x, asteroid.y, f64::from(asteroid.size)))
        .min_by(|a, b| a.gap().total_cmp(&b.gap()))
}

struct PilotBot {
    cfg: PilotConfig,
    rng: SeededRng,
}

impl PilotBot {
    fn new(cfg: PilotConfig) -> Self {
        Self {
            cfg,
            rng: SeededRng::new(0),
        }
    }

    /// Alien when it is close enough to be worth the detour, otherwise the
    /// nearest rock.
    fn pick_target(&self, world: &WorldSnapshot) -> Option<Target> {
        let rock = nearest_asteroid(world);
        let alien = world
            .alien
            .map(|alien| toroidal_target(world, alien.x, alien.y, alien.size));

        match (rock, alien) {
            (Some(rock), Some(alien)) => {
                if alien.gap() <= rock.gap() * self.cfg.alien_priority {
                    Some(alien)
                } else {
                    Some(rock)
                }
            }
            (rock, alien) => rock.or(alien),
        }
    }

    fn steer(&self, input: &mut FrameInput, turn: f64) {
        if turn > self.cfg.aim_tolerance {
            input.right = true;
        } else if turn < -self.cfg.aim_tolerance {
            input.left = true;
        }
    }
}

impl AutopilotBot for PilotBot {
    fn id(&self) -> &'static str {
        self.cfg.id
    }

    fn description(&self) -> &'static str {
        self.cfg.description
    }

    fn reset(&mut self, seed: u32) {
        self.rng = SeededRng::new(seed ^ 0xA5A5_5A5A);
    }

    fn next_input(&mut self, world: &WorldSnapshot) -> FrameInput {
        let mut input = FrameInput::default();
        if world.is_game_over() || world.ship.respawn_timer > 0 {
            return input;
        }

        let Some(target) = self.pick_target(world) else {
            input.right = true;
            return input;
        };

        let aim = angle_delta(world.ship.angle, target.bearing());
        let speed = world.ship.vx.hypot(world.ship.vy);

        if let Some(threat) = nearest_asteroid(world).filter(|t| t.gap() < self.cfg.evade_distance)
        {
            let escape = angle_delta(world.ship.angle, threat.bearing() + PI);
            self.steer(&mut input, escape);
            input.up = escape.abs() < PI / 4.0;
            input.fire = aim.abs() <= self.cfg.aim_tolerance;
            return input;
        }

        let aligned = aim.abs() <= self.cfg.aim_tolerance;
        self.steer(&mut input, aim);
        if !aligned && self.cfg.jitter > 0.0 && self.rng.next_f64() < self.cfg.jitter {
            input.left = !input.left;
            input.right = !input.right;
        }

        input.fire = aligned && target.gap() <= self.cfg.fire_distance;
        input.up = aligned
            && target.distance > self.cfg.approach_distance
            && speed < self.cfg.cruise_speed;

        input
    }
}

struct RandomBot {
    cfg: RandomConfig,
    rng: SeededRng,
}

impl RandomBot {
    fn new(cfg: RandomConfig) -> Self {
        Self {
            cfg,
            rng: SeededRng::new(0),
        }
    }

    fn roll(&mut self, chance: f64) -> bool {
        chance > 0.0 && self.rng.next_f64() < chance
    }
}

impl AutopilotBot for RandomBot {
    fn id(&self) -> &'static str {
        self.cfg.id
    }

    fn description(&self) -> &'static str {
        self.cfg.description
    }

    fn reset(&mut self, seed: u32) {
        self.rng = SeededRng::new(seed.rotate_left(13) ^ 0x1357_9BDF);
    }

    fn next_input(&mut self, _world: &WorldSnapshot) -> FrameInput {
        let turn = self.roll(self.cfg.turn_chance);
        let clockwise = turn && self.roll(0.5);
        FrameInput {
            up: self.roll(self.cfg.thrust_chance),
            down: false,
            left: turn && !clockwise,
            right: clockwise,
            fire: self.roll(self.cfg.fire_chance),
            reset: false,
        }
    }
}
