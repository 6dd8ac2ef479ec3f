//! Per-tick integration for every entity kind.
//!
//! Ships and asteroids wrap around the viewport. Bullets never wrap: they
//! are dropped once they leave the viewport rectangle.

use crate::config::{GameConfig, Viewport};
use crate::entity::{AlienShip, Asteroid, Bullet, Particle, Ship};
use crate::geometry::{beyond_viewport, clamp_speed, heading, outside_viewport, wrap_position};
use crate::input::FrameInput;

use super::spawner::Spawner;

/// Advances the ship one tick and returns the bullet it fired, if any.
pub fn update_ship(
    ship: &mut Ship,
    input: FrameInput,
    config: &GameConfig,
    viewport: &Viewport,
) -> Option<Bullet> {
    ship.respawn_timer = ship.respawn_timer.saturating_sub(1);
    ship.fire_cooldown = ship.fire_cooldown.saturating_sub(1);

    if ship.is_respawning() {
        ship.thrusting = false;
        return None;
    }

    ship.thrusting = input.up || input.down;
    let (thrust_x, thrust_y) = heading(ship.angle, ship.thrust);
    if input.up {
        ship.vx += thrust_x;
        ship.vy += thrust_y;
    }
    if input.down {
        ship.vx -= thrust_x;
        ship.vy -= thrust_y;
    }

    ship.vx *= ship.friction;
    ship.vy *= ship.friction;
    (ship.vx, ship.vy) = clamp_speed(ship.vx, ship.vy, config.max_ship_speed);

    if input.left {
        ship.angle -= ship.turn_speed;
    }
    if input.right {
        ship.angle += ship.turn_speed;
    }

    let mut fired = None;
    if input.fire && ship.fire_cooldown == 0 {
        fired = Some(fire_bullet(ship, config));
        ship.fire_cooldown = config.fire_cooldown_ticks;
    }

    (ship.x, ship.y) = wrap_position(ship.x + ship.vx, ship.y + ship.vy, viewport);

    fired
}

/// Bullet leaving the ship's nose along its facing.
pub fn fire_bullet(ship: &Ship, config: &GameConfig) -> Bullet {
    let (nose_x, nose_y) = heading(ship.angle, ship.size);
    let (vx, vy) = heading(ship.angle, config.bullet_speed);
    Bullet {
        x: ship.x + nose_x,
        y: ship.y + nose_y,
        vx,
        vy,
        radius: config.bullet_radius,
    }
}

pub fn update_asteroids(asteroids: &mut [Asteroid], viewport: &Viewport) {
    for asteroid in asteroids {
        (asteroid.x, asteroid.y) =
            wrap_position(asteroid.x + asteroid.vx, asteroid.y + asteroid.vy, viewport);
    }
}

/// Moves projectiles and drops the ones that left the viewport. Returns how
/// many were dropped.
pub fn update_projectiles(projectiles: &mut Vec<Bullet>, viewport: &Viewport) -> usize {
    let before = projectiles.len();
    for bullet in projectiles.iter_mut() {
        bullet.x += bullet.vx;
        bullet.y += bullet.vy;
    }
    projectiles.retain(|bullet| !outside_viewport(bullet.x, bullet.y, viewport));
    before - projectiles.len()
}

pub fn update_particles(particles: &mut Vec<Particle>) {
    for particle in particles.iter_mut() {
        particle.x += particle.vx;
        particle.y += particle.vy;
        particle.life -= 1.0;
    }
    particles.retain(|particle| particle.life > 0.0);
}

/// Alien-ship lifecycle for one tick. `active` says whether the current
/// level and field allow an alien at all. A new alien is spawned when none is
/// present; it is dropped once it is more than its own size outside the
/// viewport. While present it fires every `alien_fire_interval_ticks`.
pub fn update_alien(
    alien: &mut Option<AlienShip>,
    alien_bullets: &mut Vec<Bullet>,
    active: bool,
    spawner: &mut Spawner<'_>,
    config: &GameConfig,
    viewport: &Viewport,
) {
    if !active {
        *alien = None;
        return;
    }

    let ship = alien.get_or_insert_with(|| spawner.spawn_alien());
    ship.x += ship.vx;
    ship.y += ship.vy;

    if beyond_viewport(ship.x, ship.y, ship.size, viewport) {
        *alien = None;
        return;
    }

    ship.fire_cooldown = ship.fire_cooldown.saturating_sub(1);
    if ship.fire_cooldown == 0 {
        alien_bullets.push(spawner.spawn_alien_bullet(ship));
        ship.fire_cooldown = config.alien_fire_interval_ticks;
    }
}
