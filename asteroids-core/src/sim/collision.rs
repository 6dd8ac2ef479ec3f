//! Collision pass, run once per tick after every entity has moved.
//!
//! Order: ship vs asteroids, bullets vs asteroids, alien bullets vs ship,
//! bullets vs alien. All tests are circle/circle on entity size.

use crate::constants::{asteroid_score, child_asteroid_size};
use crate::geometry::circles_overlap;

use super::spawner::Spawner;
use super::{Game, GameMode};

impl Game {
    pub(super) fn resolve_collisions(&mut self) {
        // The ship takes at most one hit per tick.
        let ship_hit = self.collide_ship_with_asteroids();
        self.collide_bullets_with_asteroids();
        if !ship_hit {
            self.collide_alien_bullets_with_ship();
        }
        self.collide_bullets_with_alien();
    }

    #[inline]
    fn ship_vulnerable(&self) -> bool {
        matches!(self.mode, GameMode::Playing) && !self.ship.is_respawning()
    }

    fn collide_ship_with_asteroids(&mut self) -> bool {
        if !self.ship_vulnerable() {
            return false;
        }

        let ship = &self.ship;
        let hit = self.asteroids.iter().any(|asteroid| {
            circles_overlap(
                ship.x,
                ship.y,
                ship.size,
                asteroid.x,
                asteroid.y,
                asteroid.radius(),
            )
        });

        if hit {
            self.destroy_ship();
        }
        hit
    }

    /// Each bullet hits the first asteroid it overlaps and is spent. Damage
    /// is applied after every bullet has been tested, so two bullets landing
    /// on the same asteroid in one tick both count.
    fn collide_bullets_with_asteroids(&mut self) {
        if self.bullets.is_empty() || self.asteroids.is_empty() {
            return;
        }

        let mut hits = vec![0u32; self.asteroids.len()];
        let asteroids = &self.asteroids;
        self.bullets.retain(|bullet| {
            let target = asteroids.iter().position(|asteroid| {
                circles_overlap(
                    bullet.x,
                    bullet.y,
                    bullet.radius,
                    asteroid.x,
                    asteroid.y,
                    asteroid.radius(),
                )
            });
            match target {
                Some(index) => {
                    hits[index] += 1;
                    false
                }
                None => true,
            }
        });

        let mut children = Vec::new();
        for (index, count) in hits.into_iter().enumerate() {
            if count == 0 {
                continue;
            }

            let asteroid = &mut self.asteroids[index];
            asteroid.health = asteroid.health.saturating_sub(count);
            if asteroid.health > 0 {
                continue;
            }

            let (x, y, size) = (asteroid.x, asteroid.y, asteroid.size);
            let points = asteroid_score(self.config.asteroid_max_size, size);
            self.score = self.score.saturating_add(points);
            self.asteroids_destroyed = self.asteroids_destroyed.saturating_add(1);

            if size > self.config.asteroid_min_size {
                let half_size = child_asteroid_size(size);
                let mut spawner =
                    Spawner::new(&mut self.rng, &self.config, self.asteroid_speed);
                children.push(spawner.spawn_child_asteroid((x, y), half_size));
                children.push(spawner.spawn_child_asteroid((x, y), half_size));
            }
        }

        // Health only reaches zero above, so this drops exactly the
        // destroyed asteroids.
        self.asteroids.retain(|asteroid| asteroid.health > 0);
        self.asteroids.extend(children);
    }

    fn collide_alien_bullets_with_ship(&mut self) {
        if !self.ship_vulnerable() {
            return;
        }

        let ship = &self.ship;
        let hit = self.alien_bullets.iter().position(|bullet| {
            circles_overlap(
                ship.x,
                ship.y,
                ship.size,
                bullet.x,
                bullet.y,
                bullet.radius,
            )
        });

        if let Some(index) = hit {
            self.alien_bullets.swap_remove(index);
            self.destroy_ship();
        }
    }

    fn collide_bullets_with_alien(&mut self) {
        let Some(alien) = self.alien else {
            return;
        };

        let hit = self.bullets.iter().position(|bullet| {
            circles_overlap(
                bullet.x,
                bullet.y,
                bullet.radius,
                alien.x,
                alien.y,
                alien.size,
            )
        });

        if let Some(index) = hit {
            self.bullets.remove(index);
            self.alien = None;
            self.score = self.score.saturating_add(self.config.alien_score);
            self.aliens_destroyed = self.aliens_destroyed.saturating_add(1);
            tracing::debug!(tick = self.tick, score = self.score, "alien ship destroyed");
        }
    }

    pub(super) fn destroy_ship(&mut self) {
        self.lives = self.lives.saturating_sub(1);

        if self.lives == 0 {
            self.mode = GameMode::GameOver;
            self.ship.thrusting = false;
            tracing::info!(
                tick = self.tick,
                score = self.score,
                level = self.level,
                "game over"
            );
            return;
        }

        let (x, y) = self.config.viewport.center();
        self.ship.recenter(x, y);
        self.ship.respawn_timer = self.config.ship_respawn_ticks;
        tracing::debug!(tick = self.tick, lives = self.lives, "ship destroyed");
    }
}
