use super::*;

const SEED: u32 = 0xDEAD_BEEF;

fn new_game(seed: u32) -> Game {
    Game::new(GameConfig::default(), seed).expect("default config must be valid")
}

fn still_asteroid(x: f64, y: f64, size: u32, health: u32) -> Asteroid {
    Asteroid {
        x,
        y,
        vx: 0.0,
        vy: 0.0,
        size,
        health,
        verts: 8,
        offsets: vec![1.0; 8],
    }
}

fn still_bullet(x: f64, y: f64) -> Bullet {
    Bullet {
        x,
        y,
        vx: 0.0,
        vy: 0.0,
        radius: 2.0,
    }
}

fn fire() -> FrameInput {
    FrameInput {
        fire: true,
        ..FrameInput::default()
    }
}

fn thrust() -> FrameInput {
    FrameInput {
        up: true,
        ..FrameInput::default()
    }
}

fn reset() -> FrameInput {
    FrameInput {
        reset: true,
        ..FrameInput::default()
    }
}

fn assert_invariant_violation(mutator: impl FnOnce(&mut Game), expected: RuleCode) {
    let mut game = new_game(SEED);
    mutator(&mut game);
    assert_eq!(game.validate_invariants(), Err(expected));
}

#[test]
fn new_game_starts_at_level_one() {
    let game = new_game(SEED);

    assert_eq!(game.mode(), GameMode::Playing);
    assert_eq!((game.score(), game.level(), game.lives(), game.tick()), (0, 1, 4, 0));
    assert_eq!(game.asteroids().len(), 5);
    assert_eq!((game.ship().x, game.ship().y), (400.0, 300.0));
    assert!(game.alien().is_none());
    for asteroid in game.asteroids() {
        assert_eq!(asteroid.size, 50);
        assert!(crate::geometry::dist_between(400.0, 300.0, asteroid.x, asteroid.y) >= 220.0);
    }
    game.validate_invariants()
        .expect("initial state must be valid");
}

#[test]
fn invalid_config_is_rejected_before_spawning() {
    let config = GameConfig {
        base_asteroid_count: 0,
        ..GameConfig::default()
    };
    assert_eq!(
        Game::new(config, SEED).err(),
        Some(ConfigError::ZeroAsteroidCount)
    );
}

#[test]
fn asteroid_takes_three_hits_then_splits() {
    let mut game = new_game(SEED);
    let (ship_x, ship_y) = (game.ship.x, game.ship.y);
    game.asteroids = vec![still_asteroid(ship_x + 150.0, ship_y, 100, 3)];

    let mut health_seen = vec![3];
    for _ in 0..200 {
        game.step(fire());
        if game.asteroids.len() != 1 {
            break;
        }
        let health = game.asteroids[0].health;
        if health_seen.last() != Some(&health) {
            health_seen.push(health);
        }
    }

    assert_eq!(health_seen, vec![3, 2, 1]);
    assert_eq!(game.score(), 10);
    assert_eq!(game.asteroids.len(), 2);
    for child in &game.asteroids {
        assert_eq!(child.size, 50);
        assert_eq!(child.health, 3);
        assert_eq!((child.x, child.y), (ship_x + 150.0, ship_y));
    }
    assert_eq!(game.lives(), 4);
}

#[test]
fn simultaneous_hits_all_count() {
    let mut game = new_game(SEED);
    game.asteroids = vec![still_asteroid(100.0, 100.0, 50, 2)];
    game.bullets = vec![still_bullet(100.0, 100.0), still_bullet(110.0, 100.0)];

    game.resolve_collisions();

    assert!(game.bullets.is_empty());
    assert_eq!(game.score(), 20);
    assert_eq!(game.asteroids.len(), 2);
    assert!(game.asteroids.iter().all(|child| child.size == 25));
}

#[test]
fn bullet_hits_only_the_first_overlapping_asteroid() {
    let mut game = new_game(SEED);
    game.asteroids = vec![
        still_asteroid(100.0, 100.0, 50, 3),
        still_asteroid(120.0, 100.0, 50, 3),
    ];
    game.bullets = vec![still_bullet(110.0, 100.0)];

    game.resolve_collisions();

    assert_eq!(game.asteroids[0].health, 2);
    assert_eq!(game.asteroids[1].health, 3);
}

#[test]
fn smallest_asteroids_do_not_split() {
    let mut game = new_game(SEED);
    game.asteroids = vec![still_asteroid(100.0, 100.0, 25, 1)];
    game.bullets = vec![still_bullet(100.0, 100.0)];

    game.resolve_collisions();

    // round(100 / 25) * 10
    assert_eq!(game.score(), 40);
    assert!(game.asteroids.is_empty());
    assert_eq!(game.asteroids_destroyed(), 1);
}

#[test]
fn asteroids_just_above_minimum_still_split() {
    let mut game = new_game(SEED);
    game.asteroids = vec![still_asteroid(600.0, 100.0, 26, 1)];
    game.bullets = vec![still_bullet(600.0, 100.0)];

    game.resolve_collisions();

    // round(100 / 26) * 10
    assert_eq!(game.score(), 40);
    let sizes: Vec<u32> = game.asteroids.iter().map(|a| a.size).collect();
    assert_eq!(sizes, vec![13, 13]);
    assert_eq!(game.asteroids_destroyed(), 1);
}

#[test]
fn damaged_asteroid_survives_with_reduced_health() {
    let mut game = new_game(SEED);
    game.asteroids = vec![still_asteroid(100.0, 100.0, 50, 3)];
    game.bullets = vec![still_bullet(100.0, 100.0), still_bullet(500.0, 500.0)];

    game.resolve_collisions();

    assert_eq!(game.asteroids.len(), 1);
    assert_eq!(game.asteroids[0].health, 2);
    assert_eq!(game.bullets.len(), 1);
    assert_eq!(game.score(), 0);
}

#[test]
fn ship_hit_respawns_at_center_after_a_delay() {
    let mut game = new_game(SEED);
    game.ship.x = 300.0;
    game.ship.angle = 1.0;
    game.asteroids = vec![still_asteroid(300.0, 300.0, 50, 3)];

    game.step(FrameInput::default());
    assert_eq!(game.lives(), 3);
    assert_eq!((game.ship.x, game.ship.y), (400.0, 300.0));
    assert_eq!((game.ship.vx, game.ship.vy), (0.0, 0.0));
    assert_eq!(game.ship.angle, 1.0);
    assert_eq!(game.ship.respawn_timer, 60);

    // Sitting on top of an asteroid is harmless while respawning.
    game.asteroids = vec![still_asteroid(400.0, 300.0, 50, 3)];
    for _ in 0..59 {
        game.step(thrust());
        assert_eq!(game.lives(), 3);
        assert!(game.ship.is_respawning());
        assert!(!game.ship.thrusting);
    }

    game.step(FrameInput::default());
    assert_eq!(game.lives(), 2);
}

#[test]
fn only_one_ship_hit_per_tick() {
    let mut game = new_game(SEED);
    game.asteroids = vec![still_asteroid(400.0, 300.0, 50, 3)];
    game.alien_bullets = vec![still_bullet(400.0, 300.0)];
    let config = GameConfig {
        ship_respawn_ticks: 0,
        ..GameConfig::default()
    };
    game.config = config;

    game.step(FrameInput::default());

    assert_eq!(game.lives(), 3);
}

#[test]
fn last_life_ends_the_game_until_reset() {
    let mut game = new_game(SEED);
    game.lives = 1;
    game.score = 120;
    game.asteroids = vec![still_asteroid(400.0, 300.0, 50, 3)];

    game.step(FrameInput::default());
    assert_eq!(game.mode(), GameMode::GameOver);
    assert_eq!(game.lives(), 0);
    assert!(game.snapshot().is_game_over());
    game.validate_invariants()
        .expect("game over state must be valid");

    let frozen = game.snapshot();
    for _ in 0..30 {
        game.step(FrameInput {
            up: true,
            fire: true,
            left: true,
            ..FrameInput::default()
        });
    }
    assert_eq!(game.snapshot(), frozen);

    game.step(reset());
    assert_eq!(game.mode(), GameMode::Playing);
    assert_eq!(game.snapshot(), new_game(SEED).snapshot());
}

#[test]
fn reset_input_is_ignored_while_playing() {
    let mut game = new_game(SEED);
    game.score = 50;

    game.step(reset());

    assert_eq!(game.score(), 50);
    assert_eq!(game.tick(), 1);
}

#[test]
fn reset_is_idempotent() {
    let fresh = new_game(SEED).snapshot();
    let mut game = new_game(SEED);
    for tick in 0..240u32 {
        game.step(FrameInput {
            up: tick % 3 == 0,
            left: tick % 5 == 0,
            fire: true,
            ..FrameInput::default()
        });
    }

    game.reset();
    assert_eq!(game.snapshot(), fresh);
    assert_eq!(game.asteroids_destroyed(), 0);
    game.reset();
    assert_eq!(game.snapshot(), fresh);
}

#[test]
fn clearing_the_field_advances_the_level() {
    let mut game = new_game(SEED);
    game.asteroids = vec![still_asteroid(100.0, 100.0, 25, 1)];
    game.bullets = vec![still_bullet(100.0, 100.0)];

    game.step(FrameInput::default());

    assert_eq!(game.level(), 2);
    assert_eq!(game.score(), 40);
    assert_eq!(game.asteroids().len(), 10);
    assert_eq!(game.asteroid_speed(), 2.0);
    let (ship_x, ship_y) = (game.ship.x, game.ship.y);
    for asteroid in game.asteroids() {
        assert_eq!(asteroid.size, 50);
        assert!(asteroid.vx.abs() <= 2.0 && asteroid.vy.abs() <= 2.0);
        assert!(crate::geometry::dist_between(ship_x, ship_y, asteroid.x, asteroid.y) >= 220.0);
    }
}

#[test]
fn alien_only_appears_from_level_three() {
    let mut game = new_game(SEED);
    game.level = 2;
    game.asteroids = vec![still_asteroid(100.0, 100.0, 50, 3)];
    for _ in 0..100 {
        game.step(FrameInput::default());
        assert!(game.alien().is_none());
    }

    game.level = 3;
    game.step(FrameInput::default());
    let alien = game.alien().copied().expect("alien should spawn at level 3");
    assert_eq!(alien.size, 30.0);
}

#[test]
fn alien_leaves_when_the_field_is_cleared() {
    let mut game = new_game(SEED);
    game.level = 3;
    game.alien = Some(AlienShip {
        x: 200.0,
        y: 200.0,
        vx: 1.0,
        vy: 0.0,
        size: 30.0,
        fire_cooldown: 60,
    });
    game.asteroids.clear();

    game.step(FrameInput::default());

    assert!(game.alien().is_none());
    assert_eq!(game.level(), 4);
}

#[test]
fn shooting_the_alien_scores() {
    let mut game = new_game(SEED);
    game.level = 3;
    game.asteroids = vec![still_asteroid(700.0, 500.0, 25, 3)];
    game.alien = Some(AlienShip {
        x: 100.0,
        y: 100.0,
        vx: 0.0,
        vy: 0.0,
        size: 30.0,
        fire_cooldown: 50,
    });
    game.bullets = vec![still_bullet(110.0, 100.0)];

    game.step(FrameInput::default());

    assert!(game.alien().is_none());
    assert!(game.bullets().is_empty());
    assert_eq!(game.score(), 100);
    assert_eq!(game.aliens_destroyed(), 1);
    assert_eq!(game.asteroids_destroyed(), 0);
}

#[test]
fn alien_bullet_costs_a_life() {
    let mut game = new_game(SEED);
    game.asteroids = vec![still_asteroid(700.0, 500.0, 25, 3)];
    game.alien_bullets = vec![still_bullet(405.0, 300.0)];

    game.step(FrameInput::default());

    assert_eq!(game.lives(), 3);
    assert!(game.alien_bullets().is_empty());
    assert!(game.ship().is_respawning());
}

#[test]
fn bullets_are_dropped_at_the_edge_instead_of_wrapping() {
    let mut game = new_game(SEED);
    game.asteroids = vec![still_asteroid(100.0, 500.0, 25, 3)];
    game.bullets = vec![Bullet {
        x: 798.0,
        y: 300.0,
        vx: 5.0,
        vy: 0.0,
        radius: 2.0,
    }];

    game.step(FrameInput::default());

    assert!(game.bullets().is_empty());
}

#[test]
fn thrust_leaves_a_fading_trail() {
    let mut game = new_game(SEED);
    game.asteroids = vec![still_asteroid(100.0, 500.0, 25, 3)];

    for _ in 0..3 {
        game.step(thrust());
    }
    assert_eq!(game.particles().len(), 3);

    for _ in 0..10 {
        game.step(FrameInput::default());
    }
    assert!(game.particles().is_empty());
}

#[test]
fn tick_counts_played_ticks_only() {
    let mut game = new_game(SEED);
    for _ in 0..5 {
        game.step(FrameInput::default());
    }
    assert_eq!(game.tick(), 5);

    game.lives = 1;
    game.asteroids = vec![still_asteroid(game.ship.x, game.ship.y, 50, 3)];
    game.step(FrameInput::default());
    assert!(game.is_game_over());
    game.step(FrameInput::default());
    assert_eq!(game.tick(), 6);

    game.step(reset());
    assert_eq!(game.tick(), 0);
}

#[test]
fn same_seed_and_inputs_are_deterministic() {
    let inputs: Vec<FrameInput> = (0..600u32)
        .map(|tick| FrameInput {
            up: tick % 7 < 3,
            down: false,
            left: tick % 11 < 2,
            right: tick % 13 < 4,
            fire: tick % 4 == 0,
            reset: tick % 97 == 0,
        })
        .collect();

    let mut a = new_game(SEED);
    let mut b = new_game(SEED);
    for input in &inputs {
        a.step(*input);
        b.step(*input);
    }

    assert_eq!(a.snapshot(), b.snapshot());
    assert_ne!(
        new_game(1).snapshot().asteroids,
        new_game(2).snapshot().asteroids
    );
}

#[test]
fn random_play_upholds_invariants() {
    for seed in [1u32, 0x1234_5678, SEED, 0xFFFF_FFFF] {
        let mut game = new_game(seed);
        let mut driver = SeededRng::new(seed ^ 0x5555_5555);

        for _ in 0..3_000 {
            game.step(crate::input::decode_input_byte(driver.next() as u8 & 0x3F));
            if let Err(rule) = game.validate_invariants() {
                panic!("seed {seed:#x} tick {}: {rule}", game.tick());
            }
            let ship = game.ship();
            assert!(crate::geometry::speed(ship.vx, ship.vy) <= 5.0 + 1e-9);
            assert!((0.0..800.0).contains(&ship.x) && (0.0..600.0).contains(&ship.y));
        }
    }
}

#[test]
fn viewport_change_refolds_world() {
    let mut game = new_game(SEED);
    game.bullets = vec![still_bullet(700.0, 100.0), still_bullet(50.0, 50.0)];

    assert_eq!(
        game.set_viewport(Viewport {
            width: 0.0,
            height: 100.0,
        }),
        Err(ConfigError::InvalidViewport {
            width: 0.0,
            height: 100.0,
        })
    );
    assert_eq!(game.viewport(), Viewport::default());

    game.set_viewport(Viewport {
        width: 300.0,
        height: 200.0,
    })
    .expect("viewport is valid");

    assert_eq!((game.ship().x, game.ship().y), (100.0, 100.0));
    assert_eq!(game.bullets().len(), 1);
    game.validate_invariants()
        .expect("refolded world must be valid");
}

#[test]
fn corrupted_state_is_reported() {
    assert_invariant_violation(|game| game.level = 0, RuleCode::GlobalLevelNonZero);
    assert_invariant_violation(|game| game.lives = 0, RuleCode::GlobalModeLivesConsistency);
    assert_invariant_violation(
        |game| game.mode = GameMode::GameOver,
        RuleCode::GlobalModeLivesConsistency,
    );
    assert_invariant_violation(|game| game.ship.x = 800.0, RuleCode::ShipBounds);
    assert_invariant_violation(|game| game.ship.vx = 6.0, RuleCode::ShipSpeedClamp);
    assert_invariant_violation(
        |game| game.ship.fire_cooldown = 16,
        RuleCode::ShipCooldownRange,
    );
    assert_invariant_violation(|game| game.asteroids[0].y = -1.0, RuleCode::AsteroidBounds);
    assert_invariant_violation(
        |game| {
            game.asteroids[0].offsets.pop();
        },
        RuleCode::AsteroidShape,
    );
    assert_invariant_violation(|game| game.asteroids[0].size = 0, RuleCode::AsteroidSize);
    assert_invariant_violation(
        |game| game.bullets.push(still_bullet(-1.0, 10.0)),
        RuleCode::BulletBounds,
    );
    assert_invariant_violation(
        |game| game.alien_bullets.push(still_bullet(10.0, 601.0)),
        RuleCode::AlienBulletBounds,
    );
    assert_invariant_violation(
        |game| {
            game.particles.push(Particle {
                x: 0.0,
                y: 0.0,
                vx: 0.0,
                vy: 0.0,
                size: 2.0,
                life: 0.0,
            })
        },
        RuleCode::ParticleLife,
    );
}
