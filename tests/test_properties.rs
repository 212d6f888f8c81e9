use proptest::prelude::*;

use tilt_shooter::compute::*;
use tilt_shooter::entities::*;
use tilt_shooter::Settings;

fn arb_projectiles() -> impl Strategy<Value = Vec<Projectile>> {
    prop::collection::vec((0.0f32..350.0, 0.0f32..640.0), 0..20).prop_map(|v| {
        v.into_iter()
            .enumerate()
            .map(|(i, (x, y))| Projectile { id: i as u64 + 1, x, y })
            .collect()
    })
}

fn arb_obstacles() -> impl Strategy<Value = Vec<Obstacle>> {
    prop::collection::vec((0.0f32..320.0, 1.0f32..=640.0), 0..20).prop_map(|v| {
        v.into_iter()
            .enumerate()
            .map(|(i, (x, y))| Obstacle { id: i as u64 + 100, x, y })
            .collect()
    })
}

proptest! {
    #[test]
    fn player_always_within_bounds(samples in prop::collection::vec(-1000.0f32..1000.0, 1..50)) {
        let settings = Settings::default();
        let mut s = init_state(&settings);
        for x in samples {
            s = apply_tilt(&s, TiltSample { x }, &settings);
            prop_assert!(s.player.x >= 0.0);
            prop_assert!(s.player.x <= settings.screen_width - settings.player_width);
        }
    }

    #[test]
    fn surviving_projectiles_strictly_rise(projectiles in arb_projectiles()) {
        let settings = Settings::default();
        let mut s = init_state(&settings);
        s.projectiles = projectiles;
        let next = advance_projectiles(&s, &settings);
        for p in &next.projectiles {
            let before = s.projectiles.iter().find(|q| q.id == p.id).unwrap();
            prop_assert!(p.y > before.y);
            prop_assert_eq!(p.x, before.x);
            prop_assert!(p.y < settings.screen_height);
        }
    }

    #[test]
    fn surviving_obstacles_strictly_fall(obstacles in arb_obstacles()) {
        let settings = Settings::default();
        let mut s = init_state(&settings);
        s.obstacles = obstacles;
        let next = advance_obstacles(&s, &settings);
        for o in &next.obstacles {
            let before = s.obstacles.iter().find(|q| q.id == o.id).unwrap();
            prop_assert!(o.y < before.y);
            prop_assert!(o.y > 0.0);
        }
    }

    #[test]
    fn collisions_never_consume_projectiles(
        projectiles in arb_projectiles(),
        obstacles in arb_obstacles(),
    ) {
        let settings = Settings::default();
        let mut s = init_state(&settings);
        s.projectiles = projectiles;
        s.obstacles = obstacles;
        let next = resolve_collisions(&s, &settings);
        prop_assert_eq!(&next.projectiles, &s.projectiles);
        for o in &next.obstacles {
            let ob = obstacle_box(o, &settings);
            prop_assert!(s.projectiles.iter().all(|p| !projectile_box(p, &settings).overlaps(&ob)));
        }
    }

    #[test]
    fn game_over_state_is_frozen(
        projectiles in arb_projectiles(),
        obstacles in arb_obstacles(),
        x in -1000.0f32..1000.0,
        seed in any::<u64>(),
    ) {
        use rand::SeedableRng;
        let settings = Settings::default();
        let mut s = init_state(&settings);
        s.projectiles = projectiles;
        s.obstacles = obstacles;
        s.status = SessionState::GameOver;

        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let mut next = apply_tilt(&s, TiltSample { x }, &settings);
        next = fire(&next, &settings);
        next = advance_projectiles(&next, &settings);
        next = obstacle_tick(&next, &settings);
        next = spawn_obstacle(&next, &settings, &mut rng);
        prop_assert_eq!(next, s);
    }
}
