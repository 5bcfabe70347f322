//! Property tests for the rules that must hold for any input.

use proptest::prelude::*;

use td_core::prelude::*;
use td_core::economy::{tower_sell_value, tower_upgrade_cost};
use td_core::geometry::TILE_SIZE;

fn any_tower_kind() -> impl Strategy<Value = TowerKind> {
    prop_oneof![
        Just(TowerKind::Basic),
        Just(TowerKind::Sniper),
        Just(TowerKind::Splash),
        Just(TowerKind::Slow),
    ]
}

fn any_enemy_kind() -> impl Strategy<Value = EnemyKind> {
    prop_oneof![
        Just(EnemyKind::Basic),
        Just(EnemyKind::Fast),
        Just(EnemyKind::Tank),
        Just(EnemyKind::Boss),
    ]
}

proptest! {
    #[test]
    fn prop_spend_never_overdraws(start in 0u32..10_000, amounts in prop::collection::vec(0u32..5_000, 0..20)) {
        let mut economy = Economy::new(start);
        let mut expected = start;
        for amount in amounts {
            if economy.spend(amount) {
                expected -= amount;
            }
            prop_assert_eq!(economy.balance(), expected);
        }
    }

    #[test]
    fn prop_sell_value_never_exceeds_investment(kind in any_tower_kind(), level in 1u8..=3) {
        let mut invested = td_core::economy::tower_cost(kind);
        for step in 1..level {
            invested += tower_upgrade_cost(kind, step).unwrap();
        }
        let refund = tower_sell_value(kind, level);
        prop_assert!(refund < invested);
        // Higher levels always refund at least as much
        if level > 1 {
            prop_assert!(refund >= tower_sell_value(kind, level - 1));
        }
    }

    #[test]
    fn prop_slow_never_speeds_up(factors in prop::collection::vec(0.1f32..1.0, 1..10)) {
        let path = vec![Vec2::new(0.0, 0.0), Vec2::new(1000.0, 0.0)];
        let mut enemy = Enemy::spawn(1, EnemyKind::Basic, &path, &ScalingData::default());
        let base = enemy.base_speed;

        let mut strongest = 1.0f32;
        for factor in factors {
            enemy.apply_slow(factor, 2.0);
            strongest = strongest.min(factor);
            prop_assert!(enemy.current_speed() <= base + 1e-4);
            prop_assert!((enemy.slow_factor - strongest).abs() < 1e-6);
        }
    }

    #[test]
    fn prop_damage_never_resurrects(hits in prop::collection::vec(0.0f32..500.0, 1..30)) {
        let path = vec![Vec2::new(0.0, 0.0), Vec2::new(1000.0, 0.0)];
        let mut enemy = Enemy::spawn(1, EnemyKind::Tank, &path, &ScalingData::default());

        let mut was_dead = false;
        for hit in hits {
            enemy.take_damage(hit);
            prop_assert!(enemy.health >= 0.0);
            prop_assert!(enemy.health <= enemy.max_health);
            if was_dead {
                prop_assert!(enemy.is_dead);
            }
            was_dead = enemy.is_dead;
        }
    }

    #[test]
    fn prop_boss_phase_is_monotonic(hits in prop::collection::vec(0.0f32..800.0, 1..30)) {
        let path = vec![Vec2::new(0.0, 0.0), Vec2::new(1000.0, 0.0)];
        let mut boss = Enemy::spawn(1, EnemyKind::Boss, &path, &ScalingData::default());

        let mut last_phase = boss.phase;
        for hit in hits {
            boss.take_damage(hit);
            prop_assert!(boss.phase >= last_phase);
            prop_assert!(boss.phase <= 3);
            last_phase = boss.phase;
        }
    }

    #[test]
    fn prop_upgrades_strictly_improve(kind in any_tower_kind()) {
        let mut tower = Tower::new(1, kind, Vec2::new(500.0, 500.0), false);
        let mut last = (tower.damage, tower.range, tower.fire_interval);

        while tower.upgrade() {
            prop_assert!(tower.damage > last.0);
            prop_assert!(tower.range > last.1);
            prop_assert!(tower.fire_interval < last.2);
            last = (tower.damage, tower.range, tower.fire_interval);
        }
        prop_assert_eq!(tower.level, 3);
    }

    #[test]
    fn prop_snap_is_idempotent_and_centered(x in -100.0f32..1400.0, y in -100.0f32..800.0) {
        let snapped = Simulation::snap_to_tile(Vec2::new(x, y));

        let again = Simulation::snap_to_tile(snapped);
        prop_assert!((snapped.x - again.x).abs() < 1e-4);
        prop_assert!((snapped.y - again.y).abs() < 1e-4);

        // Centers sit at half-tile offsets
        let rem_x = (snapped.x - TILE_SIZE / 2.0) / TILE_SIZE;
        let rem_y = (snapped.y - TILE_SIZE / 2.0) / TILE_SIZE;
        prop_assert!((rem_x - rem_x.round()).abs() < 1e-3);
        prop_assert!((rem_y - rem_y.round()).abs() < 1e-3);
    }

    #[test]
    fn prop_sequencer_spawns_exactly_the_schedule(
        counts in prop::collection::vec((any_enemy_kind(), 1u32..6), 1..4),
    ) {
        let waves = vec![WaveData {
            groups: counts
                .iter()
                .map(|(kind, count)| GroupData {
                    kind: kind.name().to_string(),
                    count: *count,
                    delay: 0.1,
                })
                .collect(),
        }];
        let expected: u32 = counts.iter().map(|(_, count)| count).sum();

        let mut sequencer = WaveSequencer::new(waves);
        sequencer.skip_countdown();
        let mut spawned = 0u32;
        for _ in 0..10_000 {
            spawned += sequencer.update(0.05, true).len() as u32;
            if sequencer.is_complete() {
                break;
            }
        }

        prop_assert!(sequencer.is_complete());
        prop_assert_eq!(spawned, expected);
    }
}
