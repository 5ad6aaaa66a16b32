use std::time::Duration;

use horde_core::{Command, EnemyKind, EnemyTemplate, Event, PopulationSignal, Vec3};
use horde_system_population::PopulationTracker;
use horde_world::{self as world, query, World};

fn spawn(world: &mut World, tracker: &mut PopulationTracker) -> horde_core::EnemyId {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SpawnEnemy {
            kind: EnemyKind::Regular,
            template: EnemyTemplate::new(20.0),
            position: Vec3::ZERO,
        },
        &mut events,
    );
    let mut signals = Vec::new();
    tracker.handle(&events, &mut signals);
    match signals.as_slice() {
        [PopulationSignal::Registered { enemy, .. }] => *enemy,
        other => panic!("unexpected signals: {other:?}"),
    }
}

#[test]
fn death_and_despawn_unregister_only_once() {
    let mut world = World::new();
    let mut tracker = PopulationTracker::new();
    let enemy = spawn(&mut world, &mut tracker);
    let survivor = spawn(&mut world, &mut tracker);
    assert_eq!(tracker.live(), 2);

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::DamageEnemy {
            enemy,
            amount: 100.0,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_secs(3),
        },
        &mut events,
    );
    assert!(events.contains(&Event::EnemyDied { enemy }));
    assert!(events.contains(&Event::EnemyDespawned { enemy }));

    let mut signals = Vec::new();
    tracker.handle(&events, &mut signals);
    tracker.handle(&events, &mut signals);

    let unregistrations = signals
        .iter()
        .filter(|signal| matches!(signal, PopulationSignal::Unregistered { .. }))
        .count();
    assert_eq!(unregistrations, 1);
    assert_eq!(tracker.live(), 1);
    assert!(tracker.contains(survivor));
}

#[test]
fn population_never_goes_negative() {
    let mut tracker = PopulationTracker::new();
    let enemy = horde_core::EnemyId::new(0, 0);
    let _ = tracker.register(enemy);

    let events = vec![Event::EnemyDied { enemy }; 5];
    let mut signals = Vec::new();
    tracker.handle(&events, &mut signals);

    assert_eq!(
        signals,
        vec![PopulationSignal::Unregistered { enemy, live: 0 }]
    );
    assert_eq!(tracker.live(), 0);
}

#[test]
fn signals_preserve_event_order() {
    let mut tracker = PopulationTracker::new();
    let first = horde_core::EnemyId::new(0, 0);
    let events = [
        Event::EnemySpawned {
            enemy: first,
            kind: EnemyKind::Regular,
            position: Vec3::ZERO,
        },
        Event::TimeAdvanced {
            real: Duration::from_millis(100),
            simulated: Duration::ZERO,
        },
        Event::EnemyDied { enemy: first },
    ];

    let mut signals = Vec::new();
    tracker.handle(&events, &mut signals);

    assert_eq!(
        signals,
        vec![
            PopulationSignal::Registered {
                enemy: first,
                live: 1
            },
            PopulationSignal::RealTimeElapsed {
                dt: Duration::from_millis(100)
            },
            PopulationSignal::Unregistered {
                enemy: first,
                live: 0
            },
        ]
    );
}

#[test]
fn resync_matches_world_listing() {
    let mut world = World::new();
    let mut scratch = PopulationTracker::new();
    let _ = spawn(&mut world, &mut scratch);
    let _ = spawn(&mut world, &mut scratch);

    let mut tracker = PopulationTracker::new();
    tracker.resync(query::live_enemies(&world));
    assert_eq!(tracker.live(), 2);
}
