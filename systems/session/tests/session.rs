use std::time::Duration;

use horde_core::{Command, Event, WaveNumber};
use horde_system_session::{MemoryStore, Outcome, Session, SessionConfig};
use horde_system_waves::Phase;
use horde_world::{query, World};

fn booted(store: Option<MemoryStore>) -> Session {
    let store = store.map(|store| Box::new(store) as Box<dyn horde_system_session::BestWaveStore>);
    let mut session = Session::new(World::new(), SessionConfig::default(), store);
    session.boot();
    session
}

fn kill_everything(session: &mut Session) {
    for enemy in query::live_enemies(session.world()) {
        session.submit(Command::DamageEnemy {
            enemy,
            amount: 1_000.0,
        });
    }
}

#[test]
fn first_wave_clears_and_escalates() {
    let mut session = booted(None);
    assert_eq!(session.live_population(), 1);

    for _ in 0..4 {
        session.advance(Duration::from_millis(500));
    }
    assert_eq!(session.live_population(), 5);
    assert_eq!(session.waves().wave().map(|wave| wave.spawned), Some(5));

    kill_everything(&mut session);
    assert_eq!(session.live_population(), 0);
    assert_eq!(session.waves().phase(), Some(Phase::Spawning));

    session.advance(Duration::from_millis(100));
    assert_eq!(
        session.waves().phase(),
        Some(Phase::Spawning),
        "clearance waits for the debounce window"
    );

    session.advance(Duration::from_millis(100));
    assert_eq!(session.waves().phase(), Some(Phase::Cooldown));
    assert!(session.event_log().contains(&Event::PopulationCleared));

    session.advance(Duration::from_secs(10));
    assert_eq!(session.waves().current_wave(), Some(WaveNumber::new(2)));
    let status = query::wave_status(session.world());
    assert_eq!(status.current, Some(WaveNumber::new(2)));
    assert_eq!(status.quota, 10);
    assert_eq!(status.cooldown, None);
    assert_eq!(session.live_population(), 1);
}

#[test]
fn final_enemy_keeps_wave_running_after_early_clearance() {
    let mut session = booted(None);
    for _ in 0..3 {
        session.advance(Duration::from_millis(500));
    }
    assert_eq!(session.live_population(), 4);

    kill_everything(&mut session);
    session.advance(Duration::from_millis(200));
    assert!(session.event_log().contains(&Event::PopulationCleared));
    assert_eq!(session.waves().phase(), Some(Phase::Spawning));

    session.advance(Duration::from_millis(300));
    assert_eq!(session.waves().wave().map(|wave| wave.spawned), Some(5));
    assert_eq!(session.live_population(), 1);
    assert_eq!(
        session.waves().phase(),
        Some(Phase::Spawning),
        "cooldown must wait for the last enemy"
    );

    kill_everything(&mut session);
    session.advance(Duration::from_millis(200));
    assert_eq!(session.waves().phase(), Some(Phase::Cooldown));
}

#[test]
fn cooldown_progresses_while_paused() {
    let mut session = booted(None);
    session.advance(Duration::from_secs(2));
    kill_everything(&mut session);
    session.advance(Duration::from_millis(200));
    assert_eq!(session.waves().phase(), Some(Phase::Cooldown));

    session.submit(Command::SetTimeScale { scale: 0.0 });
    session.advance(Duration::from_secs(4));

    let status = query::wave_status(session.world());
    let cooldown = status.cooldown.expect("cooldown running");
    assert_eq!(cooldown.remaining, Duration::from_secs(6));
}

#[test]
fn corpses_are_despawned_without_second_unregistration() {
    let mut session = booted(None);
    session.advance(Duration::from_millis(500));
    assert_eq!(session.live_population(), 2);

    let victim = query::live_enemies(session.world())[0];
    session.submit(Command::DamageEnemy {
        enemy: victim,
        amount: 1_000.0,
    });
    assert_eq!(session.live_population(), 1);

    session.submit(Command::SetTimeScale { scale: 0.0 });
    session.advance(Duration::from_secs(2));
    assert!(session
        .event_log()
        .contains(&Event::EnemyDespawned { enemy: victim }));
    assert_eq!(session.live_population(), 1);
    assert!(!query::enemy_view(session.world())
        .iter()
        .any(|enemy| enemy.id == victim));
}

#[test]
fn player_death_freezes_and_records_best_wave() {
    let mut session = booted(Some(MemoryStore::new(0)));
    session.submit(Command::DamagePlayer { amount: 100.0 });

    assert_eq!(
        session.outcome(),
        Outcome::Defeated {
            wave: WaveNumber::FIRST,
            best: 1,
        }
    );
    assert_eq!(query::time_scale(session.world()), 0.0);

    let logged = session.event_log().len();
    session.advance(Duration::from_secs(30));
    assert_eq!(session.event_log().len(), logged, "defeated sessions are frozen");
}

#[test]
fn lower_score_keeps_stored_best_wave() {
    let mut session = booted(Some(MemoryStore::new(12)));
    assert_eq!(session.best_wave(), 12);
    session.submit(Command::DamagePlayer { amount: 250.0 });

    assert_eq!(
        session.outcome(),
        Outcome::Defeated {
            wave: WaveNumber::FIRST,
            best: 12,
        }
    );
}
