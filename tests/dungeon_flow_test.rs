//! Integration test: the Whispering Crypt from the session's point of view
//!
//! Entering, winning, failing, and leaving mid-run with the marker intact.

use darkstone::core::{Destination, GameConfig, PlayerSave, Screen, Session, SessionEvent};
use darkstone::dungeon::{DungeonEvent, DungeonPhase};
use darkstone::error::GameError;
use darkstone::utils::persistence::{MemoryStorage, SaveStore};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

type TestSession = Session<MemoryStorage, ChaCha8Rng>;

fn hero_with(attack: u32, defense: u32) -> PlayerSave {
    let mut save = PlayerSave::new(0);
    save.base_attack = attack;
    save.base_defense = defense;
    save.recompute_totals();
    save
}

fn open_with(save: PlayerSave) -> TestSession {
    let mut store = SaveStore::new(MemoryStorage::new());
    store.save(&save).unwrap();
    Session::open(
        store.storage().clone(),
        ChaCha8Rng::seed_from_u64(77),
        GameConfig::default(),
        0,
    )
    .unwrap()
}

fn phase(session: &TestSession) -> Option<DungeonPhase> {
    match session.screen() {
        Screen::Dungeon(raid) => Some(raid.phase()),
        _ => None,
    }
}

fn dungeon_events(events: &[SessionEvent]) -> Vec<&DungeonEvent> {
    events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::Dungeon(d) => Some(d),
            _ => None,
        })
        .collect()
}

#[test]
fn test_strong_hero_clears_the_crypt() {
    let mut session = open_with(hero_with(200, 60));
    let mut events = session.enter_dungeon().unwrap();
    assert_eq!(session.snapshot().vitals.stamina, 80);
    events.extend(session.advance(10 * 60 * 1000));

    let dungeon = dungeon_events(&events);
    let cleared = dungeon
        .iter()
        .filter(|e| matches!(e, DungeonEvent::WaveCleared { .. }))
        .count();
    assert_eq!(cleared, 6);
    assert!(dungeon
        .iter()
        .any(|e| matches!(e, DungeonEvent::BossAppeared { .. })));
    assert!(matches!(dungeon.last(), Some(DungeonEvent::Victory { .. })));

    assert_eq!(phase(&session), Some(DungeonPhase::Won));
    assert!(session.store().load_active_run().is_none());
    let gold = session.snapshot().gold;
    assert!((500..=800).contains(&gold), "gold {gold}");
}

#[test]
fn test_weak_hero_dies_on_first_wave() {
    let mut session = open_with(hero_with(5, 0));
    session.enter_dungeon().unwrap();
    let events = session.advance(60_000);

    let dungeon = dungeon_events(&events);
    assert_eq!(
        dungeon.last().map(|e| e.message()),
        Some("Dungeon failed: died on Wave 1".to_string())
    );
    assert_eq!(phase(&session), Some(DungeonPhase::Failed));
    assert!(session.store().load_active_run().is_none());
    assert_eq!(session.snapshot().vitals.hp, 0);
}

#[test]
fn test_leaving_keeps_marker_and_returning_restarts() {
    let mut session = open_with(hero_with(200, 60));
    session.enter_dungeon().unwrap();
    session.advance(12_000);
    assert_eq!(phase(&session), Some(DungeonPhase::Wave(1)));

    session.navigate(Destination::Hub, "");
    session.advance(60_000);
    assert!(session.store().load_active_run().is_some());

    let events = session.navigate(Destination::Dungeon, "");
    assert_eq!(events, vec![SessionEvent::Dungeon(DungeonEvent::Preparing)]);
    assert_eq!(phase(&session), Some(DungeonPhase::Prepare));
}

#[test]
fn test_pause_halts_raid() {
    let mut session = open_with(hero_with(200, 60));
    session.enter_dungeon().unwrap();
    session.pause();
    assert_eq!(phase(&session), Some(DungeonPhase::Halted));

    let events = session.advance(120_000);
    assert!(dungeon_events(&events).is_empty());
    session.resume();
    assert_eq!(phase(&session), Some(DungeonPhase::Halted));
    assert!(session.store().load_active_run().is_some());
}

#[test]
fn test_entry_refused_without_stamina() {
    let mut save = PlayerSave::new(0);
    save.vitals.stamina = 5;
    let mut session = open_with(save);

    assert!(matches!(
        session.enter_dungeon(),
        Err(GameError::NotEnoughStamina { needed: 20, have: 5 })
    ));
    assert!(matches!(session.screen(), Screen::Hub));
    assert!(session.store().load_active_run().is_none());
}

#[test]
fn test_dungeon_screen_without_marker_stays_idle() {
    let mut session = open_with(PlayerSave::new(0));
    let events = session.navigate(Destination::Dungeon, "");
    assert!(events.is_empty());
    assert_eq!(phase(&session), Some(DungeonPhase::Idle));
}
