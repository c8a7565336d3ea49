//! Integration test: activity loops driven through a session
//!
//! Covers repeat targets, capacity refusal, missing inputs, and pausing.

use darkstone::activities::{ActivityEvent, BlockReason, LoopState, StopReason};
use darkstone::core::{Destination, GameConfig, PlayerSave, Screen, Session, SessionEvent};
use darkstone::items::catalog;
use darkstone::items::inventory::count_of;
use darkstone::items::types::{Item, ItemKind, Resource, Stack, StackKey};
use darkstone::utils::persistence::{MemoryStorage, SaveStore};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

type TestSession = Session<MemoryStorage, ChaCha8Rng>;

fn open_with(save: PlayerSave) -> TestSession {
    let mut store = SaveStore::new(MemoryStorage::new());
    store.save(&save).unwrap();
    Session::open(
        store.storage().clone(),
        ChaCha8Rng::seed_from_u64(42),
        GameConfig::default(),
        0,
    )
    .unwrap()
}

fn loop_state(session: &TestSession) -> Option<LoopState> {
    match session.screen() {
        Screen::Mining(lp) => Some(lp.state()),
        Screen::Fishing(lp) => Some(lp.state()),
        Screen::Hunting(lp) => Some(lp.state()),
        Screen::Cooking(lp) => Some(lp.state()),
        Screen::Forging(lp) => Some(lp.state()),
        Screen::Zone(lp) => Some(lp.state()),
        Screen::Hub | Screen::Dungeon(_) => None,
    }
}

fn activity_messages(events: &[SessionEvent]) -> Vec<String> {
    events
        .iter()
        .filter(|e| matches!(e, SessionEvent::Activity(_)))
        .map(|e| e.message())
        .collect()
}

#[test]
fn test_mining_target_of_three() {
    let mut session = open_with(PlayerSave::new(0));
    session.navigate(Destination::Mining, "?ore=iron");

    let mut events = session.request_target("3").unwrap();
    events.extend(session.advance(60_000));

    let save = session.snapshot();
    let iron = StackKey::new(ItemKind::Ore, "iron");
    assert_eq!(count_of(&save.inventory, &iron), 3);
    assert_eq!(save.inventory.len(), 1, "ore should sit in one stack");
    assert_eq!(save.mining.xp, 18);
    assert_eq!(loop_state(&session), Some(LoopState::Completed));

    let messages = activity_messages(&events);
    assert_eq!(
        messages.last().map(String::as_str),
        Some("Target completed! You obtained 1 Iron Ore (last).")
    );
    let produced = events
        .iter()
        .filter(|e| matches!(e, SessionEvent::Activity(ActivityEvent::Produced { .. })))
        .count();
    assert_eq!(produced, 3);
}

#[test]
fn test_ticks_land_on_six_second_boundaries() {
    let mut session = open_with(PlayerSave::new(0));
    session.navigate(Destination::Mining, "");
    session.start();
    assert_eq!(session.snapshot().mining.xp, 6);

    session.advance(5_999);
    assert_eq!(session.snapshot().mining.xp, 6);
    session.advance(1);
    assert_eq!(session.snapshot().mining.xp, 12);
}

#[test]
fn test_full_inventory_blocks_without_mutation() {
    let mut save = PlayerSave::new(0);
    save.inventory_max = 5;
    save.inventory.push(Stack::new(catalog::coal(), 5));
    let mut session = open_with(save);
    let before = session.snapshot();

    session.navigate(Destination::Mining, "?ore=coal");
    let events = session.start();

    assert_eq!(session.snapshot(), before);
    assert_eq!(loop_state(&session), Some(LoopState::Blocked));
    assert!(events.contains(&SessionEvent::Activity(ActivityEvent::Halted {
        reason: StopReason::Blocked(BlockReason::InventoryFull),
    })));
}

#[test]
fn test_hunting_stops_when_arrows_run_out() {
    let mut save = PlayerSave::new(0);
    save.inventory.push(Stack::new(catalog::arrows(), 2));
    let mut session = open_with(save);
    session.navigate(Destination::Hunting, "?target=deer");
    let mut events = session.start();
    events.extend(session.advance(60_000));

    let save = session.snapshot();
    let meat = StackKey::new(ItemKind::Meat, "raw_deer_meat");
    assert_eq!(count_of(&save.inventory, &meat), 2);
    assert_eq!(count_of(&save.inventory, &catalog::arrows_key()), 0);
    assert_eq!(
        activity_messages(&events).last().map(String::as_str),
        Some("Out of arrows.")
    );
}

#[test]
fn test_forging_runs_until_inputs_are_gone() {
    let mut save = PlayerSave::new(0);
    save.inventory.push(Stack::new(Item::Ore(Resource::new("iron", "Iron Ore")), 6));
    save.inventory.push(Stack::new(catalog::coal(), 2));
    let mut session = open_with(save);
    session.navigate(Destination::Forging, "?recipe=iron_bar");
    session.start();
    session.advance(60_000);

    let save = session.snapshot();
    assert_eq!(count_of(&save.inventory, &catalog::iron_bar_key()), 2);
    assert_eq!(count_of(&save.inventory, &StackKey::new(ItemKind::Ore, "iron")), 2);
    assert_eq!(save.blacksmithing.xp, 22);
    assert_eq!(loop_state(&session), Some(LoopState::Blocked));
}

#[test]
fn test_cooking_consumes_raw_fish() {
    let mut save = PlayerSave::new(0);
    save.inventory.push(Stack::new(
        Item::Fish(Resource::new("silver_minnow", "Silver Minnow")),
        2,
    ));
    let mut session = open_with(save);
    session.navigate(Destination::Cooking, "");
    session.request_target("2").unwrap();
    session.advance(6_000);

    let save = session.snapshot();
    let cooked = StackKey::new(ItemKind::Food, "cooked_silver_minnow");
    assert_eq!(count_of(&save.inventory, &cooked), 2);
    assert_eq!(save.inventory.len(), 1);
    assert_eq!(save.cooking.xp, 12);
}

#[test]
fn test_pause_cancels_pending_tick() {
    let mut session = open_with(PlayerSave::new(0));
    session.navigate(Destination::Fishing, "");
    session.start();
    session.advance(3_000);

    session.pause();
    let events = session.advance(30_000);
    assert!(activity_messages(&events).is_empty());
    assert_eq!(session.snapshot().fishing.xp, 6);

    session.resume();
    session.advance(30_000);
    assert_eq!(session.snapshot().fishing.xp, 6);
    assert_eq!(loop_state(&session), Some(LoopState::Stopped));
}

#[test]
fn test_user_stop_reports_and_cancels() {
    let mut session = open_with(PlayerSave::new(0));
    session.navigate(Destination::Mining, "");
    session.request_target("10").unwrap();
    let events = session.stop();
    assert_eq!(activity_messages(&events), vec!["Stopped.".to_string()]);
    session.advance(60_000);
    assert_eq!(session.snapshot().mining.xp, 6);
}

#[test]
fn test_invalid_target_leaves_loop_idle() {
    let mut session = open_with(PlayerSave::new(0));
    session.navigate(Destination::Mining, "");
    for bad in ["0", "-1", "abc", ""] {
        assert!(session.request_target(bad).is_err(), "{bad:?} accepted");
    }
    assert_eq!(loop_state(&session), Some(LoopState::Idle));
    assert_eq!(session.snapshot().mining.xp, 0);
}
