//! Integration test: save and resume
//!
//! A game saved mid-combat resumes exactly where it stopped.

use guildmaster::core::{
    deserialize_state, serialize_state, GameConfig, GameSession, JsonFileStore, MemoryStore,
    Notification, RecordingSink, SaveStore,
};
use guildmaster::ranks::Rank;
use guildmaster::shop::{ConsumableInstance, ConsumableKind};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

type Session = GameSession<ChaCha8Rng, RecordingSink>;

fn busy_session() -> Session {
    let mut session = GameSession::new(
        GameConfig::default(),
        ChaCha8Rng::seed_from_u64(99),
        RecordingSink::new(),
    );
    session.generate_shop();
    let mut state = session.into_state();
    state.gold = 400;
    state.enter_rank(Rank::from_name("E+").unwrap());
    state.bonuses.unlock("melee_is_life").unwrap();
    state.bonuses.unlock("melee_is_life").unwrap();
    state.bonuses.unlock("sharp_sword").unwrap();
    state.synergy_levels.insert("Melee Formation".to_string(), 3);
    state
        .consumables
        .push(ConsumableInstance::new(
            ConsumableKind::transform("Barbarian"),
            &mut ChaCha8Rng::seed_from_u64(5),
        ));
    let mut session = GameSession::from_state(state, ChaCha8Rng::seed_from_u64(100), RecordingSink::new());
    session.start_combat(None).unwrap();
    let first: Vec<_> = session.state().combat.combat_pool[..2].to_vec();
    session.resolve_turn(&first).unwrap();
    session
}

// =============================================================================
// Round Trips
// =============================================================================

#[test]
fn test_mid_combat_state_survives_roundtrip() {
    let session = busy_session();
    let blob = session.serialize_state().unwrap();
    let restored = deserialize_state(&blob).unwrap();

    assert_eq!(&restored, session.state());
    assert!(restored.combat.is_active);
    assert!(restored.combat.is_boss_fight());
    assert_eq!(restored.combat.round, 1);
    assert_eq!(restored.bonuses.copies_of("melee_is_life"), 1);
    assert_eq!(restored.synergy_level("Melee Formation"), 3);
}

#[test]
fn test_resumed_game_plays_identically() {
    let original = busy_session();
    let blob = original.serialize_state().unwrap();

    let mut a = GameSession::from_state(
        original.into_state(),
        ChaCha8Rng::seed_from_u64(5),
        RecordingSink::new(),
    );
    let mut b = GameSession::from_state(
        deserialize_state(&blob).unwrap(),
        ChaCha8Rng::seed_from_u64(5),
        RecordingSink::new(),
    );

    while a.state().combat.is_active {
        let squad: Vec<_> = a.state().combat.combat_pool.iter().take(5).copied().collect();
        let ra = a.resolve_turn(&squad).unwrap();
        let rb = b.resolve_turn(&squad).unwrap();
        assert_eq!(ra, rb);
    }
    assert_eq!(a.state(), b.state());
}

#[test]
fn test_boss_choice_survives_reload() {
    let session = busy_session();
    let boss = session.state().displayed_boss.clone();
    assert!(boss.is_some());
    let restored = deserialize_state(&session.serialize_state().unwrap()).unwrap();
    assert_eq!(restored.displayed_boss, boss);
}

// =============================================================================
// Stores And Old Saves
// =============================================================================

#[test]
fn test_session_loads_from_memory_store() {
    let session = busy_session();
    let mut store = MemoryStore::default();
    session.save(&mut store).unwrap();

    let mut fresh = GameSession::new(
        GameConfig::default(),
        ChaCha8Rng::seed_from_u64(1),
        RecordingSink::new(),
    );
    assert!(fresh.load(&store).unwrap());
    assert_eq!(fresh.state(), session.state());
}

#[test]
fn test_file_store_keeps_latest_save() {
    let path = std::env::temp_dir().join(format!(
        "guildmaster_roundtrip_{}.json",
        uuid::Uuid::new_v4()
    ));
    let mut store = JsonFileStore::new(path.clone());
    let session = busy_session();
    session.save(&mut store).unwrap();
    let blob = store.load().unwrap().unwrap();
    assert_eq!(&deserialize_state(&blob).unwrap(), session.state());
    std::fs::remove_file(path).ok();
}

#[test]
fn test_other_version_still_loads() {
    let session = busy_session();
    let blob = serialize_state(session.state()).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&blob).unwrap();
    value["version"] = serde_json::json!(0);
    let restored = deserialize_state(&value.to_string()).unwrap();
    assert_eq!(&restored, session.state());
}

#[test]
fn test_unknown_rank_falls_back_to_first() {
    let restored = deserialize_state(r#"{ "state": { "rank": "Z++" } }"#).unwrap();
    assert_eq!(restored.rank, Rank::FIRST);
}

// =============================================================================
// Rejected Blobs
// =============================================================================

#[test]
fn test_blob_without_state_is_rejected() {
    assert!(deserialize_state("{}").is_err());
    assert!(deserialize_state(r#"{ "version": 1, "saved_at": 0 }"#).is_err());
}

#[test]
fn test_bare_state_does_not_wipe_the_session() {
    let mut session = busy_session();
    let before = session.state().clone();
    let bare = serde_json::to_string(session.state()).unwrap();

    assert!(session.deserialize_state(&bare).is_err());
    assert_eq!(session.state(), &before);
    assert!(session
        .sink()
        .notifications
        .iter()
        .any(|n| matches!(n, Notification::Rejected { .. })));
}
