use std::sync::{Arc, Mutex};

use aurora_browser::database::{Database, SqliteStore};
use aurora_browser::managers::persistence_bridge::{KeyValueStore, MemoryStore, PersistenceBridge};
use aurora_browser::managers::tab_manager::{TabManager, TabManagerTrait};
use aurora_browser::services::loading_simulator::SequenceSource;
use aurora_browser::services::website_registry::WebsiteRegistry;
use aurora_browser::types::errors::PersistenceError;
use aurora_browser::types::history::HistoryEntry;
use aurora_browser::types::session::{PersistedBrowserState, StoreChange};
use aurora_browser::types::settings::HOME_URL;
use tempfile::TempDir;

fn sample_state() -> PersistedBrowserState {
    PersistedBrowserState {
        url: "promail.pro".to_string(),
        bookmarks: vec!["trustmail.com".to_string()],
        history: vec![
            HistoryEntry::new("trustmail.com", "TrustMail", Some("#2563eb")),
            HistoryEntry::new("promail.pro", "ProMail", Some("#7c3aed")),
        ],
        history_index: Some(1),
    }
}

fn bridge_over(raw: Option<&str>, owner: Option<&str>) -> PersistenceBridge {
    let store = MemoryStore::new();
    if let Some(raw) = raw {
        store.save("browser", owner, raw).unwrap();
    }
    PersistenceBridge::new(Box::new(store), "browser", owner)
}

// ─── Loading ───

#[test]
fn test_save_then_load_returns_same_state() {
    let bridge = bridge_over(None, None);
    let state = sample_state();
    bridge.save_state(&state).unwrap();
    assert_eq!(bridge.load_state(HOME_URL), state);
}

#[test]
fn test_missing_state_yields_home_default() {
    let bridge = bridge_over(None, None);
    assert_eq!(bridge.try_load_state().unwrap(), None);
    assert_eq!(bridge.load_state(HOME_URL), PersistedBrowserState::home(HOME_URL));
}

#[test]
fn test_malformed_state_yields_home_default() {
    let bridge = bridge_over(Some("{ not json"), None);
    assert!(matches!(
        bridge.try_load_state(),
        Err(PersistenceError::ReadFailure(_))
    ));
    assert_eq!(bridge.load_state("trustmail.com"), PersistedBrowserState::home("trustmail.com"));
}

#[test]
fn test_wrongly_typed_field_yields_home_default() {
    let bridge = bridge_over(Some(r#"{"url": "promail.pro", "bookmarks": 5}"#), None);
    assert_eq!(bridge.load_state(HOME_URL), PersistedBrowserState::home(HOME_URL));
}

#[test]
fn test_partial_state_fills_defaults() {
    let bridge = bridge_over(Some(r#"{"bookmarks": ["promail.pro"]}"#), None);
    let state = bridge.load_state(HOME_URL);
    assert_eq!(state.url, HOME_URL);
    assert_eq!(state.bookmarks, vec!["promail.pro".to_string()]);
    assert!(state.history.is_empty());
    assert_eq!(state.history_index, None);
}

#[test]
fn test_history_timestamp_is_stored_as_text() {
    let store = Arc::new(MemoryStore::new());
    let bridge = PersistenceBridge::new(Box::new(SharedStore(store.clone())), "browser", None);
    let state = sample_state();
    bridge.save_state(&state).unwrap();

    let raw = store.load("browser", None).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let stamp = json["history"][0]["timestamp"].as_str().unwrap();
    let parsed = chrono::DateTime::parse_from_rfc3339(stamp).unwrap();
    assert_eq!(parsed, state.history[0].timestamp);
    assert_eq!(json["history_index"], 1);
}

/// Lets a test keep a handle on the store the bridge writes to.
struct SharedStore(Arc<MemoryStore>);

impl KeyValueStore for SharedStore {
    fn load(&self, key: &str, owner: Option<&str>) -> Result<Option<String>, PersistenceError> {
        self.0.load(key, owner)
    }

    fn save(&self, key: &str, owner: Option<&str>, value: &str) -> Result<(), PersistenceError> {
        self.0.save(key, owner, value)
    }
}

// ─── Owners and listeners ───

#[test]
fn test_owners_are_isolated() {
    let store = Arc::new(MemoryStore::new());
    let alice = PersistenceBridge::new(Box::new(SharedStore(store.clone())), "browser", Some("alice"));
    let bob = PersistenceBridge::new(Box::new(SharedStore(store.clone())), "browser", Some("bob"));
    let anonymous = PersistenceBridge::new(Box::new(SharedStore(store)), "browser", None);

    alice.save_state(&sample_state()).unwrap();
    assert_eq!(alice.load_state(HOME_URL), sample_state());
    assert_eq!(bob.try_load_state().unwrap(), None);
    assert_eq!(anonymous.try_load_state().unwrap(), None);
}

#[test]
fn test_listeners_are_notified_after_save() {
    let seen: Arc<Mutex<Vec<StoreChange>>> = Arc::new(Mutex::new(Vec::new()));
    let mut bridge = bridge_over(None, Some("alice"));
    let sink = seen.clone();
    bridge.on_change(move |change| sink.lock().unwrap().push(change.clone()));

    bridge.save_state(&sample_state()).unwrap();
    bridge.save_state(&PersistedBrowserState::default()).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(
        seen[0],
        StoreChange {
            key: "browser".to_string(),
            owner: Some("alice".to_string())
        }
    );
}

// ─── SQLite store ───

#[test]
fn test_sqlite_store_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("browser.db");

    {
        let store = SqliteStore::new(Database::open(&path).unwrap());
        let bridge = PersistenceBridge::new(Box::new(store), "browser", Some("alice"));
        bridge.save_state(&sample_state()).unwrap();
    }

    let store = SqliteStore::new(Database::open(&path).unwrap());
    let bridge = PersistenceBridge::new(Box::new(store), "browser", Some("alice"));
    assert_eq!(bridge.load_state(HOME_URL), sample_state());
}

#[test]
fn test_sqlite_store_overwrites_value() {
    let store = SqliteStore::new(Database::open_in_memory().unwrap());
    store.save("browser", None, "one").unwrap();
    store.save("browser", None, "two").unwrap();
    store.save("browser", Some("alice"), "three").unwrap();
    assert_eq!(store.load("browser", None).unwrap().as_deref(), Some("two"));
    assert_eq!(store.load("browser", Some("alice")).unwrap().as_deref(), Some("three"));
}

#[test]
fn test_browsing_session_is_restored_after_restart() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("browser.db");
    let open_manager = || {
        let store = SqliteStore::new(Database::open(&path).unwrap());
        let bridge = PersistenceBridge::new(Box::new(store), "browser", None);
        TabManager::new(WebsiteRegistry::builtin())
            .with_progress_source(SequenceSource::constant(0.5))
            .with_persistence(bridge)
    };

    {
        let mut mgr = open_manager();
        let id = mgr.active_tab_id().cloned().unwrap();
        for url in ["trustmail.com", "promail.pro", "free-prizes.win"] {
            mgr.navigate(&id, url);
            mgr.run_until_idle();
        }
        mgr.go_back(&id);
        mgr.run_until_idle();
        mgr.toggle_bookmark("promail.pro");
    }

    let mgr = open_manager();
    let tab = mgr.get_active_tab().unwrap();
    assert_eq!(tab.rendered_url, "promail.pro");
    assert_eq!(tab.title, "ProMail");
    assert_eq!(tab.history.len(), 3);
    assert_eq!(tab.history.position(), 1);
    assert!(mgr.can_go_forward(&tab.id));
    assert!(mgr.is_bookmarked("promail.pro"));
}

#[test]
fn test_loading_tab_is_not_persisted_until_commit() {
    let store = Arc::new(MemoryStore::new());
    let bridge = PersistenceBridge::new(Box::new(SharedStore(store.clone())), "browser", None);
    let mut mgr = TabManager::new(WebsiteRegistry::builtin())
        .with_progress_source(SequenceSource::constant(0.5))
        .with_persistence(bridge);
    let id = mgr.active_tab_id().cloned().unwrap();

    mgr.navigate(&id, "trustmail.com");
    assert_eq!(store.load("browser", None).unwrap(), None);

    mgr.run_until_idle();
    let raw = store.load("browser", None).unwrap().unwrap();
    let state: PersistedBrowserState = serde_json::from_str(&raw).unwrap();
    assert_eq!(state.url, "trustmail.com");
}
