//! Persistence Bridge for the browser.
//!
//! Saves the active tab's rendered URL, history and the bookmark list as JSON
//! in an owner-scoped key-value store, and reads it back on startup. Reads
//! never fail: anything missing or malformed yields the default state.

use std::collections::HashMap;
use std::sync::Mutex;

use log::{debug, warn};

use crate::types::errors::PersistenceError;
use crate::types::session::{PersistedBrowserState, StoreChange};

/// Owner-scoped string store.
pub trait KeyValueStore: Send {
    fn load(&self, key: &str, owner: Option<&str>) -> Result<Option<String>, PersistenceError>;
    fn save(&self, key: &str, owner: Option<&str>, value: &str) -> Result<(), PersistenceError>;
}

/// Volatile store, used for tests and the `memory` backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<(String, String), String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(key: &str, owner: Option<&str>) -> (String, String) {
        (key.to_string(), owner.unwrap_or_default().to_string())
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str, owner: Option<&str>) -> Result<Option<String>, PersistenceError> {
        let values = self
            .values
            .lock()
            .map_err(|e| PersistenceError::ReadFailure(e.to_string()))?;
        Ok(values.get(&Self::slot(key, owner)).cloned())
    }

    fn save(&self, key: &str, owner: Option<&str>, value: &str) -> Result<(), PersistenceError> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| PersistenceError::WriteFailure(e.to_string()))?;
        values.insert(Self::slot(key, owner), value.to_string());
        Ok(())
    }
}

type ChangeListener = Box<dyn Fn(&StoreChange) + Send>;

/// Reads and writes [`PersistedBrowserState`] for one owner.
pub struct PersistenceBridge {
    store: Box<dyn KeyValueStore>,
    key: String,
    owner: Option<String>,
    listeners: Vec<ChangeListener>,
}

impl PersistenceBridge {
    pub fn new(store: Box<dyn KeyValueStore>, key: &str, owner: Option<&str>) -> Self {
        Self {
            store,
            key: key.to_string(),
            owner: owner.map(str::to_string),
            listeners: Vec::new(),
        }
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Registers a callback run after every successful save.
    pub fn on_change(&mut self, listener: impl Fn(&StoreChange) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Reads the stored state, reporting why it could not be used.
    pub fn try_load_state(&self) -> Result<Option<PersistedBrowserState>, PersistenceError> {
        let raw = self.store.load(&self.key, self.owner())?;
        match raw {
            None => Ok(None),
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| PersistenceError::ReadFailure(e.to_string())),
        }
    }

    /// Reads the stored state, substituting the home state on any failure.
    pub fn load_state(&self, home_url: &str) -> PersistedBrowserState {
        match self.try_load_state() {
            Ok(Some(state)) => state,
            Ok(None) => {
                debug!("no stored browser state for owner {:?}", self.owner);
                PersistedBrowserState::home(home_url)
            }
            Err(e) => {
                warn!("discarding stored browser state for owner {:?}: {}", self.owner, e);
                PersistedBrowserState::home(home_url)
            }
        }
    }

    pub fn save_state(&self, state: &PersistedBrowserState) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(state)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
        self.store.save(&self.key, self.owner(), &json)?;

        let change = StoreChange {
            key: self.key.clone(),
            owner: self.owner.clone(),
        };
        for listener in &self.listeners {
            listener(&change);
        }
        Ok(())
    }
}
