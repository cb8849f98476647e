//! App Core for the simulated browser.
//!
//! Wires settings, the state store, the persistence bridge and the Tab
//! Manager together.

use std::time::Duration;

use log::info;

use crate::database::{Database, SqliteStore};
use crate::managers::persistence_bridge::{KeyValueStore, MemoryStore, PersistenceBridge};
use crate::managers::tab_manager::TabManager;
use crate::platform;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::website_registry::WebsiteRegistry;
use crate::types::settings::{BrowserSettings, StorageBackend};

/// Central application struct.
pub struct App {
    pub settings_engine: SettingsEngine,
    pub tab_manager: TabManager,
}

impl App {
    /// Loads settings (from `config_path` or the platform default), opens the
    /// configured store and restores the session of `owner`, falling back to
    /// `general.owner` from the settings.
    pub fn new(
        config_path: Option<String>,
        owner: Option<&str>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings_engine = SettingsEngine::new(config_path);
        settings_engine.load()?;
        let settings = settings_engine.get_settings().clone();

        let store: Box<dyn KeyValueStore> = match settings.storage.backend {
            StorageBackend::Memory => Box::new(MemoryStore::new()),
            StorageBackend::Sqlite => {
                let dir = platform::get_data_dir();
                std::fs::create_dir_all(&dir)?;
                let path = dir.join(&settings.storage.database_file);
                info!("opening browser state at {}", path.display());
                Box::new(SqliteStore::new(Database::open(path)?))
            }
        };

        let tab_manager = Self::build_tab_manager(&settings, store, owner);
        Ok(Self {
            settings_engine,
            tab_manager,
        })
    }

    /// App backed by a fresh in-memory store, ignoring `storage.backend`.
    /// Settings changes are written to `config_path`.
    pub fn in_memory(settings: BrowserSettings, config_path: &str, owner: Option<&str>) -> Self {
        let tab_manager = Self::build_tab_manager(&settings, Box::new(MemoryStore::new()), owner);
        Self {
            settings_engine: SettingsEngine::with_settings(config_path, settings),
            tab_manager,
        }
    }

    fn build_tab_manager(
        settings: &BrowserSettings,
        store: Box<dyn KeyValueStore>,
        owner: Option<&str>,
    ) -> TabManager {
        let owner = owner.or(settings.general.owner.as_deref());
        let bridge = PersistenceBridge::new(store, &settings.storage.state_key, owner);
        TabManager::with_settings(WebsiteRegistry::builtin(), settings).with_persistence(bridge)
    }

    /// Advances the simulation clock; used by the real-time drivers.
    pub fn tick(&mut self, elapsed: Duration) {
        self.tab_manager.advance(elapsed);
    }
}
