use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The landing page for new tabs and fully-closed windows.
pub const HOME_URL: &str = "browser://welcome";

/// Top-level browser settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BrowserSettings {
    #[serde(default)]
    pub general: GeneralSettings,
    #[serde(default)]
    pub loading: LoadingSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

impl BrowserSettings {
    /// Checks every section that carries constraints.
    pub fn validate(&self) -> Result<(), String> {
        if self.general.home_url.trim().is_empty() {
            return Err("general.home_url must not be empty".to_string());
        }
        self.loading.validate()
    }
}

/// General browser settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralSettings {
    pub home_url: String,
    /// Session owner used when none is given on the command line.
    pub owner: Option<String>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            home_url: HOME_URL.to_string(),
            owner: None,
        }
    }
}

/// Shape of the simulated page-load animation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LoadingSettings {
    pub start_progress: f64,
    pub tick_interval_ms: u64,
    pub min_increment: f64,
    pub max_increment: f64,
    pub stall_threshold: f64,
    pub stall_delay_ms: u64,
    pub complete_delay_ms: u64,
}

impl Default for LoadingSettings {
    fn default() -> Self {
        Self {
            start_progress: 5.0,
            tick_interval_ms: 50,
            min_increment: 1.0,
            max_increment: 15.0,
            stall_threshold: 75.0,
            stall_delay_ms: 600,
            complete_delay_ms: 200,
        }
    }
}

impl LoadingSettings {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.min_increment > 0.0) {
            return Err("loading.min_increment must be positive".to_string());
        }
        if self.max_increment < self.min_increment {
            return Err("loading.max_increment must be >= loading.min_increment".to_string());
        }
        if !(self.start_progress >= 0.0 && self.start_progress < self.stall_threshold) {
            return Err("loading.start_progress must be in [0, stall_threshold)".to_string());
        }
        if !(self.stall_threshold < 100.0) {
            return Err("loading.stall_threshold must be below 100".to_string());
        }
        // At least two ramp ticks before the stall.
        if !(self.max_increment < self.stall_threshold - self.start_progress) {
            return Err(
                "loading.max_increment must be below stall_threshold - start_progress".to_string(),
            );
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn stall_delay(&self) -> Duration {
        Duration::from_millis(self.stall_delay_ms)
    }

    pub fn complete_delay(&self) -> Duration {
        Duration::from_millis(self.complete_delay_ms)
    }
}

/// Where the browser state is persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// File name inside the data directory.
    pub database_file: String,
    pub state_key: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            database_file: "browser.db".to_string(),
            state_key: "browser".to_string(),
        }
    }
}
