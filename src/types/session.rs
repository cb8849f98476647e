use serde::{Deserialize, Serialize};

use super::history::HistoryEntry;
use super::settings::HOME_URL;

/// What survives a reload: the active tab's rendered URL and history, plus
/// the bookmark list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistedBrowserState {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default)]
    pub bookmarks: Vec<String>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub history_index: Option<usize>,
}

fn default_url() -> String {
    HOME_URL.to_string()
}

impl PersistedBrowserState {
    /// Empty state landing on `home_url`.
    pub fn home(home_url: &str) -> Self {
        Self {
            url: home_url.to_string(),
            bookmarks: Vec::new(),
            history: Vec::new(),
            history_index: None,
        }
    }
}

impl Default for PersistedBrowserState {
    fn default() -> Self {
        Self::home(HOME_URL)
    }
}

/// Notification sent to listeners after a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    pub key: String,
    pub owner: Option<String>,
}
