use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::managers::history_stack::HistoryStack;

/// Opaque tab identifier, stable for the tab's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(String);

impl TabId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TabId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TabId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Whether a navigation is in flight for the tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    Idle,
    Loading,
}

/// A browser tab and its navigation state.
///
/// `requested_url` is what the user asked for; `rendered_url` only moves when
/// a navigation commits. `progress` is meaningful while `Loading` and is 0
/// otherwise.
#[derive(Debug, Clone, Serialize)]
pub struct Tab {
    pub id: TabId,
    pub requested_url: String,
    pub rendered_url: String,
    pub title: String,
    pub load_state: LoadState,
    pub progress: f64,
    pub history: HistoryStack,
    pub created_at: i64,
}

impl Tab {
    /// A fresh tab sitting on `home_url` with empty history.
    pub fn home(home_url: &str, created_at: i64) -> Self {
        Self {
            id: TabId::new(),
            requested_url: home_url.to_string(),
            rendered_url: home_url.to_string(),
            title: "New Tab".to_string(),
            load_state: LoadState::Idle,
            progress: 0.0,
            history: HistoryStack::new(),
            created_at,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }
}
