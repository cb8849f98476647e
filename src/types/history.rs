use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One committed navigation in a tab's history.
///
/// `timestamp` is stored as an RFC 3339 string and parsed back into a
/// `DateTime<Utc>` on load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub url: String,
    pub title: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub favicon: Option<String>,
}

impl HistoryEntry {
    pub fn new(url: &str, title: &str, favicon: Option<&str>) -> Self {
        Self {
            url: url.to_string(),
            title: title.to_string(),
            timestamp: Utc::now(),
            favicon: favicon.map(str::to_string),
        }
    }
}
