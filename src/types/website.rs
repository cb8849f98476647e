use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::services::sites::SiteRenderer;

/// Security classification shown next to the address bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityLevel {
    Secure,
    Warning,
    Insecure,
    Phishing,
}

/// A registered virtual website.
#[derive(Clone)]
pub struct WebsiteDescriptor {
    pub domain: String,
    pub name: String,
    pub color: String,
    pub security: SecurityLevel,
    pub renderer: Arc<dyn SiteRenderer>,
}

impl fmt::Debug for WebsiteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebsiteDescriptor")
            .field("domain", &self.domain)
            .field("name", &self.name)
            .field("color", &self.color)
            .field("security", &self.security)
            .finish_non_exhaustive()
    }
}

impl PartialEq for WebsiteDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.domain == other.domain
            && self.name == other.name
            && self.color == other.color
            && self.security == other.security
    }
}

/// Icon shown in the address bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeIcon {
    Lock,
    Alert,
}

/// Colour of the address bar icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    Neutral,
    Green,
    Yellow,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SecurityBadge {
    pub icon: BadgeIcon,
    pub tone: BadgeTone,
}

impl SecurityBadge {
    /// Badge for the site currently shown; `None` means the URL did not resolve.
    pub fn for_site(descriptor: Option<&WebsiteDescriptor>) -> Self {
        let (icon, tone) = match descriptor.map(|d| d.security) {
            None => (BadgeIcon::Lock, BadgeTone::Neutral),
            Some(SecurityLevel::Secure) => (BadgeIcon::Lock, BadgeTone::Green),
            Some(SecurityLevel::Warning) => (BadgeIcon::Alert, BadgeTone::Yellow),
            Some(SecurityLevel::Insecure) | Some(SecurityLevel::Phishing) => {
                (BadgeIcon::Alert, BadgeTone::Red)
            }
        };
        Self { icon, tone }
    }
}
