//! Static mapping from domain to virtual website.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::services::sites::{Link, LookalikeSite, MailProviderSite, StaticPage, WelcomePage};
use crate::types::settings::HOME_URL;
use crate::types::website::{SecurityLevel, WebsiteDescriptor};

/// Read-only registry of virtual websites, keyed by canonical domain.
#[derive(Debug, Default)]
pub struct WebsiteRegistry {
    sites: HashMap<String, WebsiteDescriptor>,
    order: Vec<String>,
}

/// Drops everything from the first `?` on.
pub fn strip_query(domain_or_url: &str) -> &str {
    match domain_or_url.split_once('?') {
        Some((path, _)) => path,
        None => domain_or_url,
    }
}

impl WebsiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a site. A later registration for the same domain replaces the
    /// earlier one but keeps its position.
    pub fn register(&mut self, descriptor: WebsiteDescriptor) {
        let domain = descriptor.domain.clone();
        if self.sites.insert(domain.clone(), descriptor).is_none() {
            self.order.push(domain);
        }
    }

    /// Exact match on the registered domain after stripping any query suffix.
    pub fn lookup(&self, domain_or_url: &str) -> Option<&WebsiteDescriptor> {
        self.sites.get(strip_query(domain_or_url))
    }

    /// Sites in registration order.
    pub fn sites(&self) -> impl Iterator<Item = &WebsiteDescriptor> {
        self.order.iter().filter_map(|d| self.sites.get(d))
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// The process-wide registry of built-in sites, built on first use.
    pub fn builtin() -> Arc<WebsiteRegistry> {
        static BUILTIN: OnceLock<Arc<WebsiteRegistry>> = OnceLock::new();
        BUILTIN
            .get_or_init(|| Arc::new(Self::with_builtin_sites()))
            .clone()
    }

    fn with_builtin_sites() -> Self {
        let mut registry = Self::new();

        registry.register(WebsiteDescriptor {
            domain: "trustmail.com".to_string(),
            name: "TrustMail".to_string(),
            color: "#2563eb".to_string(),
            security: SecurityLevel::Secure,
            renderer: Arc::new(MailProviderSite {
                brand: "TrustMail".to_string(),
                tagline: "Secure email you can trust.".to_string(),
                related: vec![Link::new("Try ProMail", "promail.pro")],
            }),
        });
        registry.register(WebsiteDescriptor {
            domain: "promail.pro".to_string(),
            name: "ProMail".to_string(),
            color: "#7c3aed".to_string(),
            security: SecurityLevel::Secure,
            renderer: Arc::new(MailProviderSite {
                brand: "ProMail".to_string(),
                tagline: "Professional email for professionals.".to_string(),
                related: vec![Link::new("Try TrustMail", "trustmail.com")],
            }),
        });
        registry.register(WebsiteDescriptor {
            domain: "trustmai1.com".to_string(),
            name: "TrustMail".to_string(),
            color: "#2563eb".to_string(),
            security: SecurityLevel::Phishing,
            renderer: Arc::new(LookalikeSite {
                imitates: "TrustMail".to_string(),
                lure: "free-prizes.win".to_string(),
            }),
        });
        registry.register(WebsiteDescriptor {
            domain: "free-prizes.win".to_string(),
            name: "Free Prizes".to_string(),
            color: "#dc2626".to_string(),
            security: SecurityLevel::Insecure,
            renderer: Arc::new(StaticPage {
                heading: "You are our 1,000,000th visitor!".to_string(),
                paragraphs: vec!["Claim your prize by entering your card details.".to_string()],
                links: vec![Link::new("Back to safety", HOME_URL)],
            }),
        });

        let shortcuts = registry
            .sites()
            .map(|site| Link::new(&site.name, &site.domain))
            .collect();
        registry.register(WebsiteDescriptor {
            domain: HOME_URL.to_string(),
            name: "Welcome".to_string(),
            color: "#3b82f6".to_string(),
            security: SecurityLevel::Secure,
            renderer: Arc::new(WelcomePage { shortcuts }),
        });

        registry
    }
}
