//! Turns typed input into the URL a tab should load.
//!
//! A known site normalizes to its canonical domain; anything else passes
//! through verbatim (trimmed). There is no real URL parsing or DNS here.

use std::sync::Arc;

use crate::services::website_registry::WebsiteRegistry;
use crate::types::errors::NavigationError;
use crate::types::website::WebsiteDescriptor;

/// Result of resolving user input.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub final_url: String,
    pub descriptor: Option<WebsiteDescriptor>,
}

impl Resolution {
    /// Title a tab gets once this resolution commits.
    pub fn title(&self) -> &str {
        self.descriptor
            .as_ref()
            .map(|d| d.name.as_str())
            .unwrap_or(&self.final_url)
    }

    pub fn favicon(&self) -> Option<&str> {
        self.descriptor.as_ref().map(|d| d.color.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct NavigationResolver {
    registry: Arc<WebsiteRegistry>,
}

impl NavigationResolver {
    pub fn new(registry: Arc<WebsiteRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &WebsiteRegistry {
        &self.registry
    }

    pub fn resolve(&self, input: &str) -> Resolution {
        let trimmed = input.trim();
        match self.registry.lookup(trimmed) {
            Some(descriptor) => Resolution {
                final_url: descriptor.domain.clone(),
                descriptor: Some(descriptor.clone()),
            },
            None => Resolution {
                final_url: trimmed.to_string(),
                descriptor: None,
            },
        }
    }

    /// Like [`resolve`](Self::resolve) but treats a miss as an error.
    pub fn require(&self, url: &str) -> Result<&WebsiteDescriptor, NavigationError> {
        self.registry
            .lookup(url.trim())
            .ok_or_else(|| NavigationError::UnresolvedUrl(url.to_string()))
    }
}
