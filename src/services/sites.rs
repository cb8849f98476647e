//! Virtual website content.
//!
//! Each registered domain carries a [`SiteRenderer`]. Renderers are leaf
//! components: `render` only describes a page, and `activate` may ask for a
//! navigation through the [`Navigator`] in its [`RenderContext`], which is
//! the only way site content can move the browser.

use serde::Serialize;

/// Collects navigation requests raised by site content.
#[derive(Debug, Default)]
pub struct Navigator {
    requests: Vec<String>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the browser to load `url` in the active tab.
    pub fn navigate(&mut self, url: impl Into<String>) {
        self.requests.push(url.into());
    }

    pub fn take_requests(&mut self) -> Vec<String> {
        std::mem::take(&mut self.requests)
    }
}

/// Inputs handed to a renderer.
pub struct RenderContext<'a> {
    pub domain: &'a str,
    pub url: &'a str,
    pub owner: Option<&'a str>,
    pub navigator: &'a mut Navigator,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub label: String,
    pub target: String,
}

impl Link {
    pub fn new(label: &str, target: &str) -> Self {
        Self {
            label: label.to_string(),
            target: target.to_string(),
        }
    }
}

/// A rendered page: heading, text blocks, and followable links.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageContent {
    pub heading: String,
    pub paragraphs: Vec<String>,
    pub links: Vec<Link>,
}

pub trait SiteRenderer: Send + Sync {
    fn render(&self, ctx: &RenderContext<'_>) -> PageContent;

    /// Handles a click on link `index`. Returns false if there is no such link.
    fn activate(&self, index: usize, ctx: &mut RenderContext<'_>) -> bool {
        let content = self.render(ctx);
        match content.links.get(index) {
            Some(link) => {
                ctx.navigator.navigate(link.target.clone());
                true
            }
            None => false,
        }
    }
}

/// Landing page listing every other registered site.
pub struct WelcomePage {
    pub shortcuts: Vec<Link>,
}

impl SiteRenderer for WelcomePage {
    fn render(&self, ctx: &RenderContext<'_>) -> PageContent {
        let greeting = match ctx.owner {
            Some(owner) => format!("Signed in as {}.", owner),
            None => "Browsing as guest.".to_string(),
        };
        PageContent {
            heading: "Welcome".to_string(),
            paragraphs: vec![
                greeting,
                "Type an address above or pick one of the sites below.".to_string(),
            ],
            links: self.shortcuts.clone(),
        }
    }
}

/// Sign-up page of a free mail provider.
pub struct MailProviderSite {
    pub brand: String,
    pub tagline: String,
    pub related: Vec<Link>,
}

impl SiteRenderer for MailProviderSite {
    fn render(&self, ctx: &RenderContext<'_>) -> PageContent {
        let mut links = vec![Link::new("Create account", ctx.domain)];
        links.extend(self.related.iter().cloned());
        PageContent {
            heading: self.brand.clone(),
            paragraphs: vec![
                self.tagline.clone(),
                format!("Addresses end in @{}.", ctx.domain),
            ],
            links,
        }
    }
}

/// A look-alike page used in phishing drills. Every link leads to `lure`.
pub struct LookalikeSite {
    pub imitates: String,
    pub lure: String,
}

impl SiteRenderer for LookalikeSite {
    fn render(&self, _ctx: &RenderContext<'_>) -> PageContent {
        PageContent {
            heading: format!("{} - Verify your account", self.imitates),
            paragraphs: vec![
                "Unusual sign-in activity was detected on your mailbox.".to_string(),
                "Confirm your password within 24 hours to avoid suspension.".to_string(),
            ],
            links: vec![
                Link::new("Verify now", &self.lure),
                Link::new("Cancel", &self.lure),
            ],
        }
    }
}

/// Generic page with fixed text and links.
pub struct StaticPage {
    pub heading: String,
    pub paragraphs: Vec<String>,
    pub links: Vec<Link>,
}

impl SiteRenderer for StaticPage {
    fn render(&self, _ctx: &RenderContext<'_>) -> PageContent {
        PageContent {
            heading: self.heading.clone(),
            paragraphs: self.paragraphs.clone(),
            links: self.links.clone(),
        }
    }
}
