//! Tab Manager for the simulated browser.
//!
//! Owns the open tabs, the active-tab pointer, and every in-flight page load.
//! A navigation resolves its target, marks the tab `Loading`, and hands the
//! progress animation to a [`LoadingSimulator`] driven by a virtual-time
//! [`Scheduler`] with one pending task per tab. Only the most recent load of
//! a tab can commit: starting another load, or closing the tab, cancels the
//! pending task and drops the old load, and each firing is matched against
//! the load's current task handle before it is applied.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::{debug, info, warn};
use serde::Serialize;

use crate::managers::history_stack::HistoryStack;
use crate::managers::persistence_bridge::PersistenceBridge;
use crate::services::loading_simulator::{LoadingSimulator, ProgressSource, SystemRandomSource};
use crate::services::navigation_resolver::{NavigationResolver, Resolution};
use crate::services::scheduler::{Scheduler, TaskHandle};
use crate::services::sites::{Navigator, PageContent, RenderContext};
use crate::services::website_registry::WebsiteRegistry;
use crate::types::errors::NavigationError;
use crate::types::history::HistoryEntry;
use crate::types::session::PersistedBrowserState;
use crate::types::settings::{BrowserSettings, LoadingSettings, HOME_URL};
use crate::types::tab::{LoadState, Tab, TabId};
use crate::types::website::{SecurityBadge, WebsiteDescriptor};

/// Trait defining the tab management interface.
///
/// Operations on unknown tabs are no-ops and return `false`.
pub trait TabManagerTrait {
    fn open_tab(&mut self) -> TabId;
    fn close_tab(&mut self, tab_id: &TabId) -> bool;
    fn switch_active(&mut self, tab_id: &TabId) -> bool;
    fn navigate(&mut self, tab_id: &TabId, input: &str) -> bool;
    fn reload(&mut self, tab_id: &TabId) -> bool;
    fn go_back(&mut self, tab_id: &TabId) -> bool;
    fn go_forward(&mut self, tab_id: &TabId) -> bool;
    fn go_home(&mut self, tab_id: &TabId) -> bool;
    fn get_tab(&self, tab_id: &TabId) -> Option<&Tab>;
    fn get_all_tabs(&self) -> &[Tab];
    fn get_active_tab(&self) -> Option<&Tab>;
    fn tab_count(&self) -> usize;
}

/// Observable milestones of page loads, drained by the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BrowserEvent {
    Started { tab_id: TabId, url: String },
    Progress { tab_id: TabId, progress: f64 },
    Committed { tab_id: TabId, url: String, title: String },
    Cancelled { tab_id: TabId, url: String },
}

/// What the content area shows for the active tab.
#[derive(Debug, Clone, PartialEq)]
pub enum PageView {
    Site {
        descriptor: WebsiteDescriptor,
        content: PageContent,
    },
    /// The rendered URL has no site; the only way out is `recovery_url`.
    NotFound { url: String, recovery_url: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavigationKind {
    /// A fresh navigation, appended to history on commit.
    Push,
    /// Back/forward to an existing history index.
    Traverse(usize),
}

struct PendingLoad {
    navigation_id: u64,
    target: Resolution,
    kind: NavigationKind,
    simulator: LoadingSimulator,
    task: TaskHandle,
}

/// In-memory tab manager for the browser.
pub struct TabManager {
    tabs: Vec<Tab>,
    active_tab_id: Option<TabId>,
    resolver: NavigationResolver,
    settings: LoadingSettings,
    home_url: String,
    owner: Option<String>,
    scheduler: Scheduler<TabId>,
    loads: HashMap<TabId, PendingLoad>,
    progress_source: Box<dyn ProgressSource>,
    persistence: Option<PersistenceBridge>,
    bookmarks: Vec<String>,
    events: Vec<BrowserEvent>,
    next_navigation_id: u64,
}

impl TabManager {
    /// A browser with default settings and a single home tab.
    pub fn new(registry: Arc<WebsiteRegistry>) -> Self {
        Self::with_settings(registry, &BrowserSettings::default())
    }

    pub fn with_settings(registry: Arc<WebsiteRegistry>, settings: &BrowserSettings) -> Self {
        let loading = match settings.loading.validate() {
            Ok(()) => settings.loading,
            Err(e) => {
                warn!("invalid loading settings ({}), using defaults", e);
                LoadingSettings::default()
            }
        };
        let home_url = match settings.general.home_url.trim() {
            "" => HOME_URL.to_string(),
            url => url.to_string(),
        };

        let first = Tab::home(&home_url, Self::now_secs());
        Self {
            active_tab_id: Some(first.id.clone()),
            tabs: vec![first],
            resolver: NavigationResolver::new(registry),
            settings: loading,
            home_url,
            owner: settings.general.owner.clone(),
            scheduler: Scheduler::new(),
            loads: HashMap::new(),
            progress_source: Box::new(SystemRandomSource::new()),
            persistence: None,
            bookmarks: Vec::new(),
            events: Vec::new(),
            next_navigation_id: 0,
        }
    }

    /// Replaces the randomness behind the progress ramp.
    pub fn with_progress_source(mut self, source: impl ProgressSource + 'static) -> Self {
        self.progress_source = Box::new(source);
        self
    }

    /// Attaches a persistence bridge and restores the single starting tab
    /// from it. The bridge's owner, if any, becomes the session owner.
    pub fn with_persistence(mut self, bridge: PersistenceBridge) -> Self {
        let state = bridge.load_state(&self.home_url);
        if let Some(owner) = bridge.owner() {
            self.owner = Some(owner.to_string());
        }

        let tab = self.restored_tab(&state);
        for id in self.loads.keys().cloned().collect::<Vec<_>>() {
            self.scheduler.cancel(&id);
        }
        self.loads.clear();
        self.active_tab_id = Some(tab.id.clone());
        self.tabs = vec![tab];
        self.bookmarks = state.bookmarks;
        self.persistence = Some(bridge);
        self
    }

    fn now_secs() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn find_tab_index(&self, tab_id: &TabId) -> Option<usize> {
        self.tabs.iter().position(|t| &t.id == tab_id)
    }

    fn tab_mut(&mut self, tab_id: &TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| &t.id == tab_id)
    }

    fn restored_tab(&self, state: &PersistedBrowserState) -> Tab {
        let url = match state.url.trim() {
            "" => self.home_url.as_str(),
            url => url,
        };
        let index = state
            .history_index
            .filter(|&i| state.history.get(i).is_some_and(|e| e.url == url))
            .or_else(|| state.history.iter().rposition(|e| e.url == url));
        let history = HistoryStack::from_entries(state.history.clone(), index);

        // With history present the cursor entry is authoritative.
        let rendered_url = history
            .current()
            .map(|e| e.url.clone())
            .unwrap_or_else(|| url.to_string());
        let title = self
            .resolver
            .registry()
            .lookup(&rendered_url)
            .map(|d| d.name.clone())
            .unwrap_or_else(|| rendered_url.clone());

        let mut tab = Tab::home(&rendered_url, Self::now_secs());
        tab.title = title;
        tab.history = history;
        tab
    }

    pub fn home_url(&self) -> &str {
        &self.home_url
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn loading_settings(&self) -> &LoadingSettings {
        &self.settings
    }

    /// Replaces the loading shape for loads started from now on. Loads
    /// already in flight keep the settings they started with.
    pub fn set_loading_settings(&mut self, settings: LoadingSettings) -> Result<(), String> {
        if let Err(e) = settings.validate() {
            warn!("rejected loading settings: {}", e);
            return Err(e);
        }
        self.settings = settings;
        info!("loading settings updated");
        Ok(())
    }

    pub fn registry(&self) -> &WebsiteRegistry {
        self.resolver.registry()
    }

    pub fn active_tab_id(&self) -> Option<&TabId> {
        self.active_tab_id.as_ref()
    }

    pub fn is_loading(&self, tab_id: &TabId) -> bool {
        self.loads.contains_key(tab_id)
    }

    pub fn can_go_back(&self, tab_id: &TabId) -> bool {
        self.get_tab(tab_id).is_some_and(|t| t.history.can_go_back())
    }

    pub fn can_go_forward(&self, tab_id: &TabId) -> bool {
        self.get_tab(tab_id).is_some_and(|t| t.history.can_go_forward())
    }

    /// Navigates the active tab; this is what the address bar and site
    /// content call.
    pub fn navigate_active(&mut self, input: &str) -> bool {
        match self.active_tab_id.clone() {
            Some(id) => self.navigate(&id, input),
            None => false,
        }
    }

    // --- loading lifecycle ---

    fn start_load(&mut self, tab_id: &TabId, target: Resolution, kind: NavigationKind) {
        self.cancel_load(tab_id);

        let (simulator, first_delay) = LoadingSimulator::start(self.settings);
        let task = self.scheduler.schedule(tab_id.clone(), first_delay);
        self.next_navigation_id += 1;

        let progress = simulator.progress();
        if let Some(tab) = self.tab_mut(tab_id) {
            tab.requested_url = target.final_url.clone();
            tab.load_state = LoadState::Loading;
            tab.progress = progress;
        }

        info!(
            "tab {} navigation #{} -> {}",
            tab_id, self.next_navigation_id, target.final_url
        );
        self.events.push(BrowserEvent::Started {
            tab_id: tab_id.clone(),
            url: target.final_url.clone(),
        });
        self.loads.insert(
            tab_id.clone(),
            PendingLoad {
                navigation_id: self.next_navigation_id,
                target,
                kind,
                simulator,
                task,
            },
        );
    }

    /// Drops the in-flight load of a tab, if any, together with its timer.
    fn cancel_load(&mut self, tab_id: &TabId) {
        self.scheduler.cancel(tab_id);
        if let Some(load) = self.loads.remove(tab_id) {
            debug!(
                "tab {} navigation #{} to {} cancelled",
                tab_id, load.navigation_id, load.target.final_url
            );
            self.events.push(BrowserEvent::Cancelled {
                tab_id: tab_id.clone(),
                url: load.target.final_url,
            });
        }
    }

    fn traverse(&mut self, tab_id: &TabId, forward: bool) -> bool {
        let Some(tab) = self.get_tab(tab_id) else {
            return false;
        };
        // Consecutive back/forward presses step from the pending target.
        let base = match self.loads.get(tab_id).map(|l| l.kind) {
            Some(NavigationKind::Traverse(index)) => Some(index),
            _ => tab.history.index(),
        };
        let target_index = if forward {
            tab.history.forward_from(base)
        } else {
            tab.history.back_from(base)
        };
        let Some((target_index, url)) =
            target_index.and_then(|i| tab.history.get(i).map(|e| (i, e.url.clone())))
        else {
            return false;
        };

        let target = self.resolver.resolve(&url);
        self.start_load(tab_id, target, NavigationKind::Traverse(target_index));
        true
    }

    /// Advances virtual time by `elapsed`, firing every timer that falls due.
    pub fn advance(&mut self, elapsed: Duration) {
        let until = self.scheduler.now() + elapsed;
        while let Some((tab_id, handle)) = self.scheduler.pop_due(until) {
            self.fire(&tab_id, handle);
        }
        self.scheduler.advance_clock(until);
    }

    /// Runs every pending load to completion.
    pub fn run_until_idle(&mut self) {
        while let Some(wait) = self.time_until_next_timer() {
            self.advance(wait);
        }
    }

    /// Virtual time until the earliest pending timer.
    pub fn time_until_next_timer(&self) -> Option<Duration> {
        self.scheduler
            .next_deadline()
            .map(|due| due.saturating_sub(self.scheduler.now()))
    }

    /// Virtual time elapsed since the manager was created.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    fn fire(&mut self, tab_id: &TabId, handle: TaskHandle) {
        let step = match self.loads.get_mut(tab_id) {
            Some(load) if load.task == handle => {
                load.simulator.advance(self.progress_source.as_mut())
            }
            _ => {
                debug!("discarding stale timer for tab {}", tab_id);
                return;
            }
        };

        match step.next_delay {
            Some(delay) => {
                let task = self.scheduler.schedule(tab_id.clone(), delay);
                if let Some(load) = self.loads.get_mut(tab_id) {
                    load.task = task;
                }
                if let Some(tab) = self.tab_mut(tab_id) {
                    tab.progress = step.progress;
                }
                self.events.push(BrowserEvent::Progress {
                    tab_id: tab_id.clone(),
                    progress: step.progress,
                });
            }
            None => {
                if let Some(load) = self.loads.remove(tab_id) {
                    self.commit(tab_id, load);
                }
            }
        }
    }

    fn commit(&mut self, tab_id: &TabId, load: PendingLoad) {
        let title = load.target.title().to_string();
        let Some(tab) = self.tab_mut(tab_id) else {
            return;
        };

        // A traversal lands on its own entry and keeps the stored URL, even
        // when that URL is not in canonical form.
        let traversed = match load.kind {
            NavigationKind::Traverse(index) if index < tab.history.len() => {
                tab.history.go_to(index);
                tab.history.current().map(|e| e.url.clone())
            }
            _ => None,
        };
        let url = match traversed {
            Some(url) => url,
            None => {
                let url = load.target.final_url.clone();
                tab.history
                    .push(HistoryEntry::new(&url, &title, load.target.favicon()));
                url
            }
        };
        tab.rendered_url = url.clone();
        tab.title = title.clone();
        tab.load_state = LoadState::Idle;
        tab.progress = 0.0;

        info!("tab {} navigation #{} committed {}", tab_id, load.navigation_id, url);
        self.events.push(BrowserEvent::Committed {
            tab_id: tab_id.clone(),
            url,
            title,
        });
        self.persist_active();
    }

    /// Writes the active tab's state through the persistence bridge.
    fn persist_active(&self) {
        let (Some(bridge), Some(tab)) = (self.persistence.as_ref(), self.get_active_tab()) else {
            return;
        };
        let state = PersistedBrowserState {
            url: tab.rendered_url.clone(),
            bookmarks: self.bookmarks.clone(),
            history: tab.history.entries().to_vec(),
            history_index: tab.history.index(),
        };
        if let Err(e) = bridge.save_state(&state) {
            warn!("failed to persist browser state: {}", e);
        }
    }

    /// Takes every event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<BrowserEvent> {
        std::mem::take(&mut self.events)
    }

    // --- page content ---

    fn active_url(&self) -> String {
        self.get_active_tab()
            .map(|t| t.rendered_url.clone())
            .unwrap_or_else(|| self.home_url.clone())
    }

    /// Renders the active tab's committed URL. Rendering never navigates;
    /// site content moves the browser only through [`activate_link`](Self::activate_link).
    pub fn render_active(&self) -> PageView {
        let url = self.active_url();
        let mut navigator = Navigator::new();
        match self.resolver.require(&url) {
            Ok(descriptor) => {
                let ctx = RenderContext {
                    domain: &descriptor.domain,
                    url: &url,
                    owner: self.owner.as_deref(),
                    navigator: &mut navigator,
                };
                let content = descriptor.renderer.render(&ctx);
                PageView::Site {
                    descriptor: descriptor.clone(),
                    content,
                }
            }
            Err(NavigationError::UnresolvedUrl(url)) => PageView::NotFound {
                url,
                recovery_url: self.home_url.clone(),
            },
        }
    }

    /// Clicks link `index` on the active page. On the not-found page, link 0
    /// is the "return home" action.
    pub fn activate_link(&mut self, index: usize) -> bool {
        let url = self.active_url();
        let mut navigator = Navigator::new();
        let followed = match self.resolver.require(&url) {
            Ok(descriptor) => {
                let mut ctx = RenderContext {
                    domain: &descriptor.domain,
                    url: &url,
                    owner: self.owner.as_deref(),
                    navigator: &mut navigator,
                };
                descriptor.renderer.activate(index, &mut ctx)
            }
            Err(_) if index == 0 => {
                navigator.navigate(self.home_url.clone());
                true
            }
            Err(_) => false,
        };
        self.apply_site_navigations(navigator.take_requests());
        followed
    }

    fn apply_site_navigations(&mut self, requests: Vec<String>) {
        for url in requests {
            self.navigate_active(&url);
        }
    }

    /// Address-bar badge for the active tab's committed site.
    pub fn security_badge(&self) -> SecurityBadge {
        let url = self.active_url();
        SecurityBadge::for_site(self.resolver.registry().lookup(&url))
    }

    // --- bookmarks ---

    /// Adds or removes a bookmark. Returns whether `url` is now bookmarked.
    pub fn toggle_bookmark(&mut self, url: &str) -> bool {
        let url = url.trim();
        let bookmarked = match self.bookmarks.iter().position(|b| b == url) {
            Some(pos) => {
                self.bookmarks.remove(pos);
                false
            }
            None if url.is_empty() => return false,
            None => {
                self.bookmarks.push(url.to_string());
                true
            }
        };
        self.persist_active();
        bookmarked
    }

    pub fn is_bookmarked(&self, url: &str) -> bool {
        self.bookmarks.iter().any(|b| b == url.trim())
    }

    pub fn bookmarks(&self) -> &[String] {
        &self.bookmarks
    }
}

impl TabManagerTrait for TabManager {
    /// Opens a home tab at the end of the strip and activates it.
    fn open_tab(&mut self) -> TabId {
        let tab = Tab::home(&self.home_url, Self::now_secs());
        let id = tab.id.clone();
        self.tabs.push(tab);
        self.active_tab_id = Some(id.clone());
        debug!("opened tab {}", id);
        id
    }

    /// Closes a tab. Closing the only tab sends it home instead; closing the
    /// active tab activates the last remaining one.
    fn close_tab(&mut self, tab_id: &TabId) -> bool {
        let Some(idx) = self.find_tab_index(tab_id) else {
            return false;
        };
        if self.tabs.len() == 1 {
            return self.go_home(tab_id);
        }

        self.cancel_load(tab_id);
        self.tabs.remove(idx);
        debug!("closed tab {}", tab_id);

        if self.active_tab_id.as_ref() == Some(tab_id) {
            self.active_tab_id = self.tabs.last().map(|t| t.id.clone());
            self.persist_active();
        }
        true
    }

    fn switch_active(&mut self, tab_id: &TabId) -> bool {
        if self.find_tab_index(tab_id).is_none() {
            return false;
        }
        if self.active_tab_id.as_ref() != Some(tab_id) {
            self.active_tab_id = Some(tab_id.clone());
            self.persist_active();
        }
        true
    }

    /// Starts loading `input` in the tab. Blank input is ignored.
    fn navigate(&mut self, tab_id: &TabId, input: &str) -> bool {
        let input = input.trim();
        if input.is_empty() || self.find_tab_index(tab_id).is_none() {
            return false;
        }
        let target = self.resolver.resolve(input);
        self.start_load(tab_id, target, NavigationKind::Push);
        true
    }

    fn reload(&mut self, tab_id: &TabId) -> bool {
        let Some(url) = self.get_tab(tab_id).map(|t| t.rendered_url.clone()) else {
            return false;
        };
        self.navigate(tab_id, &url)
    }

    /// Steps back one history entry, replaying the full load animation.
    fn go_back(&mut self, tab_id: &TabId) -> bool {
        self.traverse(tab_id, false)
    }

    fn go_forward(&mut self, tab_id: &TabId) -> bool {
        self.traverse(tab_id, true)
    }

    fn go_home(&mut self, tab_id: &TabId) -> bool {
        let home = self.home_url.clone();
        self.navigate(tab_id, &home)
    }

    fn get_tab(&self, tab_id: &TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| &t.id == tab_id)
    }

    fn get_all_tabs(&self) -> &[Tab] {
        &self.tabs
    }

    fn get_active_tab(&self) -> Option<&Tab> {
        self.active_tab_id
            .as_ref()
            .and_then(|id| self.tabs.iter().find(|t| &t.id == id))
    }

    fn tab_count(&self) -> usize {
        self.tabs.len()
    }
}
