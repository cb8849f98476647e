//! Property-based tests for Tab Manager operations.
//!
//! These tests verify the tab strip invariants: there is always at least one
//! tab and exactly one active tab, a tab's history cursor always points at
//! the page it shows, and when several navigations race in one tab only the
//! last one ever commits.

use std::time::Duration;

use aurora_browser::managers::tab_manager::{BrowserEvent, TabManager, TabManagerTrait};
use aurora_browser::services::loading_simulator::SequenceSource;
use aurora_browser::services::website_registry::WebsiteRegistry;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum TabOp {
    Open,
    Close(usize),
    Switch(usize),
    Navigate(usize, usize),
    Advance(u64),
}

const URLS: [&str; 5] = [
    "trustmail.com",
    "promail.pro",
    "trustmai1.com",
    "free-prizes.win",
    "nowhere.example",
];

fn arb_tab_ops() -> impl Strategy<Value = Vec<TabOp>> {
    prop::collection::vec(
        prop_oneof![
            2 => Just(TabOp::Open),
            2 => (0..8usize).prop_map(TabOp::Close),
            1 => (0..8usize).prop_map(TabOp::Switch),
            3 => (0..8usize, 0..URLS.len()).prop_map(|(t, u)| TabOp::Navigate(t, u)),
            2 => (0..1500u64).prop_map(TabOp::Advance),
        ],
        1..50,
    )
}

#[derive(Debug, Clone)]
enum HistoryOp {
    Navigate(usize),
    Back,
    Forward,
    Reload,
    Advance(u64),
}

fn arb_history_ops() -> impl Strategy<Value = Vec<HistoryOp>> {
    prop::collection::vec(
        prop_oneof![
            3 => (0..URLS.len()).prop_map(HistoryOp::Navigate),
            2 => Just(HistoryOp::Back),
            2 => Just(HistoryOp::Forward),
            1 => Just(HistoryOp::Reload),
            3 => (0..1500u64).prop_map(HistoryOp::Advance),
        ],
        1..60,
    )
}

fn manager(draws: Vec<f64>) -> TabManager {
    TabManager::new(WebsiteRegistry::builtin()).with_progress_source(SequenceSource::new(draws))
}

// **Property: tab strip invariant**
//
// *For any* sequence of opens, closes, switches, navigations and clock
// advances, `tab_count() >= 1`, the active tab exists, and every idle tab
// has zero progress.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn tab_strip_invariant(ops in arb_tab_ops()) {
        let mut mgr = manager(vec![0.1, 0.9, 0.5]);
        let mut expected_count = 1usize;

        for op in &ops {
            let ids: Vec<_> = mgr.get_all_tabs().iter().map(|t| t.id.clone()).collect();
            match op {
                TabOp::Open => {
                    mgr.open_tab();
                    expected_count += 1;
                }
                TabOp::Close(i) => {
                    prop_assert!(mgr.close_tab(&ids[i % ids.len()]));
                    if ids.len() > 1 {
                        expected_count -= 1;
                    }
                }
                TabOp::Switch(i) => {
                    prop_assert!(mgr.switch_active(&ids[i % ids.len()]));
                }
                TabOp::Navigate(i, u) => {
                    prop_assert!(mgr.navigate(&ids[i % ids.len()], URLS[*u]));
                }
                TabOp::Advance(ms) => mgr.advance(Duration::from_millis(*ms)),
            }

            prop_assert_eq!(mgr.tab_count(), expected_count);
            prop_assert!(mgr.tab_count() >= 1);
            prop_assert!(mgr.get_active_tab().is_some());
            for tab in mgr.get_all_tabs() {
                prop_assert_eq!(tab.is_loading(), mgr.is_loading(&tab.id));
                if !tab.is_loading() {
                    prop_assert_eq!(tab.progress, 0.0);
                }
            }
        }
    }
}

// **Property: last navigation wins**
//
// *For any* burst of navigations in one tab separated by short delays, the
// tab ends up on the last requested URL and exactly one navigation commits.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn last_navigation_wins(
        burst in prop::collection::vec((0..URLS.len(), 0..1000u64), 1..8),
        draws in prop::collection::vec(0.0..1.0f64, 1..6),
    ) {
        let mut mgr = manager(draws);
        let id = mgr.active_tab_id().cloned().unwrap();

        for (u, _) in &burst {
            mgr.navigate(&id, URLS[*u]);
        }
        mgr.drain_events();
        let last = URLS[burst.last().unwrap().0];

        // Re-run the burst with gaps shorter than any full load.
        for (u, gap) in &burst {
            mgr.navigate(&id, URLS[*u]);
            mgr.advance(Duration::from_millis(*gap % 400));
        }
        mgr.run_until_idle();

        let commits: Vec<String> = mgr
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                BrowserEvent::Committed { url, .. } => Some(url),
                _ => None,
            })
            .collect();
        prop_assert_eq!(commits, vec![last.to_string()]);
        prop_assert_eq!(&mgr.get_tab(&id).unwrap().rendered_url, last);
    }
}

// **Property: history cursor matches the rendered page**
//
// *For any* sequence of navigations, back/forward presses, reloads and clock
// advances in one tab, the history position stays in `[-1, len - 1]` and,
// whenever it points at an entry, that entry's URL is the rendered URL.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn history_cursor_matches_rendered_url(
        ops in arb_history_ops(),
        draws in prop::collection::vec(0.0..1.0f64, 1..6),
    ) {
        let mut mgr = manager(draws);
        let id = mgr.active_tab_id().cloned().unwrap();

        for op in &ops {
            match op {
                HistoryOp::Navigate(u) => {
                    prop_assert!(mgr.navigate(&id, URLS[*u]));
                }
                HistoryOp::Back => {
                    mgr.go_back(&id);
                }
                HistoryOp::Forward => {
                    mgr.go_forward(&id);
                }
                HistoryOp::Reload => {
                    prop_assert!(mgr.reload(&id));
                }
                HistoryOp::Advance(ms) => mgr.advance(Duration::from_millis(*ms)),
            }

            let tab = mgr.get_tab(&id).unwrap();
            let len = tab.history.len() as i64;
            let position = tab.history.position();
            prop_assert!((-1..len).contains(&position));
            match tab.history.index() {
                Some(i) => prop_assert_eq!(&tab.rendered_url, &tab.history.get(i).unwrap().url),
                None => prop_assert!(tab.history.is_empty()),
            }
        }
    }
}
