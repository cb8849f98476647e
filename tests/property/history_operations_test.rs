//! Property-based tests for the per-tab History Stack.
//!
//! These tests verify the cursor invariant: for any sequence of pushes and
//! cursor moves, the index is `None` exactly when the history is empty and
//! otherwise points at a valid entry, and a push always lands at the end.

use aurora_browser::managers::history_stack::HistoryStack;
use aurora_browser::types::history::HistoryEntry;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum HistoryOp {
    Push(String),
    GoTo(usize),
    Back,
    Forward,
}

fn arb_history_ops() -> impl Strategy<Value = Vec<HistoryOp>> {
    prop::collection::vec(
        prop_oneof![
            3 => "[a-z]{1,8}\\.(com|pro|win)".prop_map(HistoryOp::Push),
            1 => (0..12usize).prop_map(HistoryOp::GoTo),
            2 => Just(HistoryOp::Back),
            1 => Just(HistoryOp::Forward),
        ],
        1..60,
    )
}

// **Property: history cursor invariant**
//
// *For any* sequence of operations, `index` is `None` iff the stack is empty,
// and otherwise `index < len`. After a push the pushed URL is the last entry
// and the cursor sits on it.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn history_cursor_invariant(ops in arb_history_ops()) {
        let mut stack = HistoryStack::new();
        let mut model: Vec<String> = Vec::new();
        let mut cursor: Option<usize> = None;

        for op in &ops {
            match op {
                HistoryOp::Push(url) => {
                    let keep = cursor.map_or(0, |i| i + 1);
                    model.truncate(keep);
                    model.push(url.clone());
                    cursor = Some(model.len() - 1);
                    stack.push(HistoryEntry::new(url, url, None));
                    prop_assert_eq!(&stack.entries().last().unwrap().url, url);
                }
                HistoryOp::GoTo(i) => {
                    let moved = stack.go_to(*i);
                    prop_assert_eq!(moved, *i < model.len());
                    if moved {
                        cursor = Some(*i);
                    }
                }
                HistoryOp::Back => {
                    if let Some(i) = stack.back_from(stack.index()) {
                        stack.go_to(i);
                        cursor = Some(i);
                    }
                }
                HistoryOp::Forward => {
                    if let Some(i) = stack.forward_from(stack.index()) {
                        stack.go_to(i);
                        cursor = Some(i);
                    }
                }
            }

            prop_assert_eq!(stack.index(), cursor);
            prop_assert_eq!(stack.index().is_none(), stack.is_empty());
            if let Some(i) = stack.index() {
                prop_assert!(i < stack.len());
            }
            let urls: Vec<String> = stack.entries().iter().map(|e| e.url.clone()).collect();
            prop_assert_eq!(&urls, &model);
            prop_assert_eq!(stack.can_go_back(), cursor.is_some_and(|i| i > 0));
            prop_assert_eq!(stack.can_go_forward(), cursor.is_some_and(|i| i + 1 < model.len()));
        }
    }
}
