// Aurora Browser state managers
// Managers handle stateful operations: tabs, per-tab history, persisted browser state.

pub mod history_stack;
pub mod persistence_bridge;
pub mod tab_manager;
