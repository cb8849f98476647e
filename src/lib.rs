//! Aurora Browser: a simulated web browser with a fixed registry of sites,
//! fake page-load progress, tabs with per-tab history, and persisted state.
//!
//! This library crate exposes all modules for use by the binaries and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
