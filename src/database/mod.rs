//! Browser state database layer.
//!
//! SQLite connection management, schema migrations, and the SQLite-backed
//! key-value store used by the persistence bridge.
//!
//! # Usage
//!
//! ```no_run
//! use aurora_browser::database::{Database, SqliteStore};
//! use aurora_browser::managers::persistence_bridge::KeyValueStore;
//!
//! let store = SqliteStore::new(Database::open("browser.db").expect("failed to open database"));
//! store.save("browser", Some("alice"), "{}").expect("write failed");
//! ```

pub mod connection;
pub mod kv_store;
pub mod migrations;

pub use connection::Database;
pub use kv_store::SqliteStore;
