//! # Storage Layer
//!
//! Durable key-addressed storage over an embedded SQLite database, split into
//! two collections: `entries` (one row per logged event, indexed by
//! timestamp) and `settings` (JSON-valued singleton records).
//!
//! Nothing outside the domain layer should use the repositories directly.

pub mod connection;
pub mod entry_repository;
pub mod settings_repository;

pub use connection::DbConnection;
pub use entry_repository::EntryRepository;
pub use settings_repository::SettingsRepository;
