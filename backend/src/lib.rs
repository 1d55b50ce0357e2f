//! Core persistence and state-reconciliation layer for the water tracker.
//!
//! The layering runs leaf to root:
//!
//! - [`storage`] - the embedded SQLite store and its repositories
//! - [`domain`] - validation, the error taxonomy and the [`domain::WaterStorage`]
//!   adapter that is the only component allowed to touch storage
//! - [`tracker`] - the in-memory projection consumed by the UI, with
//!   optimistic updates and rollback/reload on failure
//!
//! Presentation concerns (dialogs, progress ring, notifications) live outside
//! this crate and consume the adapter and tracker APIs.

pub mod domain;
pub mod storage;
pub mod tracker;
