//! # Domain Layer
//!
//! Validation rules, the error taxonomy and the storage adapter. Every write
//! path validates before touching storage; every operation returns a
//! structured [`WaterError`] instead of panicking or leaking raw storage
//! failures.

pub mod errors;
pub mod validation;
pub mod water_service;

pub use errors::{ValidationError, WaterError};
pub use water_service::{WaterService, WaterStorage};
