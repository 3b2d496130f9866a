//! Domain layer for the Linac QA backend.
//!
//! This crate contains:
//! - The compiled SASQART checklist registry
//! - Domain models (units, QA sessions, output readings, users, audit trail)
//! - Pure scheduling and deviation rules
//! - The domain error taxonomy

pub mod checklist;
pub mod error;
pub mod models;

pub use error::QaError;
