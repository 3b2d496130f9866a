//! Persistence layer for the Linac QA backend.
//!
//! This crate contains:
//! - Connection pool management
//! - Database entities (row mappings)
//! - Repositories per aggregate, including the transactional QA session
//!   write and the full JSON export
//!
//! Migrations live under `src/migrations` and are applied by the binary on
//! startup.

pub mod db;
pub mod entities;
pub mod repositories;
