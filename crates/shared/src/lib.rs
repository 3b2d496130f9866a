//! Shared utilities for the Linac QA backend.
//!
//! This crate contains:
//! - Password hashing (Argon2id)
//! - Signed session tokens

pub mod password;
pub mod session;
