//! # headshot_core
//!
//! Core domain logic for Headshot: tier resolution, the monthly credit
//! ledger, the image-generation orchestrator with its fallback supplier, and
//! the persistence gateway for saved headshots.

pub mod auth;
pub mod credits;
pub mod generation;
pub mod headshots;
pub mod migrate;
pub mod models;
pub mod storage;
pub mod store;
pub mod styles;
pub mod tier;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
