//! Domain models shared by the core services and the API layer.

pub mod account;
pub mod auth;
pub mod headshot;
