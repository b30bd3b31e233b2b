//! Request-scoped services shared by handlers.

pub mod context;
pub mod cookies;
