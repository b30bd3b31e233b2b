//! Request handlers.

pub mod credits;
pub mod generate;
pub mod headshots;
pub mod health;
pub mod model_status;
pub mod styles;
pub mod subscription;
