use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    UnknownTier(#[from] headshot_core::tier::UnknownTier),

    #[error("Auth: {}", .0)]
    Auth(#[from] headshot_core::auth::AuthError),

    #[error("FlexiLogger::{:?}: {}", .0, .0)]
    FlexiLogger(#[from] flexi_logger::FlexiLoggerError),
}
