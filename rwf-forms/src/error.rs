//! Global error type.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Http(#[from] crate::http::Error),

    #[error("config error: {0}")]
    Config(#[from] crate::config::Error),
}
