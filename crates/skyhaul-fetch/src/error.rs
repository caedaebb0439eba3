//! Error types for skyhaul-fetch.

use std::io;

use thiserror::Error;

use crate::http::TransportError;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Transport(#[source] TransportError),

    #[error("transfer interrupted after {written} bytes: {source}")]
    Interrupted {
        written: u64,
        #[source]
        source: TransportError,
    },

    #[error("file I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, FetchError>;
