//! Errors raised at the edges of the core: filter arguments and configuration.
//!
//! The normalizer itself never fails; see [`crate::normalizer`].

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown level filter {0:?} (expected ALL, ERROR, WARN, INFO or DEBUG)")]
    UnknownLevel(String),

    #[error("unsupported relative range {0:?} (expected one of 5m, 15m, 30m, 1h, 6h, 24h)")]
    UnknownRange(String),

    #[error("invalid time bound {0:?}")]
    InvalidTime(String),

    #[error("cannot write default config to {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
