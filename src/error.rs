//! Error types for boundary loading and policy construction.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised at the edges of the pipeline.
///
/// The geometry core itself is total; only acquisition (I/O, parsing) and
/// construction of layers and policies can fail.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize collection: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("unknown layer '{0}' (expected regions, provinces or communes)")]
    UnknownLayer(String),

    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
