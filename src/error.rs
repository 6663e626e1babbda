//! Error types for persona generation
//!
//! Validation failures are not errors: they are recovered locally by the
//! retry loop. Only unsupported input, exhausted retries in the flat variant
//! and I/O around the generators surface here.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// No statistical basis below the supported floor
    #[error("age {age} is below the supported minimum of {minimum}")]
    UnsupportedAge { age: u32, minimum: u32 },

    /// Flat generator could not produce a valid persona
    #[error("no valid persona after {attempts} attempts, last errors: {}", last_errors.join("; "))]
    GenerationExhausted {
        attempts: u32,
        last_errors: Vec<String>,
    },

    /// A weighted choice had nothing to choose from
    #[error("empty or zero-weight distribution for {what}")]
    EmptyDistribution { what: &'static str },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
