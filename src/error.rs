//! Error types
//!
//! None of these are fatal inside the controller: every caller logs them and
//! falls back to a static default (zero high score, default settings, mock
//! hardware). Only `main` propagates them, for terminal setup.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by persistence, settings and hardware setup
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed settings in {path:?}: {source}")]
    Settings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Hardware unavailable: {message}")]
    Hardware { message: String },

    #[error("Pulse executor failed to start: {0}")]
    Executor(#[source] std::io::Error),

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn hardware(message: impl Into<String>) -> Self {
        Self::Hardware {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
