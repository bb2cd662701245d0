use std::{io, path::PathBuf};

use pongevo_controller::network::NetworkError;
use pongevo_engine::ArenaConfigError;

use crate::episode::Interrupted;

/// Rejected training configuration, reported once at startup.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ConfigError {
    #[display("invalid arena: {_0}")]
    Arena(ArenaConfigError),
    #[display("invalid network: {_0}")]
    Network(NetworkError),
    #[display("invalid {field}: {reason}")]
    #[from(ignore)]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Failure to read or write a checkpoint or result file.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PersistenceError {
    #[display("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display("{} has format version {found}, expected {expected}", path.display())]
    FormatVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
    #[display("no checkpoint found in {}", dir.display())]
    NoCheckpoint { dir: PathBuf },
}

impl PersistenceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

/// Anything that stops a training run.
///
/// [`TrainingError::Interrupted`] is the user asking to stop and is not a
/// fault; the driver turns it into an interrupted run report.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From, derive_more::IsVariant)]
pub enum TrainingError {
    #[display("{_0}")]
    Interrupted(Interrupted),
    #[display("{_0}")]
    Config(ConfigError),
    #[display("{_0}")]
    Network(NetworkError),
    #[display("{_0}")]
    Persistence(PersistenceError),
}
