//! Error types shared across the crate

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::DocumentError;
use crate::services::DialogError;

/// Errors that escape the environment manager.
///
/// Toolchain probes never produce these; an invalid path is reported through
/// [`crate::probe::ProbeOutcome`] instead.
#[derive(Error, Debug)]
pub enum EnvError {
    #[error("filesystem error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("dialog failed: {0}")]
    Dialog(#[from] DialogError),

    #[error("invalid settings document: {0}")]
    Document(#[from] DocumentError),

    #[error("could not determine the per-user application data directory")]
    NoDataDirectory,
}

impl EnvError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        EnvError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type EnvResult<T> = Result<T, EnvError>;
