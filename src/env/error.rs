use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while loading an env file into a [`VarStore`](super::VarStore).
///
/// Messages never include line contents, only line numbers, since env files
/// usually carry secrets.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("The .env file was not found at: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("unable to resolve env file {}: {source}", path.display())]
    PathResolution {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `line` is 1-based.
    #[error("failed to parse env file {} at line {line}", path.display())]
    Parse { path: PathBuf, line: usize },
}

pub type EnvResult<T> = Result<T, EnvError>;

impl EnvError {
    /// Whether configuration bootstrap cannot continue after this error.
    ///
    /// The library never exits on its own; callers such as the CLI decide
    /// to terminate when this returns true.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EnvError::PathResolution { .. })
    }
}
