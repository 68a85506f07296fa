use std::path::PathBuf;

use thiserror::Error;

use crate::errno;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("model id is empty")]
    EmptyId,
    #[error("model not found: {0}")]
    NotFound(String),
    #[error("model path is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("generation failed: {0}")]
    Generation(String),
}

impl ModelError {
    /// Diagnostic code for the secondary error channel.
    pub fn errno(&self) -> i32 {
        match self {
            ModelError::Io(e) => errno::from_io(e),
            ModelError::EmptyId => errno::EMPTY_MODEL_ID,
            ModelError::NotFound(_) => errno::MODEL_NOT_FOUND,
            ModelError::NotADirectory(_) => errno::NOT_A_DIRECTORY,
            ModelError::Generation(_) => errno::UNSPECIFIED,
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
