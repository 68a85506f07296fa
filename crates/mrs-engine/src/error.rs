use mrs_model::{errno, ModelError};
use thiserror::Error;

use crate::config::ConfigError;

/// Status codes shared by the Rust API and the C boundary.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok = 0,
    InvalidArgument = 1,
    NotInitialized = 2,
    InitFailed = 3,
    ModelLoad = 4,
    ModelNotLoaded = 5,
    Generate = 6,
    Reentrant = 7,
    Internal = 8,
}

impl Status {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }

    /// Status for a finished call: `Ok` on success, the error's status otherwise.
    pub fn of<T>(result: &Result<T, BridgeError>) -> Status {
        match result {
            Ok(_) => Status::Ok,
            Err(e) => e.status(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ArgumentError {
    #[error("{0} is null")]
    Null(&'static str),
    #[error("{name} is not valid UTF-8: {source}")]
    Utf8 {
        name: &'static str,
        #[source]
        source: std::str::Utf8Error,
    },
}

/// Every failure the bridge can report, collapsed into one type.
///
/// [`BridgeError::status`] and [`BridgeError::errno`] split it back into the
/// primary and diagnostic codes used across the C boundary.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] ArgumentError),
    #[error("engine not initialized")]
    NotInitialized,
    #[error("engine initialization failed: {0}")]
    Init(#[from] ConfigError),
    #[error("failed to load model '{model_id}': {source}")]
    ModelLoad {
        model_id: String,
        #[source]
        source: ModelError,
    },
    #[error("no model loaded")]
    ModelNotLoaded,
    #[error("generation failed after {delivered} fragments: {source}")]
    Generate {
        delivered: usize,
        #[source]
        source: ModelError,
    },
    #[error("generation is already running on this thread")]
    Reentrant,
    /// A panic caught at a boundary, with its message.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BridgeError {
    pub fn status(&self) -> Status {
        match self {
            BridgeError::InvalidArgument(_) => Status::InvalidArgument,
            BridgeError::NotInitialized => Status::NotInitialized,
            BridgeError::Init(_) => Status::InitFailed,
            BridgeError::ModelLoad {
                source: ModelError::EmptyId,
                ..
            } => Status::InvalidArgument,
            BridgeError::ModelLoad { .. } => Status::ModelLoad,
            BridgeError::ModelNotLoaded => Status::ModelNotLoaded,
            BridgeError::Generate { .. } => Status::Generate,
            BridgeError::Reentrant => Status::Reentrant,
            BridgeError::Internal(_) => Status::Internal,
        }
    }

    /// Finer-grained diagnostic code, see [`mrs_model::errno`].
    pub fn errno(&self) -> i32 {
        match self {
            BridgeError::InvalidArgument(ArgumentError::Null(_)) => errno::NULL_ARGUMENT,
            BridgeError::InvalidArgument(ArgumentError::Utf8 { .. }) => errno::INVALID_UTF8,
            BridgeError::NotInitialized => errno::NOT_INITIALIZED,
            BridgeError::Init(_) => errno::INIT_FAILED,
            BridgeError::ModelLoad { source, .. } | BridgeError::Generate { source, .. } => {
                source.errno()
            }
            BridgeError::ModelNotLoaded | BridgeError::Reentrant | BridgeError::Internal(_) => {
                errno::UNSPECIFIED
            }
        }
    }
}
