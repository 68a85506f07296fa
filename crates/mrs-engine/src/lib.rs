pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
mod reentrancy;
pub mod sink;

pub use config::{ConfigError, EngineConfig, GenerateParams};
pub use engine::{Completion, Engine, FinishReason, GenerateResult, ModelHandle};
pub use error::{ArgumentError, BridgeError, Status};
pub use logging::{LogConfig, LogFormat};
pub use reentrancy::{in_generation, GenerationGuard};
pub use sink::{Flow, TokenSink};

pub use mrs_model::errno;
