pub mod errno;
pub mod error;
pub mod id;
pub mod loader;
pub mod model;
pub mod models;

pub use error::{ModelError, Result};
pub use id::ModelId;
pub use loader::{DirectoryLoader, ModelLoader, StaticLoader};
pub use model::{Fragments, TextModel};
pub use models::{EchoModel, ScriptedModel};
