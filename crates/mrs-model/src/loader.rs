use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::error::{ModelError, Result};
use crate::id::ModelId;
use crate::model::TextModel;
use crate::models::EchoModel;

/// Resolves a [`ModelId`] into a ready-to-run model.
pub trait ModelLoader: Send + Sync {
    fn load(&self, id: &ModelId) -> Result<Arc<dyn TextModel>>;
}

/// Treats the id as a model directory on disk.
///
/// The directory must exist and be listable. The bridge does not read any
/// weight format, so a validated directory is served by an [`EchoModel`].
#[derive(Debug, Default, Clone)]
pub struct DirectoryLoader;

impl DirectoryLoader {
    pub fn new() -> Self {
        Self
    }
}

impl ModelLoader for DirectoryLoader {
    fn load(&self, id: &ModelId) -> Result<Arc<dyn TextModel>> {
        let path = Path::new(id.name());
        let meta = match fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ModelError::NotFound(id.name().to_string()));
            }
            Err(e) => return Err(ModelError::Io(e)),
        };
        if !meta.is_dir() {
            return Err(ModelError::NotADirectory(path.to_path_buf()));
        }
        // Surfaces permission problems before the model is marked active.
        let entries = fs::read_dir(path)?.count();
        debug!(model = %id, entries, "model directory validated");

        Ok(Arc::new(EchoModel::new(id.name())))
    }
}

/// In-process registry of named models.
#[derive(Default, Clone)]
pub struct StaticLoader {
    models: HashMap<String, Arc<dyn TextModel>>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `model` under `name`. Returns self for builder-style usage.
    pub fn with_model(mut self, name: impl Into<String>, model: impl TextModel + 'static) -> Self {
        self.insert(name, Arc::new(model));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, model: Arc<dyn TextModel>) {
        let name = name.into();
        let key = name.trim_end_matches('/').to_string();
        self.models.insert(key, model);
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl ModelLoader for StaticLoader {
    fn load(&self, id: &ModelId) -> Result<Arc<dyn TextModel>> {
        self.models
            .get(id.name())
            .cloned()
            .ok_or_else(|| ModelError::NotFound(id.name().to_string()))
    }
}
