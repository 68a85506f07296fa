use std::fmt;

use crate::error::{ModelError, Result};

/// Identifier naming the model to activate.
///
/// Directory-style ids are normalized to carry a single trailing `/`, so
/// `models/gemma` and `models/gemma/` name the same model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(raw: &str) -> Result<ModelId> {
        // Whitespace-only ids are empty; otherwise the id is kept as given.
        if raw.trim().is_empty() {
            return Err(ModelError::EmptyId);
        }
        let normalized = if raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{raw}/")
        };
        Ok(ModelId(normalized))
    }

    /// The normalized id, including the trailing `/`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id without its trailing separator, for lookups by name.
    pub fn name(&self) -> &str {
        let name = self.0.trim_end_matches('/');
        if name.is_empty() {
            "/"
        } else {
            name
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
