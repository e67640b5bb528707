//! Model catalog loading

use super::Model;
use crate::{Error, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Ordered set of model definitions with unique names
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    models: Vec<Model>,
}

#[derive(Deserialize)]
struct CatalogDocument {
    models: Vec<Model>,
}

impl ModelCatalog {
    /// Build a catalog, rejecting duplicate model names
    pub fn new(models: Vec<Model>) -> Result<Self> {
        let mut seen = HashSet::new();
        for model in &models {
            if !seen.insert(model.name.as_str()) {
                return Err(Error::InvalidModel(format!(
                    "model {} is defined more than once",
                    model.name
                )));
            }
        }
        Ok(Self { models })
    }

    /// Parse a `{"models": [...]}` JSON document
    pub fn from_json(raw: &str) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_str(raw)?;
        Self::new(document.models)
    }

    /// Load a catalog from a JSON file
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_json(&raw)
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn get(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.name == name)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
