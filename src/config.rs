//! Environment-based configuration
//!
//! `RegistryConfig` carries deployment-level schema tweaks, `ComponentFactory`
//! creates the storage client selected by the environment.

use crate::client::{LocalStorageClient, StorageClient};
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Model holding trace segments
pub const SEGMENT_MODEL: &str = "segment";
/// Model holding log records
pub const LOG_MODEL: &str = "log";
/// Model holding alarm records
pub const ALARM_MODEL: &str = "alarm_record";

const DEFAULT_TRACES_TAGS: &str = "http.method,status_code,db.type,db.instance,mq.queue,mq.topic,mq.broker";
const DEFAULT_LOGS_TAGS: &str = "level";
const DEFAULT_ALARM_TAGS: &str = "level";

/// Schema compilation settings
#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
    /// Extra user-defined searchable tags per record model
    searchable_tags: HashMap<String, Vec<String>>,
}

impl RegistryConfig {
    /// Configuration without extra tags
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a comma-separated list of searchable tags to a model
    pub fn with_searchable_tags(mut self, model: impl Into<String>, tags: &str) -> Self {
        let parsed = parse_tag_list(tags);
        if !parsed.is_empty() {
            self.searchable_tags.insert(model.into(), parsed);
        }
        self
    }

    /// Extra searchable tags configured for a model
    pub fn searchable_tags(&self, model: &str) -> &[String] {
        self.searchable_tags
            .get(model)
            .map(|tags| tags.as_slice())
            .unwrap_or(&[])
    }

    /// Read searchable tag lists from the environment
    ///
    /// Environment variables:
    /// - SEARCHABLE_TRACES_TAGS: tags of the `segment` model
    /// - SEARCHABLE_LOGS_TAGS: tags of the `log` model
    /// - SEARCHABLE_ALARM_TAGS: tags of the `alarm_record` model
    ///
    /// An empty value disables the extra tags of that model.
    pub fn from_env() -> Self {
        let traces = std::env::var("SEARCHABLE_TRACES_TAGS")
            .unwrap_or_else(|_| DEFAULT_TRACES_TAGS.to_string());
        let logs =
            std::env::var("SEARCHABLE_LOGS_TAGS").unwrap_or_else(|_| DEFAULT_LOGS_TAGS.to_string());
        let alarms = std::env::var("SEARCHABLE_ALARM_TAGS")
            .unwrap_or_else(|_| DEFAULT_ALARM_TAGS.to_string());

        Self::new()
            .with_searchable_tags(SEGMENT_MODEL, &traces)
            .with_searchable_tags(LOG_MODEL, &logs)
            .with_searchable_tags(ALARM_MODEL, &alarms)
    }
}

/// Split a comma-separated tag list, dropping blank entries and duplicates
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

pub struct ComponentFactory;

impl ComponentFactory {
    /// Create the storage client from environment
    ///
    /// Environment variables:
    /// - STORAGE_CLIENT_BACKEND: "local" (default)
    pub fn create_storage_client() -> Result<Arc<dyn StorageClient>> {
        let backend =
            std::env::var("STORAGE_CLIENT_BACKEND").unwrap_or_else(|_| "local".to_string());
        Self::create_storage_client_for(&backend)
    }

    pub fn create_storage_client_for(backend: &str) -> Result<Arc<dyn StorageClient>> {
        match backend.trim().to_ascii_lowercase().as_str() {
            "local" => {
                info!("Using in-memory storage client (development mode)");
                Ok(Arc::new(LocalStorageClient::new()))
            }
            other => Err(Error::Config(format!(
                "Unknown STORAGE_CLIENT_BACKEND: {}. Use 'local'",
                other
            ))),
        }
    }
}
