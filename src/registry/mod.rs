//! Process-wide registry of compiled schemas
//!
//! Built once at startup from the model definitions and shared by `Arc`
//! with every query builder. Nothing is persisted: the registry is rebuilt
//! on every process start.
//!
//! Readers never wait for writers. Each entry is an immutable
//! `Arc<CompiledSchema>` that is swapped in with a single map insert, so a
//! reader sees either the previous schema or the new one. Writers for the
//! same model name are serialized by a per-name async mutex, which also
//! covers the remote round-trips of [`MetadataRegistry::bootstrap`]. Holding
//! it across remote IO is deliberate: only a concurrent writer of the same
//! name waits on the engine, readers and other names do not.

mod remote;

pub use remote::{GROUP_SHARD_NUM, GROUP_TTL, MEASURE_GROUP_BUCKET_NUM};

use crate::client::StorageClient;
use crate::compiler::SchemaCompiler;
use crate::config::RegistryConfig;
use crate::model::Model;
use crate::schema::{CompiledSchema, SchemaDefinition};
use crate::Result;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Name to compiled schema registry
#[derive(Debug, Default)]
pub struct MetadataRegistry {
    compiler: SchemaCompiler,
    /// Committed schemas by model name
    schemas: DashMap<String, Arc<CompiledSchema>>,
    /// Per-name writer locks. Entries are never removed, the map is bounded
    /// by the number of distinct model names.
    writers: DashMap<String, Arc<Mutex<()>>>,
}

impl MetadataRegistry {
    pub fn new(compiler: SchemaCompiler) -> Self {
        Self {
            compiler,
            schemas: DashMap::new(),
            writers: DashMap::new(),
        }
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self::new(SchemaCompiler::new(config))
    }

    /// Compile a model and store it under the model name
    ///
    /// Replaces any schema previously registered under that name. On error
    /// the registry is left untouched.
    pub async fn register(&self, model: &Model) -> Result<SchemaDefinition> {
        let writer = self.writer(&model.name);
        let _guard = writer.lock().await;

        let compiled = self.compiler.compile(model)?;
        self.commit(&model.name, compiled.schema);
        Ok(compiled.definition)
    }

    /// Compiled schema of a model, `None` while the model is not registered
    pub fn lookup(&self, name: &str) -> Option<Arc<CompiledSchema>> {
        self.schemas.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Compile a model, make sure its group and schema exist on the storage
    /// engine, then commit it to the registry
    ///
    /// The registry is only updated once every remote call succeeded. An
    /// existing remote schema is left as is.
    pub async fn bootstrap(
        &self,
        model: &Model,
        client: &dyn StorageClient,
    ) -> Result<SchemaDefinition> {
        let writer = self.writer(&model.name);
        let _guard = writer.lock().await;

        let compiled = self.compiler.compile(model)?;
        let metadata = compiled.schema.metadata().clone();

        metadata.get_or_create_group(client).await?;
        match metadata.find_remote_schema(client).await? {
            Some(remote) if remote == compiled.definition => {
                debug!("Schema {}/{} is up to date", metadata.group, metadata.name);
            }
            Some(_) => {
                warn!(
                    "Remote {} {}/{} differs from the local model, keeping the remote definition",
                    metadata.kind.as_str(),
                    metadata.group,
                    metadata.name
                );
            }
            None => {
                compiled.definition.define(client).await?;
                info!(
                    "Created {} {}/{}",
                    metadata.kind.as_str(),
                    metadata.group,
                    metadata.name
                );
            }
        }

        self.commit(&model.name, compiled.schema);
        Ok(compiled.definition)
    }

    /// Bootstrap models in order, stopping at the first failure
    pub async fn bootstrap_all(
        &self,
        models: &[Model],
        client: &dyn StorageClient,
    ) -> Result<Vec<SchemaDefinition>> {
        let mut definitions = Vec::with_capacity(models.len());
        for model in models {
            definitions.push(self.bootstrap(model, client).await?);
        }
        info!("Bootstrapped {} models", definitions.len());
        Ok(definitions)
    }

    /// Registered model names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    fn writer(&self, name: &str) -> Arc<Mutex<()>> {
        Arc::clone(self.writers.entry(name.to_string()).or_default().value())
    }

    fn commit(&self, name: &str, schema: CompiledSchema) {
        if self
            .schemas
            .insert(name.to_string(), Arc::new(schema))
            .is_some()
        {
            debug!("Replaced registered schema {}", name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, DeclaredType, DownSampling};
    use crate::schema::{ColumnRole, SchemaKind};

    fn segment(extra: &[&str]) -> Model {
        let mut columns = vec![
            Column::new("service_id", DeclaredType::Text).sharding_key(0),
            Column::new("trace_id", DeclaredType::Text),
        ];
        columns.extend(extra.iter().map(|name| Column::new(*name, DeclaredType::Long)));
        Model::record("segment", columns)
    }

    #[tokio::test]
    async fn test_register_and_lookup() {
        let registry = MetadataRegistry::default();
        assert!(registry.lookup("segment").is_none());

        let definition = registry.register(&segment(&[])).await.unwrap();
        assert_eq!(definition.kind(), SchemaKind::Stream);

        let schema = registry.lookup("segment").unwrap();
        assert_eq!(schema.kind(), SchemaKind::Stream);
        assert_eq!(schema.spec("trace_id").unwrap().role, ColumnRole::Tag);
        assert_eq!(registry.names(), vec!["segment".to_string()]);
    }

    #[tokio::test]
    async fn test_reregistration_replaces_entry() {
        let registry = MetadataRegistry::default();
        registry.register(&segment(&[])).await.unwrap();
        let before = registry.lookup("segment").unwrap();

        registry.register(&segment(&["latency"])).await.unwrap();
        let after = registry.lookup("segment").unwrap();

        assert!(before.spec("latency").is_none());
        assert!(after.spec("latency").is_some());
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_registration_leaves_no_entry() {
        let registry = MetadataRegistry::default();
        let model = Model::aggregate(
            "service_cpm",
            vec![Column::new("scores", DeclaredType::List(Box::new(DeclaredType::Double)))],
            DownSampling::Minute,
        );
        assert!(registry.register(&model).await.is_err());
        assert!(registry.lookup("service_cpm").is_none());
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_failed_reregistration_keeps_previous_entry() {
        let registry = MetadataRegistry::default();
        registry.register(&segment(&[])).await.unwrap();

        let mut broken = segment(&[]);
        broken.columns[0].sharding_key = None;
        assert!(registry.register(&broken).await.is_err());

        assert!(registry.lookup("segment").unwrap().is_tag("service_id"));
    }
}
