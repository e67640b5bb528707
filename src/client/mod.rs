//! Storage engine client contract
//!
//! Only the schema-management subset of the engine API is modelled here.
//! Transport, retries and timeouts belong to the implementations.

mod local;

pub use local::LocalStorageClient;

use crate::schema::{Group, GroupSpec, MeasureDefinition, StreamDefinition};
use crate::Result;
use async_trait::async_trait;

/// Schema-management calls against the storage engine
///
/// Implementations may report a missing object either as `Ok(None)` or as an
/// [`crate::Error::Remote`] with [`crate::StatusCode::NotFound`]; callers in
/// this crate treat both as absent. Every other error is a real failure.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Find a group by name
    async fn find_group(&self, name: &str) -> Result<Option<Group>>;

    /// Create a group
    async fn define_group(&self, spec: GroupSpec) -> Result<Group>;

    /// Find a stream schema
    async fn find_stream(&self, group: &str, name: &str) -> Result<Option<StreamDefinition>>;

    /// Find a measure schema
    async fn find_measure(&self, group: &str, name: &str) -> Result<Option<MeasureDefinition>>;

    /// Create a stream schema
    async fn define_stream(&self, stream: StreamDefinition) -> Result<()>;

    /// Create a measure schema
    async fn define_measure(&self, measure: MeasureDefinition) -> Result<()>;
}
