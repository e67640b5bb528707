//! Reconciliation of compiled schemas with the storage engine

use crate::client::StorageClient;
use crate::schema::{Catalog, Group, GroupSpec, SchemaDefinition, SchemaKind, SchemaMetadata, TimeSpan};
use crate::{Error, Result, StatusCode};
use tracing::info;

/// Shard replicas of every group
pub const GROUP_SHARD_NUM: u32 = 2;
/// Pre-aggregation buckets of measure groups
pub const MEASURE_GROUP_BUCKET_NUM: u32 = 12;
/// Retention of every group
pub const GROUP_TTL: TimeSpan = TimeSpan::Days(7);

impl SchemaMetadata {
    /// Creation parameters of this schema's group
    pub fn group_spec(&self) -> GroupSpec {
        let bucket_num = match self.kind {
            SchemaKind::Stream => 0,
            SchemaKind::Measure => MEASURE_GROUP_BUCKET_NUM,
        };
        GroupSpec {
            name: self.group.clone(),
            catalog: Catalog::from(self.kind),
            shard_num: GROUP_SHARD_NUM,
            bucket_num,
            ttl: GROUP_TTL,
        }
    }

    /// Return the remote group, creating it when absent
    pub async fn get_or_create_group(&self, client: &dyn StorageClient) -> Result<Group> {
        let existing = match client.find_group(&self.group).await {
            Ok(group) => group,
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e),
        };
        if let Some(group) = existing {
            return Ok(group);
        }

        let group = match client.define_group(self.group_spec()).await {
            Ok(group) => group,
            // another model sharing the group created it first
            Err(Error::Remote(e)) if e.code == StatusCode::AlreadyExists => {
                match client.find_group(&self.group).await? {
                    Some(group) => return Ok(group),
                    None => return Err(Error::Remote(e)),
                }
            }
            Err(e) => return Err(e),
        };
        info!(
            "Created {} group {} (revision {})",
            self.kind.as_str(),
            group.name(),
            group.revision
        );
        Ok(group)
    }

    /// Find the remote schema with this group and name
    ///
    /// A `NotFound` status from the engine is an empty result, any other
    /// failure is returned unchanged.
    pub async fn find_remote_schema(
        &self,
        client: &dyn StorageClient,
    ) -> Result<Option<SchemaDefinition>> {
        let found = match self.kind {
            SchemaKind::Stream => client
                .find_stream(&self.group, &self.name)
                .await
                .map(|s| s.map(SchemaDefinition::Stream)),
            SchemaKind::Measure => client
                .find_measure(&self.group, &self.name)
                .await
                .map(|m| m.map(SchemaDefinition::Measure)),
        };

        match found {
            Ok(schema) => Ok(schema),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl SchemaDefinition {
    /// Push this definition to the storage engine
    pub async fn define(&self, client: &dyn StorageClient) -> Result<()> {
        match self {
            SchemaDefinition::Stream(stream) => client.define_stream(stream.clone()).await,
            SchemaDefinition::Measure(measure) => client.define_measure(measure.clone()).await,
        }
    }
}
