//! Local in-memory storage client for development and testing

use super::StorageClient;
use crate::schema::{Group, GroupSpec, MeasureDefinition, StreamDefinition};
use crate::{Error, RemoteError, Result, StatusCode};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Local in-memory storage client
///
/// Behaves like the engine's schema registry: groups and schemas are keyed
/// by name, and defining an existing object fails with `AlreadyExists`.
/// Missing schemas are reported through a `NotFound` status, the way the
/// remote engine does it.
#[derive(Debug, Default)]
pub struct LocalStorageClient {
    /// Groups by name
    groups: DashMap<String, Group>,
    /// Streams by (group, name)
    streams: DashMap<(String, String), StreamDefinition>,
    /// Measures by (group, name)
    measures: DashMap<(String, String), MeasureDefinition>,
    /// Revision counter for created groups
    revision: AtomicU64,
    /// When set, every call fails with this status
    failure: RwLock<Option<StatusCode>>,
}

impl LocalStorageClient {
    /// Create a new local storage client
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `code`, or clear the failure
    pub fn set_failure(&self, code: Option<StatusCode>) {
        *self.failure.write() = code;
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }

    pub fn measure_count(&self) -> usize {
        self.measures.len()
    }

    fn check_failure(&self, op: &str) -> Result<()> {
        match *self.failure.read() {
            Some(code) => Err(Error::Remote(RemoteError::new(
                code,
                format!("injected failure on {}", op),
            ))),
            None => Ok(()),
        }
    }

    fn key(group: &str, name: &str) -> (String, String) {
        (group.to_string(), name.to_string())
    }
}

#[async_trait]
impl StorageClient for LocalStorageClient {
    async fn find_group(&self, name: &str) -> Result<Option<Group>> {
        self.check_failure("find_group")?;
        Ok(self.groups.get(name).map(|g| g.value().clone()))
    }

    async fn define_group(&self, spec: GroupSpec) -> Result<Group> {
        self.check_failure("define_group")?;
        if self.groups.contains_key(&spec.name) {
            return Err(Error::Remote(RemoteError::new(
                StatusCode::AlreadyExists,
                format!("group {} already exists", spec.name),
            )));
        }

        let group = Group {
            spec,
            revision: self.revision.fetch_add(1, Ordering::SeqCst) + 1,
        };
        self.groups.insert(group.name().to_string(), group.clone());
        Ok(group)
    }

    async fn find_stream(&self, group: &str, name: &str) -> Result<Option<StreamDefinition>> {
        self.check_failure("find_stream")?;
        match self.streams.get(&Self::key(group, name)) {
            Some(stream) => Ok(Some(stream.value().clone())),
            None => Err(Error::Remote(RemoteError::not_found(format!(
                "stream {}/{} not found",
                group, name
            )))),
        }
    }

    async fn find_measure(&self, group: &str, name: &str) -> Result<Option<MeasureDefinition>> {
        self.check_failure("find_measure")?;
        match self.measures.get(&Self::key(group, name)) {
            Some(measure) => Ok(Some(measure.value().clone())),
            None => Err(Error::Remote(RemoteError::not_found(format!(
                "measure {}/{} not found",
                group, name
            )))),
        }
    }

    async fn define_stream(&self, stream: StreamDefinition) -> Result<()> {
        self.check_failure("define_stream")?;
        if !self.groups.contains_key(&stream.group) {
            return Err(Error::Remote(RemoteError::not_found(format!(
                "group {} not found",
                stream.group
            ))));
        }
        let key = Self::key(&stream.group, &stream.name);
        if self.streams.contains_key(&key) {
            return Err(Error::Remote(RemoteError::new(
                StatusCode::AlreadyExists,
                format!("stream {}/{} already exists", stream.group, stream.name),
            )));
        }
        self.streams.insert(key, stream);
        Ok(())
    }

    async fn define_measure(&self, measure: MeasureDefinition) -> Result<()> {
        self.check_failure("define_measure")?;
        if !self.groups.contains_key(&measure.group) {
            return Err(Error::Remote(RemoteError::not_found(format!(
                "group {} not found",
                measure.group
            ))));
        }
        let key = Self::key(&measure.group, &measure.name);
        if self.measures.contains_key(&key) {
            return Err(Error::Remote(RemoteError::new(
                StatusCode::AlreadyExists,
                format!("measure {}/{} already exists", measure.group, measure.name),
            )));
        }
        self.measures.insert(key, measure);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Catalog, TimeSpan};

    fn stream_group() -> GroupSpec {
        GroupSpec {
            name: "stream-default".to_string(),
            catalog: Catalog::Stream,
            shard_num: 2,
            bucket_num: 0,
            ttl: TimeSpan::Days(7),
        }
    }

    fn stream() -> StreamDefinition {
        StreamDefinition {
            group: "stream-default".to_string(),
            name: "segment".to_string(),
            entity: vec!["service_id".to_string()],
            tag_families: vec![],
            index_rules: vec![],
        }
    }

    #[tokio::test]
    async fn test_define_and_find_group() {
        let client = LocalStorageClient::new();
        assert!(client.find_group("stream-default").await.unwrap().is_none());

        let group = client.define_group(stream_group()).await.unwrap();
        assert_eq!(group.revision, 1);

        let found = client.find_group("stream-default").await.unwrap().unwrap();
        assert_eq!(found, group);

        let err = client.define_group(stream_group()).await.unwrap_err();
        assert!(matches!(err, Error::Remote(ref e) if e.code == StatusCode::AlreadyExists));
    }

    #[tokio::test]
    async fn test_missing_stream_is_not_found_status() {
        let client = LocalStorageClient::new();
        let err = client.find_stream("stream-default", "segment").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_stream_requires_group() {
        let client = LocalStorageClient::new();
        assert!(client.define_stream(stream()).await.unwrap_err().is_not_found());

        client.define_group(stream_group()).await.unwrap();
        client.define_stream(stream()).await.unwrap();
        let found = client.find_stream("stream-default", "segment").await.unwrap();
        assert_eq!(found, Some(stream()));
        assert_eq!(client.stream_count(), 1);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let client = LocalStorageClient::new();
        client.set_failure(Some(StatusCode::Unavailable));
        let err = client.find_group("stream-default").await.unwrap_err();
        assert!(matches!(err, Error::Remote(ref e) if e.code == StatusCode::Unavailable));

        client.set_failure(None);
        assert!(client.find_group("stream-default").await.is_ok());
    }
}
