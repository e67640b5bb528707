//! Storage schema definitions
//!
//! The storage engine knows two kinds of schema: streams (append-only
//! events) and measures (time-bucketed aggregates). Both are made of tags,
//! grouped into named tag families, optionally indexed through index rules.
//! Measures additionally carry a single value field.

mod definition;
mod entity;
mod field;
mod index;
mod tag;

pub use definition::{
    Catalog, Group, GroupSpec, MeasureDefinition, SchemaDefinition, StreamDefinition, TimeSpan,
};
pub use entity::extract_entity_keys;
pub use field::{resolve_field_spec, CompressionMethod, EncodingMethod, FieldSpec, FieldType};
pub use index::{plan_index_rule, IndexLocation, IndexRule, IndexType};
pub use tag::{partition_tag_families, resolve_tag_spec, TagFamilySpec, TagMetadata, TagSpec, TagType};

use crate::model::{DeclaredType, Model};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Group shared by every non-super-dataset stream
pub const STREAM_DEFAULT_GROUP: &str = "stream-default";
/// Prefix of the dedicated group of a super-dataset stream
pub const STREAM_GROUP_PREFIX: &str = "stream-";
/// Group shared by every measure
pub const MEASURE_DEFAULT_GROUP: &str = "measure-default";

/// Index-bearing tag family of a stream
pub const STREAM_INDEX_FAMILY: &str = "searchable";
/// Index-bearing tag family of a measure
pub const MEASURE_INDEX_FAMILY: &str = "default";
/// Non-indexed tag family of both kinds
pub const STORAGE_ONLY_FAMILY: &str = "storage-only";

/// Name of the implicit identity tag of a measure. It doubles as the
/// synthetic entity key when a measure declares no sharding key.
pub const MEASURE_ID: &str = "id";

/// Schema kinds understood by the storage engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    /// Append-only events
    Stream,
    /// Aggregated, time-bucketed values
    Measure,
}

impl SchemaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaKind::Stream => "stream",
            SchemaKind::Measure => "measure",
        }
    }
}

/// Where a schema lives on the storage engine
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaMetadata {
    pub group: String,
    pub name: String,
    pub kind: SchemaKind,
}

impl SchemaMetadata {
    pub fn new(group: impl Into<String>, name: impl Into<String>, kind: SchemaKind) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            kind,
        }
    }

    /// Derive group, name and kind from the model flags
    pub fn from_model(model: &Model) -> Self {
        if model.is_record {
            let group = if model.is_super_dataset {
                format!("{}{}", STREAM_GROUP_PREFIX, model.name)
            } else {
                STREAM_DEFAULT_GROUP.to_string()
            };
            return Self::new(group, &model.name, SchemaKind::Stream);
        }
        Self::new(MEASURE_DEFAULT_GROUP, &model.name, SchemaKind::Measure)
    }

    /// Family holding indexed tags
    pub fn index_family(&self) -> &'static str {
        match self.kind {
            SchemaKind::Stream => STREAM_INDEX_FAMILY,
            SchemaKind::Measure => MEASURE_INDEX_FAMILY,
        }
    }

    /// Family holding tags that are stored but never indexed
    pub fn non_index_family(&self) -> &'static str {
        STORAGE_ONLY_FAMILY
    }
}

/// Storage role of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Tag,
    Field,
}

/// Role and declared type of one registered column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub role: ColumnRole,
    pub declared_type: DeclaredType,
}

impl ColumnSpec {
    pub fn tag(declared_type: DeclaredType) -> Self {
        Self {
            role: ColumnRole::Tag,
            declared_type,
        }
    }

    pub fn field(declared_type: DeclaredType) -> Self {
        Self {
            role: ColumnRole::Field,
            declared_type,
        }
    }
}

/// The registry's view of a compiled model
///
/// Query builders use it to decide, per column, whether a predicate targets
/// a tag or a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSchema {
    metadata: SchemaMetadata,
    specs: HashMap<String, ColumnSpec>,
    tags: BTreeSet<String>,
    fields: BTreeSet<String>,
}

impl CompiledSchema {
    pub fn new(
        metadata: SchemaMetadata,
        specs: HashMap<String, ColumnSpec>,
        tags: BTreeSet<String>,
        fields: BTreeSet<String>,
    ) -> Self {
        Self {
            metadata,
            specs,
            tags,
            fields,
        }
    }

    pub fn metadata(&self) -> &SchemaMetadata {
        &self.metadata
    }

    pub fn kind(&self) -> SchemaKind {
        self.metadata.kind
    }

    /// Column spec by storage name
    pub fn spec(&self, column: &str) -> Option<&ColumnSpec> {
        self.specs.get(column)
    }

    pub fn specs(&self) -> &HashMap<String, ColumnSpec> {
        &self.specs
    }

    /// All tag names, including synthesized ones
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn fields(&self) -> &BTreeSet<String> {
        &self.fields
    }

    pub fn is_tag(&self, name: &str) -> bool {
        self.tags.contains(name)
    }

    pub fn is_field(&self, name: &str) -> bool {
        self.fields.contains(name)
    }
}
