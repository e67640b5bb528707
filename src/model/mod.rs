//! Application data model
//!
//! A [`Model`] is the storage-agnostic description of one collection: an
//! ordered list of typed columns plus the flags that decide whether it is
//! compiled into an append-only stream or a time-bucketed measure.

mod catalog;

pub use catalog::ModelCatalog;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared application type of a column
///
/// This is a closed set: every resolver matches it exhaustively, and types
/// without a storage mapping fail with [`crate::Error::UnsupportedType`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclaredType {
    /// UTF-8 string
    Text,
    /// 32-bit integer
    Int,
    /// 64-bit integer
    Long,
    /// Enumerated value, stored by ordinal
    Enumeration,
    /// Primitive double
    Double,
    /// Nullable (boxed) double
    BoxedDouble,
    /// Raw byte sequence
    Bytes,
    /// Composite table-valued data, serialized as text
    DataTable,
    /// Structured object serialized as JSON text
    Json,
    /// List of integers
    IntList,
    /// Generic list with the given element type
    List(Box<DeclaredType>),
}

impl DeclaredType {
    /// Generic list of strings
    pub fn string_list() -> Self {
        DeclaredType::List(Box::new(DeclaredType::Text))
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredType::Text => write!(f, "text"),
            DeclaredType::Int => write!(f, "int"),
            DeclaredType::Long => write!(f, "long"),
            DeclaredType::Enumeration => write!(f, "enumeration"),
            DeclaredType::Double => write!(f, "double"),
            DeclaredType::BoxedDouble => write!(f, "boxed_double"),
            DeclaredType::Bytes => write!(f, "bytes"),
            DeclaredType::DataTable => write!(f, "data_table"),
            DeclaredType::Json => write!(f, "json"),
            DeclaredType::IntList => write!(f, "int_list"),
            DeclaredType::List(element) => write!(f, "list<{}>", element),
        }
    }
}

/// Downsampling granularity of an aggregated model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownSampling {
    #[default]
    None,
    Minute,
    Hour,
    Day,
}

/// Sharding key extension of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardingKey {
    /// Position of the column inside the entity key
    pub idx: u32,
}

/// A single column of a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Storage name of the column
    pub name: String,
    /// Declared application type
    #[serde(rename = "type")]
    pub declared_type: DeclaredType,
    /// Present when the column is part of the entity (sharding) key
    #[serde(default)]
    pub sharding_key: Option<ShardingKey>,
    /// Place the index globally instead of per series
    #[serde(default)]
    pub global_indexing: bool,
    /// Stored but never indexed
    #[serde(default)]
    pub storage_only: bool,
}

impl Column {
    /// Create a new indexed, non-sharding column
    pub fn new(name: impl Into<String>, declared_type: DeclaredType) -> Self {
        Self {
            name: name.into(),
            declared_type,
            sharding_key: None,
            global_indexing: false,
            storage_only: false,
        }
    }

    /// Mark the column as the `idx`-th entity key component
    pub fn sharding_key(mut self, idx: u32) -> Self {
        self.sharding_key = Some(ShardingKey { idx });
        self
    }

    /// Set global index placement
    pub fn global_indexing(mut self, enabled: bool) -> Self {
        self.global_indexing = enabled;
        self
    }

    /// Set storage-only (never indexed)
    pub fn storage_only(mut self, enabled: bool) -> Self {
        self.storage_only = enabled;
        self
    }

    pub fn is_sharding_key(&self) -> bool {
        self.sharding_key.is_some()
    }

    /// Whether an index rule should be generated for this column
    pub fn should_index(&self) -> bool {
        !self.storage_only
    }
}

/// A collection definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// Unique model name
    pub name: String,
    /// Columns in declaration order
    pub columns: Vec<Column>,
    /// Append-only event collection
    #[serde(default)]
    pub is_record: bool,
    /// Record collection large enough to live in its own group
    #[serde(default)]
    pub is_super_dataset: bool,
    /// Time bucket of aggregated values, ignored for records
    #[serde(default)]
    pub downsampling: DownSampling,
    /// Storage name of the single value column of a measure
    #[serde(default)]
    pub value_column: Option<String>,
}

impl Model {
    /// Create an append-only record model
    pub fn record(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
            is_record: true,
            is_super_dataset: false,
            downsampling: DownSampling::None,
            value_column: None,
        }
    }

    /// Create an aggregated model with the given granularity
    pub fn aggregate(
        name: impl Into<String>,
        columns: Vec<Column>,
        downsampling: DownSampling,
    ) -> Self {
        Self {
            name: name.into(),
            columns,
            is_record: false,
            is_super_dataset: false,
            downsampling,
            value_column: None,
        }
    }

    /// Designate the value column
    pub fn with_value_column(mut self, column: impl Into<String>) -> Self {
        self.value_column = Some(column.into());
        self
    }

    /// Flag the model as a super dataset
    pub fn super_dataset(mut self, enabled: bool) -> Self {
        self.is_super_dataset = enabled;
        self
    }

    /// Get a column by storage name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}
