//! Index rule planning

use crate::model::Column;
use serde::{Deserialize, Serialize};

/// Index structures. Only inverted indexes are planned for now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexType {
    Inverted,
}

/// Scope of an index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexLocation {
    /// Local to each series partition
    Series,
    /// Shared across all partitions
    Global,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexRule {
    pub tag: String,
    pub index_type: IndexType,
    pub location: IndexLocation,
}

/// Build the index rule of a tag
///
/// Tags without a backing column were synthesized from configuration and
/// are always indexed per series.
pub fn plan_index_rule(tag: &str, column: Option<&Column>) -> IndexRule {
    let location = match column {
        Some(col) if col.global_indexing => IndexLocation::Global,
        _ => IndexLocation::Series,
    };
    IndexRule {
        tag: tag.to_string(),
        index_type: IndexType::Inverted,
        location,
    }
}
