//! Engine-ready schema and group definitions
//!
//! These are the artifacts pushed to the storage engine. They are plain
//! immutable values, assembled in one step by the compiler.

use super::{FieldSpec, IndexRule, SchemaKind, SchemaMetadata, TagFamilySpec};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Coarse time span used for measure intervals and group TTLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSpan {
    Minutes(u32),
    Hours(u32),
    Days(u32),
}

impl TimeSpan {
    pub fn as_duration(&self) -> Duration {
        match *self {
            TimeSpan::Minutes(n) => Duration::from_secs(u64::from(n) * 60),
            TimeSpan::Hours(n) => Duration::from_secs(u64::from(n) * 3_600),
            TimeSpan::Days(n) => Duration::from_secs(u64::from(n) * 86_400),
        }
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeSpan::Minutes(n) => write!(f, "{}m", n),
            TimeSpan::Hours(n) => write!(f, "{}h", n),
            TimeSpan::Days(n) => write!(f, "{}d", n),
        }
    }
}

/// Definition of an append-only stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDefinition {
    pub group: String,
    pub name: String,
    /// Ordered entity key tag names
    pub entity: Vec<String>,
    pub tag_families: Vec<TagFamilySpec>,
    pub index_rules: Vec<IndexRule>,
}

/// Definition of a time-bucketed measure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureDefinition {
    pub group: String,
    pub name: String,
    /// Downsampling interval of the stored data points
    pub interval: TimeSpan,
    /// Ordered entity key tag names, or the synthetic identity key
    pub entity: Vec<String>,
    pub tag_families: Vec<TagFamilySpec>,
    pub index_rules: Vec<IndexRule>,
    pub field: Option<FieldSpec>,
}

/// Schema definition of either kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaDefinition {
    Stream(StreamDefinition),
    Measure(MeasureDefinition),
}

impl SchemaDefinition {
    pub fn kind(&self) -> SchemaKind {
        match self {
            SchemaDefinition::Stream(_) => SchemaKind::Stream,
            SchemaDefinition::Measure(_) => SchemaKind::Measure,
        }
    }

    pub fn group(&self) -> &str {
        match self {
            SchemaDefinition::Stream(s) => &s.group,
            SchemaDefinition::Measure(m) => &m.group,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SchemaDefinition::Stream(s) => &s.name,
            SchemaDefinition::Measure(m) => &m.name,
        }
    }

    pub fn metadata(&self) -> SchemaMetadata {
        SchemaMetadata::new(self.group(), self.name(), self.kind())
    }

    pub fn entity(&self) -> &[String] {
        match self {
            SchemaDefinition::Stream(s) => &s.entity,
            SchemaDefinition::Measure(m) => &m.entity,
        }
    }

    pub fn tag_families(&self) -> &[TagFamilySpec] {
        match self {
            SchemaDefinition::Stream(s) => &s.tag_families,
            SchemaDefinition::Measure(m) => &m.tag_families,
        }
    }

    /// Tag family by name
    pub fn tag_family(&self, name: &str) -> Option<&TagFamilySpec> {
        self.tag_families().iter().find(|f| f.name == name)
    }

    pub fn index_rules(&self) -> &[IndexRule] {
        match self {
            SchemaDefinition::Stream(s) => &s.index_rules,
            SchemaDefinition::Measure(m) => &m.index_rules,
        }
    }

    /// Value field, always `None` for streams
    pub fn field(&self) -> Option<&FieldSpec> {
        match self {
            SchemaDefinition::Stream(_) => None,
            SchemaDefinition::Measure(m) => m.field.as_ref(),
        }
    }
}

/// Kind of data a group holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Catalog {
    Stream,
    Measure,
}

impl From<SchemaKind> for Catalog {
    fn from(kind: SchemaKind) -> Self {
        match kind {
            SchemaKind::Stream => Catalog::Stream,
            SchemaKind::Measure => Catalog::Measure,
        }
    }
}

/// Group creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub name: String,
    pub catalog: Catalog,
    /// Number of shard replicas
    pub shard_num: u32,
    /// Pre-aggregation buckets, zero for streams
    pub bucket_num: u32,
    /// Data retention
    pub ttl: TimeSpan,
}

/// A group as known by the storage engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub spec: GroupSpec,
    /// Engine-assigned revision
    pub revision: u64,
}

impl Group {
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn catalog(&self) -> Catalog {
        self.spec.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_span() {
        assert_eq!(TimeSpan::Minutes(1).as_duration(), Duration::from_secs(60));
        assert_eq!(TimeSpan::Days(7).as_duration(), Duration::from_secs(7 * 86_400));
        assert_eq!(TimeSpan::Hours(1).to_string(), "1h");
        assert_eq!(TimeSpan::Days(7).to_string(), "7d");
    }

    #[test]
    fn test_definition_serializes_with_kind_tag() {
        let def = SchemaDefinition::Stream(StreamDefinition {
            group: "stream-default".to_string(),
            name: "segment".to_string(),
            entity: vec!["service_id".to_string()],
            tag_families: vec![],
            index_rules: vec![],
        });
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["kind"], "stream");
        assert_eq!(json["entity"][0], "service_id");
        assert!(def.field().is_none());
        assert_eq!(def.metadata().kind, SchemaKind::Stream);
    }
}
