//! Tag specs, tag type resolution and tag family partitioning

use super::{IndexRule, SchemaKind, SchemaMetadata, MEASURE_ID};
use crate::model::DeclaredType;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Tag encodings supported by the storage engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagType {
    String,
    Int,
    Binary,
    IntArray,
    StringArray,
    /// Engine-managed identity of a measure data point
    Id,
}

/// A typed tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagSpec {
    pub name: String,
    pub tag_type: TagType,
}

impl TagSpec {
    pub fn new(name: impl Into<String>, tag_type: TagType) -> Self {
        Self {
            name: name.into(),
            tag_type,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, TagType::String)
    }

    /// The implicit identity tag appended to every measure
    pub fn id() -> Self {
        Self::new(MEASURE_ID, TagType::Id)
    }
}

/// Resolve the tag encoding of a column from its declared type
pub fn resolve_tag_spec(name: &str, declared: &DeclaredType) -> Result<TagSpec> {
    let tag_type = match declared {
        DeclaredType::Text | DeclaredType::DataTable | DeclaredType::Json => TagType::String,
        DeclaredType::Int | DeclaredType::Long => TagType::Int,
        DeclaredType::Bytes => TagType::Binary,
        DeclaredType::Enumeration => TagType::Int,
        // no native float tag, doubles are stored in serialized form
        DeclaredType::Double | DeclaredType::BoxedDouble => TagType::Binary,
        DeclaredType::IntList => TagType::IntArray,
        DeclaredType::List(element) => match element.as_ref() {
            DeclaredType::Text => TagType::StringArray,
            _ => {
                return Err(Error::UnsupportedType {
                    column: name.to_string(),
                    declared: declared.to_string(),
                    role: "tag",
                })
            }
        },
    };
    Ok(TagSpec::new(name, tag_type))
}

/// A resolved tag with its optional index rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMetadata {
    pub index_rule: Option<IndexRule>,
    pub tag_spec: TagSpec,
}

impl TagMetadata {
    pub fn new(index_rule: Option<IndexRule>, tag_spec: TagSpec) -> Self {
        Self {
            index_rule,
            tag_spec,
        }
    }

    pub fn is_indexed(&self) -> bool {
        self.index_rule.is_some()
    }
}

/// A named group of tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFamilySpec {
    pub name: String,
    pub tags: Vec<TagSpec>,
}

impl TagFamilySpec {
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.name.as_str())
    }
}

/// Split resolved tags into the index-bearing and storage-only families
///
/// Indexed tags land in the kind's index family, everything else in the
/// storage-only family; tags keep their input order. Measures always get an
/// index family holding the identity tag at its end. The engine indexes that
/// tag itself, so no rule is ever emitted for it. Empty families are omitted.
pub fn partition_tag_families(
    metadata: &SchemaMetadata,
    tags: &[TagMetadata],
) -> Vec<TagFamilySpec> {
    let (indexed, stored): (Vec<&TagMetadata>, Vec<&TagMetadata>) =
        tags.iter().partition(|t| t.is_indexed());

    let mut index_tags: Vec<TagSpec> = indexed.into_iter().map(|t| t.tag_spec.clone()).collect();
    if metadata.kind == SchemaKind::Measure {
        index_tags.push(TagSpec::id());
    }
    let storage_tags: Vec<TagSpec> = stored.into_iter().map(|t| t.tag_spec.clone()).collect();

    let mut families = Vec::with_capacity(2);
    if !index_tags.is_empty() {
        families.push(TagFamilySpec {
            name: metadata.index_family().to_string(),
            tags: index_tags,
        });
    }
    if !storage_tags.is_empty() {
        families.push(TagFamilySpec {
            name: metadata.non_index_family().to_string(),
            tags: storage_tags,
        });
    }
    families
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{plan_index_rule, STORAGE_ONLY_FAMILY};

    fn indexed(name: &str) -> TagMetadata {
        TagMetadata::new(Some(plan_index_rule(name, None)), TagSpec::string(name))
    }

    fn stored(name: &str) -> TagMetadata {
        TagMetadata::new(None, TagSpec::new(name, TagType::Binary))
    }

    #[test]
    fn test_tag_type_mapping() {
        let cases = [
            (DeclaredType::Text, TagType::String),
            (DeclaredType::DataTable, TagType::String),
            (DeclaredType::Json, TagType::String),
            (DeclaredType::Int, TagType::Int),
            (DeclaredType::Long, TagType::Int),
            (DeclaredType::Bytes, TagType::Binary),
            (DeclaredType::Enumeration, TagType::Int),
            (DeclaredType::Double, TagType::Binary),
            (DeclaredType::BoxedDouble, TagType::Binary),
            (DeclaredType::IntList, TagType::IntArray),
            (DeclaredType::string_list(), TagType::StringArray),
        ];
        for (declared, expected) in cases {
            let spec = resolve_tag_spec("col", &declared).unwrap();
            assert_eq!(spec.tag_type, expected, "declared {}", declared);
            assert_eq!(spec.name, "col");
        }
    }

    #[test]
    fn test_unsupported_generic_list() {
        for element in [DeclaredType::Double, DeclaredType::Long, DeclaredType::IntList] {
            let declared = DeclaredType::List(Box::new(element));
            let err = resolve_tag_spec("tags", &declared).unwrap_err();
            assert!(matches!(err, Error::UnsupportedType { role: "tag", .. }));
            assert!(err.is_configuration());
        }
    }

    #[test]
    fn test_stream_partitioning() {
        let meta = SchemaMetadata::new("stream-default", "segment", SchemaKind::Stream);
        let families = partition_tag_families(
            &meta,
            &[indexed("service_id"), stored("data_binary"), indexed("trace_id")],
        );

        assert_eq!(families.len(), 2);
        assert_eq!(families[0].name, "searchable");
        assert_eq!(families[0].tag_names().collect::<Vec<_>>(), vec!["service_id", "trace_id"]);
        assert_eq!(families[1].name, STORAGE_ONLY_FAMILY);
        assert_eq!(families[1].tag_names().collect::<Vec<_>>(), vec!["data_binary"]);
    }

    #[test]
    fn test_stream_without_indexed_tags_omits_family() {
        let meta = SchemaMetadata::new("stream-default", "events", SchemaKind::Stream);
        let families = partition_tag_families(&meta, &[stored("payload")]);
        assert_eq!(families.len(), 1);
        assert_eq!(families[0].name, STORAGE_ONLY_FAMILY);

        assert!(partition_tag_families(&meta, &[]).is_empty());
    }

    #[test]
    fn test_measure_appends_identity_tag() {
        let meta = SchemaMetadata::new("measure-default", "service_cpm", SchemaKind::Measure);
        let families = partition_tag_families(&meta, &[indexed("entity_id")]);
        assert_eq!(families.len(), 1);
        assert_eq!(families[0].name, "default");
        assert_eq!(families[0].tags.last(), Some(&TagSpec::id()));
        assert_eq!(families[0].tags.len(), 2);

        let families = partition_tag_families(&meta, &[]);
        assert_eq!(families.len(), 1);
        assert_eq!(families[0].tags, vec![TagSpec::id()]);
    }
}
