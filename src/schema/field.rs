//! Field specs for measure values

use crate::model::DeclaredType;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Field value types supported by the storage engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Int,
    Binary,
}

/// Value encoding applied before compression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingMethod {
    Gorilla,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionMethod {
    Zstd,
}

/// The single value field of a measure
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub field_type: FieldType,
    pub encoding: Option<EncodingMethod>,
    pub compression: Option<CompressionMethod>,
}

/// Resolve the field encoding of a measure's value column
pub fn resolve_field_spec(name: &str, declared: &DeclaredType) -> Result<FieldSpec> {
    let (field_type, encoding) = match declared {
        // legacy: string values are stored as coded integers
        DeclaredType::Text => (FieldType::Int, None),
        DeclaredType::Int | DeclaredType::Long => (FieldType::Int, Some(EncodingMethod::Gorilla)),
        DeclaredType::DataTable => (FieldType::Binary, None),
        DeclaredType::Double => {
            warn!("Double field {} is stored as binary", name);
            (FieldType::Binary, None)
        }
        DeclaredType::Enumeration
        | DeclaredType::BoxedDouble
        | DeclaredType::Bytes
        | DeclaredType::Json
        | DeclaredType::IntList
        | DeclaredType::List(_) => {
            return Err(Error::UnsupportedType {
                column: name.to_string(),
                declared: declared.to_string(),
                role: "field",
            })
        }
    };

    Ok(FieldSpec {
        name: name.to_string(),
        field_type,
        encoding,
        compression: Some(CompressionMethod::Zstd),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_field_uses_gorilla() {
        for declared in [DeclaredType::Int, DeclaredType::Long] {
            let spec = resolve_field_spec("value", &declared).unwrap();
            assert_eq!(spec.field_type, FieldType::Int);
            assert_eq!(spec.encoding, Some(EncodingMethod::Gorilla));
            assert_eq!(spec.compression, Some(CompressionMethod::Zstd));
        }
    }

    #[test]
    fn test_string_field_is_coded_integer() {
        let spec = resolve_field_spec("value", &DeclaredType::Text).unwrap();
        assert_eq!(spec.field_type, FieldType::Int);
        assert_eq!(spec.encoding, None);
        assert_eq!(spec.compression, Some(CompressionMethod::Zstd));
    }

    #[test]
    fn test_binary_fields() {
        for declared in [DeclaredType::DataTable, DeclaredType::Double] {
            let spec = resolve_field_spec("value", &declared).unwrap();
            assert_eq!(spec.field_type, FieldType::Binary);
            assert_eq!(spec.encoding, None);
            assert_eq!(spec.compression, Some(CompressionMethod::Zstd));
        }
    }

    #[test]
    fn test_unsupported_field_types() {
        for declared in [
            DeclaredType::Bytes,
            DeclaredType::Json,
            DeclaredType::BoxedDouble,
            DeclaredType::IntList,
            DeclaredType::string_list(),
        ] {
            let err = resolve_field_spec("value", &declared).unwrap_err();
            assert!(matches!(err, Error::UnsupportedType { role: "field", .. }));
        }
    }
}
