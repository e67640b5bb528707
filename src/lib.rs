//! # schemabridge
//!
//! Compiles application data models into the schemas of a tag/field
//! oriented storage engine, and keeps a registry of the compiled results for
//! query builders.
//!
//! A model is an ordered list of typed columns. Record models become
//! append-only **streams**, aggregated models become time-bucketed
//! **measures**. Compilation decides:
//!
//! - **Entity keys**: the ordered sharding key columns, or the synthetic
//!   identity key of a measure that declares none
//! - **Tag families**: indexed tags vs storage-only tags
//! - **Index rules**: inverted indexes, placed per series or globally
//! - **Fields**: encoding and compression of a measure's value column
//!
//! ## Architecture
//!
//! - **SchemaCompiler**: pure model to schema translation
//! - **MetadataRegistry**: name to compiled schema map, plus bootstrap
//!   against the engine through a [`client::StorageClient`]

pub mod client;
pub mod compiler;
pub mod config;
pub mod model;
pub mod registry;
pub mod schema;
pub mod telemetry;

mod error;

pub use error::{Error, RemoteError, Result, StatusCode};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::client::{LocalStorageClient, StorageClient};
    pub use crate::compiler::{CompiledModel, SchemaCompiler};
    pub use crate::config::RegistryConfig;
    pub use crate::model::{Column, DeclaredType, DownSampling, Model, ModelCatalog};
    pub use crate::registry::MetadataRegistry;
    pub use crate::schema::{CompiledSchema, SchemaDefinition, SchemaKind, SchemaMetadata};
    pub use crate::{Error, Result};
}
