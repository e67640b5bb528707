//! Model to schema compilation
//!
//! Turns a [`Model`] into the definition pushed to the storage engine and the
//! [`CompiledSchema`] kept in the registry. Compilation is pure: it touches
//! neither the registry nor the engine, and it either fully succeeds or
//! returns the first configuration error.

use crate::config::RegistryConfig;
use crate::model::{Column, DeclaredType, DownSampling, Model};
use crate::schema::{
    extract_entity_keys, partition_tag_families, plan_index_rule, resolve_field_spec,
    resolve_tag_spec, ColumnSpec, CompiledSchema, IndexRule, MeasureDefinition, SchemaDefinition,
    SchemaKind, SchemaMetadata, StreamDefinition, TagMetadata, TagSpec, TimeSpan, MEASURE_ID,
};
use crate::{Error, Result};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, warn};

/// Output of a successful compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledModel {
    /// Definition to push to the storage engine
    pub definition: SchemaDefinition,
    /// Column roles kept in the registry
    pub schema: CompiledSchema,
}

/// Compiles models into stream or measure schemas
#[derive(Debug, Clone, Default)]
pub struct SchemaCompiler {
    config: RegistryConfig,
}

impl SchemaCompiler {
    pub fn new(config: RegistryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Compile a model
    pub fn compile(&self, model: &Model) -> Result<CompiledModel> {
        let metadata = SchemaMetadata::from_model(model);
        check_unique_columns(model)?;
        check_reserved_columns(model, metadata.kind)?;
        let value_column = value_column(model, metadata.kind)?;
        let entity = extract_entity_keys(&model.columns)?;

        let mut specs: HashMap<String, ColumnSpec> = HashMap::with_capacity(model.columns.len());
        let mut tags: Vec<TagMetadata> = Vec::with_capacity(model.columns.len());
        for col in &model.columns {
            if value_column.is_some_and(|value| value.name == col.name) {
                specs.insert(col.name.clone(), ColumnSpec::field(col.declared_type.clone()));
                continue;
            }
            let tag_spec = resolve_tag_spec(&col.name, &col.declared_type)?;
            let index_rule = col
                .should_index()
                .then(|| plan_index_rule(&tag_spec.name, Some(col)));
            specs.insert(col.name.clone(), ColumnSpec::tag(col.declared_type.clone()));
            tags.push(TagMetadata::new(index_rule, tag_spec));
        }
        self.append_searchable_tags(model, &metadata, &mut specs, &mut tags);

        let tag_families = partition_tag_families(&metadata, &tags);
        let tag_names: BTreeSet<String> = tag_families
            .iter()
            .flat_map(|family| family.tag_names().map(str::to_string))
            .collect();
        let index_rules: Vec<IndexRule> = tags.into_iter().filter_map(|t| t.index_rule).collect();

        let definition = match metadata.kind {
            SchemaKind::Stream => {
                if entity.is_empty() {
                    return Err(Error::EmptyEntityKeys {
                        model: model.name.clone(),
                    });
                }
                SchemaDefinition::Stream(StreamDefinition {
                    group: metadata.group.clone(),
                    name: metadata.name.clone(),
                    entity,
                    tag_families,
                    index_rules,
                })
            }
            SchemaKind::Measure => {
                let interval = downsampling_interval(model)?;
                let entity = if entity.is_empty() {
                    vec![MEASURE_ID.to_string()]
                } else {
                    entity
                };
                let field = value_column
                    .map(|col| resolve_field_spec(&col.name, &col.declared_type))
                    .transpose()?;
                SchemaDefinition::Measure(MeasureDefinition {
                    group: metadata.group.clone(),
                    name: metadata.name.clone(),
                    interval,
                    entity,
                    tag_families,
                    index_rules,
                    field,
                })
            }
        };

        let fields: BTreeSet<String> = value_column.map(|col| col.name.clone()).into_iter().collect();

        debug!(
            "Compiled {} {}/{}: {} tags, {} index rules, {} fields",
            metadata.kind.as_str(),
            metadata.group,
            metadata.name,
            tag_names.len(),
            definition.index_rules().len(),
            fields.len()
        );

        Ok(CompiledModel {
            definition,
            schema: CompiledSchema::new(metadata, specs, tag_names, fields),
        })
    }

    /// Add configured searchable tags of a record model
    fn append_searchable_tags(
        &self,
        model: &Model,
        metadata: &SchemaMetadata,
        specs: &mut HashMap<String, ColumnSpec>,
        tags: &mut Vec<TagMetadata>,
    ) {
        let extra = self.config.searchable_tags(&model.name);
        if extra.is_empty() {
            return;
        }
        if metadata.kind != SchemaKind::Stream {
            debug!("Ignoring searchable tags configured for measure {}", model.name);
            return;
        }

        for tag in extra {
            if specs.contains_key(tag) {
                warn!(
                    "Searchable tag {} of model {} shadows a declared column, skipping",
                    tag, model.name
                );
                continue;
            }
            specs.insert(tag.clone(), ColumnSpec::tag(DeclaredType::Text));
            tags.push(TagMetadata::new(
                Some(plan_index_rule(tag, None)),
                TagSpec::string(tag.as_str()),
            ));
        }
    }
}

fn check_unique_columns(model: &Model) -> Result<()> {
    let mut seen = HashSet::with_capacity(model.columns.len());
    for col in &model.columns {
        if !seen.insert(col.name.as_str()) {
            return Err(Error::DuplicateColumn {
                model: model.name.clone(),
                column: col.name.clone(),
            });
        }
    }
    Ok(())
}

/// Measures reserve the identity tag name
fn check_reserved_columns(model: &Model, kind: SchemaKind) -> Result<()> {
    if kind == SchemaKind::Measure && model.column(MEASURE_ID).is_some() {
        return Err(Error::InvalidModel(format!(
            "column {} of measure {} collides with the identity tag",
            MEASURE_ID, model.name
        )));
    }
    Ok(())
}

/// Resolve the designated value column. Streams never carry one, and the
/// value column is never part of the entity key.
fn value_column(model: &Model, kind: SchemaKind) -> Result<Option<&Column>> {
    let Some(name) = model.value_column.as_deref() else {
        return Ok(None);
    };
    if kind == SchemaKind::Stream {
        return Err(Error::InvalidModel(format!(
            "record model {} cannot declare value column {}",
            model.name, name
        )));
    }
    let column = model.column(name).ok_or_else(|| {
        Error::InvalidModel(format!(
            "value column {} is not a column of model {}",
            name, model.name
        ))
    })?;
    if column.is_sharding_key() {
        return Err(Error::InvalidModel(format!(
            "value column {} of model {} cannot be a sharding key",
            name, model.name
        )));
    }
    Ok(Some(column))
}

fn downsampling_interval(model: &Model) -> Result<TimeSpan> {
    match model.downsampling {
        DownSampling::Minute => Ok(TimeSpan::Minutes(1)),
        DownSampling::Hour => Ok(TimeSpan::Hours(1)),
        DownSampling::Day => Ok(TimeSpan::Days(1)),
        DownSampling::None => Err(Error::UnsupportedDownsampling {
            model: model.name.clone(),
        }),
    }
}
