//! Entry point: configuration plus pipeline, producing a [`ResolvedSchema`]

use crate::artifacts::Artifacts;
use crate::context::SchemaContext;
use crate::guess::morph_table;
use crate::pipeline::Pipeline;
use draftsman_core::lexer::{Argument, Call, Method};
use draftsman_core::{CoreError, CoreResult, GeneratorConfig, GeneratorConfigTrait, SchemaSpec};
use draftsman_orm::{Migration, Model, ModelKey, Relation, RelationKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Resolves declarative schemas with one configuration
pub struct Generator {
    config: GeneratorConfig,
    pipeline: Pipeline,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            pipeline: Pipeline::standard(),
        }
    }

    /// Configuration from `DRAFTSMAN_*` environment variables
    pub fn from_env() -> CoreResult<Self> {
        Ok(Self::new(GeneratorConfig::from_env()?))
    }

    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn generate(&self, spec: SchemaSpec) -> CoreResult<ResolvedSchema> {
        let config = match &spec.namespace {
            Some(namespace) => self.config.clone().with_namespace(namespace.as_str()),
            None => self.config.clone(),
        };
        config.validate()?;

        let mut context = SchemaContext::new(config, spec);
        self.pipeline.run(&mut context)?;

        tracing::info!(
            models = context.models.len(),
            migrations = context.migrations.len(),
            "schema resolved"
        );

        Ok(ResolvedSchema {
            namespace: context.config.namespace.clone(),
            models: context.models,
            migrations: context.migrations,
            artifacts: context.artifacts,
        })
    }

    pub fn generate_yaml(&self, yaml: &str) -> CoreResult<ResolvedSchema> {
        self.generate(SchemaSpec::from_yaml(yaml)?)
    }

    pub fn generate_file(&self, path: &Path) -> CoreResult<ResolvedSchema> {
        self.generate(SchemaSpec::load(path)?)
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(GeneratorConfig::new())
    }
}

/// Fully resolved models, migrations and side tables, ready for emission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSchema {
    pub namespace: String,
    pub models: IndexMap<ModelKey, Model>,
    /// Keyed by table name
    pub migrations: IndexMap<String, Migration>,
    pub artifacts: Artifacts,
}

impl ResolvedSchema {
    pub fn model(&self, key: &str) -> Option<&Model> {
        self.models.get(key)
    }

    pub fn migration(&self, table: &str) -> Option<&Migration> {
        self.migrations.get(table)
    }

    pub fn relation(&self, model: &str, relation: &str) -> Option<&Relation> {
        self.models.get(model)?.relation(relation)
    }

    /// Relation method body in call form, e.g. `belongsTo(User::class, 'user_id')`
    pub fn relation_call(&self, model: &str, relation: &str) -> CoreResult<String> {
        let owner = self
            .model(model)
            .ok_or_else(|| CoreError::logic(format!("Model [{}] does not exist", model)))?;
        let relation = owner.relation(relation).ok_or_else(|| {
            CoreError::logic(format!(
                "Relation [{}] of model [{}] does not exist",
                relation, model
            ))
        })?;

        let class = |key: &str| -> CoreResult<Argument> {
            let target = self
                .model(key)
                .ok_or_else(|| CoreError::logic(format!("Model [{}] does not exist", key)))?;
            Ok(if target.namespace == owner.namespace {
                Argument::class(target.class.as_str())
            } else {
                Argument::class(format!("\\{}", target.fqcn()))
            })
        };
        let string = |value: &str| Argument::string(value);

        let mut arguments = Vec::new();
        match &relation.kind {
            RelationKind::BelongsTo(payload) => {
                arguments.push(class(&payload.model)?);
                arguments.push(string(&payload.column_key));
                arguments.extend(payload.owner_key.as_deref().map(string));
            }
            RelationKind::HasOne(payload) | RelationKind::HasMany(payload) => {
                arguments.push(class(&payload.model)?);
                arguments.push(string(&payload.foreign_key));
                arguments.extend(payload.local_key.as_deref().map(string));
            }
            RelationKind::HasOneThrough(payload) | RelationKind::HasManyThrough(payload) => {
                arguments.push(class(&payload.model)?);
                arguments.push(class(&payload.through)?);
                if payload.first_key.is_some() || payload.second_key.is_some() {
                    arguments.push(payload.first_key.as_deref().map(string).unwrap_or_else(Argument::null));
                    arguments.push(payload.second_key.as_deref().map(string).unwrap_or_else(Argument::null));
                }
            }
            RelationKind::BelongsToMany(payload) => {
                arguments.push(class(&payload.model)?);
                arguments.push(string(&payload.table));
                arguments.push(string(&payload.foreign_pivot_key));
                arguments.push(string(&payload.related_pivot_key));
            }
            RelationKind::MorphTo(payload) => {
                if payload.column_name != relation.name {
                    arguments.push(string(&payload.column_name));
                }
            }
            RelationKind::MorphOne(payload) | RelationKind::MorphMany(payload) => {
                arguments.push(class(&payload.model)?);
                arguments.push(string(&payload.relation_key));
            }
            RelationKind::MorphToMany(payload) | RelationKind::MorphedByMany(payload) => {
                arguments.push(class(&payload.model)?);
                arguments.push(string(&payload.relation_key));
                if payload.table != morph_table(&payload.relation_key) {
                    arguments.push(string(&payload.table));
                }
            }
        }

        let mut call = Call::new(vec![Method::new(relation.relation_type().keyword(), arguments)]);
        if let Some(pivot) = relation.kind.using() {
            call.push(Method::new("using", vec![class(pivot)?]));
        }
        let with_pivot = match &relation.kind {
            RelationKind::BelongsToMany(payload) => payload.with_pivot.clone(),
            RelationKind::MorphToMany(payload) | RelationKind::MorphedByMany(payload) => {
                payload.with_pivot.clone()
            }
            _ => Vec::new(),
        };
        if !with_pivot.is_empty() {
            call.push(Method::new("withPivot", with_pivot));
        }
        call.extend(relation.methods.clone());

        let rendered = call.render();
        Ok(rendered.strip_prefix("->").unwrap_or(&rendered).to_string())
    }

    /// Deterministic JSON dump of the whole schema
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
