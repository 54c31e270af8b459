//! Shared state threaded through every resolution pass

use crate::artifacts::Artifacts;
use crate::pipeline::Stage;
use crate::relation_line::RelationLine;
use draftsman_core::lexer::Call;
use draftsman_core::{logic_error, CoreError, CoreResult, GeneratorConfig, ModelSpec, SchemaSpec};
use draftsman_orm::{Migration, Model, ModelKey, Relation, RelationType};
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// The whole schema under resolution.
///
/// Passes read anything earlier passes produced and write through the
/// accessors below. Models refer to each other by key only.
#[derive(Debug)]
pub struct SchemaContext {
    pub config: GeneratorConfig,
    pub spec: SchemaSpec,
    /// Canonical declarations, filled by quick normalization
    pub declarations: IndexMap<ModelKey, ModelSpec>,
    pub models: IndexMap<ModelKey, Model>,
    /// Table definitions keyed by table name
    pub migrations: IndexMap<String, Migration>,
    pub artifacts: Artifacts,
    stages: BTreeSet<Stage>,
}

impl SchemaContext {
    pub fn new(config: GeneratorConfig, spec: SchemaSpec) -> Self {
        Self {
            config,
            spec,
            declarations: IndexMap::new(),
            models: IndexMap::new(),
            migrations: IndexMap::new(),
            artifacts: Artifacts::default(),
            stages: BTreeSet::new(),
        }
    }

    pub fn has_stage(&self, stage: Stage) -> bool {
        self.stages.contains(&stage)
    }

    pub(crate) fn stamp(&mut self, stage: Stage) {
        self.stages.insert(stage);
    }

    pub fn model(&self, key: &str) -> CoreResult<&Model> {
        self.models
            .get(key)
            .ok_or_else(|| CoreError::logic(format!("Model [{}] does not exist", key)))
    }

    pub fn model_mut(&mut self, key: &str) -> CoreResult<&mut Model> {
        self.models
            .get_mut(key)
            .ok_or_else(|| CoreError::logic(format!("Model [{}] does not exist", key)))
    }

    pub fn declaration(&self, key: &str) -> CoreResult<&ModelSpec> {
        self.declarations
            .get(key)
            .ok_or_else(|| CoreError::logic(format!("Model [{}] is not declared", key)))
    }

    /// Look a model reference up by exact key, then by class name ignoring case
    pub fn find_model(&self, reference: &str) -> Option<&str> {
        if let Some((key, _)) = self.models.get_key_value(reference) {
            return Some(key.as_str());
        }

        let class = reference
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(reference);
        self.models
            .values()
            .find(|model| model.class.eq_ignore_ascii_case(class))
            .map(|model| model.key.as_str())
    }

    /// Resolve a model reference made by relation `relation` of model `owner`
    pub fn resolve_reference(&self, owner: &str, relation: &str, reference: &str) -> CoreResult<ModelKey> {
        match self.find_model(reference) {
            Some(key) => Ok(key.to_string()),
            None => logic_error!(
                "Relation [{}] of model [{}] points to a non-existent model [{}]",
                relation,
                owner,
                reference
            ),
        }
    }

    pub fn relation(&self, model: &str, name: &str) -> Option<&Relation> {
        self.models.get(model)?.relations.get(name)
    }

    pub fn relation_mut(&mut self, model: &str, name: &str) -> Option<&mut Relation> {
        self.models.get_mut(model)?.relations.get_mut(name)
    }

    /// Declaration lines of every relation of `kind`, in declaration order
    pub fn relation_lines(&self, kind: RelationType) -> CoreResult<Vec<RelationLine>> {
        let mut lines = Vec::new();
        for (model, declaration) in &self.declarations {
            for (name, line) in &declaration.columns {
                let Some(line) = line else { continue };
                let call = Call::parse(line);
                if call.name() == Some(kind.keyword()) {
                    lines.push(RelationLine::parse(model, name, call)?);
                }
            }
        }
        Ok(lines)
    }

    /// Relation line declared at `name` on `model`, if that line is a relation
    pub fn relation_line(&self, model: &str, name: &str) -> CoreResult<Option<RelationLine>> {
        let declaration = self.declaration(model)?;
        let Some(Some(line)) = declaration.columns.get(name) else {
            return Ok(None);
        };
        let call = Call::parse(line);
        if call.name().and_then(RelationType::from_keyword).is_none() {
            return Ok(None);
        }
        RelationLine::parse(model, name, call).map(Some)
    }
}
