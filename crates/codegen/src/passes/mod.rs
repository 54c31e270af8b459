//! Resolution passes, in pipeline order.
//!
//! Each pass is a unit struct implementing [`Pass`](crate::pipeline::Pass).
//! Shared lookups used by several relation passes live at the bottom of this
//! module.

mod artifacts;
mod attributes;
mod belongs_to;
mod belongs_to_many;
mod columns;
mod finalize;
mod has_one_or_many;
mod migrations;
mod model_shells;
mod morph_columns;
mod morph_one_or_many;
mod morph_to;
mod morph_to_many;
mod pivot_models;
mod quick_models;
mod reservations;
mod through;

pub use artifacts::ArtifactsPass;
pub use attributes::ModelAttributes;
pub use belongs_to::BelongsToPass;
pub use belongs_to_many::BelongsToManyPass;
pub use columns::Columns;
pub use finalize::FinalizeModels;
pub use has_one_or_many::HasOneOrManyPass;
pub use migrations::{ExplicitMigrations, ModelMigrations, PivotMigrations};
pub use model_shells::ModelShells;
pub use morph_columns::MorphColumns;
pub use morph_one_or_many::MorphOneOrManyPass;
pub use morph_to::MorphToPass;
pub use morph_to_many::MorphToManyPass;
pub use pivot_models::PivotModels;
pub use quick_models::QuickModels;
pub use reservations::RelationReservations;
pub use through::ThroughPass;

pub(crate) use columns::{check_auto_increment, check_physical_columns, classify_column};

use crate::context::SchemaContext;
use crate::guess::{guess_model, model_candidates};
use crate::relation_line::RelationLine;
use draftsman_core::lexer::Argument;
use draftsman_core::{logic_error, CoreResult};
use draftsman_orm::{Model, ModelKey, ModelType};

/// Target model of a relation line: the first argument, or a guess from the relation name
pub(crate) fn resolve_target(context: &SchemaContext, line: &RelationLine) -> CoreResult<ModelKey> {
    if let Some(reference) = line.argument(0) {
        return context.resolve_reference(&line.model, &line.name, reference);
    }

    match guess_model(context, line.kind, &line.name) {
        Some(target) => {
            tracing::debug!(
                model = %line.model,
                relation = %line.name,
                target = %target,
                "guessed relation target"
            );
            Ok(target)
        }
        None => {
            let candidate = model_candidates(line.kind, &line.name)
                .into_iter()
                .next()
                .unwrap_or_else(|| line.name.clone());
            logic_error!(
                "Relation [{}] of model [{}] points to a non-existent model [{}]",
                line.name,
                line.model,
                candidate
            )
        }
    }
}

/// Resolve the `using:` pivot model of a line and retag it as `model_type`
pub(crate) fn resolve_pivot(
    context: &mut SchemaContext,
    line: &RelationLine,
    model_type: ModelType,
) -> CoreResult<Option<ModelKey>> {
    let Some(reference) = line.using.as_deref() else {
        return Ok(None);
    };
    let Some(pivot) = context.find_model(reference).map(str::to_string) else {
        logic_error!(
            "Relation [{}] of model [{}] points to a non-existent pivot model [{}]",
            line.name,
            line.model,
            reference
        );
    };

    let model = context.model_mut(&pivot)?;
    if model.model_type != model_type {
        tracing::debug!(pivot = %pivot, model_type = ?model_type, "retagged pivot model");
        model.model_type = model_type;
    }
    Ok(Some(pivot))
}

/// Builder method and arguments of a column referencing the primary key of `model`
pub(crate) fn foreign_method_of(model: &Model) -> (String, Vec<Argument>) {
    match model.primary_column() {
        Some(column) => column.foreign_method(),
        None if model.has_uuid_primary_key() => ("uuid".to_string(), Vec::new()),
        None => ("unsignedBigInteger".to_string(), Vec::new()),
    }
}

/// Primary key column name of `model`, `id` when it has none
pub(crate) fn primary_name(model: &Model) -> &str {
    model
        .primary
        .as_ref()
        .map(|primary| primary.column.as_str())
        .unwrap_or("id")
}

#[cfg(test)]
pub(crate) fn resolve_until(yaml: &str, last: &str) -> CoreResult<SchemaContext> {
    use crate::pipeline::Pipeline;
    use draftsman_core::{GeneratorConfig, SchemaSpec};

    let mut context = SchemaContext::new(GeneratorConfig::new(), SchemaSpec::from_yaml(yaml)?);
    Pipeline::standard().until(last).run(&mut context)?;
    Ok(context)
}
