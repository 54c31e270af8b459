use super::check_physical_columns;
use crate::context::SchemaContext;
use crate::pipeline::{Pass, Stage};
use draftsman_core::{CoreError, CoreResult};

/// Asserts that no column or relation placeholder survived resolution and
/// that synthesized key columns do not collide with declared ones
pub struct FinalizeModels;

impl Pass for FinalizeModels {
    fn name(&self) -> &'static str {
        "finalize-models"
    }

    fn requires(&self) -> &'static [Stage] {
        &[Stage::HasOneOrMany, Stage::HasOneOrManyThrough, Stage::ModelAttributes]
    }

    fn provides(&self) -> Stage {
        Stage::ModelsFinalized
    }

    fn run(&self, context: &mut SchemaContext) -> CoreResult<()> {
        for model in context.models.values() {
            if let Some(column) = model.columns.pending_keys().first() {
                return Err(CoreError::pipeline(format!(
                    "column [{}] of model [{}] was reserved but never resolved",
                    column, model.key
                )));
            }
            if let Some(relation) = model.relations.pending_keys().first() {
                return Err(CoreError::pipeline(format!(
                    "relation [{}] of model [{}] was reserved but never resolved",
                    relation, model.key
                )));
            }
            check_physical_columns(&format!("model [{}]", model.key), model.columns.values())?;
        }

        Ok(())
    }
}
