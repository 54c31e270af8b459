use crate::context::SchemaContext;
use crate::pipeline::{Pass, Stage};
use draftsman_core::lexer::Call;
use draftsman_core::CoreResult;
use draftsman_orm::RelationType;

/// Reserves a pending relation slot for every relation line, in declaration order.
///
/// Requires `ModelShells`. Afterwards every relation name of every model is a
/// key of its relation map, so later passes may look up relations of models
/// they have not resolved yet.
pub struct RelationReservations;

impl Pass for RelationReservations {
    fn name(&self) -> &'static str {
        "relation-reservations"
    }

    fn requires(&self) -> &'static [Stage] {
        &[Stage::ModelShells]
    }

    fn provides(&self) -> Stage {
        Stage::RelationReservations
    }

    fn run(&self, context: &mut SchemaContext) -> CoreResult<()> {
        let mut reservations = Vec::new();
        for (key, declaration) in &context.declarations {
            for (name, line) in &declaration.columns {
                let is_relation = line
                    .as_deref()
                    .and_then(|line| Call::parse(line).name().and_then(RelationType::from_keyword))
                    .is_some();
                if is_relation {
                    reservations.push((key.clone(), name.clone()));
                }
            }
        }

        for (key, name) in reservations {
            context.model_mut(&key)?.relations.reserve(name);
        }

        Ok(())
    }
}
