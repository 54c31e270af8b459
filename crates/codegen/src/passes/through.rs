use super::resolve_target;
use crate::context::SchemaContext;
use crate::guess::through_candidates;
use crate::pipeline::{Pass, Stage};
use crate::relation_line::RelationLine;
use draftsman_core::{logic_error, CoreResult};
use draftsman_orm::{ModelKey, Relation, RelationKind, RelationType, Through};

/// Resolves `hasOneThrough` and `hasManyThrough` lines.
///
/// When keys are left to convention the chain target → through → owner must
/// be made of `belongsTo` relations.
pub struct ThroughPass;

impl Pass for ThroughPass {
    fn name(&self) -> &'static str {
        "has-one-or-many-through"
    }

    fn requires(&self) -> &'static [Stage] {
        &[Stage::BelongsTo]
    }

    fn provides(&self) -> Stage {
        Stage::HasOneOrManyThrough
    }

    fn run(&self, context: &mut SchemaContext) -> CoreResult<()> {
        let mut lines = context.relation_lines(RelationType::HasOneThrough)?;
        lines.extend(context.relation_lines(RelationType::HasManyThrough)?);

        for line in lines {
            let (model, through) = resolve_pair(context, &line)?;
            let first_key = line.argument(2).map(str::to_string);
            let second_key = line.argument(3).map(str::to_string);

            if first_key.is_none() && second_key.is_none() {
                check_link(context, &line, &model, &through)?;
                check_link(context, &line, &through, &line.model)?;
            }

            tracing::debug!(
                model = %line.model,
                relation = %line.name,
                target = %model,
                through = %through,
                "resolved through relation"
            );

            let payload = Through {
                model,
                through,
                first_key,
                second_key,
            };
            let kind = match line.kind {
                RelationType::HasOneThrough => RelationKind::HasOneThrough(payload),
                _ => RelationKind::HasManyThrough(payload),
            };
            let relation = Relation::new(line.name.as_str(), line.methods.clone(), kind);
            context
                .model_mut(&line.model)?
                .relations
                .resolve(line.name.as_str(), relation);
        }

        Ok(())
    }
}

/// Target and intermediate model of a through line
fn resolve_pair(context: &SchemaContext, line: &RelationLine) -> CoreResult<(ModelKey, ModelKey)> {
    match (line.argument(0), line.argument(1)) {
        (Some(_), Some(through)) => Ok((
            resolve_target(context, line)?,
            context.resolve_reference(&line.model, &line.name, through)?,
        )),
        (Some(_), None) => {
            let model = resolve_target(context, line)?;
            let through = intermediate(context, line, &model)?;
            Ok((model, through))
        }
        (None, _) => {
            for (through, model) in through_candidates(&line.name) {
                if let (Some(through), Some(model)) = (context.find_model(&through), context.find_model(&model)) {
                    return Ok((model.to_string(), through.to_string()));
                }
            }

            let model = resolve_target(context, line)?;
            let through = intermediate(context, line, &model)?;
            Ok((model, through))
        }
    }
}

/// The model that `model` belongs to and that itself belongs to the owner of `line`
fn intermediate(context: &SchemaContext, line: &RelationLine, model: &str) -> CoreResult<ModelKey> {
    let target = context.model(model)?;
    let found = target
        .belongs_to_relations()
        .map(|(_, belongs_to)| belongs_to.model.as_str())
        .find(|candidate| {
            context
                .models
                .get(*candidate)
                .is_some_and(|through| through.belongs_to(&line.model).is_some())
        });

    match found {
        Some(through) => Ok(through.to_string()),
        None => logic_error!(
            "Relation [{}] of model [{}] cannot guess its intermediate model, no model links [{}] to [{}]",
            line.name,
            line.model,
            model,
            line.model
        ),
    }
}

fn check_link(context: &SchemaContext, line: &RelationLine, from: &str, to: &str) -> CoreResult<()> {
    if context.model(from)?.belongs_to(to).is_none() {
        logic_error!(
            "Model [{}] must contain a belongsTo relation to [{}] for relation [{}] of model [{}]",
            from,
            to,
            line.name,
            line.model
        );
    }
    Ok(())
}
