use super::{primary_name, resolve_pivot, resolve_target};
use crate::context::SchemaContext;
use crate::guess::{foreign_key, pivot_table};
use crate::pipeline::{Pass, Stage};
use draftsman_core::{logic_error, CoreResult};
use draftsman_orm::{BelongsToMany, ModelType, Relation, RelationKind, RelationType};

/// Resolves `belongsToMany` lines: target, pivot model, pivot table and keys
pub struct BelongsToManyPass;

impl Pass for BelongsToManyPass {
    fn name(&self) -> &'static str {
        "belongs-to-many"
    }

    fn requires(&self) -> &'static [Stage] {
        &[Stage::Columns]
    }

    fn provides(&self) -> Stage {
        Stage::BelongsToMany
    }

    fn run(&self, context: &mut SchemaContext) -> CoreResult<()> {
        for line in context.relation_lines(RelationType::BelongsToMany)? {
            let target_key = resolve_target(context, &line)?;
            let using = resolve_pivot(context, &line, ModelType::Pivot)?;

            let owner = context.model(&line.model)?;
            let target = context.model(&target_key)?;

            let table = match (line.argument(1), &using) {
                (Some(table), _) => table.to_string(),
                (None, Some(pivot)) => context.model(pivot)?.table.clone(),
                (None, None) => pivot_table(&owner.class, &target.class),
            };

            let foreign_pivot_key = line
                .argument(2)
                .map(str::to_string)
                .unwrap_or_else(|| foreign_key(&owner.class, primary_name(owner)));
            let related_pivot_key = line
                .argument(3)
                .map(str::to_string)
                .unwrap_or_else(|| foreign_key(&target.class, primary_name(target)));

            if foreign_pivot_key == related_pivot_key {
                logic_error!(
                    "Relation [{}] of model [{}] needs explicit pivot keys, both default to [{}]",
                    line.name,
                    line.model,
                    foreign_pivot_key
                );
            }

            let relation = Relation::new(
                line.name.as_str(),
                line.methods.clone(),
                RelationKind::BelongsToMany(BelongsToMany {
                    model: target_key,
                    using,
                    table,
                    foreign_pivot_key,
                    related_pivot_key,
                    with_pivot: line.with_pivot.clone(),
                }),
            );
            context
                .model_mut(&line.model)?
                .relations
                .resolve(line.name.as_str(), relation);
        }

        Ok(())
    }
}
