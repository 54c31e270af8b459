use super::{foreign_method_of, primary_name, resolve_target};
use crate::context::SchemaContext;
use crate::guess::foreign_key;
use crate::pipeline::{Pass, Stage};
use draftsman_core::{logic_error, CoreResult};
use draftsman_orm::{BelongsTo, Column, Relation, RelationKind, RelationType};

/// Resolves `belongsTo` lines and fills their column placeholders.
///
/// The key column mirrors the target's primary key builder. A column already
/// declared under the computed name is reused and tagged instead of
/// duplicated.
pub struct BelongsToPass;

impl Pass for BelongsToPass {
    fn name(&self) -> &'static str {
        "belongs-to"
    }

    fn requires(&self) -> &'static [Stage] {
        &[Stage::Columns]
    }

    fn provides(&self) -> Stage {
        Stage::BelongsTo
    }

    fn run(&self, context: &mut SchemaContext) -> CoreResult<()> {
        for line in context.relation_lines(RelationType::BelongsTo)? {
            let target_key = resolve_target(context, &line)?;
            let target = context.model(&target_key)?;

            let (column_name, (method, arguments)) = match line.argument(1) {
                Some(column_name) => {
                    let mirrored = target
                        .columns
                        .values()
                        .find(|column| column_name.ends_with(&format!("_{}", column.name)))
                        .map(Column::foreign_method)
                        .unwrap_or_else(|| foreign_method_of(target));
                    (column_name.to_string(), mirrored)
                }
                None => {
                    if !target.has_primary_key() {
                        logic_error!(
                            "Model [{}] must have primary keys enabled to be the target of relation [{}] of model [{}]",
                            target_key,
                            line.name,
                            line.model
                        );
                    }
                    (
                        foreign_key(&target.class, primary_name(target)),
                        foreign_method_of(target),
                    )
                }
            };

            let model = context.model_mut(&line.model)?;
            let declared = model
                .columns
                .iter()
                .find(|(key, column)| *key != line.name && column.name == column_name)
                .map(|(key, _)| key.to_string());

            match declared {
                Some(key) => {
                    model.columns.remove(&line.name);
                    if let Some(column) = model.columns.get_mut(&key) {
                        column.relation = Some(line.name.clone());
                    }
                    tracing::trace!(
                        model = %line.model,
                        relation = %line.name,
                        column = %column_name,
                        "reused declared column for belongsTo"
                    );
                }
                None => {
                    let column = Column::from_call(column_name.as_str(), line.column_call(&method, arguments))
                        .for_relation(line.name.as_str());
                    tracing::debug!(
                        model = %line.model,
                        relation = %line.name,
                        column = %column_name,
                        "synthesized belongsTo column"
                    );
                    model.columns.resolve(line.name.as_str(), column);
                }
            }

            let relation = Relation::new(
                line.name.as_str(),
                line.methods.clone(),
                RelationKind::BelongsTo(BelongsTo {
                    model: target_key,
                    column_key: column_name,
                    owner_key: line.argument(2).map(str::to_string),
                }),
            );
            model.relations.resolve(line.name.as_str(), relation);
        }

        Ok(())
    }
}
