//! Table definitions: explicit migrations, one per model, and synthesized pivots

use super::{check_auto_increment, check_physical_columns, classify_column, foreign_method_of, primary_name};
use crate::context::SchemaContext;
use crate::guess::foreign_key;
use crate::pipeline::{Pass, Stage};
use draftsman_core::lexer::{Call, Method};
use draftsman_core::{logic_error, CoreResult};
use draftsman_orm::{Column, Index, Migration, Model, Relation, RelationKind, RelationType};

/// Parses the `migrations` section into table definitions
pub struct ExplicitMigrations;

impl Pass for ExplicitMigrations {
    fn name(&self) -> &'static str {
        "explicit-migrations"
    }

    fn requires(&self) -> &'static [Stage] {
        &[Stage::ModelsFinalized]
    }

    fn provides(&self) -> Stage {
        Stage::ExplicitMigrations
    }

    fn run(&self, context: &mut SchemaContext) -> CoreResult<()> {
        for (table, spec) in context.spec.migration_specs()? {
            if let Some(model) = context
                .models
                .values()
                .find(|model| model.migration && model.table == table)
            {
                logic_error!(
                    "Migration [{}] uses the table of model [{}]",
                    table,
                    model.key
                );
            }

            let owner = format!("migration [{}]", table);
            let mut migration = Migration::new(table.as_str());
            for (name, line) in &spec.columns {
                let call = line.as_deref().map(Call::parse).unwrap_or_default();
                if call.name().and_then(RelationType::from_keyword).is_some() {
                    logic_error!(
                        "Column [{}] of migration [{}] cannot declare a relation",
                        name,
                        table
                    );
                }
                migration.add_column(name.as_str(), classify_column(&owner, name, call)?);
            }
            check_auto_increment(&owner, migration.columns.values())?;
            check_physical_columns(&owner, migration.columns.values())?;

            for index in &spec.indexes {
                check_columns(&migration, "Index", &index.columns)?;
                migration.indexes.push(
                    Index::new(index.columns.clone())
                        .unique(index.unique)
                        .named(index.name.clone()),
                );
            }
            if let Some(primary) = &spec.primary {
                check_columns(&migration, "Primary key", &primary.columns)?;
                migration.primary = Some(primary.columns.clone());
            }
            migration.comment = spec.comment.clone();

            context.migrations.insert(table, migration);
        }

        Ok(())
    }
}

fn check_columns(migration: &Migration, role: &str, columns: &[String]) -> CoreResult<()> {
    for column in columns {
        if !migration.has_physical_column(column) {
            logic_error!(
                "{} column [{}] of migration [{}] does not exist",
                role,
                column,
                migration.table
            );
        }
    }
    Ok(())
}

/// One migration per model with a table of its own
pub struct ModelMigrations;

impl Pass for ModelMigrations {
    fn name(&self) -> &'static str {
        "model-migrations"
    }

    fn requires(&self) -> &'static [Stage] {
        &[Stage::ExplicitMigrations]
    }

    fn provides(&self) -> Stage {
        Stage::ModelMigrations
    }

    fn run(&self, context: &mut SchemaContext) -> CoreResult<()> {
        for model in context.models.values().filter(|model| model.migration) {
            let mut migration = Migration::new(model.table.as_str());
            for (key, column) in model.columns.iter() {
                migration.add_column(key, column.clone());
            }
            migration.indexes = model.indexes.clone();
            migration.model = Some(model.key.clone());

            context.migrations.insert(model.table.clone(), migration);
        }

        Ok(())
    }
}

/// Synthesizes pivot tables for many-to-many relations without a pivot model.
///
/// An explicit migration of the same table wins. Two relations sharing a
/// synthesized table must agree on its columns.
pub struct PivotMigrations;

impl Pass for PivotMigrations {
    fn name(&self) -> &'static str {
        "pivot-migrations"
    }

    fn requires(&self) -> &'static [Stage] {
        &[Stage::ModelMigrations]
    }

    fn provides(&self) -> Stage {
        Stage::PivotMigrations
    }

    fn run(&self, context: &mut SchemaContext) -> CoreResult<()> {
        let mut synthesized = Vec::new();
        for model in context.models.values() {
            for relation in model.relations.values() {
                if relation.kind.using().is_some() {
                    continue;
                }
                if let Some(migration) = pivot_migration(context, model, relation)? {
                    synthesized.push((model.key.clone(), relation.name.clone(), migration));
                }
            }
        }

        for (model, relation, migration) in synthesized {
            match context.migrations.get(&migration.table) {
                Some(existing) if existing.from_guessed_pivot => {
                    if existing.columns != migration.columns {
                        logic_error!(
                            "Pivot table [{}] of relation [{}] of model [{}] conflicts with the same table guessed for another relation",
                            migration.table,
                            relation,
                            model
                        );
                    }
                    tracing::trace!(table = %migration.table, relation = %relation, "pivot table already synthesized");
                }
                Some(_) => {
                    tracing::debug!(
                        table = %migration.table,
                        model = %model,
                        relation = %relation,
                        "existing migration replaces guessed pivot table"
                    );
                }
                None => {
                    tracing::debug!(table = %migration.table, model = %model, relation = %relation, "synthesized pivot table");
                    context.migrations.insert(migration.table.clone(), migration);
                }
            }
        }

        Ok(())
    }
}

fn pivot_migration(context: &SchemaContext, model: &Model, relation: &Relation) -> CoreResult<Option<Migration>> {
    let migration = match &relation.kind {
        RelationKind::BelongsToMany(payload) => {
            let target = context.model(&payload.model)?;
            let mut columns = vec![
                key_column(&payload.foreign_pivot_key, model),
                key_column(&payload.related_pivot_key, target),
            ];
            columns.sort_by(|a, b| a.name.cmp(&b.name));

            let mut migration = Migration::new(payload.table.as_str());
            migration.primary = Some(columns.iter().map(|column| column.name.clone()).collect());
            for column in columns {
                migration.add_column(column.name.clone(), column);
            }
            migration
        }
        RelationKind::MorphToMany(payload) | RelationKind::MorphedByMany(payload) => {
            let target = context.model(&payload.model)?;
            let (parent, related) = match relation.relation_type() {
                RelationType::MorphToMany => (model, target),
                _ => (target, model),
            };

            let related_key = foreign_key(&related.class, primary_name(related));
            let morph_type = match (parent.has_auto_increment_primary_key(), parent.has_uuid_primary_key()) {
                (_, true) => "uuidMorphs",
                (true, false) => "morphs",
                (false, false) => logic_error!(
                    "Model [{}] pointing to relation [{}] of model [{}] must use uuid or id",
                    parent.key,
                    relation.name,
                    model.key
                ),
            };

            let mut migration = Migration::new(payload.table.as_str());
            migration.add_column(related_key.clone(), key_column(&related_key, related));
            migration.add_column(
                payload.relation_key.clone(),
                Column::new(payload.relation_key.as_str(), morph_type),
            );
            migration
        }
        _ => return Ok(None),
    };

    Ok(Some(Migration {
        from_guessed_pivot: true,
        ..migration
    }))
}

/// Pivot column referencing the primary key of `model`
fn key_column(name: &str, model: &Model) -> Column {
    let (method, arguments) = foreign_method_of(model);
    Column::from_call(name, Call::new(vec![Method::new(method, arguments)]))
}
