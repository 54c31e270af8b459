use crate::artifacts::Artifacts;
use crate::context::SchemaContext;
use crate::pipeline::{Pass, Stage};
use draftsman_core::{CoreResult, Toggle};
use draftsman_orm::factory::guess_provider;
use draftsman_orm::{FactoryDefinition, FactoryField, Model};

/// Collects observer, seeder, scope, trait and cast stubs and factory hints
pub struct ArtifactsPass;

impl Pass for ArtifactsPass {
    fn name(&self) -> &'static str {
        "artifacts"
    }

    fn requires(&self) -> &'static [Stage] {
        &[Stage::PivotMigrations]
    }

    fn provides(&self) -> Stage {
        Stage::Artifacts
    }

    fn run(&self, context: &mut SchemaContext) -> CoreResult<()> {
        let mut artifacts = Artifacts::default();

        for model in context.models.values() {
            if model.observer {
                artifacts.observers.push(model.key.clone());
            }
            if model.seeder {
                artifacts.seeders.push(model.key.clone());
            }
            if !model.global_scopes.is_empty() {
                artifacts
                    .global_scopes
                    .insert(model.key.clone(), model.global_scopes.clone());
            }
            artifacts.quick_traits.extend(model.quick_traits.iter().cloned());
            artifacts.quick_casts.extend(model.quick_casts.iter().cloned());

            if model.factory && !model.is_pivot() {
                let mut definition = factory_for(model);
                if let Some(Toggle::Value(factory)) = &context.declaration(&model.key)?.factory {
                    for (field, expression) in &factory.fields {
                        definition.fields.insert(
                            field.clone(),
                            FactoryField::Expression {
                                value: expression.clone(),
                            },
                        );
                    }
                }
                artifacts.factories.insert(model.key.clone(), definition);
            }
        }

        tracing::debug!(
            factories = artifacts.factories.len(),
            observers = artifacts.observers.len(),
            seeders = artifacts.seeders.len(),
            "collected artifacts"
        );
        context.artifacts = artifacts;
        Ok(())
    }
}

/// Guessed factory fields for every fillable column of `model`
fn factory_for(model: &Model) -> FactoryDefinition {
    let mut definition = FactoryDefinition::new(model.key.as_str());
    definition.states = model.factory_states.clone();

    for column in model.columns.values() {
        if column.is_morphs() || !model.fillable.contains(&column.name) {
            continue;
        }

        let related = column
            .relation
            .as_deref()
            .and_then(|relation| model.relation(relation))
            .and_then(|relation| relation.as_belongs_to());
        let field = match related {
            Some(belongs_to) => FactoryField::Related {
                model: belongs_to.model.clone(),
            },
            None if matches!(column.column_type.as_str(), "json" | "jsonb") => FactoryField::Expression {
                value: "[]".to_string(),
            },
            None => match guess_provider(&column.name, &column.column_type, &column.arguments) {
                Some(provider) => FactoryField::Faker { provider },
                None => continue,
            },
        };
        definition.fields.insert(column.name.clone(), field);
    }

    definition
}
