use crate::context::SchemaContext;
use crate::pipeline::{Pass, Stage};
use draftsman_core::inflector::{plural, snake, studly};
use draftsman_core::{logic_error, CoreResult, GeneratorConfig, Toggle};
use draftsman_orm::{Model, ModelType};
use std::collections::HashMap;

/// Creates one model per declaration: identity, location, table and flags.
///
/// Requires `QuickModels`. Fails on duplicate class names (ignoring case) or
/// duplicate tables before any model is created.
pub struct ModelShells;

impl Pass for ModelShells {
    fn name(&self) -> &'static str {
        "model-shells"
    }

    fn requires(&self) -> &'static [Stage] {
        &[Stage::QuickModels]
    }

    fn provides(&self) -> Stage {
        Stage::ModelShells
    }

    fn run(&self, context: &mut SchemaContext) -> CoreResult<()> {
        let mut shells = Vec::with_capacity(context.declarations.len());
        let mut classes: HashMap<String, &str> = HashMap::new();
        let mut tables: HashMap<String, &str> = HashMap::new();

        for (key, declaration) in &context.declarations {
            let mut model = shell(&context.config, key);
            if let Some(table) = &declaration.table {
                model.table = table.clone();
            }

            if let Some(previous) = classes.insert(model.class.to_lowercase(), key) {
                logic_error!(
                    "Models [{}] and [{}] share the class name [{}]",
                    previous,
                    key,
                    model.class
                );
            }
            if let Some(previous) = tables.insert(model.table.clone(), key) {
                logic_error!(
                    "Models [{}] and [{}] share the table [{}]",
                    previous,
                    key,
                    model.table
                );
            }

            if let Some(model_type) = &declaration.model_type {
                model.model_type = match ModelType::parse(model_type) {
                    Some(model_type) => model_type,
                    None => logic_error!("Model [{}] has an unknown type [{}]", key, model_type),
                };
            }
            model.observer = declaration.observer;
            model.seeder = declaration.seeder;
            model.migration = declaration.has_migration();
            model.auto_id = declaration.auto_id;
            model.factory = declaration.factory_enabled();
            if let Some(Toggle::Value(factory)) = &declaration.factory {
                model.factory_states = factory.states.clone();
            }

            shells.push(model);
        }

        for model in shells {
            tracing::trace!(model = %model.key, class = %model.class, table = %model.table, "model shell created");
            context.models.insert(model.key.clone(), model);
        }

        Ok(())
    }
}

/// Identity of a model key such as `Admin/User`
pub(crate) fn shell(config: &GeneratorConfig, key: &str) -> Model {
    let segments: Vec<String> = key
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .map(studly)
        .collect();
    let (class, sub) = match segments.split_last() {
        Some((class, sub)) => (class.clone(), sub),
        None => (studly(key), &[][..]),
    };

    let mut namespace = config.model_namespace();
    let mut path = config.models_path.trim_end_matches('/').to_string();
    for segment in sub {
        namespace.push('\\');
        namespace.push_str(segment);
        path.push('/');
        path.push_str(segment);
    }
    path.push_str(&format!("/{}.php", class));

    let table = plural(&snake(&class));
    Model::new(key, class, namespace, path, table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::QuickModels;
    use draftsman_core::SchemaSpec;

    fn run(yaml: &str) -> CoreResult<SchemaContext> {
        let mut context = SchemaContext::new(GeneratorConfig::new(), SchemaSpec::from_yaml(yaml)?);
        QuickModels.run(&mut context)?;
        ModelShells.run(&mut context)?;
        Ok(context)
    }

    #[test]
    fn test_identity_of_nested_key() {
        let model = shell(&GeneratorConfig::new(), "Admin/blog_post");

        assert_eq!(model.class, "BlogPost");
        assert_eq!(model.namespace, "App\\Models\\Admin");
        assert_eq!(model.path, "app/Models/Admin/BlogPost.php");
        assert_eq!(model.table, "blog_posts");
    }

    #[test]
    fn test_explicit_table_and_type() {
        let context = run(
            "models:\n  Person:\n    columns:\n      name: string\n    table: folks\n    type: user\n",
        )
        .unwrap();
        let person = &context.models["Person"];

        assert_eq!(person.table, "folks");
        assert_eq!(person.model_type, ModelType::User);
    }

    #[test]
    fn test_duplicate_class_names_ignore_case() {
        let err = run("models:\n  User:\n    name: string\n  Admin/user:\n    name: string\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Models [User] and [Admin/user] share the class name [User]"
        );
    }

    #[test]
    fn test_duplicate_tables() {
        let yaml = "models:\n  Person:\n    name: string\n  Human:\n    columns:\n      name: string\n    table: people\n";
        let err = run(yaml).unwrap_err();
        assert_eq!(err.to_string(), "Models [Person] and [Human] share the table [people]");
    }

    #[test]
    fn test_unknown_type() {
        let err = run("models:\n  Post:\n    columns:\n      title: string\n    type: admin\n").unwrap_err();
        assert_eq!(err.to_string(), "Model [Post] has an unknown type [admin]");
    }
}
