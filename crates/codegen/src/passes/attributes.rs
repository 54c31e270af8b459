use crate::context::SchemaContext;
use crate::pipeline::{Pass, Stage};
use draftsman_core::{logic_error, CoreResult, ModelSpec};
use draftsman_orm::{Index, Model, RelationKind};
use indexmap::{IndexMap, IndexSet};

/// Validates and derives model attributes that name columns or relations:
/// hidden, append, fillable, route key, timestamps, casts, eager loads,
/// scopes, traits and indexes.
pub struct ModelAttributes;

impl Pass for ModelAttributes {
    fn name(&self) -> &'static str {
        "model-attributes"
    }

    fn requires(&self) -> &'static [Stage] {
        &[Stage::MorphColumns]
    }

    fn provides(&self) -> Stage {
        Stage::ModelAttributes
    }

    fn run(&self, context: &mut SchemaContext) -> CoreResult<()> {
        let keys: Vec<String> = context.models.keys().cloned().collect();

        for key in keys {
            let declaration = context.declaration(&key)?.clone();
            let model = context.model(&key)?;
            let attributes = Attributes::derive(model, &declaration)?;
            check_eager_loads(context, &key, &declaration.with)?;

            let model = context.model_mut(&key)?;
            attributes.apply(model);
            model.eager = declaration.with.clone();
            model.local_scopes = declaration.local_scopes.clone();
            model.global_scopes = declaration.scopes.clone();
        }

        Ok(())
    }
}

/// Attributes computed from a model's resolved columns and its declaration
struct Attributes {
    hidden: IndexSet<String>,
    append: IndexSet<String>,
    fillable: IndexSet<String>,
    casts: IndexMap<String, String>,
    route_key: Option<String>,
    traits: Vec<String>,
    quick_traits: Vec<String>,
    quick_casts: Vec<String>,
    indexes: Vec<Index>,
}

impl Attributes {
    fn derive(model: &Model, declaration: &ModelSpec) -> CoreResult<Self> {
        let key = model.key.as_str();
        let append: IndexSet<String> = declaration.append.iter().cloned().collect();
        let known = |name: &str| model.has_physical_column(name) || append.contains(name);

        for column in &declaration.hidden {
            if !known(column) && model.relation(column).is_none() {
                logic_error!("Hidden column [{}] of model [{}] does not exist", column, key);
            }
        }
        let hidden: IndexSet<String> = declaration.hidden.iter().cloned().collect();

        let fillable = match &declaration.fillable {
            Some(fillable) => {
                for column in fillable {
                    if !model.has_physical_column(column) {
                        logic_error!("Fillable column [{}] of model [{}] does not exist", column, key);
                    }
                }
                fillable.iter().cloned().collect()
            }
            None => model
                .columns
                .values()
                .filter(|column| !column.is_primary() && !column.is_shorthand())
                .flat_map(|column| column.physical_names())
                .filter(|name| !hidden.contains(name))
                .collect(),
        };

        if let Some(route) = &declaration.route {
            if !model.has_physical_column(route) {
                logic_error!("Route key [{}] of model [{}] does not exist", route, key);
            }
        }

        if let Some(timestamps) = &model.timestamps {
            for column in [&timestamps.created_at, &timestamps.updated_at] {
                if !model.has_physical_column(column) {
                    logic_error!("Timestamp column [{}] of model [{}] does not exist", column, key);
                }
            }
        }

        let mut casts: IndexMap<String, String> = model
            .columns
            .values()
            .filter_map(|column| column.cast_type().map(|cast| (column.name.clone(), cast)))
            .collect();
        let mut quick_casts = Vec::new();
        for (column, cast) in &declaration.casts {
            if !known(column) {
                logic_error!("Cast column [{}] of model [{}] does not exist", column, key);
            }
            if is_quick_class(cast) && !quick_casts.contains(cast) {
                quick_casts.push(cast.clone());
            }
            casts.insert(column.clone(), cast.clone());
        }

        let mut indexes = Vec::with_capacity(declaration.indexes.len());
        for index in &declaration.indexes {
            for column in &index.columns {
                if !model.has_physical_column(column) {
                    logic_error!("Index column [{}] of model [{}] does not exist", column, key);
                }
            }
            indexes.push(
                Index::new(index.columns.clone())
                    .unique(index.unique)
                    .named(index.name.clone()),
            );
        }

        let quick_traits = declaration
            .traits
            .iter()
            .filter(|name| !name.contains('\\'))
            .cloned()
            .collect();

        Ok(Self {
            hidden,
            append,
            fillable,
            casts,
            route_key: declaration.route.clone(),
            traits: declaration.traits.clone(),
            quick_traits,
            quick_casts,
            indexes,
        })
    }

    fn apply(self, model: &mut Model) {
        model.hidden = self.hidden;
        model.append = self.append;
        model.fillable = self.fillable;
        model.casts = self.casts;
        model.route_key = self.route_key;
        model.traits = self.traits;
        model.quick_traits = self.quick_traits;
        model.quick_casts = self.quick_casts;
        model.indexes = self.indexes;
    }
}

/// Unqualified class name that needs a stub, as opposed to a built-in cast like `datetime` or `decimal:2`
fn is_quick_class(cast: &str) -> bool {
    cast.starts_with(|c: char| c.is_ascii_uppercase()) && !cast.contains(['\\', ':'])
}

/// Walk every dotted eager load path through the relations it names
fn check_eager_loads(context: &SchemaContext, key: &str, paths: &[String]) -> CoreResult<()> {
    for path in paths {
        let mut current = key.to_string();
        for segment in path.split('.') {
            let model = context.model(&current)?;
            let Some(relation) = model.relation(segment) else {
                logic_error!(
                    "Eager load [{}] of model [{}] references a non-existent relation [{}] of model [{}]",
                    path,
                    key,
                    segment,
                    current
                );
            };
            match (&relation.kind, relation.model()) {
                (RelationKind::MorphTo(_), _) | (_, None) => break,
                (_, Some(next)) => current = next.to_string(),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::is_quick_class;
    use crate::passes::resolve_until;

    #[test]
    fn test_default_fillable_and_hidden() {
        let yaml = "models:\n  User:\n    name: string\n    email: string unique\n    password: string\n    rememberToken: ~\n";
        let context = resolve_until(yaml, "model-attributes").unwrap();
        let user = &context.models["User"];

        let fillable: Vec<&str> = user.fillable.iter().map(String::as_str).collect();
        assert_eq!(fillable, vec!["name", "email"]);
        assert!(user.hidden.contains("password"));
        assert!(user.hidden.contains("remember_token"));
    }

    #[test]
    fn test_derived_and_explicit_casts() {
        let yaml = "models:\n  Order:\n    columns:\n      id: ~\n      paid: boolean\n      total: decimal:10,2\n      meta: json\n      status: string\n    casts:\n      status: OrderStatus\n      paid: boolean\n";
        let context = resolve_until(yaml, "model-attributes").unwrap();
        let order = &context.models["Order"];

        assert_eq!(order.casts.get("paid").map(String::as_str), Some("boolean"));
        assert_eq!(order.casts.get("total").map(String::as_str), Some("decimal:2"));
        assert_eq!(order.casts.get("meta").map(String::as_str), Some("array"));
        assert_eq!(order.casts.get("status").map(String::as_str), Some("OrderStatus"));
        assert_eq!(order.quick_casts, vec!["OrderStatus"]);
        assert!(order.casts.get("id").is_none());
    }

    #[test]
    fn test_unknown_columns_are_fatal() {
        let yaml = "models:\n  Post:\n    columns:\n      title: string\n    fillable: [title, body]\n";
        let err = resolve_until(yaml, "model-attributes").unwrap_err();
        assert_eq!(err.to_string(), "Fillable column [body] of model [Post] does not exist");

        let yaml = "models:\n  Post:\n    columns:\n      title: string\n    route: slug\n";
        let err = resolve_until(yaml, "model-attributes").unwrap_err();
        assert_eq!(err.to_string(), "Route key [slug] of model [Post] does not exist");

        let yaml = "models:\n  Post:\n    columns:\n      title: string\n    indexes:\n      - title,slug\n";
        let err = resolve_until(yaml, "model-attributes").unwrap_err();
        assert_eq!(err.to_string(), "Index column [slug] of model [Post] does not exist");

        let yaml = "models:\n  Post:\n    columns:\n      title: string\n    timestamps:\n      createdAt: published_at\n";
        let err = resolve_until(yaml, "model-attributes").unwrap_err();
        assert_eq!(err.to_string(), "Timestamp column [published_at] of model [Post] does not exist");
    }

    #[test]
    fn test_eager_paths() {
        let yaml = "models:\n  Country:\n    name: string\n  User:\n    country: belongsTo\n  Post:\n    columns:\n      user: belongsTo\n    with: [user.country]\n";
        let context = resolve_until(yaml, "model-attributes").unwrap();
        assert_eq!(context.models["Post"].eager, vec!["user.country"]);

        let yaml = "models:\n  Country:\n    name: string\n  User:\n    country: belongsTo\n  Post:\n    columns:\n      user: belongsTo\n    with: [user.region]\n";
        let err = resolve_until(yaml, "model-attributes").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Eager load [user.region] of model [Post] references a non-existent relation [region] of model [User]"
        );
    }

    #[test]
    fn test_quick_classes() {
        assert!(is_quick_class("OrderStatus"));
        assert!(!is_quick_class("App\\Casts\\Money"));
        assert!(!is_quick_class("decimal:2"));
        assert!(!is_quick_class("datetime"));
    }
}
