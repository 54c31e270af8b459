use crate::context::SchemaContext;
use crate::pipeline::{Pass, Stage};
use draftsman_core::lexer::Call;
use draftsman_core::specs::{scalar_line, ColumnLines};
use draftsman_core::{logic_error, CoreError, CoreResult, FactorySpec, ModelSpec, Toggle};
use draftsman_orm::column::{shorthand_name, TIMESTAMP_SHORTHANDS};
use draftsman_orm::RelationType;
use serde_yaml::{Mapping, Value};

/// Column name fragments whose values must not be serialized
const SECRET_MARKERS: &[&str] = &["password", "private", "hidden", "secret"];

/// Rewrites flat model declarations into the canonical `{columns: ...}` shape.
///
/// Requires nothing. Provides `declarations` for every model key, each with a
/// `columns` map.
pub struct QuickModels;

impl Pass for QuickModels {
    fn name(&self) -> &'static str {
        "quick-models"
    }

    fn requires(&self) -> &'static [Stage] {
        &[]
    }

    fn provides(&self) -> Stage {
        Stage::QuickModels
    }

    fn run(&self, context: &mut SchemaContext) -> CoreResult<()> {
        let mut declarations = Vec::with_capacity(context.spec.models.len());

        for (key, value) in &context.spec.models {
            let map = match value {
                Value::Mapping(map) if !map.is_empty() => map,
                _ => logic_error!(
                    "Model [{}] must be an associative array with a columns key",
                    key
                ),
            };

            let declaration = match map.get("columns") {
                Some(Value::Mapping(columns)) if !columns.is_empty() => {
                    ModelSpec::from_value(key, value.clone())?
                }
                Some(_) => logic_error!(
                    "Model [{}] must be an associative array with a columns key",
                    key
                ),
                None => {
                    tracing::trace!(model = %key, "normalizing quick model");
                    normalize_quick_model(key, map)?
                }
            };
            declarations.push((key.clone(), declaration));
        }

        context.declarations.extend(declarations);
        Ok(())
    }
}

fn normalize_quick_model(key: &str, map: &Mapping) -> CoreResult<ModelSpec> {
    let mut declaration = ModelSpec::default();

    for (name, value) in map {
        let Some(name) = name.as_str() else {
            logic_error!("Model [{}] has a column whose name is not a string", key);
        };

        match (name, value) {
            ("traits", Value::Sequence(traits)) => {
                declaration.traits = traits
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect();
            }
            ("factory", Value::Bool(_) | Value::Mapping(_)) => {
                let factory: Toggle<FactorySpec> = serde_yaml::from_value(value.clone())
                    .map_err(|err| {
                        CoreError::logic(format!(
                            "Model [{}] has an invalid factory declaration: {}",
                            key, err
                        ))
                    })?;
                declaration.factory = Some(factory);
            }
            _ => match scalar_line(value) {
                Some(line) => {
                    declaration.columns.insert(name.to_string(), line);
                }
                None => logic_error!(
                    "Column [{}] of model [{}] must be a string, number, boolean or null",
                    name,
                    key
                ),
            },
        }
    }

    let columns = &mut declaration.columns;
    if columns.contains_key("uuid") {
        if columns.shift_remove("id").is_some() {
            tracing::debug!(model = %key, "uuid column replaces the declared id as primary key");
        }
    } else if !columns.contains_key("id") && !declares_primary(columns) {
        columns.shift_insert(0, "id".to_string(), None);
        declaration.auto_id = true;
    }
    if !TIMESTAMP_SHORTHANDS
        .iter()
        .any(|shorthand| columns.contains_key(*shorthand))
    {
        columns.insert("timestamps".to_string(), None);
    }

    for (name, line) in columns.iter() {
        let is_relation = line
            .as_deref()
            .and_then(|line| Call::parse(line).name().and_then(RelationType::from_keyword))
            .is_some();
        if is_relation {
            continue;
        }

        let lower = name.to_lowercase();
        if name == "rememberToken" || SECRET_MARKERS.iter().any(|marker| lower.contains(marker)) {
            declaration
                .hidden
                .push(shorthand_name(name).unwrap_or(name).to_string());
        }
    }

    if columns.contains_key("password") || columns.contains_key("rememberToken") {
        declaration.model_type = Some("user".to_string());
    }

    Ok(declaration)
}

/// Whether a plain column line already carries a `primary` qualifier
fn declares_primary(columns: &ColumnLines) -> bool {
    columns.values().flatten().any(|line| {
        let call = Call::parse(line);
        call.name().and_then(RelationType::from_keyword).is_none() && call.has("primary")
    })
}
