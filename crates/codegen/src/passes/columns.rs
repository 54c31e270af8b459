use crate::context::SchemaContext;
use crate::pipeline::{Pass, Stage};
use draftsman_core::lexer::{Argument, Call, Method};
use draftsman_core::{logic_error, CoreResult, Toggle};
use draftsman_orm::column::shorthand_name;
use draftsman_orm::{Column, KeyType, PrimaryKey, RelationType, SoftDelete, Timestamps};
use std::collections::HashSet;

/// Turns declared column lines into columns and derives primary key,
/// timestamps and soft delete.
///
/// Requires `RelationReservations`. Lines of relations stored in a local
/// column (`belongsTo`, `morphTo`) leave a pending column slot at their
/// position; other relation lines contribute no column.
pub struct Columns;

impl Pass for Columns {
    fn name(&self) -> &'static str {
        "columns"
    }

    fn requires(&self) -> &'static [Stage] {
        &[Stage::RelationReservations]
    }

    fn provides(&self) -> Stage {
        Stage::Columns
    }

    fn run(&self, context: &mut SchemaContext) -> CoreResult<()> {
        let keys: Vec<String> = context.declarations.keys().cloned().collect();

        for key in keys {
            let declaration = context.declaration(&key)?.clone();
            let owner = format!("model [{}]", key);
            let model = context.model_mut(&key)?;

            for (name, line) in &declaration.columns {
                let call = line.as_deref().map(Call::parse).unwrap_or_default();
                if let Some(kind) = call.name().and_then(RelationType::from_keyword) {
                    if kind.needs_column() {
                        model.columns.reserve(name.as_str());
                    }
                    continue;
                }

                let column = classify_column(&owner, name, call)?;
                model.columns.resolve(name.as_str(), column);
            }

            check_auto_increment(&owner, model.columns.values())?;
            check_physical_columns(&owner, model.columns.values())?;

            model.primary = match &declaration.primary {
                Some(Toggle::Flag(false)) => None,
                Some(Toggle::Value(primary)) => {
                    let column_name = primary.column.as_deref().unwrap_or("id");
                    let Some(column) = model.column_named(column_name) else {
                        logic_error!(
                            "Primary key column [{}] of model [{}] does not exist",
                            column_name,
                            key
                        );
                    };
                    let mut derived = PrimaryKey::from_column(column);
                    if let Some(key_type) = &primary.key_type {
                        derived.key_type = match key_type.as_str() {
                            "int" | "integer" => KeyType::Int,
                            _ => KeyType::String,
                        };
                    }
                    if let Some(incrementing) = primary.incrementing {
                        derived.incrementing = incrementing;
                    }
                    Some(derived)
                }
                _ => model
                    .columns
                    .values()
                    .find(|column| column.is_primary())
                    .map(PrimaryKey::from_column),
            };

            model.timestamps = match &declaration.timestamps {
                Some(Toggle::Flag(false)) => None,
                Some(Toggle::Value(timestamps)) => Some(Timestamps::new(
                    timestamps.created_at.as_deref().unwrap_or("created_at"),
                    timestamps.updated_at.as_deref().unwrap_or("updated_at"),
                )),
                _ => model
                    .columns
                    .values()
                    .any(Column::is_timestamps)
                    .then(Timestamps::default),
            };
            model.soft_delete = model
                .columns
                .values()
                .find(|column| column.is_soft_deletes())
                .map(|column| SoftDelete::new(column.name.as_str()));
        }

        Ok(())
    }
}

/// Classify one declared column line. `owner` names the model or migration in errors.
pub(crate) fn classify_column(owner: &str, name: &str, call: Call) -> CoreResult<Column> {
    let column = match name {
        "id" => {
            let (column_type, column_name, methods) = match call.first() {
                Some(first) => (
                    first.name.clone(),
                    first
                        .first_non_null()
                        .map(|argument| argument.as_str().to_string())
                        .unwrap_or_else(|| "id".to_string()),
                    call.tail(),
                ),
                None => ("id".to_string(), "id".to_string(), Call::default()),
            };
            let mut column = Column::from_call(column_name, Call::new(vec![Method::bare(column_type)]));
            column.methods = methods;
            lift_comment(&mut column);
            if !column.is_primary() {
                column.methods.push(Method::bare("primary"));
            }
            column
        }
        "uuid" => {
            let (column_name, methods) = match call.first() {
                Some(first) if first.name == "uuid" => (
                    first
                        .first_non_null()
                        .map(|argument| argument.as_str().to_string())
                        .unwrap_or_else(|| "id".to_string()),
                    call.tail(),
                ),
                _ => ("id".to_string(), call),
            };
            let mut column = Column::new(column_name, "uuid").with_methods(methods);
            lift_comment(&mut column);
            if !column.methods.has("primary") {
                column.methods.push(Method::bare("primary"));
            }
            column
        }
        _ if shorthand_name(name).is_some() => shorthand_column(name, call),
        _ if call.is_empty() => Column::new(name, name),
        _ => Column::from_call(name, call),
    };

    if column.has_index() && column.is_unique() {
        logic_error!(
            "Column [{}] of {} cannot be both index and unique",
            name,
            owner
        );
    }

    Ok(column)
}

fn shorthand_column(key: &str, call: Call) -> Column {
    let default_name = shorthand_name(key).unwrap_or(key);
    let (arguments, methods) = match call.first() {
        Some(first) if first.name == key => (first.arguments.clone(), call.tail()),
        _ => (Vec::new(), call),
    };

    let named = !matches!(default_name, "timestamps" | "remember_token");
    let mut arguments = arguments.into_iter();
    let column_name = if named {
        match arguments.next() {
            Some(argument) if !argument.is_null() => argument.as_str().to_string(),
            _ => default_name.to_string(),
        }
    } else {
        default_name.to_string()
    };
    let remaining: Vec<Argument> = arguments.collect();

    let mut column = Column::new(column_name, key)
        .with_arguments(remaining)
        .with_methods(methods);
    lift_comment(&mut column);
    column
}

fn lift_comment(column: &mut Column) {
    if let Some(comment) = column.methods.remove("comment") {
        column.comment = comment.value(0).map(str::to_string);
    }
}

/// At most one auto-incrementing column per table
pub(crate) fn check_auto_increment<'a>(
    owner: &str,
    columns: impl Iterator<Item = &'a Column>,
) -> CoreResult<()> {
    if columns.filter(|column| column.is_auto_increment()).count() > 1 {
        logic_error!("{} has more than one auto-incrementing column", capitalized(owner));
    }
    Ok(())
}

/// Physical column names are unique per table and at most one column is the primary key
pub(crate) fn check_physical_columns<'a>(
    owner: &str,
    columns: impl Iterator<Item = &'a Column>,
) -> CoreResult<()> {
    let mut seen = HashSet::new();
    let mut primary: Option<&str> = None;

    for column in columns {
        for physical in column.physical_names() {
            if !seen.insert(physical.clone()) {
                logic_error!(
                    "{} declares column [{}] more than once",
                    capitalized(owner),
                    physical
                );
            }
        }
        if column.is_primary() {
            if let Some(first) = primary {
                logic_error!(
                    "{} has more than one primary key column, [{}] and [{}]",
                    capitalized(owner),
                    first,
                    column.name
                );
            }
            primary = Some(column.name.as_str());
        }
    }
    Ok(())
}

fn capitalized(owner: &str) -> String {
    let mut owner = owner.to_string();
    if let Some(first) = owner.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    owner
}
