//! Normalized form of a relation declaration line

use draftsman_core::lexer::{Argument, Call, Method};
use draftsman_core::{logic_error, CoreError, CoreResult};
use draftsman_orm::{ModelKey, RelationType};

/// Qualifiers that belong to the column a relation stores its key in
pub const COLUMN_QUALIFIERS: &[&str] = &[
    "nullable",
    "index",
    "unique",
    "constrained",
    "cascadeOnDelete",
    "cascadeOnUpdate",
    "nullOnDelete",
    "restrictOnDelete",
    "comment",
];

/// A relation line split into its parts, e.g.
/// `belongsTo:User,author_id nullable withDefault`
#[derive(Debug, Clone)]
pub struct RelationLine {
    /// Declaring model
    pub model: ModelKey,
    pub name: String,
    pub kind: RelationType,
    /// Arguments of the leading relation method
    pub arguments: Vec<Argument>,
    /// Qualifiers moved to the synthesized column
    pub column_methods: Call,
    pub using: Option<String>,
    pub with_pivot: Vec<Argument>,
    /// Qualifiers kept on the relation call
    pub methods: Call,
}

impl RelationLine {
    pub fn parse(model: &str, name: &str, call: Call) -> CoreResult<Self> {
        let Some(first) = call.first() else {
            logic_error!("Relation [{}] of model [{}] is empty", name, model);
        };
        let kind = RelationType::from_keyword(&first.name).ok_or_else(|| {
            CoreError::logic(format!(
                "Column [{}] of model [{}] is not a relation",
                name, model
            ))
        })?;
        let arguments = first.arguments.clone();
        let mut methods = call.tail();

        let column_methods = if kind.needs_column() {
            methods.extract(COLUMN_QUALIFIERS)
        } else {
            Call::default()
        };
        if column_methods.has("index") && column_methods.has("unique") {
            logic_error!(
                "Column [{}] of model [{}] cannot be both index and unique",
                name,
                model
            );
        }

        let (using, with_pivot) = if kind.requires_pivot() {
            for option in ["using", "withPivot"] {
                if methods.count(option) > 1 {
                    logic_error!(
                        "Relation [{}] of model [{}] declares {} more than once",
                        name,
                        model,
                        option
                    );
                }
            }
            let using = methods.remove("using");
            let with_pivot = methods.remove("withPivot");
            (using, with_pivot)
        } else {
            (None, None)
        };
        let using = match using {
            Some(method) => match method.value(0) {
                Some(value) => Some(value.to_string()),
                None => logic_error!(
                    "Relation [{}] of model [{}] declares using without a pivot model",
                    name,
                    model
                ),
            },
            None => None,
        };

        if methods.has("withDefault") && !kind.accepts_with_default() {
            logic_error!(
                "Relation [{}] of model [{}] cannot use withDefault, only belongsTo, hasOne, hasOneThrough and morphOne relations can",
                name,
                model
            );
        }

        Ok(Self {
            model: model.to_string(),
            name: name.to_string(),
            kind,
            arguments,
            column_methods,
            using,
            with_pivot: with_pivot.map(|method| method.arguments).unwrap_or_default(),
            methods,
        })
    }

    /// Non-null argument of the relation method at `index`
    pub fn argument(&self, index: usize) -> Option<&str> {
        self.arguments
            .get(index)
            .filter(|argument| !argument.is_null())
            .map(Argument::as_str)
    }

    /// Column chain for a synthesized key column built with `method`
    pub fn column_call(&self, method: &str, arguments: Vec<Argument>) -> Call {
        let mut call = Call::new(vec![Method::new(method, arguments)]);
        call.extend(self.column_methods.clone());
        call
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> CoreResult<RelationLine> {
        RelationLine::parse("Post", "author", Call::parse(line))
    }

    #[test]
    fn test_column_qualifiers_move_to_column() {
        let line = parse("belongsTo:User,author_id nullable cascadeOnDelete withDefault").unwrap();

        assert_eq!(line.kind, RelationType::BelongsTo);
        assert_eq!(line.argument(0), Some("User"));
        assert_eq!(line.argument(1), Some("author_id"));
        assert_eq!(line.column_methods.len(), 2);
        assert_eq!(line.methods.len(), 1);
        assert!(line.methods.has("withDefault"));
    }

    #[test]
    fn test_pivot_options_are_consumed() {
        let line = RelationLine::parse(
            "User",
            "roles",
            Call::parse("belongsToMany using:RoleUser withPivot:active,level withTimestamps"),
        )
        .unwrap();

        assert_eq!(line.using.as_deref(), Some("RoleUser"));
        assert_eq!(line.with_pivot.len(), 2);
        assert_eq!(line.methods.len(), 1);
        assert!(line.column_methods.is_empty());
    }

    #[test]
    fn test_repeated_pivot_option() {
        let err = RelationLine::parse(
            "User",
            "roles",
            Call::parse("belongsToMany using:RoleUser using:Membership"),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Relation [roles] of model [User] declares using more than once"
        );
    }

    #[test]
    fn test_with_default_is_restricted() {
        let err = RelationLine::parse("User", "posts", Call::parse("hasMany withDefault")).unwrap_err();
        assert!(err.is_logic());
        assert!(err.to_string().starts_with("Relation [posts] of model [User] cannot use withDefault"));

        assert!(RelationLine::parse("User", "profile", Call::parse("hasOne withDefault")).is_ok());
        assert!(RelationLine::parse("Post", "image", Call::parse("morphOne withDefault")).is_ok());
    }

    #[test]
    fn test_index_and_unique_on_key_column() {
        let err = parse("belongsTo:User index unique").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Column [author] of model [Post] cannot be both index and unique"
        );

        let err = RelationLine::parse("Image", "imageable", Call::parse("morphTo unique index")).unwrap_err();
        assert!(err.is_logic());
        assert!(parse("belongsTo:User index").is_ok());
    }

    #[test]
    fn test_null_arguments_are_absent() {
        let line = parse("belongsTo:~,author_id").unwrap();
        assert_eq!(line.argument(0), None);
        assert_eq!(line.argument(1), Some("author_id"));
    }
}
