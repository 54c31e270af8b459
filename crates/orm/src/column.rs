//! Table columns in Blueprint form.
//!
//! A column is one Blueprint builder call: a type method such as `string`,
//! the column name, the remaining arguments of the type method, and the
//! qualifier chain (`nullable`, `index`, `default:0`, ...).

use draftsman_core::lexer::{Argument, Call, Method};
use serde::{Deserialize, Serialize};

/// Auto-incrementing primary key builders
pub const AUTO_INCREMENT_TYPES: &[&str] = &[
    "id",
    "increments",
    "bigIncrements",
    "integerIncrements",
    "mediumIncrements",
    "smallIncrements",
    "tinyIncrements",
];

/// Shorthands expanding to `created_at` and `updated_at`
pub const TIMESTAMP_SHORTHANDS: &[&str] = &["timestamps", "timestampsTz", "nullableTimestamps"];

pub const SOFT_DELETE_SHORTHANDS: &[&str] = &["softDeletes", "softDeletesTz"];

/// Polymorphic column pair builders
pub const MORPH_TYPES: &[&str] = &["morphs", "uuidMorphs", "nullableMorphs", "nullableUuidMorphs"];

const INTEGER_TYPES: &[&str] = &[
    "integer",
    "bigInteger",
    "mediumInteger",
    "smallInteger",
    "tinyInteger",
    "unsignedInteger",
    "unsignedBigInteger",
    "unsignedMediumInteger",
    "unsignedSmallInteger",
    "unsignedTinyInteger",
    "foreignId",
];

const DATE_TIME_TYPES: &[&str] = &["dateTime", "dateTimeTz", "timestamp", "timestampTz"];

/// Default display name of a shorthand column key, `None` for regular keys
pub fn shorthand_name(key: &str) -> Option<&'static str> {
    match key {
        "timestamps" | "timestampsTz" | "nullableTimestamps" => Some("timestamps"),
        "softDeletes" | "softDeletesTz" => Some("deleted_at"),
        "rememberToken" => Some("remember_token"),
        _ => None,
    }
}

/// One table column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    /// Type method arguments following the column name, e.g. `100` in `string('title', 100)`
    pub arguments: Vec<Argument>,
    /// Qualifier chain in call order
    pub methods: Call,
    /// Relation that synthesized this column
    pub relation: Option<String>,
    pub comment: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            arguments: Vec::new(),
            methods: Call::default(),
            relation: None,
            comment: None,
        }
    }

    /// Build a column from a parsed line whose leading method is the type.
    /// A `comment:` qualifier is lifted into [`Column::comment`].
    pub fn from_call(name: impl Into<String>, mut call: Call) -> Self {
        let comment = call
            .remove("comment")
            .and_then(|method| method.value(0).map(str::to_string));
        let mut methods = call.methods().iter();
        let (column_type, arguments) = match methods.next() {
            Some(first) => (first.name.clone(), first.arguments.clone()),
            None => (String::new(), Vec::new()),
        };

        Self {
            name: name.into(),
            column_type,
            arguments,
            methods: Call::new(methods.cloned().collect()),
            relation: None,
            comment,
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<Argument>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn with_methods(mut self, methods: Call) -> Self {
        self.methods = methods;
        self
    }

    pub fn for_relation(mut self, relation: impl Into<String>) -> Self {
        self.relation = Some(relation.into());
        self
    }

    pub fn is_auto_increment(&self) -> bool {
        AUTO_INCREMENT_TYPES.contains(&self.column_type.as_str()) || self.methods.has("autoIncrement")
    }

    pub fn is_primary(&self) -> bool {
        self.is_auto_increment() || self.methods.has("primary")
    }

    pub fn is_uuid(&self) -> bool {
        matches!(self.column_type.as_str(), "uuid" | "foreignUuid")
    }

    pub fn is_nullable(&self) -> bool {
        self.methods.has("nullable")
            || matches!(
                self.column_type.as_str(),
                "nullableTimestamps" | "nullableMorphs" | "nullableUuidMorphs"
            )
    }

    pub fn is_timestamps(&self) -> bool {
        TIMESTAMP_SHORTHANDS.contains(&self.column_type.as_str())
    }

    pub fn is_soft_deletes(&self) -> bool {
        SOFT_DELETE_SHORTHANDS.contains(&self.column_type.as_str())
    }

    pub fn is_shorthand(&self) -> bool {
        shorthand_name(&self.column_type).is_some()
    }

    pub fn is_morphs(&self) -> bool {
        MORPH_TYPES.contains(&self.column_type.as_str())
    }

    pub fn is_for_relation(&self) -> bool {
        self.relation.is_some()
    }

    pub fn has_index(&self) -> bool {
        self.methods.has("index")
    }

    pub fn is_unique(&self) -> bool {
        self.methods.has("unique")
    }

    /// Names of the physical columns this call creates
    pub fn physical_names(&self) -> Vec<String> {
        if self.is_timestamps() {
            vec!["created_at".to_string(), "updated_at".to_string()]
        } else if self.is_morphs() {
            vec![format!("{}_type", self.name), format!("{}_id", self.name)]
        } else {
            vec![self.name.clone()]
        }
    }

    /// Attribute cast derived from the column type
    pub fn cast_type(&self) -> Option<String> {
        if self.is_primary() || self.is_for_relation() || self.is_shorthand() {
            return None;
        }

        let column_type = self.column_type.as_str();
        let cast = match column_type {
            "boolean" => "boolean".to_string(),
            "decimal" | "unsignedDecimal" => {
                let scale = self
                    .arguments
                    .get(1)
                    .filter(|argument| !argument.is_null())
                    .map(Argument::as_str)
                    .unwrap_or("2");
                format!("decimal:{}", scale)
            }
            "float" | "double" => "float".to_string(),
            "json" | "jsonb" => "array".to_string(),
            "date" => "date".to_string(),
            _ if INTEGER_TYPES.contains(&column_type) => "integer".to_string(),
            _ if DATE_TIME_TYPES.contains(&column_type) => "datetime".to_string(),
            _ => return None,
        };

        Some(cast)
    }

    /// Docblock type of the attribute, `?`-prefixed when nullable
    pub fn php_type(&self) -> String {
        let column_type = self.column_type.as_str();
        let base = if self.is_auto_increment() || INTEGER_TYPES.contains(&column_type) {
            "int"
        } else {
            match column_type {
                "boolean" => "bool",
                "float" | "double" => "float",
                "json" | "jsonb" => "array",
                "date" => "\\Illuminate\\Support\\Carbon",
                _ if DATE_TIME_TYPES.contains(&column_type) || self.is_soft_deletes() => {
                    "\\Illuminate\\Support\\Carbon"
                }
                _ => "string",
            }
        };

        if self.is_nullable() || self.is_soft_deletes() {
            format!("?{}", base)
        } else {
            base.to_string()
        }
    }

    /// Builder method and arguments of a foreign key referencing this column
    pub fn foreign_method(&self) -> (String, Vec<Argument>) {
        let method = match self.column_type.as_str() {
            "id" | "bigIncrements" => "unsignedBigInteger",
            "increments" | "integerIncrements" => "unsignedInteger",
            "mediumIncrements" => "unsignedMediumInteger",
            "smallIncrements" => "unsignedSmallInteger",
            "tinyIncrements" => "unsignedTinyInteger",
            "uuid" => "uuid",
            other => return (other.to_string(), self.arguments.clone()),
        };
        (method.to_string(), Vec::new())
    }

    /// Blueprint call chain, e.g. `$table->string('title', 100)->nullable()`
    pub fn blueprint(&self) -> String {
        let mut arguments = Vec::new();
        let named = match shorthand_name(&self.column_type) {
            Some("timestamps") | Some("remember_token") => false,
            Some(default) => self.name != default,
            None if self.column_type == "id" => self.name != "id",
            None => true,
        };
        if named {
            arguments.push(Argument::string(self.name.as_str()));
        }
        arguments.extend(self.arguments.iter().cloned());

        let mut chain = format!(
            "$table{}{}",
            Call::new(vec![Method::new(self.column_type.as_str(), arguments)]).render(),
            self.methods.render()
        );
        if let Some(comment) = &self.comment {
            chain.push_str(&Call::new(vec![Method::new("comment", vec![Argument::string(comment.as_str())])]).render());
        }
        chain
    }
}
