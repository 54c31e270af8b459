use crate::errors::{CoreError, CoreResult};
use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::Path;

/// Ordered column declarations; `None` is a bare `name: ~` line
pub type ColumnLines = IndexMap<String, Option<String>>;

/// Raw declarative schema as read from a draft file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaSpec {
    /// Root namespace override for this run
    #[serde(default)]
    pub namespace: Option<String>,
    /// Model declarations keyed by model key; quick or custom, normalized later
    #[serde(default)]
    pub models: IndexMap<String, Value>,
    /// Explicit table declarations keyed by table name
    #[serde(default)]
    pub migrations: IndexMap<String, Value>,
}

impl SchemaSpec {
    /// Create a schema spec from YAML string
    pub fn from_yaml(yaml: &str) -> CoreResult<Self> {
        let spec: Option<Self> = serde_yaml::from_str(yaml)?;
        Ok(spec.unwrap_or_default())
    }

    /// Read and parse a draft file
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Convert schema spec to YAML string
    pub fn to_yaml(&self) -> CoreResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Parse every explicit migration declaration
    pub fn migration_specs(&self) -> CoreResult<IndexMap<String, MigrationSpec>> {
        self.migrations
            .iter()
            .map(|(table, value)| Ok((table.clone(), MigrationSpec::from_value(table, value)?)))
            .collect()
    }
}

/// Either a plain on/off switch or a detailed block, e.g. `timestamps: false`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Toggle<T> {
    Flag(bool),
    Value(T),
}

impl<T> Toggle<T> {
    pub fn is_disabled(&self) -> bool {
        matches!(self, Toggle::Flag(false))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Toggle::Value(value) => Some(value),
            Toggle::Flag(_) => None,
        }
    }
}

/// Canonical (custom) model declaration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ModelSpec {
    #[serde(deserialize_with = "deserialize_column_lines")]
    pub columns: ColumnLines,
    pub table: Option<String>,
    #[serde(rename = "type")]
    pub model_type: Option<String>,
    pub primary: Option<Toggle<PrimarySpec>>,
    pub timestamps: Option<Toggle<TimestampsSpec>>,
    pub fillable: Option<Vec<String>>,
    pub hidden: Vec<String>,
    pub append: Vec<String>,
    pub with: Vec<String>,
    pub scopes: Vec<String>,
    pub local_scopes: Vec<String>,
    pub indexes: Vec<IndexSpec>,
    pub route: Option<String>,
    pub observer: bool,
    pub seeder: bool,
    pub factory: Option<Toggle<FactorySpec>>,
    pub traits: Vec<String>,
    pub casts: IndexMap<String, String>,
    pub migration: Option<bool>,
    /// Set when quick normalization prepended the `id` column
    #[serde(skip)]
    pub auto_id: bool,
}

impl ModelSpec {
    /// Deserialize a custom declaration, naming the model on failure
    pub fn from_value(key: &str, value: Value) -> CoreResult<Self> {
        serde_yaml::from_value(value).map_err(|err| {
            CoreError::logic(format!("Model [{}] has an invalid declaration: {}", key, err))
        })
    }

    /// Whether the declaration wants its own table migration
    pub fn has_migration(&self) -> bool {
        self.migration.unwrap_or(true)
    }

    pub fn factory_enabled(&self) -> bool {
        !self.factory.as_ref().is_some_and(Toggle::is_disabled)
    }
}

/// Primary key override: `{column, type, incrementing}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrimarySpec {
    pub column: Option<String>,
    #[serde(rename = "type")]
    pub key_type: Option<String>,
    pub incrementing: Option<bool>,
}

/// Timestamp column renames
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct TimestampsSpec {
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Factory overrides: explicit field expressions plus named states
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FactorySpec {
    pub fields: IndexMap<String, String>,
    pub states: IndexMap<String, IndexMap<String, serde_json::Value>>,
}

/// Index declaration: `"a,b"`, `[a, b]` or `{columns, unique, name}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawIndexSpec")]
pub struct IndexSpec {
    pub columns: Vec<String>,
    pub unique: bool,
    pub name: Option<String>,
}

impl IndexSpec {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            unique: false,
            name: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColumnList {
    Joined(String),
    List(Vec<String>),
}

impl ColumnList {
    fn into_vec(self) -> Vec<String> {
        match self {
            ColumnList::Joined(joined) => joined
                .split(',')
                .map(str::trim)
                .filter(|column| !column.is_empty())
                .map(str::to_string)
                .collect(),
            ColumnList::List(list) => list,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIndexSpec {
    Columns(ColumnList),
    Detailed {
        columns: ColumnList,
        #[serde(default)]
        unique: bool,
        #[serde(default)]
        name: Option<String>,
    },
}

impl From<RawIndexSpec> for IndexSpec {
    fn from(raw: RawIndexSpec) -> Self {
        match raw {
            RawIndexSpec::Columns(columns) => IndexSpec::new(columns.into_vec()),
            RawIndexSpec::Detailed {
                columns,
                unique,
                name,
            } => IndexSpec {
                columns: columns.into_vec(),
                unique,
                name,
            },
        }
    }
}

/// Explicit table declaration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MigrationSpec {
    #[serde(deserialize_with = "deserialize_column_lines")]
    pub columns: ColumnLines,
    pub indexes: Vec<IndexSpec>,
    pub primary: Option<IndexSpec>,
    pub comment: Option<String>,
}

impl MigrationSpec {
    /// Accepts both the flat column map and the `{columns, indexes, ...}` block
    pub fn from_value(table: &str, value: &Value) -> CoreResult<Self> {
        let invalid = |err: serde_yaml::Error| {
            CoreError::logic(format!(
                "Migration [{}] has an invalid declaration: {}",
                table, err
            ))
        };

        match value {
            Value::Mapping(map) if map.get("columns").is_some_and(Value::is_mapping) => {
                serde_yaml::from_value(value.clone()).map_err(invalid)
            }
            Value::Mapping(map) if !map.is_empty() => {
                let columns = deserialize_column_lines(value.clone()).map_err(invalid)?;
                Ok(Self {
                    columns,
                    ..Self::default()
                })
            }
            _ => Err(CoreError::logic(format!(
                "Migration [{}] must be an associative array of columns",
                table
            ))),
        }
    }
}

/// Stringify a scalar YAML value. The outer `None` marks a collection,
/// `Some(None)` a null line.
pub fn scalar_line(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::String(s) => Some(Some(s.clone())),
        Value::Number(n) => Some(Some(n.to_string())),
        Value::Bool(b) => Some(Some(b.to_string())),
        _ => None,
    }
}

fn deserialize_column_lines<'de, D>(deserializer: D) -> Result<ColumnLines, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(name, value)| match scalar_line(&value) {
            Some(line) => Ok((name, line)),
            None => Err(de::Error::custom(format!(
                "column [{}] must be a string, number, boolean or null",
                name
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_spec_yaml() {
        let yaml = r#"
namespace: Acme
models:
  User:
    name: string
    email: string unique
  Post:
    columns:
      title: string:100
      author: belongsTo:User
    fillable: [title]
migrations:
  settings:
    key: string
    value: text nullable
"#;

        let spec = SchemaSpec::from_yaml(yaml).unwrap();
        assert_eq!(spec.namespace.as_deref(), Some("Acme"));
        assert_eq!(
            spec.models.keys().collect::<Vec<_>>(),
            vec!["User", "Post"]
        );

        let migrations = spec.migration_specs().unwrap();
        let settings = &migrations["settings"];
        assert_eq!(settings.columns.len(), 2);
        assert_eq!(settings.columns["value"].as_deref(), Some("text nullable"));
    }

    #[test]
    fn test_empty_document() {
        let spec = SchemaSpec::from_yaml("").unwrap();
        assert!(spec.models.is_empty());
        assert!(spec.migrations.is_empty());
    }

    #[test]
    fn test_model_spec_custom_keys() {
        let yaml = r#"
columns:
  id: ~
  age: 42
  active: true
table: people
type: user
primary: false
timestamps:
  createdAt: born_at
localScopes: [adults]
indexes:
  - "first,last"
  - [age]
  - { columns: [email], unique: true, name: people_email_unique }
factory: false
migration: false
"#;
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        let spec = ModelSpec::from_value("Person", value).unwrap();

        assert_eq!(spec.columns["id"], None);
        assert_eq!(spec.columns["age"].as_deref(), Some("42"));
        assert_eq!(spec.columns["active"].as_deref(), Some("true"));
        assert_eq!(spec.table.as_deref(), Some("people"));
        assert!(spec.primary.as_ref().unwrap().is_disabled());
        assert_eq!(
            spec.timestamps.as_ref().unwrap().value().unwrap().created_at.as_deref(),
            Some("born_at")
        );
        assert_eq!(spec.local_scopes, vec!["adults"]);
        assert_eq!(spec.indexes[0].columns, vec!["first", "last"]);
        assert_eq!(spec.indexes[1].columns, vec!["age"]);
        assert!(spec.indexes[2].unique);
        assert!(!spec.factory_enabled());
        assert!(!spec.has_migration());
    }

    #[test]
    fn test_model_spec_rejects_nested_column() {
        let value: Value = serde_yaml::from_str("columns:\n  name:\n    - string\n").unwrap();
        let err = ModelSpec::from_value("User", value).unwrap_err();
        assert!(err.is_logic());
        assert!(err.to_string().contains("Model [User]"));
        assert!(err.to_string().contains("column [name]"));
    }

    #[test]
    fn test_migration_spec_block_form() {
        let yaml = r#"
columns:
  user_id: unsignedBigInteger
  role_id: unsignedBigInteger
primary: user_id,role_id
indexes:
  - role_id
comment: Role assignments
"#;
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        let spec = MigrationSpec::from_value("role_user", &value).unwrap();

        assert_eq!(spec.columns.len(), 2);
        assert_eq!(spec.primary.unwrap().columns, vec!["user_id", "role_id"]);
        assert_eq!(spec.indexes.len(), 1);
        assert_eq!(spec.comment.as_deref(), Some("Role assignments"));
    }

    #[test]
    fn test_migration_spec_rejects_scalars() {
        let err = MigrationSpec::from_value("logs", &Value::Null).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Migration [logs] must be an associative array of columns"
        );
    }
}
