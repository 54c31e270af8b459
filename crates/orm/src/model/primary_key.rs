//! Primary key descriptors
//!
//! Describes how a model is identified: which column, which Blueprint builder
//! created it, its key type and whether the database assigns it.

use crate::column::Column;
use serde::{Deserialize, Serialize};

/// Eloquent `$keyType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    Int,
    String,
}

impl KeyType {
    pub fn as_str(self) -> &'static str {
        match self {
            KeyType::Int => "int",
            KeyType::String => "string",
        }
    }

    /// Key type of a column built with `method`
    pub fn for_method(method: &str) -> Self {
        match method {
            "uuid" | "ulid" | "string" | "char" | "foreignUuid" => KeyType::String,
            _ => KeyType::Int,
        }
    }
}

impl std::fmt::Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved primary key of a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryKey {
    /// Blueprint builder of the key column, e.g. `id` or `uuid`
    pub using: String,
    pub column: String,
    #[serde(rename = "type")]
    pub key_type: KeyType,
    pub incrementing: bool,
}

impl PrimaryKey {
    /// The conventional `id` auto-incrementing key
    pub fn id() -> Self {
        Self {
            using: "id".to_string(),
            column: "id".to_string(),
            key_type: KeyType::Int,
            incrementing: true,
        }
    }

    /// Derive the key from the column that declares it
    pub fn from_column(column: &Column) -> Self {
        Self {
            using: column.column_type.clone(),
            column: column.name.clone(),
            key_type: KeyType::for_method(&column.column_type),
            incrementing: column.is_auto_increment(),
        }
    }

    pub fn is_uuid(&self) -> bool {
        self.using == "uuid"
    }

    /// Whether the generated model must override Eloquent's `id`/int/incrementing defaults
    pub fn is_conventional(&self) -> bool {
        self.column == "id" && self.key_type == KeyType::Int && self.incrementing
    }
}

impl Default for PrimaryKey {
    fn default() -> Self {
        Self::id()
    }
}
