//! Migration Definitions - table definitions derived from models, explicit
//! declarations and guessed pivots

use crate::column::Column;
use crate::ModelKey;
use draftsman_core::lexer::{Argument, Call, Method};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Plain or unique index over one or more columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub columns: Vec<String>,
    pub unique: bool,
    pub name: Option<String>,
}

impl Index {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            unique: false,
            name: None,
        }
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn named(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    /// Blueprint call, e.g. `$table->unique(['email', 'team_id'])`
    pub fn blueprint(&self) -> String {
        let method = if self.unique { "unique" } else { "index" };
        match &self.name {
            Some(name) => format!(
                "$table->{}({}, {})",
                method,
                column_array(&self.columns),
                Argument::string(name.as_str()).render()
            ),
            None => format!("$table->{}({})", method, column_array(&self.columns)),
        }
    }
}

/// One table definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Migration {
    pub table: String,
    pub columns: IndexMap<String, Column>,
    pub indexes: Vec<Index>,
    /// Composite primary key override
    pub primary: Option<Vec<String>>,
    pub comment: Option<String>,
    /// Synthesized for a many-to-many relation without a pivot model
    pub from_guessed_pivot: bool,
    /// Model whose table this is
    pub model: Option<ModelKey>,
}

impl Migration {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: IndexMap::new(),
            indexes: Vec::new(),
            primary: None,
            comment: None,
            from_guessed_pivot: false,
            model: None,
        }
    }

    pub fn add_column(&mut self, key: impl Into<String>, column: Column) {
        self.columns.insert(key.into(), column);
    }

    /// Find a column by its physical name, looking inside shorthand expansions
    pub fn has_physical_column(&self, name: &str) -> bool {
        self.columns
            .values()
            .any(|column| column.physical_names().iter().any(|physical| physical == name))
    }

    /// Every Blueprint statement of the `up` body in order
    pub fn blueprint_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.columns.values().map(Column::blueprint).collect();
        if let Some(primary) = &self.primary {
            lines.push(format!("$table->primary({})", column_array(primary)));
        }
        lines.extend(self.indexes.iter().map(Index::blueprint));
        if let Some(comment) = &self.comment {
            lines.push(format!(
                "$table{}",
                Call::new(vec![Method::new("comment", vec![Argument::string(comment.as_str())])])
                    .render()
            ));
        }
        lines
    }
}

fn column_array(columns: &[String]) -> String {
    let quoted: Vec<String> = columns
        .iter()
        .map(|column| Argument::string(column.as_str()).render())
        .collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_blueprint() {
        let index = Index::new(vec!["email".to_string(), "team_id".to_string()]).unique(true);
        assert_eq!(index.blueprint(), "$table->unique(['email', 'team_id'])");

        let named = Index::new(vec!["slug".to_string()]).named(Some("posts_slug".to_string()));
        assert_eq!(named.blueprint(), "$table->index(['slug'], 'posts_slug')");
    }

    #[test]
    fn test_blueprint_lines() {
        let mut migration = Migration::new("role_user");
        migration.add_column("role_id", Column::new("role_id", "unsignedBigInteger"));
        migration.add_column("user_id", Column::new("user_id", "unsignedBigInteger"));
        migration.primary = Some(vec!["role_id".to_string(), "user_id".to_string()]);

        assert_eq!(
            migration.blueprint_lines(),
            vec![
                "$table->unsignedBigInteger('role_id')",
                "$table->unsignedBigInteger('user_id')",
                "$table->primary(['role_id', 'user_id'])",
            ]
        );
    }

    #[test]
    fn test_physical_column_lookup() {
        let mut migration = Migration::new("posts");
        migration.add_column("timestamps", Column::new("timestamps", "timestamps"));

        assert!(migration.has_physical_column("updated_at"));
        assert!(!migration.has_physical_column("timestamps_at"));
    }
}
