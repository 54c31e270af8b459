//! Factory hints handed to the factory emitter

use crate::ModelKey;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub mod fake_data;

pub use fake_data::guess_provider;

/// How one attribute of a factory definition is filled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FactoryField {
    /// `fake()-><provider>`
    Faker { provider: String },
    /// Factory of a related model, for foreign keys
    Related { model: ModelKey },
    /// Expression given verbatim in the declaration
    Expression { value: String },
}

impl FactoryField {
    pub fn render(&self, class_of: impl Fn(&str) -> String) -> String {
        match self {
            FactoryField::Faker { provider } => format!("fake()->{}", provider),
            FactoryField::Related { model } => format!("{}::factory()", class_of(model)),
            FactoryField::Expression { value } => value.clone(),
        }
    }
}

/// Factory of one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryDefinition {
    pub model: ModelKey,
    pub fields: IndexMap<String, FactoryField>,
    pub states: IndexMap<String, IndexMap<String, serde_json::Value>>,
}

impl FactoryDefinition {
    pub fn new(model: impl Into<ModelKey>) -> Self {
        Self {
            model: model.into(),
            fields: IndexMap::new(),
            states: IndexMap::new(),
        }
    }

    /// Models whose factories this one depends on
    pub fn related_models(&self) -> Vec<&str> {
        self.fields
            .values()
            .filter_map(|field| match field {
                FactoryField::Related { model } => Some(model.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_fields() {
        let mut definition = FactoryDefinition::new("Post");
        definition.fields.insert(
            "title".to_string(),
            FactoryField::Faker {
                provider: "sentence(4)".to_string(),
            },
        );
        definition.fields.insert(
            "user_id".to_string(),
            FactoryField::Related {
                model: "Admin/User".to_string(),
            },
        );

        let class_of = |key: &str| key.rsplit('/').next().unwrap_or(key).to_string();
        assert_eq!(definition.fields["title"].render(class_of), "fake()->sentence(4)");
        assert_eq!(definition.fields["user_id"].render(class_of), "User::factory()");
        assert_eq!(definition.related_models(), vec!["Admin/User"]);
    }
}
