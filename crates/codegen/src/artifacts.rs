//! Side tables handed to the stub and factory emitters

use draftsman_orm::{FactoryDefinition, ModelKey};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Files to generate besides models and migrations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifacts {
    /// Models needing an observer class
    pub observers: Vec<ModelKey>,
    /// Models needing a seeder class
    pub seeders: Vec<ModelKey>,
    /// Global scope classes to stub, per model
    pub global_scopes: IndexMap<ModelKey, Vec<String>>,
    /// Unqualified traits to stub
    pub quick_traits: IndexSet<String>,
    /// Unqualified cast classes to stub
    pub quick_casts: IndexSet<String>,
    pub factories: IndexMap<ModelKey, FactoryDefinition>,
}

impl Artifacts {
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
            && self.seeders.is_empty()
            && self.global_scopes.is_empty()
            && self.quick_traits.is_empty()
            && self.quick_casts.is_empty()
            && self.factories.is_empty()
    }
}
