use super::primary_key::PrimaryKey;
use super::timestamps::{SoftDelete, Timestamps};
use crate::column::Column;
use crate::migrations::Index;
use crate::relationships::{BelongsTo, MorphTo, Relation};
use crate::slot::SlotMap;
use crate::ModelKey;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Base class family of a generated model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModelType {
    #[default]
    Model,
    User,
    Pivot,
    MorphPivot,
}

impl ModelType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "model" => Some(Self::Model),
            "user" => Some(Self::User),
            "pivot" => Some(Self::Pivot),
            "morphPivot" => Some(Self::MorphPivot),
            _ => None,
        }
    }

    /// Fully qualified class the model extends
    pub fn base_class(self) -> &'static str {
        match self {
            Self::Model => "Illuminate\\Database\\Eloquent\\Model",
            Self::User => "Illuminate\\Foundation\\Auth\\User",
            Self::Pivot => "Illuminate\\Database\\Eloquent\\Relations\\Pivot",
            Self::MorphPivot => "Illuminate\\Database\\Eloquent\\Relations\\MorphPivot",
        }
    }

    pub fn is_pivot(self) -> bool {
        matches!(self, Self::Pivot | Self::MorphPivot)
    }
}

/// One resolved data entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub key: ModelKey,
    pub class: String,
    pub namespace: String,
    pub path: String,
    pub table: String,
    pub model_type: ModelType,
    /// Declared columns keyed by declaration key; relation columns sit at the relation's key
    pub columns: SlotMap<Column>,
    pub relations: SlotMap<Relation>,
    pub primary: Option<PrimaryKey>,
    pub timestamps: Option<Timestamps>,
    pub soft_delete: Option<SoftDelete>,
    pub fillable: IndexSet<String>,
    pub hidden: IndexSet<String>,
    pub append: IndexSet<String>,
    pub casts: IndexMap<String, String>,
    pub eager: Vec<String>,
    pub indexes: Vec<Index>,
    pub route_key: Option<String>,
    pub local_scopes: Vec<String>,
    pub global_scopes: Vec<String>,
    pub traits: Vec<String>,
    /// Unqualified traits that need a stub file
    pub quick_traits: Vec<String>,
    /// Unqualified cast classes that need a stub file
    pub quick_casts: Vec<String>,
    pub factory: bool,
    pub factory_states: IndexMap<String, IndexMap<String, serde_json::Value>>,
    pub observer: bool,
    pub seeder: bool,
    /// Whether the model's table gets its own migration
    pub migration: bool,
    /// The `id` column was added by quick normalization, not declared
    pub auto_id: bool,
}

impl Model {
    pub fn new(
        key: impl Into<ModelKey>,
        class: impl Into<String>,
        namespace: impl Into<String>,
        path: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            class: class.into(),
            namespace: namespace.into(),
            path: path.into(),
            table: table.into(),
            model_type: ModelType::Model,
            columns: SlotMap::new(),
            relations: SlotMap::new(),
            primary: None,
            timestamps: None,
            soft_delete: None,
            fillable: IndexSet::new(),
            hidden: IndexSet::new(),
            append: IndexSet::new(),
            casts: IndexMap::new(),
            eager: Vec::new(),
            indexes: Vec::new(),
            route_key: None,
            local_scopes: Vec::new(),
            global_scopes: Vec::new(),
            traits: Vec::new(),
            quick_traits: Vec::new(),
            quick_casts: Vec::new(),
            factory: true,
            factory_states: IndexMap::new(),
            observer: false,
            seeder: false,
            migration: true,
            auto_id: false,
        }
    }

    /// Fully qualified class name
    pub fn fqcn(&self) -> String {
        format!("{}\\{}", self.namespace, self.class)
    }

    pub fn has_primary_key(&self) -> bool {
        self.primary.is_some()
    }

    pub fn has_auto_increment_primary_key(&self) -> bool {
        self.primary.as_ref().is_some_and(|primary| primary.incrementing)
    }

    pub fn has_uuid_primary_key(&self) -> bool {
        self.primary.as_ref().is_some_and(PrimaryKey::is_uuid)
    }

    pub fn is_pivot(&self) -> bool {
        self.model_type.is_pivot()
    }

    /// Column declaring the primary key
    pub fn primary_column(&self) -> Option<&Column> {
        let primary = self.primary.as_ref()?;
        self.column_named(&primary.column)
    }

    /// Resolved column by physical name
    pub fn column_named(&self, name: &str) -> Option<&Column> {
        self.columns.values().find(|column| column.name == name)
    }

    /// Whether a resolved column creates the physical column `name`
    pub fn has_physical_column(&self, name: &str) -> bool {
        self.columns
            .values()
            .any(|column| column.physical_names().iter().any(|physical| physical == name))
    }

    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.get(name)
    }

    pub fn belongs_to_relations(&self) -> impl Iterator<Item = (&Relation, &BelongsTo)> {
        self.relations
            .values()
            .filter_map(|relation| relation.as_belongs_to().map(|payload| (relation, payload)))
    }

    pub fn morph_to_relations(&self) -> impl Iterator<Item = (&Relation, &MorphTo)> {
        self.relations
            .values()
            .filter_map(|relation| relation.as_morph_to().map(|payload| (relation, payload)))
    }

    /// First `belongsTo` of this model pointing at `model`
    pub fn belongs_to(&self, model: &str) -> Option<&BelongsTo> {
        self.belongs_to_relations()
            .find(|(_, payload)| payload.model == model)
            .map(|(_, payload)| payload)
    }
}
