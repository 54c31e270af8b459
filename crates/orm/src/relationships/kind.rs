//! Resolved relation descriptors.
//!
//! Relations refer to other models by key only; the owning schema holds the
//! models themselves.

use super::metadata::RelationType;
use crate::ModelKey;
use draftsman_core::lexer::{Argument, Call};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BelongsTo {
    pub model: ModelKey,
    /// Local foreign key column
    pub column_key: String,
    pub owner_key: Option<String>,
}

/// Payload of `hasOne` and `hasMany`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HasOneOrMany {
    pub model: ModelKey,
    /// Foreign key column on the related model
    pub foreign_key: String,
    pub local_key: Option<String>,
}

/// Payload of `hasOneThrough` and `hasManyThrough`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Through {
    pub model: ModelKey,
    pub through: ModelKey,
    pub first_key: Option<String>,
    pub second_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BelongsToMany {
    pub model: ModelKey,
    /// Pivot model declared with `using:`
    pub using: Option<ModelKey>,
    pub table: String,
    pub foreign_pivot_key: String,
    pub related_pivot_key: String,
    /// Arguments of `withPivot:`, emitted verbatim
    pub with_pivot: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MorphTo {
    /// Parent models pointing at this relation, filled by their own relations
    pub models: Vec<ModelKey>,
    /// Base name of the `<name>_type`/`<name>_id` pair
    pub column_name: String,
    pub nullable: bool,
}

impl MorphTo {
    pub fn add_model(&mut self, model: &str) {
        if !self.models.iter().any(|existing| existing == model) {
            self.models.push(model.to_string());
        }
    }
}

/// Payload of `morphOne` and `morphMany`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MorphOneOrMany {
    pub model: ModelKey,
    /// Name of the `morphTo` relation on the related model
    pub relation_key: String,
}

/// Payload of `morphToMany` and `morphedByMany`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MorphToMany {
    pub model: ModelKey,
    /// Morph name, e.g. `taggable`
    pub relation_key: String,
    pub using: Option<ModelKey>,
    pub table: String,
    pub with_pivot: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RelationKind {
    BelongsTo(BelongsTo),
    BelongsToMany(BelongsToMany),
    HasOne(HasOneOrMany),
    HasMany(HasOneOrMany),
    HasOneThrough(Through),
    HasManyThrough(Through),
    MorphTo(MorphTo),
    MorphOne(MorphOneOrMany),
    MorphMany(MorphOneOrMany),
    MorphToMany(MorphToMany),
    MorphedByMany(MorphToMany),
}

impl RelationKind {
    pub fn relation_type(&self) -> RelationType {
        match self {
            Self::BelongsTo(_) => RelationType::BelongsTo,
            Self::BelongsToMany(_) => RelationType::BelongsToMany,
            Self::HasOne(_) => RelationType::HasOne,
            Self::HasMany(_) => RelationType::HasMany,
            Self::HasOneThrough(_) => RelationType::HasOneThrough,
            Self::HasManyThrough(_) => RelationType::HasManyThrough,
            Self::MorphTo(_) => RelationType::MorphTo,
            Self::MorphOne(_) => RelationType::MorphOne,
            Self::MorphMany(_) => RelationType::MorphMany,
            Self::MorphToMany(_) => RelationType::MorphToMany,
            Self::MorphedByMany(_) => RelationType::MorphedByMany,
        }
    }

    /// Related model; `None` for `morphTo`
    pub fn model(&self) -> Option<&str> {
        match self {
            Self::BelongsTo(r) => Some(&r.model),
            Self::BelongsToMany(r) => Some(&r.model),
            Self::HasOne(r) | Self::HasMany(r) => Some(&r.model),
            Self::HasOneThrough(r) | Self::HasManyThrough(r) => Some(&r.model),
            Self::MorphTo(_) => None,
            Self::MorphOne(r) | Self::MorphMany(r) => Some(&r.model),
            Self::MorphToMany(r) | Self::MorphedByMany(r) => Some(&r.model),
        }
    }

    /// Pivot model declared with `using:`
    pub fn using(&self) -> Option<&str> {
        match self {
            Self::BelongsToMany(r) => r.using.as_deref(),
            Self::MorphToMany(r) | Self::MorphedByMany(r) => r.using.as_deref(),
            _ => None,
        }
    }
}

/// A resolved relation of a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub name: String,
    /// Qualifiers chained onto the relation call, e.g. `withTimestamps`
    pub methods: Call,
    #[serde(flatten)]
    pub kind: RelationKind,
}

impl Relation {
    pub fn new(name: impl Into<String>, methods: Call, kind: RelationKind) -> Self {
        Self {
            name: name.into(),
            methods,
            kind,
        }
    }

    pub fn relation_type(&self) -> RelationType {
        self.kind.relation_type()
    }

    pub fn model(&self) -> Option<&str> {
        self.kind.model()
    }

    pub fn as_belongs_to(&self) -> Option<&BelongsTo> {
        match &self.kind {
            RelationKind::BelongsTo(belongs_to) => Some(belongs_to),
            _ => None,
        }
    }

    pub fn as_morph_to(&self) -> Option<&MorphTo> {
        match &self.kind {
            RelationKind::MorphTo(morph_to) => Some(morph_to),
            _ => None,
        }
    }

    pub fn as_morph_to_mut(&mut self) -> Option<&mut MorphTo> {
        match &mut self.kind {
            RelationKind::MorphTo(morph_to) => Some(morph_to),
            _ => None,
        }
    }

    /// Whether this is a `belongsTo` pointing at `model`
    pub fn belongs_to_model(&self, model: &str) -> bool {
        self.as_belongs_to().is_some_and(|belongs_to| belongs_to.model == model)
    }
}
