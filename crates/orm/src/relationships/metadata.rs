//! Relation type discriminants and the per-type rules shared by every pass

use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines the type of relationship between models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationType {
    /// One-to-one, foreign key on the related model
    HasOne,
    HasOneThrough,
    /// One-to-many, foreign key on the related model
    HasMany,
    HasManyThrough,
    /// Inverse of hasOne/hasMany, foreign key on this model
    BelongsTo,
    /// Many-to-many through a pivot table
    BelongsToMany,
    MorphOne,
    MorphMany,
    /// Inverse polymorphic relationship
    MorphTo,
    MorphToMany,
    MorphedByMany,
}

impl RelationType {
    pub const ALL: [RelationType; 11] = [
        RelationType::BelongsTo,
        RelationType::BelongsToMany,
        RelationType::HasOne,
        RelationType::HasOneThrough,
        RelationType::HasMany,
        RelationType::HasManyThrough,
        RelationType::MorphOne,
        RelationType::MorphMany,
        RelationType::MorphTo,
        RelationType::MorphToMany,
        RelationType::MorphedByMany,
    ];

    /// Keyword used in declaration lines and as the Eloquent method name
    pub fn keyword(self) -> &'static str {
        match self {
            Self::HasOne => "hasOne",
            Self::HasOneThrough => "hasOneThrough",
            Self::HasMany => "hasMany",
            Self::HasManyThrough => "hasManyThrough",
            Self::BelongsTo => "belongsTo",
            Self::BelongsToMany => "belongsToMany",
            Self::MorphOne => "morphOne",
            Self::MorphMany => "morphMany",
            Self::MorphTo => "morphTo",
            Self::MorphToMany => "morphToMany",
            Self::MorphedByMany => "morphedByMany",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }

    /// Returns true if this relationship type is polymorphic
    pub fn is_polymorphic(self) -> bool {
        matches!(
            self,
            Self::MorphOne | Self::MorphMany | Self::MorphTo | Self::MorphToMany | Self::MorphedByMany
        )
    }

    /// Returns true if this relationship returns a collection
    pub fn is_collection(self) -> bool {
        matches!(
            self,
            Self::HasMany
                | Self::HasManyThrough
                | Self::BelongsToMany
                | Self::MorphMany
                | Self::MorphToMany
                | Self::MorphedByMany
        )
    }

    /// Returns true if this relationship requires a pivot table
    pub fn requires_pivot(self) -> bool {
        matches!(self, Self::BelongsToMany | Self::MorphToMany | Self::MorphedByMany)
    }

    pub fn is_through(self) -> bool {
        matches!(self, Self::HasOneThrough | Self::HasManyThrough)
    }

    /// Relations stored in a local column of the declaring model
    pub fn needs_column(self) -> bool {
        matches!(self, Self::BelongsTo | Self::MorphTo)
    }

    /// Relations allowed to declare `withDefault`
    pub fn accepts_with_default(self) -> bool {
        matches!(
            self,
            Self::BelongsTo | Self::HasOne | Self::HasOneThrough | Self::MorphOne
        )
    }

    /// Return type class of the generated relation method
    pub fn return_class(self) -> &'static str {
        match self {
            Self::HasOne => "HasOne",
            Self::HasOneThrough => "HasOneThrough",
            Self::HasMany => "HasMany",
            Self::HasManyThrough => "HasManyThrough",
            Self::BelongsTo => "BelongsTo",
            Self::BelongsToMany => "BelongsToMany",
            Self::MorphOne => "MorphOne",
            Self::MorphMany => "MorphMany",
            Self::MorphTo => "MorphTo",
            Self::MorphToMany | Self::MorphedByMany => "MorphToMany",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_round_trip() {
        for kind in RelationType::ALL {
            assert_eq!(RelationType::from_keyword(kind.keyword()), Some(kind));
        }
        assert_eq!(RelationType::from_keyword("string"), None);
        assert_eq!(RelationType::from_keyword("BelongsTo"), None);
    }

    #[test]
    fn test_relationship_type_properties() {
        assert!(RelationType::MorphTo.is_polymorphic());
        assert!(!RelationType::BelongsTo.is_polymorphic());

        assert!(RelationType::HasManyThrough.is_collection());
        assert!(!RelationType::HasOneThrough.is_collection());

        assert!(RelationType::MorphedByMany.requires_pivot());
        assert!(!RelationType::MorphMany.requires_pivot());

        assert!(RelationType::BelongsTo.needs_column());
        assert!(RelationType::MorphTo.needs_column());
        assert!(!RelationType::HasMany.needs_column());
    }

    #[test]
    fn test_with_default_accepts_list() {
        let accepted: Vec<RelationType> = RelationType::ALL
            .into_iter()
            .filter(|kind| kind.accepts_with_default())
            .collect();
        assert_eq!(
            accepted,
            vec![
                RelationType::BelongsTo,
                RelationType::HasOne,
                RelationType::HasOneThrough,
                RelationType::MorphOne,
            ]
        );
    }
}
