use crate::context::SchemaContext;
use crate::pipeline::{Pass, Stage};
use draftsman_core::{logic_error, CoreResult};
use draftsman_orm::{ModelKey, RelationKind};

/// Checks `using:` pivot models and strips their auto-added key.
///
/// A pivot of a `belongsToMany` must belong to both sides. A pivot of a
/// polymorphic many-to-many needs a `morphTo` and must belong to the
/// non-morphed side.
pub struct PivotModels;

impl Pass for PivotModels {
    fn name(&self) -> &'static str {
        "pivot-models"
    }

    fn requires(&self) -> &'static [Stage] {
        &[Stage::BelongsToMany, Stage::MorphToMany]
    }

    fn provides(&self) -> Stage {
        Stage::PivotModels
    }

    fn run(&self, context: &mut SchemaContext) -> CoreResult<()> {
        for model in context.models.values_mut() {
            if model.is_pivot() && model.auto_id {
                model.columns.remove("id");
                model.primary = None;
                tracing::debug!(model = %model.key, "dropped generated key of pivot model");
            }
        }

        for (owner, relation_name, pivot, kind) in pivot_usages(context) {
            let pivot_model = context.model(&pivot)?;
            let required: Vec<&str> = match &kind {
                RelationKind::BelongsToMany(payload) => vec![owner.as_str(), payload.model.as_str()],
                RelationKind::MorphToMany(payload) | RelationKind::MorphedByMany(payload) => {
                    if pivot_model.morph_to_relations().next().is_none() {
                        logic_error!(
                            "Pivot model [{}] of relation [{}] of model [{}] must contain a morphTo relation",
                            pivot,
                            relation_name,
                            owner
                        );
                    }
                    if matches!(kind, RelationKind::MorphToMany(_)) {
                        vec![payload.model.as_str()]
                    } else {
                        vec![owner.as_str()]
                    }
                }
                _ => Vec::new(),
            };

            for side in required {
                if pivot_model.belongs_to(side).is_none() {
                    logic_error!(
                        "Pivot model [{}] of relation [{}] of model [{}] must contain a belongsTo relation to [{}]",
                        pivot,
                        relation_name,
                        owner,
                        side
                    );
                }
            }
        }

        Ok(())
    }
}

/// `(owner, relation, pivot, kind)` of every relation declaring a pivot model
fn pivot_usages(context: &SchemaContext) -> Vec<(ModelKey, String, ModelKey, RelationKind)> {
    context
        .models
        .values()
        .flat_map(|model| {
            model.relations.values().filter_map(|relation| {
                relation.kind.using().map(|pivot| {
                    (
                        model.key.clone(),
                        relation.name.clone(),
                        pivot.to_string(),
                        relation.kind.clone(),
                    )
                })
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::passes::resolve_until;

    #[test]
    fn test_pivot_loses_generated_key() {
        let yaml = "models:\n  User:\n    roles: belongsToMany using:RoleUser\n  Role:\n    name: string\n  RoleUser:\n    user: belongsTo\n    role: belongsTo\n";
        let context = resolve_until(yaml, "pivot-models").unwrap();
        let pivot = &context.models["RoleUser"];

        assert!(!pivot.columns.contains_key("id"));
        assert!(pivot.primary.is_none());
        assert_eq!(pivot.columns.get("user").unwrap().name, "user_id");
    }

    #[test]
    fn test_pivot_must_belong_to_both_sides() {
        let yaml = "models:\n  User:\n    roles: belongsToMany using:RoleUser\n  Role:\n    name: string\n  RoleUser:\n    user: belongsTo\n";
        let err = resolve_until(yaml, "pivot-models").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Pivot model [RoleUser] of relation [roles] of model [User] must contain a belongsTo relation to [Role]"
        );
    }

    #[test]
    fn test_morph_pivot_needs_morph_to() {
        let yaml = "models:\n  Post:\n    tags: morphToMany using:Tagging\n  Tag:\n    name: string\n  Tagging:\n    tag: belongsTo\n";
        let err = resolve_until(yaml, "pivot-models").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Pivot model [Tagging] of relation [tags] of model [Post] must contain a morphTo relation"
        );
    }
}
