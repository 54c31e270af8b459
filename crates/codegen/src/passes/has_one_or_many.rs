use super::resolve_target;
use crate::context::SchemaContext;
use crate::pipeline::{Pass, Stage};
use draftsman_core::{logic_error, CoreResult};
use draftsman_orm::{HasOneOrMany, Relation, RelationKind, RelationType};

/// Resolves `hasOne` and `hasMany` lines.
///
/// Without an explicit foreign key the target must declare the inverse
/// `belongsTo`, whose column and owner key are borrowed.
pub struct HasOneOrManyPass;

impl Pass for HasOneOrManyPass {
    fn name(&self) -> &'static str {
        "has-one-or-many"
    }

    fn requires(&self) -> &'static [Stage] {
        &[Stage::BelongsTo]
    }

    fn provides(&self) -> Stage {
        Stage::HasOneOrMany
    }

    fn run(&self, context: &mut SchemaContext) -> CoreResult<()> {
        let mut lines = context.relation_lines(RelationType::HasOne)?;
        lines.extend(context.relation_lines(RelationType::HasMany)?);

        for line in lines {
            let target_key = resolve_target(context, &line)?;

            let payload = match line.argument(1) {
                Some(foreign_key) => HasOneOrMany {
                    model: target_key,
                    foreign_key: foreign_key.to_string(),
                    local_key: line.argument(2).map(str::to_string),
                },
                None => {
                    let target = context.model(&target_key)?;
                    let Some(inverse) = target.belongs_to(&line.model) else {
                        logic_error!(
                            "Target model [{}] of relation [{}] of model [{}] must contain a belongsTo relation to [{}]",
                            target_key,
                            line.name,
                            line.model,
                            line.model
                        );
                    };
                    HasOneOrMany {
                        foreign_key: inverse.column_key.clone(),
                        local_key: line
                            .argument(2)
                            .map(str::to_string)
                            .or_else(|| inverse.owner_key.clone()),
                        model: target_key,
                    }
                }
            };

            let kind = match line.kind {
                RelationType::HasOne => RelationKind::HasOne(payload),
                _ => RelationKind::HasMany(payload),
            };
            let relation = Relation::new(line.name.as_str(), line.methods.clone(), kind);
            context
                .model_mut(&line.model)?
                .relations
                .resolve(line.name.as_str(), relation);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::passes::resolve_until;
    use draftsman_orm::{RelationKind, RelationType};

    #[test]
    fn test_inverse_belongs_to_supplies_key() {
        let yaml = "models:\n  User:\n    name: string\n    posts: hasMany\n    profile: hasOne withDefault\n  Post:\n    author: belongsTo:User\n  Profile:\n    user: belongsTo\n";
        let context = resolve_until(yaml, "has-one-or-many").unwrap();
        let user = &context.models["User"];

        let posts = user.relation("posts").unwrap();
        assert_eq!(posts.relation_type(), RelationType::HasMany);
        let RelationKind::HasMany(payload) = &posts.kind else {
            panic!("posts is not hasMany");
        };
        assert_eq!(payload.model, "Post");
        assert_eq!(payload.foreign_key, "user_id");

        let profile = user.relation("profile").unwrap();
        assert_eq!(profile.relation_type(), RelationType::HasOne);
        assert!(profile.methods.has("withDefault"));
    }

    #[test]
    fn test_explicit_foreign_key_skips_inverse() {
        let yaml = "models:\n  User:\n    posts: hasMany:Post,writer_id\n  Post:\n    writer_id: unsignedBigInteger\n";
        let context = resolve_until(yaml, "has-one-or-many").unwrap();
        let RelationKind::HasMany(payload) = &context.models["User"].relation("posts").unwrap().kind else {
            panic!("posts is not hasMany");
        };
        assert_eq!(payload.foreign_key, "writer_id");
    }

    #[test]
    fn test_missing_inverse_is_fatal() {
        let yaml = "models:\n  User:\n    posts: hasMany\n  Post:\n    title: string\n";
        let err = resolve_until(yaml, "has-one-or-many").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Target model [Post] of relation [posts] of model [User] must contain a belongsTo relation to [User]"
        );
    }
}
