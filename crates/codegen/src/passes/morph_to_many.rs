use super::{resolve_pivot, resolve_target};
use crate::context::SchemaContext;
use crate::guess::{morph_name, morph_table};
use crate::pipeline::{Pass, Stage};
use draftsman_core::CoreResult;
use draftsman_orm::{ModelType, MorphToMany, Relation, RelationKind, RelationType};

/// Resolves `morphToMany` and `morphedByMany` lines.
///
/// For `morphToMany` the owner is the morphed parent; for `morphedByMany`
/// the target is. A `using:` pivot model gets the parent added to its
/// `morphTo`.
pub struct MorphToManyPass;

impl Pass for MorphToManyPass {
    fn name(&self) -> &'static str {
        "morph-to-many"
    }

    fn requires(&self) -> &'static [Stage] {
        &[Stage::MorphTo]
    }

    fn provides(&self) -> Stage {
        Stage::MorphToMany
    }

    fn run(&self, context: &mut SchemaContext) -> CoreResult<()> {
        let mut lines = context.relation_lines(RelationType::MorphToMany)?;
        lines.extend(context.relation_lines(RelationType::MorphedByMany)?);

        for line in lines {
            let target = resolve_target(context, &line)?;
            let using = resolve_pivot(context, &line, ModelType::MorphPivot)?;

            let (parent, morphed) = match line.kind {
                RelationType::MorphToMany => (line.model.clone(), target.clone()),
                _ => (target.clone(), line.model.clone()),
            };
            let relation_key = match line.argument(1) {
                Some(name) => name.to_string(),
                None => morph_name(&context.model(&morphed)?.class),
            };
            let table = match &using {
                Some(pivot) => context.model(pivot)?.table.clone(),
                None => morph_table(&relation_key),
            };

            if let Some(pivot) = &using {
                let pivot_model = context.model_mut(pivot)?;
                let bound = pivot_model
                    .relations
                    .iter_mut()
                    .filter_map(|(_, relation)| relation.as_morph_to_mut())
                    .find(|morph_to| morph_to.column_name == relation_key);
                if let Some(morph_to) = bound {
                    morph_to.add_model(&parent);
                }
            }

            let payload = MorphToMany {
                model: target,
                relation_key,
                using,
                table,
                with_pivot: line.with_pivot.clone(),
            };
            let kind = match line.kind {
                RelationType::MorphToMany => RelationKind::MorphToMany(payload),
                _ => RelationKind::MorphedByMany(payload),
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
    use draftsman_orm::{ModelType, RelationKind};

    #[test]
    fn test_conventional_morph_name_and_table() {
        let yaml = "models:\n  Post:\n    tags: morphToMany\n  Tag:\n    name: string\n    posts: morphedByMany\n";
        let context = resolve_until(yaml, "morph-to-many").unwrap();

        let RelationKind::MorphToMany(tags) = &context.models["Post"].relation("tags").unwrap().kind else {
            panic!("tags is not morphToMany");
        };
        assert_eq!(tags.model, "Tag");
        assert_eq!(tags.relation_key, "taggable");
        assert_eq!(tags.table, "taggables");

        let RelationKind::MorphedByMany(posts) = &context.models["Tag"].relation("posts").unwrap().kind else {
            panic!("posts is not morphedByMany");
        };
        assert_eq!(posts.model, "Post");
        assert_eq!(posts.relation_key, "taggable");
        assert_eq!(posts.table, "taggables");
    }

    #[test]
    fn test_using_pivot_collects_parent() {
        let yaml = "models:\n  Post:\n    tags: morphToMany using:Tagging\n  Tag:\n    name: string\n  Tagging:\n    tag: belongsTo\n    taggable: morphTo\n";
        let context = resolve_until(yaml, "morph-to-many").unwrap();
        let tagging = &context.models["Tagging"];

        assert_eq!(tagging.model_type, ModelType::MorphPivot);
        let taggable = tagging.relation("taggable").unwrap().as_morph_to().unwrap();
        assert_eq!(taggable.models, vec!["Post"]);

        let RelationKind::MorphToMany(tags) = &context.models["Post"].relation("tags").unwrap().kind else {
            panic!("tags is not morphToMany");
        };
        assert_eq!(tags.table, "taggings");
    }
}
