use super::resolve_target;
use crate::context::SchemaContext;
use crate::pipeline::{Pass, Stage};
use crate::relation_line::RelationLine;
use draftsman_core::{logic_error, CoreResult};
use draftsman_orm::{MorphOneOrMany, Relation, RelationKind, RelationType};

/// Resolves `morphOne` and `morphMany` lines and registers the owner as a
/// parent of the bound `morphTo`.
pub struct MorphOneOrManyPass;

impl Pass for MorphOneOrManyPass {
    fn name(&self) -> &'static str {
        "morph-one-or-many"
    }

    fn requires(&self) -> &'static [Stage] {
        &[Stage::MorphTo]
    }

    fn provides(&self) -> Stage {
        Stage::MorphOneOrMany
    }

    fn run(&self, context: &mut SchemaContext) -> CoreResult<()> {
        let mut lines = context.relation_lines(RelationType::MorphOne)?;
        lines.extend(context.relation_lines(RelationType::MorphMany)?);

        for line in lines {
            let target = resolve_target(context, &line)?;
            let relation_key = bound_morph_to(context, &line, &target)?;

            if let Some(morph_to) = context
                .relation_mut(&target, &relation_key)
                .and_then(Relation::as_morph_to_mut)
            {
                morph_to.add_model(&line.model);
            }

            let payload = MorphOneOrMany {
                model: target,
                relation_key,
            };
            let kind = match line.kind {
                RelationType::MorphOne => RelationKind::MorphOne(payload),
                _ => RelationKind::MorphMany(payload),
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

/// Name of the `morphTo` on `target` that `line` binds to: the explicit
/// second argument, or the only `morphTo` of the target
fn bound_morph_to(context: &SchemaContext, line: &RelationLine, target: &str) -> CoreResult<String> {
    let model = context.model(target)?;

    if let Some(name) = line.argument(1) {
        if model.relation(name).and_then(Relation::as_morph_to).is_none() {
            logic_error!(
                "Relation [{}] of model [{}] points to a non-existent morphTo relation [{}] of model [{}]",
                line.name,
                line.model,
                name,
                target
            );
        }
        return Ok(name.to_string());
    }

    let candidates: Vec<&str> = model
        .morph_to_relations()
        .map(|(relation, _)| relation.name.as_str())
        .collect();
    match candidates.as_slice() {
        [only] => Ok(only.to_string()),
        [] => logic_error!(
            "Model [{}] must contain a morphTo relation for relation [{}] of model [{}]",
            target,
            line.name,
            line.model
        ),
        _ => logic_error!(
            "Model [{}] has more than one morphTo relation, pick one for relation [{}] of model [{}]",
            target,
            line.name,
            line.model
        ),
    }
}

#[cfg(test)]
mod tests {
    use crate::passes::resolve_until;
    use draftsman_orm::RelationKind;

    #[test]
    fn test_sole_morph_to_is_inferred() {
        let yaml = "models:\n  Photo:\n    tags: morphMany\n  Video:\n    tags: morphMany\n  Tag:\n    name: string\n    taggable: morphTo\n";
        let context = resolve_until(yaml, "morph-one-or-many").unwrap();

        for owner in ["Photo", "Video"] {
            let RelationKind::MorphMany(payload) = &context.models[owner].relation("tags").unwrap().kind else {
                panic!("tags is not morphMany");
            };
            assert_eq!(payload.model, "Tag");
            assert_eq!(payload.relation_key, "taggable");
        }

        let taggable = context.models["Tag"].relation("taggable").unwrap().as_morph_to().unwrap();
        assert_eq!(taggable.models, vec!["Photo", "Video"]);
    }

    #[test]
    fn test_ambiguous_morph_to() {
        let yaml = "models:\n  Post:\n    image: morphOne\n  Image:\n    imageable: morphTo\n    attachable: morphTo\n";
        let err = resolve_until(yaml, "morph-one-or-many").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Model [Image] has more than one morphTo relation, pick one for relation [image] of model [Post]"
        );

        let yaml = "models:\n  Post:\n    image: morphOne:Image,attachable\n  Image:\n    imageable: morphTo\n    attachable: morphTo\n";
        let context = resolve_until(yaml, "morph-one-or-many").unwrap();
        let attachable = context.models["Image"].relation("attachable").unwrap().as_morph_to().unwrap();
        assert_eq!(attachable.models, vec!["Post"]);
    }

    #[test]
    fn test_target_without_morph_to() {
        let yaml = "models:\n  Post:\n    images: morphMany\n  Image:\n    url: string\n";
        let err = resolve_until(yaml, "morph-one-or-many").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Model [Image] must contain a morphTo relation for relation [images] of model [Post]"
        );
    }
}
