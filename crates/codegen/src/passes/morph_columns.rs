use crate::context::SchemaContext;
use crate::pipeline::{Pass, Stage};
use draftsman_core::lexer::{Call, Method};
use draftsman_core::{logic_error, CoreResult};
use draftsman_orm::{Column, MorphTo};

/// Fills `morphTo` column placeholders once every parent is known.
///
/// All parents of one `morphTo` must share their primary key shape, which
/// picks `morphs` or `uuidMorphs`.
pub struct MorphColumns;

impl Pass for MorphColumns {
    fn name(&self) -> &'static str {
        "morph-columns"
    }

    fn requires(&self) -> &'static [Stage] {
        &[Stage::MorphOneOrMany, Stage::MorphToMany, Stage::PivotModels]
    }

    fn provides(&self) -> Stage {
        Stage::MorphColumns
    }

    fn run(&self, context: &mut SchemaContext) -> CoreResult<()> {
        let morph_tos: Vec<(String, String, MorphTo)> = context
            .models
            .values()
            .flat_map(|model| {
                model
                    .morph_to_relations()
                    .map(|(relation, morph_to)| (model.key.clone(), relation.name.clone(), morph_to.clone()))
            })
            .collect();

        for (key, name, morph_to) in morph_tos {
            if morph_to.models.is_empty() {
                logic_error!(
                    "Relation [{}] of model [{}] is a morphTo relation no model points to",
                    name,
                    key
                );
            }

            let mut shape = None;
            for parent in &morph_to.models {
                let parent = context.model(parent)?;
                let parent_shape = (parent.has_auto_increment_primary_key(), parent.has_uuid_primary_key());
                let mismatched = match shape {
                    Some(previous) => previous != parent_shape,
                    None => false,
                };
                if mismatched || parent_shape == (false, false) {
                    logic_error!(
                        "Models [{}] pointing to relation [{}] of model [{}] must ALL use uuid or id",
                        morph_to.models.join(", "),
                        name,
                        key
                    );
                }
                shape = Some(parent_shape);
            }
            let uuid = shape.map(|(_, uuid)| uuid);

            let column_type = match (morph_to.nullable, uuid == Some(true)) {
                (true, true) => "nullableUuidMorphs",
                (true, false) => "nullableMorphs",
                (false, true) => "uuidMorphs",
                (false, false) => "morphs",
            };

            let mut call = Call::new(vec![Method::bare(column_type)]);
            if let Some(line) = context.relation_line(&key, &name)? {
                let mut qualifiers = line.column_methods;
                while qualifiers.remove("nullable").is_some() {}
                call.extend(qualifiers);
            }
            let column = Column::from_call(morph_to.column_name.as_str(), call).for_relation(name.as_str());

            tracing::debug!(
                model = %key,
                relation = %name,
                column_type,
                parents = morph_to.models.len(),
                "synthesized morph columns"
            );
            context.model_mut(&key)?.columns.resolve(name.as_str(), column);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::passes::resolve_until;

    #[test]
    fn test_morph_column_fills_placeholder() {
        let yaml = "models:\n  Photo:\n    tags: morphMany\n  Video:\n    tags: morphMany\n  Tag:\n    name: string\n    taggable: morphTo index\n";
        let context = resolve_until(yaml, "morph-columns").unwrap();
        let tag = &context.models["Tag"];

        let column = tag.columns.get("taggable").unwrap();
        assert_eq!(column.blueprint(), "$table->morphs('taggable')->index()");
        assert_eq!(column.physical_names(), vec!["taggable_type", "taggable_id"]);
        assert!(tag.columns.pending_keys().is_empty());
    }

    #[test]
    fn test_uuid_parents_and_nullable() {
        let yaml = "models:\n  Post:\n    uuid: uuid\n    image: morphOne\n  Image:\n    imageable: morphTo nullable\n";
        let context = resolve_until(yaml, "morph-columns").unwrap();
        let column = context.models["Image"].columns.get("imageable").unwrap();

        assert_eq!(column.column_type, "nullableUuidMorphs");
        assert!(column.is_nullable());
    }

    #[test]
    fn test_mixed_parent_keys() {
        let yaml = "models:\n  Post:\n    uuid: uuid\n    comments: morphMany\n  Video:\n    comments: morphMany\n  Comment:\n    commentable: morphTo\n";
        let err = resolve_until(yaml, "morph-columns").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Models [Post, Video] pointing to relation [commentable] of model [Comment] must ALL use uuid or id"
        );
    }

    #[test]
    fn test_string_key_parent_is_rejected() {
        let yaml = "models:\n  Post:\n    comments: morphMany\n  Country:\n    code: string:2 primary\n    comments: morphMany\n  Comment:\n    commentable: morphTo\n";
        let err = resolve_until(yaml, "morph-columns").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Models [Post, Country] pointing to relation [commentable] of model [Comment] must ALL use uuid or id"
        );
    }

    #[test]
    fn test_parent_without_primary_key_is_rejected() {
        let yaml = "models:\n  Video:\n    columns:\n      title: string\n      comments: morphMany\n    primary: false\n  Comment:\n    commentable: morphTo\n";
        let err = resolve_until(yaml, "morph-columns").unwrap_err();
        assert!(err.to_string().ends_with("must ALL use uuid or id"), "{}", err);
    }

    #[test]
    fn test_orphan_morph_to() {
        let err = resolve_until("models:\n  Comment:\n    commentable: morphTo\n", "morph-columns").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Relation [commentable] of model [Comment] is a morphTo relation no model points to"
        );
    }
}
