use crate::context::SchemaContext;
use crate::pipeline::{Pass, Stage};
use draftsman_core::CoreResult;
use draftsman_orm::{MorphTo, Relation, RelationKind, RelationType};

/// Creates `morphTo` relations with an empty parent set.
///
/// Parents are added by the morph passes of the models pointing here; the
/// column placeholder stays pending until `MorphColumns`.
pub struct MorphToPass;

impl Pass for MorphToPass {
    fn name(&self) -> &'static str {
        "morph-to"
    }

    fn requires(&self) -> &'static [Stage] {
        &[Stage::Columns]
    }

    fn provides(&self) -> Stage {
        Stage::MorphTo
    }

    fn run(&self, context: &mut SchemaContext) -> CoreResult<()> {
        for line in context.relation_lines(RelationType::MorphTo)? {
            let relation = Relation::new(
                line.name.as_str(),
                line.methods.clone(),
                RelationKind::MorphTo(MorphTo {
                    models: Vec::new(),
                    column_name: line.argument(0).unwrap_or(&line.name).to_string(),
                    nullable: line.column_methods.has("nullable"),
                }),
            );
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

    #[test]
    fn test_column_name_and_nullable() {
        let yaml = "models:\n  Comment:\n    commentable: morphTo\n  Image:\n    owner: morphTo:imageable nullable\n";
        let context = resolve_until(yaml, "morph-to").unwrap();

        let commentable = context.models["Comment"].relation("commentable").unwrap().as_morph_to().unwrap();
        assert_eq!(commentable.column_name, "commentable");
        assert!(!commentable.nullable);
        assert!(commentable.models.is_empty());
        assert!(context.models["Comment"].columns.is_pending("commentable"));

        let owner = context.models["Image"].relation("owner").unwrap().as_morph_to().unwrap();
        assert_eq!(owner.column_name, "imageable");
        assert!(owner.nullable);
    }
}
