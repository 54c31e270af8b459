//! Pass runner.
//!
//! Every pass names the stages it needs and the stage it completes. The runner
//! refuses to start a pass whose requirements are not stamped on the context,
//! so a reordered pass list fails loudly instead of resolving half a schema.

use crate::context::SchemaContext;
use crate::passes;
use draftsman_core::{CoreError, CoreResult};
use std::fmt;
use std::time::Instant;

/// Facts established on a [`SchemaContext`] by a completed pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    QuickModels,
    ModelShells,
    RelationReservations,
    Columns,
    BelongsTo,
    BelongsToMany,
    HasOneOrMany,
    HasOneOrManyThrough,
    MorphTo,
    MorphOneOrMany,
    MorphToMany,
    PivotModels,
    MorphColumns,
    ModelAttributes,
    ModelsFinalized,
    ExplicitMigrations,
    ModelMigrations,
    PivotMigrations,
    Artifacts,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One resolution step over the whole schema
pub trait Pass {
    fn name(&self) -> &'static str;

    /// Stages that must be complete before this pass runs
    fn requires(&self) -> &'static [Stage];

    /// Stage this pass completes
    fn provides(&self) -> Stage;

    fn run(&self, context: &mut SchemaContext) -> CoreResult<()>;
}

/// Ordered list of passes
pub struct Pipeline {
    passes: Vec<Box<dyn Pass>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    /// The full resolution pipeline, from raw declarations to artifacts
    pub fn standard() -> Self {
        Self::new()
            .with(passes::QuickModels)
            .with(passes::ModelShells)
            .with(passes::RelationReservations)
            .with(passes::Columns)
            .with(passes::BelongsToPass)
            .with(passes::BelongsToManyPass)
            .with(passes::HasOneOrManyPass)
            .with(passes::ThroughPass)
            .with(passes::MorphToPass)
            .with(passes::MorphOneOrManyPass)
            .with(passes::MorphToManyPass)
            .with(passes::PivotModels)
            .with(passes::MorphColumns)
            .with(passes::ModelAttributes)
            .with(passes::FinalizeModels)
            .with(passes::ExplicitMigrations)
            .with(passes::ModelMigrations)
            .with(passes::PivotMigrations)
            .with(passes::ArtifactsPass)
    }

    pub fn with(mut self, pass: impl Pass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// Drop every pass after the one named `last`
    pub fn until(mut self, last: &str) -> Self {
        if let Some(index) = self.passes.iter().position(|pass| pass.name() == last) {
            self.passes.truncate(index + 1);
        }
        self
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    /// Run every pass in order, stopping at the first failure
    pub fn run(&self, context: &mut SchemaContext) -> CoreResult<()> {
        for pass in &self.passes {
            if let Some(missing) = pass
                .requires()
                .iter()
                .find(|stage| !context.has_stage(**stage))
            {
                return Err(CoreError::pipeline(format!(
                    "pass [{}] requires stage [{}] which has not completed",
                    pass.name(),
                    missing
                )));
            }

            let started = Instant::now();
            pass.run(context)?;
            context.stamp(pass.provides());

            tracing::debug!(
                pass = pass.name(),
                elapsed_us = started.elapsed().as_micros() as u64,
                "resolution pass completed"
            );
        }

        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftsman_core::{GeneratorConfig, SchemaSpec};

    struct Stamp(Stage, &'static [Stage]);

    impl Pass for Stamp {
        fn name(&self) -> &'static str {
            "stamp"
        }

        fn requires(&self) -> &'static [Stage] {
            self.1
        }

        fn provides(&self) -> Stage {
            self.0
        }

        fn run(&self, _context: &mut SchemaContext) -> CoreResult<()> {
            Ok(())
        }
    }

    fn context() -> SchemaContext {
        SchemaContext::new(GeneratorConfig::new(), SchemaSpec::default())
    }

    #[test]
    fn test_unmet_requirement_is_refused() {
        let pipeline = Pipeline::new().with(Stamp(Stage::Columns, &[Stage::ModelShells]));
        let err = pipeline.run(&mut context()).unwrap_err();

        assert!(err.is_pipeline());
        assert!(err.to_string().contains("ModelShells"));
    }

    #[test]
    fn test_stages_are_stamped_in_order() {
        let pipeline = Pipeline::new()
            .with(Stamp(Stage::QuickModels, &[]))
            .with(Stamp(Stage::ModelShells, &[Stage::QuickModels]));
        let mut context = context();

        pipeline.run(&mut context).unwrap();
        assert!(context.has_stage(Stage::ModelShells));
        assert!(!context.has_stage(Stage::Columns));
    }

    #[test]
    fn test_standard_pipeline_order() {
        let names = Pipeline::standard().pass_names();
        assert_eq!(names.len(), 19);
        assert_eq!(names.first(), Some(&"quick-models"));
        assert_eq!(names.last(), Some(&"artifacts"));
    }

    #[test]
    fn test_until_truncates() {
        let names = Pipeline::standard().until("columns").pass_names();
        assert_eq!(names.last(), Some(&"columns"));
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn test_standard_pipeline_requirements_are_satisfiable() {
        let pipeline = Pipeline::standard();
        let mut done = std::collections::BTreeSet::new();
        for pass in &pipeline.passes {
            for stage in pass.requires() {
                assert!(done.contains(stage), "{} runs before {}", pass.name(), stage);
            }
            done.insert(pass.provides());
        }
    }
}
