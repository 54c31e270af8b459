//! # draftsman-codegen: schema resolution
//!
//! Turns a declarative [`SchemaSpec`](draftsman_core::SchemaSpec) into a
//! [`ResolvedSchema`]: models with resolved columns and relations, table
//! definitions including synthesized pivots, and side tables for the stub
//! and factory emitters.
//!
//! Resolution is a fixed sequence of [`Pass`]es over one [`SchemaContext`].
//! Each pass states the stages it depends on and the runner refuses to run
//! it early.
//!
//! ```no_run
//! use draftsman_codegen::Generator;
//!
//! let schema = Generator::default()
//!     .generate_yaml("models:\n  Post:\n    title: string\n    author: belongsTo:User\n  User:\n    name: string\n")
//!     .unwrap();
//! assert_eq!(
//!     schema.relation_call("Post", "author").unwrap(),
//!     "belongsTo(User::class, 'user_id')"
//! );
//! ```

pub mod artifacts;
pub mod context;
pub mod generator;
pub mod guess;
pub mod passes;
pub mod pipeline;
pub mod relation_line;

pub use artifacts::Artifacts;
pub use context::SchemaContext;
pub use generator::{Generator, ResolvedSchema};
pub use pipeline::{Pass, Pipeline, Stage};
pub use relation_line::RelationLine;
