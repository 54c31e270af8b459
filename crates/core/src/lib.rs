//! Foundation of the draftsman schema generator: the error type, generator
//! configuration, the shorthand lexer, naming helpers and the raw schema
//! declarations read from draft files.

pub mod config;
pub mod errors;
pub mod inflector;
pub mod lexer;
pub mod specs;

pub use config::validation::ConfigError;
pub use config::{ConfigSource, GeneratorConfig, GeneratorConfigTrait};
pub use errors::{CoreError, CoreResult};
pub use lexer::{Argument, ArgumentKind, Call, Method};
pub use specs::{
    ColumnLines, FactorySpec, IndexSpec, MigrationSpec, ModelSpec, PrimarySpec, SchemaSpec,
    TimestampsSpec, Toggle,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get generator version
pub fn version() -> &'static str {
    VERSION
}
