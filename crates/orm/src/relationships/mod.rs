//! Relations between models

pub mod kind;
pub mod metadata;

pub use kind::*;
pub use metadata::*;
