//! # draftsman-orm: resolved schema representation
//!
//! Models, columns, relations, migrations and factory hints produced by the
//! resolution pipeline and consumed by the code emitters. Cross references
//! between models are by [`ModelKey`], never by embedded copies.

pub mod column;
pub mod factory;
pub mod migrations;
pub mod model;
pub mod relationships;
pub mod slot;

/// Declared model identifier, e.g. `Post` or `Admin/User`
pub type ModelKey = String;

pub use column::Column;
pub use factory::{FactoryDefinition, FactoryField};
pub use migrations::{Index, Migration};
pub use model::*;
pub use relationships::*;
pub use slot::{Slot, SlotMap};
