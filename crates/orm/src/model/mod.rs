//! Models - resolved entities with their columns, relations and attribute lists
//!
//! - `definition`: the `Model` node and its derived queries
//! - `primary_key`: primary key descriptors
//! - `timestamps`: timestamp and soft delete descriptors

pub mod definition;
pub mod primary_key;
pub mod timestamps;

pub use definition::{Model, ModelType};
pub use primary_key::{KeyType, PrimaryKey};
pub use timestamps::{SoftDelete, Timestamps};
