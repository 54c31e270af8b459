//! Shorthand lexer for declaration lines such as `belongsTo:User,user_id nullable`.
//!
//! Lines split on whitespace into methods, methods split on `:` into a name and
//! a comma separated argument list. No semantic validation happens here.

pub mod argument;
pub mod call;

pub use argument::{Argument, ArgumentKind};
pub use call::{Call, Method};
