//! Built-in rule-list backend.
//!
//! [`RuleSet`] is a [`BackendAdapter`](crate::BackendAdapter) for data
//! objects that expose their fields as JSON values through [`Fields`].
//! It covers the common checks (presence, numericality, length, format,
//! inclusion) plus closures for everything else.

mod check;
mod fields;
mod set;

pub use check::{Check, CustomCheck, RuleDeclaration};
pub use fields::Fields;
pub use set::RuleSet;
