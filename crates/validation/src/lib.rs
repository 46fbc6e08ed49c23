//! # formgate-validation
//!
//! Named, ordered validation groups over pluggable backends.
//!
//! A [`GroupRegistry`] holds groups in execution order. Each group bundles
//! rules for one [`BackendAdapter`] instance and may be gated by a
//! [`Condition`] on the results of earlier groups. A [`Runner`] walks the
//! registry once per validation, merges every group's field errors into a
//! caller-owned [`ErrorSink`] and returns the overall verdict.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use formgate_validation::prelude::*;
//!
//! let mut registry: GroupRegistry<RuleSet<Value>> = GroupRegistry::new();
//! registry.declare_rule(RuleDeclaration::presence("name"))?;
//! registry.declare_group(
//!     "extra",
//!     GroupOptions::new().after(DEFAULT_GROUP).if_group(DEFAULT_GROUP),
//!     |group| {
//!         group.rule(RuleDeclaration::numericality("age"))?;
//!         Ok(())
//!     },
//! )?;
//!
//! let mut errors = FieldErrors::new();
//! let valid = registry.execute(&json!({ "name": "ok", "age": "x" }), &mut errors)?;
//! assert!(!valid);
//! assert_eq!(errors.get("age"), ["is not a number"]);
//! ```
//!
//! ## Errors
//!
//! Failed validations are data, never errors. [`ConfigError`] covers broken
//! declarations and is raised while declaring; [`ReferenceError`] is raised
//! by a run when a condition names a group that has no result.

pub mod adapter;
pub mod condition;
pub mod config;
pub mod error;
pub mod group;
pub mod host;
pub mod prelude;
pub mod registry;
pub mod rules;
pub mod runner;
pub mod sink;

pub use adapter::BackendAdapter;
pub use condition::{Condition, ExecutionResult, GroupStatus, Predicate, should_run};
pub use config::{GroupSpec, RegistryConfig};
pub use error::{ConfigError, Error, MissingCause, ReferenceError};
pub use group::{Group, GroupOptions};
pub use host::{Validates, Validation};
pub use registry::{DEFAULT_GROUP, GroupRegistry};
pub use runner::{RunReport, Runner};
pub use sink::{ErrorSink, FieldErrors, merge_into};
