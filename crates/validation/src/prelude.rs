//! Common imports.
//!
//! ```rust,ignore
//! use formgate_validation::prelude::*;
//! ```

pub use crate::adapter::BackendAdapter;
pub use crate::condition::{Condition, ExecutionResult};
pub use crate::error::{ConfigError, ReferenceError};
pub use crate::group::{Group, GroupOptions};
pub use crate::host::{Validates, Validation};
pub use crate::registry::{DEFAULT_GROUP, GroupRegistry};
pub use crate::rules::{Check, Fields, RuleDeclaration, RuleSet};
pub use crate::runner::Runner;
pub use crate::sink::{ErrorSink, FieldErrors};

pub use serde_json::{Value, json};
