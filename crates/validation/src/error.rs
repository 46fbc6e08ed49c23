//! Error types for group declaration and execution.
//!
//! Failed validations are not errors: they end up as entries in the
//! caller's [`ErrorSink`](crate::sink::ErrorSink). The types here cover the
//! two fatal paths, a broken declaration and a condition that points at a
//! group without a recorded result.

/// Errors raised while declaring groups and rules.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// `after` names a group that has not been declared.
    #[error("group `{group}` cannot be placed after unknown group `{after}`")]
    UnknownAfter {
        /// The group being declared.
        group: String,
        /// The missing anchor group.
        after: String,
    },

    /// A group with this name exists and the declaration did not ask to inherit it.
    #[error("group `{group}` is already declared")]
    DuplicateGroup {
        /// The clashing group name.
        group: String,
    },

    /// The backend rejected a rule declaration.
    #[error("invalid rule for field `{field}`: {reason}")]
    InvalidRule {
        /// Field the rule targets.
        field: String,
        /// Backend-specific explanation.
        reason: String,
    },

    /// A condition references a group that does not run before it.
    #[error("group `{group}` depends on `{reference}`, which is not declared before it")]
    UnresolvedReference {
        /// The group carrying the condition.
        group: String,
        /// The referenced group name.
        reference: String,
    },

    /// A registry description could not be parsed.
    #[error("malformed registry config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Builds a [`ConfigError::InvalidRule`].
    pub fn invalid_rule(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRule {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Why a referenced group has no recorded result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingCause {
    /// The group exists but its own condition kept it from running.
    Skipped,
    /// The group is unknown, comes later in order, or is the referencing group itself.
    NotExecuted,
}

impl std::fmt::Display for MissingCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skipped => f.write_str("it was skipped"),
            Self::NotExecuted => f.write_str("it has not run yet"),
        }
    }
}

/// A `ReferenceTo` condition found no result for the group it names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("group `{group}` references `{reference}`, but {cause}")]
pub struct ReferenceError {
    /// The group whose condition was being evaluated.
    pub group: String,
    /// The group name the condition references.
    pub reference: String,
    /// Why no result was recorded.
    pub cause: MissingCause,
}

/// Umbrella error for callers that declare and run in one code path.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Declaration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Execution hit an unresolved condition reference.
    #[error(transparent)]
    Reference(#[from] ReferenceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_after_display() {
        let err = ConfigError::UnknownAfter {
            group: "extra".into(),
            after: "missing".into(),
        };
        assert_eq!(
            err.to_string(),
            "group `extra` cannot be placed after unknown group `missing`"
        );
    }

    #[test]
    fn reference_error_names_cause() {
        let err = ReferenceError {
            group: "b".into(),
            reference: "a".into(),
            cause: MissingCause::Skipped,
        };
        assert_eq!(err.to_string(), "group `b` references `a`, but it was skipped");
    }

    #[test]
    fn umbrella_wraps_both_kinds() {
        let err: Error = ConfigError::invalid_rule("age", "bad").into();
        assert!(matches!(err, Error::Config(ConfigError::InvalidRule { .. })));
        assert_eq!(err.to_string(), "invalid rule for field `age`: bad");
    }
}
