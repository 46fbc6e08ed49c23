//! Rule declarations understood by [`RuleSet`](super::RuleSet).
//!
//! Declarations deserialize from JSON, with the check kind flattened next
//! to the field name:
//!
//! ```json
//! { "field": "age", "check": "numericality", "only_integer": true, "greater_than": 0 }
//! ```

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

/// Field-level check closure.
type CheckFn = dyn Fn(Option<&Value>) -> Result<(), String> + Send + Sync;

/// A check implemented in code.
///
/// The closure receives the field value (`None` when absent) and returns
/// the error message on failure.
#[derive(Clone)]
pub struct CustomCheck(Arc<CheckFn>);

impl CustomCheck {
    /// Wrap a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Option<&Value>) -> Result<(), String> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub(crate) fn call(&self, value: Option<&Value>) -> Result<(), String> {
        (self.0)(value)
    }
}

impl fmt::Debug for CustomCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomCheck(..)")
    }
}

/// What a rule checks about its field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case", deny_unknown_fields)]
#[non_exhaustive]
pub enum Check {
    /// Present and not blank.
    Presence,
    /// A number, or a string parsing as one.
    Numericality {
        /// Reject fractional values.
        #[serde(default)]
        only_integer: bool,
        /// Exclusive lower bound.
        greater_than: Option<f64>,
        /// Exclusive upper bound.
        less_than: Option<f64>,
    },
    /// Character count of a string, or item count of an array.
    Length {
        /// Inclusive minimum.
        min: Option<usize>,
        /// Inclusive maximum.
        max: Option<usize>,
    },
    /// A string matching a regular expression.
    Format {
        /// Regex source, compiled at declaration time.
        pattern: String,
    },
    /// One of a fixed set of values.
    Inclusion {
        /// Accepted values, compared as JSON.
        within: Vec<Value>,
    },
    /// Check implemented in code; cannot be loaded from configuration.
    #[serde(skip)]
    Custom(CustomCheck),
}

/// One rule: a field, a check and an optional message override.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleDeclaration {
    /// Field name or dotted path.
    pub field: String,
    /// The check to run.
    #[serde(flatten)]
    pub check: Check,
    /// Replaces the check's default message.
    #[serde(default)]
    pub message: Option<String>,
}

impl RuleDeclaration {
    /// Rule running `check` on `field`.
    pub fn new(field: impl Into<String>, check: Check) -> Self {
        Self {
            field: field.into(),
            check,
            message: None,
        }
    }

    /// `field` must be present and not blank.
    pub fn presence(field: impl Into<String>) -> Self {
        Self::new(field, Check::Presence)
    }

    /// `field` must be numeric.
    pub fn numericality(field: impl Into<String>) -> Self {
        Self::new(
            field,
            Check::Numericality {
                only_integer: false,
                greater_than: None,
                less_than: None,
            },
        )
    }

    /// `field` must be a whole number.
    pub fn integer(field: impl Into<String>) -> Self {
        Self::new(
            field,
            Check::Numericality {
                only_integer: true,
                greater_than: None,
                less_than: None,
            },
        )
    }

    /// `field` length must lie within the given inclusive bounds.
    pub fn length(field: impl Into<String>, min: Option<usize>, max: Option<usize>) -> Self {
        Self::new(field, Check::Length { min, max })
    }

    /// `field` must be a string matching `pattern`.
    pub fn format(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(
            field,
            Check::Format {
                pattern: pattern.into(),
            },
        )
    }

    /// `field` must equal one of `within`.
    pub fn inclusion<I, V>(field: impl Into<String>, within: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::new(
            field,
            Check::Inclusion {
                within: within.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// `field` is checked by `f`.
    pub fn custom<F>(field: impl Into<String>, f: F) -> Self
    where
        F: Fn(Option<&Value>) -> Result<(), String> + Send + Sync + 'static,
    {
        Self::new(field, Check::Custom(CustomCheck::new(f)))
    }

    /// Replace the default error message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_flattened_check() {
        let rule: RuleDeclaration = serde_json::from_value(json!({
            "field": "age",
            "check": "numericality",
            "only_integer": true,
            "greater_than": 17,
        }))
        .unwrap();

        assert_eq!(rule.field, "age");
        assert!(rule.message.is_none());
        assert!(matches!(
            rule.check,
            Check::Numericality { only_integer: true, greater_than: Some(g), less_than: None } if g == 17.0
        ));
    }

    #[test]
    fn deserializes_unit_check_with_message() {
        let rule: RuleDeclaration = serde_json::from_value(json!({
            "field": "name",
            "check": "presence",
            "message": "is required",
        }))
        .unwrap();

        assert!(matches!(rule.check, Check::Presence));
        assert_eq!(rule.message.as_deref(), Some("is required"));
    }

    #[test]
    fn custom_check_is_not_loadable() {
        let result = serde_json::from_value::<RuleDeclaration>(json!({
            "field": "name",
            "check": "custom",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn inclusion_accepts_mixed_values() {
        let rule = RuleDeclaration::inclusion("size", ["s", "m", "l"]).with_message("bad size");
        assert!(matches!(rule.check, Check::Inclusion { ref within } if within.len() == 3));
        assert_eq!(rule.message.as_deref(), Some("bad size"));
    }
}
