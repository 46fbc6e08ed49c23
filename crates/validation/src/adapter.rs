//! The capability contract every validation backend implements.

use crate::error::ConfigError;
use crate::sink::FieldErrors;

/// A pluggable validation backend bound to one group.
///
/// Each group owns a fresh adapter instance. Rules are registered once at
/// declaration time through [`add_rule`](Self::add_rule); afterwards the
/// adapter is only read, so [`apply`](Self::apply) takes `&self` and can be
/// called any number of times, from several threads if the adapter is
/// `Sync`.
///
/// # Examples
///
/// ```rust,ignore
/// use formgate_validation::{BackendAdapter, ConfigError, FieldErrors};
///
/// #[derive(Default)]
/// struct NonEmpty(Vec<String>);
///
/// impl BackendAdapter for NonEmpty {
///     type Data = std::collections::HashMap<String, String>;
///     type Rule = String;
///
///     fn add_rule(&mut self, field: String) -> Result<(), ConfigError> {
///         self.0.push(field);
///         Ok(())
///     }
///
///     fn apply(&self, data: &Self::Data) -> FieldErrors {
///         self.0
///             .iter()
///             .filter(|f| data.get(*f).is_none_or(String::is_empty))
///             .map(|f| (f.clone(), "can't be blank"))
///             .collect()
///     }
/// }
/// ```
pub trait BackendAdapter {
    /// The data object rules are checked against.
    type Data: ?Sized;

    /// Backend-specific rule declaration.
    type Rule;

    /// Register one rule.
    ///
    /// Rejecting a declaration here is the only place a backend may fail;
    /// the error surfaces at declaration time, never during validation.
    fn add_rule(&mut self, rule: Self::Rule) -> Result<(), ConfigError>;

    /// Run every registered rule against `data`.
    ///
    /// Returns a private error set owned by the caller. Implementations must
    /// not touch any shared error state.
    fn apply(&self, data: &Self::Data) -> FieldErrors;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Flags(Vec<&'static str>);

    impl BackendAdapter for Flags {
        type Data = [&'static str];
        type Rule = &'static str;

        fn add_rule(&mut self, rule: &'static str) -> Result<(), ConfigError> {
            if rule.is_empty() {
                return Err(ConfigError::invalid_rule(rule, "empty flag"));
            }
            self.0.push(rule);
            Ok(())
        }

        fn apply(&self, data: &[&'static str]) -> FieldErrors {
            self.0
                .iter()
                .filter(|flag| !data.contains(*flag))
                .map(|flag| (*flag, "must be set"))
                .collect()
        }
    }

    #[test]
    fn apply_is_repeatable() {
        let mut adapter = Flags::default();
        adapter.add_rule("terms").unwrap();

        let first = adapter.apply(&["other"]);
        let second = adapter.apply(&["other"]);
        assert_eq!(first, second);
        assert_eq!(first.get("terms"), ["must be set"]);
        assert!(adapter.apply(&["terms"]).is_empty());
    }

    #[test]
    fn add_rule_rejects_at_declaration() {
        let mut adapter = Flags::default();
        assert!(matches!(
            adapter.add_rule(""),
            Err(ConfigError::InvalidRule { .. })
        ));
    }
}
