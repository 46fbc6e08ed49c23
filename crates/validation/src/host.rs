//! Attaching a registry to a host type.

use crate::adapter::BackendAdapter;
use crate::error::ReferenceError;
use crate::registry::GroupRegistry;
use crate::runner::Runner;
use crate::sink::{ErrorSink, FieldErrors};

/// Result of [`Validates::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    /// Overall verdict.
    pub valid: bool,
    /// Errors collected during the run.
    pub errors: FieldErrors,
}

/// A type carrying its own validation groups.
///
/// The registry is declared once per type, typically in a `LazyLock`, and
/// shared by every value of that type.
///
/// # Examples
///
/// ```rust,ignore
/// static GROUPS: LazyLock<GroupRegistry<RuleSet<Signup>>> = LazyLock::new(|| {
///     let mut registry = GroupRegistry::new();
///     registry
///         .declare_rule(RuleDeclaration::presence("email"))
///         .expect("valid signup rules");
///     registry
/// });
///
/// impl Validates for Signup {
///     type Adapter = RuleSet<Signup>;
///
///     fn validation_groups() -> &'static GroupRegistry<Self::Adapter> {
///         &GROUPS
///     }
/// }
///
/// let outcome = signup.validate()?;
/// ```
pub trait Validates {
    /// Backend the groups are declared against.
    type Adapter: BackendAdapter<Data = Self> + 'static;

    /// The type's group registry.
    fn validation_groups() -> &'static GroupRegistry<Self::Adapter>;

    /// Validate into a caller-owned sink and return the verdict.
    fn validate_into<S>(&self, errors: &mut S) -> Result<bool, ReferenceError>
    where
        S: ErrorSink + ?Sized,
    {
        Runner::new(Self::validation_groups()).execute(self, errors)
    }

    /// Validate into a fresh error collection.
    fn validate(&self) -> Result<Validation, ReferenceError> {
        let mut errors = FieldErrors::new();
        let valid = self.validate_into(&mut errors)?;
        Ok(Validation { valid, errors })
    }
}
