//! Named rule bundles and their registration options.

use crate::adapter::BackendAdapter;
use crate::condition::{Condition, ExecutionResult};
use crate::error::ConfigError;
use crate::sink::FieldErrors;

/// One named, ordered bundle of rules bound to a backend adapter.
#[derive(Debug)]
pub struct Group<A> {
    name: String,
    adapter: A,
    rule_count: usize,
}

impl<A: BackendAdapter> Group<A> {
    pub(crate) fn new(name: impl Into<String>, adapter: A) -> Self {
        Self {
            name: name.into(),
            adapter,
            rule_count: 0,
        }
    }

    /// Declare a rule in this group.
    ///
    /// Rules apply in declaration order.
    pub fn rule(&mut self, rule: A::Rule) -> Result<&mut Self, ConfigError> {
        self.adapter.add_rule(rule)?;
        self.rule_count += 1;
        Ok(self)
    }

    /// Declare several rules at once, stopping at the first rejected one.
    pub fn rules<I>(&mut self, rules: I) -> Result<&mut Self, ConfigError>
    where
        I: IntoIterator<Item = A::Rule>,
    {
        for rule in rules {
            self.rule(rule)?;
        }
        Ok(self)
    }

    /// Run this group's rules against `data`.
    pub fn apply(&self, data: &A::Data) -> FieldErrors {
        self.adapter.apply(data)
    }

    /// Group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The backend adapter holding this group's rules.
    #[must_use]
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Number of rules declared so far.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rule_count
    }
}

/// Registration options for a group.
///
/// `inherit` and `after` are consumed when the group is added; the
/// condition is consulted on every run.
///
/// # Examples
///
/// ```rust,ignore
/// let options = GroupOptions::new().after("default").if_group("default");
/// ```
pub struct GroupOptions<D: ?Sized> {
    /// Reuse an existing group with the same name instead of adding one.
    pub inherit: bool,
    /// Insert right after this group rather than at the end.
    pub after: Option<String>,
    /// Gate evaluated before each run of the group.
    pub condition: Condition<D>,
}

impl<D: ?Sized> GroupOptions<D> {
    /// Options appending an unconditional group.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inherit: false,
            after: None,
            condition: Condition::Always,
        }
    }

    /// Reuse the group if it already exists.
    pub fn inherit(mut self) -> Self {
        self.inherit = true;
        self
    }

    /// Insert right after `group`.
    pub fn after(mut self, group: impl Into<String>) -> Self {
        self.after = Some(group.into());
        self
    }

    /// Gate the group with `condition`.
    pub fn when(mut self, condition: Condition<D>) -> Self {
        self.condition = condition;
        self
    }

    /// Run only if `group` ran earlier and passed.
    pub fn if_group(self, group: impl Into<String>) -> Self {
        self.when(Condition::ReferenceTo(group.into()))
    }

    /// Run only if `predicate` holds.
    pub fn if_predicate<F>(self, predicate: F) -> Self
    where
        F: Fn(&ExecutionResult, &D) -> bool + Send + Sync + 'static,
    {
        self.when(Condition::predicate(predicate))
    }
}

impl<D: ?Sized> Clone for GroupOptions<D> {
    fn clone(&self) -> Self {
        Self {
            inherit: self.inherit,
            after: self.after.clone(),
            condition: self.condition.clone(),
        }
    }
}

impl<D: ?Sized> std::fmt::Debug for GroupOptions<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupOptions")
            .field("inherit", &self.inherit)
            .field("after", &self.after)
            .field("condition", &self.condition)
            .finish()
    }
}

impl<D: ?Sized> Default for GroupOptions<D> {
    fn default() -> Self {
        Self::new()
    }
}
