//! Conditions gating whether a group runs.
//!
//! A condition is evaluated once per run, just before its group, against
//! the results of the groups that ran earlier in the same run.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{MissingCause, ReferenceError};

/// Predicate over prior results and the data object.
pub type Predicate<D> = Arc<dyn Fn(&ExecutionResult, &D) -> bool + Send + Sync>;

/// Gate deciding whether a group runs in the current pass.
pub enum Condition<D: ?Sized> {
    /// Run unconditionally.
    Always,
    /// Run iff the named group ran earlier in this pass and produced no errors.
    ReferenceTo(String),
    /// Run iff the predicate returns `true`.
    ///
    /// The predicate must not have side effects on what it reads.
    Predicate(Predicate<D>),
}

impl<D: ?Sized> Condition<D> {
    /// Condition referencing the result of `group`.
    pub fn reference(group: impl Into<String>) -> Self {
        Self::ReferenceTo(group.into())
    }

    /// Condition backed by a predicate.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&ExecutionResult, &D) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }

    /// The referenced group name, for `ReferenceTo` conditions.
    #[must_use]
    pub fn referenced_group(&self) -> Option<&str> {
        match self {
            Self::ReferenceTo(name) => Some(name.as_str()),
            _ => None,
        }
    }
}

impl<D: ?Sized> Default for Condition<D> {
    fn default() -> Self {
        Self::Always
    }
}

impl<D: ?Sized> Clone for Condition<D> {
    fn clone(&self) -> Self {
        match self {
            Self::Always => Self::Always,
            Self::ReferenceTo(name) => Self::ReferenceTo(name.clone()),
            Self::Predicate(f) => Self::Predicate(Arc::clone(f)),
        }
    }
}

impl<D: ?Sized> fmt::Debug for Condition<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("Always"),
            Self::ReferenceTo(name) => f.debug_tuple("ReferenceTo").field(name).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Outcome of one group in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStatus {
    /// Ran and produced no errors.
    Passed,
    /// Ran and produced at least one error.
    Failed,
    /// Did not run because its condition was false.
    Skipped,
}

/// Per-run results of the groups evaluated so far, in execution order.
///
/// Only groups that ran have a boolean result. Skipped groups are
/// remembered solely to explain a failed reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    statuses: IndexMap<String, GroupStatus>,
}

impl ExecutionResult {
    /// Create an empty result set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `Some(true)` if `group` ran without errors, `Some(false)` if it ran
    /// with errors, `None` if it has no result.
    #[must_use]
    pub fn get(&self, group: &str) -> Option<bool> {
        match self.statuses.get(group)? {
            GroupStatus::Passed => Some(true),
            GroupStatus::Failed => Some(false),
            GroupStatus::Skipped => None,
        }
    }

    /// Whether `group` ran and passed.
    #[must_use]
    pub fn passed(&self, group: &str) -> bool {
        self.get(group) == Some(true)
    }

    /// Whether `group` ran and failed.
    #[must_use]
    pub fn failed(&self, group: &str) -> bool {
        self.get(group) == Some(false)
    }

    /// Status of `group`, including `Skipped`.
    #[must_use]
    pub fn status(&self, group: &str) -> Option<GroupStatus> {
        self.statuses.get(group).copied()
    }

    /// Iterate over groups that ran, with their boolean result.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.statuses.iter().filter_map(|(name, status)| match status {
            GroupStatus::Passed => Some((name.as_str(), true)),
            GroupStatus::Failed => Some((name.as_str(), false)),
            GroupStatus::Skipped => None,
        })
    }

    /// Names of groups skipped so far.
    pub fn skipped(&self) -> impl Iterator<Item = &str> {
        self.statuses
            .iter()
            .filter(|(_, status)| **status == GroupStatus::Skipped)
            .map(|(name, _)| name.as_str())
    }

    /// Number of groups that ran.
    #[must_use]
    pub fn executed_count(&self) -> usize {
        self.iter().count()
    }

    pub(crate) fn record(&mut self, group: &str, passed: bool) {
        let status = if passed {
            GroupStatus::Passed
        } else {
            GroupStatus::Failed
        };
        self.statuses.insert(group.to_owned(), status);
    }

    pub(crate) fn record_skipped(&mut self, group: &str) {
        self.statuses.insert(group.to_owned(), GroupStatus::Skipped);
    }
}

/// Decide whether `group` runs under `condition`.
///
/// A `ReferenceTo` naming a group without a result is an error, never a
/// silent `false`.
pub fn should_run<D: ?Sized>(
    group: &str,
    condition: &Condition<D>,
    prior: &ExecutionResult,
    data: &D,
) -> Result<bool, ReferenceError> {
    match condition {
        Condition::Always => Ok(true),
        Condition::ReferenceTo(reference) => {
            prior.get(reference).ok_or_else(|| ReferenceError {
                group: group.to_owned(),
                reference: reference.clone(),
                cause: match prior.status(reference) {
                    Some(GroupStatus::Skipped) => MissingCause::Skipped,
                    _ => MissingCause::NotExecuted,
                },
            })
        }
        Condition::Predicate(predicate) => Ok(predicate(prior, data)),
    }
}
