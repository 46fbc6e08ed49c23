//! Ordered, name-indexed collection of validation groups.
//!
//! Declaration order is execution order. `after` inserts a group right
//! behind an existing one; `inherit` reopens an existing group so repeated
//! declarations keep adding rules to it.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::debug;

use crate::adapter::BackendAdapter;
use crate::condition::Condition;
use crate::error::{ConfigError, ReferenceError};
use crate::group::{Group, GroupOptions};
use crate::runner::Runner;
use crate::sink::ErrorSink;

/// Name of the implicit group that [`GroupRegistry::declare_rule`] feeds.
pub const DEFAULT_GROUP: &str = "default";

type AdapterFactory<A> = Box<dyn Fn() -> A + Send + Sync>;

struct Entry<A: BackendAdapter> {
    group: Group<A>,
    options: GroupOptions<A::Data>,
}

/// Ordered registry of validation groups sharing one backend type.
///
/// Each new group receives a fresh adapter from the registry's factory.
/// The registry is only read while running, so one instance can serve
/// concurrent runs over different data objects and sinks.
///
/// # Examples
///
/// ```rust,ignore
/// use formgate_validation::prelude::*;
///
/// let mut registry: GroupRegistry<RuleSet<Value>> = GroupRegistry::new();
/// registry.declare_rule(RuleDeclaration::presence("name"))?;
/// registry.declare_group(
///     "extra",
///     GroupOptions::new().after(DEFAULT_GROUP).if_group(DEFAULT_GROUP),
///     |group| {
///         group.rule(RuleDeclaration::numericality("age"))?;
///         Ok(())
///     },
/// )?;
/// ```
pub struct GroupRegistry<A: BackendAdapter> {
    entries: Vec<Entry<A>>,
    index: HashMap<String, usize>,
    factory: AdapterFactory<A>,
}

impl<A> GroupRegistry<A>
where
    A: BackendAdapter + Default + 'static,
{
    /// Create an empty registry whose groups start from `A::default()`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_factory(A::default)
    }
}

impl<A> Default for GroupRegistry<A>
where
    A: BackendAdapter + Default + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A: BackendAdapter> GroupRegistry<A> {
    /// Create an empty registry building adapters with `factory`.
    pub fn with_factory<F>(factory: F) -> Self
    where
        F: Fn() -> A + Send + Sync + 'static,
    {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            factory: Box::new(factory),
        }
    }

    /// Add a group, or reopen an existing one when `options.inherit` is set.
    ///
    /// Reopening returns the existing group untouched: its position and
    /// options stay as first declared and the new options are dropped.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        options: GroupOptions<A::Data>,
    ) -> Result<&mut Group<A>, ConfigError> {
        let name = name.into();

        if let Some(&existing) = self.index.get(&name) {
            if !options.inherit {
                return Err(ConfigError::DuplicateGroup { group: name });
            }
            debug!(group = %name, "reopened validation group");
            return Ok(&mut self.entries[existing].group);
        }

        let at = match options.after.as_deref() {
            Some(after) => match self.index.get(after) {
                Some(&anchor) => anchor + 1,
                None => {
                    return Err(ConfigError::UnknownAfter {
                        group: name,
                        after: after.to_owned(),
                    });
                }
            },
            None => self.entries.len(),
        };

        let group = Group::new(name.as_str(), (self.factory)());
        self.entries.insert(at, Entry { group, options });
        self.reindex(at);

        debug!(group = %name, position = at, "declared validation group");
        Ok(&mut self.entries[at].group)
    }

    /// Add (or reopen) a group and run `block` to declare its rules.
    ///
    /// A failing block leaves the group registered with the rules declared
    /// before the failure; declaration errors are meant to abort setup.
    pub fn declare_group<F>(
        &mut self,
        name: impl Into<String>,
        options: GroupOptions<A::Data>,
        block: F,
    ) -> Result<&mut Group<A>, ConfigError>
    where
        F: FnOnce(&mut Group<A>) -> Result<(), ConfigError>,
    {
        let group = self.add(name, options)?;
        block(&mut *group)?;
        Ok(group)
    }

    /// Declare one rule in the implicit [`DEFAULT_GROUP`].
    pub fn declare_rule(&mut self, rule: A::Rule) -> Result<&mut Group<A>, ConfigError> {
        self.declare_group(DEFAULT_GROUP, GroupOptions::new().inherit(), |group| {
            group.rule(rule).map(|_| ())
        })
    }

    /// Look up a group by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Group<A>> {
        self.index.get(name).map(|&i| &self.entries[i].group)
    }

    /// Look up a group by name for further rule declarations.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Group<A>> {
        let i = *self.index.get(name)?;
        Some(&mut self.entries[i].group)
    }

    /// Options a group was declared with.
    #[must_use]
    pub fn options(&self, name: &str) -> Option<&GroupOptions<A::Data>> {
        self.index.get(name).map(|&i| &self.entries[i].options)
    }

    /// Execution position of a group.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Whether a group with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Read-only view of `(name, group, options)` in execution order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Group<A>, &GroupOptions<A::Data>)> {
        self.entries
            .iter()
            .map(|entry| (entry.group.name(), &entry.group, &entry.options))
    }

    /// Group names in execution order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.group.name())
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no group is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Report the first `ReferenceTo` condition that names a group which
    /// does not come earlier in execution order.
    ///
    /// Passing this check does not rule out a [`ReferenceError`] at run
    /// time: a referenced group may still be skipped by its own condition.
    pub fn check_references(&self) -> Result<(), ConfigError> {
        let mut earlier = HashSet::new();
        for entry in &self.entries {
            let name = entry.group.name();
            if let Condition::ReferenceTo(reference) = &entry.options.condition
                && !earlier.contains(reference.as_str())
            {
                return Err(ConfigError::UnresolvedReference {
                    group: name.to_owned(),
                    reference: reference.clone(),
                });
            }
            earlier.insert(name);
        }
        Ok(())
    }

    /// Run every group against `data`, appending errors to `sink`.
    ///
    /// Shorthand for [`Runner::execute`].
    pub fn execute<S>(&self, data: &A::Data, sink: &mut S) -> Result<bool, ReferenceError>
    where
        S: ErrorSink + ?Sized,
    {
        Runner::new(self).execute(data, sink)
    }

    // Positions from `from` onward shifted by the insertion.
    fn reindex(&mut self, from: usize) {
        for (i, entry) in self.entries.iter().enumerate().skip(from) {
            self.index.insert(entry.group.name().to_owned(), i);
        }
    }
}

impl<A: BackendAdapter> fmt::Debug for GroupRegistry<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupRegistry")
            .field("groups", &self.names().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
