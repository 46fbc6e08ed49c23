//! Declaring rule-set registries from JSON.
//!
//! ```json
//! {
//!   "groups": [
//!     { "name": "default", "rules": [{ "field": "name", "check": "presence" }] },
//!     { "name": "extra", "after": "default", "if": "default",
//!       "rules": [{ "field": "age", "check": "numericality" }] }
//!   ]
//! }
//! ```
//!
//! Groups are declared in list order with the same semantics as
//! [`GroupRegistry::declare_group`]. Predicate conditions exist only in code.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::group::GroupOptions;
use crate::registry::GroupRegistry;
use crate::rules::{Fields, RuleDeclaration, RuleSet};

/// One group declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupSpec {
    /// Group name.
    pub name: String,
    /// Reopen the group if it already exists.
    #[serde(default)]
    pub inherit: bool,
    /// Insert right after this group.
    #[serde(default)]
    pub after: Option<String>,
    /// Run only if this group ran earlier and passed.
    #[serde(default, rename = "if")]
    pub if_group: Option<String>,
    /// Rules, in order.
    #[serde(default)]
    pub rules: Vec<RuleDeclaration>,
}

/// A full registry declaration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Group declarations, in order.
    pub groups: Vec<GroupSpec>,
}

impl RegistryConfig {
    /// Parse a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a registry over data objects of type `D`.
    pub fn build<D>(&self) -> Result<GroupRegistry<RuleSet<D>>, ConfigError>
    where
        D: Fields + ?Sized + 'static,
    {
        let mut registry = GroupRegistry::new();
        self.apply_to(&mut registry)?;
        Ok(registry)
    }

    /// Declare these groups on an existing registry.
    pub fn apply_to<D>(&self, registry: &mut GroupRegistry<RuleSet<D>>) -> Result<(), ConfigError>
    where
        D: Fields + ?Sized + 'static,
    {
        for spec in &self.groups {
            let mut options = GroupOptions::<D>::new();
            options.inherit = spec.inherit;
            options.after.clone_from(&spec.after);
            if let Some(reference) = &spec.if_group {
                options = options.if_group(reference.as_str());
            }
            registry.declare_group(spec.name.as_str(), options, |group| {
                group.rules(spec.rules.iter().cloned()).map(|_| ())
            })?;
        }
        Ok(())
    }
}
