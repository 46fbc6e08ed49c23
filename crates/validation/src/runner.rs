//! Single-pass execution of a group registry.

use tracing::{debug, debug_span, trace, warn};

use crate::adapter::BackendAdapter;
use crate::condition::{ExecutionResult, should_run};
use crate::error::ReferenceError;
use crate::registry::GroupRegistry;
use crate::sink::{ErrorSink, merge_into};

/// Outcome of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// `true` iff the sink stayed empty after every group.
    pub valid: bool,
    /// Per-group results of this run, in execution order.
    pub results: ExecutionResult,
}

/// Runs a registry front to back against one data object.
///
/// Groups execute strictly in registry order. Each group's errors are
/// appended to the sink after those of earlier groups. The verdict is a
/// running AND of "the sink is empty" taken after every group, so a later
/// passing group never hides an earlier failure; this is a different signal
/// from the per-group results conditions look at.
pub struct Runner<'r, A: BackendAdapter> {
    registry: &'r GroupRegistry<A>,
}

impl<'r, A: BackendAdapter> Runner<'r, A> {
    /// Runner over `registry`.
    #[must_use]
    pub fn new(registry: &'r GroupRegistry<A>) -> Self {
        Self { registry }
    }

    /// Validate `data`, appending errors to `sink`, and return the verdict.
    pub fn execute<S>(&self, data: &A::Data, sink: &mut S) -> Result<bool, ReferenceError>
    where
        S: ErrorSink + ?Sized,
    {
        self.run(data, sink).map(|report| report.valid)
    }

    /// Like [`execute`](Self::execute), also returning the per-group results.
    pub fn run<S>(&self, data: &A::Data, sink: &mut S) -> Result<RunReport, ReferenceError>
    where
        S: ErrorSink + ?Sized,
    {
        let span = debug_span!("validation_run", groups = self.registry.len());
        let _guard = span.enter();

        let mut results = ExecutionResult::new();
        let mut valid = true;

        for (name, group, options) in self.registry.iter() {
            let run = should_run(name, &options.condition, &results, data)
                .inspect_err(|err| warn!(%err, "unresolved group reference"))?;

            if run {
                let private = group.apply(data);
                let passed = private.is_empty();
                trace!(
                    group = name,
                    passed,
                    errors = private.message_count(),
                    "ran validation group"
                );
                merge_into(sink, private);
                results.record(name, passed);
            } else {
                trace!(group = name, "skipped validation group");
                results.record_skipped(name);
            }

            valid &= sink.is_empty();
        }

        debug!(valid, executed = results.executed_count(), "validation run finished");
        Ok(RunReport { valid, results })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, MissingCause};
    use crate::group::GroupOptions;
    use crate::sink::FieldErrors;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    /// Fails every listed field that is absent from the object.
    #[derive(Debug, Default)]
    struct Required(Vec<(&'static str, &'static str)>);

    impl BackendAdapter for Required {
        type Data = Value;
        type Rule = (&'static str, &'static str);

        fn add_rule(&mut self, rule: Self::Rule) -> Result<(), ConfigError> {
            self.0.push(rule);
            Ok(())
        }

        fn apply(&self, data: &Value) -> FieldErrors {
            self.0
                .iter()
                .filter(|(field, _)| data.get(*field).is_none())
                .map(|(field, message)| (*field, *message))
                .collect()
        }
    }

    type Declaration = (&'static str, GroupOptions<Value>, &'static str, &'static str);

    fn registry(groups: &[Declaration]) -> GroupRegistry<Required> {
        let mut registry = GroupRegistry::new();
        for (name, options, field, message) in groups {
            registry
                .add(*name, options.clone())
                .unwrap()
                .rule((*field, *message))
                .unwrap();
        }
        registry
    }

    #[test]
    fn empty_registry_is_valid() {
        let registry = GroupRegistry::<Required>::new();
        let mut sink = FieldErrors::new();
        assert!(Runner::new(&registry).execute(&json!({}), &mut sink).unwrap());
    }

    #[test]
    fn all_groups_pass() {
        let registry = registry(&[
            ("a", GroupOptions::new(), "name", "a"),
            ("b", GroupOptions::new(), "age", "b"),
        ]);
        let mut sink = FieldErrors::new();
        let report = Runner::new(&registry)
            .run(&json!({ "name": "x", "age": 1 }), &mut sink)
            .unwrap();

        assert!(report.valid);
        assert!(sink.is_empty());
        assert_eq!(report.results.iter().collect::<Vec<_>>(), vec![("a", true), ("b", true)]);
    }

    #[test]
    fn earlier_failure_is_not_masked_by_later_pass() {
        let registry = registry(&[
            ("a", GroupOptions::new(), "name", "missing name"),
            ("b", GroupOptions::new(), "age", "missing age"),
        ]);
        let mut sink = FieldErrors::new();
        let report = Runner::new(&registry)
            .run(&json!({ "age": 1 }), &mut sink)
            .unwrap();

        assert!(!report.valid);
        assert_eq!(report.results.get("a"), Some(false));
        assert_eq!(report.results.get("b"), Some(true));
    }

    #[test]
    fn errors_for_one_field_keep_group_order() {
        let registry = registry(&[
            ("a", GroupOptions::new(), "name", "from a"),
            ("b", GroupOptions::new(), "name", "from b"),
        ]);
        let mut sink = FieldErrors::new();
        Runner::new(&registry).execute(&json!({}), &mut sink).unwrap();

        assert_eq!(sink.get("name"), ["from a", "from b"]);
    }

    #[test]
    fn reference_gates_on_prior_result() {
        let registry = registry(&[
            ("a", GroupOptions::new(), "name", "missing name"),
            ("b", GroupOptions::new().if_group("a"), "age", "missing age"),
        ]);

        let mut sink = FieldErrors::new();
        let report = Runner::new(&registry).run(&json!({}), &mut sink).unwrap();
        assert_eq!(report.results.status("b"), Some(crate::GroupStatus::Skipped));
        assert!(!sink.contains("age"));

        let mut sink = FieldErrors::new();
        let report = Runner::new(&registry)
            .run(&json!({ "name": "x" }), &mut sink)
            .unwrap();
        assert_eq!(report.results.get("b"), Some(false));
        assert_eq!(sink.get("age"), ["missing age"]);
    }

    #[test]
    fn reference_to_skipped_group_is_an_error() {
        let registry = registry(&[
            ("a", GroupOptions::new().if_predicate(|_, _| false), "name", "x"),
            ("b", GroupOptions::new().if_group("a"), "age", "y"),
        ]);
        let mut sink = FieldErrors::new();
        let err = Runner::new(&registry).execute(&json!({}), &mut sink).unwrap_err();

        assert_eq!(err.group, "b");
        assert_eq!(err.reference, "a");
        assert_eq!(err.cause, MissingCause::Skipped);
    }

    #[test]
    fn forward_reference_is_an_error() {
        let registry = registry(&[
            ("a", GroupOptions::new().if_group("b"), "name", "x"),
            ("b", GroupOptions::new(), "age", "y"),
        ]);
        let err = registry.execute(&json!({}), &mut FieldErrors::new()).unwrap_err();
        assert_eq!(err.cause, MissingCause::NotExecuted);
    }

    #[test]
    fn prefilled_sink_fails_verdict() {
        let registry = registry(&[("a", GroupOptions::new(), "name", "x")]);
        let mut sink: FieldErrors = [("base", "already broken")].into_iter().collect();

        assert!(!Runner::new(&registry).execute(&json!({ "name": 1 }), &mut sink).unwrap());
        assert_eq!(sink.get("base"), ["already broken"]);
    }

    #[test]
    fn skipped_group_still_sees_accumulated_errors() {
        let registry = registry(&[
            ("a", GroupOptions::new(), "name", "x"),
            ("b", GroupOptions::new().if_predicate(|prior, _| prior.passed("a")), "age", "y"),
        ]);
        let mut sink = FieldErrors::new();
        let report = Runner::new(&registry).run(&json!({}), &mut sink).unwrap();

        assert!(!report.valid);
        assert_eq!(report.results.get("b"), None);
    }

    #[test]
    fn repeated_runs_are_independent() {
        let registry = registry(&[("a", GroupOptions::new(), "name", "x")]);
        let runner = Runner::new(&registry);

        let mut first = FieldErrors::new();
        let mut second = FieldErrors::new();
        assert!(!runner.execute(&json!({}), &mut first).unwrap());
        assert!(runner.execute(&json!({ "name": 1 }), &mut second).unwrap());
        assert_eq!(first.message_count(), 1);
        assert!(second.is_empty());
    }

    #[test]
    fn self_reference_is_an_error() {
        let registry = registry(&[
            ("a", GroupOptions::new(), "name", "x"),
            ("b", GroupOptions::new().if_group("b"), "age", "y"),
        ]);
        let mut sink = FieldErrors::new();
        let err = Runner::new(&registry)
            .execute(&json!({ "name": 1 }), &mut sink)
            .unwrap_err();

        assert_eq!(err.group, "b");
        assert_eq!(err.reference, "b");
        assert_eq!(err.cause, MissingCause::NotExecuted);
    }

    #[test]
    fn runs_into_caller_owned_map_sinks() {
        use std::collections::BTreeMap;

        use indexmap::IndexMap;

        let registry = registry(&[
            ("a", GroupOptions::new(), "name", "missing name"),
            ("b", GroupOptions::new(), "age", "missing age"),
            ("c", GroupOptions::new(), "name", "still missing"),
        ]);
        let runner = Runner::new(&registry);

        let mut ordered: IndexMap<String, Vec<String>> = IndexMap::new();
        assert!(!runner.execute(&json!({}), &mut ordered).unwrap());
        assert_eq!(ordered.keys().collect::<Vec<_>>(), vec!["name", "age"]);
        assert_eq!(ordered["name"], ["missing name", "still missing"]);

        let mut sorted: BTreeMap<String, Vec<String>> = BTreeMap::new();
        assert!(!runner.execute(&json!({}), &mut sorted).unwrap());
        assert_eq!(sorted.keys().collect::<Vec<_>>(), vec!["age", "name"]);
        assert_eq!(sorted["name"], ["missing name", "still missing"]);

        let mut clean: BTreeMap<String, Vec<String>> = BTreeMap::new();
        assert!(runner.execute(&json!({ "name": 1, "age": 2 }), &mut clean).unwrap());
        assert!(clean.is_empty());
    }
}
