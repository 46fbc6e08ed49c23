//! The built-in rule-list backend.

use std::fmt;
use std::marker::PhantomData;

use regex::Regex;
use serde_json::Value;

use super::check::{Check, CustomCheck, RuleDeclaration};
use super::fields::Fields;
use crate::adapter::BackendAdapter;
use crate::error::ConfigError;
use crate::sink::FieldErrors;

enum Compiled {
    Presence,
    Numericality {
        only_integer: bool,
        greater_than: Option<f64>,
        less_than: Option<f64>,
    },
    Length {
        min: Option<usize>,
        max: Option<usize>,
    },
    Format(Regex),
    Inclusion(Vec<Value>),
    Custom(CustomCheck),
}

struct CompiledRule {
    field: String,
    check: Compiled,
    message: Option<String>,
}

/// Backend checking an ordered list of [`RuleDeclaration`]s against any
/// [`Fields`] data object.
///
/// Declarations are checked and compiled when added, so a malformed rule
/// (bad regex, inverted bounds) fails at declaration time. Every failing
/// rule contributes one message to its field, in declaration order.
pub struct RuleSet<D: ?Sized> {
    rules: Vec<CompiledRule>,
    _data: PhantomData<fn(&D)>,
}

impl<D: ?Sized> RuleSet<D> {
    /// An empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            _data: PhantomData,
        }
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rule is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Fields targeted by the rules, in declaration order, with repeats.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.field.as_str())
    }
}

impl<D: ?Sized> Default for RuleSet<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: ?Sized> fmt::Debug for RuleSet<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("fields", &self.fields().collect::<Vec<_>>())
            .finish()
    }
}

impl<D: Fields + ?Sized> BackendAdapter for RuleSet<D> {
    type Data = D;
    type Rule = RuleDeclaration;

    fn add_rule(&mut self, rule: RuleDeclaration) -> Result<(), ConfigError> {
        let compiled = compile(rule)?;
        self.rules.push(compiled);
        Ok(())
    }

    fn apply(&self, data: &D) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for rule in &self.rules {
            let value = data.field(&rule.field);
            if let Err(default) = evaluate(&rule.check, value.as_deref()) {
                let message = rule.message.clone().unwrap_or(default);
                errors.push(rule.field.as_str(), message);
            }
        }
        errors
    }
}

fn compile(rule: RuleDeclaration) -> Result<CompiledRule, ConfigError> {
    let RuleDeclaration {
        field,
        check,
        message,
    } = rule;

    if field.trim().is_empty() {
        return Err(ConfigError::invalid_rule(field, "field name is empty"));
    }

    let check = match check {
        Check::Presence => Compiled::Presence,
        Check::Numericality {
            only_integer,
            greater_than,
            less_than,
        } => {
            if greater_than.is_some_and(|b| !b.is_finite())
                || less_than.is_some_and(|b| !b.is_finite())
            {
                return Err(ConfigError::invalid_rule(field, "numeric bounds must be finite"));
            }
            if let (Some(low), Some(high)) = (greater_than, less_than)
                && low >= high
            {
                return Err(ConfigError::invalid_rule(
                    field,
                    format!("greater_than {low} must be below less_than {high}"),
                ));
            }
            Compiled::Numericality {
                only_integer,
                greater_than,
                less_than,
            }
        }
        Check::Length { min, max } => match (min, max) {
            (None, None) => {
                return Err(ConfigError::invalid_rule(
                    field,
                    "length needs a minimum or a maximum",
                ));
            }
            (Some(min), Some(max)) if min > max => {
                return Err(ConfigError::invalid_rule(
                    field,
                    format!("minimum {min} exceeds maximum {max}"),
                ));
            }
            _ => Compiled::Length { min, max },
        },
        Check::Format { pattern } => match Regex::new(&pattern) {
            Ok(regex) => Compiled::Format(regex),
            Err(err) => return Err(ConfigError::invalid_rule(field, err.to_string())),
        },
        Check::Inclusion { within } => {
            if within.is_empty() {
                return Err(ConfigError::invalid_rule(field, "inclusion list is empty"));
            }
            Compiled::Inclusion(within)
        }
        Check::Custom(custom) => Compiled::Custom(custom),
    };

    Ok(CompiledRule {
        field,
        check,
        message,
    })
}

fn evaluate(check: &Compiled, value: Option<&Value>) -> Result<(), String> {
    match check {
        Compiled::Presence => {
            if is_blank(value) {
                return Err("can't be blank".into());
            }
        }
        Compiled::Numericality {
            only_integer,
            greater_than,
            less_than,
        } => {
            let Some(n) = value.and_then(as_number) else {
                return Err("is not a number".into());
            };
            if *only_integer && n.fract() != 0.0 {
                return Err("must be an integer".into());
            }
            if let Some(low) = greater_than
                && n <= *low
            {
                return Err(format!("must be greater than {low}"));
            }
            if let Some(high) = less_than
                && n >= *high
            {
                return Err(format!("must be less than {high}"));
            }
        }
        Compiled::Length { min, max } => {
            let len = length_of(value);
            if let (Some(min), Some(max)) = (min, max)
                && min == max
                && len != *min
            {
                return Err(format!("is the wrong length (should be {min} characters)"));
            }
            if let Some(min) = min
                && len < *min
            {
                return Err(format!("is too short (minimum is {min} characters)"));
            }
            if let Some(max) = max
                && len > *max
            {
                return Err(format!("is too long (maximum is {max} characters)"));
            }
        }
        Compiled::Format(regex) => match value {
            Some(Value::String(s)) if regex.is_match(s) => {}
            _ => return Err("is invalid".into()),
        },
        Compiled::Inclusion(within) => {
            if !value.is_some_and(|v| within.contains(v)) {
                return Err("is not included in the list".into());
            }
        }
        Compiled::Custom(custom) => custom.call(value)?,
    }
    Ok(())
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Bool(_) | Value::Number(_)) => false,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn length_of(value: Option<&Value>) -> usize {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::String(s)) => s.chars().count(),
        Some(Value::Array(items)) => items.len(),
        Some(Value::Object(map)) => map.len(),
        Some(other) => other.to_string().chars().count(),
    }
}
