//! Field-keyed error collections.
//!
//! [`FieldErrors`] is the single normalized shape every backend returns.
//! The caller's accumulator only needs to implement [`ErrorSink`]; the
//! runner appends into it with [`merge_into`].

use std::collections::BTreeMap;

use indexmap::IndexMap;

/// Caller-owned accumulator of field-keyed error messages.
///
/// Implementations must append: adding a message for a field that already
/// has messages keeps the earlier ones in front.
pub trait ErrorSink {
    /// Appends `message` to the messages recorded for `field`.
    fn add(&mut self, field: &str, message: String);

    /// Whether no message has been recorded.
    fn is_empty(&self) -> bool;

    /// Iterate `(field, messages)` for every field holding at least one
    /// message, in the sink's own field order.
    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &[String])> + '_>;
}

/// Ordered mapping of field name to error messages.
///
/// Fields iterate in the order they first received a message; messages of
/// one field keep the order they were added in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    fields: IndexMap<String, Vec<String>>,
}

impl FieldErrors {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message for `field`.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Messages recorded for `field`, empty if none.
    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map_or(&[], Vec::as_slice)
    }

    /// Whether `field` has at least one message.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Number of fields with messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Total number of messages across all fields.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    /// Whether no field has a message.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate `(field, messages)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Field names in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Drop every message.
    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

impl ErrorSink for FieldErrors {
    fn add(&mut self, field: &str, message: String) {
        self.push(field, message);
    }

    fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &[String])> + '_> {
        Box::new(self.iter())
    }
}

impl ErrorSink for IndexMap<String, Vec<String>> {
    fn add(&mut self, field: &str, message: String) {
        self.entry(field.to_owned()).or_default().push(message);
    }

    fn is_empty(&self) -> bool {
        // An entry may exist with no messages if the caller inserted it.
        self.values().all(Vec::is_empty)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &[String])> + '_> {
        Box::new(non_empty(self.iter()))
    }
}

impl ErrorSink for BTreeMap<String, Vec<String>> {
    fn add(&mut self, field: &str, message: String) {
        self.entry(field.to_owned()).or_default().push(message);
    }

    fn is_empty(&self) -> bool {
        self.values().all(Vec::is_empty)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &[String])> + '_> {
        Box::new(non_empty(self.iter()))
    }
}

fn non_empty<'a>(
    entries: impl Iterator<Item = (&'a String, &'a Vec<String>)>,
) -> impl Iterator<Item = (&'a str, &'a [String])> {
    entries
        .filter(|(_, messages)| !messages.is_empty())
        .map(|(field, messages)| (field.as_str(), messages.as_slice()))
}

impl IntoIterator for FieldErrors {
    type Item = (String, Vec<String>);
    type IntoIter = indexmap::map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<K: Into<String>, M: Into<String>> FromIterator<(K, M)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (K, M)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (field, message) in iter {
            errors.push(field, message);
        }
        errors
    }
}

/// Appends every message of `private` into `sink`.
///
/// Existing messages in the sink are never replaced. Fields are visited in
/// the order `private` first saw them.
pub fn merge_into<S>(sink: &mut S, private: FieldErrors)
where
    S: ErrorSink + ?Sized,
{
    for (field, messages) in private {
        for message in messages {
            sink.add(&field, message);
        }
    }
}
