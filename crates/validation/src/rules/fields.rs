//! Read access to field values of a data object.

use std::borrow::Cow;

use serde_json::{Map, Value};

/// A data object whose fields can be read by name.
///
/// Host types that do not store JSON values can build them on the fly and
/// return [`Cow::Owned`].
pub trait Fields {
    /// Value of `name`, or `None` if the object has no such field.
    fn field(&self, name: &str) -> Option<Cow<'_, Value>>;
}

/// Dotted paths walk nested objects and arrays: `address.city`, `items.0.sku`.
impl Fields for Value {
    fn field(&self, name: &str) -> Option<Cow<'_, Value>> {
        let mut current = self;
        for segment in name.split('.') {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(Cow::Borrowed(current))
    }
}

impl Fields for Map<String, Value> {
    fn field(&self, name: &str) -> Option<Cow<'_, Value>> {
        match name.split_once('.') {
            Some((head, rest)) => self.get(head)?.field(rest),
            None => self.get(name).map(Cow::Borrowed),
        }
    }
}

impl<T: Fields + ?Sized> Fields for &T {
    fn field(&self, name: &str) -> Option<Cow<'_, Value>> {
        (**self).field(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn top_level_field() {
        let data = json!({ "name": "Ada" });
        assert_eq!(data.field("name").as_deref(), Some(&json!("Ada")));
        assert!(data.field("age").is_none());
    }

    #[test]
    fn nested_paths() {
        let data = json!({
            "address": { "city": "Oslo" },
            "items": [{ "sku": "A1" }],
        });
        assert_eq!(data.field("address.city").as_deref(), Some(&json!("Oslo")));
        assert_eq!(data.field("items.0.sku").as_deref(), Some(&json!("A1")));
        assert!(data.field("items.x.sku").is_none());
        assert!(data.field("address.city.zip").is_none());
    }

    #[test]
    fn map_delegates_nested_paths() {
        let Value::Object(map) = json!({ "a": { "b": 1 } }) else {
            unreachable!()
        };
        assert_eq!(map.field("a.b").as_deref(), Some(&json!(1)));
        assert_eq!(map.field("a").as_deref(), Some(&json!({ "b": 1 })));
    }
}
