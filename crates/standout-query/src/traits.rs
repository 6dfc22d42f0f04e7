//! Field access for matchable items.
//!
//! Predicates never look inside an item directly; they ask for fields
//! through the [`Document`] trait. Records expose their entries, and any
//! other value behaves like an item with no fields at all.

use crate::value::{Record, Value};

/// Trait for items that predicates can be evaluated against.
///
/// Implemented for [`Value`] and [`Record`], and for references to any
/// implementor.
///
/// # Manual Implementation
///
/// ```
/// use standout_query::{Document, Value, query};
/// use serde_json::json;
///
/// struct Task {
///     fields: Value,
/// }
///
/// impl Document for Task {
///     fn field(&self, name: &str) -> Option<&Value> {
///         self.fields.get(name)
///     }
/// }
///
/// let task = Task { fields: Value::from(json!({ "priority": 5 })) };
/// let condition = Value::from(json!({ "priority": { "$greater": 3 } }));
/// assert!(query(Some(&condition)).matches(&task));
/// ```
pub trait Document {
    /// Returns the value of a field, or `None` if the field is absent.
    ///
    /// An absent field is different from a field holding [`Value::Null`]:
    /// negative operators such as `$not` pass on absent fields, while
    /// `{ field: null }` only matches an explicit null.
    fn field(&self, name: &str) -> Option<&Value>;
}

impl Document for Value {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl Document for Record {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl<T: Document + ?Sized> Document for &T {
    fn field(&self, name: &str) -> Option<&Value> {
        (**self).field(name)
    }
}

impl<T: Document + ?Sized> Document for Box<T> {
    fn field(&self, name: &str) -> Option<&Value> {
        (**self).field(name)
    }
}
