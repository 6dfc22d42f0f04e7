//! Query facade.
//!
//! A [`Filter`] is a compiled condition: compile once, then test as many
//! items as needed. Every top-level predicate must hold for an item to match.

use crate::compiler::Compiler;
use crate::error::Result;
use crate::predicate::{all_hold, Predicate};
use crate::traits::Document;
use crate::value::Value;

/// A compiled, reusable condition.
///
/// # Example
///
/// ```
/// use standout_query::{query, Value};
/// use serde_json::json;
///
/// let condition = Value::from(json!({ "age": { "$greaterEqual": 18 }, "active": true }));
/// let adults = query(Some(&condition));
///
/// let people: Vec<Value> = vec![
///     Value::from(json!({ "name": "Ann", "age": 34, "active": true })),
///     Value::from(json!({ "name": "Bob", "age": 12, "active": true })),
///     Value::from(json!({ "name": "Cy", "age": 50, "active": false })),
/// ];
///
/// let matched = adults.filter(&people);
/// assert_eq!(matched.len(), 1);
/// assert_eq!(matched[0].get("name"), Some(&Value::from("Ann")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    /// Compiles a condition leniently. Malformed parts never match.
    pub fn new(condition: Option<&Value>) -> Self {
        // Lenient compilation never fails.
        let predicates = Compiler::new()
            .compile(condition)
            .unwrap_or_else(|_| vec![Predicate::Never]);
        Filter { predicates }
    }

    /// Compiles a condition strictly, reporting malformed parts.
    pub fn try_new(condition: Option<&Value>) -> Result<Self> {
        let predicates = Compiler::new().strict(true).compile(condition)?;
        Ok(Filter { predicates })
    }

    /// Wraps already compiled predicates.
    pub fn from_predicates(predicates: Vec<Predicate>) -> Self {
        Filter { predicates }
    }

    /// Returns the compiled top-level predicates.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Consumes the filter, returning its predicates.
    pub fn into_predicates(self) -> Vec<Predicate> {
        self.predicates
    }

    /// Returns the number of top-level predicates.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Returns `true` if this filter has no predicates (matches everything).
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Tests if a single item matches.
    pub fn matches<D: Document + ?Sized>(&self, item: &D) -> bool {
        all_hold(&self.predicates, item)
    }

    /// Converts the filter into a plain closure over values.
    pub fn into_fn(self) -> impl Fn(&Value) -> bool + Send + Sync {
        move |item: &Value| self.matches(item)
    }

    /// Filters a slice, returning references to matching items in order.
    pub fn filter<'a, D: Document>(&self, items: &'a [D]) -> Vec<&'a D> {
        items.iter().filter(|item| self.matches(*item)).collect()
    }

    /// Filters and clones matching items.
    pub fn filter_cloned<D: Document + Clone>(&self, items: &[D]) -> Vec<D> {
        self.filter(items).into_iter().cloned().collect()
    }

    /// Filters a vector in place, keeping only matching items.
    pub fn retain<D: Document>(&self, items: &mut Vec<D>) {
        items.retain(|item| self.matches(item));
    }

    /// Counts the number of matching items.
    pub fn count<D: Document>(&self, items: &[D]) -> usize {
        items.iter().filter(|item| self.matches(*item)).count()
    }

    /// Returns `true` if any item matches.
    pub fn any<D: Document>(&self, items: &[D]) -> bool {
        items.iter().any(|item| self.matches(item))
    }

    /// Returns `true` if all items match.
    pub fn all<D: Document>(&self, items: &[D]) -> bool {
        items.iter().all(|item| self.matches(item))
    }

    /// Finds the first matching item.
    pub fn find<'a, D: Document>(&self, items: &'a [D]) -> Option<&'a D> {
        items.iter().find(|item| self.matches(*item))
    }

    /// Finds the first matching item and returns its index.
    pub fn position<D: Document>(&self, items: &[D]) -> Option<usize> {
        items.iter().position(|item| self.matches(item))
    }
}
