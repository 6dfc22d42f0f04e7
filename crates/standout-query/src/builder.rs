//! Fluent builders for condition documents.
//!
//! [`Condition`] and [`Operators`] produce the same [`Value`] documents that
//! could be written as JSON, so built and parsed conditions compile
//! identically.
//!
//! ```
//! use standout_query::{Condition, Operators, Value};
//! use serde_json::json;
//!
//! let built = Condition::new()
//!     .field("age", Operators::new().greater_equal(18).less(65))
//!     .or([
//!         Condition::new().eq("role", "admin"),
//!         Condition::new().nested("team", Condition::new().eq("lead", true)),
//!     ])
//!     .build();
//!
//! let parsed = Value::from(json!({
//!     "age": { "$greaterEqual": 18, "$less": 65 },
//!     "$or": [{ "role": "admin" }, { "team": { "lead": true } }]
//! }));
//!
//! assert_eq!(built, parsed);
//! ```

use crate::op::{Logical, Operator};
use crate::query::Filter;
use crate::value::{Record, Value};

/// Builder for a condition document.
///
/// Each method sets one top-level key; setting the same key twice keeps the
/// last value.
#[derive(Debug, Clone, Default)]
pub struct Condition {
    entries: Record,
}

impl Condition {
    /// Creates an empty condition, which matches every item.
    pub fn new() -> Self {
        Condition::default()
    }

    /// Requires `field` to equal `value`.
    ///
    /// A record `value` is a nested condition rather than a literal, exactly
    /// as in a parsed document; use [`Operators::equal`] to compare records.
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.entries.insert(field.to_string(), value.into());
        self
    }

    /// Applies operators to `field`. An empty operator set adds nothing.
    pub fn field(mut self, field: &str, operators: Operators) -> Self {
        if !operators.is_empty() {
            self.entries.insert(field.to_string(), operators.build());
        }
        self
    }

    /// Matches `field` as a sub-document against `condition`.
    pub fn nested(mut self, field: &str, condition: Condition) -> Self {
        self.entries.insert(field.to_string(), condition.build());
        self
    }

    /// Every branch must match.
    pub fn and<I: IntoIterator<Item = Condition>>(self, branches: I) -> Self {
        self.logical(Logical::And, branches)
    }

    /// At least one branch must match.
    pub fn or<I: IntoIterator<Item = Condition>>(self, branches: I) -> Self {
        self.logical(Logical::Or, branches)
    }

    /// No branch may match.
    pub fn nor<I: IntoIterator<Item = Condition>>(self, branches: I) -> Self {
        self.logical(Logical::Nor, branches)
    }

    fn logical<I: IntoIterator<Item = Condition>>(mut self, kind: Logical, branches: I) -> Self {
        let branches = branches.into_iter().map(Condition::build).collect();
        self.entries
            .insert(kind.as_str().to_string(), Value::Sequence(branches));
        self
    }

    /// Returns `true` if no key has been set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finishes the document.
    pub fn build(self) -> Value {
        Value::Record(self.entries)
    }

    /// Finishes the document and compiles it.
    pub fn compile(self) -> Filter {
        Filter::new(Some(&self.build()))
    }
}

impl From<Condition> for Value {
    fn from(condition: Condition) -> Self {
        condition.build()
    }
}

/// Builder for one field's operator condition.
///
/// Operands are optional through [`Operators::with`]: a `None` operand
/// leaves the operator out entirely, so conditions assembled from optional
/// inputs never gain vacuous tests.
///
/// ```
/// use standout_query::{Condition, Operators, Operator, Value};
///
/// let min_age: Option<i64> = None;
/// let ops = Operators::new()
///     .with(Operator::GreaterEqual, min_age.map(Value::from))
///     .not("guest");
///
/// assert_eq!(ops.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Operators {
    entries: Record,
}

impl Operators {
    /// Creates an empty operator set.
    pub fn new() -> Self {
        Operators::default()
    }

    /// Sets `op` to `operand`, or leaves it unset when `operand` is `None`.
    pub fn with(mut self, op: Operator, operand: Option<Value>) -> Self {
        if let Some(operand) = operand {
            self.entries.insert(op.as_str().to_string(), operand);
        }
        self
    }

    fn set(self, op: Operator, operand: impl Into<Value>) -> Self {
        self.with(op, Some(operand.into()))
    }

    /// `$less`.
    pub fn less(self, value: impl Into<Value>) -> Self {
        self.set(Operator::Less, value)
    }

    /// `$lessEqual`.
    pub fn less_equal(self, value: impl Into<Value>) -> Self {
        self.set(Operator::LessEqual, value)
    }

    /// `$greater`.
    pub fn greater(self, value: impl Into<Value>) -> Self {
        self.set(Operator::Greater, value)
    }

    /// `$greaterEqual`.
    pub fn greater_equal(self, value: impl Into<Value>) -> Self {
        self.set(Operator::GreaterEqual, value)
    }

    /// `$equal` (deep equality).
    pub fn equal(self, value: impl Into<Value>) -> Self {
        self.set(Operator::Equal, value)
    }

    /// `$not` (deep inequality).
    pub fn not(self, value: impl Into<Value>) -> Self {
        self.set(Operator::Not, value)
    }

    /// `$dateBefore`.
    pub fn date_before(self, date: impl Into<Value>) -> Self {
        self.set(Operator::DateBefore, date)
    }

    /// `$dateAfter`.
    pub fn date_after(self, date: impl Into<Value>) -> Self {
        self.set(Operator::DateAfter, date)
    }

    /// `$in`.
    pub fn is_in<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.set(Operator::In, collect(values))
    }

    /// `$notIn`.
    pub fn not_in<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.set(Operator::NotIn, collect(values))
    }

    /// `$contains`. Pass a sequence to require every element.
    pub fn contains(self, value: impl Into<Value>) -> Self {
        self.set(Operator::Contains, value)
    }

    /// `$notContains`.
    pub fn not_contains(self, value: impl Into<Value>) -> Self {
        self.set(Operator::NotContains, value)
    }

    /// `$match` with a regular expression pattern.
    pub fn matches(self, pattern: &str) -> Self {
        self.set(Operator::Match, pattern)
    }

    /// Field-scoped `$or`.
    pub fn any_of<I: IntoIterator<Item = Operators>>(self, alternatives: I) -> Self {
        self.set(Operator::Or, branches(alternatives))
    }

    /// Field-scoped `$and`.
    pub fn all_of<I: IntoIterator<Item = Operators>>(self, requirements: I) -> Self {
        self.set(Operator::And, branches(requirements))
    }

    /// Field-scoped `$nor`.
    pub fn none_of<I: IntoIterator<Item = Operators>>(self, exclusions: I) -> Self {
        self.set(Operator::Nor, branches(exclusions))
    }

    /// Returns the number of operators set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no operator has been set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finishes the operator condition.
    pub fn build(self) -> Value {
        Value::Record(self.entries)
    }
}

impl From<Operators> for Value {
    fn from(operators: Operators) -> Self {
        operators.build()
    }
}

fn collect<I, V>(values: I) -> Value
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Value::Sequence(values.into_iter().map(Into::into).collect())
}

fn branches<I: IntoIterator<Item = Operators>>(operators: I) -> Value {
    Value::Sequence(operators.into_iter().map(Operators::build).collect())
}
