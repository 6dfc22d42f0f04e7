//! Compiled predicates.
//!
//! A [`Predicate`] is a small AST produced by the condition compiler and
//! evaluated by [`Predicate::test`]. Predicates own copies of their operands,
//! so they stay valid after the condition document is dropped and can be
//! shared freely between threads.

use regex::Regex;

use crate::compare::{compare_ordered, contains_equal, equals};
use crate::op::{Logical, Operator};
use crate::traits::Document;
use crate::value::{Timestamp, Value};

/// A compiled boolean test over one item.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// `$and`/`$or`/`$nor` over branches. Each branch holds when all of its
    /// predicates hold.
    Logical {
        kind: Logical,
        branches: Vec<Vec<Predicate>>,
    },
    /// Sub-document match: the field must be present and non-null, and every
    /// nested predicate must hold against it.
    Nested {
        field: String,
        predicates: Vec<Predicate>,
    },
    /// Literal equality between the field and a value.
    Literal { field: String, value: Value },
    /// A single operator applied to a field.
    Field { field: String, test: FieldTest },
    /// Never matches. Produced for malformed input in lenient mode.
    Never,
}

impl Predicate {
    /// Evaluates this predicate against an item.
    pub fn test<D: Document + ?Sized>(&self, item: &D) -> bool {
        match self {
            Predicate::Logical { kind, branches } => kind.combine(
                branches
                    .iter()
                    .map(|branch| all_hold(branch, item)),
            ),
            Predicate::Nested { field, predicates } => match item.field(field) {
                None | Some(Value::Null) => false,
                Some(inner) => all_hold(predicates, inner),
            },
            Predicate::Literal { field, value } => {
                item.field(field).is_some_and(|actual| equals(actual, value))
            }
            Predicate::Field { field, test } => test.test(item.field(field)),
            Predicate::Never => false,
        }
    }

    /// Returns the field this predicate reads, if it reads exactly one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Predicate::Nested { field, .. }
            | Predicate::Literal { field, .. }
            | Predicate::Field { field, .. } => Some(field),
            Predicate::Logical { .. } | Predicate::Never => None,
        }
    }
}

/// Returns `true` when every predicate holds (vacuously for an empty list).
pub fn all_hold<D: Document + ?Sized>(predicates: &[Predicate], item: &D) -> bool {
    predicates.iter().all(|predicate| predicate.test(item))
}

/// A single-operator test on a field value.
///
/// `None` as the field value means the field is absent. Only the negative
/// tests (`NotEqual`, `NotIn`, `NotContains`) pass on an absent field.
#[derive(Debug, Clone)]
pub enum FieldTest {
    /// `$less`, `$lessEqual`, `$greater`, `$greaterEqual`.
    Ordered { op: Operator, operand: Value },
    /// `$equal`.
    Equal(Value),
    /// `$not`.
    NotEqual(Value),
    /// `$dateBefore`. `None` when the operand is not date-like.
    DateBefore(Option<Timestamp>),
    /// `$dateAfter`. `None` when the operand is not date-like.
    DateAfter(Option<Timestamp>),
    /// `$in`.
    In(Vec<Value>),
    /// `$notIn`.
    NotIn(Vec<Value>),
    /// `$contains`.
    Contains(Vec<Value>),
    /// `$notContains`.
    NotContains(Vec<Value>),
    /// `$match`.
    Match(Regex),
}

impl FieldTest {
    /// Evaluates this test against a field value.
    pub fn test(&self, actual: Option<&Value>) -> bool {
        match self {
            FieldTest::Ordered { op, operand } => actual
                .and_then(|a| compare_ordered(a, operand))
                .is_some_and(|ordering| op.eval_ordering(ordering)),
            FieldTest::Equal(expected) => actual.is_some_and(|a| equals(a, expected)),
            FieldTest::NotEqual(expected) => !actual.is_some_and(|a| equals(a, expected)),
            FieldTest::DateBefore(bound) => date_ordering(actual, *bound)
                .is_some_and(|ordering| ordering.is_lt()),
            FieldTest::DateAfter(bound) => date_ordering(actual, *bound)
                .is_some_and(|ordering| ordering.is_gt()),
            FieldTest::In(candidates) => actual.is_some_and(|a| contains_equal(candidates, a)),
            FieldTest::NotIn(candidates) => !actual.is_some_and(|a| contains_equal(candidates, a)),
            FieldTest::Contains(needles) => contains_all(actual, needles),
            FieldTest::NotContains(needles) => !contains_all(actual, needles),
            FieldTest::Match(regex) => actual
                .and_then(Value::to_text)
                .is_some_and(|text| regex.is_match(&text)),
        }
    }
}

fn date_ordering(actual: Option<&Value>, bound: Option<Timestamp>) -> Option<std::cmp::Ordering> {
    let actual = actual?.to_timestamp()?;
    Some(actual.cmp(&bound?))
}

/// Containment: every needle must be an element of a sequence field, or a
/// substring of a text field. Any other field kind contains nothing.
fn contains_all(actual: Option<&Value>, needles: &[Value]) -> bool {
    match actual {
        Some(Value::Sequence(items)) => needles.iter().all(|needle| contains_equal(items, needle)),
        Some(Value::Text(text)) => needles.iter().all(|needle| {
            needle
                .to_text()
                .is_some_and(|fragment| text.contains(fragment.as_ref()))
        }),
        _ => false,
    }
}
