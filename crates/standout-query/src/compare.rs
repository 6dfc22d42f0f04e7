//! Equality and ordering between values.
//!
//! [`equals`] is the strict structural equality behind `$equal`, `$not`,
//! `$in`, `$notIn`, literal matches and sequence membership.
//! [`compare_ordered`] backs the relational operators and [`compare_total`]
//! backs sorting.

use std::cmp::Ordering;

use crate::value::Value;

/// Strict deep equality.
///
/// Variants must match exactly: `1` never equals `"1"`, a sequence never
/// equals a record. Numbers compare by value across widths, sequences are
/// order-sensitive and records compare key by key. `NaN` equals nothing.
pub fn equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a.compare(*b) == Some(Ordering::Equal),
        (Value::Text(a), Value::Text(b)) => a == b,
        (Value::Date(a), Value::Date(b)) => a == b,
        (Value::Sequence(a), Value::Sequence(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| equals(x, y))
        }
        (Value::Record(a), Value::Record(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| equals(x, y)))
        }
        _ => false,
    }
}

/// Returns `true` if any element of `haystack` deep-equals `needle`.
pub fn contains_equal(haystack: &[Value], needle: &Value) -> bool {
    haystack.iter().any(|candidate| equals(candidate, needle))
}

/// Orders two values of the same kind.
///
/// Numbers (across widths), text (by bytes), dates and booleans are ordered.
/// Every other pairing, including mismatched kinds, nulls and `NaN`, is
/// incomparable and yields `None`.
pub fn compare_ordered(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.compare(*b),
        (Value::Text(a), Value::Text(b)) => Some(a.as_str().cmp(b.as_str())),
        (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Total order over all values, used for sorting.
///
/// Same-kind scalars order as in [`compare_ordered`], with `NaN` placed by
/// `f64::total_cmp`. Sequences and records order element by element.
/// Mismatched kinds order by kind: number, text, date, bool, sequence,
/// record, null.
pub fn compare_total(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.total_cmp(*b),
        (Value::Text(a), Value::Text(b)) => a.as_str().cmp(b.as_str()),
        (Value::Date(a), Value::Date(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Sequence(a), Value::Sequence(b)) => a
            .iter()
            .zip(b)
            .map(|(x, y)| compare_total(x, y))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.len().cmp(&b.len())),
        (Value::Record(a), Value::Record(b)) => a
            .iter()
            .zip(b)
            .map(|((ka, x), (kb, y))| ka.cmp(kb).then_with(|| compare_total(x, y)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.len().cmp(&b.len())),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Number(_) => 0,
        Value::Text(_) => 1,
        Value::Date(_) => 2,
        Value::Bool(_) => 3,
        Value::Sequence(_) => 4,
        Value::Record(_) => 5,
        Value::Null => 6,
    }
}
