//! Multi-key ordering and in-place sorting.
//!
//! Provides [`Dir`] for sort direction, [`OrderBy`] for field-based ordering
//! and [`sort_data`] to reorder a slice of items by a list of orderings.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::compare::compare_total;
use crate::traits::Document;
use crate::value::Value;

/// Sort direction. Serialized as `"asc"` or `"desc"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    #[default]
    Asc,
    Desc,
}

impl Dir {
    /// Orients an ascending comparison result in this direction.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        if self == Dir::Desc {
            ordering.reverse()
        } else {
            ordering
        }
    }

    /// The serialized name.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single ordering rule: a field and a direction.
///
/// Deserializes from `{ "field": "age", "direction": "desc" }`; the
/// direction defaults to ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    #[serde(rename = "direction", default)]
    pub dir: Dir,
}

impl OrderBy {
    /// Smallest first on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Asc)
    }

    /// Largest first on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Desc)
    }

    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        OrderBy {
            field: field.into(),
            dir,
        }
    }

    /// Compares two field values according to this ordering.
    ///
    /// Absent and null values sort last in both directions.
    pub fn compare(&self, a: Option<&Value>, b: Option<&Value>) -> Ordering {
        let a = a.filter(|value| !value.is_null());
        let b = b.filter(|value| !value.is_null());
        match (a, b) {
            (Some(a), Some(b)) => self.dir.apply(compare_total(a, b)),
            _ => compare_values(a, b),
        }
    }
}

/// Compares two field values for sorting.
///
/// Absent and null values sort last. Present values follow
/// [`compare_total`], so mixed kinds order by kind instead of tying.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|value| !value.is_null());
    let b = b.filter(|value| !value.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => compare_total(a, b),
    }
}

/// Compares two items rule by rule; later rules only break ties.
pub fn compare_by_orderings<D: Document + ?Sized>(
    a: &D,
    b: &D,
    orderings: &[OrderBy],
) -> Ordering {
    orderings
        .iter()
        .map(|rule| rule.compare(a.field(&rule.field), b.field(&rule.field)))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Sorts `items` in place by `orderings`.
///
/// The sort is stable: items that tie on every rule keep their relative
/// order. The slice itself is reordered; no copy is made.
pub fn sort_data<D: Document>(items: &mut [D], orderings: &[OrderBy]) {
    if orderings.is_empty() {
        return;
    }
    items.sort_by(|a, b| compare_by_orderings(a, b, orderings));
}
