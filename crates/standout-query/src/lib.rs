//! Standout Query - declarative condition documents for in-memory records.
//!
//! A condition is a document in the style of MongoDB filters. It is compiled
//! once into a list of predicates, and the predicates are then tested against
//! any number of items. It supports:
//!
//! - Literal field equality and nested sub-document conditions
//! - Per-field operators: comparison, deep equality, dates, membership,
//!   containment, regular expressions
//! - `$and`, `$or`, `$nor` at document level and within a single field
//! - Stable multi-key sorting of item slices
//!
//! # Quick Start
//!
//! ```rust
//! use standout_query::{match_query_condition, query, sort_data, OrderBy, Value};
//! use serde_json::json;
//!
//! let condition = Value::from(json!({
//!     "age": { "$greaterEqual": 18 },
//!     "$or": [{ "role": "admin" }, { "tags": { "$contains": "ops" } }]
//! }));
//!
//! let ann = Value::from(json!({ "name": "Ann", "age": 34, "role": "admin" }));
//! assert!(match_query_condition(&ann, &condition));
//!
//! // Compile once, reuse for many items
//! let filter = query(Some(&condition));
//! let mut people: Vec<Value> = vec![
//!     ann,
//!     Value::from(json!({ "name": "Bob", "age": 41, "tags": ["ops", "oncall"] })),
//!     Value::from(json!({ "name": "Cy", "age": 16, "role": "admin" })),
//! ];
//! people.retain(|person| filter.matches(person));
//!
//! sort_data(&mut people, &[OrderBy::desc("age")]);
//! assert_eq!(people[0].get("name"), Some(&Value::from("Bob")));
//! ```
//!
//! # Condition Semantics
//!
//! Each top-level key of a condition produces predicates, and all of them
//! must hold:
//!
//! ```text
//! { "$and": [c1, c2] }   every branch matches
//! { "$or":  [c1, c2] }   at least one branch matches
//! { "$nor": [c1, c2] }   no branch matches
//! { field: { "$op": x } } operator test on the field
//! { field: { k: v } }    nested condition; field must be a non-null record
//! { field: literal }     field deep-equals the literal
//! ```
//!
//! Literals compare structurally, so a literal sequence matches a field
//! holding the same elements in the same order.
//!
//! An empty condition matches every item. A field that is absent fails
//! every positive test and passes the negative ones (`$not`, `$notIn`,
//! `$notContains`).
//!
//! # Operators
//!
//! | Operator | Test |
//! |----------|------|
//! | `$less`, `$lessEqual`, `$greater`, `$greaterEqual` | ordering of same-kind values |
//! | `$equal`, `$not` | strict deep equality / inequality |
//! | `$dateBefore`, `$dateAfter` | both sides normalized to timestamps |
//! | `$in`, `$notIn` | deep-equals one of / none of the candidates |
//! | `$contains`, `$notContains` | sequence membership or substring |
//! | `$match` | regular expression on the field's text form |
//! | `$or`, `$and`, `$nor` | logic over operator conditions for the same field |
//!
//! Ordering across kinds (text vs number, for instance) never matches.
//!
//! # Malformed Conditions
//!
//! The top-level functions never fail: malformed parts of a condition
//! compile to predicates that never match and unknown operators are ignored.
//! Use [`Filter::try_new`] or a strict [`Compiler`] to have them reported as
//! [`QueryError`]s instead.

mod builder;
mod compare;
mod compiler;
mod error;
mod evaluator;
mod op;
mod ordering;
mod predicate;
mod query;
mod traits;
mod value;

// Re-export public API
pub use builder::{Condition, Operators};
pub use compare::{compare_ordered, compare_total, equals};
pub use compiler::{is_operator_condition, Compiler};
pub use error::{QueryError, Result};
pub use op::{Logical, Operator};
pub use ordering::{compare_by_orderings, compare_values, sort_data, Dir, OrderBy};
pub use predicate::{FieldTest, Predicate};
pub use query::Filter;
pub use traits::Document;
pub use value::{Number, Record, Timestamp, Value};

/// Tests whether `item` matches `condition`.
///
/// Compiles the condition on every call; use [`query`] to compile once and
/// test many items.
pub fn match_query_condition<D: Document + ?Sized>(item: &D, condition: &Value) -> bool {
    query(Some(condition)).matches(item)
}

/// Compiles a condition into its top-level predicates.
///
/// An absent condition yields no predicates. An item matches when every
/// returned predicate holds.
pub fn parse_query_condition(condition: Option<&Value>) -> Vec<Predicate> {
    Filter::new(condition).into_predicates()
}

/// Compiles a condition into a reusable [`Filter`].
pub fn query(condition: Option<&Value>) -> Filter {
    Filter::new(condition)
}
