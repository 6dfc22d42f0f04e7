//! Condition compiler.
//!
//! Walks a condition document and emits one top-level [`Predicate`] per key:
//!
//! - `$and` / `$or` / `$nor` compile each branch recursively and combine them
//! - a record holding at least one operator key is handed to the operator
//!   evaluator for that field
//! - any other record is a nested condition on the field's sub-document
//! - everything else is a literal the field must equal
//!
//! All emitted predicates are AND-ed by the caller.

use crate::error::{QueryError, Result};
use crate::op::{Logical, Operator};
use crate::predicate::Predicate;
use crate::value::{Record, Value};

/// Compiles condition documents into predicates.
///
/// By default the compiler is lenient: malformed input never fails, it
/// compiles to [`Predicate::Never`] and unknown operators are ignored. In
/// strict mode the same input is reported as a [`QueryError`].
///
/// # Example
///
/// ```
/// use standout_query::{Compiler, Value};
/// use serde_json::json;
///
/// let condition = Value::from(json!({ "$or": "not a list" }));
///
/// let lenient = Compiler::new().compile(Some(&condition)).unwrap();
/// assert!(!lenient[0].test(&Value::from(json!({}))));
///
/// assert!(Compiler::new().strict(true).compile(Some(&condition)).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Compiler {
    strict: bool,
}

impl Compiler {
    /// Creates a lenient compiler.
    pub fn new() -> Self {
        Compiler::default()
    }

    /// Sets whether malformed conditions are errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Returns `true` if this compiler reports malformed conditions.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Compiles a condition into its top-level predicates.
    ///
    /// An absent or null condition compiles to no predicates, which matches
    /// every item.
    pub fn compile(&self, condition: Option<&Value>) -> Result<Vec<Predicate>> {
        let mut predicates = Vec::new();
        match condition {
            None | Some(Value::Null) => {}
            Some(Value::Record(record)) => self.compile_record(record, &mut predicates)?,
            Some(other) => predicates.push(self.degrade(QueryError::InvalidCondition {
                found: other.type_name(),
            })?),
        }
        tracing::trace!(predicates = predicates.len(), "compiled condition");
        Ok(predicates)
    }

    pub(crate) fn compile_record(&self, record: &Record, into: &mut Vec<Predicate>) -> Result<()> {
        for (key, value) in record {
            if let Some(kind) = Logical::from_key(key) {
                into.push(self.compile_logical(kind, value)?);
                continue;
            }

            match value {
                Value::Record(operators) if is_operator_condition(operators) => {
                    self.evaluate_field(key, operators, into)?;
                }
                Value::Record(sub) => {
                    let mut predicates = Vec::new();
                    self.compile_record(sub, &mut predicates)?;
                    into.push(Predicate::Nested {
                        field: key.clone(),
                        predicates,
                    });
                }
                literal => into.push(Predicate::Literal {
                    field: key.clone(),
                    value: literal.clone(),
                }),
            }
        }
        Ok(())
    }

    fn compile_logical(&self, kind: Logical, value: &Value) -> Result<Predicate> {
        let Value::Sequence(items) = value else {
            return self.degrade(QueryError::ExpectedSequence {
                key: kind.as_str(),
                found: value.type_name(),
            });
        };

        let mut branches = Vec::with_capacity(items.len());
        for (index, branch) in items.iter().enumerate() {
            let mut compiled = Vec::new();
            match branch {
                Value::Record(record) => self.compile_record(record, &mut compiled)?,
                Value::Null => {}
                other => compiled.push(self.degrade(QueryError::InvalidBranch {
                    key: kind.as_str(),
                    index,
                    found: other.type_name(),
                })?),
            }
            branches.push(compiled);
        }

        Ok(Predicate::Logical { kind, branches })
    }

    /// Reports `error` in strict mode, otherwise yields a non-matching predicate.
    pub(crate) fn degrade(&self, error: QueryError) -> Result<Predicate> {
        if self.strict {
            return Err(error);
        }
        tracing::debug!(%error, "malformed condition compiled to a non-matching predicate");
        Ok(Predicate::Never)
    }
}

/// Returns `true` if any key of `record` is a recognized operator.
///
/// Unrecognized keys alongside a recognized one do not change the
/// classification; they are skipped during evaluation.
pub fn is_operator_condition(record: &Record) -> bool {
    record.keys().any(|key| Operator::is_operator_key(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compile(condition: serde_json::Value) -> Vec<Predicate> {
        Compiler::new()
            .compile(Some(&Value::from(condition)))
            .unwrap()
    }

    fn strict(condition: serde_json::Value) -> Result<Vec<Predicate>> {
        Compiler::new()
            .strict(true)
            .compile(Some(&Value::from(condition)))
    }

    fn item(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn absent_condition_compiles_to_nothing() {
        assert!(Compiler::new().compile(None).unwrap().is_empty());
        assert!(Compiler::new().compile(Some(&Value::Null)).unwrap().is_empty());
        assert!(compile(json!({})).is_empty());
    }

    #[test]
    fn one_predicate_per_plain_key() {
        let predicates = compile(json!({
            "name": "John",
            "user": { "age": 30 },
            "$or": [{ "a": 1 }, { "b": 2 }]
        }));
        assert_eq!(predicates.len(), 3);

        assert!(predicates
            .iter()
            .any(|p| matches!(p, Predicate::Literal { field, .. } if field == "name")));
        assert!(predicates
            .iter()
            .any(|p| matches!(p, Predicate::Nested { field, .. } if field == "user")));
        assert!(predicates.iter().any(|p| matches!(
            p,
            Predicate::Logical { kind: Logical::Or, branches } if branches.len() == 2
        )));
    }

    #[test]
    fn operator_condition_emits_one_predicate_per_operator() {
        let predicates = compile(json!({ "age": { "$greater": 18, "$less": 65 } }));
        assert_eq!(predicates.len(), 2);
        assert!(predicates.iter().all(|p| p.field() == Some("age")));
    }

    #[test]
    fn operator_detection_is_structural() {
        let record = match Value::from(json!({ "$equal": 1, "other": 2 })) {
            Value::Record(record) => record,
            _ => unreachable!(),
        };
        assert!(is_operator_condition(&record));

        let plain = match Value::from(json!({ "age": 1, "$unknown": 2 })) {
            Value::Record(record) => record,
            _ => unreachable!(),
        };
        assert!(!is_operator_condition(&plain));
    }

    #[test]
    fn record_without_operators_is_nested() {
        let predicates = compile(json!({ "user": { "name": "Jane", "address": { "city": "Oslo" } } }));
        assert_eq!(predicates.len(), 1);

        let predicate = &predicates[0];
        assert!(predicate.test(&item(json!({
            "user": { "name": "Jane", "address": { "city": "Oslo" }, "extra": 1 }
        }))));
        assert!(!predicate.test(&item(json!({
            "user": { "name": "Jane", "address": { "city": "Bergen" } }
        }))));
        assert!(!predicate.test(&item(json!({ "user": null }))));
    }

    #[test]
    fn nested_logical_operators() {
        let predicates = compile(json!({
            "$and": [
                { "$or": [{ "role": "admin" }, { "role": "owner" }] },
                { "$nor": [{ "banned": true }] }
            ]
        }));
        assert_eq!(predicates.len(), 1);

        let predicate = &predicates[0];
        assert!(predicate.test(&item(json!({ "role": "owner", "banned": false }))));
        assert!(!predicate.test(&item(json!({ "role": "owner", "banned": true }))));
        assert!(!predicate.test(&item(json!({ "role": "guest" }))));
    }

    #[test]
    fn null_branch_is_vacuous() {
        let predicates = compile(json!({ "$and": [null, { "a": 1 }] }));
        assert!(predicates[0].test(&item(json!({ "a": 1 }))));
    }

    #[test]
    fn lenient_mode_degrades_malformed_input() {
        let predicates = compile(json!({ "$or": 5 }));
        assert!(matches!(predicates[0], Predicate::Never));

        let predicates = compile(json!({ "$or": ["text", { "a": 1 }] }));
        assert!(predicates[0].test(&item(json!({ "a": 1 }))));
        assert!(!predicates[0].test(&item(json!({ "a": 2 }))));

        let predicates = Compiler::new()
            .compile(Some(&Value::from("not a condition")))
            .unwrap();
        assert_eq!(predicates.len(), 1);
        assert!(!predicates[0].test(&item(json!({}))));
    }

    #[test]
    fn strict_mode_reports_malformed_input() {
        assert!(matches!(
            strict(json!({ "$or": 5 })),
            Err(QueryError::ExpectedSequence { key: "$or", found: "number" })
        ));
        assert!(matches!(
            strict(json!({ "$nor": [{ "a": 1 }, [1]] })),
            Err(QueryError::InvalidBranch { key: "$nor", index: 1, found: "sequence" })
        ));
        assert!(matches!(
            Compiler::new().strict(true).compile(Some(&Value::from(3))),
            Err(QueryError::InvalidCondition { found: "number" })
        ));
        assert!(strict(json!({ "name": "John", "$and": [{ "age": 3 }] })).is_ok());
    }

    #[test]
    fn strictness_flag() {
        assert!(!Compiler::new().is_strict());
        assert!(Compiler::new().strict(true).is_strict());
    }
}
