//! Operator evaluator.
//!
//! Turns one field's operator condition (`{ "$greater": 18, "$less": 65 }`)
//! into predicates, one per recognized operator key. Field-scoped `$or`,
//! `$and` and `$nor` recurse into operator conditions for the same field.

use regex::Regex;

use crate::compiler::Compiler;
use crate::error::{QueryError, Result};
use crate::op::{Logical, Operator};
use crate::predicate::{FieldTest, Predicate};
use crate::value::{Record, Timestamp, Value};

impl Compiler {
    /// Appends one predicate per recognized operator in `operators`.
    ///
    /// Keys that are not operators are skipped. In strict mode a
    /// `$`-prefixed key that is not a known operator is an error.
    pub fn evaluate_field(
        &self,
        field: &str,
        operators: &Record,
        into: &mut Vec<Predicate>,
    ) -> Result<()> {
        for (key, operand) in operators {
            let Some(op) = Operator::from_key(key) else {
                if self.is_strict() && key.starts_with('$') {
                    return Err(QueryError::UnknownOperator { key: key.clone() });
                }
                tracing::debug!(field, key = key.as_str(), "skipping unrecognized operator");
                continue;
            };

            let predicate = match op.as_logical() {
                Some(kind) => self.evaluate_logical(field, kind, operand)?,
                None => match self.field_test(op, operand)? {
                    Some(test) => Predicate::Field {
                        field: field.to_string(),
                        test,
                    },
                    None => Predicate::Never,
                },
            };
            into.push(predicate);
        }
        Ok(())
    }

    /// Builds the test for a non-logical operator. `None` means the operand
    /// was unusable and the lenient compiler chose a non-matching predicate.
    fn field_test(&self, op: Operator, operand: &Value) -> Result<Option<FieldTest>> {
        let test = match op {
            op if op.is_relational() => FieldTest::Ordered {
                op,
                operand: operand.clone(),
            },
            Operator::Equal => FieldTest::Equal(operand.clone()),
            Operator::Not => FieldTest::NotEqual(operand.clone()),
            Operator::DateBefore => FieldTest::DateBefore(self.date_bound(op, operand)?),
            Operator::DateAfter => FieldTest::DateAfter(self.date_bound(op, operand)?),
            Operator::In => FieldTest::In(value_set(operand)),
            Operator::NotIn => FieldTest::NotIn(value_set(operand)),
            Operator::Contains => FieldTest::Contains(value_set(operand)),
            Operator::NotContains => FieldTest::NotContains(value_set(operand)),
            Operator::Match => match self.pattern(operand)? {
                Some(regex) => FieldTest::Match(regex),
                None => return Ok(None),
            },
            // Logical operators are expanded by the caller.
            _ => return Ok(None),
        };
        Ok(Some(test))
    }

    fn evaluate_logical(&self, field: &str, kind: Logical, operand: &Value) -> Result<Predicate> {
        let Value::Sequence(items) = operand else {
            return self.degrade(QueryError::ExpectedSequence {
                key: kind.as_str(),
                found: operand.type_name(),
            });
        };

        let mut branches = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let mut branch = Vec::new();
            match item {
                Value::Record(operators) => self.evaluate_field(field, operators, &mut branch)?,
                other => branch.push(self.degrade(QueryError::InvalidBranch {
                    key: kind.as_str(),
                    index,
                    found: other.type_name(),
                })?),
            }
            branches.push(branch);
        }

        Ok(Predicate::Logical { kind, branches })
    }

    fn date_bound(&self, op: Operator, operand: &Value) -> Result<Option<Timestamp>> {
        match operand.to_timestamp() {
            Some(bound) => Ok(Some(bound)),
            None if self.is_strict() => Err(QueryError::InvalidOperand {
                op: op.as_str(),
                expected: "a date, timestamp or date text",
                found: operand.type_name(),
            }),
            None => {
                tracing::debug!(op = op.as_str(), "operand is not date-like; test never matches");
                Ok(None)
            }
        }
    }

    fn pattern(&self, operand: &Value) -> Result<Option<Regex>> {
        let Value::Text(pattern) = operand else {
            if self.is_strict() {
                return Err(QueryError::InvalidOperand {
                    op: Operator::Match.as_str(),
                    expected: "a pattern",
                    found: operand.type_name(),
                });
            }
            tracing::debug!(found = operand.type_name(), "$match operand is not a pattern");
            return Ok(None);
        };

        match Regex::new(pattern) {
            Ok(regex) => Ok(Some(regex)),
            Err(error) if self.is_strict() => Err(error.into()),
            Err(error) => {
                tracing::warn!(pattern = pattern.as_str(), %error, "invalid $match pattern");
                Ok(None)
            }
        }
    }
}

/// A sequence operand as-is; any other operand as a one-element set.
fn value_set(operand: &Value) -> Vec<Value> {
    match operand {
        Value::Sequence(items) => items.clone(),
        single => vec![single.clone()],
    }
}
