//! Operator names recognized in condition documents.
//!
//! The operator set is closed: [`Operator::from_key`] is the only way a
//! condition key becomes an operator, and a record is treated as an operator
//! condition exactly when one of its keys is in this set.

use std::cmp::Ordering;

/// Operator keyed inside a field's condition object.
///
/// Operators are grouped by what they test:
/// - **Relational**: `$less`, `$lessEqual`, `$greater`, `$greaterEqual`
/// - **Equality**: `$equal`, `$not`
/// - **Temporal**: `$dateBefore`, `$dateAfter`
/// - **Membership**: `$in`, `$notIn`
/// - **Containment**: `$contains`, `$notContains`
/// - **Pattern**: `$match`
/// - **Field-scoped logic**: `$or`, `$and`, `$nor`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    Not,
    DateBefore,
    DateAfter,
    In,
    NotIn,
    Contains,
    NotContains,
    Match,
    Or,
    And,
    Nor,
}

impl Operator {
    /// Every recognized operator, in declaration order.
    pub const ALL: [Operator; 16] = [
        Operator::Less,
        Operator::LessEqual,
        Operator::Greater,
        Operator::GreaterEqual,
        Operator::Equal,
        Operator::Not,
        Operator::DateBefore,
        Operator::DateAfter,
        Operator::In,
        Operator::NotIn,
        Operator::Contains,
        Operator::NotContains,
        Operator::Match,
        Operator::Or,
        Operator::And,
        Operator::Nor,
    ];

    /// Looks up an operator by its condition key (e.g. `"$less"`).
    pub fn from_key(key: &str) -> Option<Operator> {
        Operator::ALL.into_iter().find(|op| op.as_str() == key)
    }

    /// Returns `true` if `key` names a recognized operator.
    pub fn is_operator_key(key: &str) -> bool {
        Operator::from_key(key).is_some()
    }

    /// Returns `true` for the ordering operators.
    pub fn is_relational(self) -> bool {
        matches!(
            self,
            Operator::Less | Operator::LessEqual | Operator::Greater | Operator::GreaterEqual
        )
    }

    /// Returns the logical combinator for `$or`/`$and`/`$nor`.
    pub fn as_logical(self) -> Option<Logical> {
        match self {
            Operator::Or => Some(Logical::Or),
            Operator::And => Some(Logical::And),
            Operator::Nor => Some(Logical::Nor),
            _ => None,
        }
    }

    /// Evaluates a relational operator given the ordering of field vs operand.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Operator::Less => ordering == Ordering::Less,
            Operator::LessEqual => ordering != Ordering::Greater,
            Operator::Greater => ordering == Ordering::Greater,
            Operator::GreaterEqual => ordering != Ordering::Less,
            _ => false, // Not an ordering-based operator
        }
    }

    /// Returns the condition key of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Less => "$less",
            Operator::LessEqual => "$lessEqual",
            Operator::Greater => "$greater",
            Operator::GreaterEqual => "$greaterEqual",
            Operator::Equal => "$equal",
            Operator::Not => "$not",
            Operator::DateBefore => "$dateBefore",
            Operator::DateAfter => "$dateAfter",
            Operator::In => "$in",
            Operator::NotIn => "$notIn",
            Operator::Contains => "$contains",
            Operator::NotContains => "$notContains",
            Operator::Match => "$match",
            Operator::Or => "$or",
            Operator::And => "$and",
            Operator::Nor => "$nor",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Boolean combinator shared by document-level and field-scoped logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Logical {
    /// Every branch holds.
    And,
    /// At least one branch holds.
    Or,
    /// No branch holds.
    Nor,
}

impl Logical {
    /// Looks up a document-level logical key (`$and`, `$or`, `$nor`).
    pub fn from_key(key: &str) -> Option<Logical> {
        match key {
            "$and" => Some(Logical::And),
            "$or" => Some(Logical::Or),
            "$nor" => Some(Logical::Nor),
            _ => None,
        }
    }

    /// Combines per-branch results. Each branch is consulted lazily.
    pub fn combine<I>(self, mut branches: I) -> bool
    where
        I: Iterator<Item = bool>,
    {
        match self {
            Logical::And => branches.all(|held| held),
            Logical::Or => branches.any(|held| held),
            Logical::Nor => !branches.any(|held| held),
        }
    }

    /// Returns the condition key of this combinator.
    pub fn as_str(self) -> &'static str {
        match self {
            Logical::And => "$and",
            Logical::Or => "$or",
            Logical::Nor => "$nor",
        }
    }
}

impl std::fmt::Display for Logical {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_keys_round_trip() {
        for op in Operator::ALL {
            assert_eq!(Operator::from_key(op.as_str()), Some(op));
        }
        assert_eq!(Operator::from_key("$regex"), None);
        assert_eq!(Operator::from_key("less"), None);
        assert!(Operator::is_operator_key("$notContains"));
        assert!(!Operator::is_operator_key("name"));
    }

    #[test]
    fn operator_classification() {
        assert!(Operator::Less.is_relational());
        assert!(Operator::GreaterEqual.is_relational());
        assert!(!Operator::Equal.is_relational());
        assert!(!Operator::DateBefore.is_relational());

        assert_eq!(Operator::Or.as_logical(), Some(Logical::Or));
        assert_eq!(Operator::Nor.as_logical(), Some(Logical::Nor));
        assert_eq!(Operator::In.as_logical(), None);
    }

    #[test]
    fn operator_eval_ordering() {
        assert!(Operator::Less.eval_ordering(Ordering::Less));
        assert!(!Operator::Less.eval_ordering(Ordering::Equal));

        assert!(Operator::LessEqual.eval_ordering(Ordering::Less));
        assert!(Operator::LessEqual.eval_ordering(Ordering::Equal));
        assert!(!Operator::LessEqual.eval_ordering(Ordering::Greater));

        assert!(Operator::Greater.eval_ordering(Ordering::Greater));
        assert!(!Operator::Greater.eval_ordering(Ordering::Equal));

        assert!(Operator::GreaterEqual.eval_ordering(Ordering::Equal));
        assert!(!Operator::GreaterEqual.eval_ordering(Ordering::Less));

        // Non-relational operators never pass an ordering test
        assert!(!Operator::Equal.eval_ordering(Ordering::Equal));
    }

    #[test]
    fn logical_combine() {
        assert!(Logical::And.combine([true, true].into_iter()));
        assert!(!Logical::And.combine([true, false].into_iter()));
        assert!(Logical::Or.combine([false, true].into_iter()));
        assert!(!Logical::Or.combine([false, false].into_iter()));
        assert!(Logical::Nor.combine([false, false].into_iter()));
        assert!(!Logical::Nor.combine([false, true].into_iter()));

        // Empty branch lists
        assert!(Logical::And.combine(std::iter::empty()));
        assert!(!Logical::Or.combine(std::iter::empty()));
        assert!(Logical::Nor.combine(std::iter::empty()));
    }

    #[test]
    fn display() {
        assert_eq!(Operator::LessEqual.to_string(), "$lessEqual");
        assert_eq!(Logical::Nor.to_string(), "$nor");
        assert_eq!(Logical::from_key("$and"), Some(Logical::And));
        assert_eq!(Logical::from_key("$not"), None);
    }
}
