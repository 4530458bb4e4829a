//! SQL-level boolean conditions and their rendering (C1/C2 target type).
//!
//! Grounded on the teacher's `store/postgres/query/condition.rs`: a closed
//! `Condition` enum transpiled with a handful of special cases (`Equal`
//! against a `NULL` parameter becomes `IS NULL`, empty `All`/`Any` collapse
//! to the identity of their operator) rather than always emitting a naive
//! binary operator.

use std::fmt::{self, Formatter};

use super::expression::{Expression, Literal, Transpile};

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    All(Vec<Self>),
    Any(Vec<Self>),
    Not(Box<Self>),
    Equal(Expression, Expression),
    NotEqual(Expression, Expression),
    Greater(Expression, Expression),
    GreaterOrEqual(Expression, Expression),
    Less(Expression, Expression),
    LessOrEqual(Expression, Expression),
}

impl Transpile for Condition {
    fn transpile(&self, fmt: &mut Formatter) -> fmt::Result {
        match self {
            Self::All(conditions) => match conditions.as_slice() {
                [] => fmt.write_str("TRUE"),
                [condition] => condition.transpile(fmt),
                _ => transpile_joined(fmt, conditions, " AND "),
            },
            Self::Any(conditions) => match conditions.as_slice() {
                [] => fmt.write_str("FALSE"),
                [condition] => condition.transpile(fmt),
                _ => transpile_joined(fmt, conditions, " OR "),
            },
            Self::Not(condition) => {
                fmt.write_str("NOT (")?;
                condition.transpile(fmt)?;
                fmt.write_str(")")
            }
            Self::Equal(lhs, Expression::Literal(Literal::Null))
            | Self::Equal(Expression::Literal(Literal::Null), lhs) => {
                lhs.transpile(fmt)?;
                fmt.write_str(" IS NULL")
            }
            Self::NotEqual(lhs, Expression::Literal(Literal::Null))
            | Self::NotEqual(Expression::Literal(Literal::Null), lhs) => {
                lhs.transpile(fmt)?;
                fmt.write_str(" IS NOT NULL")
            }
            Self::Equal(lhs, rhs) => transpile_binary(fmt, lhs, " = ", rhs),
            Self::NotEqual(lhs, rhs) => transpile_binary(fmt, lhs, " != ", rhs),
            Self::Greater(lhs, rhs) => transpile_binary(fmt, lhs, " > ", rhs),
            Self::GreaterOrEqual(lhs, rhs) => transpile_binary(fmt, lhs, " >= ", rhs),
            Self::Less(lhs, rhs) => transpile_binary(fmt, lhs, " < ", rhs),
            Self::LessOrEqual(lhs, rhs) => transpile_binary(fmt, lhs, " <= ", rhs),
        }
    }
}

fn transpile_binary(
    fmt: &mut Formatter,
    lhs: &Expression,
    op: &str,
    rhs: &Expression,
) -> fmt::Result {
    fmt.write_str("(")?;
    lhs.transpile(fmt)?;
    fmt.write_str(op)?;
    rhs.transpile(fmt)?;
    fmt.write_str(")")
}

fn transpile_joined(fmt: &mut Formatter, conditions: &[Condition], joiner: &str) -> fmt::Result {
    fmt.write_str("(")?;
    for (index, condition) in conditions.iter().enumerate() {
        if index > 0 {
            fmt.write_str(joiner)?;
        }
        condition.transpile(fmt)?;
    }
    fmt.write_str(")")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_all_is_true() {
        assert_eq!(Condition::All(vec![]).transpile_to_string(), "TRUE");
    }

    #[test]
    fn empty_any_is_false() {
        assert_eq!(Condition::Any(vec![]).transpile_to_string(), "FALSE");
    }

    #[test]
    fn equal_null_becomes_is_null() {
        let condition = Condition::Equal(
            Expression::Column("submodel.category".to_owned()),
            Expression::Literal(Literal::Null),
        );
        assert_eq!(
            condition.transpile_to_string(),
            "submodel.category IS NULL"
        );
    }

    #[test]
    fn conjunction_parenthesizes_each_branch() {
        let condition = Condition::All(vec![
            Condition::Equal(Expression::Column("a".to_owned()), Expression::Parameter(1)),
            Condition::Greater(Expression::Column("b".to_owned()), Expression::Parameter(2)),
        ]);
        assert_eq!(condition.transpile_to_string(), "((a = $1) AND (b > $2))");
    }
}
