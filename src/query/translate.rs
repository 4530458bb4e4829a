//! C2: translates the parsed query-language AST into the SQL-level
//! `Condition`/`Expression` trees C1 transpiles (spec §4.2).
//!
//! `Translator` plays the role of the teacher's
//! `SelectCompiler::compile_filter`/`compile_filter_expression`: it walks
//! the AST bottom-up, resolving each `$field` operand through the
//! canonical field map and binding each literal operand as a parameter.

use postgres_types::ToSql;

use crate::error::InvalidQuery;
use crate::postgres::{Condition, Expression, Literal};

use super::ast::{Comparison, Condition as AstCondition, LogicalExpression, Operand};
use super::field_map;

/// Owns the parameter values bound while translating one query document,
/// so the caller can hand the resulting `Vec<Box<dyn ToSql + Sync>>`
/// straight to [`crate::postgres::SubmodelQueryBuilder`] alongside the
/// translated condition.
#[derive(Default)]
pub struct Translator {
    parameters: Vec<Box<dyn ToSql + Sync>>,
}

impl Translator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, condition: &AstCondition) -> Result<Condition, InvalidQuery> {
        match condition {
            AstCondition::Comparison(comparison) => self.translate_comparison(comparison),
            AstCondition::Logical(logical) => self.translate_logical(logical),
        }
    }

    pub fn into_parameters(self) -> Vec<Box<dyn ToSql + Sync>> {
        self.parameters
    }

    fn translate_comparison(&mut self, comparison: &Comparison) -> Result<Condition, InvalidQuery> {
        let (lhs, rhs, make): (&Operand, &Operand, fn(Expression, Expression) -> Condition) =
            match comparison {
                Comparison::Eq(lhs, rhs) => (lhs, rhs, Condition::Equal),
                Comparison::Ne(lhs, rhs) => (lhs, rhs, Condition::NotEqual),
                Comparison::Gt(lhs, rhs) => (lhs, rhs, Condition::Greater),
                Comparison::Ge(lhs, rhs) => (lhs, rhs, Condition::GreaterOrEqual),
                Comparison::Lt(lhs, rhs) => (lhs, rhs, Condition::Less),
                Comparison::Le(lhs, rhs) => (lhs, rhs, Condition::LessOrEqual),
            };

        if !matches!(lhs, Operand::Field(_)) && !matches!(rhs, Operand::Field(_))
            && value_kind(lhs) != value_kind(rhs)
        {
            return Err(InvalidQuery::new(
                "value↔value comparison must compare operands of the same type",
            ));
        }

        let left = self.translate_operand(lhs)?;
        let right = self.translate_operand(rhs)?;
        Ok(make(left, right))
    }

    fn translate_logical(&mut self, logical: &LogicalExpression) -> Result<Condition, InvalidQuery> {
        Ok(match logical {
            LogicalExpression::And(children) => {
                Condition::All(self.translate_all(children)?)
            }
            LogicalExpression::Or(children) => Condition::Any(self.translate_all(children)?),
            LogicalExpression::Not(child) => Condition::Not(Box::new(self.translate(child)?)),
        })
    }

    fn translate_all(&mut self, children: &[AstCondition]) -> Result<Vec<Condition>, InvalidQuery> {
        children.iter().map(|child| self.translate(child)).collect()
    }

    fn translate_operand(&mut self, operand: &Operand) -> Result<Expression, InvalidQuery> {
        Ok(match operand {
            Operand::Field(path) => field_map::resolve(path)?,
            Operand::StrVal(value) | Operand::HexVal(value) | Operand::DateTimeVal(value)
            | Operand::TimeVal(value) => self.bind(value.clone()),
            Operand::NumVal(value) => Expression::Literal(Literal::Number(*value)),
            Operand::Boolean(value) => Expression::Literal(Literal::Bool(*value)),
            Operand::DayOfWeek(value) | Operand::DayOfMonth(value) | Operand::Month(value)
            | Operand::Year(value) => Expression::Literal(Literal::Number(*value as f64)),
        })
    }

    fn bind(&mut self, value: String) -> Expression {
        self.parameters.push(Box::new(value));
        Expression::Parameter(self.parameters.len())
    }
}

/// Classifies a non-field operand for the value↔value degenerate case
/// (spec §4.2 case 4): comparing, say, a `$numVal` against a `$strVal` is a
/// mismatched-type `InvalidQuery`, not a silently-emitted SQL literal
/// comparison. Field operands have no kind here; callers only consult this
/// once both sides are confirmed non-field.
fn value_kind(operand: &Operand) -> Option<&'static str> {
    match operand {
        Operand::Field(_) => None,
        Operand::StrVal(_) => Some("str"),
        Operand::HexVal(_) => Some("hex"),
        Operand::DateTimeVal(_) => Some("dateTime"),
        Operand::TimeVal(_) => Some("time"),
        Operand::NumVal(_) => Some("num"),
        Operand::Boolean(_) => Some("boolean"),
        Operand::DayOfWeek(_) => Some("dayOfWeek"),
        Operand::DayOfMonth(_) => Some("dayOfMonth"),
        Operand::Month(_) => Some("month"),
        Operand::Year(_) => Some("year"),
    }
}
