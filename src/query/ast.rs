//! The MongoDB-style query-language AST (spec §4.2, §6).
//!
//! Modeled as two sum types with exactly-one-discriminator validation at
//! parse time, per spec §9's design note, rather than optional-field
//! sentinels — mirrors the teacher's `Filter`/`FilterExpression` shape in
//! `store/query/filter.rs`.

use serde::Deserialize;
use serde_json::Value;

use crate::error::InvalidQuery;

/// One operand of a [`Comparison`]. Exactly one discriminator key must be
/// present in the source JSON object.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Field(String),
    StrVal(String),
    NumVal(f64),
    Boolean(bool),
    HexVal(String),
    DateTimeVal(String),
    TimeVal(String),
    DayOfWeek(i64),
    DayOfMonth(i64),
    Month(i64),
    Year(i64),
}

const OPERAND_KEYS: &[&str] = &[
    "$field",
    "$strVal",
    "$numVal",
    "$boolean",
    "$hexVal",
    "$dateTimeVal",
    "$timeVal",
    "$dayOfWeek",
    "$dayOfMonth",
    "$month",
    "$year",
];

impl Operand {
    fn from_value(value: &Value) -> Result<Self, InvalidQuery> {
        let object = value.as_object().ok_or_else(|| {
            InvalidQuery::new("operand must be a JSON object with exactly one discriminator key")
        })?;

        let present: Vec<&str> = OPERAND_KEYS
            .iter()
            .copied()
            .filter(|key| object.contains_key(*key))
            .collect();

        match present.as_slice() {
            [] => Err(InvalidQuery::new(format!(
                "operand has none of the recognized discriminators: {OPERAND_KEYS:?}"
            ))),
            [single] => {
                let inner = &object[*single];
                Self::from_tagged(single, inner)
            }
            many => Err(InvalidQuery::new(format!(
                "operand must have exactly one discriminator, found {}: {many:?}",
                many.len()
            ))),
        }
    }

    fn from_tagged(tag: &str, inner: &Value) -> Result<Self, InvalidQuery> {
        let as_str = |v: &Value| -> Result<String, InvalidQuery> {
            v.as_str()
                .map(str::to_owned)
                .ok_or_else(|| InvalidQuery::new(format!("{tag} expects a string value")))
        };
        let as_num = |v: &Value| -> Result<f64, InvalidQuery> {
            v.as_f64()
                .ok_or_else(|| InvalidQuery::new(format!("{tag} expects a numeric value")))
        };
        let as_int = |v: &Value| -> Result<i64, InvalidQuery> {
            v.as_i64()
                .ok_or_else(|| InvalidQuery::new(format!("{tag} expects an integer value")))
        };
        let as_bool = |v: &Value| -> Result<bool, InvalidQuery> {
            v.as_bool()
                .ok_or_else(|| InvalidQuery::new(format!("{tag} expects a boolean value")))
        };

        Ok(match tag {
            "$field" => Self::Field(as_str(inner)?),
            "$strVal" => Self::StrVal(as_str(inner)?),
            "$numVal" => Self::NumVal(as_num(inner)?),
            "$boolean" => Self::Boolean(as_bool(inner)?),
            "$hexVal" => Self::HexVal(as_str(inner)?),
            "$dateTimeVal" => Self::DateTimeVal(as_str(inner)?),
            "$timeVal" => Self::TimeVal(as_str(inner)?),
            "$dayOfWeek" => Self::DayOfWeek(as_int(inner)?),
            "$dayOfMonth" => Self::DayOfMonth(as_int(inner)?),
            "$month" => Self::Month(as_int(inner)?),
            "$year" => Self::Year(as_int(inner)?),
            other => return Err(InvalidQuery::new(format!("unknown operand tag {other}"))),
        })
    }
}

/// `$eq|$ne|$gt|$ge|$lt|$le`, each taking exactly a 2-element array of
/// operands (spec §4.2).
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    Eq(Operand, Operand),
    Ne(Operand, Operand),
    Gt(Operand, Operand),
    Ge(Operand, Operand),
    Lt(Operand, Operand),
    Le(Operand, Operand),
}

const COMPARISON_KEYS: &[&str] = &["$eq", "$ne", "$gt", "$ge", "$lt", "$le"];

/// `$and|$or|$not`. `$and`/`$or` require ≥1 child; `$not` requires exactly
/// one child (spec §4.2).
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalExpression {
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),
}

const LOGICAL_KEYS: &[&str] = &["$and", "$or", "$not"];

/// A `Condition` node: either a [`Comparison`] or a [`LogicalExpression`].
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Comparison(Comparison),
    Logical(LogicalExpression),
}

impl Condition {
    pub fn parse(value: &Value) -> Result<Self, InvalidQuery> {
        let object = value
            .as_object()
            .ok_or_else(|| InvalidQuery::new("condition must be a JSON object"))?;

        let comparison_keys: Vec<&str> = COMPARISON_KEYS
            .iter()
            .copied()
            .filter(|k| object.contains_key(*k))
            .collect();
        let logical_keys: Vec<&str> = LOGICAL_KEYS
            .iter()
            .copied()
            .filter(|k| object.contains_key(*k))
            .collect();

        match (comparison_keys.as_slice(), logical_keys.as_slice()) {
            ([op], []) => Self::parse_comparison(op, &object[*op]),
            ([], [op]) => Self::parse_logical(op, &object[*op]),
            ([], []) => Err(InvalidQuery::new(format!(
                "condition has no recognized operator; expected one of {COMPARISON_KEYS:?} or \
                 {LOGICAL_KEYS:?}"
            ))),
            _ => Err(InvalidQuery::new(
                "condition must have exactly one operator key",
            )),
        }
    }

    fn parse_comparison(op: &str, value: &Value) -> Result<Self, InvalidQuery> {
        let array = value
            .as_array()
            .ok_or_else(|| InvalidQuery::new(format!("{op} expects a 2-element array")))?;
        if array.len() != 2 {
            return Err(InvalidQuery::new(format!(
                "{op} expects exactly 2 operands, found {}",
                array.len()
            )));
        }
        let lhs = Operand::from_value(&array[0])?;
        let rhs = Operand::from_value(&array[1])?;
        let comparison = match op {
            "$eq" => Comparison::Eq(lhs, rhs),
            "$ne" => Comparison::Ne(lhs, rhs),
            "$gt" => Comparison::Gt(lhs, rhs),
            "$ge" => Comparison::Ge(lhs, rhs),
            "$lt" => Comparison::Lt(lhs, rhs),
            "$le" => Comparison::Le(lhs, rhs),
            other => return Err(InvalidQuery::new(format!("unknown comparison {other}"))),
        };
        Ok(Self::Comparison(comparison))
    }

    fn parse_logical(op: &str, value: &Value) -> Result<Self, InvalidQuery> {
        match op {
            "$not" => {
                let condition = Self::parse(value)?;
                Ok(Self::Logical(LogicalExpression::Not(Box::new(condition))))
            }
            "$and" | "$or" => {
                let array = value
                    .as_array()
                    .ok_or_else(|| InvalidQuery::new(format!("{op} expects an array")))?;
                if array.is_empty() {
                    return Err(InvalidQuery::new(format!(
                        "{op} requires at least one child condition"
                    )));
                }
                let children = array
                    .iter()
                    .map(Self::parse)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Logical(if op == "$and" {
                    LogicalExpression::And(children)
                } else {
                    LogicalExpression::Or(children)
                }))
            }
            other => Err(InvalidQuery::new(format!("unknown logical operator {other}"))),
        }
    }
}

/// The top-level query document: `{ "Query": { "$select": "...", "$condition": <Condition> } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryDocument {
    #[serde(rename = "Query")]
    pub query: QueryBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryBody {
    #[serde(rename = "$select", default)]
    pub select: Option<String>,
    #[serde(rename = "$condition")]
    pub condition: Value,
}

impl QueryDocument {
    pub fn parse_condition(&self) -> Result<Condition, InvalidQuery> {
        Condition::parse(&self.query.condition)
    }
}
