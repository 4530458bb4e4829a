//! The typed-value-column discipline shared by `Property`, `Range`,
//! `Qualifier` and `Extension` (spec §3, §4.1, §4.5): a logical value is
//! stored in one of five typed Postgres columns according to `valueType`,
//! and `COALESCE`d back into a single JSON scalar on read.

use serde::{Deserialize, Serialize};

/// The XSD-ish value type tag AAS attaches to typed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueType {
    XsdString,
    XsdBoolean,
    XsdInteger,
    XsdDouble,
    XsdFloat,
    XsdDate,
    XsdTime,
    XsdDateTime,
    #[serde(other)]
    Other,
}

/// A value decoded from whichever of the five typed columns
/// (`value_text`, `value_num`, `value_bool`, `value_time`, `value_date`,
/// `value_datetime`) was populated, as `COALESCE`d by C1's SQL and handed
/// back as a single JSON scalar by C3/C5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypedValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl TypedValue {
    /// Applies the "fallback to text when `valueType` is absent" rule from
    /// spec §4.5.
    #[must_use]
    pub fn coerce(raw: &str, value_type: Option<ValueType>) -> Self {
        match value_type {
            Some(ValueType::XsdBoolean) => raw
                .parse::<bool>()
                .map_or_else(|_| Self::Text(raw.to_owned()), Self::Bool),
            Some(ValueType::XsdInteger | ValueType::XsdDouble | ValueType::XsdFloat) => raw
                .parse::<f64>()
                .map_or_else(|_| Self::Text(raw.to_owned()), Self::Number),
            _ => Self::Text(raw.to_owned()),
        }
    }
}
