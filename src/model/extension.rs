//! `Extension` (spec §3, §4.5).

use serde::{Deserialize, Serialize};

use super::reference::Reference;
use super::value::{TypedValue, ValueType};

/// `{name, valueType, value, semanticId?, refersTo[], supplementalSemanticIds[]}`.
///
/// Shares the Qualifier's typed-value-column discipline, plus a
/// `refersTo[]` list of references (spec §4.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extension {
    pub name: String,
    pub value_type: ValueType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<TypedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_id: Option<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub refers_to: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supplemental_semantic_ids: Vec<Reference>,
}
