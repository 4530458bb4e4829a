//! `Qualifier` (spec §3, §4.5).

use serde::{Deserialize, Serialize};

use super::reference::Reference;
use super::value::{TypedValue, ValueType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualifierKind {
    ValueQualifier,
    ConceptQualifier,
    TemplateQualifier,
}

/// `{kind, type, valueType, value, semanticId?, valueId?, supplementalSemanticIds[]}`.
///
/// `value` is resolved from one of five typed columns according to
/// `valueType`; if `valueType` is absent the builder falls back to the text
/// column (spec §4.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Qualifier {
    pub kind: QualifierKind,
    #[serde(rename = "type")]
    pub qualifier_type: String,
    pub value_type: ValueType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<TypedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_id: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_id: Option<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supplemental_semantic_ids: Vec<Reference>,
}
