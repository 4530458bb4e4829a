//! `EmbeddedDataSpecification` / IEC 61360 content (spec §3, §4.5).

use serde::{Deserialize, Serialize};

use super::reference::Reference;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LangString {
    pub language: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelType {
    Min,
    Max,
    Nom,
    Typ,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueReferencePair {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_id: Option<Reference>,
}

/// `DataSpecificationIEC61360` content, the only `content` variant spec §3
/// says is supported today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSpecificationIec61360 {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferred_name: Vec<LangString>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub short_name: Vec<LangString>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub definition: Vec<LangString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_list: Vec<ValueReferencePair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_type: Option<LevelType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_of_definition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataSpecificationContent {
    Iec61360(DataSpecificationIec61360),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedDataSpecification {
    pub data_specification: Reference,
    pub content: DataSpecificationContent,
}
