//! `ConceptDescription` (spec §3): identifiable metadata mirroring
//! `Submodel`'s top-level shape, plus an opaque JSON storage column for
//! its IEC 61360 content (which is not further modeled by this crate).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::administration::AdministrativeInformation;
use super::data_specification::LangString;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptDescription {
    pub id: String,
    pub id_short: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub display_name: Vec<LangString>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<LangString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administration: Option<AdministrativeInformation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub is_case_of: Vec<Value>,
    pub embedded_data_specifications: Value,
}
