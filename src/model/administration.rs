//! `AdministrativeInformation` (spec §3, §4.5).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::data_specification::EmbeddedDataSpecification;
use super::reference::Reference;

/// `{version, revision, templateId, creator?, embeddedDataSpecifications[]}`.
///
/// `embedded_data_specification_cache` mirrors the source JSONB column
/// (spec §9: "stored twice" — the normalized rows in
/// `embedded_data_specifications` are canonical, this field is the cache,
/// refreshed on write).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdministrativeInformation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedded_data_specifications: Vec<EmbeddedDataSpecification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedded_data_specification_cache: Option<Value>,
}
