//! `Submodel` (spec §3).

use serde::{Deserialize, Serialize};

use super::administration::AdministrativeInformation;
use super::data_specification::{EmbeddedDataSpecification, LangString};
use super::extension::Extension;
use super::qualifier::Qualifier;
use super::reference::Reference;
use super::submodel_element::SubmodelElement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmodelKind {
    Template,
    Instance,
}

/// Identified by `id`; at most one `semanticId` (spec §3 invariant I2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submodel {
    pub id: String,
    pub id_short: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub kind: SubmodelKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub display_name: Vec<LangString>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<LangString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_id: Option<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supplemental_semantic_ids: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qualifiers: Vec<Qualifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedded_data_specifications: Vec<EmbeddedDataSpecification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administration: Option<AdministrativeInformation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub submodel_elements: Vec<SubmodelElement>,
}

impl Submodel {
    /// Invariant I2: a Submodel has ≤1 `semanticId`; supplemental IDs
    /// require a main semantic ID (the AAS rule quoted in spec §3).
    pub fn validate(&self) -> Result<(), String> {
        if self.semantic_id.is_none() && !self.supplemental_semantic_ids.is_empty() {
            return Err("supplementalSemanticIds present without a semanticId".to_owned());
        }
        Ok(())
    }
}
