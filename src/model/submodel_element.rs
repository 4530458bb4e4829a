//! The polymorphic `SubmodelElement` (SME) tagged union (spec §3, §4.6).

use serde::{Deserialize, Serialize};

use super::data_specification::{EmbeddedDataSpecification, LangString};
use super::extension::Extension;
use super::qualifier::Qualifier;
use super::reference::Reference;
use super::value::{TypedValue, ValueType};

/// Attributes common to every SME variant, shared across the union (spec
/// §9: "expose a single `SubmodelElement` abstract capability set").
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CommonElementData {
    pub id_short: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
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

    /// Storage-only bookkeeping, not part of the wire shape but needed by
    /// C6 to stitch the tree back together.
    #[serde(skip)]
    pub db_id: i64,
    #[serde(skip)]
    pub parent_id: Option<i64>,
    #[serde(skip)]
    pub root_id: Option<i64>,
    #[serde(skip)]
    pub id_short_path: String,
    #[serde(skip)]
    pub position: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyElement {
    pub value: Option<TypedValue>,
    pub value_type: ValueType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_id: Option<Reference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeElement {
    pub value_type: ValueType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<TypedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<TypedValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiLanguagePropertyElement {
    pub value: Vec<LangString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_id: Option<Reference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceElement {
    pub value: Reference,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipElement {
    pub first: Reference,
    pub second: Reference,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedRelationshipElement {
    pub first: Reference,
    pub second: Reference,
    pub annotations: Vec<SubmodelElement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityType {
    CoManagedEntity,
    SelfManagedEntity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityElement {
    pub entity_type: EntityType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_asset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specific_asset_ids: Vec<Reference>,
    pub statements: Vec<SubmodelElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationVariable {
    pub value: Box<SubmodelElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationElement {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_variables: Vec<OperationVariable>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_variables: Vec<OperationVariable>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inoutput_variables: Vec<OperationVariable>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateOfEvent {
    On,
    Off,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicEventElement {
    pub observed: Reference,
    pub direction: Direction,
    pub state: StateOfEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_broker: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_interval: Option<String>,
}

/// Unordered per I4; deterministic on retrieval by `(id_short, db_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmodelElementCollection {
    pub value: Vec<SubmodelElement>,
}

/// Ordered per I3: child order follows `position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmodelElementList {
    pub order_relevant: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_id_list_element: Option<Reference>,
    pub type_value_list_element: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type_list_element: Option<ValueType>,
    pub value: Vec<SubmodelElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "modelType")]
pub enum SubmodelElementKind {
    Property(PropertyElement),
    MultiLanguageProperty(MultiLanguagePropertyElement),
    Range(RangeElement),
    Blob(BlobElement),
    File(FileElement),
    ReferenceElement(ReferenceElement),
    RelationshipElement(RelationshipElement),
    AnnotatedRelationshipElement(AnnotatedRelationshipElement),
    Capability(Capability),
    Entity(EntityElement),
    Operation(OperationElement),
    BasicEventElement(BasicEventElement),
    SubmodelElementCollection(SubmodelElementCollection),
    SubmodelElementList(SubmodelElementList),
}

impl SubmodelElementKind {
    #[must_use]
    pub const fn model_type(&self) -> &'static str {
        match self {
            Self::Property(_) => "Property",
            Self::MultiLanguageProperty(_) => "MultiLanguageProperty",
            Self::Range(_) => "Range",
            Self::Blob(_) => "Blob",
            Self::File(_) => "File",
            Self::ReferenceElement(_) => "ReferenceElement",
            Self::RelationshipElement(_) => "RelationshipElement",
            Self::AnnotatedRelationshipElement(_) => "AnnotatedRelationshipElement",
            Self::Capability(_) => "Capability",
            Self::Entity(_) => "Entity",
            Self::Operation(_) => "Operation",
            Self::BasicEventElement(_) => "BasicEventElement",
            Self::SubmodelElementCollection(_) => "SubmodelElementCollection",
            Self::SubmodelElementList(_) => "SubmodelElementList",
        }
    }

    /// `true` for the two container variants that carry nested `SubmodelElement`s
    /// outside of their own `value`/`statements` payload representation used by
    /// C6's tree stitching (spec §4.6 step 3).
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(
            self,
            Self::SubmodelElementCollection(_) | Self::SubmodelElementList(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmodelElement {
    #[serde(flatten)]
    pub common: CommonElementData,
    #[serde(flatten)]
    pub kind: SubmodelElementKind,
}

impl SubmodelElement {
    #[must_use]
    pub fn id_short(&self) -> &str {
        &self.common.id_short
    }
}
