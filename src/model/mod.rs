//! The AAS domain model (spec §3).

pub mod administration;
pub mod concept_description;
pub mod data_specification;
pub mod extension;
pub mod qualifier;
pub mod reference;
pub mod submodel;
pub mod submodel_element;
pub mod value;

pub use administration::AdministrativeInformation;
pub use concept_description::ConceptDescription;
pub use data_specification::{
    DataSpecificationContent, DataSpecificationIec61360, LangString, LevelType,
    ValueReferencePair,
};
pub use extension::Extension;
pub use qualifier::{Qualifier, QualifierKind};
pub use reference::{Key, KeyType, Reference, ReferenceType};
pub use submodel::{Submodel, SubmodelKind};
pub use submodel_element::{
    AnnotatedRelationshipElement, BasicEventElement, BlobElement, Capability, CommonElementData,
    Direction, EntityElement, EntityType, FileElement, MultiLanguagePropertyElement,
    OperationElement, OperationVariable, PropertyElement, RangeElement, ReferenceElement,
    RelationshipElement, StateOfEvent, SubmodelElement, SubmodelElementCollection,
    SubmodelElementKind, SubmodelElementList,
};
pub use value::{TypedValue, ValueType};
