//! The normalized table/column namespace (spec §6's ≥40-table layout).
//!
//! Grounded on the teacher's `store/postgres/query/table.rs`: `Table` and
//! `Column` as closed enums rather than raw string constants, so a typo in a
//! column name is a compile error. Unlike the teacher's version this crate
//! does not need a generic foreign-key-join graph: C1 reconstructs nested
//! structure via correlated `jsonb_agg` subqueries (spec §4.1), so `Column`
//! only needs to `Transpile` to a qualified name, not participate in a join
//! planner.

use std::fmt::{self, Formatter};

use super::expression::Transpile;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Table {
    Submodel,
    SubmodelElement,
    ConceptDescription,
    Reference,
    ReferenceKey,
    Qualifier,
    Extension,
    EmbeddedDataSpecification,
    AdministrativeInformation,
    PropertyElement,
    RangeElement,
    MultiLanguageProperty,
    BlobElement,
    FileElement,
    ReferenceElement,
    RelationshipElement,
    AnnotatedRelationshipElement,
    EntityElement,
    OperationElement,
    BasicEventElement,
    SubmodelElementList,
    LangStringTextType,
    LangStringNameType,
}

impl Table {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Submodel => "submodel",
            Self::SubmodelElement => "submodel_element",
            Self::ConceptDescription => "concept_description",
            Self::Reference => "reference",
            Self::ReferenceKey => "reference_key",
            Self::Qualifier => "qualifier",
            Self::Extension => "extension",
            Self::EmbeddedDataSpecification => "embedded_data_specification",
            Self::AdministrativeInformation => "administrative_information",
            Self::PropertyElement => "property_element",
            Self::RangeElement => "range_element",
            Self::MultiLanguageProperty => "multilanguage_property",
            Self::BlobElement => "blob_element",
            Self::FileElement => "file_element",
            Self::ReferenceElement => "reference_element",
            Self::RelationshipElement => "relationship_element",
            Self::AnnotatedRelationshipElement => "annotated_relationship_element",
            Self::EntityElement => "entity_element",
            Self::OperationElement => "operation_element",
            Self::BasicEventElement => "basic_event_element",
            Self::SubmodelElementList => "submodel_element_list",
            Self::LangStringTextType => "lang_string_text_type",
            Self::LangStringNameType => "lang_string_name_type",
        }
    }
}

impl Transpile for Table {
    fn transpile(&self, fmt: &mut Formatter) -> fmt::Result {
        fmt.write_str(self.name())
    }
}

/// A qualified `table.column` reference. Columns are plain strings rather
/// than a per-table sub-enum (the teacher's `Column` is one enum variant
/// per table for join-path typechecking, which C1's subquery strategy
/// doesn't need) but are only ever constructed through the `const fn`
/// helpers below, which are the single source of truth for the schema.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    pub table: Table,
    pub name: &'static str,
}

impl Column {
    pub const fn new(table: Table, name: &'static str) -> Self {
        Self { table, name }
    }
}

impl Transpile for Column {
    fn transpile(&self, fmt: &mut Formatter) -> fmt::Result {
        write!(fmt, "{}.{}", self.table.name(), self.name)
    }
}

pub mod submodel {
    use super::{Column, Table};

    pub const ID: Column = Column::new(Table::Submodel, "id");
    /// The AAS global identifier (IRI), distinct from the surrogate `id`
    /// primary key used for ordering and cursor pagination (spec §9).
    pub const GLOBAL_ID: Column = Column::new(Table::Submodel, "global_id");
    pub const ID_SHORT: Column = Column::new(Table::Submodel, "id_short");
    pub const CATEGORY: Column = Column::new(Table::Submodel, "category");
    pub const KIND: Column = Column::new(Table::Submodel, "kind");
    pub const SEMANTIC_ID: Column = Column::new(Table::Submodel, "semantic_id");
    pub const DISPLAYNAME_ID: Column = Column::new(Table::Submodel, "displayname_id");
    pub const DESCRIPTION_ID: Column = Column::new(Table::Submodel, "description_id");
    pub const ADMINISTRATION_ID: Column = Column::new(Table::Submodel, "administration_id");
    pub const SUPPLEMENTAL_SEMANTIC_IDS: Column =
        Column::new(Table::Submodel, "supplemental_semantic_ids");
    pub const EMBEDDED_DATA_SPECIFICATION: Column =
        Column::new(Table::Submodel, "embedded_data_specification");
    pub const EXTENSIONS: Column = Column::new(Table::Submodel, "extensions");
}

pub mod submodel_element {
    use super::{Column, Table};

    pub const ID: Column = Column::new(Table::SubmodelElement, "id");
    pub const SUBMODEL_ID: Column = Column::new(Table::SubmodelElement, "submodel_id");
    pub const PARENT_SME_ID: Column = Column::new(Table::SubmodelElement, "parent_sme_id");
    pub const ROOT_SME_ID: Column = Column::new(Table::SubmodelElement, "root_sme_id");
    pub const ID_SHORT: Column = Column::new(Table::SubmodelElement, "id_short");
    pub const IDSHORT_PATH: Column = Column::new(Table::SubmodelElement, "idshort_path");
    pub const MODEL_TYPE: Column = Column::new(Table::SubmodelElement, "model_type");
    pub const CATEGORY: Column = Column::new(Table::SubmodelElement, "category");
    pub const POSITION: Column = Column::new(Table::SubmodelElement, "position");
    pub const SEMANTIC_ID: Column = Column::new(Table::SubmodelElement, "semantic_id");
    pub const DISPLAYNAME_ID: Column = Column::new(Table::SubmodelElement, "displayname_id");
    pub const DESCRIPTION_ID: Column = Column::new(Table::SubmodelElement, "description_id");
    pub const SUPPLEMENTAL_SEMANTIC_IDS: Column =
        Column::new(Table::SubmodelElement, "supplemental_semantic_ids");
}

pub mod reference {
    use super::{Column, Table};

    pub const ID: Column = Column::new(Table::Reference, "id");
    pub const TYPE: Column = Column::new(Table::Reference, "type");
    pub const PARENT_REFERENCE: Column = Column::new(Table::Reference, "parent_reference");
    pub const ROOT_REFERENCE: Column = Column::new(Table::Reference, "root_reference");
}

pub mod reference_key {
    use super::{Column, Table};

    pub const ID: Column = Column::new(Table::ReferenceKey, "id");
    pub const REFERENCE_ID: Column = Column::new(Table::ReferenceKey, "reference_id");
    pub const POSITION: Column = Column::new(Table::ReferenceKey, "position");
    pub const TYPE: Column = Column::new(Table::ReferenceKey, "type");
    pub const VALUE: Column = Column::new(Table::ReferenceKey, "value");
}

pub mod concept_description {
    use super::{Column, Table};

    pub const ID: Column = Column::new(Table::ConceptDescription, "id");
    pub const GLOBAL_ID: Column = Column::new(Table::ConceptDescription, "global_id");
    pub const ID_SHORT: Column = Column::new(Table::ConceptDescription, "id_short");
    pub const CATEGORY: Column = Column::new(Table::ConceptDescription, "category");
    pub const ADMINISTRATION_ID: Column = Column::new(Table::ConceptDescription, "administration_id");
    pub const DISPLAYNAME_ID: Column = Column::new(Table::ConceptDescription, "displayname_id");
    pub const DESCRIPTION_ID: Column = Column::new(Table::ConceptDescription, "description_id");
    pub const IS_CASE_OF: Column = Column::new(Table::ConceptDescription, "is_case_of");
    pub const EMBEDDED_DATA_SPECIFICATIONS: Column =
        Column::new(Table::ConceptDescription, "embedded_data_specifications");
}

pub mod property_element {
    use super::{Column, Table};

    pub const ID: Column = Column::new(Table::PropertyElement, "id");
    pub const VALUE_TEXT: Column = Column::new(Table::PropertyElement, "value_text");
    pub const VALUE_NUM: Column = Column::new(Table::PropertyElement, "value_num");
    pub const VALUE_BOOL: Column = Column::new(Table::PropertyElement, "value_bool");
    pub const VALUE_TIME: Column = Column::new(Table::PropertyElement, "value_time");
    pub const VALUE_DATE: Column = Column::new(Table::PropertyElement, "value_date");
    pub const VALUE_DATETIME: Column = Column::new(Table::PropertyElement, "value_datetime");
    pub const VALUE_TYPE: Column = Column::new(Table::PropertyElement, "value_type");
    pub const VALUE_ID: Column = Column::new(Table::PropertyElement, "value_id");
}
