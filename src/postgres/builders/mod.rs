//! C5: one module per attribute family, each consuming decoded intermediate
//! rows and a resolved-reference lookup to produce its slice of the public
//! domain model (spec §4.5).

pub mod administration;
pub mod concept_description;
pub mod data_spec;
pub mod extensions;
pub mod qualifiers;
pub mod submodel;
