//! The PostgreSQL-backed implementation of C1-C7 (spec §2, §4).

pub mod builder;
pub mod builders;
pub mod cd_builder;
pub mod concurrency;
pub mod condition;
pub mod element_tree;
pub mod expression;
pub mod pagination;
pub mod reference_graph;
pub mod reference_query;
pub mod repository;
pub mod rows;
pub mod table;

pub use builder::SubmodelQueryBuilder;
pub use cd_builder::ConceptDescriptionQueryBuilder;
pub use concurrency::{CancellationContext, WorkerPool};
pub use condition::Condition;
pub use expression::{Expression, Function, Literal, Transpile};
pub use pagination::{clamp_limit, decode_cursor, encode_cursor, paginate, Page};
pub use reference_graph::{ReferenceBuilder, ReferenceRow};
pub use repository::{ConceptDescriptionRepository, SubmodelRepository};
pub use rows::{ConceptDescriptionRow, SubmodelElementRow, SubmodelRow};
pub use table::{Column, Table};
