//! Integration coverage for C6 (spec §4.6): stitching a flat row set back
//! into the polymorphic `SubmodelElement` tree, including the
//! container/non-container invariants (P5/P6 from spec §8).

use std::collections::HashMap;
use std::num::NonZeroU32;

use aas_repository_core::model::{SubmodelElementKind, TypedValue};
use aas_repository_core::postgres::{element_tree, SubmodelElementRow, WorkerPool};
use serde_json::json;

fn pool() -> WorkerPool {
    WorkerPool::new(NonZeroU32::new(4).unwrap())
}

#[tokio::test]
async fn collection_stitches_its_single_property_child() {
    let collection = SubmodelElementRow::from_value(json!({
        "id": 1, "submodel_id": 10, "parent_sme_id": null, "root_sme_id": null,
        "id_short": "Coll", "idshort_path": "Coll", "model_type": "SubmodelElementCollection",
        "category": null, "position": 0, "semantic_id": null,
        "payload_json": {}
    }))
    .unwrap();
    let property = SubmodelElementRow::from_value(json!({
        "id": 2, "submodel_id": 10, "parent_sme_id": 1, "root_sme_id": 1,
        "id_short": "Prop", "idshort_path": "Coll.Prop", "model_type": "Property",
        "category": null, "position": 0, "semantic_id": null,
        "payload_json": { "value_type": "xsdString", "value_text": "hello" }
    }))
    .unwrap();

    let elements = element_tree::build(&pool(), vec![collection, property], &HashMap::new())
        .await
        .unwrap();

    assert_eq!(elements.len(), 1);
    let SubmodelElementKind::SubmodelElementCollection(built) = &elements[0].kind else {
        panic!("expected a SubmodelElementCollection");
    };
    assert_eq!(built.value.len(), 1);
    assert_eq!(built.value[0].id_short(), "Prop");
    let SubmodelElementKind::Property(property) = &built.value[0].kind else {
        panic!("expected a Property");
    };
    assert_eq!(property.value, Some(TypedValue::Text("hello".to_owned())));
}

#[tokio::test]
async fn roots_are_ordered_by_position_then_id_short_path() {
    let second = SubmodelElementRow::from_value(json!({
        "id": 1, "submodel_id": 10, "parent_sme_id": null, "root_sme_id": null,
        "id_short": "B", "idshort_path": "B", "model_type": "Capability",
        "category": null, "position": null, "semantic_id": null,
        "payload_json": {}
    }))
    .unwrap();
    let first = SubmodelElementRow::from_value(json!({
        "id": 2, "submodel_id": 10, "parent_sme_id": null, "root_sme_id": null,
        "id_short": "A", "idshort_path": "A", "model_type": "Capability",
        "category": null, "position": null, "semantic_id": null,
        "payload_json": {}
    }))
    .unwrap();

    let elements = element_tree::build(&pool(), vec![second, first], &HashMap::new())
        .await
        .unwrap();

    assert_eq!(
        elements.iter().map(|e| e.id_short()).collect::<Vec<_>>(),
        vec!["A", "B"]
    );
}

#[tokio::test]
async fn a_container_row_missing_position_is_corrupt() {
    let collection = SubmodelElementRow::from_value(json!({
        "id": 1, "submodel_id": 10, "parent_sme_id": null, "root_sme_id": null,
        "id_short": "Coll", "idshort_path": "Coll", "model_type": "SubmodelElementCollection",
        "category": null, "position": null, "semantic_id": null,
        "payload_json": {}
    }))
    .unwrap();

    let error = element_tree::build(&pool(), vec![collection], &HashMap::new())
        .await
        .unwrap_err();
    assert_eq!(
        error.current_context().kind,
        aas_repository_core::ErrorKind::Corrupt
    );
}

#[tokio::test]
async fn a_child_under_a_non_container_parent_is_corrupt() {
    let leaf = SubmodelElementRow::from_value(json!({
        "id": 1, "submodel_id": 10, "parent_sme_id": null, "root_sme_id": null,
        "id_short": "Leaf", "idshort_path": "Leaf", "model_type": "Capability",
        "category": null, "position": 0, "semantic_id": null,
        "payload_json": {}
    }))
    .unwrap();
    let orphan = SubmodelElementRow::from_value(json!({
        "id": 2, "submodel_id": 10, "parent_sme_id": 1, "root_sme_id": 1,
        "id_short": "Orphan", "idshort_path": "Leaf.Orphan", "model_type": "Capability",
        "category": null, "position": 0, "semantic_id": null,
        "payload_json": {}
    }))
    .unwrap();

    let error = element_tree::build(&pool(), vec![leaf, orphan], &HashMap::new())
        .await
        .unwrap_err();
    assert_eq!(
        error.current_context().kind,
        aas_repository_core::ErrorKind::Corrupt
    );
}
