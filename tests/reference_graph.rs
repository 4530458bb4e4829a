//! Integration coverage for C4 (spec §4.4): building `Reference` chains out
//! of flat rows, including the `referredSemanticId` chain-follow and cycle
//! detection (P4 from spec §8).

use aas_repository_core::model::ReferenceType;
use aas_repository_core::postgres::{ReferenceBuilder, ReferenceRow};

fn row(id: i64, parent: Option<i64>, value: &str) -> ReferenceRow {
    ReferenceRow {
        id,
        reference_type: ReferenceType::ExternalReference,
        parent_reference: parent,
        root_reference: parent.map_or(id, |_| id),
        keys: vec![aas_repository_core::model::Key {
            key_type: "GlobalReference".into(),
            value: value.to_owned(),
        }],
    }
}

#[tokio::test]
async fn reference_with_no_parent_resolves_to_a_flat_chain() {
    let mut builder = ReferenceBuilder::new();
    builder.scan(&[row(1, None, "urn:x:unit")]).await;

    let reference = builder.resolve(1).await.unwrap();
    assert_eq!(reference.chain_len(), 1);
    assert!(reference.referred_semantic_id.is_none());
}

#[tokio::test]
async fn referred_semantic_id_chain_is_followed_to_its_root() {
    let mut builder = ReferenceBuilder::new();
    builder
        .scan(&[
            row(1, Some(2), "urn:x:leaf"),
            row(2, Some(3), "urn:x:middle"),
            row(3, None, "urn:x:root"),
        ])
        .await;

    let reference = builder.resolve(1).await.unwrap();
    assert_eq!(reference.chain_len(), 3);
    assert_eq!(reference.keys[0].value, "urn:x:leaf");
    let middle = reference.referred_semantic_id.as_deref().unwrap();
    assert_eq!(middle.keys[0].value, "urn:x:middle");
    let root = middle.referred_semantic_id.as_deref().unwrap();
    assert_eq!(root.keys[0].value, "urn:x:root");
    assert!(root.referred_semantic_id.is_none());
}

#[tokio::test]
async fn a_cycle_is_reported_as_corrupt_rather_than_looping_forever() {
    let mut builder = ReferenceBuilder::new();
    builder
        .scan(&[row(1, Some(2), "a"), row(2, Some(1), "b")])
        .await;

    let error = builder.resolve(1).await.unwrap_err();
    assert_eq!(
        error.current_context().kind,
        aas_repository_core::ErrorKind::Corrupt
    );
}

#[tokio::test]
async fn resolving_an_id_that_was_never_scanned_is_corrupt() {
    let builder = ReferenceBuilder::new();
    let error = builder.resolve(99).await.unwrap_err();
    assert_eq!(
        error.current_context().kind,
        aas_repository_core::ErrorKind::Corrupt
    );
}
