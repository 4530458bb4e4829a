//! C6: reconstructs the polymorphic SubmodelElement tree from flat
//! `submodel_element` rows (spec §4.6).
//!
//! Algorithm: index every row by its database id, group by `parent_sme_id`,
//! decode each row's variant payload independently (bounded fan-out via
//! [`futures::stream::buffer_unordered`], grounded on the teacher's
//! concurrency stack in `snapshot/mod.rs`), then stitch children into their
//! parent container in a final serial pass ordered by `(position,
//! id_short_path)` (spec I3/I4, with roots themselves ordered by db id).
//! A row claiming to be a container but missing a `position`, or any
//! non-container row found with children, is reported as `Corrupt`.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::RepositoryError;
use crate::model::{
    AnnotatedRelationshipElement, BasicEventElement, BlobElement, Capability, CommonElementData,
    Direction, EntityElement, EntityType, FileElement, LangString, MultiLanguagePropertyElement,
    OperationElement, OperationVariable, PropertyElement, RangeElement, Reference,
    ReferenceElement, RelationshipElement, StateOfEvent, SubmodelElement,
    SubmodelElementCollection, SubmodelElementKind, SubmodelElementList, TypedValue, ValueType,
};
use crate::postgres::builders::{data_spec, extensions, qualifiers};
use crate::postgres::concurrency::WorkerPool;
use crate::postgres::rows::SubmodelElementRow;

fn decode_lang_strings(
    payload: &Value,
    key: &str,
) -> error_stack::Result<Vec<LangString>, RepositoryError> {
    payload
        .get(key)
        .and_then(Value::as_array)
        .filter(|array| !array.is_empty())
        .map(|array| {
            serde_json::from_value(Value::Array(array.clone())).map_err(|error| {
                error_stack::Report::new(RepositoryError::corrupt("malformed lang string array"))
                    .attach(error)
            })
        })
        .transpose()
        .map(Option::unwrap_or_default)
}

fn decode_reference_array(
    payload: &Value,
    key: &str,
    references: &HashMap<i64, Reference>,
    row_id: i64,
) -> error_stack::Result<Vec<Reference>, RepositoryError> {
    payload
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_i64)
        .map(|id| {
            references.get(&id).cloned().ok_or_else(|| {
                error_stack::Report::new(RepositoryError::corrupt(format!(
                    "submodel_element {row_id} references unresolved reference {id}"
                )))
            })
        })
        .collect()
}

/// Decodes every row's own variant payload independently and in parallel
/// (bounded by `pool`), then stitches the parent/child tree together once
/// all rows are decoded. Returns the root-level elements belonging to the
/// submodel the rows were queried for, ordered by `(position,
/// id_short_path)`.
#[tracing::instrument(level = "trace", skip(pool, rows, references))]
pub async fn build(
    pool: &WorkerPool,
    rows: Vec<SubmodelElementRow>,
    references: &HashMap<i64, Reference>,
) -> error_stack::Result<Vec<SubmodelElement>, RepositoryError> {
    for row in &rows {
        row.validate_container_position()
            .map_err(error_stack::Report::new)?;
    }

    let decoded: Vec<(i64, Option<i64>, Option<String>, SubmodelElement)> = pool
        .run(rows.into_iter().map(|row| decode_one(row, references)))
        .await
        .into_iter()
        .collect::<error_stack::Result<Vec<_>, RepositoryError>>()?;

    let mut by_parent: HashMap<Option<i64>, Vec<(Option<String>, SubmodelElement)>> = HashMap::new();
    let mut accepts_children: HashMap<i64, bool> = HashMap::new();
    for (id, _, _, element) in &decoded {
        accepts_children.insert(*id, can_parent_children(&element.kind));
    }
    for (id, parent_id, role, element) in decoded {
        if let Some(parent_id) = parent_id {
            if accepts_children.get(&parent_id) != Some(&true) {
                return Err(error_stack::Report::new(RepositoryError::corrupt(format!(
                    "submodel_element {id} has a non-container parent {parent_id}"
                ))));
            }
        }
        by_parent.entry(parent_id).or_default().push((role, element));
    }

    attach_children(&mut by_parent, None)?;

    let mut roots = by_parent.remove(&None).unwrap_or_default();
    sort_siblings(&mut roots);
    Ok(roots.into_iter().map(|(_, element)| element).collect())
}

/// Recursively attaches each node's children before the node is moved into
/// its own parent's child list, since `SubmodelElementKind`'s container
/// variants own their children by value.
fn attach_children(
    by_parent: &mut HashMap<Option<i64>, Vec<(Option<String>, SubmodelElement)>>,
    parent_id: Option<i64>,
) -> error_stack::Result<(), RepositoryError> {
    let Some(mut siblings) = by_parent.remove(&parent_id) else {
        return Ok(());
    };

    for (_, element) in &mut siblings {
        let own_id = element.common.db_id;
        attach_children(by_parent, Some(own_id))?;
        if let Some(mut children) = by_parent.remove(&Some(own_id)) {
            sort_siblings(&mut children);
            attach_into(element, children)?;
        }
    }

    by_parent.insert(parent_id, siblings);
    Ok(())
}

fn sort_siblings(elements: &mut [(Option<String>, SubmodelElement)]) {
    elements.sort_by(|(_, a), (_, b)| {
        (a.common.position, &a.common.id_short_path).cmp(&(b.common.position, &b.common.id_short_path))
    });
}

/// `Collection`/`List` hold their children as the element's own `value`;
/// `Entity`/`AnnotatedRelationshipElement` hold theirs as `statements`/
/// `annotations`; `Operation`'s children are role-tagged `operation_element`
/// rows bucketed into `input`/`output`/`inoutput_variables` — all are
/// ordinary rows in the flat `submodel_element` tree, just addressed through
/// a different field once decoded (spec §4.6).
fn can_parent_children(kind: &SubmodelElementKind) -> bool {
    matches!(
        kind,
        SubmodelElementKind::SubmodelElementCollection(_)
            | SubmodelElementKind::SubmodelElementList(_)
            | SubmodelElementKind::Entity(_)
            | SubmodelElementKind::AnnotatedRelationshipElement(_)
            | SubmodelElementKind::Operation(_)
    )
}

fn attach_into(
    element: &mut SubmodelElement,
    children: Vec<(Option<String>, SubmodelElement)>,
) -> error_stack::Result<(), RepositoryError> {
    match &mut element.kind {
        SubmodelElementKind::SubmodelElementCollection(collection) => {
            collection.value = children.into_iter().map(|(_, child)| child).collect();
            Ok(())
        }
        SubmodelElementKind::SubmodelElementList(list) => {
            list.value = children.into_iter().map(|(_, child)| child).collect();
            Ok(())
        }
        SubmodelElementKind::Entity(entity) => {
            entity.statements = children.into_iter().map(|(_, child)| child).collect();
            Ok(())
        }
        SubmodelElementKind::AnnotatedRelationshipElement(relationship) => {
            relationship.annotations = children.into_iter().map(|(_, child)| child).collect();
            Ok(())
        }
        SubmodelElementKind::Operation(operation) => {
            for (role, child) in children {
                let variable = OperationVariable {
                    value: Box::new(child),
                };
                match role.as_deref() {
                    Some("Input") => operation.input_variables.push(variable),
                    Some("Output") => operation.output_variables.push(variable),
                    Some("InOutput") => operation.inoutput_variables.push(variable),
                    other => {
                        return Err(error_stack::Report::new(RepositoryError::corrupt(format!(
                            "operation variable {} has unknown role {other:?}",
                            variable.value.common.id_short
                        ))))
                    }
                }
            }
            Ok(())
        }
        other => Err(error_stack::Report::new(RepositoryError::corrupt(format!(
            "submodel_element {} ({}) has children but is not a container",
            element.common.id_short,
            other.model_type()
        )))),
    }
}

async fn decode_one(
    row: SubmodelElementRow,
    references: &HashMap<i64, Reference>,
) -> error_stack::Result<(i64, Option<i64>, Option<String>, SubmodelElement), RepositoryError> {
    let role = row
        .payload_json
        .get("operation_role")
        .and_then(Value::as_str)
        .map(str::to_owned);
    let common = build_common(&row, references)?;
    let kind = build_kind(&row, references)?;
    Ok((
        row.id,
        row.parent_sme_id,
        role,
        SubmodelElement { common, kind },
    ))
}

fn build_common(
    row: &SubmodelElementRow,
    references: &HashMap<i64, Reference>,
) -> error_stack::Result<CommonElementData, RepositoryError> {
    let semantic_id = row
        .semantic_id
        .map(|id| {
            references.get(&id).cloned().ok_or_else(|| {
                error_stack::Report::new(RepositoryError::corrupt(format!(
                    "submodel_element {} references unresolved reference {id}",
                    row.id
                )))
            })
        })
        .transpose()?;

    let qualifiers = row
        .payload_json
        .get("qualifiers_json")
        .and_then(|value| value.as_array())
        .filter(|array| !array.is_empty())
        .map(|array| qualifiers::build(array, references))
        .transpose()?
        .unwrap_or_default();
    let extensions = row
        .payload_json
        .get("extensions_json")
        .and_then(|value| value.as_array())
        .filter(|array| !array.is_empty())
        .map(|array| extensions::build(array, references))
        .transpose()?
        .unwrap_or_default();
    let embedded_data_specifications = row
        .payload_json
        .get("embedded_data_specifications_json")
        .and_then(|value| value.as_array())
        .filter(|array| !array.is_empty())
        .map(|array| data_spec::build(array, references))
        .transpose()?
        .unwrap_or_default();

    let display_name = decode_lang_strings(&row.payload_json, "display_name_json")?;
    let description = decode_lang_strings(&row.payload_json, "description_json")?;
    let supplemental_semantic_ids = decode_reference_array(
        &row.payload_json,
        "supplemental_semantic_ids",
        references,
        row.id,
    )?;

    Ok(CommonElementData {
        id_short: row.id_short.clone(),
        category: row.category.clone(),
        display_name,
        description,
        semantic_id,
        supplemental_semantic_ids,
        qualifiers,
        extensions,
        embedded_data_specifications,
        db_id: row.id,
        parent_id: row.parent_sme_id,
        root_id: row.root_sme_id,
        id_short_path: row.idshort_path.clone(),
        position: row.position,
    })
}

fn build_kind(
    row: &SubmodelElementRow,
    references: &HashMap<i64, Reference>,
) -> error_stack::Result<SubmodelElementKind, RepositoryError> {
    let payload = &row.payload_json;
    let corrupt = |reason: String| error_stack::Report::new(RepositoryError::corrupt(reason));
    let resolve = |id: i64| -> error_stack::Result<Reference, RepositoryError> {
        references
            .get(&id)
            .cloned()
            .ok_or_else(|| corrupt(format!("submodel_element {} references unresolved reference {id}", row.id)))
    };
    let get_i64 = |key: &str| payload.get(key).and_then(Value::as_i64);
    let get_str = |key: &str| payload.get(key).and_then(Value::as_str).map(str::to_owned);

    Ok(match row.model_type.as_str() {
        "Property" => {
            let value_type = decode_value_type(payload)?;
            SubmodelElementKind::Property(PropertyElement {
                value: decode_typed_value(payload, value_type),
                value_type,
                value_id: get_i64("value_id").map(resolve).transpose()?,
            })
        }
        "Range" => {
            let value_type = decode_value_type(payload)?;
            SubmodelElementKind::Range(RangeElement {
                value_type,
                min: decode_named_typed_value(payload, "min", value_type),
                max: decode_named_typed_value(payload, "max", value_type),
            })
        }
        "MultiLanguageProperty" => SubmodelElementKind::MultiLanguageProperty(
            MultiLanguagePropertyElement {
                value: serde_json::from_value(payload.get("value").cloned().unwrap_or_default())
                    .map_err(|error| corrupt(format!("malformed lang string value: {error}")))?,
                value_id: get_i64("value_id").map(resolve).transpose()?,
            },
        ),
        "Blob" => SubmodelElementKind::Blob(BlobElement {
            value: get_str("value"),
            content_type: get_str("content_type").unwrap_or_default(),
        }),
        "File" => SubmodelElementKind::File(FileElement {
            value: get_str("value"),
            content_type: get_str("content_type").unwrap_or_default(),
        }),
        "ReferenceElement" => SubmodelElementKind::ReferenceElement(ReferenceElement {
            value: get_i64("value").map(resolve).transpose()?.ok_or_else(|| {
                corrupt(format!("ReferenceElement {} is missing its value", row.id))
            })?,
        }),
        "RelationshipElement" => {
            SubmodelElementKind::RelationshipElement(RelationshipElement {
                first: get_i64("first")
                    .map(resolve)
                    .transpose()?
                    .ok_or_else(|| corrupt(format!("RelationshipElement {} is missing `first`", row.id)))?,
                second: get_i64("second")
                    .map(resolve)
                    .transpose()?
                    .ok_or_else(|| corrupt(format!("RelationshipElement {} is missing `second`", row.id)))?,
            })
        }
        "AnnotatedRelationshipElement" => {
            SubmodelElementKind::AnnotatedRelationshipElement(AnnotatedRelationshipElement {
                first: get_i64("first")
                    .map(resolve)
                    .transpose()?
                    .ok_or_else(|| corrupt(format!("AnnotatedRelationshipElement {} is missing `first`", row.id)))?,
                second: get_i64("second")
                    .map(resolve)
                    .transpose()?
                    .ok_or_else(|| corrupt(format!("AnnotatedRelationshipElement {} is missing `second`", row.id)))?,
                annotations: Vec::new(),
            })
        }
        "Capability" => SubmodelElementKind::Capability(Capability),
        "Entity" => {
            let entity_type = match get_str("entity_type").as_deref() {
                Some("CoManagedEntity") => EntityType::CoManagedEntity,
                Some("SelfManagedEntity") => EntityType::SelfManagedEntity,
                other => {
                    return Err(corrupt(format!(
                        "Entity {} has unknown entityType {other:?}",
                        row.id
                    )))
                }
            };
            SubmodelElementKind::Entity(EntityElement {
                entity_type,
                global_asset_id: get_str("global_asset_id"),
                specific_asset_ids: decode_reference_array(
                    payload,
                    "specific_asset_ids",
                    references,
                    row.id,
                )?,
                statements: Vec::new(),
            })
        }
        "Operation" => SubmodelElementKind::Operation(OperationElement {
            // Filled in by `attach_into` once role-tagged variable children
            // (stored as ordinary rows with `operation_role` set) are stitched.
            input_variables: Vec::new(),
            output_variables: Vec::new(),
            inoutput_variables: Vec::new(),
        }),
        "BasicEventElement" => {
            let direction = match get_str("direction").as_deref() {
                Some("Input") => Direction::Input,
                Some("Output") => Direction::Output,
                other => {
                    return Err(corrupt(format!(
                        "BasicEventElement {} has unknown direction {other:?}",
                        row.id
                    )))
                }
            };
            let state = match get_str("state").as_deref() {
                Some("On") => StateOfEvent::On,
                Some("Off") => StateOfEvent::Off,
                other => {
                    return Err(corrupt(format!(
                        "BasicEventElement {} has unknown state {other:?}",
                        row.id
                    )))
                }
            };
            SubmodelElementKind::BasicEventElement(BasicEventElement {
                observed: get_i64("observed")
                    .map(resolve)
                    .transpose()?
                    .ok_or_else(|| corrupt(format!("BasicEventElement {} is missing `observed`", row.id)))?,
                direction,
                state,
                message_topic: get_str("message_topic"),
                message_broker: get_i64("message_broker").map(resolve).transpose()?,
                last_update: get_str("last_update"),
                min_interval: get_str("min_interval"),
                max_interval: get_str("max_interval"),
            })
        }
        "SubmodelElementCollection" => {
            SubmodelElementKind::SubmodelElementCollection(SubmodelElementCollection {
                value: Vec::new(),
            })
        }
        "SubmodelElementList" => SubmodelElementKind::SubmodelElementList(SubmodelElementList {
            order_relevant: payload
                .get("order_relevant")
                .and_then(Value::as_bool)
                .unwrap_or(true),
            semantic_id_list_element: get_i64("semantic_id_list_element")
                .map(resolve)
                .transpose()?,
            type_value_list_element: get_str("type_value_list_element").unwrap_or_default(),
            value_type_list_element: get_str("value_type_list_element")
                .map(|value| parse_value_type(&value))
                .transpose()?,
            value: Vec::new(),
        }),
        other => {
            return Err(corrupt(format!(
                "submodel_element {} has unknown model_type {other}",
                row.id
            )))
        }
    })
}

fn decode_value_type(payload: &Value) -> error_stack::Result<ValueType, RepositoryError> {
    let raw = payload
        .get("value_type")
        .and_then(Value::as_str)
        .unwrap_or("xsdString");
    parse_value_type(raw)
}

fn parse_value_type(raw: &str) -> error_stack::Result<ValueType, RepositoryError> {
    serde_json::from_value(Value::String(raw.to_owned())).map_err(|error| {
        error_stack::Report::new(RepositoryError::corrupt(format!(
            "unrecognized valueType {raw}: {error}"
        )))
    })
}

fn decode_typed_value(payload: &Value, value_type: ValueType) -> Option<TypedValue> {
    decode_named_typed_value(payload, "value", value_type)
}

fn decode_named_typed_value(payload: &Value, prefix: &str, value_type: ValueType) -> Option<TypedValue> {
    if let Some(value) = payload.get(format!("{prefix}_bool")).and_then(Value::as_bool) {
        return Some(TypedValue::Bool(value));
    }
    if let Some(value) = payload.get(format!("{prefix}_num")).and_then(Value::as_f64) {
        return Some(TypedValue::Number(value));
    }
    payload
        .get(format!("{prefix}_text"))
        .and_then(Value::as_str)
        .map(|text| TypedValue::coerce(text, Some(value_type)))
}
