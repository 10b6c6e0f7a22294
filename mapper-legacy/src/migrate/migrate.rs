/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Legacy format migrator (§4.8): rebuilds a current-shape [`MapperState`]
//! from a prior serialisation that cross-referenced nodes by integer id.

use std::collections::HashMap;

use mapper_model::context::{GlobalVariable, LookupEntry, LookupTable, MapperContext, UserFunction};
use mapper_model::preferences::MapperPreferences;
use mapper_model::reference::{LoopCondition, LoopConditionsConnective, SourceReference};
use mapper_model::state::InputType;
use mapper_model::tree::flatten::flatten_references;
use mapper_model::{MapperState, MapperTreeNode, NodeCondition, CURRENT_MODEL_VERSION};
use serde_json::Value;
use uuid::Uuid;

use super::fields::{array_field, bool_field, legacy_id, legacy_id_field, node_type_field, opt_str_field, str_field, LegacyId};

fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

/// Id maps built while migrating the source tree (Pass A): both the
/// original uuid and the original integer id, when present, resolve to the
/// same fresh uuid.
#[derive(Debug, Default)]
struct SourceMaps {
    uuid: HashMap<String, String>,
    integer: HashMap<i64, String>,
}

impl SourceMaps {
    fn resolve(&self, legacy: &LegacyId) -> Option<String> {
        match legacy {
            LegacyId::Uuid(u) => self.uuid.get(u).cloned(),
            LegacyId::Integer(i) => self.integer.get(i).cloned(),
        }
    }
}

/// Pass A: depth-first walk of the source subtree, assigning a fresh id to
/// every node and recording both old-uuid and old-integer-id mappings.
fn migrate_source_node(value: &Value, maps: &mut SourceMaps) -> MapperTreeNode {
    let new_id = fresh_id();
    if let Some(old_id) = legacy_id(value) {
        match old_id {
            LegacyId::Uuid(u) => {
                maps.uuid.insert(u, new_id.clone());
            }
            LegacyId::Integer(i) => {
                maps.integer.insert(i, new_id.clone());
            }
        }
    }
    let mut node = MapperTreeNode::new(new_id, str_field(value, "name", ""), node_type_field(value, "type"));
    node.sample_value = opt_str_field(value, "sampleValue");
    node.label = opt_str_field(value, "label");
    node.comment = opt_str_field(value, "comment");
    node.format = opt_str_field(value, "format");
    node.children = array_field(value, "children").iter().map(|child| migrate_source_node(child, maps)).collect();
    node
}

fn migrate_source_reference(
    value: &Value,
    source_maps: &SourceMaps,
    loop_maps: &HashMap<LegacyId, String>,
) -> SourceReference {
    let source_node_id =
        legacy_id_field(value, "sourceNodeId").and_then(|legacy| source_maps.resolve(&legacy)).unwrap_or_default();
    let loop_over_id = legacy_id_field(value, "loopOverRef").and_then(|legacy| loop_maps.get(&legacy).cloned());
    SourceReference {
        id: fresh_id(),
        source_node_id,
        variable_name: str_field(value, "variableName", "_value"),
        text_reference: bool_field(value, "textReference", true),
        custom_path: opt_str_field(value, "customPath"),
        loop_over_id,
        is_loop: bool_field(value, "isLoop", false),
    }
}

/// Migrates a `loopReference` object and records `(old-loop-id ->
/// new-loop-uuid)` in `loop_maps` *before* returning, so that this node's
/// own descendants (processed next, depth-first) can resolve `loopOverRef`.
fn migrate_loop_reference(
    value: &Value,
    source_maps: &SourceMaps,
    loop_maps: &mut HashMap<LegacyId, String>,
) -> SourceReference {
    let source_node_id =
        legacy_id_field(value, "sourceNodeId").and_then(|legacy| source_maps.resolve(&legacy)).unwrap_or_default();
    let new_id = fresh_id();
    if let Some(old_loop_id) = legacy_id(value) {
        loop_maps.insert(old_loop_id, new_id.clone());
    }
    SourceReference {
        id: new_id,
        source_node_id,
        variable_name: str_field(value, "variableName", "_item"),
        text_reference: bool_field(value, "textReference", false),
        custom_path: opt_str_field(value, "customPath"),
        loop_over_id: None,
        is_loop: true,
    }
}

/// Pass B: depth-first walk of the target subtree. A node's own
/// `loopReference` is migrated (and registered in `loop_maps`) before its
/// `sourceReferences` and children, satisfying the invariant that a loop's
/// id is always known before any descendant can reference it.
fn migrate_target_node(value: &Value, source_maps: &SourceMaps, loop_maps: &mut HashMap<LegacyId, String>) -> MapperTreeNode {
    let mut node = MapperTreeNode::new(fresh_id(), str_field(value, "name", ""), node_type_field(value, "type"));
    node.value = opt_str_field(value, "value");
    node.plain_text_value = bool_field(value, "plainTextValue", false);
    node.custom_code = opt_str_field(value, "customCode");
    node.label = opt_str_field(value, "label");
    node.comment = opt_str_field(value, "comment");
    node.format = opt_str_field(value, "format");
    node.error_message = opt_str_field(value, "errorMessage");
    node.non_empty = bool_field(value, "nonEmpty", false);
    node.debug_comment = opt_str_field(value, "debugComment");
    node.quote = opt_str_field(value, "quote");
    node.loop_statement = opt_str_field(value, "loopStatement");
    node.loop_iterator = opt_str_field(value, "loopIterator");

    if let Some(condition) = value.get("nodeCondition").filter(|v| !v.is_null()) {
        if let Some(text) = condition.get("condition").and_then(Value::as_str) {
            node.node_condition = Some(NodeCondition { condition: text.to_string() });
        }
    }

    if let Some(loop_ref) = value.get("loopReference").filter(|v| !v.is_null()) {
        node.loop_reference = Some(migrate_loop_reference(loop_ref, source_maps, loop_maps));
    }

    let conditions: Vec<LoopCondition> = array_field(value, "loopConditions")
        .iter()
        .map(|c| LoopCondition {
            source_node_path: str_field(c, "sourceNodePath", ""),
            operator_and_value: str_field(c, "operatorAndValue", ""),
        })
        .collect();
    if !conditions.is_empty() {
        node.loop_conditions = Some(conditions);
    }
    node.loop_conditions_connective = match value.get("loopConditionsConnective").and_then(Value::as_str) {
        Some("OR") => LoopConditionsConnective::Or,
        _ => LoopConditionsConnective::And,
    };

    let references: Vec<SourceReference> = array_field(value, "sourceReferences")
        .iter()
        .map(|reference| migrate_source_reference(reference, source_maps, loop_maps))
        .collect();
    if !references.is_empty() {
        node.source_references = Some(references);
    }

    node.children =
        array_field(value, "children").iter().map(|child| migrate_target_node(child, source_maps, loop_maps)).collect();
    node
}

fn migrate_context(value: Option<&Value>) -> MapperContext {
    let value = value.cloned().unwrap_or(Value::Null);
    let global_variables = array_field(&value, "globalVariables")
        .iter()
        .map(|g| GlobalVariable {
            name: str_field(g, "name", ""),
            value: str_field(g, "value", ""),
            plain_text_value: bool_field(g, "plainTextValue", false),
            is_final: g.get("isFinal").and_then(Value::as_bool),
        })
        .collect();
    let lookup_tables = array_field(&value, "lookupTables")
        .iter()
        .map(|table| LookupTable {
            name: str_field(table, "name", ""),
            entries: array_field(table, "entries")
                .iter()
                .map(|entry| LookupEntry {
                    key: str_field(entry, "key", ""),
                    value: str_field(entry, "value", ""),
                    plain_text_value: bool_field(entry, "plainTextValue", false),
                })
                .collect(),
        })
        .collect();
    let functions = array_field(&value, "functions")
        .iter()
        .map(|f| UserFunction { name: str_field(f, "name", ""), body: str_field(f, "body", "") })
        .collect();
    MapperContext {
        global_variables,
        lookup_tables,
        functions,
        prolog_script: opt_str_field(&value, "prologScript"),
        epilog_script: opt_str_field(&value, "epilogScript"),
    }
}

fn migrate_preferences(value: Option<&Value>) -> MapperPreferences {
    let value = value.cloned().unwrap_or(Value::Null);
    MapperPreferences {
        debug_comment: bool_field(&value, "debugComment", false),
        override_target_value: bool_field(&value, "overrideTargetValue", true),
        auto_map: bool_field(&value, "autoMap", false),
        auto_map_one_to_many: bool_field(&value, "autoMapOneToMany", false),
        auto_map_include_sub_nodes: bool_field(&value, "autoMapIncludeSubNodes", false),
    }
}

fn migrate_input_type(value: &Value, key: &str) -> InputType {
    match value.get(key).and_then(Value::as_str) {
        Some("JSON") => InputType::Json,
        Some("XML") => InputType::Xml,
        Some("CSV") => InputType::Csv,
        _ => InputType::Unknown,
    }
}

/// Entry point: migrates a legacy-shaped JSON document into a current
/// [`MapperState`]. Never fails on field-level problems; every reader
/// falls back to a sensible default (§7).
pub fn migrate_legacy_state(raw: &Value) -> MapperState {
    let default_id = fresh_id();
    let id = str_field(raw, "id", &default_id);
    let name = opt_str_field(raw, "name");

    let mut source_maps = SourceMaps::default();
    let source_tree_node =
        raw.get("sourceTreeNode").filter(|v| !v.is_null()).map(|v| migrate_source_node(v, &mut source_maps));

    let mut loop_maps: HashMap<LegacyId, String> = HashMap::new();
    let target_tree_node = raw
        .get("targetTreeNode")
        .filter(|v| !v.is_null())
        .map(|v| migrate_target_node(v, &source_maps, &mut loop_maps));

    // Pass C: the flat reference list is always derived, never migrated field-by-field.
    let references = target_tree_node.as_ref().map(flatten_references).unwrap_or_default();

    MapperState {
        model_version: CURRENT_MODEL_VERSION,
        id,
        name,
        source_tree_node,
        target_tree_node,
        references,
        local_context: migrate_context(raw.get("localContext")),
        mapper_preferences: migrate_preferences(raw.get("mapperPreferences")),
        source_input_type: migrate_input_type(raw, "sourceInputType"),
        target_input_type: migrate_input_type(raw, "targetInputType"),
        source_original_content: opt_str_field(raw, "sourceOriginalContent"),
    }
}

#[cfg(test)]
mod tests {
    use mapper_model::NodeType;
    use serde_json::json;

    use super::*;

    #[test]
    fn migrates_scalar_reference_through_integer_source_id() {
        let raw = json!({
            "id": "doc-1",
            "sourceTreeNode": {
                "id": 1, "name": "root", "type": "OBJECT",
                "children": [{"id": 2, "name": "orderId", "type": "FIELD", "children": []}]
            },
            "targetTreeNode": {
                "id": 10, "name": "root", "type": "OBJECT",
                "children": [{
                    "id": 11, "name": "id", "type": "FIELD",
                    "sourceReferences": [{"id": 100, "sourceNodeId": 2, "variableName": "_id", "textReference": true}]
                }]
            }
        });

        let state = migrate_legacy_state(&raw);
        let source_root = state.source_tree_node.as_ref().unwrap();
        let order_id_new = &source_root.children[0].id;

        let target_root = state.target_tree_node.as_ref().unwrap();
        let reference = target_root.children[0].source_references.as_ref().unwrap()[0].clone();
        assert_eq!(&reference.source_node_id, order_id_new);
        assert_eq!(state.references.len(), 1);
    }

    #[test]
    fn retargets_integer_loop_over_ref_to_new_loop_uuid() {
        let raw = json!({
            "id": "doc-2",
            "sourceTreeNode": {"id": 1, "name": "root", "type": "OBJECT", "children": [
                {"id": 2, "name": "orders", "type": "ARRAY", "children": [
                    {"id": 3, "name": "item", "type": "ARRAY_ITEM", "children": [
                        {"id": 4, "name": "id", "type": "FIELD", "children": []}
                    ]}
                ]}
            ]},
            "targetTreeNode": {"id": 20, "name": "root", "type": "OBJECT", "children": [
                {
                    "id": 21, "name": "items", "type": "ARRAY",
                    "loopReference": {"id": 99, "sourceNodeId": 2, "variableName": "_o"},
                    "children": [
                        {"id": 22, "name": "item", "type": "ARRAY_ITEM", "children": [
                            {
                                "id": 23, "name": "orderId", "type": "FIELD",
                                "sourceReferences": [{"id": 200, "sourceNodeId": 4, "variableName": "_id", "loopOverRef": 99}]
                            }
                        ]}
                    ]
                }
            ]}
        });

        let state = migrate_legacy_state(&raw);
        let target_root = state.target_tree_node.unwrap();
        let items = &target_root.children[0];
        let loop_id = items.loop_reference.as_ref().unwrap().id.clone();
        let order_id = &items.children[0].children[0];
        let reference = &order_id.source_references.as_ref().unwrap()[0];
        assert_eq!(reference.loop_over_id.as_deref(), Some(loop_id.as_str()));
    }

    #[test]
    fn unknown_node_type_falls_back_to_element() {
        let raw = json!({
            "id": "doc-3",
            "targetTreeNode": {"id": 1, "name": "root", "type": "some-mystery-type", "children": []}
        });
        let state = migrate_legacy_state(&raw);
        assert_eq!(state.target_tree_node.unwrap().node_type, NodeType::Element);
    }

    #[test]
    fn missing_trees_and_context_fall_back_to_defaults() {
        let raw = json!({"id": "doc-4"});
        let state = migrate_legacy_state(&raw);
        assert!(state.source_tree_node.is_none());
        assert!(state.target_tree_node.is_none());
        assert!(state.references.is_empty());
        assert_eq!(state.mapper_preferences.override_target_value, true);
    }
}
