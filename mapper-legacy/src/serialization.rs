/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Top-level deserialisation entry point (§4.9): the only function in this
//! crate allowed to surface an `Err` to its caller.

use mapper_model::MapperState;
use serde_json::Value;

use crate::error::{LegacyError, Result};
use crate::migrate::migrate_legacy_state;

/// `modelVersion` values below this belong to the prior integer-id format.
const CURRENT_VERSION: i64 = 1;

fn is_current_shape(value: &Value) -> bool {
    let Some(obj) = value.as_object() else { return false };
    obj.get("modelVersion").and_then(Value::as_i64) == Some(1)
        && obj.contains_key("sourceTreeNode")
        && obj.contains_key("targetTreeNode")
        && obj.contains_key("localContext")
        && obj.contains_key("mapperPreferences")
}

fn has_legacy_shaped_source_tree(value: &Value) -> bool {
    fn node_has_integer_id(node: &Value) -> bool {
        if matches!(node.get("id"), Some(Value::Number(_))) {
            return true;
        }
        node.get("children")
            .and_then(Value::as_array)
            .is_some_and(|children| children.iter().any(node_has_integer_id))
    }
    value.get("sourceTreeNode").filter(|v| !v.is_null()).is_some_and(node_has_integer_id)
}

fn is_legacy_shape(value: &Value) -> bool {
    let Some(obj) = value.as_object() else { return false };
    let version_is_prior = match obj.get("modelVersion") {
        None => true,
        Some(Value::Number(n)) => n.as_i64().is_some_and(|v| v < CURRENT_VERSION),
        _ => false,
    };
    version_is_prior || has_legacy_shaped_source_tree(value)
}

/// Parses `text`; returns the document unchanged if it already matches the
/// current model shape, migrates it if it matches a recognised legacy
/// shape, and otherwise fails with [`LegacyError::UnrecognisedShape`].
pub fn deserialize(text: &str) -> Result<MapperState> {
    let value: Value = serde_json::from_str(text)?;

    if is_current_shape(&value) {
        return Ok(serde_json::from_value(value)?);
    }
    if is_legacy_shape(&value) {
        return Ok(migrate_legacy_state(&value));
    }
    Err(LegacyError::UnrecognisedShape)
}

#[cfg(test)]
mod tests {
    use mapper_model::state::InputType;

    use super::*;

    #[test]
    fn current_shape_document_round_trips_as_is() {
        let mut state = MapperState::new("doc-1");
        state.source_input_type = InputType::Json;
        state.target_input_type = InputType::Json;
        let text = serde_json::to_string(&state).unwrap();

        let parsed = deserialize(&text).unwrap();
        assert_eq!(parsed.id, "doc-1");
    }

    #[test]
    fn legacy_shape_without_version_is_migrated() {
        let text = r#"{"id": "doc-2", "sourceTreeNode": {"id": 1, "name": "root", "type": "OBJECT", "children": []}}"#;
        let parsed = deserialize(text).unwrap();
        assert_ne!(parsed.source_tree_node.unwrap().id, "1");
    }

    #[test]
    fn unrecognised_shape_fails() {
        let err = deserialize("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, LegacyError::UnrecognisedShape));
    }

    #[test]
    fn object_without_a_version_is_treated_as_legacy_and_migrated() {
        let parsed = deserialize(r#"{"nothing": "recognisable"}"#).unwrap();
        assert!(parsed.target_tree_node.is_none());
    }

    #[test]
    fn malformed_json_fails_with_cause() {
        let err = deserialize("{not json").unwrap_err();
        assert!(matches!(err, LegacyError::MalformedJson(_)));
    }
}
