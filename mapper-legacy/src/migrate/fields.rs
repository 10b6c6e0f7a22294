/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Permissive field readers used throughout the migrator (§4.8 "Node-type
//! normalisation" and "coerce using permissive field readers with
//! defaults"). Every reader tolerates a missing or wrongly-typed field
//! instead of failing the whole migration.

use mapper_model::NodeType;
use serde_json::Value;

pub fn str_field(value: &Value, key: &str, default: &str) -> String {
    value.get(key).and_then(Value::as_str).map(str::to_string).unwrap_or_else(|| default.to_string())
}

pub fn opt_str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

pub fn bool_field(value: &Value, key: &str, default: bool) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(default)
}

pub fn array_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value.get(key).and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}

/// Reads a legacy node identifier, which may have been serialised as a
/// JSON string (already a uuid) or a JSON number (the old integer-id
/// scheme this migrator exists to repair).
pub fn legacy_id_field(value: &Value, key: &str) -> Option<LegacyId> {
    match value.get(key) {
        Some(Value::String(s)) => Some(LegacyId::Uuid(s.clone())),
        Some(Value::Number(n)) => n.as_i64().map(LegacyId::Integer),
        _ => None,
    }
}

/// Reads a node's or reference's own legacy identifier. Older documents
/// carried this under `jsonId` (to leave `id` free for the current uuid
/// shape); fall back to `id` for documents that reused it directly.
pub fn legacy_id(value: &Value) -> Option<LegacyId> {
    legacy_id_field(value, "jsonId").or_else(|| legacy_id_field(value, "id"))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LegacyId {
    Uuid(String),
    Integer(i64),
}

const ELEMENT_ALIASES: &[&str] = &["element", "object", "field", "ELEMENT", "OBJECT", "FIELD"];
const ATTRIBUTE_ALIASES: &[&str] = &["attribute", "attr", "ATTRIBUTE", "ATTR"];
const ARRAY_ALIASES: &[&str] = &["array", "list", "ARRAY", "LIST"];
const ARRAY_CHILD_ALIASES: &[&str] =
    &["arrayChild", "arrayItem", "arrayElement", "item", "ARRAY_CHILD", "ARRAY_ITEM", "ARRAY_ELEMENT"];
const CODE_ALIASES: &[&str] = &["code", "script", "customCode", "CODE", "SCRIPT"];

/// Maps a closed set of legacy type names onto the current `NodeType`;
/// anything unrecognised falls back to `Element` (§4.8).
pub fn node_type_field(value: &Value, key: &str) -> NodeType {
    let raw = value.get(key).and_then(Value::as_str).unwrap_or("");
    if ATTRIBUTE_ALIASES.contains(&raw) {
        NodeType::Attribute
    } else if ARRAY_CHILD_ALIASES.contains(&raw) {
        NodeType::ArrayChild
    } else if ARRAY_ALIASES.contains(&raw) {
        NodeType::Array
    } else if CODE_ALIASES.contains(&raw) {
        NodeType::Code
    } else if ELEMENT_ALIASES.contains(&raw) {
        NodeType::Element
    } else {
        NodeType::Element
    }
}
