/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use serde::{Deserialize, Serialize};

/// A binding from one source node to a variable name on a target node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReference {
    pub id: String,
    pub source_node_id: String,
    pub variable_name: String,
    pub text_reference: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub custom_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub loop_over_id: Option<String>,
    /// `true` for a `LoopReference`: the reference denotes the source array
    /// iterated by the target array node that owns it, rather than a plain
    /// scalar binding.
    #[serde(default)]
    pub is_loop: bool,
}

impl SourceReference {
    pub fn new_loop(id: impl Into<String>, source_node_id: impl Into<String>, variable_name: impl Into<String>) -> Self {
        SourceReference {
            id: id.into(),
            source_node_id: source_node_id.into(),
            variable_name: variable_name.into(),
            text_reference: false,
            custom_path: None,
            loop_over_id: None,
            is_loop: true,
        }
    }

    pub fn new_scalar(id: impl Into<String>, source_node_id: impl Into<String>, variable_name: impl Into<String>) -> Self {
        SourceReference {
            id: id.into(),
            source_node_id: source_node_id.into(),
            variable_name: variable_name.into(),
            text_reference: true,
            custom_path: None,
            loop_over_id: None,
            is_loop: false,
        }
    }
}

/// A condition clause attached to a `loopConditions` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopCondition {
    /// Path to the source field, resolved relative to the loop iterator.
    pub source_node_path: String,
    /// The operator and right-hand side, e.g. `== 'ACTIVE'`.
    pub operator_and_value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LoopConditionsConnective {
    #[default]
    And,
    Or,
}

impl LoopConditionsConnective {
    pub fn js_operator(self) -> &'static str {
        match self {
            LoopConditionsConnective::And => "&&",
            LoopConditionsConnective::Or => "||",
        }
    }
}

/// Denormalised view of all references carried by the target tree.
///
/// Always rebuilt from the tree (see [`crate::tree::flatten::flatten_references`]);
/// never mutated directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatReference {
    pub id: String,
    pub source_node_id: String,
    pub target_node_id: String,
    pub variable_name: String,
    pub text_reference: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub custom_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub loop_over_id: Option<String>,
    #[serde(default)]
    pub is_loop: bool,
}
