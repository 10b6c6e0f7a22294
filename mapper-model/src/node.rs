/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use serde::{Deserialize, Serialize};

use crate::reference::{LoopCondition, LoopConditionsConnective, SourceReference};

/// The tagged shape of a node in either the source or target tree.
///
/// The emitter and the tree utilities switch on this tag directly rather
/// than dispatching through a trait object — there are exactly five shapes,
/// closed over for the lifetime of this format (§3, §9 "Dynamic dispatch on
/// node shape").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    Element,
    Attribute,
    Array,
    ArrayChild,
    Code,
}

/// A node in a source or target tree.
///
/// Target-only annotations are `Option`s that are always `None` on nodes
/// that live in a source tree (§3 invariant: "Source trees never carry
/// `sourceReferences`, `loopReference`, `nodeCondition`, `value`").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapperTreeNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub children: Vec<MapperTreeNode>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<String>,
    #[serde(default)]
    pub plain_text_value: bool,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source_references: Option<Vec<SourceReference>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub loop_reference: Option<SourceReference>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub loop_iterator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub loop_conditions: Option<Vec<LoopCondition>>,
    #[serde(default)]
    pub loop_conditions_connective: LoopConditionsConnective,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub loop_statement: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub node_condition: Option<NodeCondition>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub custom_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub non_empty: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub debug_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub quote: Option<String>,

    /// Sample value carried by source nodes for display purposes only; the
    /// emitter never reads it.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sample_value: Option<String>,
}

/// A guard expression attached to a target node (`nodeCondition`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeCondition {
    pub condition: String,
}

impl MapperTreeNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: NodeType) -> Self {
        MapperTreeNode {
            id: id.into(),
            name: name.into(),
            node_type,
            children: Vec::new(),
            value: None,
            plain_text_value: false,
            source_references: None,
            loop_reference: None,
            loop_iterator: None,
            loop_conditions: None,
            loop_conditions_connective: LoopConditionsConnective::default(),
            loop_statement: None,
            node_condition: None,
            custom_code: None,
            label: None,
            comment: None,
            format: None,
            error_message: None,
            non_empty: false,
            debug_comment: None,
            quote: None,
            sample_value: None,
        }
    }

    pub fn is_array_child(&self) -> bool {
        self.node_type == NodeType::ArrayChild
    }

    pub fn is_attribute(&self) -> bool {
        self.node_type == NodeType::Attribute
    }

    pub fn has_source_references(&self) -> bool {
        self.source_references.as_ref().is_some_and(|refs| !refs.is_empty())
    }

    pub fn nonblank_node_condition(&self) -> Option<&str> {
        self.node_condition
            .as_ref()
            .map(|c| c.condition.trim())
            .filter(|c| !c.is_empty())
    }

    pub fn nonblank_custom_code(&self) -> Option<&str> {
        self.custom_code.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}
