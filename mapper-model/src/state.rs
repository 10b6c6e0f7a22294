/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use serde::{Deserialize, Serialize};

use crate::context::MapperContext;
use crate::node::MapperTreeNode;
use crate::preferences::MapperPreferences;
use crate::reference::FlatReference;

/// Document input/output shapes the trees can describe (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InputType {
    Json,
    Xml,
    Csv,
    Unknown,
}

pub const CURRENT_MODEL_VERSION: u32 = 1;

/// The persisted mapper document (§3 `MapperState`, §6 persisted model
/// format).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapperState {
    pub model_version: u32,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub source_tree_node: Option<MapperTreeNode>,
    pub target_tree_node: Option<MapperTreeNode>,
    /// Tolerated on load (old snapshots may carry a stale copy) but always
    /// rebuilt before use — see [`crate::tree::flatten::flatten_references`].
    #[serde(default)]
    pub references: Vec<FlatReference>,
    pub local_context: MapperContext,
    pub mapper_preferences: MapperPreferences,
    pub source_input_type: InputType,
    pub target_input_type: InputType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_original_content: Option<String>,
}

impl MapperState {
    pub fn new(id: impl Into<String>) -> Self {
        MapperState {
            model_version: CURRENT_MODEL_VERSION,
            id: id.into(),
            name: None,
            source_tree_node: None,
            target_tree_node: None,
            references: Vec::new(),
            local_context: MapperContext::default(),
            mapper_preferences: MapperPreferences::default(),
            source_input_type: InputType::Unknown,
            target_input_type: InputType::Unknown,
            source_original_content: None,
        }
    }
}
