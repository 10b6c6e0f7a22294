/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Output path builder (§4.4): the left-hand-side accessor a target node
//! assigns through, inside the object the emitted script is constructing.

use std::collections::HashMap;

use crate::node::{MapperTreeNode, NodeType};
use crate::tree::search::{find_node_by_id, get_ancestors};

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn append_segment(out: &mut String, node: &MapperTreeNode) {
    let name = if node.node_type == NodeType::Attribute { format!("@{}", node.name) } else { node.name.clone() };
    if name.starts_with('@') || !is_identifier(&name) {
        out.push_str(&format!("[{:?}]", name));
    } else {
        out.push('.');
        out.push_str(&name);
    }
}

/// Builds the accessor a target node writes through.
///
/// `array_temp_vars` maps the id of an `array` node that owns a loop to the
/// temporary item variable the emitter bound for that loop iteration
/// (§4.5 step 3e). When the walk crosses an `arrayChild` whose parent array
/// has a registered temp var, the accessor restarts from that variable.
pub fn build_output_path(
    node_id: &str,
    output_root_var: &str,
    tree: &MapperTreeNode,
    array_temp_vars: &HashMap<String, String>,
) -> Option<String> {
    let mut ancestors = get_ancestors(tree, node_id);
    if ancestors.is_empty() && tree.id != node_id {
        return None;
    }
    // drop the root itself; its identity is the output root variable
    if !ancestors.is_empty() {
        ancestors.remove(0);
    }
    let node = find_node_by_id(tree, node_id)?;
    let mut chain: Vec<&MapperTreeNode> = ancestors;
    chain.push(node);

    let mut out = output_root_var.to_string();
    let mut preceding_array: Option<&MapperTreeNode> = None;
    for current in chain {
        if current.node_type == NodeType::ArrayChild {
            if let Some(array) = preceding_array {
                if array.loop_reference.is_some() {
                    if let Some(temp_var) = array_temp_vars.get(&array.id) {
                        out = temp_var.clone();
                    }
                }
            }
            preceding_array = None;
            continue;
        }
        append_segment(&mut out, current);
        preceding_array = if current.node_type == NodeType::Array { Some(current) } else { None };
    }
    Some(out)
}
