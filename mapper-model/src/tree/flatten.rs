/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Rebuilds the denormalised [`FlatReference`] list from a target tree.
//!
//! `MapperState::references` is persisted for older readers but is never
//! the source of truth: anything that needs it calls [`flatten_references`]
//! fresh, since a stale copy would silently diverge from the tree after an
//! edit (§3, §6).

use crate::node::MapperTreeNode;
use crate::reference::FlatReference;

pub fn flatten_references(target_tree: &MapperTreeNode) -> Vec<FlatReference> {
    let mut out = Vec::new();
    collect(target_tree, &mut out);
    out
}

fn collect(node: &MapperTreeNode, out: &mut Vec<FlatReference>) {
    if let Some(refs) = &node.source_references {
        for reference in refs {
            out.push(FlatReference {
                id: reference.id.clone(),
                source_node_id: reference.source_node_id.clone(),
                target_node_id: node.id.clone(),
                variable_name: reference.variable_name.clone(),
                text_reference: reference.text_reference,
                custom_path: reference.custom_path.clone(),
                loop_over_id: reference.loop_over_id.clone(),
                is_loop: reference.is_loop,
            });
        }
    }
    if let Some(loop_ref) = &node.loop_reference {
        out.push(FlatReference {
            id: loop_ref.id.clone(),
            source_node_id: loop_ref.source_node_id.clone(),
            target_node_id: node.id.clone(),
            variable_name: loop_ref.variable_name.clone(),
            text_reference: loop_ref.text_reference,
            custom_path: loop_ref.custom_path.clone(),
            loop_over_id: loop_ref.loop_over_id.clone(),
            is_loop: loop_ref.is_loop,
        });
    }
    for child in &node.children {
        collect(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;
    use crate::reference::SourceReference;

    #[test]
    fn collects_scalar_and_loop_references_across_the_tree() {
        let mut root = MapperTreeNode::new("root", "root", NodeType::Element);
        let mut orders = MapperTreeNode::new("orders", "orders", NodeType::Array);
        orders.loop_reference = Some(SourceReference::new_loop("l1", "src_orders", "_o"));

        let mut name = MapperTreeNode::new("name", "name", NodeType::Element);
        name.source_references = Some(vec![SourceReference::new_scalar("r1", "src_name", "_n")]);
        orders.children.push(name);
        root.children.push(orders);

        let refs = flatten_references(&root);
        assert_eq!(refs.len(), 2);
        assert!(refs.iter().any(|r| r.id == "l1" && r.target_node_id == "orders" && r.is_loop));
        assert!(refs.iter().any(|r| r.id == "r1" && r.target_node_id == "name" && !r.is_loop));
    }

    #[test]
    fn empty_tree_yields_no_references() {
        let root = MapperTreeNode::new("root", "root", NodeType::Element);
        assert!(flatten_references(&root).is_empty());
    }
}
