/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use crate::node::MapperTreeNode;

/// Depth-first search for the node carrying `id`, starting at `tree`.
pub fn find_node_by_id<'a>(tree: &'a MapperTreeNode, id: &str) -> Option<&'a MapperTreeNode> {
    if tree.id == id {
        return Some(tree);
    }
    tree.children.iter().find_map(|child| find_node_by_id(child, id))
}

/// Mutable counterpart of [`find_node_by_id`], used by the tree mutators.
pub fn find_node_by_id_mut<'a>(tree: &'a mut MapperTreeNode, id: &str) -> Option<&'a mut MapperTreeNode> {
    if tree.id == id {
        return Some(tree);
    }
    tree.children.iter_mut().find_map(|child| find_node_by_id_mut(child, id))
}

/// The immediate parent of the node carrying `id`, or `None` if `id` is the
/// root or is not present in `tree`.
pub fn find_parent_node<'a>(tree: &'a MapperTreeNode, id: &str) -> Option<&'a MapperTreeNode> {
    for child in &tree.children {
        if child.id == id {
            return Some(tree);
        }
        if let Some(found) = find_parent_node(child, id) {
            return Some(found);
        }
    }
    None
}

/// Ancestors of the node carrying `id`, ordered root-first and excluding the
/// node itself. Empty if `id` is the root or is not present in `tree`.
pub fn get_ancestors<'a>(tree: &'a MapperTreeNode, id: &str) -> Vec<&'a MapperTreeNode> {
    fn walk<'a>(node: &'a MapperTreeNode, target_id: &str, trail: &mut Vec<&'a MapperTreeNode>) -> bool {
        if node.id == target_id {
            return true;
        }
        for child in &node.children {
            trail.push(node);
            if walk(child, target_id, trail) {
                return true;
            }
            trail.pop();
        }
        false
    }

    let mut trail = Vec::new();
    if tree.id == id {
        return trail;
    }
    if walk(tree, id, &mut trail) {
        trail
    } else {
        Vec::new()
    }
}
