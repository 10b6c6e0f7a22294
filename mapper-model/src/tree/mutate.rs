/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Immutable tree mutators (§4.1).
//!
//! Each function returns a new root with structural sharing: only the
//! ancestors of the touched node are cloned, every other subtree is shared
//! by clone-on-write at the `Vec`/`String` level that `MapperTreeNode`
//! already gives us by deriving `Clone`. Unaffected subtrees therefore keep
//! their node ids across an edit — callers diff on id, not identity.

use uuid::Uuid;

use crate::error::{ModelError, Result};
use crate::node::MapperTreeNode;

fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

/// Replaces the node carrying `target_id` with the result of `f`, returning
/// a new tree. `Err(ModelError::NodeNotFound)` if `target_id` is absent.
pub fn update_node(
    tree: &MapperTreeNode,
    target_id: &str,
    f: impl FnOnce(&MapperTreeNode) -> MapperTreeNode,
) -> Result<MapperTreeNode> {
    fn walk(node: &MapperTreeNode, target_id: &str, f: &mut Option<impl FnOnce(&MapperTreeNode) -> MapperTreeNode>, found: &mut bool) -> MapperTreeNode {
        if node.id == target_id {
            *found = true;
            return f.take().expect("update_node visits its target at most once")(node);
        }
        let mut clone = node.clone();
        clone.children = node.children.iter().map(|c| walk(c, target_id, f, found)).collect();
        clone
    }

    let mut found = false;
    let mut f = Some(f);
    let result = walk(tree, target_id, &mut f, &mut found);
    if found {
        Ok(result)
    } else {
        Err(ModelError::NodeNotFound(target_id.to_string()))
    }
}

/// Returns a new tree with the node carrying `target_id` (and its subtree)
/// removed. `Err(ModelError::NodeNotFound)` if `target_id` is absent or is
/// the tree root (the root cannot be removed from itself).
pub fn remove_node(tree: &MapperTreeNode, target_id: &str) -> Result<MapperTreeNode> {
    if tree.id == target_id {
        return Err(ModelError::NodeNotFound(target_id.to_string()));
    }

    fn walk(node: &MapperTreeNode, target_id: &str, found: &mut bool) -> MapperTreeNode {
        let mut clone = node.clone();
        clone.children = node
            .children
            .iter()
            .filter(|c| {
                if c.id == target_id {
                    *found = true;
                    false
                } else {
                    true
                }
            })
            .map(|c| walk(c, target_id, found))
            .collect();
        clone
    }

    let mut found = false;
    let result = walk(tree, target_id, &mut found);
    if found {
        Ok(result)
    } else {
        Err(ModelError::NodeNotFound(target_id.to_string()))
    }
}

/// Appends `child` to the node carrying `parent_id`, returning a new tree.
pub fn insert_child(tree: &MapperTreeNode, parent_id: &str, child: MapperTreeNode) -> Result<MapperTreeNode> {
    update_node(tree, parent_id, move |parent| {
        let mut parent = parent.clone();
        parent.children.push(child);
        parent
    })
}

/// Inserts `sibling` immediately after `after_id` under its parent.
pub fn insert_sibling(tree: &MapperTreeNode, after_id: &str, sibling: MapperTreeNode) -> Result<MapperTreeNode> {
    fn walk(node: &MapperTreeNode, after_id: &str, sibling: &MapperTreeNode, found: &mut bool) -> MapperTreeNode {
        let mut clone = node.clone();
        let mut children = Vec::with_capacity(node.children.len() + 1);
        for c in &node.children {
            children.push(walk(c, after_id, sibling, found));
            if c.id == after_id {
                *found = true;
                children.push(sibling.clone());
            }
        }
        clone.children = children;
        clone
    }

    let mut found = false;
    let result = walk(tree, after_id, &sibling, &mut found);
    if found {
        Ok(result)
    } else {
        Err(ModelError::NodeNotFound(after_id.to_string()))
    }
}

fn move_within_siblings(tree: &MapperTreeNode, target_id: &str, offset: isize) -> Result<MapperTreeNode> {
    fn walk(node: &MapperTreeNode, target_id: &str, offset: isize, found: &mut bool) -> MapperTreeNode {
        let mut clone = node.clone();
        if let Some(pos) = node.children.iter().position(|c| c.id == target_id) {
            *found = true;
            let new_pos = (pos as isize + offset).clamp(0, node.children.len() as isize - 1) as usize;
            let mut children = node.children.clone();
            let moved = children.remove(pos);
            children.insert(new_pos, moved);
            clone.children = children;
        } else {
            clone.children = node.children.iter().map(|c| walk(c, target_id, offset, found)).collect();
        }
        clone
    }

    let mut found = false;
    let result = walk(tree, target_id, offset, &mut found);
    if found {
        Ok(result)
    } else {
        Err(ModelError::NodeNotFound(target_id.to_string()))
    }
}

pub fn move_node_up(tree: &MapperTreeNode, target_id: &str) -> Result<MapperTreeNode> {
    move_within_siblings(tree, target_id, -1)
}

pub fn move_node_down(tree: &MapperTreeNode, target_id: &str) -> Result<MapperTreeNode> {
    move_within_siblings(tree, target_id, 1)
}

/// Wraps `child_ids` (all immediate children of `parent_id`, in whichever
/// order they appear) in a fresh intermediate `Element` node named `group_name`.
pub fn group_nodes(
    tree: &MapperTreeNode,
    parent_id: &str,
    child_ids: &[String],
    group_name: &str,
) -> Result<MapperTreeNode> {
    use crate::node::NodeType;

    update_node(tree, parent_id, |parent| {
        let mut parent = parent.clone();
        let (grouped, rest): (Vec<_>, Vec<_>) =
            parent.children.into_iter().partition(|c| child_ids.contains(&c.id));
        let mut group = MapperTreeNode::new(fresh_id(), group_name, NodeType::Element);
        group.children = grouped;
        let mut children = rest;
        children.push(group);
        parent.children = children;
        parent
    })
}

/// Deep-copies the subtree rooted at `source_id`, minting fresh ids for
/// every node in the copy (§4.1 "New node identities on paste/deep-copy").
pub fn deep_copy_node(tree: &MapperTreeNode, source_id: &str) -> Result<MapperTreeNode> {
    use crate::tree::search::find_node_by_id;

    fn regenerate(node: &MapperTreeNode) -> MapperTreeNode {
        let mut clone = node.clone();
        clone.id = fresh_id();
        clone.children = node.children.iter().map(regenerate).collect();
        clone
    }

    find_node_by_id(tree, source_id)
        .map(regenerate)
        .ok_or_else(|| ModelError::NodeNotFound(source_id.to_string()))
}

/// Clones the subtree rooted at `source_id` verbatim, preserving every id
/// (used by undo/redo snapshots, §3).
pub fn clone_node(tree: &MapperTreeNode, source_id: &str) -> Result<MapperTreeNode> {
    use crate::tree::search::find_node_by_id;

    find_node_by_id(tree, source_id)
        .cloned()
        .ok_or_else(|| ModelError::NodeNotFound(source_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;

    fn sample() -> MapperTreeNode {
        let mut root = MapperTreeNode::new("root", "root", NodeType::Element);
        root.children.push(MapperTreeNode::new("a", "a", NodeType::Element));
        root.children.push(MapperTreeNode::new("b", "b", NodeType::Element));
        root
    }

    #[test]
    fn update_replaces_only_the_target_node() {
        let tree = sample();
        let updated = update_node(&tree, "a", |n| {
            let mut n = n.clone();
            n.value = Some("x".into());
            n
        })
        .unwrap();
        assert_eq!(updated.children[0].value.as_deref(), Some("x"));
        assert_eq!(updated.children[1].id, "b");
    }

    #[test]
    fn update_missing_node_errors() {
        let tree = sample();
        assert!(update_node(&tree, "missing", |n| n.clone()).is_err());
    }

    #[test]
    fn remove_drops_node_and_subtree() {
        let tree = sample();
        let updated = remove_node(&tree, "a").unwrap();
        assert_eq!(updated.children.len(), 1);
        assert_eq!(updated.children[0].id, "b");
    }

    #[test]
    fn root_cannot_remove_itself() {
        let tree = sample();
        assert!(remove_node(&tree, "root").is_err());
    }

    #[test]
    fn insert_child_appends_under_parent() {
        let tree = sample();
        let child = MapperTreeNode::new("c", "c", NodeType::Element);
        let updated = insert_child(&tree, "root", child).unwrap();
        assert_eq!(updated.children.len(), 3);
        assert_eq!(updated.children[2].id, "c");
    }

    #[test]
    fn insert_sibling_lands_immediately_after() {
        let tree = sample();
        let sibling = MapperTreeNode::new("a2", "a2", NodeType::Element);
        let updated = insert_sibling(&tree, "a", sibling).unwrap();
        let ids: Vec<&str> = updated.children.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "a2", "b"]);
    }

    #[test]
    fn move_up_and_down_reorder_siblings() {
        let tree = sample();
        let moved = move_node_down(&tree, "a").unwrap();
        let ids: Vec<&str> = moved.children.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        let moved_back = move_node_up(&moved, "a").unwrap();
        let ids: Vec<&str> = moved_back.children.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn group_nodes_wraps_selected_children() {
        let tree = sample();
        let grouped = group_nodes(&tree, "root", &["a".to_string(), "b".to_string()], "group").unwrap();
        assert_eq!(grouped.children.len(), 1);
        assert_eq!(grouped.children[0].name, "group");
        assert_eq!(grouped.children[0].children.len(), 2);
    }

    #[test]
    fn deep_copy_regenerates_every_id_but_clone_preserves_them() {
        let tree = sample();
        let copy = deep_copy_node(&tree, "a").unwrap();
        assert_ne!(copy.id, "a");

        let cloned = clone_node(&tree, "a").unwrap();
        assert_eq!(cloned.id, "a");
    }
}
