/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Tree merge strategies (§4.1 `mergeTrees`).

use crate::node::MapperTreeNode;

/// How an incoming tree is reconciled with the tree already in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMethod {
    /// Adopt `incoming` wholesale.
    Replace,
    /// Adopt `incoming` wholesale; callers additionally clear references
    /// and context (not this function's concern — it behaves like
    /// [`ApplyMethod::Replace`]).
    Reset,
    /// Add children present in `incoming` but absent from `existing`,
    /// recursing into name-matched children. Never removes anything.
    AddOnly,
    /// Remove children absent from `incoming`, recursing into matches.
    /// Never adds anything.
    DeleteOnly,
    /// `AddOnly` followed by `DeleteOnly`.
    Merge,
}

/// Reconciles `existing` with `incoming` per `method`.
pub fn merge_trees(existing: &MapperTreeNode, incoming: &MapperTreeNode, method: ApplyMethod) -> MapperTreeNode {
    match method {
        ApplyMethod::Replace | ApplyMethod::Reset => incoming.clone(),
        ApplyMethod::AddOnly => add_only(existing, incoming),
        ApplyMethod::DeleteOnly => delete_only(existing, incoming),
        ApplyMethod::Merge => delete_only(&add_only(existing, incoming), incoming),
    }
}

fn add_only(existing: &MapperTreeNode, incoming: &MapperTreeNode) -> MapperTreeNode {
    let mut result = existing.clone();
    for incoming_child in &incoming.children {
        match result.children.iter().position(|c| c.name == incoming_child.name) {
            Some(pos) => {
                let merged = add_only(&result.children[pos], incoming_child);
                result.children[pos] = merged;
            }
            None => result.children.push(incoming_child.clone()),
        }
    }
    result
}

fn delete_only(existing: &MapperTreeNode, incoming: &MapperTreeNode) -> MapperTreeNode {
    let mut result = existing.clone();
    result.children.retain(|c| incoming.children.iter().any(|ic| ic.name == c.name));
    for child in &mut result.children {
        if let Some(incoming_child) = incoming.children.iter().find(|ic| ic.name == child.name) {
            *child = delete_only(child, incoming_child);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;

    fn leaf(id: &str, name: &str) -> MapperTreeNode {
        MapperTreeNode::new(id, name, NodeType::Element)
    }

    #[test]
    fn replace_and_reset_adopt_incoming_wholesale() {
        let existing = leaf("e", "existing");
        let incoming = leaf("i", "incoming");
        assert_eq!(merge_trees(&existing, &incoming, ApplyMethod::Replace).id, "i");
        assert_eq!(merge_trees(&existing, &incoming, ApplyMethod::Reset).id, "i");
    }

    #[test]
    fn add_only_adds_new_children_without_touching_existing_only_ones() {
        let mut existing = leaf("root", "root");
        existing.children.push(leaf("a", "a"));

        let mut incoming = leaf("root", "root");
        incoming.children.push(leaf("b", "b"));

        let merged = merge_trees(&existing, &incoming, ApplyMethod::AddOnly);
        let names: Vec<&str> = merged.children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn delete_only_removes_children_absent_from_incoming() {
        let mut existing = leaf("root", "root");
        existing.children.push(leaf("a", "a"));
        existing.children.push(leaf("b", "b"));

        let incoming = leaf("root", "root");

        let merged = merge_trees(&existing, &incoming, ApplyMethod::DeleteOnly);
        assert!(merged.children.is_empty());
    }

    #[test]
    fn merge_adds_and_removes_in_one_pass() {
        let mut existing = leaf("root", "root");
        existing.children.push(leaf("a", "a"));

        let mut incoming = leaf("root", "root");
        incoming.children.push(leaf("b", "b"));

        let merged = merge_trees(&existing, &incoming, ApplyMethod::Merge);
        let names: Vec<&str> = merged.children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["b"]);
    }

    #[test]
    fn add_only_recurses_into_name_matched_children() {
        let mut existing = leaf("root", "root");
        let mut existing_a = leaf("a", "a");
        existing_a.children.push(leaf("x", "x"));
        existing.children.push(existing_a);

        let mut incoming = leaf("root", "root");
        let mut incoming_a = leaf("a2", "a");
        incoming_a.children.push(leaf("y", "y"));
        incoming.children.push(incoming_a);

        let merged = merge_trees(&existing, &incoming, ApplyMethod::AddOnly);
        assert_eq!(merged.children.len(), 1);
        let names: Vec<&str> = merged.children[0].children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
    }
}
