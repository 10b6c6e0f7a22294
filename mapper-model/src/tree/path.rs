/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use crate::node::{MapperTreeNode, NodeType};

/// Placeholder name normalised array children carry, per §9 "arrayChild
/// normalisation": incoming trees may present concrete indexed children
/// (`[0]`, `[1]`, ...) which are folded into one `arrayChild` named `[]`
/// whose children are the union of fields observed.
pub const ARRAY_CHILD_PLACEHOLDER: &str = "[]";

/// The path segment a node contributes, or `None` for nodes that
/// contribute nothing (§4.1).
pub fn get_path_fragment(node: &MapperTreeNode) -> Option<String> {
    match node.node_type {
        NodeType::ArrayChild => None,
        NodeType::Attribute => Some(format!("@{}", node.name)),
        _ => Some(node.name.clone()),
    }
}

/// Dot-joined sequence of fragments from the root to `node_id`, excluding
/// `None` fragments. `arrayChild` ancestors therefore simply vanish from
/// the joined string; callers that need to recognise the placeholder (the
/// path encoder) walk the raw segment list via [`get_full_path_segments`]
/// instead.
pub fn get_full_path(node_id: &str, tree: &MapperTreeNode) -> Option<String> {
    let segments = get_full_path_segments(node_id, tree)?;
    Some(
        segments
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("."),
    )
}

/// Like [`get_full_path`] but keeps the raw `Option<String>` per ancestor
/// (including the synthetic root and any `arrayChild` placeholders) so the
/// path encoder can reason about which segments are placeholders rather
/// than re-deriving that from the joined string.
pub fn get_full_path_segments(node_id: &str, tree: &MapperTreeNode) -> Option<Vec<Option<String>>> {
    fn walk(node: &MapperTreeNode, target_id: &str, trail: &mut Vec<Option<String>>) -> bool {
        trail.push(get_path_fragment(node));
        if node.id == target_id {
            return true;
        }
        for child in &node.children {
            if walk(child, target_id, trail) {
                return true;
            }
        }
        trail.pop();
        false
    }

    let mut trail = Vec::new();
    if walk(tree, node_id, &mut trail) {
        Some(trail)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str, name: &str, t: NodeType) -> MapperTreeNode {
        MapperTreeNode::new(id, name, t)
    }

    #[test]
    fn array_child_contributes_no_fragment() {
        let node = leaf("1", "[]", NodeType::ArrayChild);
        assert_eq!(get_path_fragment(&node), None);
    }

    #[test]
    fn attribute_contributes_at_prefixed_fragment() {
        let node = leaf("1", "id", NodeType::Attribute);
        assert_eq!(get_path_fragment(&node), Some("@id".to_string()));
    }

    #[test]
    fn full_path_joins_and_drops_array_child_segments() {
        let mut root = leaf("root", "root", NodeType::Element);
        let mut orders = leaf("orders", "orders", NodeType::Array);
        let mut child = leaf("child", ARRAY_CHILD_PLACEHOLDER, NodeType::ArrayChild);
        let id_leaf = leaf("id", "id", NodeType::Element);
        child.children.push(id_leaf);
        orders.children.push(child);
        root.children.push(orders);

        // includes the synthetic root fragment; the path encoder is what
        // drops it (§4.2), not `get_full_path` itself.
        let path = get_full_path("id", &root).unwrap();
        assert_eq!(path, "root.orders.id");
    }
}
