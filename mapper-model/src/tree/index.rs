/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use std::collections::HashMap;

use crate::node::MapperTreeNode;

/// An id-to-node lookup table built once per tree walk, so operations that
/// touch many nodes (the emitter, the flattener, the migrator) don't pay a
/// depth-first search per lookup.
///
/// Borrows from the tree it indexes; rebuild after any mutation.
#[derive(Debug, Default)]
pub struct NodeIndex<'a> {
    by_id: HashMap<&'a str, &'a MapperTreeNode>,
    parent_of: HashMap<&'a str, &'a str>,
}

impl<'a> NodeIndex<'a> {
    pub fn build(tree: &'a MapperTreeNode) -> Self {
        let mut index = NodeIndex { by_id: HashMap::new(), parent_of: HashMap::new() };
        index.walk(tree, None);
        index
    }

    fn walk(&mut self, node: &'a MapperTreeNode, parent_id: Option<&'a str>) {
        self.by_id.insert(&node.id, node);
        if let Some(parent_id) = parent_id {
            self.parent_of.insert(&node.id, parent_id);
        }
        for child in &node.children {
            self.walk(child, Some(&node.id));
        }
    }

    pub fn get(&self, id: &str) -> Option<&'a MapperTreeNode> {
        self.by_id.get(id).copied()
    }

    pub fn parent_id(&self, id: &str) -> Option<&'a str> {
        self.parent_of.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
