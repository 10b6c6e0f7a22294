/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Converts a node path into a data-accessor expression for the target
//! dialect (§4.2).

use crate::node::MapperTreeNode;
use crate::reference::SourceReference;
use crate::tree::path::{get_full_path_segments, ARRAY_CHILD_PLACEHOLDER};
use crate::tree::search::find_node_by_id;

/// The loop the emitter is currently inside: the owning [`SourceReference`]
/// (`isLoop = true`) and the variable name it iterates are bound to.
#[derive(Debug, Clone, Copy)]
pub struct ActiveLoop<'a> {
    pub loop_reference: &'a SourceReference,
    pub iterator_var: &'a str,
}

impl<'a> ActiveLoop<'a> {
    pub fn id(&self) -> &str {
        &self.loop_reference.id
    }
}

/// The conventional variable the emitter binds the parsed input document to.
pub const INPUT_ROOT_VAR: &str = "input";

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn is_array_child_placeholder(segment: &str) -> bool {
    if segment == ARRAY_CHILD_PLACEHOLDER {
        return true;
    }
    // indexed forms that survive normalisation, e.g. "[0]", "[12]"
    segment.starts_with('[')
        && segment.ends_with(']')
        && segment.len() > 2
        && segment[1..segment.len() - 1].chars().all(|c| c.is_ascii_digit())
}

/// Encodes a list of raw path segments (as produced by
/// [`path_segments_for`], without the leading synthetic root segment)
/// against a base accessor expression.
fn encode_segments(base: &str, segments: &[String]) -> String {
    let mut out = base.to_string();
    for segment in segments {
        if is_array_child_placeholder(segment) {
            continue;
        }
        if segment.starts_with('@') || !is_identifier(segment) {
            out.push_str(&format!("[{:?}]", segment));
        } else {
            out.push('.');
            out.push_str(segment);
        }
    }
    out
}

/// Raw path segments for `node_id`, with the synthetic root fragment
/// dropped (§4.2 "Drop the synthetic leading root segment").
fn path_segments_for(node_id: &str, tree: &MapperTreeNode) -> Vec<String> {
    let mut segments = get_full_path_segments(node_id, tree).unwrap_or_default();
    if !segments.is_empty() {
        segments.remove(0);
    }
    segments.into_iter().flatten().collect()
}

/// Path segments for the source array a loop reference iterates over.
/// `path_segments_for` already resolves an `arrayChild` node to its parent
/// array's segments, since [`get_path_fragment`](crate::tree::path::get_path_fragment)
/// yields no fragment of its own for that node kind (§4.2).
fn loop_source_segments(loop_ref: &SourceReference, source_tree: &MapperTreeNode) -> Vec<String> {
    path_segments_for(&loop_ref.source_node_id, source_tree)
}

/// Builds the accessor expression for the array a loop reference iterates
/// over (`buildLoopSourcePath`).
pub fn build_loop_source_path(loop_ref: &SourceReference, source_tree: &MapperTreeNode) -> String {
    if let Some(custom) = &loop_ref.custom_path {
        return custom.clone();
    }
    if find_node_by_id(source_tree, &loop_ref.source_node_id).is_none() {
        return "undefined".to_string();
    }
    encode_segments(INPUT_ROOT_VAR, &loop_source_segments(loop_ref, source_tree))
}

/// Builds the accessor expression for a reference, either relative to the
/// input root or, when `active_loop` is given and owns this reference
/// (`ref.loopOverId == activeLoop.id`), relative to the loop's iterator
/// variable (`buildSourceAccessPath`, §4.2). A reference whose
/// `sourceNodeId` can't be found in the source tree emits the literal
/// `undefined` rather than a bare root or iterator variable (§7, §9).
pub fn build_source_access_path(
    reference: &SourceReference,
    source_tree: &MapperTreeNode,
    active_loop: Option<ActiveLoop>,
) -> String {
    if let Some(custom) = &reference.custom_path {
        return custom.clone();
    }
    if find_node_by_id(source_tree, &reference.source_node_id).is_none() {
        return "undefined".to_string();
    }

    let owning_loop = active_loop.filter(|active| reference.loop_over_id.as_deref() == Some(active.id()));

    match owning_loop {
        Some(active) => {
            let ref_segments = path_segments_for(&reference.source_node_id, source_tree);
            let loop_segments = loop_source_segments(active.loop_reference, source_tree);

            let mut remainder: Vec<String> = if ref_segments.starts_with(loop_segments.as_slice()) {
                ref_segments[loop_segments.len()..].to_vec()
            } else {
                ref_segments
            };
            if remainder.first().is_some_and(|s| is_array_child_placeholder(s)) {
                remainder.remove(0);
            }

            if remainder.is_empty() {
                active.iterator_var.to_string()
            } else {
                encode_segments(active.iterator_var, &remainder)
            }
        }
        None => {
            let segments = path_segments_for(&reference.source_node_id, source_tree);
            encode_segments(INPUT_ROOT_VAR, &segments)
        }
    }
}
