/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Script emitter (§4.5): walks a target tree and produces the body of the
//! function described in §6 ("Emitted script contract").

use std::collections::HashMap;
use std::fmt::Write as _;

use mapper_model::output_path::build_output_path;
use mapper_model::tree::path_encoder::{build_loop_source_path, build_source_access_path, ActiveLoop};
use mapper_model::value_expr::build_value_expression;
use mapper_model::{InputType, MapperState, MapperTreeNode, NodeType, SourceReference};

use crate::error::{Result, RuntimeError};

const OUTPUT_ROOT_VAR: &str = "output";
const MAX_EMIT_DEPTH: usize = 128;

struct Emitter<'a> {
    source_tree: &'a MapperTreeNode,
    debug_comment: bool,
    array_temp_vars: HashMap<String, String>,
    temp_counter: usize,
    out: String,
}

fn indent_str(indent: usize) -> String {
    "  ".repeat(indent)
}

/// Produces the full emitted script body described in §4.5 and §6.
pub fn emit_script(state: &MapperState) -> Result<String> {
    let target_tree = state.target_tree_node.as_ref().ok_or(RuntimeError::MissingTargetTree)?;
    let source_tree = state
        .source_tree_node
        .as_ref()
        .ok_or_else(|| RuntimeError::MissingSourceTree(target_tree.id.clone()))?;

    let mut body = String::new();

    body.push_str("\"use strict\";\n");

    // 1. Input parse.
    match state.source_input_type {
        InputType::Xml => body.push_str("input = parseXML(input);\n"),
        _ => body.push_str("input = JSON.parse(input);\n"),
    }

    // 2. Global variable declarations.
    for global in &state.local_context.global_variables {
        let rhs = render_literal_or_expr(&global.value, global.plain_text_value);
        let keyword = if global.is_final.unwrap_or(false) { "const" } else { "let" };
        let _ = writeln!(body, "{keyword} {} = {rhs};", global.name);
    }

    // 3. Lookup tables.
    for table in &state.local_context.lookup_tables {
        let entries: Vec<String> = table
            .entries
            .iter()
            .map(|e| format!("{:?}: {}", e.key, render_literal_or_expr(&e.value, e.plain_text_value)))
            .collect();
        let _ = writeln!(body, "const {} = {{ {} }};", table.name, entries.join(", "));
    }

    // 4. User functions, pasted verbatim.
    for function in &state.local_context.functions {
        body.push_str(function.body.trim_end());
        body.push('\n');
    }

    // 5. Prolog.
    if let Some(prolog) = state.local_context.nonblank_prolog() {
        body.push_str(prolog.trim_end());
        body.push('\n');
    }

    // 6. Top-level reference variables, deduplicated by id.
    let top_level = mapper_model::tree::flatten::flatten_references(target_tree);
    let mut seen = std::collections::HashSet::new();
    for flat in top_level.iter().filter(|r| !r.is_loop && r.loop_over_id.is_none()) {
        if !seen.insert(flat.id.clone()) {
            continue;
        }
        let reference = SourceReference {
            id: flat.id.clone(),
            source_node_id: flat.source_node_id.clone(),
            variable_name: flat.variable_name.clone(),
            text_reference: flat.text_reference,
            custom_path: flat.custom_path.clone(),
            loop_over_id: flat.loop_over_id.clone(),
            is_loop: flat.is_loop,
        };
        let path = build_source_access_path(&reference, source_tree, None);
        let _ = writeln!(body, "const {} = {};", flat.variable_name, path);
    }

    // 7. Output construction.
    let _ = writeln!(body, "const {OUTPUT_ROOT_VAR} = {{}};");
    let mut emitter = Emitter {
        source_tree,
        debug_comment: state.mapper_preferences.debug_comment,
        array_temp_vars: HashMap::new(),
        temp_counter: 0,
        out: String::new(),
    };
    emitter.generate_target_node(target_tree, target_tree, 0, None, 0)?;
    body.push_str(&emitter.out);

    // 8. Epilog.
    if let Some(epilog) = state.local_context.nonblank_epilog() {
        body.push_str(epilog.trim_end());
        body.push('\n');
    }

    // 9. Return.
    match state.target_input_type {
        InputType::Xml => body.push_str(&format!("return toXML({OUTPUT_ROOT_VAR});\n")),
        _ => body.push_str(&format!("return JSON.stringify({OUTPUT_ROOT_VAR});\n")),
    }

    Ok(body)
}

fn render_literal_or_expr(value: &str, plain_text: bool) -> String {
    if plain_text {
        format!("{value:?}")
    } else {
        value.to_string()
    }
}

/// Collects the `sourceReferences` of every descendant (not the loop node
/// itself) whose `loopOverId` matches `loop_id`, for pre-declaration at
/// loop entry (§4.5 step 3f).
fn collect_owned_references<'a>(node: &'a MapperTreeNode, loop_id: &str, out: &mut Vec<&'a SourceReference>) {
    if let Some(refs) = &node.source_references {
        for r in refs {
            if r.loop_over_id.as_deref() == Some(loop_id) {
                out.push(r);
            }
        }
    }
    for child in &node.children {
        // a nested loop's own scope declares its own owned references when
        // the walk reaches it; don't cross into a nested loop's subtree here.
        if child.loop_reference.is_some() {
            continue;
        }
        collect_owned_references(child, loop_id, out);
    }
}

impl<'a> Emitter<'a> {
    fn generate_target_node(
        &mut self,
        node: &MapperTreeNode,
        target_root: &MapperTreeNode,
        indent: usize,
        active_loop: Option<ActiveLoop>,
        depth: usize,
    ) -> Result<()> {
        if depth > MAX_EMIT_DEPTH {
            return Err(RuntimeError::MaxDepthExceeded(MAX_EMIT_DEPTH));
        }

        let pad = indent_str(indent);

        // 1. code node: inject verbatim.
        if node.node_type == NodeType::Code {
            if let Some(value) = &node.value {
                let _ = writeln!(self.out, "{pad}{value}");
            }
            return Ok(());
        }

        // 2. node condition guard.
        let mut closes = 0usize;
        if let Some(condition) = node.nonblank_node_condition() {
            let _ = writeln!(self.out, "{pad}if ({condition}) {{");
            closes += 1;
        }

        let inner_pad = indent_str(indent + closes);
        let mut child_active_loop = active_loop;
        let mut opened_loop = false;
        let mut temp_var: Option<String> = None;
        let mut array_output_path: Option<String> = None;

        // 3. loop handling.
        if let Some(loop_ref) = &node.loop_reference {
            let iterable_expr = node
                .loop_statement
                .clone()
                .unwrap_or_else(|| build_loop_source_path(loop_ref, self.source_tree));
            let iterator_var = node
                .loop_iterator
                .clone()
                .unwrap_or_else(|| format!("_{}", loop_ref.variable_name));

            let _ = writeln!(self.out, "{inner_pad}for (const {iterator_var} of {iterable_expr}) {{");
            opened_loop = true;
            closes += 1;
            let loop_body_pad = indent_str(indent + closes);

            let this_loop = ActiveLoop { loop_reference: loop_ref, iterator_var: &iterator_var };

            // d. loop conditions.
            let mut condition_closed = false;
            if let Some(conditions) = &node.loop_conditions {
                if !conditions.is_empty() {
                    let operator = node.loop_conditions_connective.js_operator();
                    let clauses: Vec<String> = conditions
                        .iter()
                        .map(|c| format!("{iterator_var}.{} {}", c.source_node_path, c.operator_and_value))
                        .collect();
                    let _ = writeln!(self.out, "{loop_body_pad}if ({}) {{", clauses.join(&format!(" {operator} ")));
                    condition_closed = true;
                }
            }
            let body_pad = if condition_closed { indent_str(indent + closes + 1) } else { loop_body_pad.clone() };

            // e. array temp item.
            if node.node_type == NodeType::Array {
                let output_path = build_output_path(&node.id, OUTPUT_ROOT_VAR, target_root, &self.array_temp_vars)
                    .unwrap_or_else(|| OUTPUT_ROOT_VAR.to_string());
                let _ = writeln!(self.out, "{body_pad}if (!Array.isArray({output_path})) {output_path} = [];");
                self.temp_counter += 1;
                let temp_name = format!("_item_{}", self.temp_counter);
                let _ = writeln!(self.out, "{body_pad}const {temp_name} = {{}};");
                self.array_temp_vars.insert(node.id.clone(), temp_name.clone());
                temp_var = Some(temp_name);
                array_output_path = Some(output_path);
            }

            // f. pre-declare owned references.
            let mut owned = Vec::new();
            collect_owned_references(node, &loop_ref.id, &mut owned);
            for reference in owned {
                let path = build_source_access_path(reference, self.source_tree, Some(this_loop));
                let _ = writeln!(self.out, "{body_pad}const {} = {};", reference.variable_name, path);
            }

            child_active_loop = Some(ActiveLoop { loop_reference: loop_ref, iterator_var: &iterator_var });

            if condition_closed {
                closes += 1;
            }
        }

        let body_pad = indent_str(indent + closes);

        // 4. custom code.
        if let Some(custom) = node.nonblank_custom_code() {
            let _ = writeln!(self.out, "{body_pad}{custom}");
        }

        // 5. value assignment.
        if !matches!(node.node_type, NodeType::Array | NodeType::ArrayChild) {
            if let Some(expr) = build_value_expression(node) {
                let output_path = build_output_path(&node.id, OUTPUT_ROOT_VAR, target_root, &self.array_temp_vars)
                    .unwrap_or_else(|| OUTPUT_ROOT_VAR.to_string());
                let _ = write!(self.out, "{body_pad}{output_path} = {};", expr.render());
                if self.debug_comment && node.has_source_references() {
                    let names: Vec<&str> = node
                        .source_references
                        .as_deref()
                        .unwrap_or_default()
                        .iter()
                        .map(|r| r.variable_name.as_str())
                        .collect();
                    let _ = write!(self.out, " // {}", names.join(", "));
                }
                self.out.push('\n');
            }
        }

        // 6. recurse into children.
        for child in &node.children {
            self.generate_target_node(child, target_root, indent + closes, child_active_loop, depth + 1)?;
        }

        // 7. push temp item if non-empty.
        if let (Some(temp_name), Some(array_path)) = (&temp_var, &array_output_path) {
            let _ = writeln!(
                self.out,
                "{body_pad}if (Object.keys({temp_name}).length > 0) {{ {array_path}.push({temp_name}); }}"
            );
        }
        if opened_loop {
            self.array_temp_vars.remove(&node.id);
        }

        // 8. close blocks, innermost first.
        for level in (0..closes).rev() {
            let close_pad = indent_str(indent + level);
            let _ = writeln!(self.out, "{close_pad}}}");
        }

        Ok(())
    }
}
