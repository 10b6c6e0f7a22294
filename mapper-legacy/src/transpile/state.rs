/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Whole-state transpile walk (§4.7 `transpileMapperState`).

use mapper_model::context::MapperContext;
use mapper_model::{MapperState, MapperTreeNode};
use serde::{Deserialize, Serialize};

use super::diagnostics::Warning;
use super::pipeline::transpile_groovy_to_js;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateTranspileReport {
    pub total_fields: usize,
    pub translated_fields: usize,
    pub warnings: Vec<Warning>,
    pub state: MapperState,
}

/// Deep-clones `state`, transpiles every candidate field on the cloned
/// target tree and local context, and returns the translated clone
/// alongside aggregate counts. The original `state` is never mutated.
pub fn transpile_mapper_state(state: &MapperState) -> StateTranspileReport {
    let mut new_state = state.clone();
    let mut total = 0;
    let mut translated = 0;
    let mut warnings = Vec::new();

    if let Some(root) = new_state.target_tree_node.as_mut() {
        walk_node(root, &mut total, &mut translated, &mut warnings);
    }
    transpile_context(&mut new_state.local_context, &mut total, &mut translated, &mut warnings);

    StateTranspileReport { total_fields: total, translated_fields: translated, warnings, state: new_state }
}

fn transpile_field(field: &mut String, total: &mut usize, translated: &mut usize, warnings: &mut Vec<Warning>) {
    *total += 1;
    let result = transpile_groovy_to_js(field);
    if result.code != *field {
        *translated += 1;
    }
    warnings.extend(result.warnings);
    *field = result.code;
}

fn walk_node(node: &mut MapperTreeNode, total: &mut usize, translated: &mut usize, warnings: &mut Vec<Warning>) {
    if !node.plain_text_value {
        if let Some(value) = node.value.as_mut() {
            transpile_field(value, total, translated, warnings);
        }
    }
    if let Some(code) = node.custom_code.as_mut() {
        transpile_field(code, total, translated, warnings);
    }
    if let Some(statement) = node.loop_statement.as_mut() {
        transpile_field(statement, total, translated, warnings);
    }
    if let Some(condition) = node.node_condition.as_mut() {
        transpile_field(&mut condition.condition, total, translated, warnings);
    }
    if let Some(conditions) = node.loop_conditions.as_mut() {
        for condition in conditions.iter_mut() {
            transpile_field(&mut condition.operator_and_value, total, translated, warnings);
        }
    }
    for child in node.children.iter_mut() {
        walk_node(child, total, translated, warnings);
    }
}

fn transpile_context(
    context: &mut MapperContext,
    total: &mut usize,
    translated: &mut usize,
    warnings: &mut Vec<Warning>,
) {
    for function in context.functions.iter_mut() {
        transpile_field(&mut function.body, total, translated, warnings);
    }
    for global in context.global_variables.iter_mut() {
        if !global.plain_text_value {
            transpile_field(&mut global.value, total, translated, warnings);
        }
    }
    if let Some(prolog) = context.prolog_script.as_mut() {
        transpile_field(prolog, total, translated, warnings);
    }
    if let Some(epilog) = context.epilog_script.as_mut() {
        transpile_field(epilog, total, translated, warnings);
    }
}

#[cfg(test)]
mod tests {
    use mapper_model::context::{GlobalVariable, UserFunction};
    use mapper_model::node::{NodeCondition, NodeType};
    use mapper_model::state::InputType;

    use super::*;

    #[test]
    fn transpiles_node_value_and_custom_code_without_mutating_original() {
        let mut state = MapperState::new("s1");
        state.source_input_type = InputType::Json;
        state.target_input_type = InputType::Json;

        let mut root = MapperTreeNode::new("root", "root", NodeType::Element);
        let mut field = MapperTreeNode::new("f", "f", NodeType::Element);
        field.value = Some("def x = 1".to_string());
        field.custom_code = Some("println(x)".to_string());
        root.children.push(field);
        state.target_tree_node = Some(root);

        let report = transpile_mapper_state(&state);
        assert_eq!(report.total_fields, 2);
        assert_eq!(report.translated_fields, 2);

        let translated_field = &report.state.target_tree_node.unwrap().children[0];
        assert_eq!(translated_field.value.as_deref(), Some("let x = 1"));
        assert_eq!(translated_field.custom_code.as_deref(), Some("console.log(x)"));

        let original_field = &state.target_tree_node.unwrap().children[0];
        assert_eq!(original_field.value.as_deref(), Some("def x = 1"));
    }

    #[test]
    fn plain_text_value_is_left_untouched() {
        let mut state = MapperState::new("s1");
        let mut root = MapperTreeNode::new("root", "root", NodeType::Element);
        let mut field = MapperTreeNode::new("f", "f", NodeType::Element);
        field.value = Some("def x = 1".to_string());
        field.plain_text_value = true;
        root.children.push(field);
        state.target_tree_node = Some(root);

        let report = transpile_mapper_state(&state);
        assert_eq!(report.total_fields, 0);
        assert_eq!(report.state.target_tree_node.unwrap().children[0].value.as_deref(), Some("def x = 1"));
    }

    #[test]
    fn transpiles_node_condition_loop_conditions_and_context() {
        let mut state = MapperState::new("s1");
        let mut root = MapperTreeNode::new("root", "root", NodeType::Element);
        root.node_condition = Some(NodeCondition { condition: "def ok = true".to_string() });
        state.target_tree_node = Some(root);
        state.local_context.functions.push(UserFunction { name: "f".to_string(), body: "def y = 2".to_string() });
        state.local_context.global_variables.push(GlobalVariable {
            name: "g".to_string(),
            value: "def g = 3".to_string(),
            plain_text_value: false,
            is_final: None,
        });
        state.local_context.prolog_script = Some("println('start')".to_string());

        let report = transpile_mapper_state(&state);
        assert_eq!(report.state.target_tree_node.unwrap().node_condition.unwrap().condition, "let ok = true");
        assert_eq!(report.state.local_context.functions[0].body, "let y = 2");
        assert_eq!(report.state.local_context.global_variables[0].value, "let g = 3");
        assert_eq!(report.state.local_context.prolog_script.as_deref(), Some("console.log('start')"));
    }
}
