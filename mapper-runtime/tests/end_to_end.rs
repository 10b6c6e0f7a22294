/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use mapper_model::node::NodeType;
use mapper_model::reference::{LoopCondition, SourceReference};
use mapper_model::state::{InputType, MapperState};
use mapper_model::MapperTreeNode;
use mapper_runtime::executor::ExecuteOptions;
use mapper_runtime::{emit_script, execute_script};

fn base_state() -> MapperState {
    let mut state = MapperState::new("scenario");
    state.source_input_type = InputType::Json;
    state.target_input_type = InputType::Json;
    state
}

#[test]
fn simple_field_mapping() {
    let mut state = base_state();

    let mut source = MapperTreeNode::new("root", "root", NodeType::Element);
    let mut order = MapperTreeNode::new("order", "order", NodeType::Element);
    order.children.push(MapperTreeNode::new("id", "id", NodeType::Element));
    source.children.push(order);
    state.source_tree_node = Some(source);

    let mut target = MapperTreeNode::new("root", "root", NodeType::Element);
    let mut order_id = MapperTreeNode::new("orderId", "orderId", NodeType::Element);
    order_id.source_references = Some(vec![SourceReference::new_scalar("r1", "id", "_id")]);
    target.children.push(order_id);
    state.target_tree_node = Some(target);

    let script = emit_script(&state).expect("script emits");
    assert!(script.contains("const _id = input.order.id;"));
    assert!(script.contains("output.orderId = _id;"));

    let result = execute_script(&script, r#"{"order":{"id":"101"}}"#, &state.local_context, ExecuteOptions::default());
    assert_eq!(result.error, None);
    assert_eq!(result.output, r#"{"orderId":"101"}"#);
}

fn build_orders_source() -> MapperTreeNode {
    let mut root = MapperTreeNode::new("root", "root", NodeType::Element);
    let mut orders = MapperTreeNode::new("orders", "orders", NodeType::Array);
    let mut child = MapperTreeNode::new("order_child", "[]", NodeType::ArrayChild);
    child.children.push(MapperTreeNode::new("id", "id", NodeType::Element));
    child.children.push(MapperTreeNode::new("status", "status", NodeType::Element));
    orders.children.push(child);
    root.children.push(orders);
    root
}

fn build_items_target(with_condition: bool) -> MapperTreeNode {
    let loop_ref = SourceReference::new_loop("l1", "orders", "orders");

    let mut root = MapperTreeNode::new("root", "root", NodeType::Element);
    let mut items = MapperTreeNode::new("items", "items", NodeType::Array);
    items.loop_reference = Some(loop_ref);
    items.loop_iterator = Some("_o".to_string());
    if with_condition {
        items.loop_conditions = Some(vec![LoopCondition {
            source_node_path: "status".to_string(),
            operator_and_value: "== 'ACTIVE'".to_string(),
        }]);
    }

    let mut child = MapperTreeNode::new("item_child", "[]", NodeType::ArrayChild);
    let mut order_id = MapperTreeNode::new("orderId", "orderId", NodeType::Element);
    let mut order_id_ref = SourceReference::new_scalar("r1", "id", "_id");
    order_id_ref.loop_over_id = Some("l1".to_string());
    order_id.source_references = Some(vec![order_id_ref]);
    child.children.push(order_id);
    items.children.push(child);
    root.children.push(items);
    root
}

#[test]
fn array_to_array_with_loop_scoped_reference() {
    let mut state = base_state();
    state.source_tree_node = Some(build_orders_source());
    state.target_tree_node = Some(build_items_target(false));

    let script = emit_script(&state).expect("script emits");
    assert!(script.contains("for (const _o of input.orders) {"));
    assert!(script.contains("const _item_1 = {};"));
    assert!(script.contains("_item_1.orderId = _id;"));
    assert!(script.contains("items.push(_item_1)"));

    let input = r#"{"orders":[{"id":1,"status":"ACTIVE"},{"id":2,"status":"X"}]}"#;
    let result = execute_script(&script, input, &state.local_context, ExecuteOptions::default());
    assert_eq!(result.error, None);
    assert_eq!(result.output, r#"{"items":[{"orderId":1},{"orderId":2}]}"#);
}

#[test]
fn loop_condition_filters_iterations() {
    let mut state = base_state();
    state.source_tree_node = Some(build_orders_source());
    state.target_tree_node = Some(build_items_target(true));

    let script = emit_script(&state).expect("script emits");
    assert!(script.contains("if (_o.status == 'ACTIVE')"));

    let input = r#"{"orders":[{"id":1,"status":"ACTIVE"},{"id":2,"status":"X"}]}"#;
    let result = execute_script(&script, input, &state.local_context, ExecuteOptions::default());
    assert_eq!(result.error, None);
    assert_eq!(result.output, r#"{"items":[{"orderId":1}]}"#);
}

#[test]
fn empty_state_round_trips_through_empty_object() {
    let mut state = base_state();
    state.source_tree_node = Some(MapperTreeNode::new("root", "root", NodeType::Element));
    state.target_tree_node = Some(MapperTreeNode::new("root", "root", NodeType::Element));

    let script = emit_script(&state).expect("script emits");
    let result = execute_script(&script, "{}", &state.local_context, ExecuteOptions::default());
    assert_eq!(result.error, None);
    assert_eq!(result.output, "{}");
}
