/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Resolves the value a target node assigns, for the emitter (§4.3).

use crate::node::MapperTreeNode;

/// What a target node's assignment should emit, or nothing at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueExpression {
    /// A quoted string literal (`node.value` with `plainTextValue`).
    Literal(String),
    /// A raw expression pasted verbatim (`node.value` without `plainTextValue`).
    Raw(String),
    /// The single source reference's variable name.
    Variable(String),
    /// A template string concatenating multiple reference variable names,
    /// in declaration order.
    Template(Vec<String>),
}

/// `buildValueExpression` (§4.3). `None` signals "skip this assignment".
pub fn build_value_expression(node: &MapperTreeNode) -> Option<ValueExpression> {
    if let Some(value) = &node.value {
        return Some(if node.plain_text_value {
            ValueExpression::Literal(value.clone())
        } else {
            ValueExpression::Raw(value.clone())
        });
    }

    match node.source_references.as_deref() {
        Some([single]) => Some(ValueExpression::Variable(single.variable_name.clone())),
        Some(many) if !many.is_empty() => {
            Some(ValueExpression::Template(many.iter().map(|r| r.variable_name.clone()).collect()))
        }
        _ => None,
    }
}

impl ValueExpression {
    /// Renders the expression as it would appear on the right-hand side of
    /// an assignment in the emitted script.
    pub fn render(&self) -> String {
        match self {
            ValueExpression::Literal(v) => format!("{:?}", v),
            ValueExpression::Raw(v) => v.clone(),
            ValueExpression::Variable(name) => name.clone(),
            ValueExpression::Template(names) => {
                let joined = names.iter().map(|n| format!("${{{n}}}")).collect::<String>();
                format!("`{joined}`")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;
    use crate::reference::SourceReference;

    #[test]
    fn literal_value_is_quoted() {
        let mut node = MapperTreeNode::new("n", "n", NodeType::Element);
        node.value = Some("hello".into());
        node.plain_text_value = true;
        assert_eq!(build_value_expression(&node), Some(ValueExpression::Literal("hello".into())));
    }

    #[test]
    fn expression_value_is_verbatim() {
        let mut node = MapperTreeNode::new("n", "n", NodeType::Element);
        node.value = Some("a + b".into());
        assert_eq!(build_value_expression(&node), Some(ValueExpression::Raw("a + b".into())));
    }

    #[test]
    fn single_reference_emits_its_variable_name() {
        let mut node = MapperTreeNode::new("n", "n", NodeType::Element);
        node.source_references = Some(vec![SourceReference::new_scalar("r1", "src", "_x")]);
        assert_eq!(build_value_expression(&node), Some(ValueExpression::Variable("_x".into())));
    }

    #[test]
    fn multiple_references_emit_a_template() {
        let mut node = MapperTreeNode::new("n", "n", NodeType::Element);
        node.source_references = Some(vec![
            SourceReference::new_scalar("r1", "src1", "_a"),
            SourceReference::new_scalar("r2", "src2", "_b"),
        ]);
        assert_eq!(
            build_value_expression(&node),
            Some(ValueExpression::Template(vec!["_a".into(), "_b".into()]))
        );
        assert_eq!(
            build_value_expression(&node).unwrap().render(),
            "`${_a}${_b}`"
        );
    }

    #[test]
    fn node_with_nothing_set_yields_no_assignment() {
        let node = MapperTreeNode::new("n", "n", NodeType::Element);
        assert_eq!(build_value_expression(&node), None);
    }
}
