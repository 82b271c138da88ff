//! Central expression-lowering dispatcher (§4.3.6): matches every IL
//! expression node kind and routes it to the rule that owns it.

mod assignment;
mod binary;
mod call;
mod function;
mod length;
mod member;
mod object;
mod packing;
mod rotation;
mod template;
mod typed_array;

pub use call::lower_call_expression;
pub use function::lower_closure_like;
pub use object::lower_object_expression;

use crate::analysis::FileAnalysis;
use crate::constant::constant_value;
use crate::naming::to_php_identifier;
use crate::ops::map_unary_operator;
use crate::warning::{unhandled_expression, Warning};
use j2p_il::IlNode;
use j2p_php_ast::{Argument, ArrayElement, Expression, UnaryExpression, UnaryOp, UpdateOp};
use typed_array::is_typed_array_constructor;

fn lower_identifier(node: &IlNode, analysis: &FileAnalysis) -> Expression {
    let name = node.get_str("name").unwrap_or("");
    if let Some(const_name) = analysis.declared_constants.get(name) {
        return Expression::Identifier(const_name.clone());
    }
    Expression::var(to_php_identifier(name))
}

fn lower_unary(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Expression {
    let operator = node.get_str("operator").unwrap_or("+").to_string();
    let Some(argument) = node.get("argument") else {
        return unhandled_expression("UnaryExpression", warnings);
    };

    if operator == "typeof" {
        let operand = lower_expression(&argument, analysis, warnings);
        return Expression::FunctionCall { callee: Box::new(Expression::Identifier("gettype".to_string())), args: vec![Argument::positional(operand)] };
    }
    if operator == "void" {
        return Expression::Literal(j2p_php_ast::Literal::Null);
    }
    if operator == "delete" {
        let target = lower_expression(&argument, analysis, warnings);
        return Expression::FunctionCall { callee: Box::new(Expression::Identifier("unset".to_string())), args: vec![Argument::positional(target)] };
    }

    let operand = lower_expression(&argument, analysis, warnings);
    let op = map_unary_operator(&operator);
    Expression::Unary(UnaryExpression { op, operand: Box::new(operand) })
}

fn lower_update(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Expression {
    let Some(argument) = node.get("argument") else {
        return unhandled_expression("UpdateExpression", warnings);
    };
    let op = if node.get_str("operator") == Some("--") { UpdateOp::Dec } else { UpdateOp::Inc };
    let prefix = node.get_bool("prefix");
    let target = lower_expression(&argument, analysis, warnings);
    Expression::Update { op, prefix, target: Box::new(target) }
}

fn lower_conditional(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Expression {
    let (Some(test), Some(consequent), Some(alternate)) = (node.get("test"), node.get("consequent"), node.get("alternate")) else {
        return unhandled_expression("ConditionalExpression", warnings);
    };
    let condition = lower_expression(&test, analysis, warnings);
    let then = lower_expression(&consequent, analysis, warnings);
    let r#else = lower_expression(&alternate, analysis, warnings);
    Expression::Ternary { condition: Box::new(condition), then: Box::new(then), r#else: Box::new(r#else) }
}

fn lower_array_expression(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Expression {
    let elements = node
        .get_array("elements")
        .iter()
        .map(|el| {
            if el.is_null_value() {
                ArrayElement { key: None, value: Expression::Literal(j2p_php_ast::Literal::Null), spread: false }
            } else if el.kind() == "SpreadElement" {
                let spread_arg = el.get("argument").map(|a| lower_expression(&a, analysis, warnings)).unwrap_or(Expression::ArrayLiteral(Vec::new()));
                ArrayElement { key: None, value: Expression::Spread(Box::new(spread_arg)), spread: true }
            } else {
                ArrayElement { key: None, value: lower_expression(el, analysis, warnings), spread: false }
            }
        })
        .collect();
    Expression::ArrayLiteral(elements)
}

fn lower_new_expression(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Expression {
    let Some(callee) = node.get("callee") else {
        return unhandled_expression("NewExpression", warnings);
    };
    let raw_args = node.get_array("arguments");

    if callee.kind() == "Identifier" {
        if let Some(name) = callee.get_str("name") {
            if is_typed_array_constructor(name) {
                return typed_array::lower_typed_array_new(raw_args.first(), analysis, warnings);
            }
            let args = raw_args.iter().map(|a| Argument::positional(lower_expression(a, analysis, warnings))).collect();
            return Expression::New { class: j2p_php_ast::ClassRef::name(name), args };
        }
    }

    let lowered_callee = lower_expression(&callee, analysis, warnings);
    let args = raw_args.iter().map(|a| Argument::positional(lower_expression(a, analysis, warnings))).collect();
    match lowered_callee {
        Expression::Identifier(name) => Expression::New { class: j2p_php_ast::ClassRef::name(name), args },
        other => Expression::New { class: j2p_php_ast::ClassRef::Dynamic(Box::new(other)), args },
    }
}

pub fn lower_expression(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Expression {
    match node.kind() {
        "Literal" => constant_value(node),
        "Identifier" => lower_identifier(node, analysis),
        "ThisExpression" => Expression::var("this"),
        "MemberExpression" => member::lower_member_access(node, analysis, warnings),
        "BinaryExpression" | "LogicalExpression" => binary::lower_binary_expression(node, analysis, warnings),
        "UnaryExpression" => lower_unary(node, analysis, warnings),
        "UpdateExpression" => lower_update(node, analysis, warnings),
        "AssignmentExpression" => assignment::lower_assignment(node, analysis, warnings),
        "CallExpression" => call::lower_call_expression(node, analysis, warnings),
        "NewExpression" => lower_new_expression(node, analysis, warnings),
        "ArrayExpression" => lower_array_expression(node, analysis, warnings),
        "ObjectExpression" => object::lower_object_expression(node, analysis, warnings),
        "ConditionalExpression" => lower_conditional(node, analysis, warnings),
        "ArrowFunctionExpression" | "FunctionExpression" => function::lower_closure_like(node, analysis, warnings),
        "TemplateLiteral" => template::lower_template_literal(node, analysis, warnings),
        "SpreadElement" => {
            let argument = node.get("argument").map(|a| lower_expression(&a, analysis, warnings)).unwrap_or(Expression::ArrayLiteral(Vec::new()));
            Expression::Spread(Box::new(argument))
        }
        "SequenceExpression" => node
            .get_array("expressions")
            .last()
            .map(|last| lower_expression(last, analysis, warnings))
            .unwrap_or(Expression::Literal(j2p_php_ast::Literal::Null)),
        kind => unhandled_expression(kind, warnings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn literal_dispatches_to_constant_folding() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = IlNode::from_value(json!({"type": "Literal", "value": 42}));
        assert_eq!(lower_expression(&n, &mut analysis, &mut warnings), Expression::int(42));
    }

    #[test]
    fn declared_constant_identifier_lowers_to_bareword() {
        let mut analysis = FileAnalysis::new();
        analysis.declared_constants.insert("sBox".to_string(), "S_BOX".to_string());
        let mut warnings = Vec::new();
        let n = IlNode::from_value(json!({"type": "Identifier", "name": "sBox"}));
        assert_eq!(lower_expression(&n, &mut analysis, &mut warnings), Expression::Identifier("S_BOX".to_string()));
    }

    #[test]
    fn plain_identifier_lowers_to_snake_case_variable() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = IlNode::from_value(json!({"type": "Identifier", "name": "blockSize"}));
        assert_eq!(lower_expression(&n, &mut analysis, &mut warnings), Expression::var("block_size"));
    }

    #[test]
    fn this_expression_lowers_to_this_variable() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = IlNode::from_value(json!({"type": "ThisExpression"}));
        assert_eq!(lower_expression(&n, &mut analysis, &mut warnings), Expression::var("this"));
    }

    #[test]
    fn conditional_expression_lowers_to_ternary() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = IlNode::from_value(json!({
            "type": "ConditionalExpression",
            "test": {"type": "Identifier", "name": "ok"},
            "consequent": {"type": "Literal", "value": 1},
            "alternate": {"type": "Literal", "value": 0}
        }));
        assert_eq!(
            lower_expression(&n, &mut analysis, &mut warnings),
            Expression::Ternary { condition: Box::new(Expression::var("ok")), then: Box::new(Expression::int(1)), r#else: Box::new(Expression::int(0)) }
        );
    }

    #[test]
    fn typed_array_new_dispatches_through_typed_array_lowering() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = IlNode::from_value(json!({
            "type": "NewExpression",
            "callee": {"type": "Identifier", "name": "Uint8Array"},
            "arguments": [{"type": "Identifier", "name": "key"}]
        }));
        assert_eq!(
            lower_expression(&n, &mut analysis, &mut warnings),
            Expression::FunctionCall { callee: Box::new(Expression::Identifier("array_values".into())), args: vec![Argument::positional(Expression::var("key"))] }
        );
    }

    #[test]
    fn plain_new_expression_lowers_to_class_instantiation() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = IlNode::from_value(json!({
            "type": "NewExpression",
            "callee": {"type": "Identifier", "name": "Cipher"},
            "arguments": []
        }));
        assert_eq!(lower_expression(&n, &mut analysis, &mut warnings), Expression::New { class: j2p_php_ast::ClassRef::name("Cipher"), args: vec![] });
    }

    #[test]
    fn unknown_node_kind_falls_back_to_unhandled_marker() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = IlNode::from_value(json!({"type": "YieldExpression"}));
        let result = lower_expression(&n, &mut analysis, &mut warnings);
        assert_eq!(result, Expression::Identifier("UNHANDLED_EXPRESSION_YieldExpression".to_string()));
        assert_eq!(warnings.len(), 1);
    }
}
