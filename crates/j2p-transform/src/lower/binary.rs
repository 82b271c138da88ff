//! Binary/logical expression lowering (§4.3.6 "Binary expression").

use crate::analysis::FileAnalysis;
use crate::ops::map_binary_operator;
use crate::warning::{unhandled_expression, Warning};
use j2p_il::IlNode;
use j2p_php_ast::{Argument, BinaryOp, Expression, Literal, UnaryExpression, UnaryOp};

fn typeof_operand(side: &IlNode) -> Option<IlNode> {
    if side.kind() != "UnaryExpression" || side.get_str("operator") != Some("typeof") {
        return None;
    }
    side.get("argument")
}

fn literal_string_value(side: &IlNode) -> Option<String> {
    if side.kind() != "Literal" {
        return None;
    }
    side.raw().get("value").and_then(|v| v.as_str()).map(str::to_string)
}

/// Maps a `typeof` target string to the PHP predicate it should lower to.
/// `object` and `function` are necessarily approximate: this domain
/// represents JS objects as PHP arrays and JS functions as closures, so
/// `is_array`/`is_callable` are the closest matching checks.
fn typeof_predicate(target: &str) -> Option<&'static str> {
    match target {
        "string" => Some("is_string"),
        "number" => Some("is_numeric"),
        "boolean" => Some("is_bool"),
        "object" => Some("is_array"),
        "function" => Some("is_callable"),
        _ => None,
    }
}

fn try_typeof_comparison(
    typeof_side: &IlNode,
    literal_side: &IlNode,
    operator: &str,
    analysis: &mut FileAnalysis,
    warnings: &mut Vec<Warning>,
) -> Option<Expression> {
    let operand = typeof_operand(typeof_side)?;
    let literal = literal_string_value(literal_side)?;
    let lowered_operand = super::lower_expression(&operand, analysis, warnings);

    if literal == "undefined" {
        let op = if operator == "!==" { BinaryOp::NotIdentical } else { BinaryOp::Identical };
        return Some(Expression::binary(op, lowered_operand, Expression::Literal(Literal::Null)));
    }

    let predicate = typeof_predicate(&literal)?;
    let call = Expression::FunctionCall {
        callee: Box::new(Expression::Identifier(predicate.to_string())),
        args: vec![Argument::positional(lowered_operand)],
    };
    if operator == "!==" {
        Some(Expression::Unary(UnaryExpression { op: UnaryOp::Not, operand: Box::new(call) }))
    } else {
        Some(call)
    }
}

/// `||` between value-context operands (member access, identifier, call)
/// stands in for JS's truthy-fallback semantics and lowers to Elvis rather
/// than boolean `||` (§4.3.6).
fn is_value_context(node: &IlNode) -> bool {
    matches!(node.kind(), "MemberExpression" | "Identifier" | "CallExpression")
}

pub fn lower_binary_expression(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Expression {
    let operator = node.get_str("operator").unwrap_or("").to_string();
    let Some(left) = node.get("left") else {
        return unhandled_expression("BinaryExpression", warnings);
    };
    let Some(right) = node.get("right") else {
        return unhandled_expression("BinaryExpression", warnings);
    };

    if operator == "===" || operator == "!==" {
        if let Some(result) = try_typeof_comparison(&left, &right, &operator, analysis, warnings)
            .or_else(|| try_typeof_comparison(&right, &left, &operator, analysis, warnings))
        {
            return result;
        }
    }

    if operator == "in" {
        let key = super::lower_expression(&left, analysis, warnings);
        let obj = super::lower_expression(&right, analysis, warnings);
        return Expression::FunctionCall {
            callee: Box::new(Expression::Identifier("array_key_exists".to_string())),
            args: vec![Argument::positional(key), Argument::positional(obj)],
        };
    }

    if operator == "||" && is_value_context(&left) {
        let condition = super::lower_expression(&left, analysis, warnings);
        let else_branch = super::lower_expression(&right, analysis, warnings);
        return Expression::ShortTernary { condition: Box::new(condition), r#else: Box::new(else_branch) };
    }

    let lowered_left = super::lower_expression(&left, analysis, warnings);
    let lowered_right = super::lower_expression(&right, analysis, warnings);
    let op = map_binary_operator(&operator, &left, &right, Some(analysis));
    Expression::binary(op, lowered_left, lowered_right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn binary(op: &str, left: serde_json::Value, right: serde_json::Value) -> IlNode {
        IlNode::from_value(json!({"type": "BinaryExpression", "operator": op, "left": left, "right": right}))
    }

    fn ident(name: &str) -> serde_json::Value {
        json!({"type": "Identifier", "name": name})
    }

    #[test]
    fn typeof_string_check_lowers_to_is_string() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = binary(
            "===",
            json!({"type": "UnaryExpression", "operator": "typeof", "argument": ident("x")}),
            json!({"type": "Literal", "value": "string"}),
        );
        assert_eq!(
            lower_binary_expression(&n, &mut analysis, &mut warnings),
            Expression::FunctionCall { callee: Box::new(Expression::Identifier("is_string".into())), args: vec![Argument::positional(Expression::var("x"))] }
        );
    }

    #[test]
    fn typeof_undefined_check_lowers_to_null_comparison() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = binary(
            "!==",
            json!({"type": "UnaryExpression", "operator": "typeof", "argument": ident("x")}),
            json!({"type": "Literal", "value": "undefined"}),
        );
        assert_eq!(
            lower_binary_expression(&n, &mut analysis, &mut warnings),
            Expression::binary(BinaryOp::NotIdentical, Expression::var("x"), Expression::Literal(Literal::Null))
        );
    }

    #[test]
    fn in_operator_lowers_to_array_key_exists() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = binary("in", ident("k"), ident("table"));
        assert_eq!(
            lower_binary_expression(&n, &mut analysis, &mut warnings),
            Expression::FunctionCall {
                callee: Box::new(Expression::Identifier("array_key_exists".into())),
                args: vec![Argument::positional(Expression::var("k")), Argument::positional(Expression::var("table"))],
            }
        );
    }

    #[test]
    fn or_between_member_access_and_literal_becomes_elvis() {
        let mut analysis = FileAnalysis::new();
        analysis.mark_array_property("opts");
        let mut warnings = Vec::new();
        let n = binary(
            "||",
            json!({"type": "MemberExpression", "object": ident("opts"), "property": ident("name"), "computed": false}),
            json!({"type": "Literal", "value": "anon"}),
        );
        assert_eq!(
            lower_binary_expression(&n, &mut analysis, &mut warnings),
            Expression::ShortTernary {
                condition: Box::new(Expression::ArrayAccess {
                    array: Box::new(Expression::var("opts")),
                    index: Some(Box::new(Expression::string("name"))),
                }),
                r#else: Box::new(Expression::string("anon")),
            }
        );
    }

    #[test]
    fn plain_arithmetic_falls_through_to_operator_map() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = binary("+", json!({"type": "Literal", "value": 1}), json!({"type": "Literal", "value": 2}));
        assert_eq!(lower_binary_expression(&n, &mut analysis, &mut warnings), Expression::binary(BinaryOp::Add, Expression::int(1), Expression::int(2)));
    }

    #[test]
    fn plus_with_string_typed_variable_operand_becomes_concat() {
        let mut analysis = FileAnalysis::new();
        analysis.declare_variable_type("greeting", j2p_php_ast::Type::String);
        let mut warnings = Vec::new();
        let n = binary("+", ident("greeting"), ident("n"));
        assert_eq!(
            lower_binary_expression(&n, &mut analysis, &mut warnings),
            Expression::binary(BinaryOp::Concat, Expression::var("greeting"), Expression::var("n"))
        );
    }
}
