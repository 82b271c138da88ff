//! Constant-expression recognition and folding (§4.3.2).

use crate::ops::{map_binary_operator, map_unary_operator};
use j2p_il::IlNode;
use j2p_php_ast::{ArrayElement, Expression, Literal};
use serde_json::Value;

/// True when `node`'s initializer shape makes it eligible for promotion to
/// a PHP `const` (§4.3.1, §4.3.2).
pub fn is_constant_expression(node: &IlNode) -> bool {
    match node.kind() {
        "Literal" => true,
        "UnaryExpression" => node.get("argument").is_some_and(|a| is_constant_expression(&a)),
        "BinaryExpression" => {
            let left = node.get("left");
            let right = node.get("right");
            match (left, right) {
                (Some(l), Some(r)) => is_constant_expression(&l) && is_constant_expression(&r),
                _ => false,
            }
        }
        "ArrayExpression" => node
            .get_array("elements")
            .iter()
            .all(|el| el.is_null_value() || is_constant_expression(el)),
        "ObjectExpression" => node.get_array("properties").iter().all(|prop| {
            prop.get("value")
                .map(|v| !matches!(v.kind(), "FunctionExpression" | "ArrowFunctionExpression") && is_constant_expression(&v))
                .unwrap_or(false)
        }),
        "CallExpression" => is_object_freeze_call(node)
            .map(|arg| is_constant_expression(&arg))
            .unwrap_or(false),
        _ => false,
    }
}

/// Recognizes `Object.freeze(<arg>)` and returns the unwrapped argument.
fn is_object_freeze_call(node: &IlNode) -> Option<IlNode> {
    let callee = node.get("callee")?;
    if callee.kind() != "MemberExpression" {
        return None;
    }
    let object = callee.get("object")?;
    let property = callee.get("property")?;
    if object.get_str("name") != Some("Object") || property.get_str("name") != Some("freeze") {
        return None;
    }
    node.get_array("arguments").into_iter().next()
}

/// Folds a node already known to satisfy [`is_constant_expression`] into a
/// PHP AST expression.
pub fn constant_value(node: &IlNode) -> Expression {
    match node.kind() {
        "Literal" => literal_expression(node),
        "UnaryExpression" => {
            let operand = node.get("argument").map(|a| constant_value(&a)).unwrap_or(Expression::int(0));
            let op = map_unary_operator(node.get_str("operator").unwrap_or("+"));
            Expression::Unary(j2p_php_ast::UnaryExpression { op, operand: Box::new(operand) })
        }
        "BinaryExpression" => {
            let left = node.get("left").unwrap_or_else(|| IlNode::from_value(Value::Null));
            let right = node.get("right").unwrap_or_else(|| IlNode::from_value(Value::Null));
            let op = map_binary_operator(node.get_str("operator").unwrap_or("+"), &left, &right, None);
            Expression::binary(op, constant_value(&left), constant_value(&right))
        }
        "ArrayExpression" => {
            let elements = node
                .get_array("elements")
                .into_iter()
                .map(|el| ArrayElement {
                    key: None,
                    value: if el.is_null_value() { Expression::Literal(Literal::Null) } else { constant_value(&el) },
                    spread: false,
                })
                .collect();
            Expression::ArrayLiteral(elements)
        }
        "ObjectExpression" => {
            let elements = node
                .get_array("properties")
                .into_iter()
                .map(|prop| {
                    let key = prop.get_str("key").map(Expression::string).unwrap_or(Expression::Literal(Literal::Null));
                    let value = prop.get("value").map(|v| constant_value(&v)).unwrap_or(Expression::Literal(Literal::Null));
                    ArrayElement { key: Some(key), value, spread: false }
                })
                .collect();
            Expression::ArrayLiteral(elements)
        }
        "CallExpression" => is_object_freeze_call(node)
            .map(|arg| constant_value(&arg))
            .unwrap_or(Expression::Literal(Literal::Null)),
        _ => Expression::Literal(Literal::Null),
    }
}

fn literal_expression(node: &IlNode) -> Expression {
    match node.raw().get("value") {
        Some(Value::Bool(b)) => Expression::Literal(Literal::Bool(*b)),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Expression::Literal(Literal::Int(i))
            } else {
                Expression::Literal(Literal::Float(n.as_f64().unwrap_or(0.0)))
            }
        }
        Some(Value::String(s)) => Expression::string(s.clone()),
        Some(Value::Null) | None => Expression::Literal(Literal::Null),
        _ => Expression::Literal(Literal::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: serde_json::Value) -> IlNode {
        IlNode::from_value(value)
    }

    #[test]
    fn literal_is_constant() {
        assert!(is_constant_expression(&node(json!({"type": "Literal", "value": 3}))));
    }

    #[test]
    fn array_of_literals_and_holes_is_constant() {
        let n = node(json!({
            "type": "ArrayExpression",
            "elements": [{"type": "Literal", "value": 1}, null, {"type": "Literal", "value": 2}]
        }));
        assert!(is_constant_expression(&n));
    }

    #[test]
    fn array_with_call_element_is_not_constant() {
        let n = node(json!({
            "type": "ArrayExpression",
            "elements": [{"type": "CallExpression", "callee": {"type": "Identifier", "name": "f"}, "arguments": []}]
        }));
        assert!(!is_constant_expression(&n));
    }

    #[test]
    fn object_freeze_of_constant_array_is_constant() {
        let n = node(json!({
            "type": "CallExpression",
            "callee": {
                "type": "MemberExpression",
                "object": {"type": "Identifier", "name": "Object"},
                "property": {"type": "Identifier", "name": "freeze"}
            },
            "arguments": [{"type": "ArrayExpression", "elements": [{"type": "Literal", "value": 99}]}]
        }));
        assert!(is_constant_expression(&n));
        let value = constant_value(&n);
        assert_eq!(value, Expression::ArrayLiteral(vec![ArrayElement { key: None, value: Expression::int(99), spread: false }]));
    }

    #[test]
    fn object_expression_with_function_value_is_not_constant() {
        let n = node(json!({
            "type": "ObjectExpression",
            "properties": [{"key": "f", "value": {"type": "FunctionExpression", "params": [], "body": {"type": "BlockStatement", "body": []}}}]
        }));
        assert!(!is_constant_expression(&n));
    }

    #[test]
    fn binary_expression_folds_to_concat_when_stringy() {
        let n = node(json!({
            "type": "BinaryExpression",
            "operator": "+",
            "left": {"type": "Literal", "value": "x"},
            "right": {"type": "Literal", "value": 1}
        }));
        assert!(is_constant_expression(&n));
        assert_eq!(
            constant_value(&n),
            Expression::binary(j2p_php_ast::BinaryOp::Concat, Expression::string("x"), Expression::int(1))
        );
    }
}
