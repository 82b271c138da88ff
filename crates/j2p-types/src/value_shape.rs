//! Default-value and value-shape inference (§4.2 "Default-value
//! inference", "Value-shape inference").

use crate::heuristics::infer_name_heuristic;
use j2p_il::IlNode;
use j2p_php_ast::Type;
use serde_json::Value;

/// Literal-kind inference: booleans → `bool`, integers → `int`, floats →
/// `float`, strings → `string`.
pub fn infer_literal_type(node: &IlNode) -> Type {
    match node.raw().get("value") {
        Some(Value::Bool(_)) => Type::Bool,
        Some(Value::Number(n)) => {
            if n.is_i64() || n.is_u64() {
                Type::Int
            } else {
                Type::Float
            }
        }
        Some(Value::String(_)) => Type::String,
        Some(Value::Null) | None => Type::Null,
        _ => Type::Mixed,
    }
}

/// Default-value inference for parameter/property initializers: literal
/// kind decides scalar types; array/object literals → `array`.
pub fn infer_default_value(node: &IlNode) -> Type {
    match node.kind() {
        "Literal" => infer_literal_type(node),
        "ArrayExpression" | "ObjectExpression" => Type::Array,
        _ => Type::Mixed,
    }
}

/// A small classifier of JS/PHP standard functions, keyed by the callee's
/// final property/identifier name, that is known to return a string vs. an
/// array vs. something else (§4.2).
fn classify_call_return(name: &str) -> Type {
    match name {
        "split" | "explode" | "from" | "slice" | "map" | "filter" | "concat" | "keys"
        | "values" | "entries" | "freeze" => Type::Array,
        "substr" | "substring" | "chr" | "charAt" | "toString" | "join" | "trim"
        | "toUpperCase" | "toLowerCase" | "padStart" | "padEnd" | "replace" | "repeat" => {
            Type::String
        }
        "indexOf" | "charCodeAt" => Type::Int,
        "isArray" => Type::Bool,
        _ => Type::Mixed,
    }
}

fn callee_name(call: &IlNode) -> Option<String> {
    let callee = call.get("callee")?;
    match callee.kind() {
        "Identifier" => callee.get_str("name").map(str::to_string),
        "MemberExpression" => callee
            .get("property")
            .and_then(|prop| prop.get_str("name").map(str::to_string)),
        _ => None,
    }
}

/// Value-shape inference for initializers, driving the `+`→`.` string
/// contagion rule of §4.3.6 and the array-vs-object property tracking of
/// §4.3.4. Transitive: a `+` whose child is itself an inferred-string `+`
/// expression is also string-shaped.
pub fn infer_value_shape(expr: &IlNode) -> Type {
    match expr.kind() {
        "Literal" => infer_literal_type(expr),
        "ArrayExpression" | "ObjectExpression" => Type::Array,
        "TemplateLiteral" => Type::String,
        "Identifier" => expr
            .get_str("name")
            .map(infer_name_heuristic)
            .unwrap_or(Type::Mixed),
        "CallExpression" => callee_name(expr)
            .map(|name| classify_call_return(&name))
            .unwrap_or(Type::Mixed),
        "BinaryExpression" if expr.get_str("operator") == Some("+") => {
            let left_is_string = expr
                .get("left")
                .map(|l| infer_value_shape(&l) == Type::String)
                .unwrap_or(false);
            let right_is_string = expr
                .get("right")
                .map(|r| infer_value_shape(&r) == Type::String)
                .unwrap_or(false);
            if left_is_string || right_is_string {
                Type::String
            } else {
                Type::Int
            }
        }
        _ => Type::Mixed,
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
    fn literal_string_infers_string() {
        let n = node(json!({"type": "Literal", "value": "hi"}));
        assert_eq!(infer_literal_type(&n), Type::String);
    }

    #[test]
    fn literal_int_vs_float() {
        assert_eq!(infer_literal_type(&node(json!({"type": "Literal", "value": 3}))), Type::Int);
        assert_eq!(
            infer_literal_type(&node(json!({"type": "Literal", "value": 3.5}))),
            Type::Float
        );
    }

    #[test]
    fn array_and_object_literals_are_array() {
        assert_eq!(infer_default_value(&node(json!({"type": "ArrayExpression"}))), Type::Array);
        assert_eq!(infer_default_value(&node(json!({"type": "ObjectExpression"}))), Type::Array);
    }

    #[test]
    fn string_returning_call_is_recognized() {
        let n = node(json!({
            "type": "CallExpression",
            "callee": {"type": "MemberExpression", "property": {"type": "Identifier", "name": "toString"}},
            "arguments": []
        }));
        assert_eq!(infer_value_shape(&n), Type::String);
    }

    #[test]
    fn array_returning_call_is_recognized() {
        let n = node(json!({
            "type": "CallExpression",
            "callee": {"type": "Identifier", "name": "split"},
            "arguments": []
        }));
        assert_eq!(infer_value_shape(&n), Type::Array);
    }

    #[test]
    fn binary_plus_with_string_operand_is_string() {
        let n = node(json!({
            "type": "BinaryExpression",
            "operator": "+",
            "left": {"type": "Literal", "value": "x"},
            "right": {"type": "Identifier", "name": "n"}
        }));
        assert_eq!(infer_value_shape(&n), Type::String);
    }

    #[test]
    fn binary_plus_transitive_through_nested_plus() {
        let inner = json!({
            "type": "BinaryExpression",
            "operator": "+",
            "left": {"type": "Literal", "value": "x"},
            "right": {"type": "Identifier", "name": "n"}
        });
        let outer = node(json!({
            "type": "BinaryExpression",
            "operator": "+",
            "left": inner,
            "right": {"type": "Identifier", "name": "m"}
        }));
        assert_eq!(infer_value_shape(&outer), Type::String);
    }

    #[test]
    fn binary_plus_without_string_operand_is_int() {
        let n = node(json!({
            "type": "BinaryExpression",
            "operator": "+",
            "left": {"type": "Literal", "value": 1},
            "right": {"type": "Literal", "value": 2}
        }));
        assert_eq!(infer_value_shape(&n), Type::Int);
    }
}
