//! JS → PHP operator mapping, shared by constant folding (§4.3.2) and
//! expression lowering (§4.3.6).

use crate::analysis::FileAnalysis;
use j2p_il::IlNode;
use j2p_php_ast::{BinaryOp, Type, UnaryOp};
use j2p_types::infer_value_shape;

/// §4.3.6's `+`→`.` string-contagion rule has four triggers: a string
/// literal, a string-returning call, a string-*typed variable* (tracked in
/// `analysis.variable_type`, not recoverable from the node alone), or an
/// ancestor `+` with a string child. `analysis` is `None` at constant-fold
/// time (§4.3.2): `is_constant_expression` never treats `Identifier` as a
/// constant leaf, so a bare identifier never reaches this check there.
fn is_string_shaped(node: &IlNode, analysis: Option<&FileAnalysis>) -> bool {
    if node.kind() == "BinaryExpression" && node.get_str("operator") == Some("+") {
        let left_stringy = node.get("left").is_some_and(|l| is_string_shaped(&l, analysis));
        let right_stringy = node.get("right").is_some_and(|r| is_string_shaped(&r, analysis));
        return left_stringy || right_stringy;
    }
    if node.kind() == "Identifier" {
        if let Some(name) = node.get_str("name") {
            if analysis.and_then(|a| a.variable_type(name)) == Some(Type::String) {
                return true;
            }
        }
    }
    infer_value_shape(node) == Type::String
}

/// Maps a JS binary operator token to its PHP `BinaryOp`. `+` needs the
/// operand nodes (and the tracked variable types in `analysis`) to resolve
/// the string-contagion rule (§4.3.6: "`+` becomes `.` if either operand is
/// inferred as a string ... transitive").
pub fn map_binary_operator(op: &str, left: &IlNode, right: &IlNode, analysis: Option<&FileAnalysis>) -> BinaryOp {
    match op {
        "+" => {
            let stringy = is_string_shaped(left, analysis) || is_string_shaped(right, analysis);
            if stringy {
                BinaryOp::Concat
            } else {
                BinaryOp::Add
            }
        }
        "-" => BinaryOp::Sub,
        "*" => BinaryOp::Mul,
        "/" => BinaryOp::Div,
        "%" => BinaryOp::Mod,
        "**" => BinaryOp::Pow,
        "&" => BinaryOp::BitAnd,
        "|" => BinaryOp::BitOr,
        "^" => BinaryOp::BitXor,
        "<<" => BinaryOp::Shl,
        // PHP has no unsigned right shift; `>>>` lowers to `>>` (§4.3.6).
        ">>" | ">>>" => BinaryOp::Shr,
        "&&" => BinaryOp::LogicalAnd,
        "||" => BinaryOp::LogicalOr,
        "==" => BinaryOp::Eq,
        "!=" => BinaryOp::NotEq,
        "===" => BinaryOp::Identical,
        "!==" => BinaryOp::NotIdentical,
        "<" => BinaryOp::Lt,
        ">" => BinaryOp::Gt,
        "<=" => BinaryOp::Lte,
        ">=" => BinaryOp::Gte,
        _ => BinaryOp::Identical,
    }
}

pub fn map_unary_operator(op: &str) -> UnaryOp {
    match op {
        "-" => UnaryOp::Neg,
        "+" => UnaryOp::Plus,
        "!" => UnaryOp::Not,
        "~" => UnaryOp::BitNot,
        _ => UnaryOp::Plus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lit(value: serde_json::Value) -> IlNode {
        IlNode::from_value(json!({"type": "Literal", "value": value}))
    }

    #[test]
    fn plus_between_numbers_is_add() {
        assert_eq!(map_binary_operator("+", &lit(json!(1)), &lit(json!(2)), None), BinaryOp::Add);
    }

    #[test]
    fn plus_with_string_operand_is_concat() {
        assert_eq!(map_binary_operator("+", &lit(json!("x")), &lit(json!(1)), None), BinaryOp::Concat);
    }

    #[test]
    fn unsigned_shift_maps_to_signed() {
        assert_eq!(map_binary_operator(">>>", &lit(json!(1)), &lit(json!(2)), None), BinaryOp::Shr);
    }

    #[test]
    fn plus_with_string_typed_variable_is_concat() {
        let mut analysis = FileAnalysis::new();
        analysis.declare_variable_type("greeting", Type::String);
        let ident = IlNode::from_value(json!({"type": "Identifier", "name": "greeting"}));
        let n = IlNode::from_value(json!({"type": "Identifier", "name": "n"}));
        assert_eq!(map_binary_operator("+", &ident, &n, Some(&analysis)), BinaryOp::Concat);
    }
}
