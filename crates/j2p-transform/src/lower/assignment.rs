//! Assignment lowering (§4.3.6 "Assignment").

use crate::analysis::FileAnalysis;
use crate::warning::{unhandled_expression, Warning};
use j2p_il::IlNode;
use j2p_php_ast::{AssignOp, AssignmentExpression, Expression};
use j2p_types::{infer_value_shape, Type};

fn map_assign_operator(op: &str) -> AssignOp {
    match op {
        "=" => AssignOp::Assign,
        "+=" => AssignOp::AddAssign,
        "-=" => AssignOp::SubAssign,
        "*=" => AssignOp::MulAssign,
        "/=" => AssignOp::DivAssign,
        "%=" => AssignOp::ModAssign,
        "**=" => AssignOp::PowAssign,
        "&=" => AssignOp::BitAndAssign,
        "|=" => AssignOp::BitOrAssign,
        "^=" => AssignOp::BitXorAssign,
        "<<=" => AssignOp::ShlAssign,
        ">>=" | ">>>=" => AssignOp::ShrAssign,
        "??=" => AssignOp::CoalesceAssign,
        _ => AssignOp::Assign,
    }
}

fn is_length_truncation(target: &IlNode) -> Option<IlNode> {
    if target.kind() != "MemberExpression" || target.get_bool("computed") {
        return None;
    }
    if target.get("property")?.get_str("name") != Some("length") {
        return None;
    }
    target.get("object")
}

pub fn lower_assignment(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Expression {
    let operator = node.get_str("operator").unwrap_or("=").to_string();
    let Some(target) = node.get("left") else {
        return unhandled_expression("AssignmentExpression", warnings);
    };
    let Some(value) = node.get("right") else {
        return unhandled_expression("AssignmentExpression", warnings);
    };

    if operator == "=" {
        if let Some(array_base) = is_length_truncation(&target) {
            let lowered_array = super::lower_expression(&array_base, analysis, warnings);
            return Expression::assign(lowered_array, Expression::ArrayLiteral(Vec::new()));
        }
    }

    let lowered_target = super::lower_expression(&target, analysis, warnings);
    let lowered_value = super::lower_expression(&value, analysis, warnings);
    let op = if operator == "+=" && infer_value_shape(&value) == Type::String {
        AssignOp::ConcatAssign
    } else {
        map_assign_operator(&operator)
    };
    Expression::Assignment(AssignmentExpression { op, target: Box::new(lowered_target), value: Box::new(lowered_value) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assign(op: &str, left: serde_json::Value, right: serde_json::Value) -> IlNode {
        IlNode::from_value(json!({"type": "AssignmentExpression", "operator": op, "left": left, "right": right}))
    }

    fn ident(name: &str) -> serde_json::Value {
        json!({"type": "Identifier", "name": name})
    }

    #[test]
    fn length_truncation_lowers_to_empty_array_assign() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = assign(
            "=",
            json!({"type": "MemberExpression", "object": ident("arr"), "property": ident("length"), "computed": false}),
            json!({"type": "Literal", "value": 0}),
        );
        assert_eq!(lower_assignment(&n, &mut analysis, &mut warnings), Expression::assign(Expression::var("arr"), Expression::ArrayLiteral(Vec::new())));
    }

    #[test]
    fn string_valued_plus_equals_becomes_concat_assign() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = assign("+=", ident("s"), json!({"type": "Literal", "value": "tail"}));
        assert_eq!(
            lower_assignment(&n, &mut analysis, &mut warnings),
            Expression::Assignment(AssignmentExpression { op: AssignOp::ConcatAssign, target: Box::new(Expression::var("s")), value: Box::new(Expression::string("tail")) })
        );
    }

    #[test]
    fn plain_assignment_passthrough() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = assign("=", ident("x"), json!({"type": "Literal", "value": 1}));
        assert_eq!(lower_assignment(&n, &mut analysis, &mut warnings), Expression::assign(Expression::var("x"), Expression::int(1)));
    }
}
