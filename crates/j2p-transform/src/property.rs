//! Per-property type inference for `this.x = v` assignments (§4.3.4).

use crate::analysis::FileAnalysis;
use j2p_il::IlNode;
use j2p_php_ast::Type;
use j2p_types::{infer_name_heuristic, infer_value_shape};
use serde_json::Value;

/// Infers the type of a property from its assigned value, applying the
/// monotonic array-tracking side effect on `analysis` (§4.3.4: "the
/// property is added to `arrayProperties` on any assignment whose right
/// side is an object literal, a call expression, or access into an
/// already-tracked array").
///
/// Callers are responsible for the first-assignment-wins rule: this
/// function always computes a type for the given value; it does not know
/// whether `name` was already declared.
pub fn infer_property_type(name: &str, value: &IlNode, analysis: &mut FileAnalysis) -> Type {
    if is_null_literal(value) {
        return Type::nullable(infer_name_heuristic(name));
    }
    match value.kind() {
        "ObjectExpression" => {
            analysis.mark_array_property(name.to_string());
            Type::Array
        }
        "ArrayExpression" => Type::Array,
        "CallExpression" => {
            analysis.mark_array_property(name.to_string());
            infer_value_shape(value)
        }
        "MemberExpression" => {
            if is_access_into_tracked_array(value, analysis) {
                analysis.mark_array_property(name.to_string());
            }
            infer_value_shape(value)
        }
        _ => infer_value_shape(value),
    }
}

fn is_null_literal(node: &IlNode) -> bool {
    node.kind() == "Literal" && matches!(node.raw().get("value"), None | Some(Value::Null))
}

/// True for `base[...]` where `base` is an identifier already known to hold
/// an array.
fn is_access_into_tracked_array(member: &IlNode, analysis: &FileAnalysis) -> bool {
    if !member.get_bool("computed") {
        return false;
    }
    let Some(object) = member.get("object") else { return false };
    if object.kind() != "Identifier" {
        return false;
    }
    let Some(base_name) = object.get_str("name") else { return false };
    analysis.is_array_like(base_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: serde_json::Value) -> IlNode {
        IlNode::from_value(value)
    }

    #[test]
    fn null_initializer_is_nullable_by_name_heuristic() {
        let mut analysis = FileAnalysis::new();
        let ty = infer_property_type("blockSize", &node(json!({"type": "Literal", "value": null})), &mut analysis);
        assert_eq!(ty, Type::nullable(Type::Int));
    }

    #[test]
    fn object_literal_marks_array_property() {
        let mut analysis = FileAnalysis::new();
        let ty = infer_property_type("params", &node(json!({"type": "ObjectExpression", "properties": []})), &mut analysis);
        assert_eq!(ty, Type::Array);
        assert!(analysis.is_array_like("params"));
    }

    #[test]
    fn call_expression_marks_array_property_regardless_of_return_shape() {
        let mut analysis = FileAnalysis::new();
        let value = node(json!({
            "type": "CallExpression",
            "callee": {"type": "Identifier", "name": "computeRounds"},
            "arguments": []
        }));
        infer_property_type("rounds", &value, &mut analysis);
        assert!(analysis.is_array_like("rounds"));
    }

    #[test]
    fn access_into_tracked_array_marks_property() {
        let mut analysis = FileAnalysis::new();
        analysis.mark_array_property("table");
        let value = node(json!({
            "type": "MemberExpression",
            "computed": true,
            "object": {"type": "Identifier", "name": "table"},
            "property": {"type": "Identifier", "name": "key"}
        }));
        infer_property_type("entry", &value, &mut analysis);
        assert!(analysis.is_array_like("entry"));
    }

    #[test]
    fn first_assignment_wins_is_caller_responsibility() {
        let mut analysis = FileAnalysis::new();
        let first = infer_property_type("count", &node(json!({"type": "Literal", "value": 1})), &mut analysis);
        assert_eq!(first, Type::Int);
    }
}
