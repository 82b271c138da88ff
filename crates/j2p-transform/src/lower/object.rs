//! Object-literal lowering (§4.3.6 "Object literal").

use crate::analysis::FileAnalysis;
use crate::warning::Warning;
use j2p_il::IlNode;
use j2p_php_ast::{ArrayElement, Expression};

/// `{a: 1, b: c}` → `['a' => 1, 'b' => $c]`, preserving original key
/// spelling (no case conversion: object-literal keys become PHP array
/// string keys, not identifiers).
pub fn lower_object_expression(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Expression {
    let elements = node
        .get_array("properties")
        .into_iter()
        .map(|prop| {
            let key = property_key(&prop);
            let value = prop
                .get("value")
                .map(|v| super::lower_expression(&v, analysis, warnings))
                .unwrap_or(Expression::Literal(j2p_php_ast::Literal::Null));
            ArrayElement { key: Some(Expression::string(key)), value, spread: false }
        })
        .collect();
    Expression::ArrayLiteral(elements)
}

fn property_key(prop: &IlNode) -> String {
    if let Some(key) = prop.get_str("key") {
        return key.to_string();
    }
    prop.get("key")
        .and_then(|k| k.get_str("name").map(str::to_string).or_else(|| k.raw().get("value").and_then(|v| v.as_str()).map(str::to_string)))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn preserves_original_key_spelling() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = IlNode::from_value(json!({
            "type": "ObjectExpression",
            "properties": [
                {"key": {"type": "Identifier", "name": "blockSize"}, "value": {"type": "Literal", "value": 16}}
            ]
        }));
        assert_eq!(
            lower_object_expression(&n, &mut analysis, &mut warnings),
            Expression::ArrayLiteral(vec![ArrayElement { key: Some(Expression::string("blockSize")), value: Expression::int(16), spread: false }])
        );
    }

    #[test]
    fn string_literal_key_is_read_through_raw_value() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = IlNode::from_value(json!({
            "type": "ObjectExpression",
            "properties": [
                {"key": {"type": "Literal", "value": "round-0"}, "value": {"type": "Literal", "value": 1}}
            ]
        }));
        assert_eq!(
            lower_object_expression(&n, &mut analysis, &mut warnings),
            Expression::ArrayLiteral(vec![ArrayElement { key: Some(Expression::string("round-0")), value: Expression::int(1), spread: false }])
        );
    }
}
