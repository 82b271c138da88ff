//! `new Uint8Array(arg)`-style typed-array construction (§4.3.6 "Typed-array
//! creation"): `arg` is ambiguous between a size and a buffer to copy.

use crate::analysis::FileAnalysis;
use crate::naming::is_all_caps;
use crate::warning::Warning;
use j2p_il::IlNode;
use j2p_php_ast::{Argument, CastType, Expression};
use j2p_types::{BUFFER_COPY_SUBSTRINGS, SIZE_LIKE_SUBSTRINGS};

const TYPED_ARRAY_CONSTRUCTORS: &[&str] = &[
    "Uint8Array", "Uint16Array", "Uint32Array", "Int8Array", "Int16Array", "Int32Array", "Float32Array", "Float64Array", "BigInt64Array", "BigUint64Array", "Uint8ClampedArray",
];

/// Whether a `NewExpression`'s callee identifier names one of JS's typed-array
/// constructors, as opposed to a user-defined or framework class.
pub fn is_typed_array_constructor(name: &str) -> bool {
    TYPED_ARRAY_CONSTRUCTORS.contains(&name)
}

fn callee_name(call: &IlNode) -> Option<String> {
    let callee = call.get("callee")?;
    match callee.kind() {
        "Identifier" => callee.get_str("name").map(str::to_string),
        "MemberExpression" => callee.get("property").and_then(|p| p.get_str("name").map(str::to_string)),
        _ => None,
    }
}

/// Ordered disambiguation cascade. `false` means "treat as a buffer to
/// copy", the spec's default for genuinely ambiguous identifiers.
fn is_size_argument(node: &IlNode) -> bool {
    match node.kind() {
        "Identifier" => {
            let name = node.get_str("name").unwrap_or("");
            if is_all_caps(name) {
                return true;
            }
            let lower = name.to_lowercase();
            if lower == "n" || SIZE_LIKE_SUBSTRINGS.iter().any(|s| lower.contains(s)) {
                return true;
            }
            if BUFFER_COPY_SUBSTRINGS.iter().any(|s| lower.contains(s)) {
                return false;
            }
            false
        }
        "BinaryExpression" | "ConditionalExpression" => true,
        "CallExpression" => callee_name(node).map(|name| matches!(name.as_str(), "count" | "strlen" | "sizeof")).unwrap_or(false),
        _ => false,
    }
}

fn array_fill_call(size: Expression) -> Expression {
    let cast = Expression::Cast { target_type: CastType::Int, expr: Box::new(size) };
    Expression::FunctionCall {
        callee: Box::new(Expression::Identifier("array_fill".to_string())),
        args: vec![Argument::positional(Expression::int(0)), Argument::positional(cast), Argument::positional(Expression::int(0))],
    }
}

fn array_values_call(buffer: Expression) -> Expression {
    Expression::FunctionCall { callee: Box::new(Expression::Identifier("array_values".to_string())), args: vec![Argument::positional(buffer)] }
}

pub fn lower_typed_array_new(arg: Option<&IlNode>, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Expression {
    let Some(arg) = arg else {
        return Expression::ArrayLiteral(Vec::new());
    };
    let lowered = super::lower_expression(arg, analysis, warnings);
    if is_size_argument(arg) {
        array_fill_call(lowered)
    } else {
        array_values_call(lowered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ident(name: &str) -> IlNode {
        IlNode::from_value(json!({"type": "Identifier", "name": name}))
    }

    #[test]
    fn screaming_snake_case_identifier_emits_array_fill_with_int_cast() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let result = lower_typed_array_new(Some(&ident("KS")), &mut analysis, &mut warnings);
        assert_eq!(
            result,
            Expression::FunctionCall {
                callee: Box::new(Expression::Identifier("array_fill".into())),
                args: vec![
                    Argument::positional(Expression::int(0)),
                    Argument::positional(Expression::Cast { target_type: CastType::Int, expr: Box::new(Expression::var("KS")) }),
                    Argument::positional(Expression::int(0)),
                ],
            }
        );
    }

    #[test]
    fn bare_key_identifier_emits_array_values() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let result = lower_typed_array_new(Some(&ident("key")), &mut analysis, &mut warnings);
        assert_eq!(
            result,
            Expression::FunctionCall { callee: Box::new(Expression::Identifier("array_values".into())), args: vec![Argument::positional(Expression::var("key"))] }
        );
    }

    #[test]
    fn size_named_identifier_is_size() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let result = lower_typed_array_new(Some(&ident("blockSize")), &mut analysis, &mut warnings);
        assert!(matches!(result, Expression::FunctionCall { callee, .. } if matches!(*callee, Expression::Identifier(ref n) if n == "array_fill")));
    }

    #[test]
    fn binary_expression_argument_is_size() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = IlNode::from_value(json!({
            "type": "BinaryExpression",
            "operator": "*",
            "left": {"type": "Identifier", "name": "rounds"},
            "right": {"type": "Literal", "value": 4}
        }));
        let result = lower_typed_array_new(Some(&n), &mut analysis, &mut warnings);
        assert!(matches!(result, Expression::FunctionCall { callee, .. } if matches!(*callee, Expression::Identifier(ref name) if name == "array_fill")));
    }
}
