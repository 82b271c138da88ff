//! Array `.length` disambiguation (§4.3.6 "Array `.length`").

use crate::analysis::FileAnalysis;
use crate::warning::Warning;
use j2p_il::IlNode;
use j2p_php_ast::{Argument, Expression, Type};
use j2p_types::looks_string_named;

fn receiver_name(object: &IlNode) -> Option<String> {
    match object.kind() {
        "Identifier" => object.get_str("name").map(str::to_string),
        "MemberExpression" if !object.get_bool("computed") => {
            object.get("property").and_then(|p| p.get_str("name").map(str::to_string))
        }
        _ => None,
    }
}

fn is_string_receiver(object: &IlNode, analysis: &FileAnalysis) -> bool {
    let Some(name) = receiver_name(object) else { return false };
    if matches!(analysis.variable_type(&name), Some(Type::String)) {
        return true;
    }
    looks_string_named(&name)
}

/// Lowers `x.length` to `count($x)` (default) or `strlen($x)` when the
/// receiver is known or named like a string.
pub fn lower_length_access(object: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Expression {
    let use_strlen = is_string_receiver(object, analysis);
    let lowered = super::lower_expression(object, analysis, warnings);
    let fn_name = if use_strlen { "strlen" } else { "count" };
    Expression::FunctionCall {
        callee: Box::new(Expression::Identifier(fn_name.to_string())),
        args: vec![Argument::positional(lowered)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_receiver_uses_count() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let object = IlNode::from_value(json!({"type": "Identifier", "name": "blocks"}));
        let result = lower_length_access(&object, &mut analysis, &mut warnings);
        assert_eq!(
            result,
            Expression::FunctionCall {
                callee: Box::new(Expression::Identifier("count".into())),
                args: vec![Argument::positional(Expression::var("blocks"))],
            }
        );
    }

    #[test]
    fn string_named_receiver_uses_strlen() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let object = IlNode::from_value(json!({"type": "Identifier", "name": "encoded"}));
        let result = lower_length_access(&object, &mut analysis, &mut warnings);
        assert_eq!(
            result,
            Expression::FunctionCall {
                callee: Box::new(Expression::Identifier("strlen".into())),
                args: vec![Argument::positional(Expression::var("encoded"))],
            }
        );
    }

    #[test]
    fn tracked_string_type_uses_strlen() {
        let mut analysis = FileAnalysis::new();
        analysis.declare_variable_type("message", Type::String);
        let mut warnings = Vec::new();
        let object = IlNode::from_value(json!({"type": "Identifier", "name": "message"}));
        let result = lower_length_access(&object, &mut analysis, &mut warnings);
        assert_eq!(
            result,
            Expression::FunctionCall {
                callee: Box::new(Expression::Identifier("strlen".into())),
                args: vec![Argument::positional(Expression::var("message"))],
            }
        );
    }
}
