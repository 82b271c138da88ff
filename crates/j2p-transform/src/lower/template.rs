//! Template-literal lowering (§4.3.6 "Template literal").

use crate::analysis::FileAnalysis;
use crate::warning::Warning;
use j2p_il::IlNode;
use j2p_php_ast::{Expression, InterpolationPart};

fn quasi_text(quasi: &IlNode) -> String {
    quasi
        .get("value")
        .and_then(|v| v.get_str("cooked").map(str::to_string).or_else(|| v.get_str("raw").map(str::to_string)))
        .unwrap_or_default()
}

/// A template literal becomes a `StringInterpolation`, with adjacent
/// literal runs merged at this layer too (the emitter's `render_interpolation`
/// merges idempotently, but merging here keeps the produced AST itself
/// already minimal).
pub fn lower_template_literal(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Expression {
    let quasis = node.get_array("quasis");
    let expressions = node.get_array("expressions");

    let mut raw_parts = Vec::new();
    for (i, quasi) in quasis.iter().enumerate() {
        let text = quasi_text(quasi);
        if !text.is_empty() {
            raw_parts.push(InterpolationPart::Literal(text));
        }
        if let Some(expr) = expressions.get(i) {
            let lowered = super::lower_expression(expr, analysis, warnings);
            raw_parts.push(InterpolationPart::Expr(lowered));
        }
    }

    let mut parts: Vec<InterpolationPart> = Vec::new();
    for part in raw_parts {
        match (parts.last_mut(), &part) {
            (Some(InterpolationPart::Literal(prev)), InterpolationPart::Literal(next)) => prev.push_str(next),
            _ => parts.push(part),
        }
    }

    Expression::StringInterpolation { parts }
}
