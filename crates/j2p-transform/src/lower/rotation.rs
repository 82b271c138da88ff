//! `RotL`/`RotR` bitwise rotation lowering (§4.3.6 "Rotation").

use crate::analysis::FileAnalysis;
use crate::warning::Warning;
use j2p_il::IlNode;
use j2p_php_ast::{BinaryOp, Expression};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Left,
    Right,
}

fn mask_expression(bits: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Expression {
    if bits.kind() == "Literal" {
        if let Some(n) = bits.literal_f64() {
            return Expression::int((1i64 << (n as i64)) - 1);
        }
    }
    let lowered_bits = super::lower_expression(bits, analysis, warnings);
    Expression::binary(BinaryOp::Sub, Expression::binary(BinaryOp::Shl, Expression::int(1), lowered_bits), Expression::int(1))
}

/// `RotL(v, n, bits)` → `(($v << $n) | ($v >> (bits - $n))) & mask`;
/// `RotR` swaps the shift directions.
pub fn lower_rotation(
    direction: RotationDirection,
    value: &IlNode,
    amount: &IlNode,
    bits: &IlNode,
    analysis: &mut FileAnalysis,
    warnings: &mut Vec<Warning>,
) -> Expression {
    let lowered_value = super::lower_expression(value, analysis, warnings);
    let lowered_amount = super::lower_expression(amount, analysis, warnings);
    let lowered_bits = super::lower_expression(bits, analysis, warnings);

    let (fwd_op, back_op) = match direction {
        RotationDirection::Left => (BinaryOp::Shl, BinaryOp::Shr),
        RotationDirection::Right => (BinaryOp::Shr, BinaryOp::Shl),
    };

    let forward = Expression::binary(fwd_op, lowered_value.clone(), lowered_amount.clone());
    let remainder = Expression::binary(BinaryOp::Sub, lowered_bits, lowered_amount);
    let backward = Expression::binary(back_op, lowered_value, remainder);
    let combined = Expression::binary(BinaryOp::BitOr, forward, backward);
    let mask = mask_expression(bits, analysis, warnings);
    Expression::binary(BinaryOp::BitAnd, combined, mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ident(name: &str) -> IlNode {
        IlNode::from_value(json!({"type": "Identifier", "name": name}))
    }

    fn lit(value: i64) -> IlNode {
        IlNode::from_value(json!({"type": "Literal", "value": value}))
    }

    #[test]
    fn rotl_with_constant_bits_folds_mask_to_literal() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let result = lower_rotation(RotationDirection::Left, &ident("v"), &ident("n"), &lit(32), &mut analysis, &mut warnings);
        assert_eq!(
            result,
            Expression::binary(
                BinaryOp::BitAnd,
                Expression::binary(
                    BinaryOp::BitOr,
                    Expression::binary(BinaryOp::Shl, Expression::var("v"), Expression::var("n")),
                    Expression::binary(BinaryOp::Shr, Expression::var("v"), Expression::binary(BinaryOp::Sub, Expression::int(32), Expression::var("n")))
                ),
                Expression::int(0xFFFF_FFFF)
            )
        );
    }

    #[test]
    fn rotr_swaps_shift_directions() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let result = lower_rotation(RotationDirection::Right, &ident("v"), &ident("n"), &lit(8), &mut analysis, &mut warnings);
        assert_eq!(
            result,
            Expression::binary(
                BinaryOp::BitAnd,
                Expression::binary(
                    BinaryOp::BitOr,
                    Expression::binary(BinaryOp::Shr, Expression::var("v"), Expression::var("n")),
                    Expression::binary(BinaryOp::Shl, Expression::var("v"), Expression::binary(BinaryOp::Sub, Expression::int(8), Expression::var("n")))
                ),
                Expression::int(0xFF)
            )
        );
    }
}
