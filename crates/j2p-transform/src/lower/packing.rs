//! `PackBytes`/`UnpackBytes` lowering (§4.3.6 "Pack/Unpack bytes").

use crate::analysis::FileAnalysis;
use crate::warning::Warning;
use j2p_il::IlNode;
use j2p_php_ast::{ArrayElement, BinaryOp, Expression};

fn shift_amount(index: usize, count: usize, endian: &str) -> usize {
    if endian == "little" {
        index * 8
    } else {
        (count - 1 - index) * 8
    }
}

fn try_fold_constant_pack(bytes: &[IlNode], endian: &str) -> Option<i64> {
    let mut value: i64 = 0;
    for (i, byte) in bytes.iter().enumerate() {
        if byte.kind() != "Literal" {
            return None;
        }
        let n = byte.literal_f64()?;
        let shift = shift_amount(i, bytes.len(), endian);
        value |= (n as i64) << shift;
    }
    Some(value)
}

/// `PackBytes(b0..bN, endian)` folds to a single integer literal when every
/// byte is a constant; otherwise it expands to a parenthesised `<<`/`|`
/// chain in endian order.
pub fn lower_pack_bytes(bytes: &[IlNode], endian: &str, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Expression {
    if let Some(folded) = try_fold_constant_pack(bytes, endian) {
        return Expression::int(folded);
    }
    let count = bytes.len();
    let mut combined: Option<Expression> = None;
    for (i, byte) in bytes.iter().enumerate() {
        let shift = shift_amount(i, count, endian);
        let lowered_byte = super::lower_expression(byte, analysis, warnings);
        let shifted = if shift == 0 {
            lowered_byte
        } else {
            Expression::binary(BinaryOp::Shl, lowered_byte, Expression::int(shift as i64))
        };
        combined = Some(match combined {
            None => shifted,
            Some(acc) => Expression::binary(BinaryOp::BitOr, acc, shifted),
        });
    }
    combined.unwrap_or_else(|| Expression::int(0))
}

/// `UnpackBytes(v, bits, endian)` expands to an array literal of
/// `(v >> k) & 0xFF` elements in endian order. The shift is always written
/// explicitly (even `>> 0` for the low byte) so that precedence stays
/// unambiguous when `v` itself contains a `|` expression.
pub fn lower_unpack_bytes(value: &IlNode, bits: usize, endian: &str, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Expression {
    let byte_count = (bits / 8).max(1);
    let lowered_value = super::lower_expression(value, analysis, warnings);
    let mut elements = Vec::with_capacity(byte_count);
    for i in 0..byte_count {
        let shift = shift_amount(i, byte_count, endian);
        let shifted = Expression::binary(BinaryOp::Shr, lowered_value.clone(), Expression::int(shift as i64));
        let masked = Expression::binary(BinaryOp::BitAnd, shifted, Expression::int(0xFF));
        elements.push(ArrayElement { key: None, value: masked, spread: false });
    }
    Expression::ArrayLiteral(elements)
}
