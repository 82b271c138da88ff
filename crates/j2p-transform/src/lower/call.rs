//! Call-expression lowering (§4.3.6 "Call expression"): the JS built-in
//! dispatch table, `push.apply` merge-assignment, the closure-variable
//! bareword-vs-`$f(...)` distinction, and hand-off to the rotation/
//! pack/typed-array lowering rules.

use super::packing::{lower_pack_bytes, lower_unpack_bytes};
use super::rotation::{lower_rotation, RotationDirection};
use crate::analysis::FileAnalysis;
use crate::naming::to_php_identifier;
use crate::warning::{unhandled_expression, Warning};
use j2p_il::IlNode;
use j2p_php_ast::{Argument, Expression, Type};
use j2p_types::infer_value_shape;

fn lower_args(args: &[IlNode], analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Vec<Argument> {
    args.iter().map(|a| Argument::positional(super::lower_expression(a, analysis, warnings))).collect()
}

fn call_fn(name: &str, args: Vec<Expression>) -> Expression {
    Expression::FunctionCall { callee: Box::new(Expression::Identifier(name.to_string())), args: args.into_iter().map(Argument::positional).collect() }
}

/// `Math.*`/`Number.*`/`JSON.*`/`Object.*`/`Array.isArray`/`Array.from`/
/// `String.fromCharCode` static-namespace calls.
fn static_namespace_call(object: &str, property: &str, args: Vec<Expression>) -> Option<Expression> {
    match (object, property) {
        ("Math", "floor") => Some(call_fn("floor", args)),
        ("Math", "ceil") => Some(call_fn("ceil", args)),
        ("Math", "round") => Some(call_fn("round", args)),
        ("Math", "abs") => Some(call_fn("abs", args)),
        ("Math", "max") => Some(call_fn("max", args)),
        ("Math", "min") => Some(call_fn("min", args)),
        ("Math", "pow") => Some(call_fn("pow", args)),
        ("Math", "sqrt") => Some(call_fn("sqrt", args)),
        ("Math", "random") => Some(call_fn("mt_rand", args)),
        ("Number", "isInteger") => Some(call_fn("is_int", args)),
        ("Number", "isFinite") => Some(call_fn("is_finite", args)),
        ("Number", "parseInt") => Some(Expression::Cast { target_type: j2p_php_ast::CastType::Int, expr: Box::new(args.into_iter().next().unwrap_or(Expression::int(0))) }),
        ("Number", "parseFloat") => Some(Expression::Cast { target_type: j2p_php_ast::CastType::Float, expr: Box::new(args.into_iter().next().unwrap_or(Expression::int(0))) }),
        ("JSON", "stringify") => Some(call_fn("json_encode", args)),
        ("JSON", "parse") => {
            let mut args = args;
            args.push(Expression::Literal(j2p_php_ast::Literal::Bool(true)));
            Some(call_fn("json_decode", args))
        }
        ("Object", "keys") => Some(call_fn("array_keys", args)),
        ("Object", "values") => Some(call_fn("array_values", args)),
        ("Object", "entries") => Some(call_fn("array_map", args)),
        ("Object", "assign") => Some(call_fn("array_merge", args)),
        // `Object.freeze(<non-constant>)` has nothing to do at runtime in
        // PHP: arrays are already value types.
        ("Object", "freeze") => args.into_iter().next(),
        ("Array", "isArray") => Some(call_fn("is_array", args)),
        ("Array", "from") => Some(call_fn("array_values", args)),
        ("String", "fromCharCode") => Some(lower_from_char_code(args)),
        _ => None,
    }
}

fn lower_from_char_code(args: Vec<Expression>) -> Expression {
    if args.len() == 1 {
        call_fn("chr", args)
    } else {
        let chars: Vec<Expression> = args.into_iter().map(|a| call_fn("chr", vec![a])).collect();
        call_fn("implode", vec![Expression::string(""), Expression::ArrayLiteral(chars.into_iter().map(|c| j2p_php_ast::ArrayElement { key: None, value: c, spread: false }).collect())])
    }
}

/// `String.fromCharCode.apply(null, arr)`.
fn is_from_char_code_apply(callee: &IlNode) -> bool {
    if callee.kind() != "MemberExpression" {
        return false;
    }
    let Some(property) = callee.get("property") else { return false };
    if property.get_str("name") != Some("apply") {
        return false;
    }
    let Some(inner) = callee.get("object") else { return false };
    if inner.kind() != "MemberExpression" || inner.get_str("property").is_none() {
        return false;
    }
    let Some(inner_property) = inner.get("property") else { return false };
    let Some(inner_object) = inner.get("object") else { return false };
    inner_property.get_str("name") == Some("fromCharCode") && inner_object.get_str("name") == Some("String")
}

/// `arr1.push.apply(null, arr2)` / `Array.prototype.push.apply(arr, values)`
/// → `$arr = array_merge($arr, $values);` (§4.3.6 "Call expression").
fn is_push_apply(callee: &IlNode) -> Option<IlNode> {
    if callee.kind() != "MemberExpression" {
        return None;
    }
    let property = callee.get("property")?;
    if property.get_str("name") != Some("apply") {
        return None;
    }
    let inner = callee.get("object")?;
    if inner.kind() != "MemberExpression" {
        return None;
    }
    let inner_property = inner.get("property")?;
    if inner_property.get_str("name") != Some("push") {
        return None;
    }
    inner.get("object")
}

fn receiver_is_array(receiver: &IlNode, analysis: &FileAnalysis) -> bool {
    if receiver.kind() == "Identifier" {
        if let Some(name) = receiver.get_str("name") {
            if analysis.is_array_like(name) {
                return true;
            }
        }
    }
    infer_value_shape(receiver) == Type::Array
}

/// `receiver.method(args)` prototype-method dispatch, branching on whether
/// the receiver is known to be array- or string-shaped (§4.3.6 "Call
/// expression").
fn prototype_method_call(receiver_node: &IlNode, method: &str, receiver: Expression, args: Vec<Expression>, analysis: &FileAnalysis) -> Option<Expression> {
    let is_array = receiver_is_array(receiver_node, analysis);
    let with_receiver_first = |name: &str, mut rest: Vec<Expression>| {
        let mut all = vec![receiver.clone()];
        all.append(&mut rest);
        call_fn(name, all)
    };

    match method {
        "push" => Some(with_receiver_first("array_push", args)),
        "pop" => Some(call_fn("array_pop", vec![receiver])),
        "shift" => Some(call_fn("array_shift", vec![receiver])),
        "unshift" => Some(with_receiver_first("array_unshift", args)),
        "keys" => Some(call_fn("array_keys", vec![receiver])),
        "values" => Some(call_fn("array_values", vec![receiver])),
        "slice" if is_array => Some(with_receiver_first("array_slice", args)),
        "slice" => Some(with_receiver_first("substr", args)),
        "indexOf" if is_array => Some(with_receiver_first("array_search", args)),
        "indexOf" => Some(with_receiver_first("strpos", args)),
        "includes" if is_array => Some(with_receiver_first("in_array", args)),
        "includes" => Some(with_receiver_first("str_contains", args)),
        "concat" if is_array => Some(with_receiver_first("array_merge", args)),
        "concat" => {
            let mut parts = vec![receiver];
            parts.extend(args);
            let mut iter = parts.into_iter();
            let first = iter.next().unwrap_or(Expression::string(""));
            Some(iter.fold(first, |acc, e| Expression::binary(j2p_php_ast::BinaryOp::Concat, acc, e)))
        }
        "charAt" => Some(with_receiver_first("substr", args.into_iter().chain(std::iter::once(Expression::int(1))).collect())),
        "substring" => Some(with_receiver_first("substr", args)),
        "toLowerCase" => Some(call_fn("strtolower", vec![receiver])),
        "toUpperCase" => Some(call_fn("strtoupper", vec![receiver])),
        "padStart" => Some(pad(receiver, args, "STR_PAD_LEFT")),
        "padEnd" => Some(pad(receiver, args, "STR_PAD_RIGHT")),
        "replace" => Some(with_receiver_first("str_replace", swap_first_two(args))),
        "match" => Some(with_receiver_first("preg_match", args)),
        "split" => Some(with_receiver_first("explode", swap_first_two(args))),
        "join" => Some(with_receiver_first("implode", args)),
        "trim" => Some(call_fn("trim", vec![receiver])),
        "repeat" => Some(with_receiver_first("str_repeat", args)),
        "charCodeAt" => Some(call_fn("ord", vec![with_receiver_first("substr", args.into_iter().chain(std::iter::once(Expression::int(1))).collect())])),
        "toString" => Some(call_fn("strval", vec![receiver])),
        "map" => Some(swap_receiver_to_last("array_map", receiver, args)),
        "filter" => Some(swap_receiver_to_last("array_filter", receiver, args)),
        "reverse" => Some(call_fn("array_reverse", vec![receiver])),
        "fill" => Some(with_receiver_first("array_fill", args)),
        _ => None,
    }
}

fn swap_first_two(mut args: Vec<Expression>) -> Vec<Expression> {
    if args.len() >= 2 {
        args.swap(0, 1);
    }
    args
}

fn swap_receiver_to_last(name: &str, receiver: Expression, mut args: Vec<Expression>) -> Expression {
    args.push(receiver);
    call_fn(name, args)
}

fn pad(receiver: Expression, mut args: Vec<Expression>, pad_side: &str) -> Expression {
    let target_length = if args.is_empty() { Expression::int(0) } else { args.remove(0) };
    let pad_string = if args.is_empty() { Expression::string(" ") } else { args.remove(0) };
    call_fn("str_pad", vec![receiver, target_length, pad_string, Expression::Identifier(pad_side.to_string())])
}

pub fn lower_call_expression(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Expression {
    let Some(callee) = node.get("callee") else {
        return unhandled_expression("CallExpression", warnings);
    };
    let raw_args = node.get_array("arguments");

    if let Some(arr_receiver) = is_push_apply(&callee) {
        let mut args = raw_args;
        if args.is_empty() {
            return unhandled_expression("CallExpression", warnings);
        }
        let values = args.remove(args.len() - 1);
        let lowered_arr = super::lower_expression(&arr_receiver, analysis, warnings);
        let lowered_values = super::lower_expression(&values, analysis, warnings);
        let merged = call_fn("array_merge", vec![lowered_arr.clone(), lowered_values]);
        return Expression::assign(lowered_arr, merged);
    }

    if is_from_char_code_apply(&callee) {
        let values = raw_args.last().map(|v| super::lower_expression(v, analysis, warnings)).unwrap_or(Expression::ArrayLiteral(Vec::new()));
        return call_fn("array_reduce", vec![
            values,
            Expression::ArrowFunction {
                parameters: vec![j2p_php_ast::Parameter::new("carry"), j2p_php_ast::Parameter::new("code")],
                body: Box::new(Expression::binary(j2p_php_ast::BinaryOp::Concat, Expression::var("carry"), call_fn("chr", vec![Expression::var("code")]))),
            },
            Expression::string(""),
        ]);
    }

    match callee.kind() {
        "MemberExpression" if !callee.get_bool("computed") => {
            let (Some(object), Some(property)) = (callee.get("object"), callee.get("property")) else {
                return unhandled_expression("CallExpression", warnings);
            };
            let prop_name = property.get_str("name").unwrap_or("").to_string();

            if let Some(base_name) = object.get_str("name") {
                if base_name == "OpCodes" || base_name == "global" {
                    match prop_name.as_str() {
                        "RotL" | "RotR" => {
                            let direction = if prop_name == "RotL" { RotationDirection::Left } else { RotationDirection::Right };
                            if let [value, amount, bits] = &raw_args[..] {
                                return lower_rotation(direction, value, amount, bits, analysis, warnings);
                            }
                        }
                        "PackBytes" => {
                            if raw_args.len() >= 2 {
                                let (bytes, endian_arg) = raw_args.split_at(raw_args.len() - 1);
                                let endian = endian_arg[0].raw().get("value").and_then(|v| v.as_str()).unwrap_or("big").to_string();
                                return lower_pack_bytes(bytes, &endian, analysis, warnings);
                            }
                        }
                        "UnpackBytes" => {
                            if raw_args.len() >= 3 {
                                let bits = raw_args[1].literal_f64().unwrap_or(32.0) as usize;
                                let endian = raw_args[2].raw().get("value").and_then(|v| v.as_str()).unwrap_or("big").to_string();
                                return lower_unpack_bytes(&raw_args[0], bits, &endian, analysis, warnings);
                            }
                        }
                        _ => {}
                    }
                }
                let args = lower_args(&raw_args, analysis, warnings).into_iter().map(|a| a.value).collect();
                if let Some(expr) = static_namespace_call(base_name, &prop_name, args) {
                    return expr;
                }
            }

            let lowered_receiver = super::lower_expression(&object, analysis, warnings);
            let args = lower_args(&raw_args, analysis, warnings).into_iter().map(|a| a.value).collect::<Vec<_>>();
            if let Some(expr) = prototype_method_call(&object, &prop_name, lowered_receiver.clone(), args.clone(), analysis) {
                return expr;
            }
            Expression::MethodCall { object: Box::new(lowered_receiver), method: to_php_identifier(&prop_name), args: args.into_iter().map(Argument::positional).collect(), nullsafe: false }
        }
        "Identifier" => {
            let name = callee.get_str("name").unwrap_or("").to_string();
            let args = lower_args(&raw_args, analysis, warnings);
            if analysis.closure_variables.contains(&name) {
                Expression::FunctionCall { callee: Box::new(Expression::var(name)), args }
            } else {
                Expression::FunctionCall { callee: Box::new(Expression::Identifier(to_php_identifier(&name))), args }
            }
        }
        _ => {
            let lowered_callee = super::lower_expression(&callee, analysis, warnings);
            let args = lower_args(&raw_args, analysis, warnings);
            Expression::FunctionCall { callee: Box::new(lowered_callee), args }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ident(name: &str) -> serde_json::Value {
        json!({"type": "Identifier", "name": name})
    }

    #[test]
    fn math_floor_lowers_to_global_function() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = IlNode::from_value(json!({
            "type": "CallExpression",
            "callee": {"type": "MemberExpression", "object": ident("Math"), "property": ident("floor"), "computed": false},
            "arguments": [{"type": "Identifier", "name": "x"}]
        }));
        assert_eq!(
            lower_call_expression(&n, &mut analysis, &mut warnings),
            Expression::FunctionCall { callee: Box::new(Expression::Identifier("floor".into())), args: vec![Argument::positional(Expression::var("x"))] }
        );
    }

    #[test]
    fn closure_variable_call_uses_variable_callee() {
        let mut analysis = FileAnalysis::new();
        analysis.closure_variables.insert("cb".to_string());
        let mut warnings = Vec::new();
        let n = IlNode::from_value(json!({
            "type": "CallExpression",
            "callee": ident("cb"),
            "arguments": []
        }));
        assert_eq!(lower_call_expression(&n, &mut analysis, &mut warnings), Expression::FunctionCall { callee: Box::new(Expression::var("cb")), args: vec![] });
    }

    #[test]
    fn plain_function_call_uses_bareword_callee() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = IlNode::from_value(json!({"type": "CallExpression", "callee": ident("mixColumns"), "arguments": []}));
        assert_eq!(
            lower_call_expression(&n, &mut analysis, &mut warnings),
            Expression::FunctionCall { callee: Box::new(Expression::Identifier("mix_columns".into())), args: vec![] }
        );
    }

    #[test]
    fn array_slice_dispatches_to_array_slice() {
        let mut analysis = FileAnalysis::new();
        analysis.mark_array_property("blocks");
        let mut warnings = Vec::new();
        let n = IlNode::from_value(json!({
            "type": "CallExpression",
            "callee": {"type": "MemberExpression", "object": ident("blocks"), "property": ident("slice"), "computed": false},
            "arguments": [{"type": "Literal", "value": 0}, {"type": "Literal", "value": 4}]
        }));
        assert_eq!(
            lower_call_expression(&n, &mut analysis, &mut warnings),
            Expression::FunctionCall {
                callee: Box::new(Expression::Identifier("array_slice".into())),
                args: vec![Argument::positional(Expression::var("blocks")), Argument::positional(Expression::int(0)), Argument::positional(Expression::int(4))],
            }
        );
    }

    #[test]
    fn rotl_dispatches_to_rotation_lowering() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = IlNode::from_value(json!({
            "type": "CallExpression",
            "callee": {"type": "MemberExpression", "object": ident("OpCodes"), "property": ident("RotL"), "computed": false},
            "arguments": [ident("v"), ident("n"), {"type": "Literal", "value": 32}]
        }));
        let result = lower_call_expression(&n, &mut analysis, &mut warnings);
        assert!(matches!(result, Expression::Binary(_)));
    }

    #[test]
    fn push_apply_lowers_to_array_merge_assignment() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = IlNode::from_value(json!({
            "type": "CallExpression",
            "callee": {
                "type": "MemberExpression",
                "object": {"type": "MemberExpression", "object": ident("out"), "property": ident("push"), "computed": false},
                "property": ident("apply"),
                "computed": false
            },
            "arguments": [{"type": "Literal", "value": null}, ident("extra")]
        }));
        assert_eq!(
            lower_call_expression(&n, &mut analysis, &mut warnings),
            Expression::assign(Expression::var("out"), Expression::FunctionCall { callee: Box::new(Expression::Identifier("array_merge".into())), args: vec![Argument::positional(Expression::var("out")), Argument::positional(Expression::var("extra"))] })
        );
    }
}
