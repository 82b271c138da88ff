//! Member-access lowering: the `Math`/`Number`/`OpCodes`/`ENUM_OBJECTS`
//! special cases, `.length`, and the array-vs-object disambiguation
//! cascade (§4.3.6 "Member access `a.b`").

use super::length::lower_length_access;
use crate::analysis::FileAnalysis;
use crate::naming::{is_all_caps, is_pascal_case, strip_leading_underscore, to_php_identifier};
use crate::sets::{is_enum_object, is_framework_type};
use crate::warning::{unhandled_expression, Warning};
use j2p_il::IlNode;
use j2p_php_ast::{ClassRef, Expression, UnaryExpression, UnaryOp};

fn effective_base_name(node: &IlNode) -> Option<String> {
    match node.kind() {
        "Identifier" => node.get_str("name").map(str::to_string),
        "MemberExpression" if !node.get_bool("computed") => {
            node.get("property").and_then(|p| p.get_str("name").map(str::to_string))
        }
        _ => None,
    }
}

fn number_constant_expr(name: &str) -> Expression {
    match name {
        "MAX_SAFE_INTEGER" => Expression::Identifier("PHP_INT_MAX".to_string()),
        "MIN_SAFE_INTEGER" => Expression::Identifier("PHP_INT_MIN".to_string()),
        "EPSILON" => Expression::Identifier("PHP_FLOAT_EPSILON".to_string()),
        "MAX_VALUE" => Expression::Identifier("PHP_FLOAT_MAX".to_string()),
        "MIN_VALUE" => Expression::Identifier("PHP_FLOAT_MIN".to_string()),
        "POSITIVE_INFINITY" => Expression::Identifier("INF".to_string()),
        "NEGATIVE_INFINITY" => Expression::Unary(UnaryExpression {
            op: UnaryOp::Neg,
            operand: Box::new(Expression::Identifier("INF".to_string())),
        }),
        "NaN" => Expression::Identifier("NAN".to_string()),
        other => Expression::Identifier(format!("PHP_{other}")),
    }
}

/// `global.OpCodes.MASK32` and its sibling width masks inline to integer
/// literals rather than the generic `ENUM_OBJECTS` string-literal rule,
/// even though `OpCodes` is itself an enum object (§4.3.6).
fn opcodes_mask_literal(name: &str) -> Option<Expression> {
    let value: i64 = match name {
        "MASK32" => 0xFFFF_FFFF,
        "MASK16" => 0xFFFF,
        "MASK8" => 0xFF,
        "MASK4" => 0xF,
        _ => return None,
    };
    Some(Expression::int(value))
}

pub fn lower_member_access(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Expression {
    let Some(object) = node.get("object") else {
        return unhandled_expression("MemberExpression", warnings);
    };
    let Some(property) = node.get("property") else {
        return unhandled_expression("MemberExpression", warnings);
    };
    let computed = node.get_bool("computed");
    let prop_name = property.get_str("name").unwrap_or("").to_string();

    if !computed {
        if object.kind() == "Identifier" && object.get_str("name") == Some("Math") {
            return Expression::Identifier(format!("M_{}", prop_name.to_uppercase()));
        }
        if object.kind() == "Identifier" && object.get_str("name") == Some("Number") {
            return number_constant_expr(&prop_name);
        }
        if let Some(base_name) = effective_base_name(&object) {
            if base_name == "OpCodes" {
                if let Some(literal) = opcodes_mask_literal(&prop_name) {
                    return literal;
                }
            }
            if is_enum_object(&base_name) {
                return Expression::string(prop_name);
            }
        }
        if prop_name == "length" {
            return lower_length_access(&object, analysis, warnings);
        }
    }

    let is_this = object.kind() == "ThisExpression" || object.get_str("name") == Some("this");
    let object_is_identifier = object.kind() == "Identifier";
    let base_name = object.get_str("name").unwrap_or("").to_string();

    if object_is_identifier && analysis.class_instances.contains(&base_name) {
        let lowered_object = super::lower_expression(&object, analysis, warnings);
        return Expression::PropertyAccess {
            object: Box::new(lowered_object),
            property: to_php_identifier(&prop_name),
            nullsafe: false,
        };
    }

    if object_is_identifier
        && is_pascal_case(&base_name)
        && analysis.variable_type(&base_name).is_none()
        && !analysis.module_variables.contains(&base_name)
        && !is_framework_type(&base_name)
    {
        return Expression::StaticPropertyAccess {
            class: ClassRef::name(base_name),
            property: to_php_identifier(&prop_name),
        };
    }

    if object_is_identifier && analysis.is_array_like(&base_name) {
        let lowered_object = super::lower_expression(&object, analysis, warnings);
        let index = if computed {
            super::lower_expression(&property, analysis, warnings)
        } else {
            Expression::string(prop_name)
        };
        return Expression::ArrayAccess { array: Box::new(lowered_object), index: Some(Box::new(index)) };
    }

    if !computed && is_all_caps(&prop_name) && !is_this {
        let base_is_class_style = object_is_identifier && is_pascal_case(&base_name);
        let base_is_class_instance = object_is_identifier && analysis.class_instances.contains(&base_name);
        if !base_is_class_style && !base_is_class_instance {
            let lowered_object = super::lower_expression(&object, analysis, warnings);
            return Expression::ArrayAccess {
                array: Box::new(lowered_object),
                index: Some(Box::new(Expression::string(prop_name))),
            };
        }
    }

    if is_this {
        let stripped = strip_leading_underscore(&prop_name);
        if analysis.is_array_like(stripped) {
            let lowered_object = super::lower_expression(&object, analysis, warnings);
            return Expression::ArrayAccess {
                array: Box::new(lowered_object),
                index: Some(Box::new(Expression::string(stripped.to_string()))),
            };
        }
    }

    if computed || object.kind() == "CallExpression" {
        let lowered_object = super::lower_expression(&object, analysis, warnings);
        let index = if computed {
            super::lower_expression(&property, analysis, warnings)
        } else {
            Expression::string(prop_name)
        };
        return Expression::ArrayAccess { array: Box::new(lowered_object), index: Some(Box::new(index)) };
    }

    let final_name = if is_this {
        to_php_identifier(strip_leading_underscore(&prop_name))
    } else {
        to_php_identifier(&prop_name)
    };
    let lowered_object = super::lower_expression(&object, analysis, warnings);
    Expression::PropertyAccess { object: Box::new(lowered_object), property: final_name, nullsafe: false }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn member(object: serde_json::Value, property: serde_json::Value, computed: bool) -> IlNode {
        IlNode::from_value(json!({"type": "MemberExpression", "object": object, "property": property, "computed": computed}))
    }

    fn ident(name: &str) -> serde_json::Value {
        json!({"type": "Identifier", "name": name})
    }

    #[test]
    fn math_constant_lowers_to_m_prefixed_identifier() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = member(ident("Math"), ident("PI"), false);
        assert_eq!(lower_member_access(&n, &mut analysis, &mut warnings), Expression::Identifier("M_PI".into()));
    }

    #[test]
    fn opcodes_mask32_inlines_to_integer() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = member(ident("OpCodes"), ident("MASK32"), false);
        assert_eq!(lower_member_access(&n, &mut analysis, &mut warnings), Expression::int(0xFFFF_FFFF));
    }

    #[test]
    fn enum_object_member_lowers_to_string_literal() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = member(ident("TestStatus"), ident("PASSED"), false);
        assert_eq!(lower_member_access(&n, &mut analysis, &mut warnings), Expression::string("PASSED"));
    }

    #[test]
    fn array_like_base_emits_array_access() {
        let mut analysis = FileAnalysis::new();
        analysis.mark_array_property("table");
        let mut warnings = Vec::new();
        let n = member(ident("table"), ident("key"), false);
        assert_eq!(
            lower_member_access(&n, &mut analysis, &mut warnings),
            Expression::ArrayAccess { array: Box::new(Expression::var("table")), index: Some(Box::new(Expression::string("key"))) }
        );
    }

    #[test]
    fn class_instance_base_forces_property_access() {
        let mut analysis = FileAnalysis::new();
        analysis.class_instances.insert("cipher".to_string());
        let mut warnings = Vec::new();
        let n = member(ident("cipher"), ident("rounds"), false);
        assert_eq!(
            lower_member_access(&n, &mut analysis, &mut warnings),
            Expression::PropertyAccess { object: Box::new(Expression::var("cipher")), property: "rounds".into(), nullsafe: false }
        );
    }

    #[test]
    fn pascal_case_base_is_static_property_access() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = member(ident("AlgorithmFramework"), ident("version"), false);
        assert_eq!(
            lower_member_access(&n, &mut analysis, &mut warnings),
            Expression::StaticPropertyAccess { class: ClassRef::name("AlgorithmFramework"), property: "version".into() }
        );
    }

    #[test]
    fn plain_this_property_access_strips_underscore() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = member(json!({"type": "ThisExpression"}), ident("_rounds"), false);
        assert_eq!(
            lower_member_access(&n, &mut analysis, &mut warnings),
            Expression::PropertyAccess { object: Box::new(Expression::var("this")), property: "rounds".into(), nullsafe: false }
        );
    }

    #[test]
    fn computed_member_emits_array_access_with_lowered_index() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let n = member(ident("buf"), ident("i"), true);
        assert_eq!(
            lower_member_access(&n, &mut analysis, &mut warnings),
            Expression::ArrayAccess { array: Box::new(Expression::var("buf")), index: Some(Box::new(Expression::var("i"))) }
        );
    }
}
