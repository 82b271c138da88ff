//! Class declaration transformation (§4.3.3).

use crate::analysis::FileAnalysis;
use crate::constant::{constant_value, is_constant_expression};
use crate::error::TransformError;
use crate::lower::lower_expression;
use crate::method::{capture_globals, transform_block, transform_parameters};
use crate::naming::{is_private_by_convention, strip_leading_underscore, to_php_identifier};
use crate::property::infer_property_type;
use crate::sets::{is_base_class_property, is_framework_type};
use crate::warning::Warning;
use j2p_il::IlNode;
use j2p_php_ast::{Class, Expression, Method, Property, Type, Visibility};
use std::collections::{HashMap, HashSet};

/// `extends AlgorithmFramework.X` unwraps to `X`; a plain `extends X` stays
/// `X` (§4.3.3 step 1).
fn resolve_super_class(node: &IlNode) -> Option<String> {
    let super_class = node.get("superClass")?;
    match super_class.kind() {
        "Identifier" => super_class.get_str("name").map(str::to_string),
        "MemberExpression" => super_class.get("property").and_then(|p| p.get_str("name").map(str::to_string)),
        _ => None,
    }
}

/// Generic recursive walk over every nested statement/expression shape the
/// IL AST uses, mirroring [`crate::prepass`]'s walker but exposed here for
/// the `allPropertyUsages` collection pass.
///
/// `body` appears in both field lists: a literal array of statements
/// (`Program`/`BlockStatement`) is reached via `get_array`, while a single
/// nested `BlockStatement`/`ClassBody` node (`FunctionDeclaration`,
/// `ClassDeclaration`, …) is reached via `get` so the walk descends past
/// the function/class boundary rather than stopping at it.
fn for_each_child(node: &IlNode, visit: &mut impl FnMut(&IlNode)) {
    const LIST_FIELDS: &[&str] = &["body", "declarations", "elements", "properties", "arguments", "params", "expressions", "cases", "consequent"];
    const NODE_FIELDS: &[&str] = &[
        "init", "test", "update", "expression", "left", "right", "argument", "object", "property", "callee", "id", "key", "value", "block",
        "handler", "finalizer", "alternate", "discriminant", "superClass", "body",
    ];
    for field in LIST_FIELDS {
        for child in node.get_array(field) {
            visit(&child);
        }
    }
    for field in NODE_FIELDS {
        if let Some(child) = node.get(field) {
            visit(&child);
        }
    }
}

fn this_property_assignment(node: &IlNode) -> Option<(String, IlNode)> {
    if node.kind() != "AssignmentExpression" || node.get_str("operator") != Some("=") {
        return None;
    }
    let target = node.get("left")?;
    if target.kind() != "MemberExpression" || target.get_bool("computed") {
        return None;
    }
    let object = target.get("object")?;
    if object.kind() != "ThisExpression" {
        return None;
    }
    let name = target.get("property")?.get_str("name")?.to_string();
    let value = node.get("right")?;
    Some((name, value))
}

/// Walks `node` (recursively, including nested blocks) collecting every
/// `this.x = value` assignment, first occurrence wins for the returned
/// type (§4.3.3 step 2, §4.3.4).
fn collect_property_usages(node: &IlNode, analysis: &mut FileAnalysis, out: &mut HashMap<String, Type>) {
    if let Some((name, value)) = this_property_assignment(node) {
        let ty = infer_property_type(&name, &value, analysis);
        out.entry(name).or_insert(ty);
    }
    for_each_child(node, &mut |child| collect_property_usages(child, analysis, out));
}

fn property_visibility(name: &str) -> Visibility {
    if is_private_by_convention(name) {
        Visibility::Private
    } else {
        Visibility::Public
    }
}

fn declared_property_name(raw_name: &str) -> String {
    if crate::naming::is_all_caps(raw_name) {
        raw_name.to_string()
    } else {
        to_php_identifier(strip_leading_underscore(raw_name))
    }
}

fn default_value_for(ty: &Type) -> Expression {
    if ty.is_array_like() {
        Expression::ArrayLiteral(Vec::new())
    } else {
        Expression::Literal(j2p_php_ast::Literal::Null)
    }
}

/// Constructor member: extracts the property declarations from its
/// `this.x = y` statements and translates the body, re-emitting those
/// assignments in place (§4.3.3 step 3, constructor bullet).
fn transform_constructor(
    member: &IlNode,
    analysis: &mut FileAnalysis,
    warnings: &mut Vec<Warning>,
    class_properties: &mut Vec<Property>,
    seen_properties: &mut HashSet<String>,
) -> Method {
    let value = member.get("value").unwrap_or_else(|| member.clone());
    let raw_params = value.get_array("params");
    let body_items = value.get("body").map(|b| b.get_array("body")).unwrap_or_default();
    let parameters = transform_parameters(&raw_params, &body_items, analysis, warnings);
    let param_names: HashSet<String> = parameters.iter().map(|p| p.name.clone()).collect();

    for item in &body_items {
        if item.kind() != "ExpressionStatement" {
            continue;
        }
        let Some(expr) = item.get("expression") else { continue };
        let Some((raw_name, raw_value)) = this_property_assignment(&expr) else { continue };
        let php_name = declared_property_name(&raw_name);
        if is_base_class_property(&php_name) || seen_properties.contains(&php_name) {
            continue;
        }
        seen_properties.insert(php_name.clone());
        let ty = infer_property_type(&raw_name, &raw_value, analysis);
        analysis.declare_variable_type(php_name.clone(), ty.clone());
        class_properties.push(Property {
            visibility: property_visibility(&raw_name),
            is_static: false,
            is_readonly: false,
            ty: Some(ty),
            name: php_name,
            default_value: None,
        });
    }

    analysis.push_scope();
    let mut body = transform_block(&body_items, analysis, warnings);
    analysis.pop_scope();
    capture_globals(&mut body, analysis, &param_names);

    Method { visibility: Visibility::Public, is_static: false, is_final: false, is_abstract: false, name: "__construct".to_string(), parameters, return_type: None, body: Some(body), doc_comment: None }
}

fn transform_accessor(member: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>, prefix: &str, return_type: Option<Type>) -> Method {
    let value = member.get("value").unwrap_or_else(|| member.clone());
    let raw_name = member.get("key").and_then(|k| k.get_str("name").map(str::to_string)).unwrap_or_else(|| "value".to_string());
    let name = format!("{prefix}_{}", to_php_identifier(&raw_name));
    let body_items = value.get("body").map(|b| b.get_array("body")).unwrap_or_default();
    let parameters = transform_parameters(&value.get_array("params"), &body_items, analysis, warnings);
    let param_names: HashSet<String> = parameters.iter().map(|p| p.name.clone()).collect();
    analysis.push_scope();
    let mut body = transform_block(&body_items, analysis, warnings);
    analysis.pop_scope();
    capture_globals(&mut body, analysis, &param_names);
    Method { visibility: Visibility::Public, is_static: false, is_final: false, is_abstract: false, name, parameters, return_type, body: Some(body), doc_comment: None }
}

fn transform_regular_method(member: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>, used_names: &HashSet<String>) -> Method {
    let value = member.get("value").unwrap_or_else(|| member.clone());
    let raw_name = member.get("key").and_then(|k| k.get_str("name").map(str::to_string)).unwrap_or_else(|| "method".to_string());
    let mut name = to_php_identifier(&raw_name);
    if used_names.contains(&name) {
        name = format!("{name}_impl");
    }
    let is_static = member.get_bool("static");
    let body_items = value.get("body").map(|b| b.get_array("body")).unwrap_or_default();
    let parameters = transform_parameters(&value.get_array("params"), &body_items, analysis, warnings);
    let param_names: HashSet<String> = parameters.iter().map(|p| p.name.clone()).collect();
    analysis.push_scope();
    let mut body = transform_block(&body_items, analysis, warnings);
    analysis.pop_scope();
    capture_globals(&mut body, analysis, &param_names);
    Method { visibility: Visibility::Public, is_static, is_final: false, is_abstract: false, name, parameters, return_type: None, body: Some(body), doc_comment: None }
}

/// A `PropertyDefinition` class-body member: an instance/static field with
/// an optional initializer (§4.3.3 step 3, "Property definitions ...
/// handled separately").
fn transform_property_definition(member: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Property {
    let raw_name = member.get("key").and_then(|k| k.get_str("name").map(str::to_string)).unwrap_or_else(|| "field".to_string());
    let php_name = declared_property_name(&raw_name);
    let is_static = member.get_bool("static");
    let default_value = member.get("value").map(|v| lower_expression(&v, analysis, warnings));
    let ty = member.get("value").map(|v| infer_property_type(&raw_name, &v, analysis));
    Property { visibility: property_visibility(&raw_name), is_static, is_readonly: false, ty, name: php_name, default_value }
}

/// A `StaticBlock` class-body member flattens into static property
/// initializers where it assigns a single static member, the common shape
/// in this domain (§4.3.3 step 3, "static blocks flatten into the class's
/// static-init sequence").
fn transform_static_block(member: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>, class_name: &str) -> Vec<Property> {
    let mut properties = Vec::new();
    for item in member.get_array("body") {
        if item.kind() != "ExpressionStatement" {
            continue;
        }
        let Some(expr) = item.get("expression") else { continue };
        if expr.kind() != "AssignmentExpression" {
            continue;
        }
        let Some(target) = expr.get("left") else { continue };
        if target.kind() != "MemberExpression" || target.get_bool("computed") {
            continue;
        }
        let Some(object) = target.get("object") else { continue };
        let is_self_reference = object.get_str("name") == Some(class_name) || object.kind() == "ThisExpression";
        if !is_self_reference {
            continue;
        }
        let Some(raw_name) = target.get("property").and_then(|p| p.get_str("name").map(str::to_string)) else { continue };
        let Some(value) = expr.get("right") else { continue };
        let php_name = declared_property_name(&raw_name);
        let ty = infer_property_type(&raw_name, &value, analysis);
        let default_value = if is_constant_expression(&value) { constant_value(&value) } else { lower_expression(&value, analysis, warnings) };
        properties.push(Property { visibility: property_visibility(&raw_name), is_static: true, is_readonly: false, ty: Some(ty), name: php_name, default_value: Some(default_value) });
    }
    properties
}

pub fn transform_class(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Result<Class, TransformError> {
    let raw_name = node.get("id").and_then(|id| id.get_str("name").map(str::to_string)).ok_or(TransformError::MissingClassName)?;

    let extends_class = resolve_super_class(node);
    if let Some(super_name) = &extends_class {
        if is_framework_type(super_name) {
            analysis.framework_classes.insert(super_name.clone());
        }
    }
    analysis.class_instances.insert(to_php_identifier(&raw_name));

    let members = node.get("body").map(|b| b.get_array("body")).unwrap_or_default();

    let mut all_usages = HashMap::new();
    for member in &members {
        if let Some(value) = member.get("value") {
            if let Some(body) = value.get("body") {
                for stmt in body.get_array("body") {
                    collect_property_usages(&stmt, analysis, &mut all_usages);
                }
            }
        }
    }

    let mut properties = Vec::new();
    let mut methods = Vec::new();
    let mut used_names: HashSet<String> = HashSet::from(["__construct".to_string()]);
    let mut seen_constructor_properties = HashSet::new();

    for member in &members {
        match member.kind() {
            "MethodDefinition" => match member.get_str("kind") {
                Some("constructor") => {
                    let constructor = transform_constructor(member, analysis, warnings, &mut properties, &mut seen_constructor_properties);
                    methods.push(constructor);
                }
                Some("get") => {
                    let method = transform_accessor(member, analysis, warnings, "get", None);
                    used_names.insert(method.name.clone());
                    methods.push(method);
                }
                Some("set") => {
                    let method = transform_accessor(member, analysis, warnings, "set", Some(Type::Void));
                    used_names.insert(method.name.clone());
                    methods.push(method);
                }
                _ => {
                    let method = transform_regular_method(member, analysis, warnings, &used_names);
                    used_names.insert(method.name.clone());
                    methods.push(method);
                }
            },
            "PropertyDefinition" => properties.push(transform_property_definition(member, analysis, warnings)),
            "StaticBlock" => properties.extend(transform_static_block(member, analysis, warnings, &raw_name)),
            other => warnings.push(Warning::new(crate::warning::WarningPhase::ClassTransform, format!("unhandled class member kind `{other}`"))),
        }
    }

    let declared_names: HashSet<String> = properties.iter().map(|p| p.name.clone()).collect();
    for (raw_name, ty) in all_usages {
        let php_name = declared_property_name(&raw_name);
        if is_base_class_property(&php_name) || declared_names.contains(&php_name) {
            continue;
        }
        let default_value = default_value_for(&ty);
        properties.push(Property { visibility: property_visibility(&raw_name), is_static: false, is_readonly: false, ty: Some(ty), name: php_name, default_value: Some(default_value) });
    }

    Ok(Class { name: raw_name, is_final: false, is_abstract: false, is_readonly: false, extends_class, implements_interfaces: Vec::new(), properties, methods, doc_comment: None })
}
