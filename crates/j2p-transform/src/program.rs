//! Top-level algorithm (§4.3.1): turns a `Program`'s body into the file's
//! `TopLevelItem` sequence, plus any prepended framework stubs.

use crate::analysis::FileAnalysis;
use crate::class_transform::transform_class;
use crate::constant::constant_value;
use crate::error::TransformError;
use crate::lower::lower_expression;
use crate::method::transform_block;
use crate::naming::to_php_identifier;
use crate::options::GenerateOptions;
use crate::sets::is_framework_type;
use crate::warning::Warning;
use j2p_il::{is_iife_wrapper, unwrap_iife_body, IlNode, Program};
use j2p_php_ast::{Class, Expression, Method, Parameter, TopLevelItem, Visibility};
use std::collections::HashSet;

fn framework_stub(name: &str) -> Class {
    let mut class = Class::new(name);
    class.methods.push(Method::new("__construct"));
    class
}

fn transform_function_declaration(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> TopLevelItem {
    let name = node.get("id").and_then(|id| id.get_str("name").map(str::to_string)).unwrap_or_else(|| "anonymous".to_string());
    let php_name = to_php_identifier(&name);
    analysis.module_variables.insert(php_name.clone());

    let raw_params = node.get_array("params");
    let body_items = node.get("body").map(|b| b.get_array("body")).unwrap_or_default();
    let parameters: Vec<Parameter> = crate::method::transform_parameters(&raw_params, &body_items, analysis, warnings);
    let param_names: HashSet<String> = parameters.iter().map(|p| p.name.clone()).collect();

    analysis.push_scope();
    let mut body = transform_block(&body_items, analysis, warnings);
    analysis.pop_scope();
    crate::method::capture_globals(&mut body, analysis, &param_names);

    TopLevelItem::Function(j2p_php_ast::FunctionDecl { name: php_name, parameters, return_type: None, body, doc_comment: None })
}

/// A top-level `VariableDeclaration`: either a PHP `const` (or a sequence
/// of them, for destructured arrays) or a module-scope assignment
/// statement that registers the name in `moduleVariables` (§4.3.1 step 2).
fn transform_top_level_variable(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Vec<TopLevelItem> {
    let mut items = Vec::new();
    for declarator in node.get_array("declarations") {
        let Some(id) = declarator.get("id") else { continue };
        let init = declarator.get("init");

        match id.kind() {
            "Identifier" => {
                let name = id.get_str("name").unwrap_or("tmp").to_string();
                if let Some(const_name) = analysis.declared_constants.get(&name).cloned() {
                    let value = init.as_ref().map(constant_value).unwrap_or(Expression::Literal(j2p_php_ast::Literal::Null));
                    items.push(TopLevelItem::Const(j2p_php_ast::Const { visibility: Visibility::Public, name: const_name, ty: None, value }));
                } else {
                    let php_name = to_php_identifier(&name);
                    analysis.module_variables.insert(php_name.clone());
                    let value = init.as_ref().map(|v| lower_expression(v, analysis, warnings)).unwrap_or(Expression::Literal(j2p_php_ast::Literal::Null));
                    if let Some(init_node) = &init {
                        analysis.declare_variable_type(php_name.clone(), j2p_types::infer_value_shape(init_node));
                    }
                    items.push(TopLevelItem::ExpressionStatement(Expression::assign(Expression::var(php_name), value)));
                }
            }
            "ArrayPattern" => {
                let Some(init_node) = init else { continue };
                let lowered_init = lower_expression(&init_node, analysis, warnings);
                for (index, element) in id.get_array("elements").into_iter().enumerate() {
                    if element.is_null_value() {
                        continue;
                    }
                    let Some(name) = element.get_str("name").map(str::to_string) else { continue };
                    let access = Expression::ArrayAccess { array: Box::new(lowered_init.clone()), index: Some(Box::new(Expression::int(index as i64))) };
                    if let Some(const_name) = analysis.declared_constants.get(&name).cloned() {
                        items.push(TopLevelItem::Const(j2p_php_ast::Const { visibility: Visibility::Public, name: const_name, ty: None, value: access }));
                    } else {
                        let php_name = to_php_identifier(&name);
                        analysis.module_variables.insert(php_name.clone());
                        items.push(TopLevelItem::ExpressionStatement(Expression::assign(Expression::var(php_name), access)));
                    }
                }
            }
            _ => {}
        }
    }
    items
}

fn transform_top_level_item(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Result<Vec<TopLevelItem>, TransformError> {
    if is_iife_wrapper(node) {
        let mut items = Vec::new();
        for stmt in unwrap_iife_body(node) {
            items.extend(transform_top_level_item(&stmt, analysis, warnings)?);
        }
        return Ok(items);
    }

    let items = match node.kind() {
        "VariableDeclaration" => transform_top_level_variable(node, analysis, warnings),
        "FunctionDeclaration" => vec![transform_function_declaration(node, analysis, warnings)],
        "ClassDeclaration" => vec![TopLevelItem::Class(transform_class(node, analysis, warnings)?)],
        "EmptyStatement" => Vec::new(),
        "ExpressionStatement" => {
            let Some(expr) = node.get("expression") else { return Ok(Vec::new()) };
            vec![TopLevelItem::ExpressionStatement(lower_expression(&expr, analysis, warnings))]
        }
        other => {
            warnings.push(Warning::new(crate::warning::WarningPhase::MethodBody, format!("unsupported top-level node `{other}`")));
            vec![TopLevelItem::RawCode(format!("// UNHANDLED_TOP_LEVEL_{other}"))]
        }
    };
    Ok(items)
}

/// Collects the set of framework base-class names actually `extends`-ed
/// anywhere in the program, for the framework-stub prepend step
/// (§4.3.1.3). Runs a lightweight scan ahead of the main pass so stubs can
/// be prepended before the translated items even though the class that
/// needs them may appear later in the file.
fn collect_extended_framework_types(items: &[IlNode]) -> HashSet<String> {
    let mut found = HashSet::new();
    for item in items {
        if is_iife_wrapper(item) {
            found.extend(collect_extended_framework_types(&unwrap_iife_body(item)));
            continue;
        }
        if item.kind() == "ClassDeclaration" {
            if let Some(super_class) = item.get("superClass") {
                let name = match super_class.kind() {
                    "Identifier" => super_class.get_str("name").map(str::to_string),
                    "MemberExpression" => super_class.get("property").and_then(|p| p.get_str("name").map(str::to_string)),
                    _ => None,
                };
                if let Some(name) = name {
                    if is_framework_type(&name) {
                        found.insert(name);
                    }
                }
            }
        }
    }
    found
}

/// The full §4.3.1 top-level algorithm: pre-pass, main pass, framework-stub
/// prepend. The caller is expected to have already run
/// [`crate::prepass::prepass`] and seeded `analysis.declared_constants`
/// with its result.
pub fn transform_program(program: &Program, analysis: &mut FileAnalysis, options: &GenerateOptions, warnings: &mut Vec<Warning>) -> Result<Vec<TopLevelItem>, TransformError> {
    let mut items = Vec::new();

    if !options.skip_framework_stubs {
        let mut stub_names: Vec<String> = collect_extended_framework_types(&program.body).into_iter().collect();
        stub_names.sort();
        for name in stub_names {
            items.push(TopLevelItem::Class(framework_stub(&name)));
        }
    }

    for node in &program.body {
        items.extend(transform_top_level_item(node, analysis, warnings)?);
    }

    Ok(items)
}
