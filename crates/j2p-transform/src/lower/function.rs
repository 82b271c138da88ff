//! Arrow-function/closure lowering (§4.3.6 "Arrow function / closure").

use crate::analysis::FileAnalysis;
use crate::method;
use crate::warning::{unhandled_expression, Warning};
use j2p_il::IlNode;
use j2p_php_ast::{Expression, UseVar};
use std::collections::HashSet;

/// Never captured explicitly: PHP closures over instance methods already
/// have `$this` bound unless declared `static`.
const BUILTIN_CLOSURE_NAMES: &[&str] = &["this"];

/// `(a, b) => expr` or `(a, b) => { ... }` (also covers plain
/// `function (a, b) { ... }` expressions, which share the same use-list
/// computation).
pub fn lower_closure_like(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Expression {
    let raw_params = node.get_array("params");

    let Some(body_node) = node.get("body") else {
        return unhandled_expression(node.kind(), warnings);
    };

    if body_node.kind() != "BlockStatement" {
        let parameters = method::transform_parameters(&raw_params, &[], analysis, warnings);
        let expr = super::lower_expression(&body_node, analysis, warnings);
        return Expression::ArrowFunction { parameters, body: Box::new(expr) };
    }

    let body_items = body_node.get_array("body");
    let parameters = method::transform_parameters(&raw_params, &body_items, analysis, warnings);
    let param_names: HashSet<String> = parameters.iter().map(|p| p.name.clone()).collect();

    analysis.push_scope();
    let block = method::transform_block(&body_items, analysis, warnings);
    analysis.pop_scope();

    let mut referenced = HashSet::new();
    method::collect_block_variables(&block, &mut referenced);
    let mut declared = HashSet::new();
    method::collect_declared_names(&block, &mut declared);
    let mut written = HashSet::new();
    method::collect_written_names(&block, &mut written);

    let mut use_vars: Vec<UseVar> = referenced
        .into_iter()
        .filter(|name| !param_names.contains(name))
        .filter(|name| !declared.contains(name))
        .filter(|name| !BUILTIN_CLOSURE_NAMES.contains(&name.as_str()))
        .map(|name| {
            let by_reference = written.contains(&name);
            UseVar { name, by_reference }
        })
        .collect();
    use_vars.sort_by(|a, b| a.name.cmp(&b.name));

    Expression::Closure { parameters, use_vars, body: block, return_type: None, is_static: false }
}
