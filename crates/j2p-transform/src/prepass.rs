//! The pre-pass over the IL AST (§4.3.1 step 1): collects
//! `reassignedVariables` and `declaredConstants` before any node is
//! translated.

use crate::constant::is_constant_expression;
use crate::naming::scream_case;
use j2p_il::{is_iife_wrapper, unwrap_iife_body, IlNode, Program};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct PrepassResult {
    pub reassigned_variables: HashSet<String>,
    pub declared_constants: HashMap<String, String>,
}

pub fn prepass(program: &Program) -> PrepassResult {
    let mut reassigned = HashSet::new();
    for node in &program.body {
        collect_reassigned(node, &mut reassigned);
    }

    let mut declared_constants = HashMap::new();
    collect_constants(&program.body, &reassigned, &mut declared_constants);

    PrepassResult { reassigned_variables: reassigned, declared_constants }
}

/// Deep walk (including inside function/method bodies) collecting every
/// identifier that is ever the direct target of an assignment or update
/// expression (§3.2 `reassignedVariables`).
fn collect_reassigned(node: &IlNode, out: &mut HashSet<String>) {
    match node.kind() {
        "AssignmentExpression" => {
            if let Some(target) = node.get("left") {
                collect_assignment_targets(&target, out);
            }
            if let Some(right) = node.get("right") {
                collect_reassigned(&right, out);
            }
        }
        "UpdateExpression" => {
            if let Some(target) = node.get("argument") {
                collect_assignment_targets(&target, out);
            }
        }
        _ => {}
    }
    for_each_child(node, |child| collect_reassigned(child, out));
}

fn collect_assignment_targets(target: &IlNode, out: &mut HashSet<String>) {
    match target.kind() {
        "Identifier" => {
            if let Some(name) = target.get_str("name") {
                out.insert(name.to_string());
            }
        }
        "ArrayPattern" => {
            for element in target.get_array("elements") {
                if !element.is_null_value() {
                    collect_assignment_targets(&element, out);
                }
            }
        }
        "ObjectPattern" => {
            for prop in target.get_array("properties") {
                if let Some(value) = prop.get("value") {
                    collect_assignment_targets(&value, out);
                }
            }
        }
        // `arr[i] = ...` / `this.x = ...`: the element/property is the
        // target, not a bare variable, so no name is added here.
        _ => {}
    }
}

/// Generic child visitor over every shape the IL AST uses for nested
/// statements/expressions (§9 "arbitrary nested blocks").
///
/// `body` appears in both field lists: `Program`/`BlockStatement` carry it
/// as a literal array of statements (handled via `get_array`), while
/// `FunctionDeclaration`/`FunctionExpression`/`ArrowFunctionExpression`/
/// `ClassDeclaration` carry it as a single nested `BlockStatement`/
/// `ClassBody` node (handled via `get`, so the walk actually descends past
/// the function/class boundary instead of stopping at it).
fn for_each_child(node: &IlNode, mut visit: impl FnMut(&IlNode)) {
    const LIST_FIELDS: &[&str] = &[
        "body", "declarations", "elements", "properties", "arguments", "params", "expressions",
        "cases", "consequent",
    ];
    const NODE_FIELDS: &[&str] = &[
        "init", "test", "update", "expression", "left", "right", "argument", "object", "property",
        "callee", "id", "key", "value", "block", "handler", "finalizer", "alternate", "discriminant",
        "superClass", "body",
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

/// Constant-candidate collection: only descends into IIFE wrappers and
/// nested blocks at module scope, never into function/method bodies (those
/// define local, not module-level, bindings).
fn collect_constants(items: &[IlNode], reassigned: &HashSet<String>, out: &mut HashMap<String, String>) {
    for item in items {
        if is_iife_wrapper(item) {
            collect_constants(&unwrap_iife_body(item), reassigned, out);
            continue;
        }
        match item.kind() {
            "VariableDeclaration" => collect_from_declaration(item, reassigned, out),
            "BlockStatement" => collect_constants(&item.get_array("body"), reassigned, out),
            "IfStatement" => {
                if let Some(then) = item.get("consequent") {
                    collect_constants_one(&then, reassigned, out);
                }
                if let Some(alt) = item.get("alternate") {
                    collect_constants_one(&alt, reassigned, out);
                }
            }
            "TryStatement" => {
                if let Some(block) = item.get("block") {
                    collect_constants(&block.get_array("body"), reassigned, out);
                }
            }
            _ => {}
        }
    }
}

fn collect_constants_one(item: &IlNode, reassigned: &HashSet<String>, out: &mut HashMap<String, String>) {
    collect_constants(std::slice::from_ref(item), reassigned, out);
}

fn collect_from_declaration(decl: &IlNode, reassigned: &HashSet<String>, out: &mut HashMap<String, String>) {
    for declarator in decl.get_array("declarations") {
        let Some(id) = declarator.get("id") else { continue };
        let Some(init) = declarator.get("init") else { continue };
        match id.kind() {
            "Identifier" => {
                let Some(name) = id.get_str("name") else { continue };
                if !reassigned.contains(name) && is_constant_expression(&init) {
                    out.insert(name.to_string(), scream_case(name));
                }
            }
            "ArrayPattern" => {
                for element in id.get_array("elements") {
                    if element.is_null_value() {
                        continue;
                    }
                    if let Some(name) = element.get_str("name") {
                        if !reassigned.contains(name) {
                            out.insert(name.to_string(), scream_case(name));
                        }
                    }
                }
            }
            _ => {}
        }
    }
}
