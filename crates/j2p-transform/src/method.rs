//! Method/function body translation (§4.3.5): parameter pass-by-reference
//! inference, statement-by-statement lowering, and the post-translation
//! global-capture pass.

use crate::analysis::FileAnalysis;
use crate::lower::lower_expression;
use crate::naming::to_php_identifier;
use crate::sets::ENUM_OBJECTS;
use crate::warning::{unhandled_statement, Warning};
use j2p_il::IlNode;
use j2p_php_ast::{
    Block, CatchClause, DoWhileStatement, ElseClause, Expression, ForStatement, ForeachStatement, IfStatement, MatchStatement, Parameter,
    Statement, SwitchCase, SwitchStatement, TryStatement, Type, WhileStatement,
};
use j2p_types::looks_array_like_param_name;
use std::collections::HashSet;

/// Pre-analysis over a parameter list: a parameter becomes by-reference
/// (`&$x`) iff *both* halves of §4.3.5's test hold: (a) `body_items`
/// contains an assignment or update whose target is an element/property
/// access on it, and (b) it has an array-like name. A pure reader (never
/// written into) or a directly-reassigned scalar (`p = p % 31`, whose
/// target is the bare `Identifier`, not a `MemberExpression`) never
/// qualifies.
pub fn transform_parameters(params: &[IlNode], body_items: &[IlNode], analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Vec<Parameter> {
    let written_via_member = infer_reference_params(body_items);
    params.iter().map(|param| transform_parameter(param, &written_via_member, analysis, warnings)).collect()
}

/// Parameter names that `body_items` writes into via an element or
/// property access (`p[i] = ...`, `p.f = ...`) — condition (a) of
/// [`transform_parameters`]'s by-reference test.
fn infer_reference_params(body_items: &[IlNode]) -> HashSet<String> {
    let mut written = HashSet::new();
    for item in body_items {
        collect_member_write_targets(item, &mut written);
    }
    written
}

fn collect_member_write_targets(node: &IlNode, out: &mut HashSet<String>) {
    match node.kind() {
        "AssignmentExpression" => {
            if let Some(target) = node.get("left") {
                record_member_write_target(&target, out);
            }
        }
        "UpdateExpression" => {
            if let Some(target) = node.get("argument") {
                record_member_write_target(&target, out);
            }
        }
        _ => {}
    }
    for_each_child(node, &mut |child| collect_member_write_targets(child, out));
}

fn record_member_write_target(target: &IlNode, out: &mut HashSet<String>) {
    if target.kind() != "MemberExpression" {
        return;
    }
    let Some(object) = target.get("object") else { return };
    if object.kind() == "Identifier" {
        if let Some(name) = object.get_str("name") {
            out.insert(name.to_string());
        }
    }
}

/// Generic child visitor, mirroring `crate::prepass`'s and
/// `crate::class_transform`'s private walkers of the same name: `body`
/// covers both the literal-array shape (`BlockStatement`) and the single
/// nested-node shape (`FunctionDeclaration.body`), so the walk descends
/// past nested function/class boundaries rather than stopping at them.
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

fn transform_parameter(param: &IlNode, written_via_member: &HashSet<String>, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Parameter {
    match param.kind() {
        "RestElement" => {
            let name = param.get("argument").and_then(|a| a.get_str("name").map(str::to_string)).unwrap_or_else(|| "rest".to_string());
            let php_name = to_php_identifier(&name);
            analysis.declare_variable_type(php_name.clone(), Type::Array);
            let mut parameter = Parameter::new(php_name);
            parameter.is_variadic = true;
            parameter
        }
        "AssignmentPattern" => {
            let left = param.get("left").unwrap_or_else(|| param.clone());
            let mut parameter = transform_parameter(&left, written_via_member, analysis, warnings);
            if let Some(right) = param.get("right") {
                parameter.default_value = Some(lower_expression(&right, analysis, warnings));
            }
            parameter
        }
        _ => {
            let name = param.get_str("name").unwrap_or("arg").to_string();
            let php_name = to_php_identifier(&name);
            let is_reference = written_via_member.contains(&name) && looks_array_like_param_name(&name);
            if is_reference {
                analysis.declare_variable_type(php_name.clone(), Type::Array);
            }
            let mut parameter = Parameter::new(php_name);
            parameter.is_reference = is_reference;
            parameter
        }
    }
}

/// Translates a JS statement list into a PHP `Block`. One IL statement can
/// expand to more than one PHP statement (a multi-declarator
/// `VariableDeclaration`), so the per-statement step returns a `Vec`.
pub fn transform_block(items: &[IlNode], analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Block {
    let mut statements = Vec::new();
    for item in items {
        statements.extend(transform_statement(item, analysis, warnings));
    }
    Block::new(statements)
}

/// Wraps a single (possibly braceless) statement position into a `Block`.
fn transform_body(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Block {
    if node.kind() == "BlockStatement" {
        transform_block(&node.get_array("body"), analysis, warnings)
    } else {
        Block::new(transform_statement(node, analysis, warnings))
    }
}

fn transform_statement(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Vec<Statement> {
    match node.kind() {
        "BlockStatement" => vec![Statement::Block(transform_block(&node.get_array("body"), analysis, warnings))],
        "EmptyStatement" => vec![],
        "ExpressionStatement" => match node.get("expression") {
            Some(expr) => vec![Statement::ExpressionStatement(lower_expression(&expr, analysis, warnings))],
            None => vec![unhandled_statement("ExpressionStatement", warnings)],
        },
        "VariableDeclaration" => transform_variable_declaration(node, analysis, warnings),
        "ReturnStatement" => {
            let value = node.get("argument").map(|a| lower_expression(&a, analysis, warnings));
            vec![Statement::Return(value)]
        }
        "IfStatement" => vec![Statement::If(transform_if(node, analysis, warnings))],
        "ForStatement" => vec![Statement::For(transform_for(node, analysis, warnings))],
        "ForOfStatement" => vec![Statement::Foreach(transform_for_of(node, analysis, warnings))],
        "ForInStatement" => vec![Statement::Foreach(transform_for_in(node, analysis, warnings))],
        "WhileStatement" => {
            let condition = node.get("test").map(|t| lower_expression(&t, analysis, warnings)).unwrap_or(Expression::Literal(j2p_php_ast::Literal::Bool(true)));
            let body = node.get("body").map(|b| transform_body(&b, analysis, warnings)).unwrap_or_default();
            vec![Statement::While(WhileStatement { condition, body })]
        }
        "DoWhileStatement" => {
            let condition = node.get("test").map(|t| lower_expression(&t, analysis, warnings)).unwrap_or(Expression::Literal(j2p_php_ast::Literal::Bool(false)));
            let body = node.get("body").map(|b| transform_body(&b, analysis, warnings)).unwrap_or_default();
            vec![Statement::DoWhile(DoWhileStatement { body, condition })]
        }
        "SwitchStatement" => vec![Statement::Switch(transform_switch(node, analysis, warnings))],
        "BreakStatement" => vec![Statement::Break(None)],
        "ContinueStatement" => vec![Statement::Continue(None)],
        "ThrowStatement" => {
            let expr = node.get("argument").map(|a| lower_expression(&a, analysis, warnings)).unwrap_or(Expression::Literal(j2p_php_ast::Literal::Null));
            vec![Statement::Throw(expr)]
        }
        "TryStatement" => vec![Statement::Try(transform_try(node, analysis, warnings))],
        other => vec![unhandled_statement(other, warnings)],
    }
}

fn transform_variable_declaration(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> Vec<Statement> {
    let mut statements = Vec::new();
    for declarator in node.get_array("declarations") {
        let Some(id) = declarator.get("id") else { continue };
        let init = declarator.get("init");
        match id.kind() {
            "Identifier" => {
                let name = id.get_str("name").unwrap_or("tmp").to_string();
                let php_name = to_php_identifier(&name);
                let value = init.as_ref().map(|v| lower_expression(v, analysis, warnings));
                if let Some(init_node) = &init {
                    analysis.declare_variable_type(php_name.clone(), j2p_types::infer_value_shape(init_node));
                }
                statements.push(Statement::VariableDeclaration { name: php_name, value });
            }
            "ArrayPattern" => {
                let Some(init_node) = init else { continue };
                let lowered_init = lower_expression(&init_node, analysis, warnings);
                for (index, element) in id.get_array("elements").into_iter().enumerate() {
                    if element.is_null_value() {
                        continue;
                    }
                    if let Some(name) = element.get_str("name") {
                        let php_name = to_php_identifier(name);
                        let value = Expression::ArrayAccess { array: Box::new(lowered_init.clone()), index: Some(Box::new(Expression::int(index as i64))) };
                        statements.push(Statement::VariableDeclaration { name: php_name, value: Some(value) });
                    }
                }
            }
            other => statements.push(unhandled_statement(other, warnings)),
        }
    }
    statements
}

fn transform_if(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> IfStatement {
    let condition = node.get("test").map(|t| lower_expression(&t, analysis, warnings)).unwrap_or(Expression::Literal(j2p_php_ast::Literal::Bool(false)));
    let then = node.get("consequent").map(|c| transform_body(&c, analysis, warnings)).unwrap_or_default();
    let else_clause = node.get("alternate").map(|alt| {
        if alt.kind() == "IfStatement" {
            ElseClause::ElseIf(Box::new(transform_if(&alt, analysis, warnings)))
        } else {
            ElseClause::Else(transform_body(&alt, analysis, warnings))
        }
    });
    IfStatement { condition, then, else_clause }
}

fn transform_for(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> ForStatement {
    let init = match node.get("init") {
        Some(init_node) if init_node.kind() == "VariableDeclaration" => init_node
            .get_array("declarations")
            .into_iter()
            .filter_map(|d| {
                let id = d.get("id")?;
                let value = d.get("init").map(|v| lower_expression(&v, analysis, warnings))?;
                let name = id.get_str("name")?;
                analysis.declare_variable_type(to_php_identifier(name), j2p_types::infer_value_shape(&d.get("init")?));
                Some(Expression::assign(Expression::var(to_php_identifier(name)), value))
            })
            .collect(),
        Some(init_node) => vec![lower_expression(&init_node, analysis, warnings)],
        None => vec![],
    };
    let condition = node.get("test").map(|t| vec![lower_expression(&t, analysis, warnings)]).unwrap_or_default();
    let increment = node.get("update").map(|u| vec![lower_expression(&u, analysis, warnings)]).unwrap_or_default();
    let body = node.get("body").map(|b| transform_body(&b, analysis, warnings)).unwrap_or_default();
    ForStatement { init, condition, increment, body }
}

fn for_each_binding_name(left: &IlNode) -> Option<String> {
    if left.kind() == "VariableDeclaration" {
        let declarator = left.get_array("declarations").into_iter().next()?;
        let id = declarator.get("id")?;
        return id.get_str("name").map(str::to_string);
    }
    left.get_str("name").map(str::to_string)
}

fn transform_for_of(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> ForeachStatement {
    let iterable = node.get("right").map(|r| lower_expression(&r, analysis, warnings)).unwrap_or(Expression::ArrayLiteral(Vec::new()));
    let value_name = node.get("left").and_then(|l| for_each_binding_name(&l)).unwrap_or_else(|| "item".to_string());
    let value_var = Expression::var(to_php_identifier(&value_name));
    let body = node.get("body").map(|b| transform_body(&b, analysis, warnings)).unwrap_or_default();
    ForeachStatement { iterable, value_var, key_var: None, by_reference: false, body }
}

fn transform_for_in(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> ForeachStatement {
    let iterable = node.get("right").map(|r| lower_expression(&r, analysis, warnings)).unwrap_or(Expression::ArrayLiteral(Vec::new()));
    let key_name = node.get("left").and_then(|l| for_each_binding_name(&l)).unwrap_or_else(|| "key".to_string());
    let key_var = Expression::var(to_php_identifier(&key_name));
    let body = node.get("body").map(|b| transform_body(&b, analysis, warnings)).unwrap_or_default();
    ForeachStatement { iterable, value_var: Expression::var("value_"), key_var: Some(key_var), by_reference: false, body }
}

fn transform_switch(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> SwitchStatement {
    let subject = node.get("discriminant").map(|d| lower_expression(&d, analysis, warnings)).unwrap_or(Expression::Literal(j2p_php_ast::Literal::Null));
    let cases = node
        .get_array("cases")
        .into_iter()
        .map(|case| {
            let condition = case.get("test").map(|t| lower_expression(&t, analysis, warnings));
            let mut body = Vec::new();
            for stmt in case.get_array("consequent") {
                body.extend(transform_statement(&stmt, analysis, warnings));
            }
            SwitchCase { condition, body }
        })
        .collect();
    SwitchStatement { subject, cases }
}

fn transform_try(node: &IlNode, analysis: &mut FileAnalysis, warnings: &mut Vec<Warning>) -> TryStatement {
    let try_block = node.get("block").map(|b| transform_block(&b.get_array("body"), analysis, warnings)).unwrap_or_default();
    let catches = node
        .get("handler")
        .map(|handler| {
            let variable = handler.get("param").and_then(|p| p.get_str("name").map(to_php_identifier));
            let body = handler.get("body").map(|b| transform_block(&b.get_array("body"), analysis, warnings)).unwrap_or_default();
            vec![CatchClause { exception_types: vec!["\\Throwable".to_string()], variable, body }]
        })
        .unwrap_or_default();
    let finally_block = node.get("finalizer").map(|f| transform_block(&f.get_array("body"), analysis, warnings));
    TryStatement { try_block, catches, finally_block }
}

/// Whether `name` is the snake-cased form of one of [`ENUM_OBJECTS`]'s
/// entries, used to decide the global-capture pass's second condition.
fn is_enum_object_variable(name: &str) -> bool {
    ENUM_OBJECTS.iter().any(|enum_name| to_php_identifier(enum_name) == name)
}

fn collect_expr_variables(expr: &Expression, out: &mut HashSet<String>) {
    match expr {
        Expression::Variable(name) => {
            out.insert(name.clone());
        }
        Expression::Binary(b) => {
            collect_expr_variables(&b.left, out);
            collect_expr_variables(&b.right, out);
        }
        Expression::Unary(u) => collect_expr_variables(&u.operand, out),
        Expression::Update { target, .. } => collect_expr_variables(target, out),
        Expression::Assignment(a) => {
            collect_expr_variables(&a.target, out);
            collect_expr_variables(&a.value, out);
        }
        Expression::PropertyAccess { object, .. } => collect_expr_variables(object, out),
        Expression::ArrayAccess { array, index } => {
            collect_expr_variables(array, out);
            if let Some(index) = index {
                collect_expr_variables(index, out);
            }
        }
        Expression::MethodCall { object, args, .. } => {
            collect_expr_variables(object, out);
            for arg in args {
                collect_expr_variables(&arg.value, out);
            }
        }
        Expression::StaticMethodCall { args, .. } => {
            for arg in args {
                collect_expr_variables(&arg.value, out);
            }
        }
        Expression::FunctionCall { callee, args } => {
            collect_expr_variables(callee, out);
            for arg in args {
                collect_expr_variables(&arg.value, out);
            }
        }
        Expression::ArrayLiteral(elements) => {
            for element in elements {
                if let Some(key) = &element.key {
                    collect_expr_variables(key, out);
                }
                collect_expr_variables(&element.value, out);
            }
        }
        Expression::New { args, .. } => {
            for arg in args {
                collect_expr_variables(&arg.value, out);
            }
        }
        Expression::Ternary { condition, then, r#else } => {
            collect_expr_variables(condition, out);
            collect_expr_variables(then, out);
            collect_expr_variables(r#else, out);
        }
        Expression::NullCoalescing { left, right } => {
            collect_expr_variables(left, out);
            collect_expr_variables(right, out);
        }
        Expression::ShortTernary { condition, r#else } => {
            collect_expr_variables(condition, out);
            collect_expr_variables(r#else, out);
        }
        Expression::Instanceof { expr, .. } => collect_expr_variables(expr, out),
        Expression::ArrowFunction { body, .. } => collect_expr_variables(body, out),
        Expression::Closure { use_vars, .. } => {
            for use_var in use_vars {
                out.insert(use_var.name.clone());
            }
        }
        Expression::Cast { expr, .. } => collect_expr_variables(expr, out),
        Expression::Spread(inner) => collect_expr_variables(inner, out),
        Expression::StringInterpolation { parts } => {
            for part in parts {
                if let j2p_php_ast::InterpolationPart::Expr(e) = part {
                    collect_expr_variables(e, out);
                }
            }
        }
        Expression::Literal(_)
        | Expression::Identifier(_)
        | Expression::StaticPropertyAccess { .. }
        | Expression::ClassConstant { .. }
        | Expression::DocComment(_)
        | Expression::RawCode(_) => {}
    }
}

fn collect_stmt_variables(stmt: &Statement, out: &mut HashSet<String>) {
    match stmt {
        Statement::Block(block) => collect_block_variables(block, out),
        Statement::VariableDeclaration { value, .. } => {
            if let Some(value) = value {
                collect_expr_variables(value, out);
            }
        }
        Statement::ExpressionStatement(expr) => collect_expr_variables(expr, out),
        Statement::Return(value) => {
            if let Some(value) = value {
                collect_expr_variables(value, out);
            }
        }
        Statement::If(if_stmt) => {
            collect_expr_variables(&if_stmt.condition, out);
            collect_block_variables(&if_stmt.then, out);
            match &if_stmt.else_clause {
                Some(ElseClause::ElseIf(nested)) => collect_stmt_variables(&Statement::If((**nested).clone()), out),
                Some(ElseClause::Else(block)) => collect_block_variables(block, out),
                None => {}
            }
        }
        Statement::For(for_stmt) => {
            for expr in for_stmt.init.iter().chain(&for_stmt.condition).chain(&for_stmt.increment) {
                collect_expr_variables(expr, out);
            }
            collect_block_variables(&for_stmt.body, out);
        }
        Statement::Foreach(foreach) => {
            collect_expr_variables(&foreach.iterable, out);
            collect_expr_variables(&foreach.value_var, out);
            if let Some(key) = &foreach.key_var {
                collect_expr_variables(key, out);
            }
            collect_block_variables(&foreach.body, out);
        }
        Statement::While(while_stmt) => {
            collect_expr_variables(&while_stmt.condition, out);
            collect_block_variables(&while_stmt.body, out);
        }
        Statement::DoWhile(do_while) => {
            collect_expr_variables(&do_while.condition, out);
            collect_block_variables(&do_while.body, out);
        }
        Statement::Switch(switch) => {
            collect_expr_variables(&switch.subject, out);
            for case in &switch.cases {
                if let Some(condition) = &case.condition {
                    collect_expr_variables(condition, out);
                }
                for s in &case.body {
                    collect_stmt_variables(s, out);
                }
            }
        }
        Statement::Match(MatchStatement { assign_to, subject, arms }) => {
            if let Some(target) = assign_to {
                collect_expr_variables(target, out);
            }
            collect_expr_variables(subject, out);
            for arm in arms {
                if let Some(conditions) = &arm.conditions {
                    for c in conditions {
                        collect_expr_variables(c, out);
                    }
                }
                collect_expr_variables(&arm.body, out);
            }
        }
        Statement::Try(try_stmt) => {
            collect_block_variables(&try_stmt.try_block, out);
            for catch in &try_stmt.catches {
                collect_block_variables(&catch.body, out);
            }
            if let Some(finally) = &try_stmt.finally_block {
                collect_block_variables(finally, out);
            }
        }
        Statement::Throw(expr) => collect_expr_variables(expr, out),
        Statement::Break(_) | Statement::Continue(_) | Statement::GlobalDeclaration(_) | Statement::RawCode(_) => {}
    }
}

pub(crate) fn collect_block_variables(block: &Block, out: &mut HashSet<String>) {
    for stmt in &block.statements {
        collect_stmt_variables(stmt, out);
    }
}

fn variable_name(expr: &Expression) -> Option<&str> {
    match expr {
        Expression::Variable(name) => Some(name),
        _ => None,
    }
}

/// Names locally introduced inside `block`: `VariableDeclaration`s, foreach
/// bindings, catch variables, and `for`-init assignment targets (a `for`
/// loop's own counter is never an outer capture, §4.3.6 "Arrow function").
pub(crate) fn collect_declared_names(block: &Block, out: &mut HashSet<String>) {
    for stmt in &block.statements {
        match stmt {
            Statement::Block(inner) => collect_declared_names(inner, out),
            Statement::VariableDeclaration { name, .. } => {
                out.insert(name.clone());
            }
            Statement::If(if_stmt) => {
                collect_declared_names(&if_stmt.then, out);
                match &if_stmt.else_clause {
                    Some(ElseClause::ElseIf(nested)) => collect_declared_names(&Block::new(vec![Statement::If((**nested).clone())]), out),
                    Some(ElseClause::Else(block)) => collect_declared_names(block, out),
                    None => {}
                }
            }
            Statement::For(for_stmt) => {
                for expr in &for_stmt.init {
                    if let Expression::Assignment(a) = expr {
                        if let Some(name) = variable_name(&a.target) {
                            out.insert(name.to_string());
                        }
                    }
                }
                collect_declared_names(&for_stmt.body, out);
            }
            Statement::Foreach(foreach) => {
                if let Some(name) = variable_name(&foreach.value_var) {
                    out.insert(name.to_string());
                }
                if let Some(Some(name)) = foreach.key_var.as_ref().map(|k| variable_name(k)) {
                    out.insert(name.to_string());
                }
                collect_declared_names(&foreach.body, out);
            }
            Statement::While(w) => collect_declared_names(&w.body, out),
            Statement::DoWhile(d) => collect_declared_names(&d.body, out),
            Statement::Switch(switch) => {
                for case in &switch.cases {
                    collect_declared_names(&Block::new(case.body.clone()), out);
                }
            }
            Statement::Try(try_stmt) => {
                collect_declared_names(&try_stmt.try_block, out);
                for catch in &try_stmt.catches {
                    if let Some(name) = &catch.variable {
                        out.insert(name.clone());
                    }
                    collect_declared_names(&catch.body, out);
                }
                if let Some(finally) = &try_stmt.finally_block {
                    collect_declared_names(finally, out);
                }
            }
            _ => {}
        }
    }
}

fn collect_written_expr(expr: &Expression, out: &mut HashSet<String>) {
    match expr {
        Expression::Assignment(a) => {
            if let Some(name) = variable_name(&a.target) {
                out.insert(name.to_string());
            }
            collect_written_expr(&a.value, out);
        }
        Expression::Update { target, .. } => {
            if let Some(name) = variable_name(target) {
                out.insert(name.to_string());
            }
        }
        Expression::Binary(b) => {
            collect_written_expr(&b.left, out);
            collect_written_expr(&b.right, out);
        }
        Expression::Unary(u) => collect_written_expr(&u.operand, out),
        Expression::PropertyAccess { object, .. } => collect_written_expr(object, out),
        Expression::ArrayAccess { array, index } => {
            collect_written_expr(array, out);
            if let Some(index) = index {
                collect_written_expr(index, out);
            }
        }
        Expression::MethodCall { object, args, .. } => {
            collect_written_expr(object, out);
            for arg in args {
                collect_written_expr(&arg.value, out);
            }
        }
        Expression::FunctionCall { args, .. } | Expression::StaticMethodCall { args, .. } | Expression::New { args, .. } => {
            for arg in args {
                collect_written_expr(&arg.value, out);
            }
        }
        Expression::ArrayLiteral(elements) => {
            for element in elements {
                collect_written_expr(&element.value, out);
            }
        }
        Expression::Ternary { condition, then, r#else } => {
            collect_written_expr(condition, out);
            collect_written_expr(then, out);
            collect_written_expr(r#else, out);
        }
        Expression::NullCoalescing { left, right } => {
            collect_written_expr(left, out);
            collect_written_expr(right, out);
        }
        Expression::ShortTernary { condition, r#else } => {
            collect_written_expr(condition, out);
            collect_written_expr(r#else, out);
        }
        Expression::Cast { expr, .. } => collect_written_expr(expr, out),
        Expression::Spread(inner) => collect_written_expr(inner, out),
        _ => {}
    }
}

fn collect_written_stmt(stmt: &Statement, out: &mut HashSet<String>) {
    match stmt {
        Statement::Block(block) => collect_written_names(block, out),
        Statement::VariableDeclaration { value, .. } => {
            if let Some(value) = value {
                collect_written_expr(value, out);
            }
        }
        Statement::ExpressionStatement(expr) | Statement::Throw(expr) => collect_written_expr(expr, out),
        Statement::Return(value) => {
            if let Some(value) = value {
                collect_written_expr(value, out);
            }
        }
        Statement::If(if_stmt) => {
            collect_written_expr(&if_stmt.condition, out);
            collect_written_names(&if_stmt.then, out);
            match &if_stmt.else_clause {
                Some(ElseClause::ElseIf(nested)) => collect_written_stmt(&Statement::If((**nested).clone()), out),
                Some(ElseClause::Else(block)) => collect_written_names(block, out),
                None => {}
            }
        }
        Statement::For(for_stmt) => {
            for expr in for_stmt.init.iter().chain(&for_stmt.condition).chain(&for_stmt.increment) {
                collect_written_expr(expr, out);
            }
            collect_written_names(&for_stmt.body, out);
        }
        Statement::Foreach(foreach) => {
            collect_written_expr(&foreach.iterable, out);
            collect_written_names(&foreach.body, out);
        }
        Statement::While(w) => {
            collect_written_expr(&w.condition, out);
            collect_written_names(&w.body, out);
        }
        Statement::DoWhile(d) => {
            collect_written_expr(&d.condition, out);
            collect_written_names(&d.body, out);
        }
        Statement::Switch(switch) => {
            for case in &switch.cases {
                for s in &case.body {
                    collect_written_stmt(s, out);
                }
            }
        }
        Statement::Try(try_stmt) => {
            collect_written_names(&try_stmt.try_block, out);
            for catch in &try_stmt.catches {
                collect_written_names(&catch.body, out);
            }
            if let Some(finally) = &try_stmt.finally_block {
                collect_written_names(finally, out);
            }
        }
        _ => {}
    }
}

/// Identifiers assigned to or incremented/decremented anywhere in `block`;
/// these become by-reference (`&$x`) captures for a closure (§4.3.6 "Arrow
/// function / closure").
pub(crate) fn collect_written_names(block: &Block, out: &mut HashSet<String>) {
    for stmt in &block.statements {
        collect_written_stmt(stmt, out);
    }
}

/// §4.3.1's ordering guarantee: after a method/function body is fully
/// translated, any reference to a module-scope variable or `ENUM_OBJECTS`
/// name not already a parameter gets a single prepended `global $a, $b;`.
pub fn capture_globals(block: &mut Block, analysis: &FileAnalysis, param_names: &HashSet<String>) {
    let mut referenced = HashSet::new();
    collect_block_variables(block, &mut referenced);

    let mut globals: Vec<String> = referenced
        .into_iter()
        .filter(|name| !param_names.contains(name))
        .filter(|name| analysis.module_variables.contains(name) || is_enum_object_variable(name))
        .collect();
    globals.sort();

    if !globals.is_empty() {
        block.statements.insert(0, Statement::GlobalDeclaration(globals));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_like_parameter_name_written_via_index_becomes_by_reference() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let params = vec![IlNode::from_value(json!({"type": "Identifier", "name": "state"}))];
        let body = vec![IlNode::from_value(json!({
            "type": "ExpressionStatement",
            "expression": {
                "type": "AssignmentExpression",
                "operator": "=",
                "left": {"type": "MemberExpression", "object": {"type": "Identifier", "name": "state"}, "property": {"type": "Literal", "value": 0}, "computed": true},
                "right": {"type": "Literal", "value": 1}
            }
        }))];
        let result = transform_parameters(&params, &body, &mut analysis, &mut warnings);
        assert!(result[0].is_reference);
        assert_eq!(result[0].name, "state");
    }

    #[test]
    fn array_like_parameter_name_never_written_into_is_by_value() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let params = vec![IlNode::from_value(json!({"type": "Identifier", "name": "data"}))];
        let body = vec![IlNode::from_value(json!({
            "type": "ReturnStatement",
            "argument": {
                "type": "BinaryExpression",
                "operator": "+",
                "left": {"type": "MemberExpression", "object": {"type": "Identifier", "name": "data"}, "property": {"type": "Literal", "value": 0}, "computed": true},
                "right": {"type": "MemberExpression", "object": {"type": "Identifier", "name": "data"}, "property": {"type": "Literal", "value": 1}, "computed": true}
            }
        }))];
        let result = transform_parameters(&params, &body, &mut analysis, &mut warnings);
        assert!(!result[0].is_reference);
    }

    #[test]
    fn scalar_parameter_name_is_by_value() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let params = vec![IlNode::from_value(json!({"type": "Identifier", "name": "algorithm"}))];
        let result = transform_parameters(&params, &[], &mut analysis, &mut warnings);
        assert!(!result[0].is_reference);
    }

    #[test]
    fn direct_reassignment_of_array_like_parameter_is_not_by_reference() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let params = vec![IlNode::from_value(json!({"type": "Identifier", "name": "state"}))];
        let body = vec![IlNode::from_value(json!({
            "type": "ExpressionStatement",
            "expression": {
                "type": "AssignmentExpression",
                "operator": "=",
                "left": {"type": "Identifier", "name": "state"},
                "right": {"type": "BinaryExpression", "operator": "%", "left": {"type": "Identifier", "name": "state"}, "right": {"type": "Literal", "value": 31}}
            }
        }))];
        let result = transform_parameters(&params, &body, &mut analysis, &mut warnings);
        assert!(!result[0].is_reference);
    }

    #[test]
    fn simple_return_statement_lowers() {
        let mut analysis = FileAnalysis::new();
        let mut warnings = Vec::new();
        let body = vec![IlNode::from_value(json!({"type": "ReturnStatement", "argument": {"type": "Literal", "value": 1}}))];
        let block = transform_block(&body, &mut analysis, &mut warnings);
        assert_eq!(block.statements, vec![Statement::Return(Some(Expression::int(1)))]);
    }

    #[test]
    fn capture_globals_prepends_global_declaration_for_module_variable() {
        let mut analysis = FileAnalysis::new();
        analysis.module_variables.insert("s_box".to_string());
        let mut block = Block::new(vec![Statement::Return(Some(Expression::var("s_box")))]);
        capture_globals(&mut block, &analysis, &HashSet::new());
        assert_eq!(block.statements[0], Statement::GlobalDeclaration(vec!["s_box".to_string()]));
    }

    #[test]
    fn capture_globals_skips_parameters() {
        let mut analysis = FileAnalysis::new();
        analysis.module_variables.insert("rounds".to_string());
        let mut block = Block::new(vec![Statement::Return(Some(Expression::var("rounds")))]);
        let mut params = HashSet::new();
        params.insert("rounds".to_string());
        capture_globals(&mut block, &analysis, &params);
        assert_eq!(block.statements.len(), 1);
        assert_eq!(block.statements[0], Statement::Return(Some(Expression::var("rounds"))));
    }
}
