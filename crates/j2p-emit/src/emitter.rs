//! The PHP pretty-printer (component C4, §4.4).

use crate::escape::escape_single_quoted;
use crate::options::EmitOptions;
use crate::precedence::{child_needs_parens, Side};
use j2p_php_ast::*;

pub struct Emitter {
    options: EmitOptions,
    buf: String,
    depth: usize,
}

impl Emitter {
    pub fn new(options: EmitOptions) -> Self {
        Emitter {
            options,
            buf: String::new(),
            depth: 0,
        }
    }

    /// One output buffer per call, per §5 ("the emitter allocates one
    /// output buffer per `emit(ast)` call").
    pub fn emit(mut self, file: &File) -> String {
        self.emit_file(file);
        self.buf
    }

    // ---- low-level buffer helpers -----------------------------------

    fn indent_str(&self) -> String {
        self.options.indent.repeat(self.depth)
    }

    fn nl(&mut self) {
        self.buf.push_str(&self.options.newline);
    }

    fn line(&mut self, text: &str) {
        self.buf.push_str(&self.indent_str());
        self.buf.push_str(text);
        self.nl();
    }

    fn blank_line(&mut self) {
        self.nl();
    }

    // ---- file head (§6 "Emitted file layout") ------------------------

    fn emit_file(&mut self, file: &File) {
        self.buf.push_str("<?php");
        self.nl();

        if file.strict_types && self.options.strict_types {
            self.line("declare(strict_types=1);");
        }

        if let Some(ns) = &file.namespace {
            self.line(&format!("namespace {};", ns.name));
        }

        for u in &file.uses {
            match &u.alias {
                Some(alias) => self.line(&format!("use {} as {};", u.path, alias)),
                None => self.line(&format!("use {};", u.path)),
            }
        }

        let mut first = true;
        for item in &file.items {
            if !first {
                self.blank_line();
            }
            first = false;
            self.emit_top_level_item(item);
        }
    }

    fn emit_top_level_item(&mut self, item: &TopLevelItem) {
        match item {
            TopLevelItem::DocComment(text) => self.emit_doc_comment(text),
            TopLevelItem::Class(class) => self.emit_class(class),
            TopLevelItem::Interface(iface) => self.emit_interface(iface),
            TopLevelItem::Trait(t) => self.emit_trait(t),
            TopLevelItem::Enum(e) => self.emit_enum(e),
            TopLevelItem::Function(f) => self.emit_function_decl(f),
            TopLevelItem::Const(c) => {
                let rendered = self.render_const(c);
                self.line(&rendered);
            }
            TopLevelItem::ExpressionStatement(expr) => {
                let rendered = self.emit_expression(expr);
                self.line(&format!("{rendered};"));
            }
            TopLevelItem::RawCode(code) => self.line(code),
        }
    }

    fn emit_doc_comment(&mut self, text: &str) {
        if !self.options.add_doc_blocks {
            return;
        }
        self.line("/**");
        for doc_line in text.lines() {
            self.line(&format!(" * {doc_line}"));
        }
        self.line(" */");
    }

    fn render_const(&mut self, c: &Const) -> String {
        let value = self.emit_expression(&c.value);
        let ty = match &c.ty {
            Some(t) => format!("{t} "),
            None => String::new(),
        };
        format!("{} const {}{} = {};", c.visibility.as_str(), ty, c.name, value)
    }

    // ---- declarations -------------------------------------------------

    fn emit_class(&mut self, class: &Class) {
        if let Some(doc) = &class.doc_comment {
            self.emit_doc_comment(doc);
        }
        let mut modifiers = String::new();
        if class.is_final {
            modifiers.push_str("final ");
        }
        if class.is_abstract {
            modifiers.push_str("abstract ");
        }
        if class.is_readonly {
            modifiers.push_str("readonly ");
        }
        let mut header = format!("{modifiers}class {}", class.name);
        if let Some(parent) = &class.extends_class {
            header.push_str(&format!(" extends {parent}"));
        }
        if !class.implements_interfaces.is_empty() {
            header.push_str(&format!(" implements {}", class.implements_interfaces.join(", ")));
        }
        self.line(&header);
        self.line("{");
        self.depth += 1;
        for prop in &class.properties {
            self.emit_property(prop);
        }
        if !class.properties.is_empty() && !class.methods.is_empty() {
            self.blank_line();
        }
        for (i, method) in class.methods.iter().enumerate() {
            if i > 0 {
                self.blank_line();
            }
            self.emit_method(method);
        }
        self.depth -= 1;
        self.line("}");
    }

    fn emit_interface(&mut self, iface: &Interface) {
        if let Some(doc) = &iface.doc_comment {
            self.emit_doc_comment(doc);
        }
        let mut header = format!("interface {}", iface.name);
        if !iface.extends_interfaces.is_empty() {
            header.push_str(&format!(" extends {}", iface.extends_interfaces.join(", ")));
        }
        self.line(&header);
        self.line("{");
        self.depth += 1;
        for c in &iface.consts {
            let rendered = self.render_const(c);
            self.line(&rendered);
        }
        for method in &iface.methods {
            self.emit_method(method);
        }
        self.depth -= 1;
        self.line("}");
    }

    fn emit_trait(&mut self, t: &Trait) {
        if let Some(doc) = &t.doc_comment {
            self.emit_doc_comment(doc);
        }
        self.line(&format!("trait {}", t.name));
        self.line("{");
        self.depth += 1;
        for prop in &t.properties {
            self.emit_property(prop);
        }
        if !t.properties.is_empty() && !t.methods.is_empty() {
            self.blank_line();
        }
        for (i, method) in t.methods.iter().enumerate() {
            if i > 0 {
                self.blank_line();
            }
            self.emit_method(method);
        }
        self.depth -= 1;
        self.line("}");
    }

    fn emit_enum(&mut self, e: &Enum) {
        if let Some(doc) = &e.doc_comment {
            self.emit_doc_comment(doc);
        }
        let mut header = format!("enum {}", e.name);
        if let Some(backing) = &e.backing_type {
            header.push_str(&format!(": {backing}"));
        }
        if !e.implements_interfaces.is_empty() {
            header.push_str(&format!(" implements {}", e.implements_interfaces.join(", ")));
        }
        self.line(&header);
        self.line("{");
        self.depth += 1;
        for case in &e.cases {
            match &case.value {
                Some(value) => {
                    let rendered = self.emit_expression(value);
                    self.line(&format!("case {} = {};", case.name, rendered));
                }
                None => self.line(&format!("case {};", case.name)),
            }
        }
        if !e.cases.is_empty() && !e.methods.is_empty() {
            self.blank_line();
        }
        for (i, method) in e.methods.iter().enumerate() {
            if i > 0 {
                self.blank_line();
            }
            self.emit_method(method);
        }
        self.depth -= 1;
        self.line("}");
    }

    fn emit_property(&mut self, prop: &Property) {
        let mut modifiers = vec![prop.visibility.as_str().to_string()];
        if prop.is_static {
            modifiers.push("static".to_string());
        }
        if prop.is_readonly {
            modifiers.push("readonly".to_string());
        }
        let ty = match &prop.ty {
            Some(t) => format!(" {t}"),
            None => String::new(),
        };
        let default = match &prop.default_value {
            Some(v) => {
                let rendered = self.emit_expression(v);
                format!(" = {rendered}")
            }
            None => String::new(),
        };
        self.line(&format!("{}{} ${}{};", modifiers.join(" "), ty, prop.name, default));
    }

    fn emit_method(&mut self, method: &Method) {
        if let Some(doc) = &method.doc_comment {
            self.emit_doc_comment(doc);
        }
        let mut modifiers = vec![method.visibility.as_str().to_string()];
        if method.is_static {
            modifiers.push("static".to_string());
        }
        if method.is_final {
            modifiers.push("final".to_string());
        }
        if method.is_abstract {
            modifiers.push("abstract".to_string());
        }
        let params = self.render_parameters(&method.parameters);
        let return_type = match &method.return_type {
            Some(t) => format!(": {t}"),
            None => String::new(),
        };
        let header = format!(
            "{} function {}({}){}",
            modifiers.join(" "),
            method.name,
            params,
            return_type
        );
        match &method.body {
            Some(body) => {
                self.line(&header);
                self.line("{");
                self.depth += 1;
                self.emit_statements(&body.statements);
                self.depth -= 1;
                self.line("}");
            }
            None => self.line(&format!("{header};")),
        }
    }

    fn emit_function_decl(&mut self, f: &FunctionDecl) {
        if let Some(doc) = &f.doc_comment {
            self.emit_doc_comment(doc);
        }
        let params = self.render_parameters(&f.parameters);
        let return_type = match &f.return_type {
            Some(t) => format!(": {t}"),
            None => String::new(),
        };
        self.line(&format!("function {}({}){}", f.name, params, return_type));
        self.line("{");
        self.depth += 1;
        self.emit_statements(&f.body.statements);
        self.depth -= 1;
        self.line("}");
    }

    fn render_parameters(&mut self, params: &[Parameter]) -> String {
        params
            .iter()
            .map(|p| self.render_parameter(p))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn render_parameter(&mut self, p: &Parameter) -> String {
        let mut out = String::new();
        if let Some(ty) = &p.ty {
            out.push_str(&ty.to_string());
            out.push(' ');
        }
        if p.is_reference {
            out.push('&');
        }
        if p.is_variadic {
            out.push_str("...");
        }
        out.push('$');
        out.push_str(&p.name);
        if let Some(default) = &p.default_value {
            let rendered = self.emit_expression(default);
            out.push_str(&format!(" = {rendered}"));
        }
        out
    }

    // ---- statements -----------------------------------------------------

    fn emit_statements(&mut self, statements: &[Statement]) {
        for stmt in statements {
            self.emit_statement(stmt);
        }
    }

    fn emit_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Block(block) => {
                self.line("{");
                self.depth += 1;
                self.emit_statements(&block.statements);
                self.depth -= 1;
                self.line("}");
            }
            Statement::VariableDeclaration { name, value } => match value {
                Some(v) => {
                    let rendered = self.emit_expression(v);
                    self.line(&format!("${name} = {rendered};"));
                }
                None => self.line(&format!("${name};")),
            },
            Statement::ExpressionStatement(expr) => {
                let rendered = self.emit_expression(expr);
                self.line(&format!("{rendered};"));
            }
            Statement::Return(expr) => match expr {
                Some(e) => {
                    let rendered = self.emit_expression(e);
                    self.line(&format!("return {rendered};"));
                }
                None => self.line("return;"),
            },
            Statement::If(if_stmt) => self.emit_if(if_stmt),
            Statement::For(for_stmt) => self.emit_for(for_stmt),
            Statement::Foreach(foreach) => self.emit_foreach(foreach),
            Statement::While(w) => self.emit_while(w),
            Statement::DoWhile(d) => self.emit_do_while(d),
            Statement::Switch(s) => self.emit_switch(s),
            Statement::Match(m) => self.emit_match(m),
            Statement::Break(level) => self.emit_jump("break", *level),
            Statement::Continue(level) => self.emit_jump("continue", *level),
            Statement::Try(t) => self.emit_try(t),
            Statement::Throw(e) => {
                let rendered = self.emit_expression(e);
                self.line(&format!("throw {rendered};"));
            }
            Statement::GlobalDeclaration(names) => {
                let vars: Vec<String> = names.iter().map(|n| format!("${n}")).collect();
                self.line(&format!("global {};", vars.join(", ")));
            }
            Statement::RawCode(code) => self.line(code),
        }
    }

    fn emit_jump(&mut self, keyword: &str, level: Option<u32>) {
        match level {
            Some(n) if n > 1 => self.line(&format!("{keyword} {n};")),
            _ => self.line(&format!("{keyword};")),
        }
    }

    fn emit_if(&mut self, if_stmt: &IfStatement) {
        let cond = self.emit_expression(&if_stmt.condition);
        self.line(&format!("if ({cond}) {{"));
        self.depth += 1;
        self.emit_statements(&if_stmt.then.statements);
        self.depth -= 1;
        match &if_stmt.else_clause {
            None => self.line("}"),
            Some(ElseClause::Else(block)) => {
                self.line("} else {");
                self.depth += 1;
                self.emit_statements(&block.statements);
                self.depth -= 1;
                self.line("}");
            }
            Some(ElseClause::ElseIf(nested)) => {
                let nested_cond = self.emit_expression(&nested.condition);
                self.line(&format!("}} elseif ({nested_cond}) {{"));
                self.depth += 1;
                self.emit_statements(&nested.then.statements);
                self.depth -= 1;
                self.emit_elseif_tail(&nested.else_clause);
            }
        }
    }

    fn emit_elseif_tail(&mut self, clause: &Option<ElseClause>) {
        match clause {
            None => self.line("}"),
            Some(ElseClause::Else(block)) => {
                self.line("} else {");
                self.depth += 1;
                self.emit_statements(&block.statements);
                self.depth -= 1;
                self.line("}");
            }
            Some(ElseClause::ElseIf(nested)) => {
                let nested_cond = self.emit_expression(&nested.condition);
                self.line(&format!("}} elseif ({nested_cond}) {{"));
                self.depth += 1;
                self.emit_statements(&nested.then.statements);
                self.depth -= 1;
                self.emit_elseif_tail(&nested.else_clause);
            }
        }
    }

    fn emit_for(&mut self, for_stmt: &ForStatement) {
        let init = self.render_expr_list(&for_stmt.init);
        let cond = self.render_expr_list(&for_stmt.condition);
        let inc = self.render_expr_list(&for_stmt.increment);
        self.line(&format!("for ({init}; {cond}; {inc}) {{"));
        self.depth += 1;
        self.emit_statements(&for_stmt.body.statements);
        self.depth -= 1;
        self.line("}");
    }

    fn render_expr_list(&mut self, exprs: &[Expression]) -> String {
        exprs
            .iter()
            .map(|e| self.emit_expression(e))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn emit_foreach(&mut self, foreach: &ForeachStatement) {
        let iterable = self.emit_expression(&foreach.iterable);
        let value = self.emit_expression(&foreach.value_var);
        let value = if foreach.by_reference { format!("&{value}") } else { value };
        let header = match &foreach.key_var {
            Some(key) => {
                let key_rendered = self.emit_expression(key);
                format!("foreach ({iterable} as {key_rendered} => {value}) {{")
            }
            None => format!("foreach ({iterable} as {value}) {{"),
        };
        self.line(&header);
        self.depth += 1;
        self.emit_statements(&foreach.body.statements);
        self.depth -= 1;
        self.line("}");
    }

    fn emit_while(&mut self, w: &WhileStatement) {
        let cond = self.emit_expression(&w.condition);
        self.line(&format!("while ({cond}) {{"));
        self.depth += 1;
        self.emit_statements(&w.body.statements);
        self.depth -= 1;
        self.line("}");
    }

    fn emit_do_while(&mut self, d: &DoWhileStatement) {
        self.line("do {");
        self.depth += 1;
        self.emit_statements(&d.body.statements);
        self.depth -= 1;
        let cond = self.emit_expression(&d.condition);
        self.line(&format!("}} while ({cond});"));
    }

    fn emit_switch(&mut self, s: &SwitchStatement) {
        let subject = self.emit_expression(&s.subject);
        self.line(&format!("switch ({subject}) {{"));
        self.depth += 1;
        for case in &s.cases {
            match &case.condition {
                Some(cond) => {
                    let rendered = self.emit_expression(cond);
                    self.line(&format!("case {rendered}:"));
                }
                None => self.line("default:"),
            }
            self.depth += 1;
            self.emit_statements(&case.body);
            self.depth -= 1;
        }
        self.depth -= 1;
        self.line("}");
    }

    fn emit_match(&mut self, m: &MatchStatement) {
        let subject = self.emit_expression(&m.subject);
        let prefix = match &m.assign_to {
            Some(target) => {
                let rendered = self.emit_expression(target);
                format!("{rendered} = ")
            }
            None => String::new(),
        };
        self.line(&format!("{prefix}match ({subject}) {{"));
        self.depth += 1;
        for (i, arm) in m.arms.iter().enumerate() {
            let body = self.emit_expression(&arm.body);
            let conditions = match &arm.conditions {
                Some(conds) => conds
                    .iter()
                    .map(|c| self.emit_expression(c))
                    .collect::<Vec<_>>()
                    .join(", "),
                None => "default".to_string(),
            };
            let trailing = if i + 1 == m.arms.len() { "" } else { "," };
            self.line(&format!("{conditions} => {body}{trailing}"));
        }
        self.depth -= 1;
        self.line("};");
    }

    fn emit_try(&mut self, t: &TryStatement) {
        self.line("try {");
        self.depth += 1;
        self.emit_statements(&t.try_block.statements);
        self.depth -= 1;
        for catch in &t.catches {
            let types = catch.exception_types.join("|");
            let header = match &catch.variable {
                Some(v) => format!("}} catch ({types} ${v}) {{"),
                None => format!("}} catch ({types}) {{"),
            };
            self.line(&header);
            self.depth += 1;
            self.emit_statements(&catch.body.statements);
            self.depth -= 1;
        }
        if let Some(finally) = &t.finally_block {
            self.line("} finally {");
            self.depth += 1;
            self.emit_statements(&finally.statements);
            self.depth -= 1;
        }
        self.line("}");
    }

    // ---- expressions ----------------------------------------------------

    pub fn emit_expression(&mut self, expr: &Expression) -> String {
        match expr {
            Expression::Literal(lit) => self.render_literal(lit),
            Expression::Variable(name) => format!("${name}"),
            Expression::Identifier(name) => name.clone(),
            Expression::Binary(bin) => self.render_binary(bin),
            Expression::Unary(u) => self.render_unary(u),
            Expression::Update { op, prefix, target } => {
                let target_str = self.emit_expression(target);
                let op_str = match op {
                    UpdateOp::Inc => "++",
                    UpdateOp::Dec => "--",
                };
                if *prefix {
                    format!("{op_str}{target_str}")
                } else {
                    format!("{target_str}{op_str}")
                }
            }
            Expression::Assignment(a) => self.render_assignment(a),
            Expression::PropertyAccess { object, property, nullsafe } => {
                let obj = self.emit_expression(object);
                let arrow = if *nullsafe { "?->" } else { "->" };
                format!("{obj}{arrow}{property}")
            }
            Expression::StaticPropertyAccess { class, property } => {
                let class_str = self.render_class_ref(class);
                format!("{class_str}::${property}")
            }
            Expression::ArrayAccess { array, index } => {
                let arr = self.emit_expression(array);
                match index {
                    Some(idx) => {
                        // §3.1: ArrayAccess indexes are single-line.
                        let rendered = self.emit_expression(idx).replace(['\n', '\r'], "");
                        format!("{arr}[{rendered}]")
                    }
                    None => format!("{arr}[]"),
                }
            }
            Expression::MethodCall { object, method, args, nullsafe } => {
                let obj = self.emit_expression(object);
                let arrow = if *nullsafe { "?->" } else { "->" };
                let rendered_args = self.render_args(args);
                format!("{obj}{arrow}{method}({rendered_args})")
            }
            Expression::StaticMethodCall { class, method, args } => {
                let class_str = self.render_class_ref(class);
                let rendered_args = self.render_args(args);
                format!("{class_str}::{method}({rendered_args})")
            }
            Expression::FunctionCall { callee, args } => {
                let callee_str = self.emit_expression(callee);
                let rendered_args = self.render_args(args);
                format!("{callee_str}({rendered_args})")
            }
            Expression::ArrayLiteral(elements) => self.render_array_literal(elements),
            Expression::New { class, args } => {
                let class_str = self.render_class_ref(class);
                let rendered_args = self.render_args(args);
                format!("new {class_str}({rendered_args})")
            }
            Expression::Ternary { condition, then, r#else } => {
                // §3.1: always wraps; nested ternaries wrap again (handled
                // naturally because this branch always re-enters itself).
                let c = self.emit_expression(condition);
                let t = self.emit_expression(then);
                let e = self.emit_expression(r#else);
                format!("({c} ? {t} : {e})")
            }
            Expression::NullCoalescing { left, right } => {
                let l = self.emit_expression(left);
                let r = self.emit_expression(right);
                format!("{l} ?? {r}")
            }
            Expression::ShortTernary { condition, r#else } => {
                let c = self.emit_expression(condition);
                let e = self.emit_expression(r#else);
                format!("{c} ?: {e}")
            }
            Expression::Instanceof { expr, class } => {
                let e = self.emit_expression(expr);
                let class_str = self.render_class_ref(class);
                format!("{e} instanceof {class_str}")
            }
            Expression::ArrowFunction { parameters, body } => {
                let params = self.render_parameters(parameters);
                let body_str = self.emit_expression(body);
                format!("fn({params}) => {body_str}")
            }
            Expression::Closure { parameters, use_vars, body, return_type, is_static } => {
                self.render_closure(parameters, use_vars, body, return_type, *is_static)
            }
            Expression::Cast { target_type, expr } => {
                let e = self.emit_expression(expr);
                format!("({}){e}", target_type.as_str())
            }
            Expression::Spread(inner) => {
                let e = self.emit_expression(inner);
                format!("...{e}")
            }
            Expression::StringInterpolation { parts } => self.render_interpolation(parts),
            Expression::ClassConstant { class, constant } => {
                let class_str = self.render_class_ref(class);
                format!("{class_str}::{constant}")
            }
            Expression::DocComment(text) => format!("/** {text} */"),
            Expression::RawCode(code) => code.clone(),
        }
    }

    fn render_literal(&self, lit: &Literal) -> String {
        match lit {
            Literal::Int(v) => v.to_string(),
            Literal::Float(v) => {
                if v.fract() == 0.0 {
                    format!("{v:.1}")
                } else {
                    v.to_string()
                }
            }
            Literal::String(s) => format!("'{}'", escape_single_quoted(s)),
            Literal::Bool(true) => "true".to_string(),
            Literal::Bool(false) => "false".to_string(),
            Literal::Null => "null".to_string(),
        }
    }

    fn render_binary(&mut self, bin: &BinaryExpression) -> String {
        let left_prec = self.expr_binary_precedence(&bin.left);
        let right_prec = self.expr_binary_precedence(&bin.right);
        let left = self.emit_binary_side(&bin.left, left_prec, bin.op, Side::Left);
        let right = self.emit_binary_side(&bin.right, right_prec, bin.op, Side::Right);
        format!("{left} {} {right}", bin.op.as_str())
    }

    /// Returns the effective precedence an expression should be treated as
    /// when deciding whether it needs parens as an operand of a binary
    /// expression. Anything tighter-binding than any binary operator (a
    /// primary expression, call, access, unary, cast, `new`) is given a
    /// precedence higher than the tightest binary tier so it is never
    /// parenthesized; anything looser (ternary, assignment, elvis,
    /// null-coalescing, closures) is given precedence 0 so it always is.
    fn expr_binary_precedence(&self, expr: &Expression) -> u8 {
        match expr {
            Expression::Binary(b) => b.op.precedence(),
            Expression::Ternary { .. }
            | Expression::ShortTernary { .. }
            | Expression::NullCoalescing { .. }
            | Expression::Assignment(_)
            | Expression::ArrowFunction { .. }
            | Expression::Closure { .. } => 0,
            _ => 255,
        }
    }

    fn emit_binary_side(&mut self, expr: &Expression, child_prec: u8, op: BinaryOp, side: Side) -> String {
        let rendered = self.emit_expression(expr);
        if matches!(expr, Expression::Binary(_)) && child_needs_parens(child_prec, op, side) {
            format!("({rendered})")
        } else if child_prec == 0 {
            format!("({rendered})")
        } else {
            rendered
        }
    }

    fn render_unary(&mut self, u: &UnaryExpression) -> String {
        let operand = self.emit_expression(&u.operand);
        let wrapped = if matches!(&*u.operand, Expression::Binary(_) | Expression::Ternary { .. }) {
            format!("({operand})")
        } else {
            operand
        };
        match u.op {
            UnaryOp::Neg => format!("-{wrapped}"),
            UnaryOp::Plus => format!("+{wrapped}"),
            UnaryOp::Not => format!("!{wrapped}"),
            UnaryOp::BitNot => format!("~{wrapped}"),
            UnaryOp::Suppress => format!("@{wrapped}"),
        }
    }

    fn render_assignment(&mut self, a: &AssignmentExpression) -> String {
        let target = self.emit_expression(&a.target);
        let value = self.emit_expression(&a.value);
        format!("{target} {} {value}", a.op.as_str())
    }

    fn render_class_ref(&mut self, class: &ClassRef) -> String {
        match class {
            ClassRef::Name(name) => name.clone(),
            ClassRef::Dynamic(expr) => self.emit_expression(expr),
        }
    }

    fn render_args(&mut self, args: &[Argument]) -> String {
        args.iter()
            .map(|a| self.render_arg(a))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn render_arg(&mut self, a: &Argument) -> String {
        let value = self.emit_expression(&a.value);
        let value = if a.spread { format!("...{value}") } else { value };
        match &a.name {
            Some(name) => format!("{name}: {value}"),
            None => value,
        }
    }

    fn render_array_literal(&mut self, elements: &[ArrayElement]) -> String {
        let rendered: Vec<String> = elements
            .iter()
            .map(|el| {
                let value = self.emit_expression(&el.value);
                let value = if el.spread { format!("...{value}") } else { value };
                match &el.key {
                    Some(key) => {
                        let key_str = self.emit_expression(key);
                        format!("{key_str} => {value}")
                    }
                    None => value,
                }
            })
            .collect();
        if self.options.use_short_array_syntax {
            format!("[{}]", rendered.join(", "))
        } else {
            format!("array({})", rendered.join(", "))
        }
    }

    fn render_closure(
        &mut self,
        parameters: &[Parameter],
        use_vars: &[UseVar],
        body: &Block,
        return_type: &Option<Type>,
        is_static: bool,
    ) -> String {
        let prefix = if is_static { "static " } else { "" };
        let params = self.render_parameters(parameters);
        let use_clause = if use_vars.is_empty() {
            String::new()
        } else {
            let rendered: Vec<String> = use_vars
                .iter()
                .map(|v| {
                    if v.by_reference {
                        format!("&${}", v.name)
                    } else {
                        format!("${}", v.name)
                    }
                })
                .collect();
            format!(" use ({})", rendered.join(", "))
        };
        let return_type_str = match return_type {
            Some(t) => format!(": {t}"),
            None => String::new(),
        };
        let mut out = format!("{prefix}function ({params}){use_clause}{return_type_str} {{");
        out.push_str(&self.options.newline);

        // Closures render their body through the statement emitter (for
        // correct nested indentation) but the closure itself is assembled
        // as a single expression string, so the shared output buffer is
        // swapped out for the duration and the rendered body spliced in.
        let saved = std::mem::take(&mut self.buf);
        self.depth += 1;
        for stmt in &body.statements {
            self.emit_statement(stmt);
        }
        self.depth -= 1;
        let body_str = std::mem::replace(&mut self.buf, saved);

        out.push_str(&body_str);
        out.push_str(&self.indent_str());
        out.push('}');
        out
    }

    fn render_interpolation(&mut self, parts: &[InterpolationPart]) -> String {
        // §4.3.6: PHP can't interpolate arbitrary expressions in
        // single-quoted strings, so a template lowers to
        // 'lit' . $expr . 'lit' concatenation with adjacent literal runs
        // merged.
        let mut merged: Vec<InterpolationPart> = Vec::new();
        for part in parts {
            match (merged.last_mut(), part) {
                (Some(InterpolationPart::Literal(prev)), InterpolationPart::Literal(next)) => {
                    prev.push_str(next);
                }
                _ => merged.push(part.clone()),
            }
        }
        if merged.is_empty() {
            return "''".to_string();
        }
        let rendered: Vec<String> = merged
            .iter()
            .map(|part| match part {
                InterpolationPart::Literal(text) => format!("'{}'", escape_single_quoted(text)),
                InterpolationPart::Expr(expr) => {
                    let e = self.emit_expression(expr);
                    if matches!(expr, Expression::Binary(_) | Expression::Ternary { .. } | Expression::Assignment(_)) {
                        format!("({e})")
                    } else {
                        e
                    }
                }
            })
            .collect();
        rendered.join(" . ")
    }
}
