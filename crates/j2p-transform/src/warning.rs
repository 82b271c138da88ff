//! Advisory diagnostics accumulated through one [`crate::generate`] call
//! (§7, final paragraph: "warnings are advisory and accumulate through the
//! call; they never abort translation").
//!
//! Shaped after the teacher's `rustor_analyze::issue::Issue` /
//! `IssueCollection` (a severity-less variant here, since every warning
//! this crate raises is the same "best-effort lowering" kind, §7.3).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningPhase {
    Prepass,
    ClassTransform,
    MethodBody,
    ExpressionLowering,
}

impl std::fmt::Display for WarningPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarningPhase::Prepass => write!(f, "prepass"),
            WarningPhase::ClassTransform => write!(f, "class-transform"),
            WarningPhase::MethodBody => write!(f, "method-body"),
            WarningPhase::ExpressionLowering => write!(f, "expression-lowering"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub phase: WarningPhase,
    pub message: String,
}

impl Warning {
    pub fn new(phase: WarningPhase, message: impl Into<String>) -> Self {
        Warning { phase, message: message.into() }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.phase, self.message)
    }
}

/// Emits the §4.3.7/§7.3 best-effort marker for an unrecognized IL node
/// kind: a parse-error-shaped identifier plus a pushed warning, never a
/// hard `TransformError`.
pub fn unhandled_expression(kind: &str, warnings: &mut Vec<Warning>) -> j2p_php_ast::Expression {
    warnings.push(Warning::new(
        WarningPhase::ExpressionLowering,
        format!("unhandled IL node kind `{kind}`"),
    ));
    j2p_php_ast::Expression::Identifier(format!("UNHANDLED_EXPRESSION_{kind}"))
}

/// Statement-position counterpart of [`unhandled_expression`]: emits a
/// `RawCode` marker comment instead of aborting the block translation.
pub fn unhandled_statement(kind: &str, warnings: &mut Vec<Warning>) -> j2p_php_ast::Statement {
    warnings.push(Warning::new(
        WarningPhase::MethodBody,
        format!("unhandled IL statement kind `{kind}`"),
    ));
    j2p_php_ast::Statement::RawCode(format!("// UNHANDLED_STATEMENT_{kind}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unhandled_expression_pushes_warning_and_marker() {
        let mut warnings = Vec::new();
        let expr = unhandled_expression("WeirdNode", &mut warnings);
        assert_eq!(expr, j2p_php_ast::Expression::Identifier("UNHANDLED_EXPRESSION_WeirdNode".to_string()));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].phase, WarningPhase::ExpressionLowering);
    }

    #[test]
    fn unhandled_statement_pushes_warning_and_marker() {
        let mut warnings = Vec::new();
        let stmt = unhandled_statement("WeirdStatement", &mut warnings);
        assert_eq!(stmt, j2p_php_ast::Statement::RawCode("// UNHANDLED_STATEMENT_WeirdStatement".to_string()));
        assert_eq!(warnings[0].phase, WarningPhase::MethodBody);
    }
}
