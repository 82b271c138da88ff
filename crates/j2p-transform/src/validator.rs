//! The syntax-validator collaborator contract (§6 "Syntax validator
//! collaborator", §1 Non-goals). This crate defines the trait only; no
//! "native" (`php -l` shell-out) or "basic" (brace-counting) implementation
//! ships here, since both belong to a collaborator outside this core.

/// Which strategy a [`SyntaxValidator`] implementation used to check the
/// source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMethod {
    /// Shelled out to the target language's own syntax checker.
    Native,
    /// Walked the source counting balanced braces/parens/brackets while
    /// tracking string, comment, and here-doc states.
    Basic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub success: bool,
    pub method: ValidationMethod,
    pub error: Option<String>,
}

/// Given a source string, decide whether it is syntactically valid. The
/// core never calls this itself; it only ships the contract so a caller
/// can plug in a real checker.
pub trait SyntaxValidator {
    fn validate(&self, source: &str) -> ValidationResult;
}
