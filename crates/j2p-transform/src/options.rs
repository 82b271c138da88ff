//! `GenerateOptions` / `GenerateResult` (§6 "External interfaces").

use crate::warning::Warning;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOptions {
    #[serde(default = "default_indent")]
    pub indent: String,
    #[serde(default = "default_newline")]
    pub newline: String,
    #[serde(default = "default_true")]
    pub strict_types: bool,
    #[serde(default = "default_true")]
    pub add_type_hints: bool,
    #[serde(default = "default_true")]
    pub add_doc_blocks: bool,
    #[serde(default = "default_true")]
    pub use_short_array_syntax: bool,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub skip_framework_stubs: bool,
    #[serde(default)]
    pub use_arrow_functions: bool,
}

fn default_indent() -> String {
    "    ".to_string()
}

fn default_newline() -> String {
    "\n".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            indent: default_indent(),
            newline: default_newline(),
            strict_types: true,
            add_type_hints: true,
            add_doc_blocks: true,
            use_short_array_syntax: true,
            namespace: None,
            skip_framework_stubs: false,
            use_arrow_functions: false,
        }
    }
}

/// §6's `{success, ...}` contract, modeled as a Rust sum type rather than a
/// boolean-tagged struct.
#[derive(Debug, Clone)]
pub enum GenerateResult {
    Ok {
        code: String,
        dependencies: Vec<String>,
        warnings: Vec<Warning>,
    },
    Err {
        error: String,
        warnings: Vec<Warning>,
    },
}

impl GenerateResult {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerateResult::Ok { .. })
    }
}

/// `?`-friendly view for callers that want `Result` plumbing instead of
/// matching the two-armed enum directly.
pub struct Success {
    pub code: String,
    pub dependencies: Vec<String>,
    pub warnings: Vec<Warning>,
}

pub struct Failure {
    pub error: String,
    pub warnings: Vec<Warning>,
}

impl From<GenerateResult> for Result<Success, Failure> {
    fn from(result: GenerateResult) -> Self {
        match result {
            GenerateResult::Ok { code, dependencies, warnings } => {
                Ok(Success { code, dependencies, warnings })
            }
            GenerateResult::Err { error, warnings } => Err(Failure { error, warnings }),
        }
    }
}

/// §6: "the PHP plugin always lists `ext-sodium`, `ext-openssl`,
/// `ext-mbstring` plus anything implied by `use` declarations."
pub const BASE_DEPENDENCIES: &[&str] = &["ext-sodium", "ext-openssl", "ext-mbstring"];
