//! Emitter configuration (§4.4, §6 "options").

#[derive(Debug, Clone)]
pub struct EmitOptions {
    pub indent: String,
    pub newline: String,
    pub strict_types: bool,
    pub add_doc_blocks: bool,
    pub use_short_array_syntax: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        EmitOptions {
            indent: "    ".to_string(),
            newline: "\n".to_string(),
            strict_types: true,
            add_doc_blocks: true,
            use_short_array_syntax: true,
        }
    }
}
