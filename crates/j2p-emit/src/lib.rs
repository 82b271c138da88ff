//! Precedence-correct pretty-printer from the PHP AST (`j2p-php-ast`) to
//! PHP 8.1+ source text (component C4, §4.4).

mod emitter;
mod escape;
mod options;
mod precedence;

pub use emitter::Emitter;
pub use escape::escape_single_quoted;
pub use options::EmitOptions;
pub use precedence::{child_needs_parens, Side};

use j2p_php_ast::File;

/// Convenience entry point: `Emitter::new(options).emit(file)`.
pub fn emit(file: &File, options: EmitOptions) -> String {
    Emitter::new(options).emit(file)
}
