//! IL AST input model: the type-inferred, language-agnostic tree produced
//! by the upstream IL transformer and consumed by `j2p-transform` (§6).

mod iife;
mod node;
mod program;

pub use iife::{is_iife_wrapper, unwrap_iife_body};
pub use node::{IlError, IlNode};
pub use program::Program;
