//! PHP type model and inference helpers (§4.2, component C2).
//!
//! Smaller and more emit-focused than a static analyzer's type lattice
//! would be (compare `rustor-analyze`'s `Type`, which also tracks constant
//! literal values and int ranges for flow analysis): this crate only needs
//! enough shape to pick a type hint and to decide scalar-vs-array branches
//! during lowering.

mod heuristics;
mod value_shape;

pub use heuristics::{
    infer_name_heuristic, looks_array_like_param_name, looks_string_named,
    BUFFER_COPY_SUBSTRINGS, SIZE_LIKE_SUBSTRINGS,
};
pub use value_shape::{infer_default_value, infer_literal_type, infer_value_shape};

pub use j2p_php_ast::Type;
