//! PHP type hints (§3.1 "Type").
//!
//! A single [`Type::fmt`] implementation is the only place a type hint is
//! ever rendered to text; nothing else in the workspace formats a type by
//! hand.

use std::fmt;

/// A PHP 8.1+ type hint, as it would appear in a parameter, property, or
/// return-type position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Float,
    String,
    Bool,
    Array,
    Object,
    Mixed,
    Void,
    Null,
    Callable,
    Iterable,
    Never,
    /// `?T`.
    Nullable(Box<Type>),
    /// `array<T>` for doc-block purposes; always emits as bare `array`.
    TypedArray(Box<Type>),
    /// `A|B|...`.
    Union(Vec<Type>),
    /// A user-defined class, interface, trait, or enum name.
    Named(String),
}

impl Type {
    pub fn nullable(inner: Type) -> Type {
        match inner {
            Type::Nullable(_) | Type::Mixed | Type::Null => inner,
            other => Type::Nullable(Box::new(other)),
        }
    }

    pub fn typed_array(element: Type) -> Type {
        Type::TypedArray(Box::new(element))
    }

    pub fn is_array_like(&self) -> bool {
        matches!(self, Type::Array | Type::TypedArray(_))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::String => write!(f, "string"),
            Type::Bool => write!(f, "bool"),
            Type::Array => write!(f, "array"),
            Type::Object => write!(f, "object"),
            Type::Mixed => write!(f, "mixed"),
            Type::Void => write!(f, "void"),
            Type::Null => write!(f, "null"),
            Type::Callable => write!(f, "callable"),
            Type::Iterable => write!(f, "iterable"),
            Type::Never => write!(f, "never"),
            Type::Nullable(inner) => write!(f, "?{inner}"),
            // The element type is retained only for doc-block generation;
            // the hint position itself always gets plain `array`.
            Type::TypedArray(_) => write!(f, "array"),
            Type::Union(types) => {
                let rendered: Vec<String> = types.iter().map(Type::to_string).collect();
                write!(f, "{}", rendered.join("|"))
            }
            Type::Named(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_render_as_keywords() {
        assert_eq!(Type::Int.to_string(), "int");
        assert_eq!(Type::Mixed.to_string(), "mixed");
    }

    #[test]
    fn nullable_wraps_with_question_mark() {
        assert_eq!(Type::nullable(Type::String).to_string(), "?string");
    }

    #[test]
    fn nullable_is_idempotent_over_mixed() {
        assert_eq!(Type::nullable(Type::Mixed), Type::Mixed);
    }

    #[test]
    fn typed_array_erases_to_bare_array() {
        assert_eq!(Type::typed_array(Type::Int).to_string(), "array");
    }

    #[test]
    fn union_joins_with_pipe() {
        let u = Type::Union(vec![Type::Int, Type::String]);
        assert_eq!(u.to_string(), "int|string");
    }

    #[test]
    fn named_renders_verbatim() {
        assert_eq!(Type::Named("BlockCipher".into()).to_string(), "BlockCipher");
    }
}
