//! Fixed, cross-file lookup tables (§3.2 "Fixed sets").
//!
//! Per §9's design note these are plain data tables, not literals scattered
//! through match arms, and per §9's "Open questions" they are calibrated to
//! the corpus this transpiler targets (single-file crypto algorithm
//! implementations extending a common framework) — test-pinned, not
//! authoritative.

/// Names treated as enum-like value containers: `X.MEMBER` access on one of
/// these lowers to the bare string literal `'MEMBER'` rather than a
/// property/array access, and any method body referencing `X` gets a
/// `global $x;` declaration (§3.2, §4.3.6).
pub const ENUM_OBJECTS: &[&str] = &["OpCodes", "AlgorithmCategory", "BlockCipherModes", "TestStatus"];

/// Helper record types from the source framework that get emitted as empty
/// stub classes at file head when extended (§4.3.1.3, §6 "Emitted file
/// layout").
pub const FRAMEWORK_TYPES: &[&str] = &[
    "Algorithm",
    "BlockCipher",
    "StreamCipher",
    "Hash",
    "Mac",
    "Kdf",
    "Aead",
    "IAlgorithm",
    "IBlockCipherInstance",
    "IHashInstance",
];

/// Property names inherited from a framework base class: a subclass never
/// re-declares these (§4.3.3.4, LSP).
pub const BASE_CLASS_PROPERTIES: &[&str] = &[
    "name", "description", "inventor", "year", "category", "sub_category", "security_status",
    "is_cache",
];

/// Any identifier colliding with one of these gets a trailing underscore
/// before emission (§3.2, §8 "names ... never collide with PHP reserved
/// words").
pub const PHP_RESERVED_WORDS: &[&str] = &[
    "abstract", "and", "array", "as", "break", "callable", "case", "catch", "class", "clone",
    "const", "continue", "declare", "default", "do", "echo", "else", "elseif", "empty",
    "enddeclare", "endfor", "endforeach", "endif", "endswitch", "endwhile", "enum", "eval",
    "exit", "extends", "final", "finally", "fn", "for", "foreach", "function", "global", "goto",
    "if", "implements", "include", "instanceof", "insteadof", "interface", "isset", "list",
    "match", "namespace", "new", "or", "print", "private", "protected", "public", "readonly",
    "require", "return", "static", "switch", "throw", "trait", "try", "unset", "use", "var",
    "while", "xor", "yield", "self", "parent",
];

pub fn is_framework_type(name: &str) -> bool {
    FRAMEWORK_TYPES.contains(&name)
}

pub fn is_enum_object(name: &str) -> bool {
    ENUM_OBJECTS.contains(&name)
}

pub fn is_base_class_property(name: &str) -> bool {
    BASE_CLASS_PROPERTIES.contains(&name)
}

pub fn is_reserved_word(name: &str) -> bool {
    PHP_RESERVED_WORDS.contains(&name.to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_reserved_words_case_insensitively() {
        assert!(is_reserved_word("Class"));
        assert!(is_reserved_word("list"));
        assert!(!is_reserved_word("rounds"));
    }

    #[test]
    fn recognizes_framework_type() {
        assert!(is_framework_type("BlockCipher"));
        assert!(!is_framework_type("MyCipher"));
    }
}
