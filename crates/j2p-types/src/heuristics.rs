//! Name-heuristic tables (§4.2 "Name heuristics").
//!
//! Kept as plain data tables rather than string literals scattered through
//! match arms, per §9's design note: "a port should expose the heuristic
//! lists as data tables, not hard-coded strings, so that they can be tuned
//! without changing control flow."

use j2p_php_ast::Type;

/// Rule 1 substrings/prefixes/suffixes that mean "this holds a count or
/// position" → `int`.
const INT_LIKE_SUBSTRINGS: &[&str] = &[
    "size", "length", "count", "len", "index", "offset", "position", "total",
];

/// Rule 1's single-letter loop counters.
const INT_LIKE_SINGLE_LETTERS: &[&str] = &["i", "j", "n"];

/// Rule 3: plural byte/word/block/buffer names and crypto state names that
/// mean "this holds a bit/byte array" → `array`.
const ARRAY_LIKE_NAMES: &[&str] = &[
    "bytes", "words", "blocks", "buffers", "buffer", "state", "nonce", "iv", "counter", "tag",
];

/// Rule 5's additional single-letter loop indices (beyond rule 1's i/j/n).
const EXTRA_INT_LIKE_SINGLE_LETTERS: &[&str] = &["l", "m"];

/// Maps an identifier to a guessed PHP type using the ordered rules of
/// §4.2 — first match wins.
pub fn infer_name_heuristic(name: &str) -> Type {
    let lower = name.to_lowercase();

    // Rule 1: size/length/count/len/index/offset/position/total, i/j/n,
    // num_ prefix, _num suffix.
    if INT_LIKE_SINGLE_LETTERS.contains(&lower.as_str()) {
        return Type::Int;
    }
    if lower.starts_with("num_") || lower.ends_with("_num") {
        return Type::Int;
    }
    if INT_LIKE_SUBSTRINGS.iter().any(|needle| lower.contains(needle)) {
        return Type::Int;
    }

    // Rule 2: the literal name `bits`.
    if lower == "bits" {
        return Type::Array;
    }

    // Rule 3: plural byte/word/block/buffer/bytes names, crypto state names.
    if ARRAY_LIKE_NAMES.iter().any(|needle| lower.contains(needle)) {
        return Type::Array;
    }

    // Rule 4: `byte` or `b<digit>`.
    if lower == "byte" || is_b_digit_name(&lower) {
        return Type::Int;
    }

    // Rule 5: single-letter loop indices i j l m n.
    if lower.len() == 1
        && (INT_LIKE_SINGLE_LETTERS.contains(&lower.as_str())
            || EXTRA_INT_LIKE_SINGLE_LETTERS.contains(&lower.as_str()))
    {
        return Type::Int;
    }

    // Rule 6: otherwise.
    Type::Mixed
}

fn is_b_digit_name(lower: &str) -> bool {
    let mut chars = lower.chars();
    matches!(chars.next(), Some('b')) && chars.clone().next().is_some() && chars.all(|c| c.is_ascii_digit())
}

/// Names known to be string-shaped by convention, used by the `.length`
/// disambiguation in `j2p-transform` (§4.3.6 "Array `.length`").
pub const STRING_LIKE_NAMES: &[&str] = &["encoded", "decoded", "text", "string", "html"];

pub const STRING_LIKE_SUFFIXES: &[&str] = &["_str", "_string", "_text"];

pub fn looks_string_named(name: &str) -> bool {
    let lower = name.to_lowercase();
    STRING_LIKE_NAMES.contains(&lower.as_str())
        || STRING_LIKE_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}

/// Names that make a parameter a candidate for pass-by-reference
/// (§4.3.5), beyond the explicit array-type case.
pub const REFERENCE_CANDIDATE_SUBSTRINGS: &[&str] = &[
    "state", "block", "key", "data", "input", "output", "buffer", "bytes", "arr",
];

pub const REFERENCE_CANDIDATE_EXACT: &[&str] = &["ka", "kb"];

pub fn looks_array_like_param_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    if lower.len() == 1 {
        return true;
    }
    REFERENCE_CANDIDATE_EXACT.contains(&lower.as_str())
        || REFERENCE_CANDIDATE_SUBSTRINGS.iter().any(|needle| lower.contains(needle))
}

/// Names recognized by the typed-array size-vs-copy disambiguation
/// (§4.3.6 "Typed-array creation").
pub const BUFFER_COPY_SUBSTRINGS: &[&str] = &[
    "key", "data", "buffer", "bytes", "array", "block", "state", "nonce", "iv", "input", "output",
    "plaintext", "ciphertext", "message", "result", "digest", "hash",
];

pub const SIZE_LIKE_SUBSTRINGS: &[&str] = &["size", "length", "count", "len"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_letter_i_is_int() {
        assert_eq!(infer_name_heuristic("i"), Type::Int);
    }

    #[test]
    fn length_substring_is_int() {
        assert_eq!(infer_name_heuristic("blockSize"), Type::Int);
        assert_eq!(infer_name_heuristic("keyLength"), Type::Int);
    }

    #[test]
    fn num_prefix_and_suffix_are_int() {
        assert_eq!(infer_name_heuristic("num_rounds"), Type::Int);
        assert_eq!(infer_name_heuristic("round_num"), Type::Int);
    }

    #[test]
    fn bits_is_array() {
        assert_eq!(infer_name_heuristic("bits"), Type::Array);
    }

    #[test]
    fn crypto_state_names_are_array() {
        assert_eq!(infer_name_heuristic("state"), Type::Array);
        assert_eq!(infer_name_heuristic("nonce"), Type::Array);
        assert_eq!(infer_name_heuristic("inputBytes"), Type::Array);
    }

    #[test]
    fn key_alone_is_not_array_like_by_name() {
        // "key" isn't in the array-name table; only buffer/bytes/words/
        // blocks/state/nonce/iv/counter/tag are.
        assert_eq!(infer_name_heuristic("roundKeys"), Type::Mixed);
    }

    #[test]
    fn byte_and_b_digit_are_int() {
        assert_eq!(infer_name_heuristic("byte"), Type::Int);
        assert_eq!(infer_name_heuristic("b0"), Type::Int);
        assert_eq!(infer_name_heuristic("b12"), Type::Int);
    }

    #[test]
    fn extra_single_letter_indices_are_int() {
        assert_eq!(infer_name_heuristic("l"), Type::Int);
        assert_eq!(infer_name_heuristic("m"), Type::Int);
    }

    #[test]
    fn unmatched_name_is_mixed() {
        assert_eq!(infer_name_heuristic("algorithm"), Type::Mixed);
    }

    #[test]
    fn string_like_names_detected() {
        assert!(looks_string_named("encoded"));
        assert!(looks_string_named("cipher_text_str"));
        assert!(!looks_string_named("state"));
    }

    #[test]
    fn array_like_param_names_detected() {
        assert!(looks_array_like_param_name("s"));
        assert!(looks_array_like_param_name("ka"));
        assert!(looks_array_like_param_name("inputBuffer"));
        assert!(!looks_array_like_param_name("algorithm"));
    }
}
