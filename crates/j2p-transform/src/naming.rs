//! Identifier rewriting: case conversion, reserved-word avoidance, and the
//! leading-underscore visibility convention (§3.1 invariants, §3.2
//! `PHP_RESERVED_WORDS`, §4.3.3).

use crate::sets::is_reserved_word;

/// camelCase/PascalCase → snake_case. Consecutive uppercase runs (as in an
/// acronym like `HMACKey`) collapse to a single underscore boundary rather
/// than one per letter.
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let chars: Vec<char> = name.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_is_lower_or_digit = i > 0 && (chars[i - 1].is_lowercase() || chars[i - 1].is_ascii_digit());
            let next_is_lower = i + 1 < chars.len() && chars[i + 1].is_lowercase();
            let starts_new_word = prev_is_lower_or_digit || (next_is_lower && i > 0 && chars[i - 1].is_uppercase());
            if starts_new_word {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Any-case → SCREAMING_SNAKE_CASE, used for `declaredConstants` emission
/// names (§3.2, §4.3.1).
pub fn scream_case(name: &str) -> String {
    snake_case(name).to_uppercase()
}

/// Strips a single leading underscore, used when mapping `this._x` to a
/// `private` property named `x` (§3.1 invariant, §4.3.3).
pub fn strip_leading_underscore(name: &str) -> &str {
    name.strip_prefix('_').unwrap_or(name)
}

pub fn is_private_by_convention(name: &str) -> bool {
    name.starts_with('_')
}

/// Applies the trailing-underscore reserved-word escape (§3.2, §8).
pub fn sanitize_reserved(name: &str) -> String {
    if is_reserved_word(name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

pub fn is_all_caps(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| !c.is_alphabetic() || c.is_uppercase())
}

pub fn is_pascal_case(name: &str) -> bool {
    name.chars().next().map(char::is_uppercase).unwrap_or(false)
}

/// The full identifier pipeline used for variable/property/method names
/// that aren't already promoted to constants: snake-case, then the
/// reserved-word escape.
pub fn to_php_identifier(name: &str) -> String {
    sanitize_reserved(&snake_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_basic_camel() {
        assert_eq!(snake_case("blockSize"), "block_size");
        assert_eq!(snake_case("getFoo"), "get_foo");
    }

    #[test]
    fn snake_case_collapses_acronym_runs() {
        assert_eq!(snake_case("HMACKey"), "hmac_key");
        assert_eq!(snake_case("toHMACState"), "to_hmac_state");
    }

    #[test]
    fn snake_case_leaves_already_snake_alone() {
        assert_eq!(snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn scream_case_upper_snakes() {
        assert_eq!(scream_case("sBox"), "S_BOX");
    }

    #[test]
    fn strips_leading_underscore() {
        assert_eq!(strip_leading_underscore("_rounds"), "rounds");
        assert_eq!(strip_leading_underscore("rounds"), "rounds");
    }

    #[test]
    fn reserved_word_gets_trailing_underscore() {
        assert_eq!(sanitize_reserved("list"), "list_");
        assert_eq!(sanitize_reserved("rounds"), "rounds");
    }

    #[test]
    fn all_caps_detection() {
        assert!(is_all_caps("SBOX"));
        assert!(is_all_caps("S_BOX"));
        assert!(!is_all_caps("sBox"));
    }

    #[test]
    fn pascal_case_detection() {
        assert!(is_pascal_case("AlgorithmFramework"));
        assert!(!is_pascal_case("algorithmFramework"));
    }
}
