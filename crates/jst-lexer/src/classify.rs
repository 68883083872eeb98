//! Character-class predicates for the parser's dispatch on the current
//! character, plus the multi-character operator tables it matches
//! greedily (longest match first).

pub fn is_opener(c: char) -> bool {
    matches!(c, '(' | '{' | '[')
}

pub fn is_closer(c: char) -> bool {
    matches!(c, ')' | '}' | ']')
}

pub fn is_separator(c: char) -> bool {
    matches!(c, '.' | ',' | ';' | ':')
}

pub fn is_operator_char(c: char) -> bool {
    matches!(c, '+' | '-' | '/' | '*' | '%' | '~' | '^' | '=' | '<' | '>' | '&' | '|' | '!' | '?')
}

pub fn is_delimiter(c: char) -> bool {
    is_opener(c) || is_closer(c) || is_separator(c) || is_operator_char(c)
}

/// Comparison operators, longest first so a greedy scan matches `===`
/// before `==` and `!==` before `!=`.
pub const COMPARISON_OPS: &[&str] = &["===", "!==", "==", "!=", "<=", ">=", "<", ">"];

/// Assignment operators, longest first.
pub const ASSIGN_OPS: &[&str] = &[
    ">>=", "<<=", "**=", "+=", "-=", "*=", "/=", "|=", "&=", "^=", "%=", "=",
];

/// Greedily matches the longest operator from `table` starting at `src[pos..]`.
/// Returns the matched operator text, or `None`.
pub fn match_longest<'a>(src: &'a str, pos: usize, table: &[&'a str]) -> Option<&'a str> {
    table
        .iter()
        .filter(|op| src[pos..].starts_with(**op))
        .max_by_key(|op| op.len())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_strict_equality_before_loose() {
        assert_eq!(match_longest("=== x", 0, COMPARISON_OPS), Some("==="));
    }

    #[test]
    fn matches_loose_equality_when_no_strict() {
        assert_eq!(match_longest("== x", 0, COMPARISON_OPS), Some("=="));
    }

    #[test]
    fn matches_plain_assign_last() {
        assert_eq!(match_longest("= x", 0, ASSIGN_OPS), Some("="));
        assert_eq!(match_longest("+= x", 0, ASSIGN_OPS), Some("+="));
    }

    #[test]
    fn delimiter_classes_are_disjoint_from_identifiers() {
        assert!(is_opener('('));
        assert!(is_closer(')'));
        assert!(is_separator('.'));
        assert!(is_operator_char('='));
        assert!(!is_delimiter('x'));
    }
}
