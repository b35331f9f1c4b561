//! Wildcard-expression translation
//!
//! Control-file filters and batch glob components share one small wildcard
//! grammar: `*` matches zero or more characters, `?` matches exactly one,
//! everything else is literal. Expressions compile to anchored,
//! case-sensitive regexes.

use crate::error::{LandfallError, Result};
use regex::Regex;

/// Compile a wildcard expression into an anchored regex.
pub fn compile_wildcard(expr: &str) -> Result<Regex> {
    let mut body = String::with_capacity(expr.len() * 2);

    for ch in expr.chars() {
        match ch {
            '*' => body.push_str(".*"),
            '?' => body.push('.'),
            other => body.push_str(&regex::escape(&other.to_string())),
        }
    }

    Regex::new(&format!("^{}$", body))
        .map_err(|e| LandfallError::Config(format!("invalid wildcard expression {:?}: {}", expr, e)))
}

/// Whether the expression contains any wildcard metacharacters.
pub fn has_wildcards(expr: &str) -> bool {
    expr.contains('*') || expr.contains('?')
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_star_matches_any_run() {
        let re = compile_wildcard("*.ctl").unwrap();
        assert!(re.is_match("customer.ctl"));
        assert!(re.is_match(".ctl"));
        assert!(!re.is_match("customer.ctl.bak"));
    }

    #[test]
    fn test_question_matches_single_char() {
        let re = compile_wildcard("part-?").unwrap();
        assert!(re.is_match("part-0"));
        assert!(!re.is_match("part-10"));
        assert!(!re.is_match("part-"));
    }

    #[test]
    fn test_literal_dots_are_escaped() {
        let re = compile_wildcard("a.b").unwrap();
        assert!(re.is_match("a.b"));
        assert!(!re.is_match("axb"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let re = compile_wildcard("*.ctl").unwrap();
        assert!(!re.is_match("CUSTOMER.CTL"));
    }

    #[test]
    fn test_has_wildcards() {
        assert!(has_wildcards("a*"));
        assert!(has_wildcards("a?c"));
        assert!(!has_wildcards("plain"));
    }
}
