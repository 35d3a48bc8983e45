//! Lexical primitives shared by the parser and every downstream scanner.
//!
//! A command identifier is a backslash followed by ASCII letters. Control
//! symbols such as `\\` or `\%` are skipped as a unit, so `a\\b` does not
//! contain `\b`.

use regex::Regex;
use std::sync::LazyLock;

static RE_CONTROL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\(?:[A-Za-z]+|.)").unwrap());

static RE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\label\{([^{}]*)\}").unwrap());

/// Pattern fragment for a command name, without the backslash.
pub const IDENT: &str = "[A-Za-z]+";

/// Every command identifier in `text`, in order, duplicates included.
pub fn commands(text: &str) -> impl Iterator<Item = &str> {
    RE_CONTROL
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|s| s.len() > 1 && s.as_bytes()[1].is_ascii_alphabetic())
}

/// Every `\label{...}` target in `text`, in order.
pub fn labels(text: &str) -> impl Iterator<Item = &str> {
    RE_LABEL
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// The part of `line` before the first unescaped `%`.
pub fn strip_comment(line: &str) -> &str {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match c {
            '\\' => escaped = !escaped,
            '%' if !escaped => return &line[..i],
            _ => escaped = false,
        }
    }
    line
}

/// Split a leading balanced `{...}` group off `text`.
///
/// Returns the group's content and what follows it. Escaped braces do not
/// count. `None` if `text` does not start with `{` or the group never closes.
pub fn brace_group(text: &str) -> Option<(&str, &str)> {
    if !text.starts_with('{') {
        return None;
    }
    let mut depth = 0usize;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&text[1..i], &text[i + 1..]));
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_commands() {
        let found: Vec<_> = commands(r"\mathbf{x} + \alpha_1 \\ \beta").collect();
        assert_eq!(found, vec![r"\mathbf", r"\alpha", r"\beta"]);
    }

    #[test]
    fn double_backslash_is_not_a_prefix() {
        let found: Vec<_> = commands(r"a\\b \%c").collect();
        assert!(found.is_empty(), "got {found:?}");
    }

    #[test]
    fn finds_labels() {
        let found: Vec<_> = labels(r"\section{A}\label{sec:a} text \label{eq:b}").collect();
        assert_eq!(found, vec!["sec:a", "eq:b"]);
    }

    #[test]
    fn strips_comment() {
        assert_eq!(strip_comment("a % b"), "a ");
        assert_eq!(strip_comment(r"50\% off % note"), r"50\% off ");
        assert_eq!(strip_comment(r"a\\% b"), r"a\\");
        assert_eq!(strip_comment("plain"), "plain");
    }

    #[test]
    fn balanced_group() {
        assert_eq!(brace_group("{a{b}c} rest"), Some(("a{b}c", " rest")));
        assert_eq!(brace_group(r"{\{x}y"), Some((r"\{x", "y")));
        assert_eq!(brace_group("{open"), None);
        assert_eq!(brace_group("x{}"), None);
    }
}
