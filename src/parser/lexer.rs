//! Line classifier: turns raw `.tex` lines into [`Token`]s.
//!
//! Per line, in priority order:
//!
//! 1. `\providecommand` is rewritten to `\newcommand`
//! 2. `\newcommand{\name}{body} % comment` → [`Token::Definition`], arity 0
//! 3. `\newcommand{\name}[N]{body} % comment` → [`Token::Definition`], arity N
//! 4. `%:tag: content` plus following plain `%` lines → [`Token::TaggedBlock`]
//! 5. anything else → [`Token::Passthrough`]

use super::lookahead::Lookahead;
use crate::error::ParseError;
use crate::model::{Location, Token};
use crate::scan;
use log::warn;
use regex::Regex;
use std::iter::Enumerate;
use std::str::Lines;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

static RE_PROVIDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([[:space:]]*)\\providecommand").unwrap());

// Name plus optional arity; the body is a balanced group scanned by hand.
static RE_DEFINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^[[:space:]]*\\(?:re)?newcommand\*?[[:space:]]*\{{\\({})\}}[[:space:]]*(?:\[([0-9]+)\])?[[:space:]]*",
        scan::IDENT
    ))
    .unwrap()
});

const COMMENT: &str = "%";
const TAGGED_COMMENT: &str = "%:";

// -- Public API ---------------------------------------------------------------

/// Classify `input` line by line. Locations carry `filename`.
pub fn tokenize<'a>(input: &'a str, filename: &str) -> Tokens<'a> {
    Tokens {
        lines: Lookahead::new(input.lines().enumerate()),
        filename: filename.to_string(),
    }
}

/// Lazy token stream over one input; not rewindable.
pub struct Tokens<'a> {
    lines: Lookahead<Enumerate<Lines<'a>>>,
    filename: String,
}

impl Iterator for Tokens<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, line) = self.lines.next()?;
        let location = Location::new(self.filename.as_str(), index + 1, line);

        if let Some((command, nargs, body, comment)) = parse_definition(line) {
            return Some(Ok(Token::Definition {
                command,
                nargs,
                body,
                comment,
                location,
            }));
        }

        if is_tagged_comment(line) {
            return Some(self.tagged_block(line, location));
        }

        Some(Ok(Token::Passthrough {
            line: line.to_string(),
            location,
        }))
    }
}

impl Tokens<'_> {
    /// Read the tag from `line`, then swallow the plain comment lines after it.
    fn tagged_block(&mut self, line: &str, location: Location) -> Result<Token, ParseError> {
        let rest = &line.trim_start()[TAGGED_COMMENT.len()..];
        let Some((tag, first)) = rest.split_once(':') else {
            return Err(ParseError::UnterminatedTag { location });
        };

        let mut lines = Vec::new();
        push_content(&mut lines, first.trim());
        while let Some((_, next)) = self
            .lines
            .next_if(|(_, l)| is_comment(l) && !is_tagged_comment(l))
        {
            push_content(&mut lines, comment_content(next));
        }

        Ok(Token::TaggedBlock {
            tag: tag.trim().to_string(),
            lines,
            location,
        })
    }
}

// -- Helper functions ---------------------------------------------------------

/// Match a one-line definition. Returns (command, nargs, body, comment).
fn parse_definition(line: &str) -> Option<(String, usize, String, String)> {
    let line = RE_PROVIDE.replace(line, "${1}\\newcommand");
    let caps = RE_DEFINE.captures(&line)?;
    let command = format!("\\{}", &caps[1]);
    let nargs = match caps.get(2) {
        Some(m) => match m.as_str().parse() {
            Ok(n) => n,
            Err(err) => {
                warn!("Arity [{}] of {command} is unusable ({err}), keeping the line as is", m.as_str());
                return None;
            }
        },
        None => 0,
    };
    let head = caps.get(0)?.end();
    let (body, rest) = scan::brace_group(&line[head..])?;
    let comment = rest.replace(COMMENT, "").trim().to_string();
    Some((command, nargs, body.to_string(), comment))
}

fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with(COMMENT)
}

fn is_tagged_comment(line: &str) -> bool {
    line.trim_start().starts_with(TAGGED_COMMENT)
}

/// Text of a comment line without its `%` markers and surrounding blanks.
fn comment_content(line: &str) -> &str {
    line.trim().trim_start_matches('%').trim_start()
}

fn push_content(lines: &mut Vec<String>, content: &str) {
    if !content.is_empty() {
        lines.push(content.to_string());
    }
}
