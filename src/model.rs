//! Data model for parsed macro files, independent of any output format.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag that declares (or completes) a section.
pub const SECTION: &str = "section";
/// Cross-reference target; the section's value prevails over the symbol's.
pub const DEF: &str = "def";
/// `label:text` nomenclature entry.
pub const NOMENC: &str = "nomenc";
pub const NOMENC_EXCLUDE: &str = "nomenc-exclude";
pub const NOSUMMARY: &str = "nosummary";
pub const SORT: &str = "sort";
pub const EXAMPLE: &str = "example";

/// Tags recognized without a warning.
pub const KNOWN_TAGS: &[&str] = &[
    DEF,
    NOMENC,
    NOMENC_EXCLUDE,
    NOSUMMARY,
    SORT,
    "notfinal",
    "deprecated",
    EXAMPLE,
    "todo",
    "no-inline",
    "if",
];

/// Ordered tag → value map. Multi-line values are joined with spaces.
pub type AttributeMap = IndexMap<String, String>;

/// Where something was found: file, 1-based line, and the raw line text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub filename: String,
    pub line: usize,
    pub text: String,
}

impl Location {
    pub fn new(filename: impl Into<String>, line: usize, text: &str) -> Self {
        Self {
            filename: filename.into(),
            line,
            text: text.trim_end_matches(['\n', '\r']).to_string(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: line {:4}: {}", self.filename, self.line, self.text)
    }
}

/// One classified input line (or run of lines, for tagged blocks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `\newcommand{\name}[N]{body} % comment`
    Definition {
        command: String,
        nargs: usize,
        body: String,
        comment: String,
        location: Location,
    },
    /// `%:tag: content` plus its `%` continuation lines.
    TaggedBlock {
        tag: String,
        lines: Vec<String>,
        location: Location,
    },
    /// Anything else, untouched.
    Passthrough { line: String, location: Location },
}

impl Token {
    pub fn location(&self) -> &Location {
        match self {
            Token::Definition { location, .. }
            | Token::TaggedBlock { location, .. }
            | Token::Passthrough { location, .. } => location,
        }
    }

    /// Tag name when this is a tagged block.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Token::TaggedBlock { tag, .. } => Some(tag),
            _ => None,
        }
    }
}

/// A named group of symbols, e.g. `greek` or `chapter1/vectors`.
#[derive(Debug, Clone)]
pub struct Section {
    pub name: String,
    pub description: String,
    /// Reserved by name but not declared yet. The first declaration
    /// completes it; any later one is a duplicate.
    pub placeholder: bool,
    /// Command names registered under this section, in encounter order.
    pub symbols: Vec<String>,
    /// Name up to the last `/`, if any. The parent need not exist.
    pub parent: Option<String>,
    /// Direct children, filled by the hierarchy post-pass.
    pub subs: Vec<String>,
    pub location: Location,
    pub definition_order: usize,
    /// Inherited by every symbol of the section.
    pub attrs: AttributeMap,
}

impl Section {
    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }
}

/// Output of the builder, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A section was declared or completed.
    Section(String),
    /// A symbol was defined.
    Symbol(String),
    /// A line outside any definition, to be reproduced verbatim.
    Passthrough { line: String, location: Location },
}

/// Non-fatal problems noticed while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    UnknownTag { tag: String, location: Location },
    TagOverwritten { tag: String, location: Location },
    FloatingTag { tag: String, location: Location },
    Disagreement {
        command: String,
        tag: String,
        section_value: String,
        symbol_value: String,
        location: Location,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnknownTag { tag, location } => {
                write!(f, "unknown tag {tag:?}\n   at: {location}")
            }
            Warning::TagOverwritten { tag, location } => {
                write!(f, "tag {tag:?} given twice, keeping the last\n   at: {location}")
            }
            Warning::FloatingTag { tag, location } => {
                write!(f, "floating tagged line {tag:?} is not attached to anything\n   at: {location}")
            }
            Warning::Disagreement {
                command,
                tag,
                section_value,
                symbol_value,
                location,
            } => write!(
                f,
                "{command}: attribute {tag:?} is {symbol_value:?} but its section says {section_value:?}\n   at: {location}"
            ),
        }
    }
}
