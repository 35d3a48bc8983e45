//! One macro definition and everything known about it.

use crate::model::{AttributeMap, Location};
use crate::scan;
use indexmap::IndexSet;

/// A `label:text` pair for the notation index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NomenclatureEntry {
    pub label: String,
    pub text: String,
}

impl NomenclatureEntry {
    /// Parse `label:text`. `Ok(None)` for an empty value, `Err(())` unless
    /// there is exactly one colon.
    pub(crate) fn parse(value: &str) -> Result<Option<Self>, ()> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }
        let mut parts = value.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(label), Some(text), None) => Ok(Some(Self {
                label: label.trim().to_string(),
                text: text.trim().to_string(),
            })),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Symbol {
    /// `\name`, the key of the symbol in its table.
    pub command: String,
    /// Extra names defined with the same body. Parsing never fills this;
    /// library callers set it when one body should define several names.
    pub synonyms: Vec<String>,
    pub nargs: usize,
    /// Macro body, verbatim.
    pub body: String,
    /// Inline comment of the definition line.
    pub desc: String,
    /// Owning section.
    pub tag: String,
    pub example: Option<String>,
    pub location: Location,
    pub nomenclature: Option<NomenclatureEntry>,
    /// Section attributes merged with the symbol's own.
    pub other: AttributeMap,
    pub definition_order: usize,
}

impl Symbol {
    /// All names this symbol defines, primary first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.command.as_str()).chain(self.synonyms.iter().map(String::as_str))
    }

    /// Name without the leading backslash.
    pub fn bare_name(&self) -> &str {
        self.command.trim_start_matches('\\')
    }

    pub fn has_attr(&self, tag: &str) -> bool {
        self.other.contains_key(tag)
    }

    /// Definition text that can be included any number of times: each name
    /// is `\renewcommand`ed if it exists and `\newcommand`ed otherwise.
    /// `wrapper` transforms the body before it is embedded.
    pub fn regenerate_definition(&self, wrapper: impl Fn(&str) -> String) -> String {
        let body = wrapper(&self.body);
        let mut out = self
            .names()
            .map(|name| self.single_definition(name, &body))
            .collect::<Vec<_>>()
            .join("\n");
        if !self.desc.is_empty() {
            out.push_str(&format!("% {}", self.desc));
        }
        out
    }

    /// [`Symbol::regenerate_definition`] with the body unchanged.
    pub fn tex_definition(&self) -> String {
        self.regenerate_definition(|body| body.to_string())
    }

    fn single_definition(&self, name: &str, body: &str) -> String {
        let params = if self.nargs > 0 {
            format!("{{{}}}[{}]{{{}}}", name, self.nargs, body)
        } else {
            format!("{{{}}}{{{}}}", name, body)
        };
        format!(
            "\\ifdefined{name}%\n  \\renewcommand{params}%\n\\else%\n  \\newcommand{params}%\n\\fi\n"
        )
    }

    /// Commands used in the body, distinct, in order of first appearance.
    pub fn extract_references(&self) -> Vec<String> {
        scan::commands(&self.body)
            .map(str::to_string)
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }
}
