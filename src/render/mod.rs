//! Renderers: LaTeX views of a loaded [`SymbolTable`].

pub mod compact;
pub mod latex;
pub mod nomenc;
pub mod select;
pub mod table;

use crate::model::Section;
use crate::symbol::Symbol;
use crate::table::SymbolTable;
use thiserror::Error;

/// Trait for rendering a whole table in one output style.
pub trait Renderer {
    fn render(&self, table: &SymbolTable) -> Result<String, RenderError>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error(
        "While considering symbol {command}: could not find a prefix for reference {reference:?}; \
         \\cref needs one (e.g. \"eq:{reference}\")"
    )]
    UnprefixedReference { command: String, reference: String },

    #[error("Section {selector:?} not found in {available:?}")]
    UnknownSection {
        selector: String,
        available: Vec<String>,
    },

    #[error("No sections selected (which: {0:?})")]
    NothingSelected(String),
}

/// Ordering of sections and of the symbols inside each section.
#[derive(Debug, Clone, Copy, Default)]
pub struct Order {
    pub sections_alpha: bool,
    pub symbols_alpha: bool,
}

impl Order {
    pub fn sections<'t>(&self, table: &'t SymbolTable) -> Vec<&'t Section> {
        let mut sections: Vec<_> = table.sections().collect();
        if self.sections_alpha {
            sections.sort_by(|a, b| a.name.cmp(&b.name));
        } else {
            sections.sort_by_key(|s| s.definition_order);
        }
        sections
    }

    pub fn symbols<'t>(&self, table: &'t SymbolTable, section: &'t Section) -> Vec<&'t Symbol> {
        let mut symbols: Vec<_> = table.section_symbols(section).collect();
        if self.symbols_alpha {
            symbols.sort_by_cached_key(|s| s.command.to_lowercase());
        } else {
            symbols.sort_by_key(|s| s.definition_order);
        }
        symbols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders() {
        let mut table = SymbolTable::new();
        table
            .parse_str(
                "%:section:z : Z\n\\newcommand{\\b}{b}\n\\newcommand{\\A}{a}\n%:section:a : A\n",
                "t.tex",
            )
            .unwrap();

        let by_definition = Order::default();
        let names: Vec<_> = by_definition
            .sections(&table)
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["z", "a"]);

        let alpha = Order {
            sections_alpha: true,
            symbols_alpha: true,
        };
        let names: Vec<_> = alpha.sections(&table).iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "z"]);

        let z = table.section("z").unwrap();
        let cmds: Vec<_> = alpha
            .symbols(&table, z)
            .iter()
            .map(|s| s.command.as_str())
            .collect();
        assert_eq!(cmds, vec![r"\A", r"\b"]);
        let cmds: Vec<_> = by_definition
            .symbols(&table, z)
            .iter()
            .map(|s| s.command.as_str())
            .collect();
        assert_eq!(cmds, vec![r"\b", r"\A"]);
    }
}
