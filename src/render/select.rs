//! Definitions of a subset of sections, optionally coloured per section.

use super::latex;
use super::RenderError;
use crate::model::Section;
use crate::table::SymbolTable;
use indexmap::IndexSet;

/// Selector that matches every section.
pub const ALL: &str = "all";

#[derive(Debug, Clone)]
pub struct Selection {
    /// Comma-separated name fragments; [`ALL`] selects everything.
    pub include: String,
    pub red: String,
    pub green: String,
    pub blue: String,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            include: ALL.to_string(),
            red: String::new(),
            green: String::new(),
            blue: String::new(),
        }
    }
}

/// Sections whose name contains any of the comma-separated fragments of
/// `which`, in selector order. Every fragment must match something.
pub fn sections_matching<'t>(
    table: &'t SymbolTable,
    which: &str,
) -> Result<Vec<&'t Section>, RenderError> {
    let mut found: IndexSet<&str> = IndexSet::new();
    for selector in which.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let matched: Vec<&Section> = table
            .sections()
            .filter(|s| selector == ALL || s.name.contains(selector))
            .collect();
        if matched.is_empty() {
            return Err(RenderError::UnknownSection {
                selector: selector.to_string(),
                available: table.sections().map(|s| s.name.clone()).collect(),
            });
        }
        found.extend(matched.iter().map(|s| s.name.as_str()));
    }
    Ok(found.into_iter().filter_map(|name| table.section(name)).collect())
}

/// Definitions of every symbol in the selected sections. Red wins over
/// blue, blue over green.
pub fn select(table: &SymbolTable, selection: &Selection) -> Result<String, RenderError> {
    let selected = sections_matching(table, &selection.include)?;
    if selected.is_empty() {
        return Err(RenderError::NothingSelected(selection.include.clone()));
    }
    let colored = |which: &str| -> Result<IndexSet<String>, RenderError> {
        Ok(sections_matching(table, which)?
            .into_iter()
            .map(|s| s.name.clone())
            .collect())
    };
    let red = colored(&selection.red)?;
    let blue = colored(&selection.blue)?;
    let green = colored(&selection.green)?;

    let mut out = String::new();
    for section in selected {
        let rgb = if red.contains(&section.name) {
            Some([0.5, 0.0, 0.0])
        } else if blue.contains(&section.name) {
            Some([0.0, 0.0, 0.5])
        } else if green.contains(&section.name) {
            Some([0.0, 0.3, 0.0])
        } else {
            None
        };

        for symbol in table.section_symbols(section) {
            let definition = match rgb {
                Some(rgb) => {
                    symbol.regenerate_definition(|body| latex::color_rgb(&format!(" {body}"), rgb))
                }
                None => symbol.tex_definition(),
            };
            out.push_str(&definition);
            out.push('\n');
        }
    }
    Ok(out)
}
