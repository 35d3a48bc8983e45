//! Parser module: line classifier, attribute blocks, and the section/symbol
//! builder that feeds a [`SymbolTable`].

pub mod attrs;
pub mod builder;
pub mod hierarchy;
pub mod lexer;
pub mod lookahead;

use crate::model::Event;
use crate::table::{ParseOptions, SymbolTable};
use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::PathBuf;

/// Where one run reads its definitions from.
pub enum Input {
    Files(Vec<PathBuf>),
    /// Already-read text with the name used in locations.
    Text { name: String, content: String },
}

/// Parse every input into one table and link the section hierarchy.
/// Returns the table plus all events, file after file.
pub fn load(input: Input, options: ParseOptions) -> Result<(SymbolTable, Vec<Event>)> {
    let mut table = SymbolTable::with_options(options);
    let mut events = Vec::new();

    match input {
        Input::Files(paths) => {
            for path in &paths {
                debug!("parsing {}", path.display());
                let content = fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                let name = path.display().to_string();
                events.extend(table.parse_str(&content, &name)?);
            }
        }
        Input::Text { name, content } => {
            debug!("parsing {name}");
            events.extend(table.parse_str(&content, &name)?);
        }
    }

    table.link_hierarchy();
    info!(
        "Loaded {} sections with {} symbols.",
        table.section_count(),
        table.symbol_count()
    );
    Ok((table, events))
}
