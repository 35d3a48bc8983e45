//! Transitive closure of the symbols a document needs.

use crate::symbol::Symbol;
use crate::table::SymbolTable;
use indexmap::IndexSet;
use log::{debug, info};

/// Symbols reachable from `used`, following the commands each body refers
/// to. Commands the table does not define are skipped. The result is in
/// definition order, so every definition precedes its first use.
pub fn closure<'t, I, S>(table: &'t SymbolTable, used: I) -> Vec<&'t Symbol>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut todo: Vec<String> = used.into_iter().map(Into::into).collect();
    let mut done: IndexSet<String> = IndexSet::new();
    let mut found: Vec<&Symbol> = Vec::new();

    while let Some(command) = todo.pop() {
        if !done.insert(command.clone()) {
            continue;
        }
        match table.symbol(&command) {
            Some(symbol) => {
                debug!("Found command {command:?}");
                todo.extend(symbol.extract_references());
                found.push(symbol);
            }
            None => debug!("Not found {command:?}"),
        }
    }

    found.sort_by_key(|s| s.definition_order);
    info!("Extracted {} symbols", found.len());
    found
}

/// Definitions of `symbols`, one after the other.
pub fn definitions(symbols: &[&Symbol]) -> String {
    symbols
        .iter()
        .map(|s| format!("{}\n", s.tex_definition()))
        .collect()
}
