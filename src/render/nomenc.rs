//! Nomenclature (notation index) output.

use super::latex::{self, LongTable};
use super::{RenderError, Renderer};
use crate::model::{DEF, NOMENC_EXCLUDE, SORT};
use crate::symbol::Symbol;
use crate::table::SymbolTable;
use crate::usage::{Usage, UsageMap};
use anyhow::{anyhow, Result};
use indexmap::IndexSet;
use log::{debug, info, warn};

const STYLES: &[&str] = &["table", "entries"];

/// Create a nomenclature renderer. With `usages`, symbols that are not
/// used anywhere are marked (`table`) or left out (`entries`), and the
/// first labelled use is referenced.
pub fn create(style: &str, usages: Option<UsageMap>) -> Result<Box<dyn Renderer>> {
    match style {
        "table" => Ok(Box::new(NomencTable { usages })),
        "entries" => Ok(Box::new(NomencEntries { usages })),
        _ => Err(anyhow!(
            "No known style {:?}. Valid options: {}.",
            style,
            STYLES.join(", ")
        )),
    }
}

/// Commands both defined and used; everything defined when there is no
/// usage map.
fn used_symbols<'t>(table: &'t SymbolTable, usages: Option<&UsageMap>) -> IndexSet<&'t str> {
    let Some(usages) = usages else {
        return table.symbols().map(|s| s.command.as_str()).collect();
    };

    let have: IndexSet<&str> = table.symbols().map(|s| s.command.as_str()).collect();
    let unused: Vec<_> = have.iter().filter(|c| !usages.contains_key(**c)).collect();
    let undefined: Vec<_> = usages.keys().filter(|c| !have.contains(c.as_str())).collect();
    debug!("have but not used: {unused:?}");
    debug!("used but not have: {undefined:?}");

    have.into_iter().filter(|c| usages.contains_key(*c)).collect()
}

/// The `def` cross-reference of a symbol, which must carry a `prefix:`.
fn reference(symbol: &Symbol) -> Result<Option<&str>, RenderError> {
    match symbol.other.get(DEF).map(String::as_str) {
        None | Some("") => Ok(None),
        Some(r) if r.contains(':') => Ok(Some(r)),
        Some(r) => Err(RenderError::UnprefixedReference {
            command: symbol.command.clone(),
            reference: r.to_string(),
        }),
    }
}

/// `(label, text)` for symbols without a nomenclature entry: the command
/// itself and its description. `None` for symbols with arguments.
fn label_and_text(symbol: &Symbol) -> Option<(String, String)> {
    match &symbol.nomenclature {
        Some(entry) => Some((latex::math(&entry.label), entry.text.clone())),
        None if symbol.nargs == 0 => Some((latex::math(&symbol.command), symbol.desc.clone())),
        None => None,
    }
}

/// Leave a `%` comment in the output, optionally logging it too.
fn note(out: &mut String, msg: String, log: bool) {
    if log {
        warn!("{msg}");
    }
    out.push_str(&format!("% {msg}\n"));
}

/// Longtable grouped by section, parent sections first.
pub struct NomencTable {
    pub usages: Option<UsageMap>,
}

impl Renderer for NomencTable {
    fn render(&self, table: &SymbolTable) -> Result<String, RenderError> {
        let used = used_symbols(table, self.usages.as_ref());
        let mut out = LongTable::new(&["l", "p{6cm}", "l", "r", "l"]);
        out.row(&["symbol", "meaning", "defined in", "first use"]);

        for section in table.sections_parent_first() {
            let symbols: Vec<_> = table
                .section_symbols(section)
                .filter(|s| !s.has_attr(NOMENC_EXCLUDE))
                .filter(|s| s.nomenclature.is_some() || s.nargs == 0)
                .collect();
            if symbols.is_empty() && section.subs.is_empty() {
                continue;
            }

            let title = if section.description.is_empty() {
                "-"
            } else {
                section.description.as_str()
            };
            if section.is_top_level() {
                out.row_multicolumn(&[], 4, "l", &format!("\\nomencsectionname{{{title}}}"));
                out.hline();
            } else {
                out.row_multicolumn(&[], 4, "c", &format!("\\nomencsubsectionname{{{title}}}"));
            }

            for symbol in symbols {
                let Some((label, mut text)) = label_and_text(symbol) else {
                    continue;
                };
                if !used.contains(symbol.command.as_str()) {
                    text = format!("\\unused {text}");
                }

                let (defined_in, page) = match reference(symbol)? {
                    Some(r) => (format!("$\\to$\\cref{{{r}}}"), format!("\\pageref{{{r}}}")),
                    None => (String::new(), String::new()),
                };

                let first_use = self
                    .usages
                    .as_ref()
                    .and_then(|u| u.get(&symbol.command))
                    .and_then(|uses| Usage::first_labelled(uses))
                    .map(|l| format!("\\cref{{{l}}}"))
                    .unwrap_or_default();

                out.row(&[label, text, defined_in, page, first_use]);
            }
        }

        Ok(out.finish())
    }
}

/// One `\nomenclature[group,sort]{label}{text}` line per symbol.
pub struct NomencEntries {
    pub usages: Option<UsageMap>,
}

impl Renderer for NomencEntries {
    fn render(&self, table: &SymbolTable) -> Result<String, RenderError> {
        let used = used_symbols(table, self.usages.as_ref());
        let mut out = String::new();

        for section in table.sections() {
            let group = format!("symbols-{}", section.name.replace('/', "-"));

            for symbol in table.section_symbols(section) {
                if !used.contains(symbol.command.as_str()) {
                    continue;
                }
                let name = symbol.bare_name();
                if symbol.has_attr(NOMENC_EXCLUDE) {
                    note(
                        &mut out,
                        format!("Skipping symbol {} because of {NOMENC_EXCLUDE}", symbol.command),
                        false,
                    );
                    continue;
                }
                let Some((label, text)) = label_and_text(symbol) else {
                    note(
                        &mut out,
                        format!("Skipping symbol {} because it has args.", symbol.command),
                        false,
                    );
                    continue;
                };

                let mut text = text.trim().to_string();
                if !text.is_empty() && !text.ends_with('.') {
                    info!("Adding period to {label:?}/{text:?}");
                    text.push('.');
                }

                let see_also = reference(symbol)?.unwrap_or_default();
                if !see_also.is_empty() {
                    text.push_str(&format!(" \\nomencref{{{see_also}}}"));
                }

                let sort_options = match symbol.other.get(SORT) {
                    Some(key) => format!("[{group},{key}]"),
                    None => format!("[{group}]"),
                };

                if text.is_empty() {
                    note(&mut out, format!("No text for {}", symbol.command), true);
                    text = format!("\\nomencMissExplanation{{{name}}}");
                }

                out.push_str(&format!(
                    "\\nomenclature{sort_options}{{\\nomencLabel{{{name}}}{{{label}}}}}{{\\nomencText{{{name}}}{{{text}}}{{{see_also}}}}}\n"
                ));
            }
        }

        Ok(out)
    }
}
