//! Symbol listing as a LaTeX `longtable`.

use super::latex::{self, LongTable};
use super::{Order, RenderError, Renderer};
use crate::model::NOSUMMARY;
use crate::symbol::Symbol;
use crate::table::SymbolTable;
use anyhow::{anyhow, Result};

const STYLES: &[&str] = &["full", "minimal"];

/// Create a table renderer for the given style name.
pub fn create(style: &str, order: Order) -> Result<Box<dyn Renderer>> {
    match style {
        "full" => Ok(Box::new(FullTable {
            order,
            example_width: "8cm".to_string(),
        })),
        "minimal" => Ok(Box::new(MinimalTable { order })),
        _ => Err(anyhow!(
            "No known style {:?}. Valid options: {}.",
            style,
            STYLES.join(", ")
        )),
    }
}

/// Three columns: source, rendering, description; plus boxed examples.
pub struct FullTable {
    pub order: Order,
    pub example_width: String,
}

impl Renderer for FullTable {
    fn render(&self, table: &SymbolTable) -> Result<String, RenderError> {
        let mut out = LongTable::new(&["l", "l", "l"]);

        for section in self.order.sections(table) {
            out.row(&["", "", ""]);
            out.row_multicolumn(
                &[&latex::raw_appearance(&section.name)],
                2,
                "l",
                &latex::emph(&section.description),
            );
            out.hline();
            if section.is_top_level() {
                out.hline();
            }

            for symbol in self.order.symbols(table, section) {
                self.symbol_rows(&mut out, symbol);
            }
        }

        Ok(out.finish())
    }
}

impl FullTable {
    fn symbol_rows(&self, out: &mut LongTable, symbol: &Symbol) {
        if symbol.nargs == 0 {
            let rendered = if symbol.has_attr(NOSUMMARY) {
                "(nosummary)".to_string()
            } else {
                latex::math(&symbol.command)
            };
            out.row(&[
                latex::raw_appearance(&symbol.command),
                rendered,
                symbol.desc.clone(),
            ]);
        } else {
            let call = format!("{}{{{}}}", symbol.command, vec!["..."; symbol.nargs].join(","));
            out.row(&[latex::raw_appearance(&call), String::new(), symbol.desc.clone()]);
        }

        if let Some(example) = &symbol.example {
            let boxed = format!(
                "\\fbox{{{}}}",
                latex::color_rgb(
                    &format!(
                        "\\begin{{minipage}}{{{}}}{}\\par {}\\end{{minipage}}",
                        self.example_width,
                        example,
                        latex::small(&latex::texttt(&latex::escape(example)))
                    ),
                    [0.5, 0.5, 0.5]
                )
            );
            out.row(&["", "", boxed.as_str()]);
        }
    }
}

/// Two columns, 0-arg symbols only.
pub struct MinimalTable {
    pub order: Order,
}

impl Renderer for MinimalTable {
    fn render(&self, table: &SymbolTable) -> Result<String, RenderError> {
        let mut out = LongTable::new(&["c", "l"]);

        for section in self.order.sections(table) {
            out.row_multicolumn(&[], 2, "l", &section.description);
            out.hline();
            if section.is_top_level() {
                out.hline();
            }
            for symbol in self.order.symbols(table, section) {
                if symbol.nargs == 0 {
                    out.row(&[latex::math(&symbol.command), symbol.desc.clone()]);
                }
            }
        }

        Ok(out.finish())
    }
}
