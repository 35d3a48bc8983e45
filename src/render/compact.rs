//! Re-emit parsed sources as one self-contained file of definitions.

use crate::model::Event;
use crate::symbol::Symbol;
use crate::table::SymbolTable;

#[derive(Debug, Clone, Default)]
pub struct CompactOptions {
    /// Only symbols carrying this attribute; the rest leave a comment.
    pub select: Option<String>,
    /// Colour for the bodies of 0-arg symbols.
    pub color: Option<String>,
    /// Wrap 0-arg bodies in `\markfirst` with a per-symbol boolean.
    pub markfirst: bool,
}

/// Passthrough lines verbatim, each symbol as its regenerated definition.
pub fn compact(events: &[Event], table: &SymbolTable, options: &CompactOptions) -> String {
    let mut out = String::new();
    if options.markfirst {
        out.push_str("%\\newcommand{\\markfirst}[3]{#3}\n");
    }

    for event in events {
        match event {
            Event::Passthrough { line, .. } => {
                out.push_str(line);
                out.push('\n');
            }
            Event::Symbol(command) => {
                if let Some(symbol) = table.symbol(command) {
                    write_symbol(&mut out, symbol, options);
                }
            }
            Event::Section(_) => {}
        }
    }

    out
}

fn write_symbol(out: &mut String, symbol: &Symbol, options: &CompactOptions) {
    if let Some(tag) = &options.select {
        if !symbol.has_attr(tag) {
            out.push_str(&format!(
                "% {}: Skipped because no field {tag:?}\n",
                symbol.command
            ));
            return;
        }
    }

    let mut filters: Vec<Box<dyn Fn(String) -> String>> = Vec::new();

    if symbol.nargs == 0 {
        if let Some(color) = options.color.clone() {
            filters.push(Box::new(move |body| format!("{{\\color{{{color}}} {body}}}")));
        }
        if options.markfirst {
            let name = symbol.bare_name().to_string();
            let flag = format!("used{name}");
            out.push_str(&format!("\\newbool{{{flag}}}\\setbool{{{flag}}}{{false}}\n"));
            filters.push(Box::new(move |body| format!("\\markfirst{{{name}}}{{{flag}}}{{{body}}}")));
        }
    }

    let definition = symbol.regenerate_definition(|body| {
        filters
            .iter()
            .fold(body.to_string(), |acc, filter| filter(acc))
    });
    out.push_str(&definition);
    out.push('\n');
}
