//! Small LaTeX writing helpers and a `longtable` builder.

/// Escape text so LaTeX typesets it literally.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str(r"\textbackslash{}"),
            '{' | '}' | '_' | '#' | '$' | '%' | '&' => {
                out.push('\\');
                out.push(c);
            }
            '^' => out.push_str(r"\^{}"),
            '~' => out.push_str(r"\~{}"),
            _ => out.push(c),
        }
    }
    out
}

pub fn texttt(text: &str) -> String {
    format!("\\texttt{{{text}}}")
}

pub fn emph(text: &str) -> String {
    format!("\\emph{{{text}}}")
}

pub fn small(text: &str) -> String {
    format!("{{\\small {text}}}")
}

pub fn color_rgb(text: &str, [r, g, b]: [f32; 3]) -> String {
    format!("{{\\color[rgb]{{{r},{g},{b}}}{text}}}")
}

/// Source text shown as typed: grey typewriter.
pub fn raw_appearance(text: &str) -> String {
    color_rgb(&texttt(&escape(text)), [0.5, 0.5, 0.5])
}

/// Inline math.
pub fn math(text: &str) -> String {
    format!("${text}$")
}

/// Accumulates the rows of a `longtable` environment.
pub struct LongTable {
    out: String,
    columns: usize,
}

impl LongTable {
    pub fn new(spec: &[&str]) -> Self {
        Self {
            out: format!("\\begin{{longtable}}{{{}}}\n", spec.join("")),
            columns: spec.len(),
        }
    }

    /// One row; missing trailing cells are left empty.
    pub fn row<S: AsRef<str>>(&mut self, cells: &[S]) {
        let mut cells: Vec<&str> = cells.iter().map(|c| c.as_ref()).collect();
        cells.resize(self.columns.max(cells.len()), "");
        self.out.push_str(&cells.join(" & "));
        self.out.push_str(" \\\\\n");
    }

    /// Leading cells followed by one cell spanning `span` columns.
    pub fn row_multicolumn(&mut self, lead: &[&str], span: usize, align: &str, text: &str) {
        let mut cells: Vec<String> = lead.iter().map(|c| c.to_string()).collect();
        cells.push(format!("\\multicolumn{{{span}}}{{{align}}}{{{text}}}"));
        self.out.push_str(&cells.join(" & "));
        self.out.push_str(" \\\\\n");
    }

    pub fn hline(&mut self) {
        self.out.push_str("\\hline\n");
    }

    pub fn finish(mut self) -> String {
        self.out.push_str("\\end{longtable}\n");
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_specials() {
        assert_eq!(escape(r"\foo{a_b}"), r"\textbackslash{}foo\{a\_b\}");
        assert_eq!(escape("50% & $x^2$"), r"50\% \& \$x\^{}2\$");
    }

    #[test]
    fn raw_appearance_is_grey_typewriter() {
        assert_eq!(
            raw_appearance(r"\R"),
            r"{\color[rgb]{0.5,0.5,0.5}\texttt{\textbackslash{}R}}"
        );
    }

    #[test]
    fn table_rows() {
        let mut t = LongTable::new(&["l", "l", "l"]);
        t.row(&["a", "b"]);
        t.row_multicolumn(&["x"], 2, "l", "span");
        t.hline();
        assert_eq!(
            t.finish(),
            "\\begin{longtable}{lll}\na & b &  \\\\\nx & \\multicolumn{2}{l}{span} \\\\\n\\hline\n\\end{longtable}\n"
        );
    }
}
