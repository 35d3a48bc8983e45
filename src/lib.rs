//! latex-symbol-manager: keep LaTeX notation in annotated `\newcommand`
//! files and derive everything else from them.
//!
//! A definitions file groups macros into sections with tagged comments:
//!
//! ```text
//! %:section:greek : Greek letters
//! %:sort:g
//! \newcommand{\eps}{\varepsilon} % small positive number
//! %:nomenc:\eps:tolerance
//! ```
//!
//! [`SymbolTable`] collects sections and symbols across files; the
//! [`render`] module turns a table into definitions, listings and
//! nomenclature, [`usage`] scans documents for commands, and [`deps`]
//! writes Makefile dependency rules.

pub mod deps;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod render;
pub mod scan;
pub mod symbol;
pub mod table;
pub mod usage;

pub use error::ParseError;
pub use model::{AttributeMap, Event, Location, Section, Token, Warning};
pub use symbol::{NomenclatureEntry, Symbol};
pub use table::{ParseOptions, SymbolTable};
