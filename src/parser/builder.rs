//! Section/symbol builder: folds the token stream of one file into a
//! [`SymbolTable`].
//!
//! The builder is either before the first section of the file or inside a
//! section. A `section` tag moves it into that section; a definition
//! creates a symbol in the current section, taking the tagged blocks right
//! after it as attributes. Every other tagged block is dropped with a
//! warning. Errors are fatal: after the first one the builder yields nothing.

use super::attrs::{assemble, record};
use super::lookahead::Lookahead;
use crate::error::ParseError;
use crate::model::{Event, Location, Token, Warning, EXAMPLE, NOMENC, SECTION};
use crate::symbol::{NomenclatureEntry, Symbol};
use crate::table::SymbolTable;

/// Tags that end an attribute block.
const STOP_TAGS: &[&str] = &[SECTION];

enum State {
    NoSection,
    InSection(String),
}

/// Iterator of [`Event`]s for one input, writing into a shared table.
pub struct Builder<'t, I>
where
    I: Iterator<Item = Result<Token, ParseError>>,
{
    table: &'t mut SymbolTable,
    tokens: Lookahead<I>,
    state: State,
    failed: bool,
}

impl<'t, I> Builder<'t, I>
where
    I: Iterator<Item = Result<Token, ParseError>>,
{
    pub fn new(table: &'t mut SymbolTable, tokens: I) -> Self {
        Self {
            table,
            tokens: Lookahead::new(tokens),
            state: State::NoSection,
            failed: false,
        }
    }

    fn step(&mut self, token: Token) -> Result<Option<Event>, ParseError> {
        match token {
            Token::TaggedBlock {
                tag,
                lines,
                location,
            } => {
                if tag == SECTION {
                    self.section(&lines, location).map(Some)
                } else {
                    record(
                        &mut self.table.warnings,
                        Warning::FloatingTag { tag, location },
                    );
                    Ok(None)
                }
            }
            Token::Definition {
                command,
                nargs,
                body,
                comment,
                location,
            } => self
                .definition(command, nargs, body, comment, location)
                .map(Some),
            Token::Passthrough { line, location } => {
                Ok(Some(Event::Passthrough { line, location }))
            }
        }
    }

    /// `%:section: name : description`
    fn section(&mut self, lines: &[String], location: Location) -> Result<Event, ParseError> {
        let content = lines.join(" ");
        let parsed = content
            .split_once(':')
            .filter(|(name, description)| !description.contains(':') && !name.trim().is_empty());
        let Some((name, description)) = parsed else {
            return Err(ParseError::MalformedSection { content, location });
        };
        let name = name.trim().to_string();

        let attrs = assemble(
            &mut self.tokens,
            STOP_TAGS,
            &self.table.options.known_tags,
            &mut self.table.warnings,
        );
        self.table
            .create_section(&name, description.trim(), attrs, location)?;

        self.state = State::InSection(name.clone());
        Ok(Event::Section(name))
    }

    fn definition(
        &mut self,
        command: String,
        nargs: usize,
        body: String,
        desc: String,
        location: Location,
    ) -> Result<Event, ParseError> {
        let State::InSection(section) = &self.state else {
            return Err(ParseError::NoSection { location });
        };
        let section = section.clone();

        let own = assemble(
            &mut self.tokens,
            STOP_TAGS,
            &self.table.options.known_tags,
            &mut self.table.warnings,
        );

        let nomenclature = match own.get(NOMENC) {
            Some(value) => NomenclatureEntry::parse(value).map_err(|()| {
                ParseError::MalformedNomenclature {
                    value: value.clone(),
                    location: location.clone(),
                }
            })?,
            None => None,
        };

        if let Some(existing) = self.table.symbols.get(&command) {
            return Err(ParseError::DuplicateSymbol {
                command,
                location,
                original: existing.location.clone(),
            });
        }

        let example = own.get(EXAMPLE).cloned();
        let other = self.table.merge_attrs(&section, &command, own, &location);
        let definition_order = self.table.next_order();

        self.table.register(Symbol {
            command: command.clone(),
            synonyms: Vec::new(),
            nargs,
            body,
            desc,
            tag: section,
            example,
            location,
            nomenclature,
            other,
            definition_order,
        });
        Ok(Event::Symbol(command))
    }
}

impl<I> Iterator for Builder<'_, I>
where
    I: Iterator<Item = Result<Token, ParseError>>,
{
    type Item = Result<Event, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let result = match self.tokens.next()? {
                Ok(token) => self.step(token),
                Err(err) => Err(err),
            };
            match result {
                Ok(Some(event)) => return Some(Ok(event)),
                Ok(None) => continue,
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ParseError;
    use crate::model::{Event, Warning};
    use crate::table::SymbolTable;

    fn parse(input: &str) -> (SymbolTable, Result<Vec<Event>, ParseError>) {
        let mut table = SymbolTable::new();
        let result = table.parse_str(input, "test.tex");
        (table, result)
    }

    #[test]
    fn greek_example() {
        let (table, result) =
            parse("%:section:greek : Greek letters\n\\newcommand{\\alpha}{\\alpha}% the first letter\n");
        let events = result.unwrap();
        assert_eq!(
            events,
            vec![
                Event::Section("greek".to_string()),
                Event::Symbol(r"\alpha".to_string())
            ]
        );
        let section = table.section("greek").unwrap();
        assert_eq!(section.description, "Greek letters");
        let alpha = table.symbol(r"\alpha").unwrap();
        assert_eq!(alpha.nargs, 0);
        assert_eq!(alpha.desc, "the first letter");
        assert_eq!(alpha.tag, "greek");
        assert_eq!(alpha.body, r"\alpha");
    }

    #[test]
    fn example_attribute() {
        let (table, result) =
            parse("%:section:s : S\n\\newcommand{\\foo}[2]{#1-#2}\n%:example:\\foo{a}{b}\n");
        result.unwrap();
        let foo = table.symbol(r"\foo").unwrap();
        assert_eq!(foo.nargs, 2);
        assert_eq!(foo.example.as_deref(), Some(r"\foo{a}{b}"));
    }

    #[test]
    fn definition_before_section() {
        let (_, result) = parse("text\n\\newcommand{\\x}{x}\n");
        match result {
            Err(ParseError::NoSection { location }) => {
                assert_eq!(location.line, 2);
                assert_eq!(location.text, r"\newcommand{\x}{x}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn nomenclature_attribute() {
        let (table, result) = parse("%:section:s : S\n\\newcommand{\\x}{x}\n%:nomenc:lbl:some text\n");
        result.unwrap();
        let entry = table.symbol(r"\x").unwrap().nomenclature.clone().unwrap();
        assert_eq!(entry.label, "lbl");
        assert_eq!(entry.text, "some text");
    }

    #[test]
    fn malformed_nomenclature() {
        let (_, result) = parse("%:section:s : S\n\\newcommand{\\x}{x}\n%:nomenc:lbl:some:text\n");
        match result {
            Err(ParseError::MalformedNomenclature { value, location }) => {
                assert_eq!(value, "lbl:some:text");
                assert_eq!(location.line, 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_nomenclature_means_none() {
        let (table, result) = parse("%:section:s : S\n\\newcommand{\\x}{x}\n%:nomenc:\n");
        result.unwrap();
        assert!(table.symbol(r"\x").unwrap().nomenclature.is_none());
    }

    #[test]
    fn duplicate_symbol_names_first_location() {
        let (_, result) =
            parse("%:section:s : S\n\\newcommand{\\x}{x}\n\\newcommand{\\x}{y}\n");
        match result {
            Err(ParseError::DuplicateSymbol {
                command,
                location,
                original,
            }) => {
                assert_eq!(command, r"\x");
                assert_eq!(original.line, 2);
                assert_eq!(location.line, 3);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn duplicate_section() {
        let (_, result) = parse("%:section:s : S\n%:section:s : again\n");
        match result {
            Err(ParseError::DuplicateSection { name, original, .. }) => {
                assert_eq!(name, "s");
                assert_eq!(original.line, 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_description_is_still_a_declaration() {
        let (table, result) = parse("%:section:s :\n%:section:s : A\n");
        match result {
            Err(ParseError::DuplicateSection { name, original, location }) => {
                assert_eq!(name, "s");
                assert_eq!(original.line, 1);
                assert_eq!(location.line, 2);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(table.section("s").unwrap().description, "");
    }

    #[test]
    fn reserved_section_is_completed_once() {
        let mut table = SymbolTable::new();
        table.reserve_section("s");
        table
            .parse_str(
                "%:section:s : Now described\n%:notfinal:\n\\newcommand{\\x}{x}\n",
                "a.tex",
            )
            .unwrap();
        let section = table.section("s").unwrap();
        assert!(!section.placeholder);
        assert_eq!(section.description, "Now described");
        assert_eq!(section.location.line, 1);
        assert!(section.attrs.contains_key("notfinal"));
        assert_eq!(section.symbols, vec![r"\x"]);
        assert_eq!(table.section_count(), 1);

        let again = table.parse_str("%:section:s : Again\n", "b.tex");
        match again {
            Err(ParseError::DuplicateSection { original, .. }) => {
                assert_eq!(original.filename, "a.tex");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn malformed_section_tags() {
        for input in ["%:section:no colon here\n", "%:section:a : b : c\n", "%:section: : x\n"] {
            let (_, result) = parse(input);
            assert!(
                matches!(result, Err(ParseError::MalformedSection { .. })),
                "{input:?} gave {result:?}"
            );
        }
    }

    #[test]
    fn section_declared_over_two_lines() {
        let (table, result) = parse("%:section:\n% vec : Vectors\n");
        result.unwrap();
        assert_eq!(table.section("vec").unwrap().description, "Vectors");
    }

    #[test]
    fn section_attributes_are_inherited() {
        let (table, result) = parse(
            "%:section:s : S\n%:sort:X\n\\newcommand{\\a}{a}\n\\newcommand{\\b}{b}\n%:sort:Y\n",
        );
        result.unwrap();
        assert_eq!(table.symbol(r"\a").unwrap().other["sort"], "X");
        assert_eq!(table.symbol(r"\b").unwrap().other["sort"], "Y");
        assert!(table.warnings().iter().any(|w| matches!(
            w,
            Warning::Disagreement { tag, command, .. } if tag == "sort" && command == r"\b"
        )));
    }

    #[test]
    fn section_def_prevails() {
        let (table, result) = parse(
            "%:section:s : S\n%:def:sec:s\n\\newcommand{\\a}{a}\n%:def:eq:a\n%:todo:check\n",
        );
        result.unwrap();
        let a = table.symbol(r"\a").unwrap();
        assert_eq!(a.other["def"], "sec:s");
        assert_eq!(a.other["todo"], "check");
        assert_eq!(table.warnings().len(), 1);
    }

    #[test]
    fn floating_tag_is_dropped() {
        let (table, result) = parse("%:section:s : S\n\\newcommand{\\a}{a}\n\n%:todo:orphan\nmore\n");
        let events = result.unwrap();
        assert_eq!(events.len(), 4);
        assert!(matches!(&table.warnings()[0], Warning::FloatingTag { tag, .. } if tag == "todo"));
        assert!(!table.symbol(r"\a").unwrap().has_attr("todo"));
    }

    #[test]
    fn passthrough_lines_are_emitted() {
        let (_, result) = parse("\\documentclass{book}\n%:section:s : S\n");
        let events = result.unwrap();
        assert!(matches!(&events[0], Event::Passthrough { line, .. } if line == "\\documentclass{book}"));
    }

    #[test]
    fn builder_stops_after_error() {
        let mut table = SymbolTable::new();
        let mut builder = table.parse("\\newcommand{\\x}{x}\n%:section:s : S\n", "t.tex");
        assert!(matches!(builder.next(), Some(Err(ParseError::NoSection { .. }))));
        assert!(builder.next().is_none());
    }

    #[test]
    fn sections_span_files() {
        let mut table = SymbolTable::new();
        table
            .parse_str("%:section:s : S\n\\newcommand{\\x}{x}\n", "a.tex")
            .unwrap();
        let err = table
            .parse_str("%:section:t : T\n\\newcommand{\\x}{y}\n", "b.tex")
            .unwrap_err();
        assert_eq!(err.original().map(|l| l.filename.as_str()), Some("a.tex"));
        assert_eq!(err.location().filename, "b.tex");
    }

    #[test]
    fn each_file_starts_without_section() {
        let mut table = SymbolTable::new();
        table.parse_str("%:section:s : S\n", "a.tex").unwrap();
        let err = table
            .parse_str("\\newcommand{\\x}{x}\n", "b.tex")
            .unwrap_err();
        assert!(matches!(err, ParseError::NoSection { .. }));
    }
}
