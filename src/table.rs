//! The section and symbol maps shared by every file of one run.

use crate::error::ParseError;
use crate::model::{AttributeMap, Event, Location, Section, Warning, DEF, KNOWN_TAGS};
use crate::parser::attrs::record;
use crate::parser::builder::Builder;
use crate::parser::hierarchy;
use crate::parser::lexer::{tokenize, Tokens};
use crate::symbol::Symbol;
use indexmap::IndexMap;

/// Parser settings.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Attribute tags accepted without a warning.
    pub known_tags: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            known_tags: KNOWN_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl ParseOptions {
    /// Default vocabulary plus `extra`.
    pub fn with_extra_tags<S: AsRef<str>>(extra: &[S]) -> Self {
        let mut options = Self::default();
        for tag in extra {
            let tag = tag.as_ref().trim();
            if !tag.is_empty() && !options.known_tags.iter().any(|k| k == tag) {
                options.known_tags.push(tag.to_string());
            }
        }
        options
    }
}

fn parent_name(name: &str) -> Option<String> {
    name.rsplit_once('/')
        .map(|(parent, _)| parent.trim().to_string())
}

/// All sections and symbols seen so far.
///
/// Pass the same table to each file of a run so that duplicates are caught
/// across files and reserved sections can be declared by any file.
#[derive(Debug, Default)]
pub struct SymbolTable {
    pub(crate) sections: IndexMap<String, Section>,
    pub(crate) symbols: IndexMap<String, Symbol>,
    pub(crate) options: ParseOptions,
    pub(crate) warnings: Vec<Warning>,
    next_order: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Lazily parse one input into this table.
    pub fn parse<'t, 'a>(&'t mut self, input: &'a str, filename: &str) -> Builder<'t, Tokens<'a>> {
        Builder::new(self, tokenize(input, filename))
    }

    /// Parse one input completely, returning its events in order.
    pub fn parse_str(&mut self, input: &str, filename: &str) -> Result<Vec<Event>, ParseError> {
        self.parse(input, filename).collect()
    }

    /// Rebuild every section's `subs` from the `/` structure of the names.
    pub fn link_hierarchy(&mut self) {
        hierarchy::link(&mut self.sections);
    }

    /// Sections in declaration order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    /// Sections with each one followed by its `/`-descendants.
    pub fn sections_parent_first(&self) -> Vec<&Section> {
        hierarchy::parent_first(&self.sections)
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Symbols in definition order.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn symbol(&self, command: &str) -> Option<&Symbol> {
        self.symbols.get(command)
    }

    /// The symbols registered under `section`, in encounter order.
    pub fn section_symbols<'t>(&'t self, section: &'t Section) -> impl Iterator<Item = &'t Symbol> {
        section.symbols.iter().filter_map(|c| self.symbols.get(c))
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() || self.symbols.is_empty()
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub(crate) fn next_order(&mut self) -> usize {
        let order = self.next_order;
        self.next_order += 1;
        order
    }

    /// Reserve `name` so a later declaration can complete it. Does nothing
    /// when the section is already known.
    pub fn reserve_section(&mut self, name: &str) {
        if self.sections.contains_key(name) {
            return;
        }
        let definition_order = self.next_order();
        self.sections.insert(
            name.to_string(),
            Section {
                name: name.to_string(),
                description: String::new(),
                placeholder: true,
                symbols: Vec::new(),
                parent: parent_name(name),
                subs: Vec::new(),
                location: Location::new("<reserved>", 0, ""),
                definition_order,
                attrs: AttributeMap::new(),
            },
        );
    }

    /// Register a section, or complete the placeholder of the same name.
    pub(crate) fn create_section(
        &mut self,
        name: &str,
        description: &str,
        attrs: AttributeMap,
        location: Location,
    ) -> Result<(), ParseError> {
        if let Some(existing) = self.sections.get_mut(name) {
            if !existing.placeholder {
                return Err(ParseError::DuplicateSection {
                    name: name.to_string(),
                    location,
                    original: existing.location.clone(),
                });
            }
            existing.description = description.to_string();
            existing.placeholder = false;
            existing.location = location;
            existing.attrs.extend(attrs);
            return Ok(());
        }

        let definition_order = self.next_order();
        self.sections.insert(
            name.to_string(),
            Section {
                name: name.to_string(),
                description: description.to_string(),
                placeholder: false,
                symbols: Vec::new(),
                parent: parent_name(name),
                subs: Vec::new(),
                location,
                definition_order,
                attrs,
            },
        );
        Ok(())
    }

    /// Section attributes overlaid with the symbol's own. The symbol wins on
    /// conflict, except for `def`.
    pub(crate) fn merge_attrs(
        &mut self,
        section: &str,
        command: &str,
        own: AttributeMap,
        location: &Location,
    ) -> AttributeMap {
        let Some(inherited) = self.sections.get(section).map(|s| &s.attrs) else {
            return own;
        };
        let mut merged = inherited.clone();
        for (tag, value) in own {
            if let Some(section_value) = inherited.get(&tag) {
                if *section_value != value {
                    record(
                        &mut self.warnings,
                        Warning::Disagreement {
                            command: command.to_string(),
                            tag: tag.clone(),
                            section_value: section_value.clone(),
                            symbol_value: value.clone(),
                            location: location.clone(),
                        },
                    );
                    if tag == DEF {
                        continue;
                    }
                }
            }
            merged.insert(tag, value);
        }
        merged
    }

    /// Add a finished symbol to the global map and to its section.
    pub(crate) fn register(&mut self, symbol: Symbol) {
        if let Some(section) = self.sections.get_mut(&symbol.tag) {
            section.symbols.push(symbol.command.clone());
        }
        self.symbols.insert(symbol.command.clone(), symbol);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_tags_extend_vocabulary() {
        let options = ParseOptions::with_extra_tags(&["color", " ", "sort"]);
        assert!(options.known_tags.iter().any(|t| t == "color"));
        assert_eq!(options.known_tags.iter().filter(|t| *t == "sort").count(), 1);
        assert!(!options.known_tags.iter().any(|t| t.is_empty()));
    }

    #[test]
    fn orders_are_shared_and_increasing() {
        let mut table = SymbolTable::new();
        table
            .parse_str(
                "%:section:a : A\n\\newcommand{\\x}{x}\n%:section:b : B\n\\newcommand{\\y}{y}\n",
                "t.tex",
            )
            .unwrap();
        let orders: Vec<usize> = vec![
            table.section("a").unwrap().definition_order,
            table.symbol(r"\x").unwrap().definition_order,
            table.section("b").unwrap().definition_order,
            table.symbol(r"\y").unwrap().definition_order,
        ];
        assert_eq!(orders, vec![0, 1, 2, 3]);
    }

    #[test]
    fn section_symbols_follow_encounter_order() {
        let mut table = SymbolTable::new();
        table
            .parse_str(
                "%:section:s : S\n\\newcommand{\\b}{b}\n\\newcommand{\\a}{a}\n",
                "t.tex",
            )
            .unwrap();
        let section = table.section("s").unwrap();
        let names: Vec<_> = table
            .section_symbols(section)
            .map(|s| s.command.as_str())
            .collect();
        assert_eq!(names, vec![r"\b", r"\a"]);
        assert_eq!(table.section_count(), 1);
        assert_eq!(table.symbol_count(), 2);
        assert!(!table.is_empty());
    }
}
