//! Section hierarchy built from `/`-separated names.

use crate::model::Section;
use indexmap::IndexMap;

/// Fill every section's `subs` with its direct children, in declaration
/// order. A section whose parent was never declared stays unlinked.
pub fn link(sections: &mut IndexMap<String, Section>) {
    let mut children: IndexMap<String, Vec<String>> = IndexMap::new();
    for section in sections.values() {
        if let Some(parent) = &section.parent {
            if sections.contains_key(parent) {
                children
                    .entry(parent.clone())
                    .or_default()
                    .push(section.name.clone());
            }
        }
    }

    for section in sections.values_mut() {
        section.subs = children.shift_remove(&section.name).unwrap_or_default();
    }
}

/// Sections in declaration order, except that each section is immediately
/// followed by every later-declared section below it (`name/...`).
pub fn parent_first(sections: &IndexMap<String, Section>) -> Vec<&Section> {
    let mut remaining: Vec<&Section> = sections.values().collect();
    let mut ordered = Vec::with_capacity(remaining.len());

    while !remaining.is_empty() {
        let first = remaining.remove(0);
        let prefix = format!("{}/", first.name);
        ordered.push(first);
        let (below, rest): (Vec<_>, Vec<_>) = remaining
            .into_iter()
            .partition(|s| s.name.starts_with(&prefix));
        ordered.extend(below);
        remaining = rest;
    }

    ordered
}

#[cfg(test)]
mod tests {
    use crate::table::SymbolTable;

    fn table(input: &str) -> SymbolTable {
        let mut table = SymbolTable::new();
        table.parse_str(input, "t.tex").unwrap();
        table.link_hierarchy();
        table
    }

    #[test]
    fn children_are_linked_to_existing_parents() {
        let t = table("%:section:a : A\n%:section:a/b : B\n%:section:a/c : C\n%:section:x/y : Y\n");
        assert_eq!(t.section("a").unwrap().subs, vec!["a/b", "a/c"]);
        assert_eq!(t.section("a/b").unwrap().parent.as_deref(), Some("a"));
        assert!(t.section("a").unwrap().is_top_level());
        // The parent of x/y was never declared.
        assert_eq!(t.section("x/y").unwrap().parent.as_deref(), Some("x"));
        assert!(t.section("x").is_none());
    }

    #[test]
    fn parent_is_the_prefix_up_to_last_slash() {
        let t = table("%:section:a : A\n%:section:a/b : B\n%:section:a/b/c : C\n");
        assert_eq!(t.section("a/b/c").unwrap().parent.as_deref(), Some("a/b"));
        assert_eq!(t.section("a").unwrap().subs, vec!["a/b"]);
        assert_eq!(t.section("a/b").unwrap().subs, vec!["a/b/c"]);
    }

    #[test]
    fn linking_twice_is_stable() {
        let mut t = table("%:section:a : A\n%:section:a/b : B\n");
        t.link_hierarchy();
        assert_eq!(t.section("a").unwrap().subs, vec!["a/b"]);
    }

    #[test]
    fn parent_first_ordering() {
        let t = table(
            "%:section:a : A\n%:section:b : B\n%:section:a/x : AX\n%:section:b/y : BY\n%:section:ab : AB\n",
        );
        let names: Vec<_> = t
            .sections_parent_first()
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "a/x", "b", "b/y", "ab"]);
    }
}
