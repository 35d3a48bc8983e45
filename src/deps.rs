//! Make-style dependency lines for TeX and LyX documents.

use indexmap::IndexSet;
use log::{debug, warn};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

static RE_TEX_INCLUDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\(?:input|include)\{([^{}]*)\}").unwrap());

static RE_LYX_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"filename "(.*?)""#).unwrap());

#[derive(Debug, Error)]
pub enum DepsError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{path} includes itself; include stack: {}", stack.join(" -> "))]
    Cycle { path: String, stack: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// `\input{...}` / `\include{...}`, resolved against the working directory.
    Tex,
    /// `filename "..."`, resolved against the including file's directory.
    Lyx,
}

impl DocumentKind {
    /// Glob used when no roots are given.
    pub fn default_pattern(self) -> &'static str {
        match self {
            DocumentKind::Tex => "*.tex",
            DocumentKind::Lyx => "*.lyx",
        }
    }
}

/// Recursive dependency resolver. Results are memoized per canonical path,
/// so one resolver should serve all roots of a run.
pub struct Resolver {
    kind: DocumentKind,
    cache: HashMap<PathBuf, Vec<String>>,
    stack: Vec<PathBuf>,
}

impl Resolver {
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            cache: HashMap::new(),
            stack: Vec::new(),
        }
    }

    /// Files named directly by `path`, distinct, in order of appearance.
    pub fn direct(&self, path: &Path) -> Result<Vec<String>, DepsError> {
        // Dependencies may be images or other binary files.
        let bytes = fs::read(path).map_err(|source| DepsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let content = String::from_utf8_lossy(&bytes);

        let mut deps = IndexSet::new();
        for line in content.lines() {
            match self.kind {
                DocumentKind::Tex => {
                    let line = crate::scan::strip_comment(line);
                    for caps in RE_TEX_INCLUDE.captures_iter(line) {
                        deps.insert(tex_file_name(caps[1].trim()));
                    }
                }
                DocumentKind::Lyx => {
                    let dir = path.parent().unwrap_or(Path::new(""));
                    for caps in RE_LYX_FILENAME.captures_iter(line) {
                        deps.insert(dir.join(&caps[1]).display().to_string());
                    }
                }
            }
        }
        Ok(deps.into_iter().collect())
    }

    /// Direct dependencies of `path` followed by theirs, recursively.
    /// A dependency that does not exist is listed but not followed.
    pub fn recursive(&mut self, path: &Path) -> Result<Vec<String>, DepsError> {
        let key = fs::canonicalize(path).map_err(|source| DepsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if let Some(deps) = self.cache.get(&key) {
            return Ok(deps.clone());
        }
        if self.stack.contains(&key) {
            return Err(DepsError::Cycle {
                path: key.display().to_string(),
                stack: self.stack.iter().map(|p| p.display().to_string()).collect(),
            });
        }

        self.stack.push(key.clone());
        let result = self.collect(path);
        self.stack.pop();

        let deps = result?;
        debug!("{}: {}", path.display(), deps.join(" "));
        self.cache.insert(key, deps.clone());
        Ok(deps)
    }

    fn collect(&mut self, path: &Path) -> Result<Vec<String>, DepsError> {
        let direct = self.direct(path)?;
        let mut all: IndexSet<String> = direct.iter().cloned().collect();
        for dep in &direct {
            let dep_path = Path::new(dep);
            if dep_path.exists() {
                all.extend(self.recursive(dep_path)?);
            } else {
                warn!("Path not existing ({dep})");
            }
        }
        Ok(all.into_iter().collect())
    }

    /// Makefile rules for one root document.
    pub fn rules(&mut self, root: &Path) -> Result<Vec<String>, DepsError> {
        let deps = self.recursive(root)?.join(" ");
        let base = root.with_extension("").display().to_string();
        Ok(match self.kind {
            DocumentKind::Tex => vec![format!("{base}.pdf: {base}.tex {deps}")],
            DocumentKind::Lyx => vec![
                format!("{base}.tex: {base}.lyx {deps}"),
                format!("{base}.lyx.d: {base}.lyx {deps}"),
            ],
        })
    }
}

/// `\input{chap}` names `chap.tex`.
fn tex_file_name(name: &str) -> String {
    if Path::new(name).extension().is_some() {
        name.to_string()
    } else {
        format!("{name}.tex")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn tex_extension_is_appended() {
        assert_eq!(tex_file_name("chap"), "chap.tex");
        assert_eq!(tex_file_name("fig.pdf_tex"), "fig.pdf_tex");
    }

    #[test]
    fn tex_direct_skips_comments() {
        let dir = TempDir::new().unwrap();
        let main = write(
            &dir,
            "main.tex",
            "\\input{a}\n% \\input{hidden}\n\\include{b.tex} \\input{a}\n",
        );
        let deps = Resolver::new(DocumentKind::Tex).direct(&main).unwrap();
        assert_eq!(deps, vec!["a.tex", "b.tex"]);
    }

    #[test]
    fn lyx_recursive_is_relative_to_includer() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let root = write(&dir, "book.lyx", "filename \"sub/ch1.lyx\"\n");
        write(&dir, "sub/ch1.lyx", "filename \"fig.pdf\"\nfilename \"missing.lyx\"\n");
        write(&dir, "sub/fig.pdf", "");

        let mut resolver = Resolver::new(DocumentKind::Lyx);
        let rules = resolver.rules(&root).unwrap();
        let base = dir.path().join("book").display().to_string();
        let ch1 = dir.path().join("sub/ch1.lyx").display().to_string();
        let fig = dir.path().join("sub/fig.pdf").display().to_string();
        let missing = dir.path().join("sub/missing.lyx").display().to_string();
        assert_eq!(
            rules,
            vec![
                format!("{base}.tex: {base}.lyx {ch1} {fig} {missing}"),
                format!("{base}.lyx.d: {base}.lyx {ch1} {fig} {missing}"),
            ]
        );
    }

    #[test]
    fn cycle_is_an_error() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.lyx", "filename \"b.lyx\"\n");
        write(&dir, "b.lyx", "filename \"a.lyx\"\n");
        let err = Resolver::new(DocumentKind::Lyx).rules(&a).unwrap_err();
        assert!(matches!(err, DepsError::Cycle { .. }), "{err}");
    }

    #[test]
    fn missing_root_is_an_error() {
        let err = Resolver::new(DocumentKind::Tex)
            .recursive(Path::new("/nonexistent/main.tex"))
            .unwrap_err();
        assert!(matches!(err, DepsError::Io { .. }));
    }
}
