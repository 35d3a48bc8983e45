//! lsm — LaTeX symbol manager.
//!
//! Every subcommand that consumes definitions accepts files, directories
//! (scanned for `.tex`, non-recursively) or glob patterns, and reads stdin
//! when none are given:
//!
//! - `lsm compact defs/*.tex > all-symbols.tex`
//! - `lsm table --style minimal defs/`
//! - `lsm collect chapters/*.tex > usage.yaml && lsm nomenc --only usage.yaml defs/`

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info, warn, LevelFilter};
use lsm::deps::{DocumentKind, Resolver};
use lsm::parser::{self, lexer, Input};
use lsm::render::compact::{self, CompactOptions};
use lsm::render::select::{self, Selection};
use lsm::render::{nomenc, table, Order};
use lsm::{extract, usage, Event, ParseOptions, SymbolTable};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Parser)]
#[command(
    name = "lsm",
    about = "Manage LaTeX symbol definitions: compact them, tabulate them, build a nomenclature"
)]
struct Cli {
    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Accept this attribute tag without a warning. Can be repeated.
    #[arg(long = "known-tag", global = true)]
    known_tags: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Dump the tokens or builder events of definition files
    Parse {
        files: Vec<String>,

        /// Show the classified lines instead of the builder events
        #[arg(long)]
        tokens: bool,
    },

    /// Re-emit the sources as one file of idempotent definitions
    Compact {
        files: Vec<String>,

        /// Only symbols that carry this attribute
        #[arg(long)]
        select: Option<String>,

        /// Colour the bodies of argument-less symbols
        #[arg(long)]
        color: Option<String>,

        /// Wrap argument-less symbols in \markfirst
        #[arg(long)]
        markfirst: bool,
    },

    /// LaTeX longtable listing all symbols
    Table {
        files: Vec<String>,

        /// Table style: full (default), minimal
        #[arg(long, default_value = "full")]
        style: String,

        #[arg(long)]
        sort_sections_alpha: bool,

        #[arg(long)]
        sort_symbols_alpha: bool,
    },

    /// Nomenclature of the symbols
    Nomenc {
        files: Vec<String>,

        /// Nomenclature style: table (default), entries
        #[arg(long, default_value = "table")]
        style: String,

        /// Usage map (from `lsm collect`) restricting and annotating the output
        #[arg(long)]
        only: Option<PathBuf>,
    },

    /// Print a YAML map of the commands used by documents
    Collect {
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Definitions of every symbol a document needs, recursively
    Extract {
        /// Document whose commands are looked up
        #[arg(short = 'm', long = "main")]
        main_doc: PathBuf,

        /// Output file (default: stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        files: Vec<String>,
    },

    /// Definitions of selected sections, optionally coloured
    Select {
        files: Vec<String>,

        /// Sections to include (comma separated name fragments, or "all")
        #[arg(long, default_value = select::ALL)]
        include: String,

        /// Colour these sections in red
        #[arg(long, default_value = "")]
        red: String,

        /// Colour these sections in green
        #[arg(long, default_value = "")]
        green: String,

        /// Colour these sections in blue
        #[arg(long, default_value = "")]
        blue: String,
    },

    /// Makefile dependency rules for TeX (or LyX) documents
    Deps {
        /// Root documents (default: every *.tex or *.lyx in the current directory)
        files: Vec<String>,

        /// Follow LyX `filename "..."` lines instead of \input / \include
        #[arg(long)]
        lyx: bool,

        /// Print the direct dependencies of all roots on one line
        #[arg(long)]
        direct: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    let options = ParseOptions::with_extra_tags(cli.known_tags.as_slice());

    match cli.command {
        Command::Parse { files, tokens } => parse_mode(&files, tokens, options),
        Command::Compact {
            files,
            select,
            color,
            markfirst,
        } => {
            let (table, events) = load_symbols(&files, options)?;
            let options = CompactOptions {
                select,
                color,
                markfirst,
            };
            print!("{}", compact::compact(&events, &table, &options));
            Ok(())
        }
        Command::Table {
            files,
            style,
            sort_sections_alpha,
            sort_symbols_alpha,
        } => {
            let renderer = table::create(
                &style,
                Order {
                    sections_alpha: sort_sections_alpha,
                    symbols_alpha: sort_symbols_alpha,
                },
            )?;
            let (symbols, _) = load_symbols(&files, options)?;
            print!("{}", renderer.render(&symbols)?);
            Ok(())
        }
        Command::Nomenc { files, style, only } => {
            let usages = only.as_deref().map(usage::read_yaml).transpose()?;
            let renderer = nomenc::create(&style, usages)?;
            let (symbols, _) = load_symbols(&files, options)?;
            print!("{}", renderer.render(&symbols)?);
            Ok(())
        }
        Command::Collect { files } => collect_mode(&files),
        Command::Extract {
            main_doc,
            output,
            files,
        } => extract_mode(&main_doc, output.as_deref(), &files, options),
        Command::Select {
            files,
            include,
            red,
            green,
            blue,
        } => {
            let (table, _) = load_symbols(&files, options)?;
            let selection = Selection {
                include,
                red,
                green,
                blue,
            };
            print!("{}", select::select(&table, &selection)?);
            Ok(())
        }
        Command::Deps { files, lyx, direct } => {
            let kind = if lyx {
                DocumentKind::Lyx
            } else {
                DocumentKind::Tex
            };
            deps_mode(&files, kind, direct)
        }
    }
}

/// Read definitions from `files`, or from stdin when there are none.
fn read_input(files: &[String]) -> Result<Input> {
    if files.is_empty() {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("failed to read stdin")?;
        return Ok(Input::Text {
            name: "stdin".to_string(),
            content,
        });
    }
    let paths = expand_globs(files, SOURCE_EXTENSIONS)?;
    if paths.is_empty() {
        bail!("no input files found in: {}", files.join(" "));
    }
    Ok(Input::Files(paths))
}

/// Load a table that must hold at least one section and one symbol.
fn load_symbols(files: &[String], options: ParseOptions) -> Result<(SymbolTable, Vec<Event>)> {
    let (table, events) = parser::load(read_input(files)?, options)?;
    if table.is_empty() {
        bail!("Not enough data found.");
    }
    Ok((table, events))
}

fn parse_mode(files: &[String], tokens: bool, options: ParseOptions) -> Result<()> {
    let sources: Vec<(String, String)> = match read_input(files)? {
        Input::Text { name, content } => vec![(name, content)],
        Input::Files(paths) => paths
            .iter()
            .map(|p| {
                fs::read_to_string(p)
                    .map(|c| (p.display().to_string(), c))
                    .with_context(|| format!("failed to read {}", p.display()))
            })
            .collect::<Result<_>>()?,
    };

    let mut table = SymbolTable::with_options(options);
    for (name, content) in &sources {
        if tokens {
            for token in lexer::tokenize(content, name) {
                println!("{:?}", token?);
            }
        } else {
            for event in table.parse(content, name) {
                println!("{:?}", event?);
            }
        }
    }
    Ok(())
}

fn collect_mode(files: &[String]) -> Result<()> {
    let paths = expand_globs(files, SOURCE_EXTENSIONS)?;
    let mut usages = usage::UsageMap::new();
    let mut names = Vec::new();
    for path in &paths {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let name = path.display().to_string();
        usage::merge(&mut usages, usage::find_all_commands(&name, &content));
        names.push(name);
    }
    info!("Found {} distinct commands", usages.len());
    print!("{}", usage::to_yaml(&usages, &names)?);
    Ok(())
}

fn extract_mode(
    main_doc: &Path,
    output: Option<&Path>,
    files: &[String],
    options: ParseOptions,
) -> Result<()> {
    let (table, _) = load_symbols(files, options)?;

    let content = fs::read_to_string(main_doc)
        .with_context(|| format!("failed to read {}", main_doc.display()))?;
    let used = usage::find_all_commands(&main_doc.display().to_string(), &content);
    info!("I found {} commands", used.len());

    let symbols = extract::closure(&table, used.into_keys());
    let text = extract::definitions(&symbols);
    match output {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{text}"),
    }
    Ok(())
}

fn deps_mode(files: &[String], kind: DocumentKind, direct: bool) -> Result<()> {
    let roots = if files.is_empty() {
        let pattern = kind.default_pattern();
        let mut roots: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {pattern}"))?
            .filter_map(|r| r.ok())
            .collect();
        roots.sort();
        roots
    } else {
        files.iter().map(PathBuf::from).collect()
    };
    debug!("roots: {roots:?}");

    let mut resolver = Resolver::new(kind);
    if direct {
        let mut all = indexmap::IndexSet::new();
        for root in &roots {
            all.extend(resolver.direct(root)?);
        }
        println!("{}", all.into_iter().collect::<Vec<_>>().join(" "));
        return Ok(());
    }
    for root in &roots {
        for rule in resolver.rules(root)? {
            println!("{rule}");
        }
    }
    Ok(())
}

/// File extensions picked up from directories.
const SOURCE_EXTENSIONS: &[&str] = &["tex"];

/// Expand glob patterns into a sorted, de-duplicated list of real files.
/// Bare directories are scanned (non-recursively) for `extensions`.
fn expand_globs(patterns: &[String], extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() {
                    if let Some(ext) = p.extension().and_then(|e| e.to_str()) {
                        if extensions.contains(&ext) {
                            files.push(p);
                        }
                    }
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    files.sort();
    files.dedup();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn expand_globs_sorts_and_dedups() {
        let dir = TempDir::new().unwrap();
        for name in ["b.tex", "a.tex", "notes.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let d = dir.path().display().to_string();
        let patterns = vec![
            format!("{d}/b.tex"),
            d.clone(),
            format!("{d}/*.tex"),
        ];
        let files = expand_globs(&patterns, SOURCE_EXTENSIONS).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("a.tex"), dir.path().join("b.tex")]
        );
    }

    #[test]
    fn expand_globs_no_match_is_empty() {
        let dir = TempDir::new().unwrap();
        let pattern = format!("{}/*.tex", dir.path().display());
        assert!(expand_globs(&[pattern], SOURCE_EXTENSIONS).unwrap().is_empty());
    }

    #[test]
    fn cli_parses_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "lsm",
            "table",
            "--style",
            "minimal",
            "--known-tag",
            "color",
            "--log-level",
            "info",
            "defs.tex",
        ])
        .unwrap();
        assert_eq!(cli.known_tags, vec!["color"]);
        assert_eq!(cli.log_level, "info");
        assert!(matches!(cli.command, Command::Table { ref style, .. } if style == "minimal"));
    }
}
