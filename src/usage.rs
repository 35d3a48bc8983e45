//! Where commands are used in documents.

use crate::scan;
use anyhow::{Context, Result};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One recorded use of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub filename: String,
    /// 1-based.
    pub line: usize,
    /// The most recent `\label{...}` seen before this line, if any.
    pub last_label: Option<String>,
}

/// Command → uses in document order.
pub type UsageMap = IndexMap<String, Vec<Usage>>;

/// Scan `content` for command uses, ignoring comments.
///
/// A command is recorded at every appearance up to and including its first
/// appearance after some label has been seen; later uses are dropped.
pub fn find_all_commands(filename: &str, content: &str) -> UsageMap {
    let mut commands = UsageMap::new();
    let mut labelled: IndexSet<&str> = IndexSet::new();
    let mut last_label: Option<&str> = None;

    for (index, line) in content.lines().enumerate() {
        let line = scan::strip_comment(line);

        if let Some(label) = scan::labels(line).last() {
            last_label = Some(label);
        }

        for command in scan::commands(line) {
            if !labelled.contains(command) {
                commands.entry(command.to_string()).or_default().push(Usage {
                    filename: filename.to_string(),
                    line: index + 1,
                    last_label: last_label.map(str::to_string),
                });
            }
            if last_label.is_some() {
                labelled.insert(command);
            }
        }
    }

    commands
}

/// Append the uses of `other` to `into`, keeping the key order of first
/// appearance.
pub fn merge(into: &mut UsageMap, other: UsageMap) {
    for (command, uses) in other {
        into.entry(command).or_default().extend(uses);
    }
}

/// YAML document for `usages`, preceded by two `#` comment lines naming
/// the scanned files.
pub fn to_yaml(usages: &UsageMap, filenames: &[String]) -> Result<String> {
    let body = serde_yaml::to_string(usages).context("failed to serialize usage map")?;
    Ok(format!(
        "# YAML dump of symbols found in files {filenames:?}\n# \n{body}"
    ))
}

pub fn read_yaml(path: &Path) -> Result<UsageMap> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("invalid usage map in {}", path.display()))
}

impl Usage {
    /// First use that has a label to refer to.
    pub fn first_labelled(uses: &[Usage]) -> Option<&str> {
        uses.iter().find_map(|u| u.last_label.as_deref())
    }
}
