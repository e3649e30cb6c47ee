//! `folder.index` parsing.
//!
//! Every source folder may carry a `folder.index` — a small Markdown file
//! describing the section:
//!
//! ```text
//! # Херувимская песнь
//!
//! showInNavigation: true
//!
//! Песнопение, исполняемое во время Великого входа.
//! ```
//!
//! Three things come out of it:
//!
//! - **Title**: the first `# ` heading line. Fallback is the formatted
//!   directory name.
//! - **Visibility**: a `showInNavigation: true|false` line anywhere in the
//!   file. Absent means visible. The line is stripped from the body so it
//!   never leaks into the generated `index.md`.
//! - **Body**: the remaining markdown, trimmed, emitted below the YAML front
//!   matter of the folder's index page.
//!
//! Reads are best-effort: an unreadable `folder.index` produces a warning on
//! stderr and the folder degrades to its fallback title, visible.

use crate::metadata::{self, read_text};
use crate::naming::format_name;
use std::path::Path;

pub const INDEX_FILE_NAME: &str = "folder.index";

/// Parsed per-folder metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderIndex {
    /// Display title: `# ` heading, else the formatted directory name.
    pub title: String,
    /// Whether the folder (and its subtree) appears in navigation.
    pub show_in_navigation: bool,
    /// Markdown body with the visibility line removed, trimmed.
    pub body: String,
    /// False when no `folder.index` existed and everything is fallback.
    pub has_index: bool,
}

impl FolderIndex {
    /// Fallback metadata for a folder without a readable `folder.index`.
    pub fn fallback(dir_name: &str) -> Self {
        FolderIndex {
            title: format_name(dir_name),
            show_in_navigation: true,
            body: String::new(),
            has_index: false,
        }
    }
}

/// Parse `folder.index` content for the folder named `dir_name`.
pub fn parse(content: &str, dir_name: &str) -> FolderIndex {
    let mut show_in_navigation = true;
    let mut body_lines: Vec<&str> = Vec::new();

    for line in content.lines() {
        match parse_visibility(line) {
            Some(v) => show_in_navigation = v,
            None => body_lines.push(line),
        }
    }

    let heading = body_lines
        .iter()
        .find(|line| line.starts_with("# "))
        .map(|line| line["# ".len()..].trim());

    let title = metadata::resolve(&[heading, Some(&format_name(dir_name))]).unwrap_or_default();

    FolderIndex {
        title,
        show_in_navigation,
        body: body_lines.join("\n").trim().to_string(),
        has_index: true,
    }
}

/// Load and parse the `folder.index` of `dir`, degrading on failure.
///
/// Missing file: silent fallback. Unreadable file: warning on stderr,
/// then fallback. `dir_name` is passed separately because the source root
/// maps to the collection title rather than its directory name.
pub fn load(dir: &Path, dir_name: &str) -> FolderIndex {
    let path = dir.join(INDEX_FILE_NAME);
    if !path.exists() {
        return FolderIndex::fallback(dir_name);
    }
    match read_text(&path) {
        Ok(content) => parse(&content, dir_name),
        Err(err) => {
            eprintln!("warning: could not read {}: {}", path.display(), err);
            FolderIndex::fallback(dir_name)
        }
    }
}

/// Recognize a `showInNavigation: true|false` line, ignoring surrounding
/// whitespace. Anything else (including malformed values) is body text.
fn parse_visibility(line: &str) -> Option<bool> {
    let rest = line.trim().strip_prefix("showInNavigation:")?;
    match rest.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
