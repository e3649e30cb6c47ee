//! Metadata resolution and text-file reading.
//!
//! Titles come from two independent sources, resolved in priority order:
//!
//! - **Scores**: ABC `T:` header → formatted file stem
//! - **Folders**: `folder.index` `# ` heading → formatted directory name
//!
//! The first non-empty value wins. The rationale: explicit metadata is
//! deliberate curation (someone typed the title into the score or the index
//! file on purpose) and beats mechanical name formatting.
//!
//! Source files are read through [`read_text`], which strips the UTF-8 BOM
//! that Windows notation editors routinely prepend to `.abc` exports.

use std::io;
use std::path::Path;

/// Resolve a metadata field from multiple sources.
///
/// Takes a list of optional values in priority order and returns the first
/// non-None, non-empty value, trimmed.
///
/// ```text
/// score title:  resolve(&[abc_title,   stem_title])
/// folder title: resolve(&[index_title, dir_title])
/// ```
pub fn resolve(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .filter_map(|opt| {
            opt.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .next()
}

/// Read a file as UTF-8 text with a leading BOM stripped.
pub fn read_text(path: &Path) -> io::Result<String> {
    let content = std::fs::read_to_string(path)?;
    Ok(strip_bom(&content).to_string())
}

/// Strip a leading UTF-8 BOM, if present.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}
