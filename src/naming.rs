//! Centralized display-name formatting for the underscore convention.
//!
//! Source entries (folders and `.abc` files) use lowercase underscore names:
//! `liturgy_of_the_faithful/`, `cherubic_hymn.abc`. When no explicit title is
//! available — no `folder.index` heading, no `T:` header line — the display
//! title falls back to the formatted entry name:
//!
//! - `cherubic_hymn` → "Cherubic Hymn"
//! - `liturgy_of_the_faithful` → "Liturgy Of The Faithful"
//!
//! This is the only place the convention is interpreted, so scan output,
//! tree nodes, and page titles all agree on fallback titles.

/// Format an underscore entry name as a display title.
///
/// Underscores become spaces and each word is capitalized on its first
/// character. Words that already start uppercase are left alone.
pub fn format_name(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Strip the `.abc` extension from a file name, if present.
///
/// Returns the stem used for output file names and fallback titles:
/// `cherubic-ancient.abc` → `cherubic-ancient`.
pub fn abc_stem(file_name: &str) -> &str {
    file_name.strip_suffix(".abc").unwrap_or(file_name)
}
