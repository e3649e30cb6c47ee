//! CLI output formatting for both pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (folder, score) is its semantic identity — title and
//! positional index — with filesystem paths shown as secondary context via
//! indented `Source:` lines. This makes the output readable as a content
//! inventory while still letting users trace data back to specific files.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Library
//! 001 Liturgy (1 score)
//!     Source: liturgy/
//!     Description: The Divine Liturgy...
//!     001 Cherubic Hymn (2 scores)
//!         Source: liturgy/cherubic_hymn/
//!         001 Херувимская песнь Bortniansky
//!             Source: liturgy/cherubic_hymn/cherubic-ancient.abc
//!
//! Hidden
//! 001 Hours
//!     Source: hours/
//!
//! Found 4 folders, 3 scores
//! ```
//!
//! ## Generate
//!
//! ```text
//! Library → index.md
//! 001 Liturgy → liturgy/index.md
//!     001 Cherubic Hymn → liturgy/cherubic_hymn/index.md
//!         001 Херувимская песнь → liturgy/cherubic_hymn/cherubic-ancient.html
//!
//! Artifacts
//!     full-tree.json
//!     navigation.json (3 folder slices)
//!     filelist.json
//!     metadata.json
//!
//! Pages: 8 written, 0 unchanged (8 total)
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::generate::GenerateReport;
use crate::scan;
use crate::types::{Manifest, TreeNode};
use pulldown_cmark::{html as md_html, Parser};
use std::collections::HashMap;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + title, with optional score
/// count.
///
/// ```text
/// 001 Cherubic Hymn (2 scores)
/// 001 Vespers
/// ```
fn entity_header(index: usize, title: &str, count: Option<usize>) -> String {
    match count {
        Some(1) => format!("{} {} (1 score)", format_index(index), title),
        Some(n) => format!("{} {} ({} scores)", format_index(index), title, n),
        None => format!("{} {}", format_index(index), title),
    }
}

/// Strip HTML tags from a string (simple angle-bracket stripping).
fn strip_html_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

/// One-line plain-text preview of a markdown folder description. Headings
/// are dropped (the folder title already shows them), the rest is rendered
/// and stripped back to text.
fn markdown_preview(body: &str, max: usize) -> String {
    let prose: Vec<&str> = body
        .lines()
        .filter(|l| !l.trim_start().starts_with('#'))
        .collect();
    let mut rendered = String::new();
    md_html::push_html(&mut rendered, Parser::new(&prose.join("\n")));
    let text = strip_html_tags(&rendered);
    let line = text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    truncate_desc(line, max)
}

// ============================================================================
// Tree walker
// ============================================================================

/// A flattened node from walking the navigation tree.
struct FlatNode<'a> {
    depth: usize,
    position: usize,
    node: &'a TreeNode,
}

/// Walk the tree, assigning positional indices per sibling level. Folders
/// count positions separately from score files so both sequences read
/// `001, 002, ...` within a folder.
fn walk_tree<'a>(tree: &'a [TreeNode]) -> Vec<FlatNode<'a>> {
    let mut nodes = Vec::new();
    walk_tree_recursive(tree, 0, &mut nodes);
    nodes
}

fn walk_tree_recursive<'a>(items: &'a [TreeNode], depth: usize, nodes: &mut Vec<FlatNode<'a>>) {
    let mut folder_pos = 0;
    let mut file_pos = 0;
    for item in items {
        let position = if item.is_folder() {
            folder_pos += 1;
            folder_pos
        } else {
            file_pos += 1;
            file_pos
        };
        nodes.push(FlatNode {
            depth,
            position,
            node: item,
        });
        if item.is_folder() {
            walk_tree_recursive(&item.children, depth + 1, nodes);
        }
    }
}

/// Direct score count per folder path.
fn score_counts(manifest: &Manifest) -> HashMap<&str, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for score in &manifest.scores {
        *counts.entry(score.folder.as_str()).or_default() += 1;
    }
    counts
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan stage output showing the discovered library structure.
///
/// Information-first: each entity leads with its positional index and title.
/// Source paths and folder descriptions are shown as indented context lines.
pub fn format_scan_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();
    let counts = score_counts(manifest);

    lines.push(scan::root_title(manifest).to_string());

    for flat in walk_tree(&manifest.tree) {
        let base = indent(flat.depth);
        if flat.node.is_folder() {
            let count = counts.get(flat.node.id.as_str()).copied();
            lines.push(format!(
                "{}{}",
                base,
                entity_header(flat.position, &flat.node.text, count)
            ));
            lines.push(format!("{}Source: {}/", indent(flat.depth + 1), flat.node.id));
            if let Some(folder) = manifest.folders.iter().find(|f| f.path == flat.node.id) {
                if !folder.body.is_empty() {
                    lines.push(format!(
                        "{}Description: {}",
                        indent(flat.depth + 1),
                        markdown_preview(&folder.body, 60)
                    ));
                }
            }
        } else {
            lines.push(format!(
                "{}{}",
                base,
                entity_header(flat.position, &flat.node.text, None)
            ));
            lines.push(format!(
                "{}Source: {}",
                indent(flat.depth + 1),
                html_id_to_source(&flat.node.id)
            ));
        }
    }

    let hidden: Vec<_> = manifest
        .folders
        .iter()
        .filter(|f| !f.show_in_navigation)
        .collect();
    if !hidden.is_empty() {
        lines.push(String::new());
        lines.push("Hidden".to_string());
        for (i, folder) in hidden.iter().enumerate() {
            lines.push(entity_header(
                i + 1,
                &folder.title,
                counts.get(folder.path.as_str()).copied(),
            ));
            lines.push(format!("{}Source: {}/", indent(1), folder.path));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Found {} folders, {} scores",
        manifest.folders.len() - 1,
        manifest.scores.len()
    ));

    lines
}

/// Print scan stage output to stdout.
pub fn print_scan_output(manifest: &Manifest) {
    for line in format_scan_output(manifest) {
        println!("{}", line);
    }
}

/// A score page id is its source path with `.html` swapped back for `.abc`.
fn html_id_to_source(id: &str) -> String {
    match id.strip_suffix(".html") {
        Some(stem) => format!("{}.abc", stem),
        None => id.to_string(),
    }
}

// ============================================================================
// Stage 2: Generate output
// ============================================================================

/// Format generate stage output mapping entities to their output files.
pub fn format_generate_output(manifest: &Manifest, report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!("{} → index.md", scan::root_title(manifest)));

    for flat in walk_tree(&manifest.tree) {
        let base = indent(flat.depth);
        let target = if flat.node.is_folder() {
            format!("{}/index.md", flat.node.id)
        } else {
            flat.node.id.clone()
        };
        lines.push(format!(
            "{}{} → {}",
            base,
            entity_header(flat.position, &flat.node.text, None),
            target
        ));
    }

    let hidden: Vec<_> = manifest
        .folders
        .iter()
        .filter(|f| !f.show_in_navigation)
        .collect();
    if !hidden.is_empty() {
        lines.push(String::new());
        lines.push("Hidden".to_string());
        for (i, folder) in hidden.iter().enumerate() {
            lines.push(entity_header(i + 1, &folder.title, None));
            let mut pos = 0;
            for score in manifest.scores.iter().filter(|s| s.folder == folder.path) {
                pos += 1;
                lines.push(format!(
                    "{}{} → {}",
                    indent(1),
                    entity_header(pos, &score.title, None),
                    score.page_path()
                ));
            }
        }
    }

    // full-tree, root navigation, filelist, metadata; the rest are
    // per-folder navigation slices
    let nav_slices = report.artifacts.saturating_sub(4);
    lines.push(String::new());
    lines.push("Artifacts".to_string());
    lines.push(format!("{}full-tree.json", indent(1)));
    if nav_slices == 1 {
        lines.push(format!("{}navigation.json (1 folder slice)", indent(1)));
    } else {
        lines.push(format!(
            "{}navigation.json ({} folder slices)",
            indent(1),
            nav_slices
        ));
    }
    lines.push(format!("{}filelist.json", indent(1)));
    lines.push(format!("{}metadata.json", indent(1)));

    lines.push(String::new());
    lines.push(format!("Pages: {}", report.pages));
    if report.skipped_sources > 0 {
        lines.push(format!(
            "Warning: {} source files could not be read",
            report.skipped_sources
        ));
    }

    lines
}

/// Print generate stage output to stdout.
pub fn print_generate_output(manifest: &Manifest, report: &GenerateReport) {
    for line in format_generate_output(manifest, report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStats;
    use crate::test_helpers::*;

    fn sample_manifest() -> Manifest {
        let tmp = sample_library();
        crate::scan::scan(tmp.path()).unwrap()
    }

    #[test]
    fn format_index_pads_to_three() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(123), "123");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(1), "    ");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn entity_header_with_counts() {
        assert_eq!(entity_header(1, "Vespers", Some(1)), "001 Vespers (1 score)");
        assert_eq!(
            entity_header(2, "Liturgy", Some(3)),
            "002 Liturgy (3 scores)"
        );
        assert_eq!(entity_header(3, "Hours", None), "003 Hours");
    }

    #[test]
    fn strip_html_tags_removes_tags() {
        assert_eq!(strip_html_tags("<p>Great <em>Vespers</em></p>"), "Great Vespers");
    }

    #[test]
    fn truncate_desc_counts_chars_not_bytes() {
        // Cyrillic is two bytes per char; byte slicing would panic or split
        let text = "Песнопение Великого входа";
        assert_eq!(truncate_desc(text, 10), "Песнопение...");
        assert_eq!(truncate_desc("short", 10), "short");
    }

    #[test]
    fn markdown_preview_skips_heading_and_strips_markup() {
        let body = "# Liturgy\n\nSung at the *Great* Entrance.";
        assert_eq!(markdown_preview(body, 60), "Sung at the Great Entrance.");
    }

    #[test]
    fn markdown_preview_empty_body() {
        assert_eq!(markdown_preview("", 60), "");
    }

    #[test]
    fn walk_tree_positions_per_level() {
        let tree = vec![
            TreeNode::folder(
                "A",
                "a",
                vec![
                    TreeNode::file("one", "a/one.html"),
                    TreeNode::file("two", "a/two.html"),
                ],
            ),
            TreeNode::folder("B", "b", vec![]),
        ];
        let flat = walk_tree(&tree);
        assert_eq!(flat.len(), 4);
        assert_eq!((flat[0].depth, flat[0].position), (0, 1)); // A
        assert_eq!((flat[1].depth, flat[1].position), (1, 1)); // one
        assert_eq!((flat[2].depth, flat[2].position), (1, 2)); // two
        assert_eq!((flat[3].depth, flat[3].position), (0, 2)); // B
    }

    #[test]
    fn scan_output_leads_with_root_title() {
        let manifest = sample_manifest();
        let lines = format_scan_output(&manifest);
        assert_eq!(lines[0], "Library");
    }

    #[test]
    fn scan_output_shows_source_context() {
        let manifest = sample_manifest();
        let lines = format_scan_output(&manifest);
        let joined = lines.join("\n");
        assert!(joined.contains("Source: liturgy/"));
        assert!(joined.contains("Source: liturgy/cherubic_hymn/cherubic-ancient.abc"));
    }

    #[test]
    fn scan_output_lists_hidden_folders() {
        let manifest = sample_manifest();
        let lines = format_scan_output(&manifest);
        let hidden_at = lines.iter().position(|l| l == "Hidden").unwrap();
        assert!(lines[hidden_at + 1].contains("Hours"));
    }

    #[test]
    fn scan_output_totals() {
        let manifest = sample_manifest();
        let lines = format_scan_output(&manifest);
        assert_eq!(lines.last().unwrap(), "Found 4 folders, 3 scores");
    }

    #[test]
    fn generate_output_maps_entities_to_files() {
        let manifest = sample_manifest();
        let report = GenerateReport {
            pages: CacheStats {
                written: 8,
                unchanged: 0,
            },
            artifacts: 7,
            skipped_sources: 0,
        };
        let lines = format_generate_output(&manifest, &report);
        let joined = lines.join("\n");
        assert_eq!(lines[0], "Library → index.md");
        assert!(joined.contains("→ liturgy/index.md"));
        assert!(joined.contains("→ liturgy/cherubic_hymn/cherubic-ancient.html"));
        assert!(joined.contains("navigation.json (3 folder slices)"));
        assert!(joined.contains("001 First Hour → hours/first_hour.html"));
        assert!(joined.contains("Pages: 8 written"));
    }

    #[test]
    fn generate_output_reports_skipped_sources() {
        let manifest = sample_manifest();
        let report = GenerateReport {
            pages: CacheStats::default(),
            artifacts: 6,
            skipped_sources: 2,
        };
        let lines = format_generate_output(&manifest, &report);
        assert!(lines
            .iter()
            .any(|l| l == "Warning: 2 source files could not be read"));
    }

    #[test]
    fn html_id_round_trips_to_source() {
        assert_eq!(
            html_id_to_source("vespers/psalm_103.html"),
            "vespers/psalm_103.abc"
        );
        assert_eq!(html_id_to_source("plain"), "plain");
    }
}
