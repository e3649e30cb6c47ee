//! Shared test utilities for the partitura test suite.
//!
//! Provides fixture-tree builders and manifest/tree lookup helpers used by
//! the scan, generate, and output tests.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = sample_library();
//! let manifest = scan(tmp.path()).unwrap();
//!
//! let hymn = find_score(&manifest, "cherubic-ancient");
//! assert_eq!(hymn.composer.as_deref(), Some("Bortniansky"));
//!
//! assert_tree_shape(&manifest.tree, &[
//!     ("Liturgy", &["Cherubic Hymn"]),
//!     ("Vespers", &[]),
//! ]);
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::types::{Manifest, Score, TreeNode};

// =========================================================================
// Fixture builders
// =========================================================================

/// Write an `.abc` file into `dir`, creating the directory if needed.
pub fn write_score(dir: &Path, file_name: &str, abc: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(file_name), abc).unwrap();
}

/// Write a `folder.index` into `dir`, creating the directory if needed.
pub fn write_index(dir: &Path, content: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(crate::folder_index::INDEX_FILE_NAME), content).unwrap();
}

/// Build the standard fixture library in a temp directory:
///
/// ```text
/// <root>/
/// ├── folder.index                  # "# Library"
/// ├── vespers/
/// │   ├── folder.index              # "# Vespers"
/// │   └── psalm_103.abc             # T:Psalm 103  C:Kievan Chant
/// ├── liturgy/
/// │   ├── folder.index              # "# Liturgy"
/// │   └── cherubic_hymn/
/// │       ├── folder.index          # "# Cherubic Hymn" + description
/// │       └── cherubic-ancient.abc  # T:Херувимская песнь  C:Bortniansky, 2 voices
/// └── hours/                        # showInNavigation: false
///     ├── folder.index
///     └── first_hour.abc
/// ```
pub fn sample_library() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    write_index(root, "# Library\n\nA liturgical score library.\n");

    let vespers = root.join("vespers");
    write_index(&vespers, "# Vespers\n\nThe evening office.\n");
    write_score(
        &vespers,
        "psalm_103.abc",
        "X:1\nT:Psalm 103\nC:Kievan Chant\nK:C\nCDEF|GABc|\n",
    );

    let liturgy = root.join("liturgy");
    write_index(&liturgy, "# Liturgy\n");
    let hymn = liturgy.join("cherubic_hymn");
    write_index(&hymn, "# Cherubic Hymn\n\nSung at the Great Entrance.\n");
    write_score(
        &hymn,
        "cherubic-ancient.abc",
        "X:1\nT:Херувимская песнь\nC:Bortniansky\nK:C\n\
         V:1 clef=treble\nV:2 clef=bass\n[V:1] CDEF|\n[V:2] C,D,E,F,|\n",
    );

    let hours = root.join("hours");
    write_index(&hours, "# Hours\n\nshowInNavigation: false\n");
    write_score(&hours, "first_hour.abc", "X:1\nT:First Hour\nK:C\nCDEF|\n");

    tmp
}

// =========================================================================
// Lookup helpers
// =========================================================================

/// Find a folder node by display text, panicking with the available texts
/// when absent.
pub fn find_node<'a>(nodes: &'a [TreeNode], text: &str) -> &'a TreeNode {
    nodes
        .iter()
        .find(|n| n.is_folder() && n.text == text)
        .unwrap_or_else(|| {
            let available: Vec<&str> = nodes.iter().map(|n| n.text.as_str()).collect();
            panic!("no folder node {:?}, have {:?}", text, available)
        })
}

/// Find a score by slug.
pub fn find_score<'a>(manifest: &'a Manifest, slug: &str) -> &'a Score {
    manifest
        .scores
        .iter()
        .find(|s| s.slug == slug)
        .unwrap_or_else(|| {
            let available: Vec<&str> = manifest.scores.iter().map(|s| s.slug.as_str()).collect();
            panic!("no score {:?}, have {:?}", slug, available)
        })
}

// =========================================================================
// Tree assertions
// =========================================================================

/// Assert the folder shape of a navigation tree: `expected` lists the
/// top-level folder titles in order, each with its child folder titles
/// (score file nodes are not part of the shape).
pub fn assert_tree_shape(tree: &[TreeNode], expected: &[(&str, &[&str])]) {
    let folders: Vec<&TreeNode> = tree.iter().filter(|n| n.is_folder()).collect();
    let titles: Vec<&str> = folders.iter().map(|n| n.text.as_str()).collect();
    let expected_titles: Vec<&str> = expected.iter().map(|(t, _)| *t).collect();
    assert_eq!(titles, expected_titles, "top-level folder titles differ");

    for (node, (_, expected_children)) in folders.iter().zip(expected) {
        let child_titles: Vec<&str> = node
            .children
            .iter()
            .filter(|n| n.is_folder())
            .map(|n| n.text.as_str())
            .collect();
        assert_eq!(
            &child_titles, expected_children,
            "children of {:?} differ",
            node.text
        );
    }
}
