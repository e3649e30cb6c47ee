//! Shared types serialized between pipeline stages.
//!
//! The scan stage writes these to `manifest.json`; the generate stage reads
//! them back. They must round-trip through JSON unchanged.
//!
//! [`TreeNode`] doubles as the on-disk schema of `full-tree.json` and the
//! per-folder `navigation.json` slices, so its field names and the `jstree-*`
//! icon strings are part of the output contract consumed by the client-side
//! browser scripts.

use crate::config::SiteConfig;
use serde::{Deserialize, Serialize};

/// Manifest output from the scan stage.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    /// Navigation tree of visible folders and their scores.
    pub tree: Vec<TreeNode>,
    /// Every folder, hidden ones included. The source root is `path: ""`.
    pub folders: Vec<Folder>,
    /// Every score, including those inside hidden folders.
    pub scores: Vec<Score>,
    pub config: SiteConfig,
}

/// A source folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    /// Path relative to the source root, `""` for the root itself.
    pub path: String,
    /// Display title: `folder.index` heading or formatted directory name.
    pub title: String,
    /// Whether the folder (and its subtree) appears in navigation.
    pub show_in_navigation: bool,
    /// Markdown body of `folder.index`, visibility line stripped.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
    /// Whether a `folder.index` file was present.
    pub has_index: bool,
}

/// A score extracted from one `.abc` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Score {
    /// Source path relative to the source root (`liturgy/cherubic.abc`).
    pub source_path: String,
    /// Containing folder relative to the source root, `""` for the root.
    pub folder: String,
    /// File stem; output page is `{folder}/{slug}.html`.
    pub slug: String,
    /// Display title: first tune's `T:` header or the formatted stem.
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composer: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub voices: Vec<String>,
    /// Number of tunes in the file.
    pub tunes: usize,
}

impl Score {
    /// Output page path relative to the output root.
    pub fn page_path(&self) -> String {
        if self.folder.is_empty() {
            format!("{}.html", self.slug)
        } else {
            format!("{}/{}.html", self.folder, self.slug)
        }
    }

    /// Tree-node label: title plus composer, falling back to the stem.
    pub fn node_text(&self) -> String {
        let text = match &self.composer {
            Some(c) => format!("{} {}", self.title, c),
            None => self.title.clone(),
        };
        let text = text.trim().to_string();
        if text.is_empty() {
            self.slug.clone()
        } else {
            text
        }
    }
}

/// A node of the navigation tree, in the jstree-compatible schema the
/// client scripts expect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreeNode {
    pub text: String,
    pub id: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

pub const ICON_ROOT: &str = "jstree-root";
pub const ICON_FOLDER: &str = "jstree-folder";
pub const ICON_FILE: &str = "jstree-file";

impl TreeNode {
    pub fn folder(text: impl Into<String>, id: impl Into<String>, children: Vec<TreeNode>) -> Self {
        TreeNode {
            text: text.into(),
            id: id.into(),
            icon: ICON_FOLDER.to_string(),
            children,
        }
    }

    pub fn file(text: impl Into<String>, id: impl Into<String>) -> Self {
        TreeNode {
            text: text.into(),
            id: id.into(),
            icon: ICON_FILE.to_string(),
            children: Vec::new(),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.icon != ICON_FILE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(folder: &str, slug: &str) -> Score {
        Score {
            source_path: format!("{}/{}.abc", folder, slug),
            folder: folder.to_string(),
            slug: slug.to_string(),
            title: String::new(),
            composer: None,
            voices: vec![],
            tunes: 1,
        }
    }

    #[test]
    fn page_path_nested() {
        let s = score("liturgy/cherubic_hymn", "cherubic-ancient");
        assert_eq!(s.page_path(), "liturgy/cherubic_hymn/cherubic-ancient.html");
    }

    #[test]
    fn page_path_root() {
        let mut s = score("", "anthem");
        s.folder.clear();
        assert_eq!(s.page_path(), "anthem.html");
    }

    #[test]
    fn node_text_title_and_composer() {
        let mut s = score("a", "b");
        s.title = "Cherubic Hymn".to_string();
        s.composer = Some("Bortniansky".to_string());
        assert_eq!(s.node_text(), "Cherubic Hymn Bortniansky");
    }

    #[test]
    fn node_text_title_only() {
        let mut s = score("a", "b");
        s.title = "Cherubic Hymn".to_string();
        assert_eq!(s.node_text(), "Cherubic Hymn");
    }

    #[test]
    fn node_text_falls_back_to_slug() {
        let s = score("a", "cherubic-ancient");
        assert_eq!(s.node_text(), "cherubic-ancient");
    }

    #[test]
    fn file_node_serializes_without_children() {
        let node = TreeNode::file("Hymn", "liturgy/hymn.html");
        let json = serde_json::to_string(&node).unwrap();
        assert!(!json.contains("children"));
        assert!(json.contains("jstree-file"));
    }

    #[test]
    fn tree_node_roundtrip() {
        let node = TreeNode::folder(
            "Liturgy",
            "liturgy",
            vec![TreeNode::file("Hymn", "liturgy/hymn.html")],
        );
        let json = serde_json::to_string(&node).unwrap();
        let back: TreeNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
