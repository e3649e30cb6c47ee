//! Filesystem scanning and manifest generation.
//!
//! Stage 1 of the partitura build pipeline. Walks the source tree to discover
//! folders and scores, producing the structured manifest the generate stage
//! consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! abc/                               # Source root
//! ├── config.toml                    # Site configuration (optional)
//! ├── folder.index                   # Root section metadata (optional)
//! ├── vespers/
//! │   ├── folder.index               # "# Вечерня" + showInNavigation flag
//! │   └── psalm_103.abc
//! ├── liturgy/
//! │   ├── folder.index
//! │   └── cherubic_hymn/
//! │       ├── folder.index
//! │       ├── cherubic-ancient.abc
//! │       └── cherubic-bortniansky.abc
//! └── hours/                         # showInNavigation: false
//!     └── first_hour.abc
//! ```
//!
//! ## Visibility
//!
//! A folder whose `folder.index` says `showInNavigation: false` is pruned
//! from the navigation tree together with its whole subtree. Its folders and
//! scores still land in the manifest's flat lists, so score pages inside
//! hidden sections are generated and reachable by direct URL — hidden means
//! "absent from navigation", nothing more.
//!
//! ## Ordering
//!
//! Directory entries are sorted by file name, folders and scores together,
//! so repeated scans of the same tree produce identical manifests.

use crate::abc;
use crate::config::{self, ConfigError};
use crate::folder_index;
use crate::metadata;
use crate::naming;
use crate::types::{Folder, Manifest, Score, TreeNode, ICON_ROOT};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Source root is not a directory: {0}")]
    NotADirectory(PathBuf),
}

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let config = config::load_config(root)?;

    let mut folders = Vec::new();
    let mut scores = Vec::new();

    // Root section metadata. Without a folder.index (or without a heading in
    // it), the root takes the collection title rather than its directory name.
    let mut root_index = folder_index::load(root, "");
    if root_index.title.is_empty() {
        root_index.title = config.collection.title.clone();
    }
    folders.push(Folder {
        path: String::new(),
        title: root_index.title,
        show_in_navigation: root_index.show_in_navigation,
        body: root_index.body,
        has_index: root_index.has_index,
    });

    let tree = scan_directory(root, "", &mut folders, &mut scores)?;

    Ok(Manifest {
        tree,
        folders,
        scores,
        config,
    })
}

/// Wrap the manifest's tree in the single root node `full-tree.json` carries.
pub fn full_tree(manifest: &Manifest) -> Vec<TreeNode> {
    vec![TreeNode {
        text: root_title(manifest).to_string(),
        id: String::new(),
        icon: ICON_ROOT.to_string(),
        children: manifest.tree.clone(),
    }]
}

/// Display title of the source root.
pub fn root_title(manifest: &Manifest) -> &str {
    manifest
        .folders
        .iter()
        .find(|f| f.path.is_empty())
        .map(|f| f.title.as_str())
        .unwrap_or(manifest.config.collection.title.as_str())
}

fn scan_directory(
    dir: &Path,
    rel: &str,
    folders: &mut Vec<Folder>,
    scores: &mut Vec<Score>,
) -> Result<Vec<TreeNode>, ScanError> {
    let mut nodes = Vec::new();

    for entry in collect_entries(dir)? {
        let name = entry
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if entry.is_dir() {
            let folder_rel = join_rel(rel, &name);
            let index = folder_index::load(&entry, &name);
            let visible = index.show_in_navigation;
            let title = index.title.clone();

            folders.push(Folder {
                path: folder_rel.clone(),
                title: index.title,
                show_in_navigation: index.show_in_navigation,
                body: index.body,
                has_index: index.has_index,
            });

            // Always recurse so hidden sections still yield scores.
            let children = scan_directory(&entry, &folder_rel, folders, scores)?;

            if visible {
                nodes.push(TreeNode::folder(title, folder_rel, children));
            }
        } else if name.ends_with(".abc") {
            let score = read_score(&entry, rel, &name)?;
            nodes.push(TreeNode::file(score.node_text(), score.page_path()));
            scores.push(score);
        }
    }

    Ok(nodes)
}

fn read_score(path: &Path, folder_rel: &str, file_name: &str) -> Result<Score, ScanError> {
    let content = metadata::read_text(path)?;
    let tunes = abc::split_tunes(&content);
    let header = tunes
        .first()
        .map(|t| abc::extract_header(t))
        .unwrap_or_default();

    let slug = naming::abc_stem(file_name).to_string();
    let stem_title = naming::format_name(&slug);
    let title =
        metadata::resolve(&[header.title.as_deref(), Some(&stem_title)]).unwrap_or(slug.clone());

    Ok(Score {
        source_path: join_rel(folder_rel, file_name),
        folder: folder_rel.to_string(),
        slug,
        title,
        composer: header.composer,
        voices: abc::collect_voices(&content),
        tunes: tunes.len(),
    })
}

/// Sorted content entries of a directory.
///
/// Hidden entries, `folder.index`, and `config.toml` are not content; the
/// first is also what keeps `.git` out of the walk.
fn collect_entries(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            let name = p
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            !name.starts_with('.')
                && name != folder_index::INDEX_FILE_NAME
                && name != config::CONFIG_FILE_NAME
        })
        .collect();

    entries.sort();
    Ok(entries)
}

/// Join relative path segments with `/`, treating `""` as the root.
pub fn join_rel(rel: &str, name: &str) -> String {
    if rel.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", rel, name)
    }
}
