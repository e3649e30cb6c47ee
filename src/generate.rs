//! Site output generation.
//!
//! Stage 2 of the partitura build pipeline. Takes the scan manifest and the
//! source tree and writes the published site.
//!
//! ## Generated Output
//!
//! - **Score pages** (`{folder}/{slug}.html`): one standalone HTML page per
//!   `.abc` file, embedding the raw ABC source for the browser-side renderer
//! - **Folder index pages** (`{folder}/index.md`): Markdown with YAML front
//!   matter, consumed by the downstream static site generator
//! - **`full-tree.json`**: the whole navigation tree under a single root node
//! - **`{folder}/navigation.json`**: each visible folder's children slice
//! - **`filelist.json`**: flat list of every folder and page with site URLs
//! - **`metadata.json`**: per-page score details (title, composer, voices)
//!
//! Hidden folders get score pages like any other folder, so their scores
//! stay reachable by direct URL; index pages and navigation slices are only
//! written for visible folders.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.md
//! ├── full-tree.json
//! ├── navigation.json
//! ├── filelist.json
//! ├── metadata.json
//! ├── vespers/
//! │   ├── index.md
//! │   ├── navigation.json
//! │   └── psalm_103.html
//! └── liturgy/
//!     └── ...
//! ```
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping, which is
//! what keeps raw ABC source (full of `<`, `>` and quotes in annotations)
//! safe to inline.
//!
//! ## Incremental Builds
//!
//! Score and index pages go through the render cache (see [`crate::cache`]):
//! a page whose source content and config are unchanged since the last build
//! is not rewritten. The JSON artifacts are always rewritten.

use crate::cache::{self, CacheManifest, CacheStats};
use crate::config::SiteConfig;
use crate::metadata;
use crate::scan;
use crate::types::{Manifest, Score, TreeNode};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Browser-side renderer bootstrap, embedded at compile time.
const INIT_JS: &str = include_str!("../static/init.js");

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// What a generate run produced.
#[derive(Debug, Default)]
pub struct GenerateReport {
    /// Score pages and folder index pages, through the render cache.
    pub pages: CacheStats,
    /// JSON artifacts (tree, per-folder navigation, filelist, metadata).
    pub artifacts: u32,
    /// Source files that could not be read back during rendering.
    pub skipped_sources: u32,
}

/// Read a scan manifest back from `manifest.json`.
pub fn load_manifest(path: &Path) -> Result<Manifest, GenerateError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn generate(
    manifest: &Manifest,
    source_dir: &Path,
    output_dir: &Path,
    use_cache: bool,
) -> Result<GenerateReport, GenerateError> {
    fs::create_dir_all(output_dir)?;

    let old_cache = if use_cache {
        CacheManifest::load(output_dir)
    } else {
        CacheManifest::empty()
    };
    // Rebuilt from scratch so entries for deleted pages fall out.
    let mut new_cache = CacheManifest::empty();
    let params_hash = cache::hash_params(&manifest.config);

    let titles = folder_titles(manifest);
    let mut report = GenerateReport::default();

    // Score pages
    for score in &manifest.scores {
        let source_path = source_dir.join(&score.source_path);
        let abc = match metadata::read_text(&source_path) {
            Ok(content) => content,
            Err(err) => {
                eprintln!(
                    "Warning: skipping {}: {}",
                    source_path.display(),
                    err
                );
                report.skipped_sources += 1;
                continue;
            }
        };

        let out_rel = score.page_path();
        let source_hash = cache::hash_bytes(abc.as_bytes());
        if old_cache.is_fresh(&out_rel, &source_hash, &params_hash, output_dir) {
            report.pages.skipped();
        } else {
            let page = render_score_page(manifest, score, &titles, &abc);
            write_output(output_dir, &out_rel, page.into_string().as_bytes())?;
            report.pages.wrote();
        }
        new_cache.insert(out_rel, source_hash, params_hash.clone());
    }

    // Folder index pages for visible folders. A folder under a hidden
    // ancestor has no tree node, so the set covers whole hidden subtrees.
    let mut visible: HashSet<&str> = HashSet::new();
    visible.insert("");
    for node in flatten_folders(&manifest.tree) {
        visible.insert(node.id.as_str());
    }
    for folder in &manifest.folders {
        if !visible.contains(folder.path.as_str()) {
            continue;
        }
        let out_rel = if folder.path.is_empty() {
            "index.md".to_string()
        } else {
            format!("{}/index.md", folder.path)
        };
        let content = render_index_page(manifest, &folder.path, &titles)?;
        let source_hash = cache::hash_bytes(content.as_bytes());
        if old_cache.is_fresh(&out_rel, &source_hash, &params_hash, output_dir) {
            report.pages.skipped();
        } else {
            write_output(output_dir, &out_rel, content.as_bytes())?;
            report.pages.wrote();
        }
        new_cache.insert(out_rel, source_hash, params_hash.clone());
    }

    // Navigation artifacts, always rewritten
    write_json(output_dir, "full-tree.json", &scan::full_tree(manifest))?;
    report.artifacts += 1;

    write_json(output_dir, "navigation.json", &manifest.tree)?;
    report.artifacts += 1;
    for node in flatten_folders(&manifest.tree) {
        let rel = format!("{}/navigation.json", node.id);
        write_json(output_dir, &rel, &node.children)?;
        report.artifacts += 1;
    }

    write_json(output_dir, "filelist.json", &build_filelist(manifest))?;
    report.artifacts += 1;

    write_json(output_dir, "metadata.json", &build_metadata(manifest))?;
    report.artifacts += 1;

    new_cache.save(output_dir)?;
    Ok(report)
}

/// Write a file under the output root, creating parent directories.
fn write_output(output_dir: &Path, rel: &str, bytes: &[u8]) -> Result<(), GenerateError> {
    let path = output_dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

fn write_json<T: Serialize>(
    output_dir: &Path,
    rel: &str,
    value: &T,
) -> Result<(), GenerateError> {
    let json = serde_json::to_string_pretty(value)?;
    write_output(output_dir, rel, json.as_bytes())
}

/// Folder path to display title, for breadcrumbs and the filelist.
fn folder_titles(manifest: &Manifest) -> HashMap<String, String> {
    manifest
        .folders
        .iter()
        .map(|f| (f.path.clone(), f.title.clone()))
        .collect()
}

/// Every visible folder node of the tree, depth-first.
fn flatten_folders(tree: &[TreeNode]) -> Vec<&TreeNode> {
    let mut nodes = Vec::new();
    let mut stack: Vec<&TreeNode> = tree.iter().rev().collect();
    while let Some(node) = stack.pop() {
        if node.is_folder() {
            nodes.push(node);
            stack.extend(node.children.iter().rev());
        }
    }
    nodes
}

// ============================================================================
// Score pages
// ============================================================================

/// Renders the base HTML document structure.
fn base_document(lang: &str, title: &str, head_links: Markup, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                (head_links)
            }
            body {
                (content)
            }
        }
    }
}

/// URL prefix climbing from a page at `depth` back to the output root.
fn relative_prefix(depth: usize) -> String {
    "../".repeat(depth)
}

/// Site URL of a folder page, `""` meaning the collection root.
fn folder_url(base_path: &str, folder: &str) -> String {
    if folder.is_empty() {
        format!("{}/", base_path)
    } else {
        format!("{}/{}/", base_path, folder)
    }
}

/// Breadcrumb trail: Home, collection root, ancestor folders, then the
/// current page title as plain text.
fn breadcrumbs(
    config: &SiteConfig,
    folder: &str,
    titles: &HashMap<String, String>,
    current: &str,
) -> Markup {
    let base = &config.collection.base_path;
    let mut ancestors = Vec::new();
    if !folder.is_empty() {
        let segments: Vec<&str> = folder.split('/').collect();
        for i in 0..segments.len() {
            ancestors.push(segments[..=i].join("/"));
        }
    }
    html! {
        nav.breadcrumb {
            a href=(config.site.home_href) { "Home" }
            " > "
            a href=(folder_url(base, "")) { (config.collection.title) }
            @for ancestor in &ancestors {
                " > "
                a href=(folder_url(base, ancestor)) {
                    (titles.get(ancestor).map(String::as_str).unwrap_or(ancestor))
                }
            }
            " > "
            span.current { (current) }
        }
    }
}

fn site_header(config: &SiteConfig, breadcrumb: Markup) -> Markup {
    html! {
        header.site-header {
            h1.site-title {
                a href=(config.site.home_href) { (config.site.title) }
            }
            (breadcrumb)
        }
    }
}

/// Renders one score page.
///
/// The raw ABC source goes into `div.abc-source` as escaped text; the
/// embedded init script hands it to the browser-side renderer on load.
pub fn render_score_page(
    manifest: &Manifest,
    score: &Score,
    titles: &HashMap<String, String>,
    abc: &str,
) -> Markup {
    let config = &manifest.config;
    let depth = score.page_path().matches('/').count();
    let prefix = relative_prefix(depth);

    let head_links = html! {
        @for sheet in &config.assets.stylesheets {
            link rel="stylesheet" href=(format!("{}{}", prefix, sheet));
        }
    };

    let content = html! {
        (site_header(config, breadcrumbs(config, &score.folder, titles, &score.title)))
        main.score {
            h2.score-title { (score.title) }
            @if let Some(composer) = &score.composer {
                p.score-composer { (composer) }
            }
            div.abc-container {
                div.abc-source { (abc) }
            }
        }
        @for script in &config.assets.scripts {
            script src=(format!("{}{}", prefix, script)) {}
        }
        script { (PreEscaped(INIT_JS)) }
    };

    let doc_title = match &score.composer {
        Some(composer) => format!("{} - {}", score.title, composer),
        None => score.title.clone(),
    };
    base_document(&config.site.lang, &doc_title, head_links, content)
}

// ============================================================================
// Folder index pages
// ============================================================================

/// YAML front matter of a folder index page.
#[derive(Debug, Serialize)]
struct FrontMatter<'a> {
    layout: &'a str,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_folder_title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_folder_path: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    full_tree: bool,
}

/// Renders a folder's `index.md`: YAML front matter between `---` fences,
/// followed by the `folder.index` body when there is one.
pub fn render_index_page(
    manifest: &Manifest,
    folder_path: &str,
    titles: &HashMap<String, String>,
) -> Result<String, GenerateError> {
    let config = &manifest.config;
    let folder = manifest
        .folders
        .iter()
        .find(|f| f.path == folder_path);
    let title = folder
        .map(|f| f.title.as_str())
        .unwrap_or_else(|| titles.get(folder_path).map(String::as_str).unwrap_or(folder_path));
    let body = folder.map(|f| f.body.as_str()).unwrap_or("");

    let is_root = folder_path.is_empty();
    let parent = parent_path(folder_path);
    let front = FrontMatter {
        layout: &config.layouts.folder,
        title,
        parent_folder_title: parent.as_ref().map(|p| {
            titles
                .get(p.as_str())
                .map(String::as_str)
                .unwrap_or(p.as_str())
        }),
        parent_folder_path: parent
            .as_ref()
            .map(|p| folder_url(&config.collection.base_path, p)),
        full_tree: is_root,
    };

    let yaml = serde_yaml::to_string(&front)?;
    let mut page = format!("---\n{}---\n", yaml);
    if !body.is_empty() {
        page.push('\n');
        page.push_str(body);
        page.push('\n');
    }
    Ok(page)
}

/// Parent of a folder path, `Some("")` meaning the root, `None` for the
/// root itself.
fn parent_path(folder_path: &str) -> Option<String> {
    if folder_path.is_empty() {
        return None;
    }
    match folder_path.rsplit_once('/') {
        Some((parent, _)) => Some(parent.to_string()),
        None => Some(String::new()),
    }
}

// ============================================================================
// JSON artifacts
// ============================================================================

/// One entry of `filelist.json`.
#[derive(Debug, Serialize, PartialEq)]
pub struct FileListEntry {
    pub path: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Flat list of every folder and score page with its published URL.
/// Hidden folders are listed; they exist on disk even if the tree omits
/// them. Duplicate paths keep the first entry.
pub fn build_filelist(manifest: &Manifest) -> Vec<FileListEntry> {
    let base = &manifest.config.collection.base_path;
    let mut entries = Vec::new();
    let mut seen = HashSet::new();

    for folder in &manifest.folders {
        let path = folder_url(base, &folder.path);
        if seen.insert(path.clone()) {
            entries.push(FileListEntry {
                path,
                name: folder.title.clone(),
                kind: "folder".to_string(),
            });
        }
    }
    for score in &manifest.scores {
        let path = format!("{}/{}", base, score.page_path());
        if seen.insert(path.clone()) {
            entries.push(FileListEntry {
                path,
                name: score.title.clone(),
                kind: "file".to_string(),
            });
        }
    }
    entries
}

/// One entry of `metadata.json`, keyed by the score's page path.
#[derive(Debug, Serialize)]
pub struct ScoreMetadata {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composer: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub voices: Vec<String>,
    pub tunes: usize,
}

/// Per-page score details, keyed by page path for stable ordering.
pub fn build_metadata(manifest: &Manifest) -> BTreeMap<String, ScoreMetadata> {
    manifest
        .scores
        .iter()
        .map(|s| {
            (
                s.page_path(),
                ScoreMetadata {
                    title: s.title.clone(),
                    composer: s.composer.clone(),
                    voices: s.voices.clone(),
                    tunes: s.tunes,
                },
            )
        })
        .collect()
}
