//! Render cache for incremental builds.
//!
//! Rebuilding a large score library rewrites hundreds of pages whose inputs
//! rarely change. This module lets the generate stage skip writing a page
//! when its source content and its template inputs are both unchanged since
//! the last build.
//!
//! # Design
//!
//! The cache manifest is a JSON file at `<output_dir>/.cache-manifest.json`
//! mapping output paths to a pair of SHA-256 hashes:
//!
//! - **`source_hash`**: hash of the source content the page embeds — the raw
//!   `.abc` bytes for score pages, the resolved title+body for folder index
//!   pages. Content-based rather than mtime-based so it survives
//!   `git checkout` (which resets modification times).
//!
//! - **`params_hash`**: hash of everything else that flows into the
//!   template: the full site config plus a template version constant. Any
//!   config edit, or a template change shipped in a new release, re-renders
//!   every page.
//!
//! A page is fresh when an entry with both hashes exists for its output path
//! and the output file is still on disk. Lookups are path-keyed, not
//! content-keyed: a page's markup depends on where it lives (breadcrumbs,
//! `../` prefixes), so a moved source must re-render even if its bytes are
//! identical.
//!
//! The JSON navigation manifests are never cached — they are cheap and
//! always rewritten.
//!
//! ## Bypassing the cache
//!
//! `--no-cache` on `build`/`generate` loads an empty manifest, so every page
//! is rewritten. A missing, corrupt, or version-mismatched manifest degrades
//! to empty the same way.

use crate::config::SiteConfig;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::Path;

/// Name of the cache manifest file within the output directory.
const MANIFEST_FILENAME: &str = ".cache-manifest.json";

/// Version of the cache manifest format. Bump to invalidate all existing
/// caches when the format or key computation changes.
const MANIFEST_VERSION: u32 = 1;

/// Version of the page templates. Bump when the rendered markup changes so
/// stale caches don't keep old pages alive.
const TEMPLATE_VERSION: u32 = 3;

/// A single cached output file.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct CacheEntry {
    pub source_hash: String,
    pub params_hash: String,
}

/// On-disk cache manifest mapping output paths to their cache entries.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CacheManifest {
    pub version: u32,
    pub entries: HashMap<String, CacheEntry>,
}

impl CacheManifest {
    /// Create an empty manifest (used for `--no-cache` or first build).
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: HashMap::new(),
        }
    }

    /// Load from the output directory. Returns an empty manifest if the
    /// file doesn't exist or can't be parsed (version mismatch, corruption).
    pub fn load(output_dir: &Path) -> Self {
        let path = output_dir.join(MANIFEST_FILENAME);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        let manifest: Self = match serde_json::from_str(&content) {
            Ok(m) => m,
            Err(_) => return Self::empty(),
        };
        if manifest.version != MANIFEST_VERSION {
            return Self::empty();
        }
        manifest
    }

    /// Save to the output directory.
    pub fn save(&self, output_dir: &Path) -> io::Result<()> {
        let path = output_dir.join(MANIFEST_FILENAME);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    /// Whether the page at `output_path` is up to date: hashes match and the
    /// output file still exists on disk.
    pub fn is_fresh(
        &self,
        output_path: &str,
        source_hash: &str,
        params_hash: &str,
        output_dir: &Path,
    ) -> bool {
        match self.entries.get(output_path) {
            Some(entry) => {
                entry.source_hash == source_hash
                    && entry.params_hash == params_hash
                    && output_dir.join(output_path).exists()
            }
            None => false,
        }
    }

    /// Record a cache entry for an output file.
    pub fn insert(&mut self, output_path: String, source_hash: String, params_hash: String) {
        self.entries.insert(
            output_path,
            CacheEntry {
                source_hash,
                params_hash,
            },
        );
    }
}

/// SHA-256 of a byte slice, as a hex string.
pub fn hash_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// SHA-256 of a file's contents, as a hex string.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(hash_bytes(&bytes))
}

/// SHA-256 of the template inputs shared by every page in a build: the site
/// config plus the template version.
pub fn hash_params(config: &SiteConfig) -> String {
    let mut hasher = Sha256::new();
    hasher.update(TEMPLATE_VERSION.to_le_bytes());
    // Config serialization is stable field order, so this is deterministic.
    if let Ok(json) = serde_json::to_vec(config) {
        hasher.update(&json);
    }
    format!("{:x}", hasher.finalize())
}

/// Summary of cache performance for a build run.
#[derive(Debug, Default)]
pub struct CacheStats {
    pub written: u32,
    pub unchanged: u32,
}

impl CacheStats {
    pub fn wrote(&mut self) {
        self.written += 1;
    }

    pub fn skipped(&mut self) {
        self.unchanged += 1;
    }

    pub fn total(&self) -> u32 {
        self.written + self.unchanged
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unchanged > 0 {
            write!(
                f,
                "{} written, {} unchanged ({} total)",
                self.written,
                self.unchanged,
                self.total()
            )
        } else {
            write!(f, "{} written", self.written)
        }
    }
}
