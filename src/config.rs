//! Site configuration module.
//!
//! Handles loading and validating `config.toml` from the source root. All
//! fields have defaults, so a library without a config file builds with the
//! stock values below. Unknown keys are rejected to catch typos early.
//!
//! ```toml
//! [site]
//! title = "Score Library"     # <h1> on score pages
//! lang = "en"                 # <html lang>
//! home_href = "/"             # breadcrumb/nav "Home" target
//!
//! [collection]
//! title = "Scores"            # root tree node and breadcrumb label
//! base_path = "/partitures"   # URL prefix used in filelist.json
//!
//! [layouts]
//! folder = "partiture_folder" # front-matter layout of folder index pages
//!
//! [assets]
//! stylesheets = ["main.css"]  # resolved relative to the output root
//! scripts = ["abc-ui.min.js"]
//! ```
//!
//! Unlike per-folder titles and visibility — which live in `folder.index`
//! next to the content — the config applies to the whole site and is read
//! from the root only.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub site: SiteSection,
    pub collection: CollectionSection,
    pub layouts: LayoutsSection,
    pub assets: AssetsSection,
}

impl SiteConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.lang.is_empty() {
            return Err(ConfigError::Validation("site.lang must not be empty".into()));
        }
        if self.collection.title.is_empty() {
            return Err(ConfigError::Validation(
                "collection.title must not be empty".into(),
            ));
        }
        if !self.collection.base_path.starts_with('/') {
            return Err(ConfigError::Validation(
                "collection.base_path must start with '/'".into(),
            ));
        }
        if self.collection.base_path.len() > 1 && self.collection.base_path.ends_with('/') {
            return Err(ConfigError::Validation(
                "collection.base_path must not end with '/'".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Site heading shown on every score page.
    pub title: String,
    /// `lang` attribute of generated HTML documents.
    pub lang: String,
    /// Where the "Home" breadcrumb/nav link points.
    pub home_href: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "Score Library".to_string(),
            lang: "en".to_string(),
            home_href: "/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectionSection {
    /// Label for the collection root in breadcrumbs and the tree root node.
    pub title: String,
    /// URL prefix of the published collection, used in `filelist.json`.
    pub base_path: String,
}

impl Default for CollectionSection {
    fn default() -> Self {
        Self {
            title: "Scores".to_string(),
            base_path: "/partitures".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutsSection {
    /// Front-matter `layout:` value for folder index pages.
    pub folder: String,
}

impl Default for LayoutsSection {
    fn default() -> Self {
        Self {
            folder: "partiture_folder".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsSection {
    /// Stylesheets linked from score pages, relative to the output root.
    pub stylesheets: Vec<String>,
    /// Scripts loaded at the end of score pages, relative to the output root.
    pub scripts: Vec<String>,
}

impl Default for AssetsSection {
    fn default() -> Self {
        Self {
            stylesheets: vec!["main.css".to_string()],
            scripts: vec!["abc-ui.min.js".to_string()],
        }
    }
}

/// Load `config.toml` from the source root, falling back to defaults when
/// the file doesn't exist. The result is validated either way.
pub fn load_config(source_root: &Path) -> Result<SiteConfig, ConfigError> {
    let path = source_root.join(CONFIG_FILE_NAME);
    let config = if path.exists() {
        let content = fs::read_to_string(&path)?;
        toml::from_str(&content)?
    } else {
        SiteConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// A documented stock `config.toml`, printed by `partitura gen-config`.
pub fn stock_config_toml() -> String {
    r#"# partitura site configuration
# All options are optional - the values below are the defaults.

[site]
# Site heading shown on every score page.
title = "Score Library"
# lang attribute of generated HTML documents.
lang = "en"
# Where the "Home" breadcrumb and nav link point.
home_href = "/"

[collection]
# Label for the collection root in breadcrumbs and the navigation tree.
title = "Scores"
# URL prefix of the published collection, used in filelist.json paths.
base_path = "/partitures"

[layouts]
# Front-matter layout for folder index pages, resolved by the downstream
# static site generator.
folder = "partiture_folder"

[assets]
# Stylesheets linked from score pages, relative to the output root.
stylesheets = ["main.css"]
# Scripts loaded at the end of score pages, relative to the output root.
# The first script is expected to provide the browser-side ABC renderer.
scripts = ["abc-ui.min.js"]
"#
    .to_string()
}
