//! # Partitura
//!
//! A static site generator for choral score libraries kept as [ABC
//! notation](https://abcnotation.com/) files. Your filesystem is the data
//! source: directories become sections, `.abc` files become score pages,
//! and small `folder.index` files carry section titles and visibility.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! Partitura processes content through two independent stages, connected by
//! a JSON manifest:
//!
//! ```text
//! 1. Scan      abc/      →  manifest.json   (filesystem → structured data)
//! 2. Generate  manifest  →  dist/           (HTML, index pages, navigation)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Debuggability**: the manifest is human-readable JSON you can inspect.
//! - **Incremental builds**: the generate stage skips pages whose inputs
//!   haven't changed.
//! - **Testability**: generation is (mostly) a pure function of the
//!   manifest, so unit tests can exercise rendering without a full source
//!   tree.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1 — walks the source tree, extracts metadata, produces the scan manifest |
//! | [`generate`] | Stage 2 — renders score pages, folder index pages, and the JSON navigation artifacts |
//! | [`abc`] | ABC notation header parsing: tunes, titles, composers, voices |
//! | [`folder_index`] | `folder.index` parsing: section titles, visibility, body text |
//! | [`config`] | `config.toml` loading and validation |
//! | [`types`] | Shared types serialized between stages (`Manifest`, `TreeNode`, `Score`) |
//! | [`naming`] | Directory and file name formatting (`cherubic_hymn` → "Cherubic Hymn") |
//! | [`metadata`] | Text reading (BOM handling) and first-available metadata resolution |
//! | [`cache`] | Content-addressed render cache for incremental builds |
//! | [`output`] | CLI output formatting — tree-based display of pipeline results |
//!
//! # Design Decisions
//!
//! ## Scores Are Rendered in the Browser
//!
//! Score pages embed the raw ABC source in the HTML; an external script
//! turns it into engraved notation client-side. Partitura never interprets
//! the music itself, only the metadata headers (`T:`, `C:`, `V:`) it needs
//! for titles and navigation. That keeps the build fast and the tool
//! independent of any particular renderer.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system, rather than Handlebars or Tera. Advantages:
//!
//! - **Compile-time checking**: malformed HTML is a build error, not a runtime surprise.
//! - **Type-safe**: template variables are Rust expressions — no stringly-typed lookups.
//! - **XSS-safe by default**: all interpolation is auto-escaped, which is
//!   what makes embedding raw ABC source (full of `<`, `>` and quoted
//!   annotations) safe.
//! - **Zero runtime files**: no template directory to ship or get out of sync.
//!
//! ## Hidden Means Hidden From Navigation
//!
//! A folder whose `folder.index` says `showInNavigation: false` is pruned
//! from every navigation artifact, subtree included — but its pages are
//! still generated. Sections under preparation stay reachable by direct
//! URL without appearing in the tree.
//!
//! ## Best-Effort Generation
//!
//! A library maintained by hand accumulates oddities: an unreadable
//! `folder.index`, an `.abc` file deleted between scan and generate. Those
//! degrade to fallbacks or a stderr warning rather than failing the build;
//! only structural problems (missing source root, invalid config) are
//! errors.

pub mod abc;
pub mod cache;
pub mod config;
pub mod folder_index;
pub mod generate;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod scan;
pub mod types;

#[cfg(test)]
pub mod test_helpers;
