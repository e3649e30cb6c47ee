use clap::{Parser, Subcommand};
use partitura::{config, generate, output, scan};
use std::path::PathBuf;

/// Shared flags for commands that write pages.
#[derive(clap::Args, Clone)]
struct CacheArgs {
    /// Disable the render cache — force rewriting of all pages
    #[arg(long)]
    no_cache: bool,
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "partitura")]
#[command(about = "Static site generator for ABC notation score libraries")]
#[command(long_about = "\
Static site generator for ABC notation score libraries

Your filesystem is the data source. Directories become sections, .abc files
become score pages, and folder.index files carry section metadata.

Source structure:

  abc/
  ├── config.toml                  # Site config (optional)
  ├── folder.index                 # Root section title and description
  ├── vespers/
  │   ├── folder.index             # \"# Вечерня\"
  │   └── psalm_103.abc
  ├── liturgy/
  │   ├── folder.index
  │   └── cherubic_hymn/
  │       ├── folder.index
  │       ├── cherubic-ancient.abc
  │       └── cherubic-bortniansky.abc
  └── hours/                       # folder.index: showInNavigation: false
      └── first_hour.abc           # generated, but absent from navigation

Metadata resolution (first available wins):
  Score title:  first tune's T: header → file name (our_father.abc → \"Our Father\")
  Composer:     first tune's C: header
  Folder title: folder.index # heading → directory name

Output: one HTML page per score, index.md per folder, plus full-tree.json,
navigation.json, filelist.json, and metadata.json for the client-side
score browser.

Run 'partitura gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Source directory of .abc files
    #[arg(long, default_value = "abc", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".partitura-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the source directory into a manifest
    Scan,
    /// Produce the site from a previously scanned manifest
    Generate(CacheArgs),
    /// Run the full pipeline: scan → generate
    Build(CacheArgs),
    /// Validate the source directory without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest);
        }
        Command::Generate(cache_args) => {
            let manifest_path = cli.temp_dir.join("manifest.json");
            let manifest = generate::load_manifest(&manifest_path)?;
            let report = generate::generate(
                &manifest,
                &cli.source,
                &cli.output,
                !cache_args.no_cache,
            )?;
            output::print_generate_output(&manifest, &report);
        }
        Command::Build(cache_args) => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest);

            println!("==> Stage 2: Generating site → {}", cli.output.display());
            let report = generate::generate(
                &manifest,
                &cli.source,
                &cli.output,
                !cache_args.no_cache,
            )?;
            output::print_generate_output(&manifest, &report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Write the scan manifest into the temp directory for the generate stage.
fn write_manifest(
    manifest: &partitura::types::Manifest,
    temp_dir: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(temp_dir)?;
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(temp_dir.join("manifest.json"), json)?;
    Ok(())
}
