use clap::{Parser, Subcommand};
use patternbook::store::CatalogStore;
use patternbook::{config, generate, output, scan};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const MANIFEST_FILE: &str = "manifest.json";

#[derive(Parser)]
#[command(name = "patternbook")]
#[command(about = "Static site generator for pattern libraries")]
#[command(long_about = "\
Static site generator for pattern libraries

Patterns are markdown pages with YAML front matter. Filters, filter groups,
authors and the team are YAML data files. The output is a filterable HTML
catalog with a page per pattern and author, a search index and a sitemap.

Site structure:

  site/
  ├── config.toml                  # Site config (optional)
  ├── 010-about.md                 # Page (numbered = shown in nav)
  ├── 020-github.md                # Link page (URL-only .md → external nav link)
  ├── data/
  │   ├── filters.yml              # - { key, value, label, color, checked }
  │   ├── filter-groups.yml        # - { key, label }
  │   ├── authors.yml              # - { id, name, title, image, links }
  │   └── team.yml                 # same shape as authors.yml
  ├── pattern/
  │   ├── sidecar/index.md         # Pattern with its own directory
  │   ├── sidecar/diagram.svg      # Embedded with: !!! @/pattern/sidecar/diagram.svg
  │   └── log-router.md            # Flat pattern
  └── public/                      # Copied verbatim to the output root

Pattern front matter keys: title, description, image, filterDimensions,
authors, date. Matching is AND across filter groups, OR within a group.

Set RUST_LOG=debug for diagnostics. Run 'patternbook gen-config' to generate
a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site source directory
    #[arg(long, default_value = "site", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".patternbook-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the site source into a manifest
    Scan,
    /// Produce the HTML site from the manifest
    Generate,
    /// Run the full pipeline: scan → generate
    Build,
    /// Validate the site and list unresolved filter and author references
    Check,
    /// List the patterns matching a filter selection or written by an author
    Query {
        /// Check a filter before matching, as key:value (repeatable)
        #[arg(long = "filter", value_name = "KEY:VALUE")]
        filters: Vec<String>,

        /// List an author's patterns instead
        #[arg(long, conflicts_with = "filters")]
        author: Option<String>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);
        }
        Command::Generate => {
            let manifest_path = cli.temp_dir.join(MANIFEST_FILE);
            let report = generate::generate(&manifest_path, &cli.source, &cli.output)?;
            output::print_generate_output(&report);
        }
        Command::Build => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            let report = generate::generate_site(&manifest, &cli.source, &cli.output)?;
            output::print_generate_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            let store = CatalogStore::new(manifest.content(), manifest.data.clone());
            let unresolved = store.unresolved_references();
            output::print_check_output(&manifest, &unresolved);
            println!("==> Content is valid");
        }
        Command::Query { filters, author } => {
            let manifest = scan::scan(&cli.source)?;
            let mut store = CatalogStore::new(manifest.content(), manifest.data.clone());
            let total = store.content().len();

            if let Some(author_id) = author {
                let Some(found) = store.find_author(&author_id) else {
                    return Err(format!("unknown author {author_id}").into());
                };
                let selection = format!("Author: {} ({})", found.name, found.id);
                let by_author = store.labelled_content_by_author();
                let items = by_author.get(author_id.as_str()).cloned().unwrap_or_default();
                output::print_query_output(&selection, &items, total);
            } else {
                if !filters.is_empty() {
                    store.reset_all_filters();
                }
                for arg in &filters {
                    let (key, value) = parse_filter_arg(arg)?;
                    if !store.set_checked(key, value, true) {
                        return Err(format!("unknown filter {key}:{value}").into());
                    }
                }
                let selection = output::filter_selection(&store.checked_filters());
                let items = store.labelled_filtered_content();
                output::print_query_output(&selection, &items, total);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr so stdout stays clean for command output.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn write_manifest(
    manifest: &patternbook::types::Manifest,
    temp_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(temp_dir)?;
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(temp_dir.join(MANIFEST_FILE), json)?;
    Ok(())
}

/// Split a `key:value` argument at the first colon.
fn parse_filter_arg(arg: &str) -> Result<(&str, &str), String> {
    match arg.split_once(':') {
        Some((key, value)) if !key.is_empty() && !value.is_empty() => Ok((key, value)),
        _ => Err(format!("invalid filter '{arg}', expected key:value")),
    }
}
