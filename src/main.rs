use clap::{Parser, Subcommand};
use nano_ink::config::{self, SiteConfig};
use nano_ink::prefs::{JsonFileStore, UiPreferences};
use nano_ink::search::SearchIndex;
use nano_ink::server::{self, AppState};
use nano_ink::{generate, output, scan};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("NANO_INK_RELEASE");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("NANO_INK_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "nano-ink")]
#[command(about = "Markdown knowledge base: static site builder and server")]
#[command(long_about = "\
Markdown knowledge base: static site builder and server

A directory of markdown notes becomes a browsable site with a collapsible
folder sidebar, a table of contents per note and a search modal.

Content structure:

  docs/
  ├── config.toml                  # Site config (optional)
  ├── manifest.json                # Hand-authored tree (optional, wins over scanning)
  ├── images/                      # Copied to the output, referenced as ../images/x.png
  ├── Welcome.md                   # Top-level note → /docs/Welcome/
  └── DSA/                         # Folder → sidebar folder and home page card
      ├── README.md                # Served at /docs/DSA/ as well
      └── Arrays.md                # → /docs/DSA/Arrays/

Hidden directories and node_modules, src, assets, .next, images are never
scanned for notes. Folders without notes are dropped.

Run 'nano-ink gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Docs directory
    #[arg(long, default_value = "docs", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// JSON file holding UI preferences (theme, sidebar width, collapsed folders)
    #[arg(long, global = true)]
    prefs: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the docs directory and print the note tree
    Scan {
        /// Print the manifest as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Render the whole site into the output directory
    Build,
    /// Serve pages over HTTP, rendered on request
    Serve {
        /// Override server.host
        #[arg(long)]
        host: Option<String>,
        /// Override server.port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Validate config and notes without writing anything
    Check,
    /// Search note names and paths
    Search {
        query: String,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Scan { json } => {
            let manifest = scan::scan(&cli.source)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&manifest)?);
            } else {
                output::print_scan_output(&manifest, &cli.source);
            }
        }
        Command::Build => {
            let config = config::load_config(&cli.source)?;
            println!("==> Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            init_thread_pool(&config.processing);
            let prefs = load_prefs(cli.prefs.as_deref(), &config)?;

            println!("==> Generating HTML → {}", cli.output.display());
            let result = generate::generate(&cli.source, &manifest, &config, &prefs, &cli.output)?;
            output::print_build_output(&result);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Serve { host, port } => {
            let mut config = config::load_config(&cli.source)?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let manifest = scan::scan(&cli.source)?;
            let prefs = load_prefs(cli.prefs.as_deref(), &config)?;
            let state = Arc::new(AppState::new(&cli.source, manifest, config, prefs)?);

            println!(
                "==> Serving {} on http://{}:{}",
                cli.source.display(),
                state.config.server.host,
                state.config.server.port
            );
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(server::serve(state))?;
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let config = config::load_config(&cli.source)?;
            let manifest = scan::scan(&cli.source)?;
            init_thread_pool(&config.processing);
            let report = generate::check(&cli.source, &manifest, &config)?;
            output::print_check_output(&report);
            if !report.is_ok() {
                return Err("content has problems".into());
            }
            println!("==> Content is valid");
        }
        Command::Search { query } => {
            let config = config::load_config(&cli.source)?;
            let manifest = scan::scan(&cli.source)?;
            let index = SearchIndex::new(&manifest, config.search.max_results);
            output::print_search_output(&query, &index.query(&query));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr, filtered by `RUST_LOG` (default: warnings,
/// plus request logs from the server).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,nano_ink=info,tower_http=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Size the global rayon pool from `processing.max_processes`.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// Stored preferences when `--prefs` is given, defaults otherwise.
fn load_prefs(path: Option<&Path>, config: &SiteConfig) -> Result<UiPreferences, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let store = JsonFileStore::open(path)?;
            Ok(UiPreferences::load(&store, &config.sidebar))
        }
        None => Ok(UiPreferences::defaults(&config.sidebar)),
    }
}
