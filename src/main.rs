//! # SPP Catalogue CLI (`spp`)
//!
//! The `spp` binary loads the scraped DFG priority-programme data, joins it
//! into the catalogue and exposes it for inspection, export and preview.
//!
//! ## Usage
//!
//! ```bash
//! spp --config ./config/spp.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `spp sources` | Check that every input file is present |
//! | `spp stats` | Print catalogue statistics |
//! | `spp programs` | List programmes |
//! | `spp get <slug>` | Show one programme with its summary and projects |
//! | `spp search "<query>"` | Filter, sort and page through projects |
//! | `spp export` | Write all projects as JSON |
//! | `spp render <slug>` | Write one page of HTML project cards |
//! | `spp serve` | Start the preview HTTP server |
//!
//! ## Examples
//!
//! ```bash
//! # Projects mentioning both terms, best combined score first
//! spp search "soft robotics" --score 1
//!
//! # Second page of the AI focus list, alphabetically by investigator
//! spp search --focus ai --sort pi --page 2
//!
//! # Data for the static site
//! spp export --output site/public/projects.json
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use spp_catalog::{config, export, get, search, server, sources, stats};

/// SPP Catalogue CLI: browse DFG priority programmes and their projects.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/spp.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "spp",
    about = "SPP Catalogue: browse DFG priority programmes and their funded projects",
    version,
    long_about = "Joins scraped programme summaries, programme details, scored project rows \
    and raw project pages into one catalogue, and exposes it through search, JSON/HTML export \
    and a local preview server."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/spp.toml`. Data paths, the relevance threshold,
    /// the site base URL and the server bind address are read from this file.
    #[arg(long, global = true, default_value = "./config/spp.toml")]
    config: PathBuf,

    /// Log at debug level (overridden by `RUST_LOG`).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Check the configured input files.
    ///
    /// Prints whether each input exists and how many raw project files
    /// match the configured glob. Works without a config file.
    Sources,

    /// Print catalogue statistics.
    Stats,

    /// List all programmes.
    Programs,

    /// Show a programme.
    ///
    /// Prints metadata, the generated Markdown summary (if any) and the
    /// programme's projects with their relevance scores.
    Get {
        /// Programme slug (`spp-2433`) or number (`SPP 2433`).
        program: String,
    },

    /// Filter, sort and page through projects.
    Search {
        /// Free-text query; every word must match title, investigators or keywords.
        query: Option<String>,

        /// Minimum combined score.
        #[arg(long, default_value_t = 0.0)]
        score: f64,

        /// Sort order: `score`, `title`, or `pi`.
        #[arg(long, default_value = "score")]
        sort: String,

        /// Restrict to one programme (slug or number).
        #[arg(long)]
        spp: Option<String>,

        /// Page number (25 projects per page).
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Search only the `ai` or `wearables` focus list.
        #[arg(long)]
        focus: Option<String>,
    },

    /// Export all projects as JSON for the client-side filter.
    Export {
        /// Output file path. If omitted, writes to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Render one page of HTML project cards.
    Render {
        /// Programme slug or number. Not needed with `--focus`.
        program: Option<String>,

        /// Render the `ai` or `wearables` focus list instead.
        #[arg(long)]
        focus: Option<String>,

        /// Page number.
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Output file path. If omitted, writes to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Start the preview HTTP server.
    ///
    /// Binds to `[server].bind` and serves the catalogue as JSON and HTML
    /// fragments.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    // Commands that work without a config file
    if let Commands::Sources = cli.command {
        let cfg = config::load_config(&cli.config).unwrap_or_else(|_| config::Config::minimal());
        sources::list_sources(&cfg)?;
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Sources => {
            // Handled above (before config loading)
            unreachable!()
        }
        Commands::Stats => {
            stats::run_stats(&cfg)?;
        }
        Commands::Programs => {
            get::run_programs(&cfg)?;
        }
        Commands::Get { program } => {
            get::run_get(&cfg, &program)?;
        }
        Commands::Search {
            query,
            score,
            sort,
            spp,
            page,
            focus,
        } => {
            search::run_search(
                &cfg,
                search::SearchArgs {
                    query,
                    score,
                    sort,
                    spp,
                    page,
                    focus,
                },
            )?;
        }
        Commands::Export { output } => {
            export::run_export(&cfg, output.as_deref())?;
        }
        Commands::Render {
            program,
            focus,
            page,
            output,
        } => {
            export::run_render(
                &cfg,
                program.as_deref(),
                focus.as_deref(),
                page,
                output.as_deref(),
            )?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
