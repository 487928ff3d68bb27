//! CLI entry point for the reporting console.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use std::path::{Path, PathBuf};
use tally_console::{
    HttpBackend, HttpConfig, LoadedView, OutputFormat, ReportSession, Side, render, schema,
};
use tally_grid::export_filename;
use tracing::info;

/// CLI-compatible output format enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFormat {
    /// Human-readable table output
    Table,
    /// The visible rows as a JSON array
    Json,
}

impl From<CliFormat> for OutputFormat {
    fn from(cli: CliFormat) -> Self {
        match cli {
            CliFormat::Table => OutputFormat::Table,
            CliFormat::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version,
    about = "Access-gated reporting console for remote entity comparisons",
    long_about = "Compare datasets across two backend entities, or run the fixed\n\
                  physical-inventory-vs-trailer report, with client-side filtering,\n\
                  sorting, column statistics, and CSV export.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  TALLY_API_URL    API base URL (optional, has a default)\n  \
                  TALLY_API_KEY    API key for the hosted application (required)\n  \
                  TALLY_APP_ID     Application id the entities belong to (required)\n\n\
                  EXAMPLES:\n  \
                  # The fixed inventory report, sorted, with statistics\n  \
                  tally inventory --sort trailer_number --stats\n\n  \
                  # Compare two entities on their join fields\n  \
                  tally compare --left Trailer --right ScanLog \\\n      \
                  --left-join trailer_number --right-join scanned_number --all-fields\n\n  \
                  # Export the filtered view as CSV\n  \
                  tally inventory --filter branch=dallas --export"
)]
struct Args {
    /// API base URL (overrides TALLY_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// API key (overrides TALLY_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Application id (overrides TALLY_APP_ID)
    #[arg(long)]
    app_id: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and display the fixed physical-inventory-vs-trailer report
    Inventory {
        #[command(flatten)]
        view: ViewFlags,
    },

    /// Run a two-entity comparison and display the result
    Compare {
        /// Left entity name
        #[arg(long)]
        left: String,

        /// Right entity name
        #[arg(long)]
        right: String,

        /// Join field on the left entity
        #[arg(long)]
        left_join: String,

        /// Join field on the right entity
        #[arg(long)]
        right_join: String,

        /// Display fields from the left entity (comma-separated)
        #[arg(long, value_delimiter = ',')]
        left_fields: Vec<String>,

        /// Display fields from the right entity (comma-separated)
        #[arg(long, value_delimiter = ',')]
        right_fields: Vec<String>,

        /// Discover and select every field on both sides
        #[arg(long, conflicts_with_all = ["left_fields", "right_fields"])]
        all_fields: bool,

        #[command(flatten)]
        view: ViewFlags,
    },

    /// Run the field discovery chain for an entity and print the result
    Fields {
        /// Entity name
        entity: String,
    },
}

/// Flags controlling the rendered view, shared by both report commands.
#[derive(clap::Args, Debug)]
struct ViewFlags {
    /// Column filter as <column>=<substring> (repeatable, ANDed together)
    #[arg(long = "filter", value_name = "COL=SUBSTRING")]
    filters: Vec<String>,

    /// Global substring filter matched against every column
    #[arg(long = "global", value_name = "SUBSTRING")]
    global: Option<String>,

    /// Sort by this column (numeric-aware, nulls last)
    #[arg(long)]
    sort: Option<String>,

    /// Sort descending instead of ascending
    #[arg(long, requires = "sort")]
    desc: bool,

    /// Print per-column statistics below the table
    #[arg(long)]
    stats: bool,

    /// Print at most this many rows
    #[arg(long)]
    limit: Option<usize>,

    /// Write the view as CSV, optionally overriding the filename base
    ///
    /// The file lands in --out-dir as {base}-{date}.csv
    #[arg(long, value_name = "BASE", num_args = 0..=1, default_missing_value = "")]
    export: Option<String>,

    /// Directory for exported CSV files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Output format for the view body
    #[arg(long, value_enum, default_value = "table")]
    format: CliFormat,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load environment variables from .env file before the log filter is
    // built, so a RUST_LOG set there is honored.
    dotenv().ok();

    let json_output = matches!(
        &args.command,
        Command::Inventory { view } | Command::Compare { view, .. }
            if matches!(view.format, CliFormat::Json)
    );
    init_logging(&args.log_level, args.quiet, json_output);

    let backend = build_backend(&args)?;
    let session = ReportSession::new();
    session
        .authorize(&backend)
        .context("Access check failed")?;

    match args.command {
        Command::Inventory { view } => {
            session.load_inventory_report(&backend)?;
            let mut guard = session.inventory_mut();
            let loaded = guard.as_mut().ok_or_else(|| anyhow!("No report loaded"))?;
            present(loaded, &view)
        }
        Command::Compare {
            left,
            right,
            left_join,
            right_join,
            left_fields,
            right_fields,
            all_fields,
            view,
        } => {
            session.set_entity(Side::Left, &left)?;
            session.set_entity(Side::Right, &right)?;
            session.set_join_field(Side::Left, &left_join)?;
            session.set_join_field(Side::Right, &right_join)?;

            if all_fields {
                for side in [Side::Left, Side::Right] {
                    let discovered = session.refresh_fields(&backend, side)?;
                    info!(
                        "Selected all {} {} fields ({})",
                        discovered.fields.len(),
                        side.label(),
                        discovered.source.description()
                    );
                    session.select_all_fields(side);
                }
            } else {
                for field in &left_fields {
                    session.toggle_field(Side::Left, field);
                }
                for field in &right_fields {
                    session.toggle_field(Side::Right, field);
                }
            }

            session.run_comparison(&backend)?;
            let mut guard = session.comparison_mut();
            let loaded = guard.as_mut().ok_or_else(|| anyhow!("No report loaded"))?;
            present(loaded, &view)
        }
        Command::Fields { entity } => {
            schema::ensure_known_entity(&entity)?;
            let discovered = schema::discover_fields(&backend, &entity);
            println!("Fields for {} ({}):", entity, discovered.source.description());
            for field in &discovered.fields {
                println!("  {}", field);
            }
            Ok(())
        }
    }
}

/// Build the HTTP backend from flags and environment.
fn build_backend(args: &Args) -> Result<HttpBackend> {
    let api_key = args
        .api_key
        .clone()
        .or_else(|| std::env::var("TALLY_API_KEY").ok())
        .ok_or_else(|| anyhow!("API key required: pass --api-key or set TALLY_API_KEY"))?;
    let app_id = args
        .app_id
        .clone()
        .or_else(|| std::env::var("TALLY_APP_ID").ok())
        .ok_or_else(|| anyhow!("App id required: pass --app-id or set TALLY_APP_ID"))?;

    let mut config = HttpConfig::builder();
    if let Some(url) = args
        .api_url
        .clone()
        .or_else(|| std::env::var("TALLY_API_URL").ok())
    {
        config = config.base_url(url);
    }

    Ok(HttpBackend::with_config(api_key, app_id, config.build())?)
}

/// Apply the view flags to a loaded report, print it, and run the export.
fn present(loaded: &mut LoadedView, flags: &ViewFlags) -> Result<()> {
    for pair in &flags.filters {
        let (column, substring) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid --filter '{}': expected <column>=<substring>", pair))?;
        loaded.grid.set_column_filter(column, substring);
    }
    if let Some(global) = &flags.global {
        loaded.grid.set_global_filter(global.clone());
    }
    if let Some(column) = &flags.sort {
        loaded.grid.toggle_sort(column);
        if flags.desc {
            loaded.grid.toggle_sort(column);
        }
    }

    render::print_view(loaded, flags.format.into(), flags.limit, flags.stats);

    if let Some(base) = &flags.export {
        let base = if base.is_empty() {
            &loaded.export_base
        } else {
            base
        };
        export_view(loaded, base, &flags.out_dir)?;
    }
    Ok(())
}

/// Write the current view as CSV, skipping the write when there is no data.
fn export_view(loaded: &LoadedView, base: &str, out_dir: &Path) -> Result<()> {
    match loaded.grid.export_csv(&loaded.dataset) {
        Some(csv) => {
            let path = out_dir.join(export_filename(base));
            std::fs::write(&path, csv)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Exported {}", path.display());
            Ok(())
        }
        None => {
            info!("No data to export");
            Ok(())
        }
    }
}
