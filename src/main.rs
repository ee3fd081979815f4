use analytics::DashboardContext;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table as TerminalTable};
use configuration::DashboardPaths;
use core_types::FilterSet;
use std::net::SocketAddr;
use web_server::AppState;

/// The entry point for the dashboard service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment and flags still apply.
    dotenvy::dotenv().ok();
    let _log_guard = configuration::init_tracing()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => web_server::run_server(args.addr, &args.paths).await,
        Commands::Check(args) => handle_check(&args.paths),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A config-driven metrics dashboard over a single CSV file.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard page and its JSON API.
    Serve(ServeArgs),
    /// Load the config and data, then print the unfiltered results.
    Check(CheckArgs),
}

#[derive(Parser)]
struct ServeArgs {
    #[command(flatten)]
    paths: DashboardPaths,

    /// The address to listen on.
    #[arg(long, env = "DASHBOARD_ADDR", default_value = "0.0.0.0:8509")]
    addr: SocketAddr,
}

#[derive(Parser)]
struct CheckArgs {
    #[command(flatten)]
    paths: DashboardPaths,
}

// ==============================================================================
// Check Command Logic
// ==============================================================================

/// Validates the config and data the same way `serve` does, then prints every
/// metric and chart computed over the whole table.
fn handle_check(paths: &DashboardPaths) -> anyhow::Result<()> {
    let state = AppState::load(paths)?;
    let context = &state.context;

    println!(
        "Loaded {} rows x {} columns from {}",
        context.table().len(),
        context.table().columns().len(),
        paths.data_path_for(context.config()).display()
    );
    println!("{}", metrics_table(context));
    println!("{}", charts_table(context));
    Ok(())
}

fn metrics_table(context: &DashboardContext) -> TerminalTable {
    let mut table = TerminalTable::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Metric", "Label", "Aggregation", "Value"]);

    let filters = FilterSet::default();
    for (definition, result) in context.config().metrics.iter().zip(context.metrics(&filters)) {
        table.add_row(vec![
            result.id,
            result.label,
            definition.aggregation.as_str().to_string(),
            result.formatted,
        ]);
    }
    table
}

fn charts_table(context: &DashboardContext) -> TerminalTable {
    let mut table = TerminalTable::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Chart", "Type", "x", "y", "Points"]);

    let filters = FilterSet::default();
    for definition in &context.config().charts {
        let points = context
            .chart(&definition.id, &filters)
            .map_or(0, |chart| chart.points.len());
        if points == 0 {
            tracing::warn!(chart = %definition.id, "Chart has no points over the full table.");
        }
        table.add_row(vec![
            definition.id.clone(),
            definition.kind().to_string(),
            definition.x.clone(),
            definition.y.clone(),
            points.to_string(),
        ]);
    }
    table
}
