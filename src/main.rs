use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tour_planner::catalog::Catalog;
use tour_planner::planner::{plan_tour, TourPlan};

#[derive(Parser, Debug)]
#[command(name = "tour-planner")]
#[command(about = "Plan a greedy round-the-world tour from a source city.", long_about = None)]
struct Cli {
    /// Path to the cities JSON dataset
    #[arg(short, long, default_value = "data/cities.json")]
    cities: PathBuf,

    /// Source city code (e.g. BOM). Prompts interactively if omitted.
    source: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let catalog = Catalog::from_json_file(&cli.cities)
        .with_context(|| format!("failed to load cities from {}", cli.cities.display()))?;
    let grouping = catalog.continent_grouping();

    let source = match cli.source {
        Some(source) => source,
        None => prompt("Enter the city to travel from: ")?,
    };
    // Catalog keys are upper-case city codes.
    let source = source.trim().to_uppercase();

    // A failed plan is reported as an empty zero-distance tour, not an abort.
    let plan = match plan_tour(&source, &catalog, &grouping) {
        Ok(plan) => plan,
        Err(err) => {
            tracing::error!("failed to find the shortest path: {err}");
            TourPlan {
                total_distance_km: 0,
                stops: Vec::new(),
            }
        }
    };

    println!("Cities in order to travel:");
    for stop in &plan.stops {
        println!("  {}  {} ({})", stop.id, stop.name, stop.continent_id);
    }
    println!("Total distance to be travelled: {} KMs", plan.total_distance_km);

    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}
