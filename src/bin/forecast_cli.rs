use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;

use inventory_forecast::{
    config,
    ml::{Horizon, SeasonalTrendForecaster},
    repositories::{FileRecipeStore, FileSalesStore, RecipeStore, SalesStore},
    services::pipeline::{ForecastPipeline, ForecastReport},
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    config::init_tracing(&cli.log_level, false);

    match cli.command {
        Commands::Predict(args) => handle_predict(args, cli.json).await?,
        Commands::Horizon { code } => {
            let horizon = Horizon::parse(&code);
            if cli.json {
                print_json(&serde_json::json!({ "code": code, "days": horizon.days() }))?;
            } else {
                println!("{} -> {} days", code, horizon.days());
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(
    name = "forecast-cli",
    about = "Forecast item sales and ingredient needs from local files",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[arg(long, global = true, default_value = "warn", help = "Log level for diagnostics on stderr")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the forecast pipeline on a sales CSV and a recipe file
    Predict(PredictArgs),
    /// Show how many days a horizon code resolves to
    Horizon { code: String },
}

#[derive(Args)]
struct PredictArgs {
    /// CSV with date, item and qty columns
    #[arg(long, default_value = "data/sales.csv")]
    sales: PathBuf,
    /// JSON array of recipes
    #[arg(long, default_value = "data/recipes.json")]
    recipes: PathBuf,
    /// Horizon code such as 7d, 2m or 1y
    #[arg(long, default_value = "7d")]
    horizon: String,
}

async fn handle_predict(args: PredictArgs, json: bool) -> Result<()> {
    if !args.sales.exists() {
        anyhow::bail!("sales file {} does not exist", args.sales.display());
    }
    let sales_csv = FileSalesStore::new(&args.sales)
        .read_all()
        .await
        .with_context(|| format!("failed to read {}", args.sales.display()))?;
    let recipes = FileRecipeStore::new(&args.recipes)
        .read_all()
        .await
        .with_context(|| format!("failed to read {}", args.recipes.display()))?;

    let pipeline = ForecastPipeline::new(Arc::new(SeasonalTrendForecaster::new()));
    let report = pipeline
        .run_csv(&sales_csv, &recipes, Horizon::parse(&args.horizon))
        .context("forecast failed")?;

    if json {
        print_json(&report)?;
    } else {
        render_report(&report);
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_report(report: &ForecastReport) {
    match report.cutoff {
        Some(cutoff) => println!(
            "Forecast for {} days after {}",
            report.horizon_days, cutoff
        ),
        None => println!("No usable sales history"),
    }

    if report.forecast.is_empty() {
        println!("No items had enough history to forecast.");
        return;
    }

    println!("\nForecasted sales");
    for (date, items) in &report.forecast {
        println!("{date}");
        for (item, qty) in items {
            println!("  - {item:<24} {qty:>8}");
        }
    }

    if !report.inventory.is_empty() {
        println!("\nIngredients needed");
        for (date, ingredients) in &report.inventory {
            println!("{date}");
            for (ingredient, amount) in ingredients {
                println!("  - {ingredient:<24} {amount:>10.3}");
            }
        }
    }

    println!("\nTotals");
    for (item, total) in &report.item_totals {
        println!("  - {item:<24} {total:>8}");
    }
    for (ingredient, total) in &report.ingredient_totals {
        println!("  - {ingredient:<24} {total:>10.3}");
    }
}
