use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use inventory_forecast::openapi::ApiDocV1;
use utoipa::OpenApi;

/// Print the OpenAPI document, or write it to a file
#[derive(Parser)]
#[command(name = "openapi-export", version)]
struct Cli {
    /// Destination file; stdout when omitted
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let json = serde_json::to_string_pretty(&ApiDocV1::openapi())?;

    match cli.output {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir)
                    .with_context(|| format!("failed to create {}", dir.display()))?;
            }
            fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("OpenAPI document written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
