#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the subway accessibility artifact generator.

use std::io::IsTerminal as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use subway_access_cli_utils::IndicatifProgress;
use subway_access_dataset::{DatasetId, paths, registry::all_datasets};
use subway_access_generate::{RunOptions, Target, interactive};

#[derive(Parser)]
#[command(
    name = "subway_access_generate",
    about = "Builds the subway accessibility map's GIS artifacts"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Pipeline config TOML (defaults to the bundled parameters)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the downloaded datasets (overrides `DATASETS_DIR`)
    #[arg(long, global = true)]
    datasets_dir: Option<PathBuf>,

    /// Directory the artifacts are written to (overrides `OUTPUT_DIR`)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Comma-separated dataset ids to skip
    #[arg(long, global = true, env = "SKIP_DATASETS")]
    skip: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate every artifact
    Run,
    /// Generate the projects and stations artifacts
    Stations,
    /// Generate stations, then score neighborhoods
    Neighborhoods,
    /// Generate borough boundaries and centres
    Boroughs,
    /// Generate the elevator and escalator inventory
    Equipment,
    /// Generate the coloured subway lines
    Lines,
    /// List the dataset registry
    Datasets,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // `.env.local` is optional.
    dotenvy::from_path(paths::env_file()).ok();
    let multi = subway_access_cli_utils::init_logger();
    let cli = Cli::parse();

    let options = RunOptions {
        config: cli.config,
        datasets_dir: cli.datasets_dir,
        output_dir: cli.output_dir,
        skip: cli
            .skip
            .as_deref()
            .map(DatasetId::parse_list)
            .transpose()?
            .unwrap_or_default(),
    };

    let target = match cli.command {
        None if std::io::stdin().is_terminal() => {
            let summary = interactive::run(&multi, options).await?;
            return finish(summary.failed.len());
        }
        None | Some(Commands::Run) => Target::All,
        Some(Commands::Stations) => Target::Stations,
        Some(Commands::Neighborhoods) => Target::Neighborhoods,
        Some(Commands::Boroughs) => Target::Boroughs,
        Some(Commands::Equipment) => Target::Equipment,
        Some(Commands::Lines) => Target::Lines,
        Some(Commands::Datasets) => {
            println!("{:<40} {:<8} {:<14} URL", "ID", "TYPE", "SOURCE");
            println!("{}", "-".repeat(100));
            for dataset in all_datasets() {
                println!(
                    "{:<40} {:<8} {:<14} {}",
                    dataset.id,
                    dataset.dataset_type,
                    dataset.source,
                    dataset.url.as_deref().unwrap_or("(manual)")
                );
            }
            return Ok(());
        }
    };

    let progress = IndicatifProgress::steps_bar(&multi, "Generating artifacts");
    let summary = options.execute(target, progress).await?;
    finish(summary.failed.len())
}

fn finish(failed: usize) -> Result<(), Box<dyn std::error::Error>> {
    if failed > 0 {
        return Err(format!("{failed} artifact group(s) failed").into());
    }
    Ok(())
}
