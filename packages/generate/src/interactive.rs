//! Interactive menu for the generate tool.
//!
//! Lets users pick what to generate, which datasets to skip and an
//! optional config file without memorizing CLI flags.

use std::path::PathBuf;

use dialoguer::{Input, MultiSelect, Select};
use strum::IntoEnumIterator as _;
use subway_access_cli_utils::{IndicatifProgress, MultiProgress};
use subway_access_dataset::DatasetId;

use crate::{RunOptions, RunSummary, Target};

/// Runs the interactive generation menu, starting from `defaults`.
///
/// # Errors
///
/// Returns an error if user input fails or the run cannot start.
pub async fn run(
    multi: &MultiProgress,
    defaults: RunOptions,
) -> Result<RunSummary, Box<dyn std::error::Error>> {
    let labels: Vec<&str> = Target::ALL.iter().map(|t| t.label()).collect();
    let selection = Select::new()
        .with_prompt("What would you like to generate?")
        .items(&labels)
        .default(0)
        .interact()?;
    let target = Target::ALL[selection];

    let datasets: Vec<DatasetId> = DatasetId::iter().collect();
    let dataset_labels: Vec<&str> = datasets.iter().map(AsRef::as_ref).collect();
    let skipped: Vec<bool> = datasets.iter().map(|id| defaults.skip.contains(id)).collect();
    let skip = MultiSelect::new()
        .with_prompt("Datasets to skip (space=toggle, enter=confirm)")
        .items(&dataset_labels)
        .defaults(&skipped)
        .interact()?
        .into_iter()
        .map(|i| datasets[i])
        .collect();

    let config_str: String = Input::new()
        .with_prompt("Pipeline config file (leave empty for defaults)")
        .allow_empty(true)
        .interact_text()?;
    let config = if config_str.trim().is_empty() {
        defaults.config
    } else {
        Some(PathBuf::from(config_str.trim()))
    };

    let options = RunOptions {
        config,
        skip,
        ..defaults
    };
    let progress = IndicatifProgress::steps_bar(multi, "Generating artifacts");
    Ok(options.execute(target, progress).await?)
}
