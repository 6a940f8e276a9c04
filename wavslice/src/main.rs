mod cli;

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::info;
use wavslice_core::{
    run_with_progress, Config, ProgressEvent, DEFAULT_SEGMENT_LENGTH, DEFAULT_WORKERS,
};

use crate::cli::build_cli;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = build_cli().get_matches();

    let input_folder = matches
        .get_one::<PathBuf>("input_folder")
        .expect("required argument");
    if !input_folder.is_dir() {
        return Err(anyhow!(
            "input folder does not exist: {}",
            input_folder.display()
        ));
    }
    let output_folder = matches
        .get_one::<PathBuf>("output_folder")
        .expect("defaulted argument");

    let segment_length =
        NonZeroUsize::new(DEFAULT_SEGMENT_LENGTH).context("segment length must be non-zero")?;
    let workers = NonZeroUsize::new(DEFAULT_WORKERS).context("worker count must be non-zero")?;

    let config = Config::builder(input_folder, output_folder)
        .segment_length(segment_length)
        .workers(workers)
        .build()
        .with_context(|| {
            format!(
                "failed to create configuration for '{}'",
                input_folder.display()
            )
        })?;

    let progress = ProgressBar::new(0);
    progress.set_draw_target(ProgressDrawTarget::stderr());
    let bar_style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(bar_style);
    progress.set_message("Processing files");

    let progress_handle = progress.clone();
    let result = run_with_progress(config, move |event| match event {
        ProgressEvent::Start { total_files } => {
            progress_handle.set_length(total_files as u64);
            progress_handle.enable_steady_tick(Duration::from_millis(100));
        }
        ProgressEvent::FileFinished { .. } => {
            progress_handle.inc(1);
        }
        ProgressEvent::Finish { .. } => {
            progress_handle.set_message("Completed");
        }
    })
    .with_context(|| format!("failed to slice '{}'", input_folder.display()));

    progress.finish_and_clear();

    let summary = result?;
    info!(
        "done: {} sliced, {} skipped, {} failed; segments written to '{}'",
        summary.sliced,
        summary.skipped,
        summary.failed,
        output_folder.display()
    );

    Ok(())
}
