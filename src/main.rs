use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use segy_features::batch::{self, BatchOptions, Progress};

/// Walk a directory of SEG-Y surveys and write one feature table per file.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Directory searched recursively for survey files
    root: PathBuf,

    /// Where `seismic_features_<key>.csv` tables are written
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Extension (without the dot) that marks a survey file
    #[arg(long, default_value = "sgy")]
    extension: String,

    /// Also write a JSON report of every success and failure
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating output directory {}", args.out_dir.display()))?;

    let options = BatchOptions {
        out_dir: args.out_dir,
        extension: args.extension,
    };

    let report = batch::run(&args.root, &options, |progress| match progress {
        Progress::Saved(outcome) => println!("Features saved for {}.", outcome.output_key),
        Progress::Failed(failure) => eprintln!("{failure}"),
    })
    .with_context(|| format!("scanning {}", args.root.display()))?;

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report).context("serializing batch report")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing report {}", path.display()))?;
    }

    println!(
        "{} file(s) extracted, {} failed",
        report.succeeded.len(),
        report.failed.len()
    );

    Ok(if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
