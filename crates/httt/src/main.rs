//! Hydro Thunder Time Tool - read and write high scores and split times on a
//! Hydro Thunder arcade drive
//!
//! Usage: httt [-r <drive>] [-w <drive>] [--write-raw <file>] [-t <csv>] [-s <csv>]

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser as ClapParser};
use httt::common::{DiagnosticReporter, HtError};
use httt::{Boat, ChecksumOptions, ChecksumWindow, Job, Pipeline, RunConfig, Track};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(ClapParser, Debug)]
#[command(name = "httt")]
#[command(author = "HTTT Team")]
#[command(version)]
#[command(about = "Reads and writes track times, split times and settings on a Hydro Thunder arcade drive", long_about = None)]
struct Args {
    /// Drive or image to read from
    #[arg(short, long)]
    read: Option<PathBuf>,

    /// Write data to this drive or image
    #[arg(short, long)]
    write: Option<PathBuf>,

    /// Write a raw data block to this file instead of at the end of a drive
    #[arg(long)]
    write_raw: Option<PathBuf>,

    /// High score times table (exported when reading, imported when writing)
    #[arg(short, long)]
    times: Option<PathBuf>,

    /// Best checkpoint split times table (exported when reading, imported when writing)
    #[arg(short, long)]
    splits: Option<PathBuf>,

    /// Which data block to use
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    block: u8,

    /// Fine tune the checksum LSB, which can vary slightly between machines
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    lsb_offset: i64,

    /// Checksum the legacy window (starts after the header, runs past the block)
    #[arg(long)]
    legacy_window: bool,

    /// List boat names in the game's stored order
    #[arg(short, long)]
    boats: bool,

    /// List track names in the game's stored order
    #[arg(short, long)]
    map_names: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn job(&self) -> Job {
        Job {
            read: self.read.clone(),
            write: self.write.clone(),
            write_raw: self.write_raw.clone(),
            times: self.times.clone(),
            splits: self.splits.clone(),
        }
    }

    fn config(&self) -> RunConfig {
        RunConfig {
            variant: usize::from(self.block),
            checksum: ChecksumOptions {
                lsb_offset: self.lsb_offset,
                window: if self.legacy_window {
                    ChecksumWindow::Legacy
                } else {
                    ChecksumWindow::Block
                },
            },
            ..Default::default()
        }
    }
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    if args.boats {
        for boat in Boat::ALL {
            println!("{boat}");
        }
        return;
    }

    if args.map_names {
        for track in Track::ALL {
            println!("{track}");
        }
        return;
    }

    if args.read.is_none() && args.write.is_none() {
        let message = if args.write_raw.is_some() {
            "--write-raw needs a drive to copy from: set --read or --write"
        } else {
            "need at least one of --read, --write or --write-raw"
        };
        let err = Args::command().error(ErrorKind::MissingRequiredArgument, message);
        eprintln!("{err}");
        process::exit(1);
    }

    if let Err(e) = run(&args) {
        report(&e);
        process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let pipeline = Pipeline::new(args.config());
    let summary = pipeline.run(&args.job()).context("run failed")?;

    for (target, report) in [
        ("drive", summary.drive_checksum),
        ("raw block", summary.raw_checksum),
    ] {
        if let Some(report) = report {
            info!(
                "Checksum for {target}: found [{}], wrote [{}]",
                report.found_hex(),
                report.written_hex()
            );
        }
    }

    Ok(())
}

/// Print `error`, rendering table import errors against the offending file
fn report(error: &anyhow::Error) {
    if let Some(table_error @ HtError::Table { file, .. }) = error.downcast_ref::<HtError>() {
        if let Ok(source) = fs::read_to_string(file) {
            let mut reporter = DiagnosticReporter::new();
            let file_id = reporter.add_file(file.display().to_string(), source);
            reporter.report_error(file_id, table_error);
            return;
        }
    }
    eprintln!("error: {error:#}");
}
