#![cfg_attr(not(test), deny(clippy::unwrap_used))]

mod cli;
mod logging;

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use rsfault::config::Mode;
use rsfault::report::Report;
use tracing::debug;

use crate::cli::{Cli, CliError};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = cli.run_config();
    debug!(?config, "starting");

    if config.mode == Mode::FaultModel {
        eprint!("{}", config.distribution.summary());
    }

    // Fully computed before the output is opened so a failed run leaves no partial file.
    let report = rsfault::runner::run(&config)?;
    write_report(&report, &cli.csv_out)
}

fn write_report(report: &Report, target: &Path) -> Result<(), CliError> {
    let written = if target == Path::new("-") {
        report.write_csv(io::stdout().lock())
    } else {
        File::create(target).and_then(|file| report.write_csv(BufWriter::new(file)))
    };

    written.map_err(|source| CliError::Write {
        path: target.to_owned(),
        source,
    })
}
