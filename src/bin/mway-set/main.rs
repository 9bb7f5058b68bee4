//! `mway-set`: reads `i <key>` / `d <key>` commands from stdin, applies them to an ordered set
//! and prints the set after every successful command.

mod driver;
mod error;
mod logging;
mod scanner;

use std::io;
use std::process::ExitCode;

use clap::Parser;

use crate::driver::Driver;
use crate::error::DriverError;

#[derive(Debug, Parser)]
#[command(version, about = "Insert/delete integer keys in an ordered set, one command per line")]
struct Cli {
    /// Log filter directive for diagnostics written to stderr (e.g. `debug`, `mway_set=trace`).
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = logging::init_logging(&cli.log_level) {
        eprintln!("{err}");
        return ExitCode::from(2);
    }

    let mut driver = Driver::new(io::stdout().lock(), io::stderr().lock());
    match driver.run(io::stdin().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(DriverError::Io(err)) => {
            tracing::error!(%err, "I/O failure, stopping");
            ExitCode::FAILURE
        }
        // The diagnostic line has already been written by the driver.
        Err(_) => ExitCode::FAILURE,
    }
}
