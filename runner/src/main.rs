//! Command-line front end of the scheduling simulator.
//!
//! Takes one positional argument, the configuration file path, and exits 0
//! on normal completion or 1 on a missing/invalid argument or an unreadable
//! or invalid configuration. Diagnostics go to standard error (including
//! `RUST_LOG`-enabled logging) so the in-place status table on standard
//! output stays intact.

use std::path::Path;
use std::process::exit;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Arg, Command};
use scheduler::{Clock, Coordinator};

mod config_file;
mod display;
mod stats;

fn main() {
    env_logger::init();

    let command = Command::new("scheduler-sim")
        .about("Multi-core CPU scheduling simulator")
        .arg(
            Arg::new("config")
                .value_name("FILE")
                .help("Path to the simulation configuration file")
                .required(true),
        );

    let matches = match command.try_get_matches() {
        Ok(matches) => matches,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return;
        }
        Err(err) => {
            let _ = err.print();
            exit(1);
        }
    };

    let path = matches
        .get_one::<String>("config")
        .expect("`config` is required");

    if let Err(err) = run(Path::new(path)) {
        eprintln!("error: {err:#}");
        exit(1);
    }
}

fn run(path: &Path) -> Result<()> {
    let config = config_file::load(path)?;
    log::info!(
        "loaded {}: {} cores, {} algorithm, {} processes",
        path.display(),
        config.cores,
        config.algorithm.name(),
        config.processes.len()
    );

    let mut coordinator = Coordinator::new(&config, Clock::start());
    let mut screen = display::Screen::new();
    let report = coordinator.run(&mut screen);

    stats::print_summary(&report);
    Ok(())
}
