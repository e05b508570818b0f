// Licensed under the Apache-2.0 license

use clap::Parser;
use hdlregs::Cli;
use log::{error, LevelFilter};
use simple_logger::SimpleLogger;

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("failed to initialize logging: {e}");
    }

    if let Err(e) = hdlregs::run(&cli) {
        error!("{e:#}");
        std::process::exit(1);
    }
}
