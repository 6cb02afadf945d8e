// SPDX-License-Identifier: MIT OR Apache-2.0

mod cli;
mod commands;
mod logger;

use clap::Parser;

fn main() {
    logger::setup_logger();

    let cli = cli::Cli::parse();
    if let Err(e) = commands::run(cli.command) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
