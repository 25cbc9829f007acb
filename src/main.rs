//! Test data generator for Black Relay. Builds one randomized environment
//! sensor reading and publishes it at QoS 1 to the broker and topic given on
//! the command line, then exits.
//!
//! ```text
//! sensorpub --broker mqtt://localhost:1883 --topic environment_sensor
//! sensorpub -b mqtts://secure-broker.com:8883 -t data/environment --pretty
//! ```
//!
//! Set `RUST_LOG=debug` to see the mqtt event loop traffic.

#[macro_use]
extern crate log;

use std::process;

use clap::Parser;
use colored::Colorize;

mod broker;
mod cli;
mod common;
mod gendata;
mod publisher;

use cli::{Cli, RunnerConfig};
use common::Error;

fn main() {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let result = RunnerConfig::try_from(cli).and_then(publisher::start);
    if let Err(e) = result {
        report(&e);
        process::exit(1);
    }
}

fn report(e: &Error) {
    eprintln!("{} {}", "✗ Error:".red().bold(), e);
    if let Some(hint) = e.hint() {
        eprintln!("  {}", hint);
    }
}
