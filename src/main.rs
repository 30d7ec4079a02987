//! Entry point: wires CLI → command dispatch → Node.js bridge.
//!
//! Everything below `main` returns errors instead of exiting; `main` is
//! the single place where a failure is printed and turned into exit
//! status 1.

mod backend;
mod batch;
mod bridge;
mod cli;
mod commands;
mod error;
mod options;
mod render;
mod theme;

#[cfg(test)]
mod test_utils;

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;

use crate::bridge::NodeBridge;
use crate::cli::Cli;

const EXIT_OK: u8 = 0;
const EXIT_FAILURE: u8 = 1;

fn main() -> ExitCode {
    // Install color_eyre error/panic hooks for pretty backtraces.
    if let Err(err) = color_eyre::install() {
        return ExitCode::from(report(Err(err), &mut io::stderr()));
    }

    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(clap_status(&err));
        }
    };

    ExitCode::from(report(run(cli), &mut io::stderr()))
}

fn run(cli: Cli) -> color_eyre::Result<()> {
    let backend = NodeBridge::new(cli.node, cli.module_dir);

    // One thread is enough: all concurrency is child processes.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(commands::run(
        cli.command,
        &backend,
        &mut io::stdout(),
        &mut io::stderr(),
    ))
}

/// Prints a failure as `Error: <message>` and maps the outcome to an
/// exit status.
fn report(result: color_eyre::Result<()>, stderr: &mut impl Write) -> u8 {
    match result {
        Ok(()) => EXIT_OK,
        Err(err) => {
            let _ = writeln!(stderr, "Error: {err:#}");
            EXIT_FAILURE
        }
    }
}

/// Help and version requests succeed; every other clap error is a failure.
fn clap_status(err: &clap::Error) -> u8 {
    if err.use_stderr() {
        EXIT_FAILURE
    } else {
        EXIT_OK
    }
}
