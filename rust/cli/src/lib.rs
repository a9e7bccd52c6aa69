//! # Clock Patience CLI Library
//!
//! Command-line front end for the Clock Patience engine: play a round
//! automatically or from typed commands, inspect a shuffle or a deal, and
//! show the resolved configuration.
//!
//! ## Main Entry Point
//!
//! The primary entry point is the [`run`] function, which parses command-line
//! arguments and executes the appropriate subcommand.
//!
//! ```no_run
//! use std::io;
//! let args = vec!["clockpatience", "play", "--mode", "auto", "--question", "Will it rain?"];
//! let code = clockpatience_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `play`: Play one round (`--mode auto|manual`)
//! - `deal`: Shuffle, deal and print the thirteen piles
//! - `shuffle`: Print the riffle runs of one shuffle
//! - `cfg`: Display current configuration settings

use clap::Parser;
use std::io::Write;

pub mod cli;
mod commands;
mod config;
mod error;
pub mod exit_code;
pub mod io_utils;
pub mod logging;
pub mod ui;

use cli::{ClockPatienceCli, Commands};
use commands::{
    PlayOptions, handle_cfg_command, handle_deal_command, handle_play_command,
    handle_shuffle_command,
};

pub use error::CliError;

const COMMANDS: &[&str] = &["play", "deal", "shuffle", "cfg"];

/// Main entry point for the CLI application.
///
/// # Returns
///
/// Exit code: `0` for success, `2` for errors, `130` when the player quits a
/// manual round
///
/// # Example
///
/// ```
/// use std::io;
/// let args = vec!["clockpatience", "deal", "--seed", "42"];
/// let code = clockpatience_cli::run(args, &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match ClockPatienceCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return report_usage(e, out, err),
    };

    let result = match cli.cmd {
        Commands::Cfg => handle_cfg_command(out),
        Commands::Deal { seed } => {
            load_config().and_then(|config| handle_deal_command(seed, &config, out))
        }
        Commands::Shuffle { seed } => {
            load_config().and_then(|config| handle_shuffle_command(seed, &config, out))
        }
        Commands::Play {
            mode,
            seed,
            question,
            output,
            cards_dir,
        } => load_config().and_then(|config| {
            let opts = PlayOptions {
                mode,
                seed,
                question,
                output,
                cards_dir,
            };
            // Use stdin for real input (supports both TTY and piped stdin)
            let stdin = std::io::stdin();
            let mut stdin_lock = stdin.lock();
            handle_play_command(opts, &config, out, err, &mut stdin_lock)
        }),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(CliError::Interrupted(msg)) => {
            tracing::info!(reason = %msg, "round abandoned");
            let _ = writeln!(out, "Round abandoned: {}", msg);
            exit_code::INTERRUPTED
        }
        Err(e) => {
            if writeln!(err, "Error: {}", e).is_err() {
                return exit_code::ERROR;
            }
            exit_code::ERROR
        }
    }
}

fn load_config() -> Result<config::Config, CliError> {
    config::load().map_err(|e| CliError::Config(format!("Invalid configuration: {}", e)))
}

fn report_usage(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version should print to stdout and exit 0
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            if write!(out, "{}", e).is_err() {
                return exit_code::ERROR;
            }
            exit_code::SUCCESS
        }
        _ => {
            if writeln!(err, "{}", e).is_err()
                || writeln!(err).is_err()
                || writeln!(err, "Clock Patience CLI").is_err()
                || writeln!(err, "Usage: clockpatience <command> [options]\n").is_err()
                || writeln!(err, "Commands:").is_err()
            {
                return exit_code::ERROR;
            }
            for c in COMMANDS {
                if writeln!(err, "  {}", c).is_err() {
                    return exit_code::ERROR;
                }
            }
            if writeln!(err, "\nFor full help, run: clockpatience --help").is_err() {
                return exit_code::ERROR;
            }
            exit_code::ERROR
        }
    }
}
