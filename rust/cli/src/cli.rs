//! Command-line argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "clockpatience",
    version,
    about = "Clock Patience: a yes/no fortune told by a game of solitaire"
)]
pub struct ClockPatienceCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play one round, automatically or from stdin commands
    Play {
        #[arg(long, value_enum, default_value_t = Mode::Auto)]
        mode: Mode,
        #[arg(long)]
        seed: Option<u64>,
        /// The question the round answers
        #[arg(long)]
        question: Option<String>,
        /// Append the finished round to this JSONL file
        #[arg(long)]
        output: Option<PathBuf>,
        /// Directory of card images whose file names are the card identifiers
        #[arg(long)]
        cards_dir: Option<PathBuf>,
    },
    /// Shuffle and deal, then print the thirteen piles
    Deal {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the riffle runs of one shuffle and the resulting order
    Shuffle {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}

/// How `play` drives the session.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum Mode {
    /// The automatic mode plays the round on its timer
    Auto,
    /// Commands typed on stdin drive the round
    Manual,
}

impl Mode {
    /// # Examples
    ///
    /// ```
    /// # use clockpatience_cli::cli::Mode;
    /// assert_eq!(Mode::Manual.as_str(), "manual");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Auto => "auto",
            Mode::Manual => "manual",
        }
    }
}
