//! Command handler modules for the Clock Patience CLI.
//!
//! Each command lives in its own module with the same shape:
//!
//! - Public handler function: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Module-private helpers specific to that command
//! - Output streams (`&mut dyn Write`) passed in, so tests capture them in buffers
//! - Errors propagated via the `CliError` enum

pub mod cfg;
pub mod deal;
pub mod play;
pub mod shuffle;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use play::{PlayOptions, handle_play_command};
pub use shuffle::handle_shuffle_command;
