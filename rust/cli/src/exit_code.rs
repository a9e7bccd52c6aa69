//! Exit code constants for the CLI application.
//!
//! Every command maps its outcome onto one of these, so scripts driving
//! `clockpatience` can tell a finished round from a usage error.

/// Success exit code (standard Unix convention).
pub const SUCCESS: i32 = 0;

/// General error exit code.
pub const ERROR: i32 = 2;

/// Interrupted by user (`q` during manual play) exit code.
pub const INTERRUPTED: i32 = 130;
