//! Command-line boundary for the paycode library: argument parsing and
//! command runners, kept in a library so they can be tested directly.

pub mod args;
pub mod commands;

pub use args::{Args, Command};
pub use commands::{run, CliError, Outcome};
