//! CLI module for chirpstore
//!
//! Thin wrapper over [`ChirpService`](crate::api::ChirpService): one
//! service call per invocation, result printed as JSON.

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{init, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::write_response;
