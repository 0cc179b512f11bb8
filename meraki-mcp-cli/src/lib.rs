//! Meraki MCP CLI Library
//!
//! Command-line front end for the Meraki Dashboard MCP server: argument
//! parsing, logging setup, and the `serve`, `tools` and `doctor` commands.

/// Command-line interface definitions and argument parsing
pub mod cli;
/// Environment and connectivity diagnostics
pub mod doctor;
/// CLI error type carrying an exit code
pub mod error;
/// Exit codes used by the CLI application
pub mod exit_codes;
/// Log subscriber setup
pub mod logging;
/// The stdio MCP server command
pub mod serve;
/// Tool catalog listing and checks
pub mod tools_cmd;
