use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::io;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "meraki-mcp")]
#[command(version)]
#[command(about = "An MCP server exposing the Cisco Meraki Dashboard API as tools")]
#[command(long_about = "
meraki-mcp is an MCP (Model Context Protocol) server that exposes the Cisco
Meraki Dashboard API as tools an assistant can call. Each tool wraps one
Dashboard endpoint and returns markdown.

Configuration comes from MERAKI_* environment variables or meraki-mcp.yaml.

Example usage:
  meraki-mcp serve                 # Run as MCP server over stdio
  meraki-mcp serve --read-only     # Refuse every tool that changes configuration
  meraki-mcp tools list            # Show the registered tools
  meraki-mcp doctor                # Check API key, configuration and connectivity
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run as MCP server over stdio
    #[command(long_about = "
Runs meraki-mcp as an MCP server on stdin/stdout until the client
disconnects or Ctrl-C is pressed. Logs go to ~/.meraki-mcp/mcp.log.

Example:
  meraki-mcp serve --categories organizations,networks,devices
")]
    Serve {
        /// Refuse every tool that modifies Dashboard state
        #[arg(long)]
        read_only: bool,

        /// Run destructive tools without asking for confirmed=true
        #[arg(long)]
        no_confirmations: bool,

        /// Only register these API categories (comma separated)
        #[arg(long, value_delimiter = ',')]
        categories: Vec<String>,
    },
    /// Inspect the tool catalog
    Tools {
        #[command(subcommand)]
        subcommand: ToolsSubcommand,
    },
    /// Diagnose configuration and Dashboard connectivity
    Doctor,
}

#[derive(Subcommand, Debug)]
pub enum ToolsSubcommand {
    /// List registered tools
    List {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Only list tools of this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Verify tool names are valid and unique
    Check,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn try_parse_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(args)
    }

    pub fn is_tty() -> bool {
        io::stdout().is_terminal()
    }

    pub fn should_use_color() -> bool {
        Self::is_tty() && std::env::var("NO_COLOR").is_err()
    }

    /// Whether the command serves MCP over stdio
    pub fn is_serve(&self) -> bool {
        matches!(self.command, Some(Commands::Serve { .. }))
    }
}
