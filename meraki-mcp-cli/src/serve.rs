//! The `serve` command: run the MCP server over stdio

use crate::error::{CliError, CliResult, IntoCliResult};
use crate::exit_codes::EXIT_WARNING;
use meraki_mcp::error::{ErrorChainExt, ErrorContext};
use meraki_mcp::{Config, MerakiMcpServer};
use rmcp::serve_server;
use rmcp::transport::io::stdio;

/// Apply command-line flags on top of the loaded configuration
///
/// Flags only ever tighten or narrow what the file and environment set,
/// except `--no-confirmations`, which switches the confirmation step off.
pub fn apply_overrides(
    config: &mut Config,
    read_only: bool,
    no_confirmations: bool,
    categories: Vec<String>,
) {
    if read_only {
        config.read_only_mode = true;
    }
    if no_confirmations {
        config.require_confirmations = false;
    }
    if !categories.is_empty() {
        config.categories = Some(categories);
    }
}

/// Load configuration and build the server without starting it
pub fn build_server(
    read_only: bool,
    no_confirmations: bool,
    categories: Vec<String>,
) -> CliResult<MerakiMcpServer> {
    let mut config = Config::load_unvalidated().cli_validation_error()?;
    apply_overrides(&mut config, read_only, no_confirmations, categories);
    config.validate().cli_validation_error()?;
    config.require_api_key().cli_validation_error()?;

    let server = MerakiMcpServer::new(&config)
        .context("Failed to create MCP server")
        .map_err(|e| {
            tracing::error!("{}", e.error_chain());
            CliError::general(e)
        })?;
    let summary = server.tool_registry().summary();
    tracing::info!(
        "Registered {} tools (read-only: {}, confirmations: {})",
        summary.total,
        config.read_only_mode,
        config.require_confirmations
    );
    Ok(server)
}

/// Serve until the client disconnects or Ctrl-C is pressed
pub async fn run_serve(
    read_only: bool,
    no_confirmations: bool,
    categories: Vec<String>,
) -> CliResult<()> {
    let server = build_server(read_only, no_confirmations, categories)?;

    let running = serve_server(server, stdio()).await.map_err(|e| {
        tracing::error!("MCP server failed to start: {}", e);
        CliError::new(format!("MCP server failed to start: {e}"), EXIT_WARNING)
    })?;
    tracing::info!("MCP server started on stdio");

    tokio::select! {
        quit = running.waiting() => {
            let reason = quit.map_err(|e| {
                CliError::new(format!("MCP server task failed: {e}"), EXIT_WARNING)
            })?;
            tracing::info!("MCP server shut down: {:?}", reason);
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
