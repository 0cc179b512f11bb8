use std::process;

use clap::CommandFactory;
use meraki_mcp_cli::cli::{Cli, Commands};
use meraki_mcp_cli::doctor::Doctor;
use meraki_mcp_cli::error::handle_cli_result;
use meraki_mcp_cli::exit_codes::{EXIT_SUCCESS, EXIT_WARNING};
use meraki_mcp_cli::logging::{default_directive, init_logging};
use meraki_mcp_cli::{serve, tools_cmd};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    // Fast path for help - avoid initialization
    if cli.command.is_none() {
        let code = match print_help() {
            Ok(()) => EXIT_SUCCESS,
            Err(e) => {
                eprintln!("Failed to print help: {e}");
                EXIT_WARNING
            }
        };
        process::exit(code);
    }

    // stdout is the MCP transport while serving
    init_logging(
        default_directive(cli.verbose, cli.debug, cli.quiet),
        cli.is_serve(),
    );

    let exit_code = match cli.command {
        Some(Commands::Serve {
            read_only,
            no_confirmations,
            categories,
        }) => {
            tracing::info!("Starting MCP server");
            handle_cli_result(serve::run_serve(read_only, no_confirmations, categories).await)
        }
        Some(Commands::Tools { subcommand }) => {
            tracing::debug!("Running tools command");
            handle_cli_result(tools_cmd::run_tools_command(subcommand))
        }
        Some(Commands::Doctor) => {
            tracing::debug!("Running diagnostics");
            Doctor::new().run_diagnostics().await
        }
        None => EXIT_SUCCESS,
    };

    process::exit(exit_code);
}

fn print_help() -> anyhow::Result<()> {
    Cli::command().print_help()?;
    println!();
    Ok(())
}
