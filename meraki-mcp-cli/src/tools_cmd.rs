//! The `tools` command: list and check the tool catalog

use crate::cli::{Cli, OutputFormat, ToolsSubcommand};
use crate::error::{CliError, CliResult, IntoCliResult};
use crate::exit_codes::EXIT_ERROR;
use colored::*;
use meraki_mcp::catalog::load_category;
use meraki_mcp::mcp::{register_all_tools, RegistrySummary};
use meraki_mcp::{Category, EndpointSpec, ToolRegistry, MAX_TOOL_NAME_LENGTH};
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct ToolRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Safety")]
    safety: String,
}

#[derive(serde::Serialize)]
struct ToolInfo<'a> {
    name: &'a str,
    category: Category,
    method: &'a str,
    path: &'a str,
    safety: &'a str,
    paginated: bool,
    description: &'a str,
}

pub fn run_tools_command(subcommand: ToolsSubcommand) -> CliResult<()> {
    match subcommand {
        ToolsSubcommand::List { format, category } => run_list(format, category.as_deref()),
        ToolsSubcommand::Check => run_check(),
    }
}

/// Catalog entries, optionally restricted to one category
pub fn collect_tools(category: Option<&str>) -> CliResult<Vec<EndpointSpec>> {
    let categories = match category {
        Some(name) => {
            let category: Category = name
                .parse()
                .map_err(|e: String| CliError::new(e, EXIT_ERROR))?;
            vec![category]
        }
        None => Category::ALL.to_vec(),
    };

    let mut specs = Vec::new();
    for category in categories {
        specs.extend(load_category(category).cli_general_error()?);
    }
    Ok(specs)
}

/// Render the catalog in the requested format
pub fn render_tools(specs: &[EndpointSpec], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Table => {
            let rows: Vec<ToolRow> = specs
                .iter()
                .map(|spec| ToolRow {
                    name: spec.name.clone(),
                    category: spec.category.to_string(),
                    method: spec.method.to_string(),
                    path: spec.path.clone(),
                    safety: spec.safety.as_str().to_string(),
                })
                .collect();
            Ok(Table::new(rows).with(Style::modern()).to_string())
        }
        OutputFormat::Json => {
            let infos: Vec<ToolInfo<'_>> = specs
                .iter()
                .map(|spec| ToolInfo {
                    name: &spec.name,
                    category: spec.category,
                    method: spec.method.as_str(),
                    path: &spec.path,
                    safety: spec.safety.as_str(),
                    paginated: spec.paginated,
                    description: &spec.description,
                })
                .collect();
            serde_json::to_string_pretty(&infos).cli_general_error()
        }
    }
}

fn run_list(format: OutputFormat, category: Option<&str>) -> CliResult<()> {
    let specs = collect_tools(category)?;
    println!("{}", render_tools(&specs, format)?);
    if format == OutputFormat::Table {
        println!("{} tools", specs.len());
    }
    Ok(())
}

/// Register the whole catalog, enforcing name rules and uniqueness
pub fn check_catalog() -> meraki_mcp::Result<RegistrySummary> {
    let mut registry = ToolRegistry::new();
    register_all_tools(&mut registry, &Category::ALL)?;
    Ok(registry.summary())
}

fn run_check() -> CliResult<()> {
    let use_color = Cli::should_use_color();

    let summary = match check_catalog() {
        Ok(summary) => summary,
        Err(e) => {
            if use_color {
                println!("{} {}", "✗".red(), "Tool catalog check failed".bold());
            } else {
                println!("✗ Tool catalog check failed");
            }
            return Err(CliError::validation(e));
        }
    };

    let headline = format!(
        "{} tools registered, names valid and unique",
        summary.total
    );
    if use_color {
        println!("{} {}", "✓".green(), headline.bold());
    } else {
        println!("✓ {headline}");
    }

    for (category, count) in &summary.per_category {
        println!("  {:<18} {:>4}", category.as_str(), count);
    }
    println!(
        "  Longest name: {} ({} of {} characters)",
        summary.longest_name,
        summary.longest_name.chars().count(),
        MAX_TOOL_NAME_LENGTH
    );
    Ok(())
}
