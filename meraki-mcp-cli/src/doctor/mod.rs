//! Doctor module for meraki-mcp diagnostics
//!
//! Checks the configuration, the API key, Dashboard reachability and the
//! tool catalog, then prints a colored report.
//!
//! The doctor returns exit codes:
//! - 0: All checks passed
//! - 1: Some warnings detected
//! - 2: Errors detected

use colored::*;

pub use types::*;

pub mod checks;
pub mod types;

use checks::check_names;

/// Accumulates diagnostic results and prints a summary
pub struct Doctor {
    checks: Vec<Check>,
}

impl Doctor {
    /// Create a new Doctor instance for running diagnostics
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Run all diagnostic checks and return the exit code
    pub async fn run_diagnostics(&mut self) -> i32 {
        println!("{}", "🩺 meraki-mcp Doctor".bold().blue());
        println!("{}", "Running diagnostics...".dimmed());
        println!();

        self.run_checks().await;
        self.print_results();
        self.get_exit_code()
    }

    /// Run the checks without printing
    pub async fn run_checks(&mut self) {
        checks::check_config_file(&mut self.checks);
        let config = checks::check_config_validity(&mut self.checks);
        if let Some(config) = config {
            checks::check_api_key(&mut self.checks, &config);
            checks::check_connectivity(&mut self.checks, &config).await;
        }
        checks::check_tool_catalog(&mut self.checks);
    }

    /// Results collected so far
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Print the results grouped by area
    pub fn print_results(&self) {
        let use_color = crate::cli::Cli::should_use_color();

        self.print_check_group(
            &[
                check_names::CONFIG_FILE,
                check_names::CONFIG_VALID,
                check_names::API_KEY,
            ],
            "Configuration:",
            use_color,
        );
        self.print_check_group(&[check_names::CONNECTIVITY], "Dashboard:", use_color);
        self.print_check_group(&[check_names::TOOL_CATALOG], "Tools:", use_color);

        self.print_summary(use_color);
    }

    fn print_check_group(&self, names: &[&str], group_name: &str, use_color: bool) {
        let group: Vec<&Check> = self
            .checks
            .iter()
            .filter(|c| names.contains(&c.name.as_str()))
            .collect();
        if group.is_empty() {
            return;
        }

        if use_color {
            println!("{}", group_name.bold().yellow());
        } else {
            println!("{group_name}");
        }
        for check in group {
            print_check(check, use_color);
        }
        println!();
    }

    fn print_summary(&self, use_color: bool) {
        let counts = self.count_check_statuses();

        if use_color {
            println!("{}", "Summary:".bold().green());
        } else {
            println!("Summary:");
        }

        if counts.error_count == 0 && counts.warning_count == 0 {
            println!("  All {} checks passed", counts.ok_count);
            return;
        }

        let paint = |count: usize, color: Color| {
            if use_color {
                count.to_string().color(color).to_string()
            } else {
                count.to_string()
            }
        };
        println!(
            "  {} passed, {} warnings, {} errors",
            paint(counts.ok_count, Color::Green),
            paint(counts.warning_count, Color::Yellow),
            paint(counts.error_count, Color::Red)
        );
    }

    fn count_check_statuses(&self) -> CheckCounts {
        let count = |status: CheckStatus| self.checks.iter().filter(|c| c.status == status).count();
        CheckCounts {
            ok_count: count(CheckStatus::Ok),
            warning_count: count(CheckStatus::Warning),
            error_count: count(CheckStatus::Error),
        }
    }

    /// Exit code for the worst status seen
    pub fn get_exit_code(&self) -> i32 {
        let worst = self
            .checks
            .iter()
            .map(|c| match c.status {
                CheckStatus::Ok => ExitCode::Success,
                CheckStatus::Warning => ExitCode::Warning,
                CheckStatus::Error => ExitCode::Error,
            })
            .max_by_key(|code| *code as i32)
            .unwrap_or(ExitCode::Success);

        worst.into()
    }
}

impl Default for Doctor {
    fn default() -> Self {
        Self::new()
    }
}

fn print_check(check: &Check, use_color: bool) {
    let symbol = match check.status {
        CheckStatus::Ok => "✓",
        CheckStatus::Warning => "⚠",
        CheckStatus::Error => "✗",
    };

    if !use_color {
        println!("  {symbol} {} - {}", check.name, check.message);
        if let Some(fix) = &check.fix {
            println!("    → {fix}");
        }
        return;
    }

    let symbol = match check.status {
        CheckStatus::Ok => symbol.green(),
        CheckStatus::Warning => symbol.yellow(),
        CheckStatus::Error => symbol.red(),
    };
    println!("  {symbol} {} - {}", check.name.bold(), check.message);
    if let Some(fix) = &check.fix {
        println!("    {} {}", "→".dimmed(), fix.dimmed());
    }
}
