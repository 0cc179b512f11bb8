//! Integration tests for the meraki-mcp binary

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const MERAKI_VARS: &[&str] = &[
    "MERAKI_API_KEY",
    "MERAKI_BASE_URL",
    "MERAKI_READ_ONLY_MODE",
    "MERAKI_REQUIRE_CONFIRMATIONS",
    "MERAKI_CATEGORIES",
    "MERAKI_MCP_LOG_FILE",
];

/// A command isolated from the host's configuration
fn isolated_command(home: &TempDir) -> Result<Command> {
    let mut cmd = Command::cargo_bin("meraki-mcp")?;
    for var in MERAKI_VARS {
        cmd.env_remove(var);
    }
    cmd.env("HOME", home.path())
        .env("NO_COLOR", "1")
        .current_dir(home.path());
    Ok(cmd)
}

#[test]
fn test_no_subcommand_prints_help() -> Result<()> {
    let home = TempDir::new()?;
    isolated_command(&home)?
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("doctor"));
    Ok(())
}

#[test]
fn test_help_flag() -> Result<()> {
    let home = TempDir::new()?;
    isolated_command(&home)?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Meraki"));
    Ok(())
}

#[test]
fn test_tools_check_succeeds() -> Result<()> {
    let home = TempDir::new()?;
    isolated_command(&home)?
        .args(["tools", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("names valid and unique"))
        .stdout(predicate::str::contains("organizations"));
    Ok(())
}

#[test]
fn test_tools_list_json() -> Result<()> {
    let home = TempDir::new()?;
    let output = isolated_command(&home)?
        .args(["tools", "list", "--format", "json", "--category", "devices"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout)?;
    let tools = parsed.as_array().expect("tool list should be an array");
    assert!(!tools.is_empty());
    assert!(tools.iter().all(|t| t["category"] == "devices"));
    assert!(tools.iter().any(|t| t["name"] == "reboot_device"));
    Ok(())
}

#[test]
fn test_tools_list_table() -> Result<()> {
    let home = TempDir::new()?;
    isolated_command(&home)?
        .args(["tools", "list", "--category", "licensing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Name"))
        .stdout(predicate::str::contains("Safety"));
    Ok(())
}

#[test]
fn test_tools_list_unknown_category() -> Result<()> {
    let home = TempDir::new()?;
    isolated_command(&home)?
        .args(["tools", "list", "--category", "toasters"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown category"));
    Ok(())
}

#[test]
fn test_doctor_without_api_key_fails() -> Result<()> {
    let home = TempDir::new()?;
    isolated_command(&home)?
        .arg("doctor")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Dashboard API key"))
        .stdout(predicate::str::contains("MERAKI_API_KEY"));
    Ok(())
}

#[test]
fn test_serve_without_api_key_fails() -> Result<()> {
    let home = TempDir::new()?;
    isolated_command(&home)?
        .arg("serve")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("MERAKI_API_KEY"));
    Ok(())
}

#[test]
fn test_serve_rejects_unknown_category() -> Result<()> {
    let home = TempDir::new()?;
    isolated_command(&home)?
        .args(["serve", "--categories", "toasters"])
        .env("MERAKI_API_KEY", "test-key")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("toasters"));
    Ok(())
}

#[test]
fn test_serve_category_flag_replaces_environment() -> Result<()> {
    let home = TempDir::new()?;
    // The flag wins over the bad environment value, so only the key is reported
    isolated_command(&home)?
        .args(["serve", "--categories", "devices"])
        .env("MERAKI_CATEGORIES", "toasters")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("MERAKI_API_KEY"))
        .stderr(predicate::str::contains("toasters").not());
    Ok(())
}
