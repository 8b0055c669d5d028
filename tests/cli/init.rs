use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("Created .keyshrinkrc.json"));

    let content = test.read_file(".keyshrinkrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["distRoot"], "./dist");
    assert_eq!(parsed["referenceLanguage"], "en");
    assert!(parsed["translationFunctions"].is_array());
    assert!(parsed["ignores"].is_array());
    assert!(content.contains("  "), "Config should use 2-space indentation");

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".keyshrinkrc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Error: .keyshrinkrc.json already exists"));
    assert_eq!(test.read_file(".keyshrinkrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;

    test.write_file("dist/js/app.js", "console.log(1)")?;

    let output = test.optimize_command().output()?;
    assert!(
        output.status.success(),
        "optimize should work with initialized config. stderr: {}",
        stderr(&output)
    );
    assert!(test.root().join(".keyshrinkrc.json").exists());

    Ok(())
}

#[test]
fn test_no_command_prints_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().output()?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("optimize"));
    assert!(stdout(&output).contains("init"));

    Ok(())
}
