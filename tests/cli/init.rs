use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, run};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let (code, stdout, _) = run({
        let mut cmd = test.command();
        cmd.arg("init");
        cmd
    })?;
    assert_eq!(code, 0);
    assert!(stdout.contains("Created .harvestrc.json"));

    let content = test.read_file(".harvestrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["sourceRoot"], "./");
    assert_eq!(parsed["outputRoot"], "./");
    assert_eq!(parsed["scanner"]["languages"], serde_json::json!(["en"]));
    assert_eq!(parsed["scanner"]["resource"]["savePath"], "i18n/{{lng}}/{{ns}}.json");
    assert!(content.ends_with("}\n"));

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".harvestrc.json", "{}")?;

    let (code, _, stderr) = run({
        let mut cmd = test.command();
        cmd.arg("init");
        cmd
    })?;
    assert_eq!(code, 1);
    assert!(stderr.contains(".harvestrc.json already exists"));
    assert_eq!(test.read_file(".harvestrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_generated_config_is_accepted_by_scan() -> Result<()> {
    let test = CliTest::with_files(&[("src/app.js", "t('hello')")])?;

    let mut init = test.command();
    init.arg("init");
    assert_eq!(run(init)?.0, 0);

    let (code, _, stderr) = run(test.scan_command())?;
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(test.root().join("i18n/en/translation.json").exists());

    Ok(())
}
