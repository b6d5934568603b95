use anyhow::Result;

use crate::{CliTest, run};

fn project() -> Result<CliTest> {
    CliTest::with_files(&[
        (
            ".harvestrc.json",
            r#"{ "scanner": { "resource": { "lineEnding": "lf" } } }"#,
        ),
        ("src/app.js", "t('title', 'Title')"),
    ])
}

#[test]
fn test_check_reports_missing_files() -> Result<()> {
    let test = project()?;

    let (code, stdout, _) = run(test.check_command())?;
    assert_eq!(code, 1);
    assert!(stdout.contains("missing  i18n/en/translation.json"));
    assert!(stdout.contains("1 of 1 resource file out of date (run harvest scan)"));
    assert!(!test.root().join("i18n").exists());

    Ok(())
}

#[test]
fn test_check_passes_after_scan() -> Result<()> {
    let test = project()?;
    assert_eq!(run(test.scan_command())?.0, 0);

    let (code, stdout, _) = run(test.check_command())?;
    assert_eq!(code, 0);
    assert!(stdout.contains("Scanned 1 source file: 1 resource file up to date"));

    Ok(())
}

#[test]
fn test_check_detects_stale_files() -> Result<()> {
    let test = project()?;
    assert_eq!(run(test.scan_command())?.0, 0);
    test.write_file("src/app.js", "t('title', 'Title'); t('subtitle')")?;

    let (code, stdout, _) = run(test.check_command())?;
    assert_eq!(code, 1);
    assert!(stdout.contains("stale  i18n/en/translation.json"));

    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.arg("--help");
    let (code, stdout, _) = run(cmd)?;
    assert_eq!(code, 0);
    for command in ["scan", "check", "init"] {
        assert!(stdout.contains(command));
    }

    Ok(())
}
