use anyhow::Result;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use crate::{CliTest, run};

const CONFIG: &str = r#"{
  "sourceRoot": "src",
  "scanner": {
    "languages": ["en", "de"],
    "namespaces": ["common"],
    "resource": {
      "savePath": "locales/{{lng}}/{{ns}}.json",
      "lineEnding": "lf"
    }
  }
}"#;

fn project() -> Result<CliTest> {
    CliTest::with_files(&[
        (".harvestrc.json", CONFIG),
        ("src/index.html", r#"<h1 data-i18n="common:title"></h1>"#),
        ("src/app.js", "i18next.t('greeting', 'Hello'); t('menu.open', { count: 2 })"),
        (
            "src/view/Footer.tsx",
            r#"export const Footer = () => <Trans i18nKey="footer">All rights reserved</Trans>;"#,
        ),
        ("scripts/ignored.js", "t('not.scanned')"),
    ])
}

#[test]
fn test_scan_writes_resource_files() -> Result<()> {
    let test = project()?;

    let (code, stdout, stderr) = run(test.scan_command())?;
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("created  locales/en/common.json"));
    assert!(stdout.contains("Scanned 3 source files: 4 created, 0 updated, 0 unchanged"));

    assert_snapshot!(test.read_file("locales/en/translation.json")?, @r#"
    {
      "greeting": "Hello",
      "menu": {
        "open": "",
        "open_plural": ""
      },
      "footer": "All rights reserved"
    }
    "#);
    assert_eq!(
        test.read_file("locales/de/translation.json")?,
        test.read_file("locales/en/translation.json")?
    );
    assert_eq!(test.read_file("locales/en/common.json")?, "{\n  \"title\": \"\"\n}\n");
    assert!(!test.read_file("locales/en/translation.json")?.contains("not.scanned"));

    Ok(())
}

#[test]
fn test_second_scan_leaves_files_unchanged() -> Result<()> {
    let test = project()?;
    assert_eq!(run(test.scan_command())?.0, 0);

    let (code, stdout, _) = run(test.scan_command())?;
    assert_eq!(code, 0);
    assert!(stdout.contains("0 created, 0 updated, 4 unchanged"));
    assert!(!stdout.contains("locales/"));

    Ok(())
}

#[test]
fn test_dry_run_writes_nothing() -> Result<()> {
    let test = project()?;

    let mut cmd = test.scan_command();
    cmd.arg("--dry-run");
    let (code, stdout, _) = run(cmd)?;
    assert_eq!(code, 0);
    assert!(stdout.contains("would create"));
    assert!(stdout.contains("(dry run)"));
    assert!(!test.root().join("locales").exists());

    Ok(())
}

#[test]
fn test_sort_flag_orders_keys() -> Result<()> {
    let test = project()?;

    let mut cmd = test.scan_command();
    cmd.arg("--sort");
    assert_eq!(run(cmd)?.0, 0);

    let content = test.read_file("locales/en/translation.json")?;
    let footer = content.find("\"footer\"").unwrap();
    let greeting = content.find("\"greeting\"").unwrap();
    let menu = content.find("\"menu\"").unwrap();
    assert!(footer < greeting && greeting < menu);

    let mut cmd = test.scan_command();
    cmd.arg("--dry-run");
    let (_, stdout, _) = run(cmd)?;
    assert!(stdout.contains("would update  locales/en/translation.json"));

    Ok(())
}

#[test]
fn test_existing_translations_are_kept() -> Result<()> {
    let test = CliTest::with_files(&[
        (
            ".harvestrc.json",
            r#"{
  "scanner": {
    "resource": {
      "savePath": "i18n/{{lng}}/{{ns}}.json",
      "loadPath": "i18n/{{lng}}/{{ns}}.json",
      "lineEnding": "lf"
    }
  }
}"#,
        ),
        ("app.js", "t('greeting', 'Hello'); t('farewell', 'Bye')"),
        ("i18n/en/translation.json", "{\n  \"greeting\": \"Hi!\",\n  \"legacy\": \"Old\"\n}\n"),
    ])?;

    let (code, stdout, _) = run(test.scan_command())?;
    assert_eq!(code, 0);
    assert!(stdout.contains("updated  i18n/en/translation.json"));
    assert_eq!(
        test.read_file("i18n/en/translation.json")?,
        "{\n  \"greeting\": \"Hi!\",\n  \"legacy\": \"Old\",\n  \"farewell\": \"Bye\"\n}\n"
    );

    Ok(())
}

#[test]
fn test_root_overrides() -> Result<()> {
    let test = CliTest::with_files(&[("web/app.js", "t('from.web')"), ("other/app.js", "t('from.other')")])?;

    let mut cmd = test.scan_command();
    cmd.args(["--source-root", "web", "--output-root", "out"]);
    let (code, _, stderr) = run(cmd)?;
    assert_eq!(code, 0, "stderr: {stderr}");

    let content = test.read_file("out/i18n/en/translation.json")?;
    assert!(content.contains("\"web\""));
    assert!(!content.contains("\"other\""));

    Ok(())
}

#[test]
fn test_invalid_config_is_an_error() -> Result<()> {
    let test = CliTest::with_files(&[
        (".harvestrc.json", r#"{ "scanner": { "languages": [] } }"#),
        ("app.js", "t('a')"),
    ])?;

    let (code, stdout, stderr) = run(test.scan_command())?;
    assert_eq!(code, 2);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("scanner"));

    Ok(())
}

#[test]
fn test_unknown_config_field_is_an_error() -> Result<()> {
    let test = CliTest::with_files(&[(".harvestrc.json", r#"{ "sourceDir": "src" }"#)])?;

    let (code, _, stderr) = run(test.scan_command())?;
    assert_eq!(code, 2);
    assert!(stderr.contains("Failed to parse config file"));

    Ok(())
}

#[test]
fn test_explicit_config_path() -> Result<()> {
    let test = CliTest::with_files(&[
        (
            "config/harvest.json",
            r#"{ "sourceRoot": "../src", "outputRoot": "..", "scanner": { "defaultNs": "app" } }"#,
        ),
        ("src/app.js", "t('key')"),
    ])?;

    let mut cmd = test.scan_command();
    cmd.args(["--config", "config/harvest.json"]);
    let (code, _, stderr) = run(cmd)?;
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(test.root().join("i18n/en/app.json").exists());

    Ok(())
}
