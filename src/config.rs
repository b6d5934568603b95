use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::ScanOptions;

pub const CONFIG_FILE_NAME: &str = ".harvestrc.json";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Directory scanned for source files, relative to the config file.
    #[serde(default = "default_root")]
    pub source_root: String,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    /// Directory resource save paths are resolved against.
    #[serde(default = "default_root")]
    pub output_root: String,
    #[serde(default)]
    pub scanner: ScanOptions,
}

fn default_root() -> String {
    "./".to_string()
}

fn default_ignores() -> Vec<String> {
    ["**/dist/**", "**/build/**"].map(String::from).to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_root: default_root(),
            includes: Vec::new(),
            ignores: default_ignores(),
            output_root: default_root(),
            scanner: ScanOptions::default(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob pattern in `ignores` or `includes` is
    /// invalid, or if the scanner options are rejected.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Patterns without wildcards are literal directory paths, so
        // `pages/[id]` is valid without escaping.
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        self.scanner
            .validate()
            .context("Invalid 'scanner' options")?;

        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    pub config: Config,
    /// The file the config came from, `None` when using defaults.
    pub path: Option<PathBuf>,
    /// Directory that relative roots in the config resolve against.
    pub base_dir: PathBuf,
}

impl ConfigLoadResult {
    pub fn from_file(&self) -> bool {
        self.path.is_some()
    }

    pub fn source_root(&self) -> PathBuf {
        resolve(&self.base_dir, &self.config.source_root)
    }

    pub fn output_root(&self) -> PathBuf {
        resolve(&self.base_dir, &self.config.output_root)
    }
}

/// Join `relative` onto `base`, dropping `.` components.
fn resolve(base: &Path, relative: &str) -> PathBuf {
    base.join(relative).components().collect()
}

/// Load the nearest config file above `start_dir`, or defaults.
pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => load_config_file(&path),
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
            base_dir: start_dir.to_path_buf(),
        }),
    }
}

/// Load and validate a specific config file.
pub fn load_config_file(path: &Path) -> Result<ConfigLoadResult> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config file: {}", path.display()))?;

    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(ConfigLoadResult {
        config,
        path: Some(path.to_path_buf()),
        base_dir,
    })
}

#[cfg(test)]
mod tests {
    use crate::config::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.includes.is_empty());
        assert_eq!(config.source_root, "./");
        assert_eq!(config.scanner, ScanOptions::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let json = r#"{
              "sourceRoot": "./src",
              "ignores": ["**/vendor/**"],
              "includes": ["app"],
              "outputRoot": "./public",
              "scanner": {
                  "languages": ["en", "de"],
                  "resource": { "savePath": "locales/{{lng}}/{{ns}}.json" }
              }
          }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.source_root, "./src");
        assert_eq!(config.ignores, vec!["**/vendor/**"]);
        assert_eq!(config.includes, vec!["app"]);
        assert_eq!(config.output_root, "./public");
        assert_eq!(config.scanner.languages, vec!["en", "de"]);
        assert_eq!(config.scanner.resource.save_path, "locales/{{lng}}/{{ns}}.json");
        assert_eq!(config.scanner.resource.json_indent, 2);
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{ "includes": ["src"] }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.includes, vec!["src"]);
        assert_eq!(config.ignores, default_ignores());
        assert_eq!(config.scanner, ScanOptions::default());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<Config>(r#"{ "sourceDir": "src" }"#).is_err());
        assert!(serde_json::from_str::<Config>(r#"{ "scanner": { "lngs": ["en"] } }"#).is_err());
    }

    #[test]
    fn test_find_config_file() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("src").join("components");
        fs::create_dir_all(&sub_dir).unwrap();

        let config_path = dir.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).unwrap();

        let found = find_config_file(&sub_dir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        assert!(find_config_file(dir.path()).is_none());
    }

    #[test]
    fn test_load_config_from_file_resolves_roots() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("web");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "sourceRoot": "web", "outputRoot": "out" }"#,
        )
        .unwrap();

        let result = load_config(&nested).unwrap();
        assert!(result.from_file());
        assert_eq!(result.base_dir, dir.path());
        assert_eq!(result.source_root(), dir.path().join("web"));
        assert_eq!(result.output_root(), dir.path().join("out"));
    }

    #[test]
    fn test_default_roots_resolve_to_config_dir() {
        let base = Path::new("/project");
        assert_eq!(resolve(base, "./"), PathBuf::from("/project"));
        assert_eq!(resolve(base, "./src/./app"), PathBuf::from("/project/src/app"));
    }

    #[test]
    fn test_load_config_default_when_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(!result.from_file());
        assert_eq!(result.base_dir, dir.path());
        assert_eq!(result.config, Config::default());
    }

    #[test]
    fn test_validate_invalid_ignore_pattern() {
        let config = Config {
            ignores: vec!["[invalid".to_string()],
            ..Default::default()
        };
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("ignores"));
    }

    #[test]
    fn test_validate_invalid_include_pattern() {
        let config = Config {
            includes: vec!["src/**/[invalid".to_string()],
            ..Default::default()
        };
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("includes"));
    }

    #[test]
    fn test_validate_literal_brackets_in_includes() {
        let config = Config {
            includes: vec!["pages/[id]".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_scanner_options() {
        let mut config = Config::default();
        config.scanner.languages = vec!["en".into(), "de".into()];
        config.scanner.resource.save_path = "i18n/{{ns}}.json".into();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("scanner"));
        assert!(format!("{err:#}").contains("{{lng}}"));
    }

    #[test]
    fn test_load_config_with_invalid_content_fails() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        fs::write(&config_path, r#"{ "ignores": ["[invalid"] }"#).unwrap();
        assert!(load_config(dir.path()).is_err());

        fs::write(&config_path, "{ not json").unwrap();
        assert!(load_config(dir.path()).is_err());
    }

    #[test]
    fn test_default_config_json_round_trips() {
        let json = default_config_json().unwrap();
        let config: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, Config::default());
        assert!(json.contains("\"outputRoot\""));
        assert!(json.contains("\"keySeparator\": \".\""));
    }
}
