//! Scanner options.
//!
//! `ScanOptions` is the single configuration record consumed by the extraction
//! engine. It deserializes from the `scanner` section of `.harvestrc.json`,
//! applies defaults for every missing field and rejects unknown fields.
//! [`ScanOptions::validate`] runs when a [`Parser`](crate::core::Parser) is
//! constructed so that configuration bugs surface before any file is scanned.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{key::is_file_name, path::ResourcePathFormatter};

/// Fatal configuration problems detected at parser construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("at least one language must be configured")]
    NoLanguages,
    #[error("'{field}' must not contain empty names")]
    EmptyName { field: &'static str },
    #[error("'{field}' must name at least one entry (use an empty 'extensions' list to disable the strategy)")]
    EmptyList { field: &'static str },
    #[error("'{field}' entry \"{name}\" cannot be used as a file name")]
    InvalidName { field: &'static str, name: String },
    #[error("'defaultNs' must not be empty")]
    EmptyDefaultNamespace,
    #[error("'{field}' must not be an empty string")]
    EmptySeparator { field: &'static str },
    #[error("invalid function name in 'func.list': \"{0}\"")]
    InvalidFunctionName(String),
    #[error("'interpolation.prefix' and 'interpolation.suffix' must not be empty")]
    EmptyInterpolation,
    #[error("pluralization is enabled but no plural forms are configured for \"{0}\"")]
    NoPluralForms(String),
    #[error("resource path template \"{template}\" is missing the {placeholder} placeholder")]
    MissingPlaceholder {
        template: String,
        placeholder: &'static str,
    },
    #[error("failed to build matcher: {0}")]
    Pattern(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ScanOptions {
    /// Target languages. Every discovered key is stored once per language.
    pub languages: Vec<String>,
    /// Namespaces created up front in every language, even when no key uses them.
    pub namespaces: Vec<String>,
    pub default_ns: String,
    /// Placeholder stored for keys discovered without a default value.
    pub default_value: String,
    pub sort: bool,
    /// Drop keys loaded from existing resource files that the scan did not find.
    pub remove_unused_keys: bool,
    /// Splits keys into nested objects. `false` in JSON keeps keys flat.
    #[serde(with = "separator")]
    pub key_separator: Option<String>,
    /// Splits `ns:key` references. `false` in JSON disables namespace prefixes.
    #[serde(with = "separator")]
    pub ns_separator: Option<String>,
    pub context: ContextOptions,
    pub plural: PluralOptions,
    pub interpolation: InterpolationOptions,
    pub attr: AttrOptions,
    pub func: FuncOptions,
    pub trans: TransOptions,
    pub resource: ResourceOptions,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
            namespaces: Vec::new(),
            default_ns: "translation".to_string(),
            default_value: String::new(),
            sort: false,
            remove_unused_keys: false,
            key_separator: Some(".".to_string()),
            ns_separator: Some(":".to_string()),
            context: ContextOptions::default(),
            plural: PluralOptions::default(),
            interpolation: InterpolationOptions::default(),
            attr: AttrOptions::default(),
            func: FuncOptions::default(),
            trans: TransOptions::default(),
            resource: ResourceOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ContextOptions {
    pub enabled: bool,
    /// Also store the bare key next to the context variant.
    pub fallback: bool,
    pub separator: String,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            fallback: true,
            separator: "_".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct PluralOptions {
    pub enabled: bool,
    /// Also store the bare key next to the plural variants.
    pub fallback: bool,
    pub separator: String,
    /// Plural suffixes used for languages without an entry in `forms_by_language`.
    pub forms: Vec<String>,
    pub forms_by_language: BTreeMap<String, Vec<String>>,
}

impl PluralOptions {
    /// Plural suffixes for `language`.
    pub fn forms_for(&self, language: &str) -> &[String] {
        self.forms_by_language
            .get(language)
            .map(Vec::as_slice)
            .unwrap_or(&self.forms)
    }
}

impl Default for PluralOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            fallback: true,
            separator: "_".to_string(),
            forms: vec!["plural".to_string()],
            forms_by_language: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct InterpolationOptions {
    pub prefix: String,
    pub suffix: String,
}

impl InterpolationOptions {
    /// Wrap `name` in the configured prefix and suffix.
    pub fn placeholder(&self, name: &str) -> String {
        format!("{}{}{}", self.prefix, name, self.suffix)
    }
}

impl Default for InterpolationOptions {
    fn default() -> Self {
        Self {
            prefix: "{{".to_string(),
            suffix: "}}".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct AttrOptions {
    pub list: Vec<String>,
    pub extensions: Vec<String>,
}

impl Default for AttrOptions {
    fn default() -> Self {
        Self {
            list: vec!["data-i18n".to_string()],
            extensions: [".html", ".htm"].map(String::from).to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct FuncOptions {
    pub list: Vec<String>,
    pub extensions: Vec<String>,
}

impl Default for FuncOptions {
    fn default() -> Self {
        Self {
            list: ["i18next.t", "i18n.t", "t"].map(String::from).to_vec(),
            extensions: [".js", ".jsx", ".ts", ".tsx"].map(String::from).to_vec(),
        }
    }
}

/// How the children of a translation component are flattened into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Nested elements keep their source tag name: `<strong>x</strong>`.
    #[default]
    Verbatim,
    /// Nested elements are renamed to their child index: `<1>x</1>`.
    Indexed,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct TransOptions {
    pub component: Vec<String>,
    pub i18n_key: String,
    pub defaults_key: String,
    /// Use the rendered children as the key when no key attribute is present.
    pub fallback_key: bool,
    pub renderer: RendererKind,
    pub keep_basic_html_nodes_for: Vec<String>,
    pub extensions: Vec<String>,
}

impl Default for TransOptions {
    fn default() -> Self {
        Self {
            component: vec!["Trans".to_string()],
            i18n_key: "i18nKey".to_string(),
            defaults_key: "defaults".to_string(),
            fallback_key: true,
            renderer: RendererKind::Verbatim,
            keep_basic_html_nodes_for: ["br", "strong", "i", "p"].map(String::from).to_vec(),
            extensions: [".jsx", ".tsx"].map(String::from).to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// The host convention: CRLF on Windows, LF elsewhere.
    #[default]
    Auto,
    Lf,
    Crlf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Auto if cfg!(windows) => "\r\n",
            LineEnding::Auto | LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ResourceOptions {
    /// Output path template with `{{lng}}` and `{{ns}}` placeholders.
    pub save_path: String,
    /// Where existing resource files are read from before scanning.
    pub load_path: Option<String>,
    pub json_indent: usize,
    pub line_ending: LineEnding,
}

impl Default for ResourceOptions {
    fn default() -> Self {
        Self {
            save_path: "i18n/{{lng}}/{{ns}}.json".to_string(),
            load_path: None,
            json_indent: 2,
            line_ending: LineEnding::Auto,
        }
    }
}

impl ScanOptions {
    /// Validate option values.
    ///
    /// Returns the first problem found. Called by `Parser::new`.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.languages.is_empty() {
            return Err(OptionsError::NoLanguages);
        }
        ensure_names("languages", &self.languages)?;
        ensure_names("namespaces", &self.namespaces)?;
        if self.default_ns.is_empty() {
            return Err(OptionsError::EmptyDefaultNamespace);
        }
        ensure_file_names("languages", &self.languages)?;
        ensure_file_names("namespaces", &self.namespaces)?;
        ensure_file_names("defaultNs", std::slice::from_ref(&self.default_ns))?;

        ensure_separator("keySeparator", self.key_separator.as_deref())?;
        ensure_separator("nsSeparator", self.ns_separator.as_deref())?;
        if self.context.enabled {
            ensure_separator("context.separator", Some(&self.context.separator))?;
        }
        if self.plural.enabled {
            ensure_separator("plural.separator", Some(&self.plural.separator))?;
            for language in &self.languages {
                let forms = self.plural.forms_for(language);
                if forms.is_empty() {
                    return Err(OptionsError::NoPluralForms(language.clone()));
                }
                ensure_names("plural.forms", forms)?;
            }
        }

        if self.interpolation.prefix.is_empty() || self.interpolation.suffix.is_empty() {
            return Err(OptionsError::EmptyInterpolation);
        }

        ensure_list("attr.list", &self.attr.list)?;
        ensure_list("trans.component", &self.trans.component)?;
        ensure_list("func.list", &self.func.list)?;
        ensure_names("trans.i18nKey", std::slice::from_ref(&self.trans.i18n_key))?;
        ensure_names("trans.defaultsKey", std::slice::from_ref(&self.trans.defaults_key))?;
        for name in &self.func.list {
            if !is_function_path(name) {
                return Err(OptionsError::InvalidFunctionName(name.clone()));
            }
        }

        ResourcePathFormatter::new(&self.resource.save_path, self.languages.len())?;
        if let Some(load_path) = &self.resource.load_path {
            ResourcePathFormatter::new(load_path, self.languages.len())?;
        }

        Ok(())
    }
}

fn ensure_file_names(field: &'static str, names: &[String]) -> Result<(), OptionsError> {
    match names.iter().find(|name| !is_file_name(name)) {
        Some(name) => Err(OptionsError::InvalidName {
            field,
            name: name.clone(),
        }),
        None => Ok(()),
    }
}

fn ensure_list(field: &'static str, names: &[String]) -> Result<(), OptionsError> {
    if names.is_empty() {
        return Err(OptionsError::EmptyList { field });
    }
    ensure_names(field, names)
}

fn ensure_names(field: &'static str, names: &[String]) -> Result<(), OptionsError> {
    if names.iter().any(|name| name.trim().is_empty()) {
        return Err(OptionsError::EmptyName { field });
    }
    Ok(())
}

fn ensure_separator(field: &'static str, separator: Option<&str>) -> Result<(), OptionsError> {
    match separator {
        Some("") => Err(OptionsError::EmptySeparator { field }),
        _ => Ok(()),
    }
}

/// `t`, `i18n.t`, `$t` are valid; `t(`, `.t`, `a..t` are not.
fn is_function_path(name: &str) -> bool {
    name.split('.').all(|segment| {
        let mut chars = segment.chars();
        chars
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
            && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
    })
}

/// Serde adapter for separators: a string, or `false` to disable.
mod separator {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(separator) => serializer.serialize_str(separator),
            None => serializer.serialize_bool(false),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Flag(bool),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(separator) => Ok(Some(separator)),
            Raw::Flag(false) => Ok(None),
            Raw::Flag(true) => Err(D::Error::custom(
                "a separator must be a string or false",
            )),
        }
    }
}
