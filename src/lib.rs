//! i18n-harvest - i18next translation key extractor
//!
//! Scans HTML and JavaScript/TypeScript sources for translation keys (the
//! `data-i18n` attribute, `t()` style calls and `<Trans>` components) and
//! aggregates them into per-language, per-namespace JSON resource files.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (argument parsing, commands, report)
//! - `config`: `.harvestrc.json` loading and validation
//! - `core`: Extraction strategies, key resolution and the resource store
//! - `pipeline`: File discovery, parallel scanning and resource file output

pub mod cli;
pub mod config;
pub mod core;
pub mod pipeline;
