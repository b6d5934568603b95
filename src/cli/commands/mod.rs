pub mod check;
pub mod init;
pub mod scan;

use std::{env, path::PathBuf};

use anyhow::{Context, Result};

use super::args::CommonArgs;
use crate::{
    config::{Config, load_config, load_config_file},
    pipeline::ScanRoots,
};

/// Everything a scanning command needs, with CLI overrides applied.
#[derive(Debug)]
pub struct Session {
    pub config: Config,
    pub roots: ScanRoots,
    /// Directory paths in the report are shown relative to.
    pub display_root: PathBuf,
}

impl Session {
    pub fn load(common: &CommonArgs) -> Result<Self> {
        let cwd = env::current_dir().context("Failed to get current directory")?;
        let start_dir = match &common.source_root {
            Some(source_root) => cwd.join(source_root),
            None => cwd.clone(),
        };

        let loaded = match &common.config {
            Some(path) => load_config_file(&cwd.join(path))?,
            None => load_config(&start_dir)?,
        };

        let roots = ScanRoots {
            source_root: match &common.source_root {
                Some(_) => start_dir,
                None => loaded.source_root(),
            },
            output_root: match &common.output_root {
                Some(output_root) => cwd.join(output_root),
                None => loaded.output_root(),
            },
        };

        let mut config = loaded.config;
        if common.sort {
            config.scanner.sort = true;
        }

        Ok(Self {
            config,
            roots,
            display_root: cwd,
        })
    }
}
