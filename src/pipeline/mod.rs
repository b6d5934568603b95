//! File-level harness around the core parser.
//!
//! Discovers source files, feeds them to the extraction strategies in
//! parallel, reconciles the result with existing resource files and renders
//! one JSON artifact per language and namespace.

pub mod files;
pub mod resources;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, debug_span, warn};

use crate::{
    config::Config,
    core::{Parser, Resources, ScanOptions, Table},
};

pub use files::{ScanResult, has_extension, scan_files};
pub use resources::{WriteStatus, compare_resource, load_resource, render_resource, write_resource};

/// Files handed to one worker parser at a time.
const FILES_PER_SHARD: usize = 32;

/// Where a scan reads from and writes to.
#[derive(Debug, Clone)]
pub struct ScanRoots {
    pub source_root: PathBuf,
    pub output_root: PathBuf,
}

/// One rendered resource file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub language: String,
    pub namespace: String,
    pub path: PathBuf,
    pub contents: String,
    /// Leaf keys in the namespace table.
    pub key_count: usize,
    /// How `contents` compares with the file on disk.
    pub status: WriteStatus,
}

#[derive(Debug)]
pub struct ScanOutcome {
    pub resources: Resources,
    pub artifacts: Vec<Artifact>,
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub references: usize,
}

impl ScanOutcome {
    /// Artifacts whose file is missing or differs from the rendered content.
    pub fn stale(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts
            .iter()
            .filter(|artifact| artifact.status != WriteStatus::Unchanged)
    }
}

/// Per-shard result of the parallel phase.
struct Shard {
    parser: Parser,
    scanned: usize,
    skipped: usize,
    references: usize,
}

/// Extensions handled by at least one strategy.
pub fn source_extensions(options: &ScanOptions) -> Vec<String> {
    let mut extensions: Vec<String> = Vec::new();
    let lists = [
        &options.attr.extensions,
        &options.func.extensions,
        &options.trans.extensions,
    ];
    for extension in lists.into_iter().flatten() {
        if !extensions.iter().any(|known| known.eq_ignore_ascii_case(extension)) {
            extensions.push(extension.clone());
        }
    }
    extensions
}

/// Scan the source tree and compute resource artifacts without writing them.
pub fn scan(config: &Config, roots: &ScanRoots) -> Result<ScanOutcome> {
    let root = Parser::new(config.scanner.clone()).context("Invalid 'scanner' options")?;
    let options = root.options();

    let discovered = scan_files(
        &roots.source_root,
        &config.includes,
        &config.ignores,
        &source_extensions(options),
    );
    debug!(files = discovered.files.len(), "discovered source files");

    // Shards come back in file order, so folding them sequentially matches
    // a single-threaded scan.
    let shards: Vec<Shard> = discovered
        .files
        .par_chunks(FILES_PER_SHARD)
        .map(|chunk| scan_shard(&root, chunk))
        .collect();

    let mut scanned = root.fork();
    let mut files_scanned = 0;
    let mut files_skipped = discovered.skipped_count;
    let mut references = 0;
    for shard in shards {
        files_scanned += shard.scanned;
        files_skipped += shard.skipped;
        references += shard.references;
        scanned.merge(shard.parser);
    }

    let output = reconcile(scanned, &roots.output_root)?;
    let resources = output.get(options.sort);
    let artifacts = render_artifacts(&output, &resources, &roots.output_root)?;

    Ok(ScanOutcome {
        resources,
        artifacts,
        files_scanned,
        files_skipped,
        references,
    })
}

/// Write every stale artifact to disk, updating statuses in place.
pub fn write_artifacts(artifacts: &mut [Artifact]) -> Result<()> {
    for artifact in artifacts.iter_mut() {
        artifact.status = write_resource(&artifact.path, &artifact.contents)?;
    }
    Ok(())
}

fn scan_shard(root: &Parser, chunk: &[PathBuf]) -> Shard {
    let mut shard = Shard {
        parser: root.fork(),
        scanned: 0,
        skipped: 0,
        references: 0,
    };

    for path in chunk {
        let _span = debug_span!("file", path = %path.display()).entered();
        match read_source(path) {
            Some(text) => {
                shard.references += scan_source(&mut shard.parser, path, &text);
                shard.scanned += 1;
            }
            None => shard.skipped += 1,
        }
    }
    shard
}

fn read_source(path: &Path) -> Option<String> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(error = %err, "cannot read file; skipping");
            return None;
        }
    };
    match String::from_utf8(bytes) {
        Ok(text) => Some(text),
        Err(_) => {
            warn!("file is not valid UTF-8; skipping");
            None
        }
    }
}

/// Run every strategy whose extension list matches `path`.
fn scan_source(parser: &mut Parser, path: &Path, text: &str) -> usize {
    let options = parser.options();
    let use_attr = has_extension(path, &options.attr.extensions);
    let use_func = has_extension(path, &options.func.extensions);
    let use_trans = has_extension(path, &options.trans.extensions);

    let mut found = 0;
    if use_attr {
        found += parser.parse_attr_from_string(text);
    }
    if use_func {
        found += parser.parse_func_from_string(text);
    }
    if use_trans {
        found += parser.parse_trans_from_string(text);
    }
    debug!(references = found, "scanned file");
    found
}

/// Combine the scan result with existing resource files.
///
/// Loaded values are inserted first so existing translations win. With
/// `removeUnusedKeys`, anything the scan did not discover is dropped.
fn reconcile(scanned: Parser, output_root: &Path) -> Result<Parser> {
    let options = scanned.options();
    if options.resource.load_path.is_none() {
        return Ok(scanned);
    }

    let mut output = scanned.fork();
    let snapshot = scanned.get(false);
    for (language, namespace, _) in snapshot.tables() {
        let Some(relative) = scanned.format_resource_load_path(language, namespace) else {
            continue;
        };
        let path = output_root.join(relative);
        if let Some(table) = load_resource(&path)? {
            debug!(path = %path.display(), "loaded existing resource");
            output.store_mut().insert_table(language, namespace, &table);
        }
    }

    let remove_unused = options.remove_unused_keys;
    let scanned_store = scanned.into_store();
    if remove_unused {
        output.store_mut().prune_to(&scanned_store);
    }
    output.store_mut().merge(scanned_store);
    Ok(output)
}

fn render_artifacts(parser: &Parser, resources: &Resources, output_root: &Path) -> Result<Vec<Artifact>> {
    let options = &parser.options().resource;
    resources
        .tables()
        .map(|(language, namespace, table)| -> Result<Artifact> {
            let path = output_root.join(parser.format_resource_save_path(language, namespace));
            let contents = render_resource(table, options.json_indent, options.line_ending)
                .with_context(|| format!("Failed to render {}/{}", language, namespace))?;
            let status = compare_resource(&path, &contents);
            Ok(Artifact {
                language: language.to_string(),
                namespace: namespace.to_string(),
                path,
                contents,
                key_count: count_leaves(table),
                status,
            })
        })
        .collect()
}

fn count_leaves(table: &Table) -> usize {
    table
        .values()
        .map(|value| match value {
            Value::Object(child) => count_leaves(child),
            _ => 1,
        })
        .sum()
}
