use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use glob::{Pattern, glob};
use tracing::warn;
use walkdir::WalkDir;

/// Always skipped, whatever the configuration says.
const BUILTIN_IGNORES: &[&str] = &["**/node_modules/**"];

/// Directories never descended into.
const BUILTIN_IGNORED_DIRS: &[&str] = &["node_modules"];

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of discovering source files.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Matching files, sorted.
    pub files: Vec<PathBuf>,
    pub skipped_count: usize,
}

/// Find files under `base_dir` whose name ends with one of `extensions`.
///
/// `includes` narrows the walk to literal directories or glob matches; an
/// empty list walks `base_dir` itself. `ignores` entries are literal path
/// prefixes or glob patterns.
pub fn scan_files(base_dir: &Path, includes: &[String], ignores: &[String], extensions: &[String]) -> ScanResult {
    let mut files = BTreeSet::new();
    let mut skipped_count = 0;

    let ignores = Ignores::new(base_dir, ignores);

    let roots: Vec<PathBuf> = if includes.is_empty() {
        vec![base_dir.to_path_buf()]
    } else {
        let mut roots = Vec::new();
        for include in includes {
            if is_glob_pattern(include) {
                let full_pattern = base_dir.join(include);
                match glob(&full_pattern.to_string_lossy()) {
                    Ok(entries) => roots.extend(entries.flatten()),
                    Err(err) => warn!(pattern = %include, error = %err, "invalid include pattern"),
                }
            } else {
                let path = base_dir.join(include);
                if path.exists() {
                    roots.push(path);
                } else {
                    warn!(path = %path.display(), "include path does not exist");
                }
            }
        }
        roots
    };

    for root in roots {
        let walker = WalkDir::new(root)
            .into_iter()
            .filter_entry(|entry| !(entry.file_type().is_dir() && ignores.prunes_dir(entry.path())));
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    skipped_count += 1;
                    warn!(error = %err, "cannot access path");
                    continue;
                }
            };
            let path = entry.path();
            if ignores.matches(path) {
                continue;
            }

            if entry.file_type().is_file() && has_extension(path, extensions) {
                files.insert(path.to_path_buf());
            }
        }
    }

    ScanResult {
        files: files.into_iter().collect(),
        skipped_count,
    }
}

/// Compiled `ignores`, plus the built-in ones.
struct Ignores {
    literal_paths: Vec<PathBuf>,
    patterns: Vec<Pattern>,
}

impl Ignores {
    fn new(base_dir: &Path, ignores: &[String]) -> Self {
        let mut literal_paths = Vec::new();
        let mut patterns: Vec<Pattern> = BUILTIN_IGNORES
            .iter()
            .filter_map(|pattern| Pattern::new(pattern).ok())
            .collect();

        for ignore in ignores {
            if is_glob_pattern(ignore) {
                match Pattern::new(ignore) {
                    Ok(pattern) => patterns.push(pattern),
                    Err(err) => warn!(pattern = %ignore, error = %err, "invalid ignore pattern"),
                }
            } else {
                literal_paths.push(base_dir.join(ignore));
            }
        }

        Self { literal_paths, patterns }
    }

    fn matches(&self, path: &Path) -> bool {
        if self.literal_paths.iter().any(|ignore_path| path.starts_with(ignore_path)) {
            return true;
        }
        let path_str = path.to_string_lossy();
        self.patterns.iter().any(|pattern| pattern.matches(&path_str))
    }

    /// Whether nothing below `dir` can be scanned, so the walk can skip it.
    fn prunes_dir(&self, dir: &Path) -> bool {
        let builtin = dir
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| BUILTIN_IGNORED_DIRS.contains(&name));
        builtin || self.matches(dir)
    }
}

/// Case-insensitive suffix match, so `.d.ts` style extensions work too.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    let name = name.to_ascii_lowercase();
    extensions
        .iter()
        .any(|extension| name.ends_with(&extension.to_ascii_lowercase()))
}
