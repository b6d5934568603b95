use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde_json::{Value, ser::PrettyFormatter};

use crate::core::{Table, options::LineEnding};

/// Serialize a namespace table as a resource file.
///
/// `indent` spaces per level (0 writes compact JSON), `\n` replaced by the
/// requested line ending, and exactly one trailing line ending.
pub fn render_resource(table: &Table, indent: usize, line_ending: LineEnding) -> Result<String> {
    let mut buffer = Vec::new();
    if indent == 0 {
        serde_json::to_writer(&mut buffer, table).context("Failed to serialize JSON")?;
    } else {
        let indent = " ".repeat(indent);
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        table
            .serialize(&mut serializer)
            .context("Failed to serialize JSON")?;
    }

    let json = String::from_utf8(buffer).context("Serialized JSON is not UTF-8")?;
    let eol = line_ending.as_str();
    let mut content = if eol == "\n" { json } else { json.replace('\n', eol) };
    content.push_str(eol);
    Ok(content)
}

/// Read an existing resource file. A missing file is `Ok(None)`.
pub fn load_resource(path: &Path) -> Result<Option<Table>> {
    if !path.exists() {
        return Ok(None);
    }

    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON: {}", path.display()))?;
    match value {
        Value::Object(table) => Ok(Some(table)),
        _ => bail!("Root of JSON file must be an object: {}", path.display()),
    }
}

/// Outcome of writing one resource file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Created,
    Updated,
    Unchanged,
}

impl WriteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteStatus::Created => "created",
            WriteStatus::Updated => "updated",
            WriteStatus::Unchanged => "unchanged",
        }
    }
}

/// Compare `content` with what is on disk without writing anything.
pub fn compare_resource(path: &Path, content: &str) -> WriteStatus {
    match fs::read_to_string(path) {
        Ok(existing) if existing == content => WriteStatus::Unchanged,
        Ok(_) => WriteStatus::Updated,
        Err(_) if path.exists() => WriteStatus::Updated,
        Err(_) => WriteStatus::Created,
    }
}

/// Write `content` to `path`, creating parent directories. Files that
/// already hold exactly `content` are left untouched.
pub fn write_resource(path: &Path, content: &str) -> Result<WriteStatus> {
    let status = compare_resource(path, content);
    if status == WriteStatus::Unchanged {
        return Ok(status);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))?;
    Ok(status)
}
