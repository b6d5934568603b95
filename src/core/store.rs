//! The resource store: `language -> namespace -> key tree -> value`.
//!
//! Insertion order is preserved at every level (serde_json `preserve_order`),
//! so unsorted output lists languages, namespaces and keys in first-seen order.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::core::{
    key::{KeyReference, KeyResolver},
    options::ScanOptions,
};

/// One namespace's key tree.
pub type Table = Map<String, Value>;

/// Immutable snapshot returned by [`ResourceStore::get`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Resources(Map<String, Value>);

impl Resources {
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn namespace(&self, language: &str, namespace: &str) -> Option<&Table> {
        self.0.get(language)?.get(namespace)?.as_object()
    }

    /// Every `(language, namespace, table)` in snapshot order.
    pub fn tables(&self) -> impl Iterator<Item = (&str, &str, &Table)> {
        self.0
            .iter()
            .filter_map(|(language, namespaces)| Some((language.as_str(), namespaces.as_object()?)))
            .flat_map(|(language, namespaces)| {
                namespaces
                    .iter()
                    .filter_map(move |(namespace, table)| Some((language, namespace.as_str(), table.as_object()?)))
            })
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct ResourceStore {
    resolver: KeyResolver,
    /// Stored for keys without a default. Replaceable by a real default.
    placeholder: String,
    resources: Map<String, Value>,
    /// Conflicts already logged, as `(namespace, key, detail)`.
    reported: HashSet<(String, String, String)>,
}

impl ResourceStore {
    pub fn new(options: &ScanOptions) -> Self {
        Self {
            resolver: KeyResolver::new(options),
            placeholder: options.default_value.clone(),
            resources: Map::new(),
            reported: HashSet::new(),
        }
    }

    /// Create an empty table for `(language, namespace)` if none exists.
    pub fn ensure_namespace(&mut self, language: &str, namespace: &str) {
        table_mut(&mut self.resources, language, namespace);
    }

    /// Merge one reference into `language` under the overwrite policy.
    /// Returns `false` when the reference resolves to no storable key.
    pub fn merge_key(&mut self, language: &str, reference: &KeyReference) -> bool {
        let Some(resolved) = self.resolver.resolve(language, reference) else {
            debug!(key = %reference.key, "skipping unresolvable key");
            return false;
        };

        let value = reference
            .default_value
            .as_deref()
            .filter(|value| !value.is_empty())
            .unwrap_or(&self.placeholder)
            .to_string();

        for path in &resolved.paths {
            self.merge_path(language, &resolved.namespace, path, &value);
        }
        true
    }

    /// Merge an existing table, e.g. one loaded from disk, into `(language, namespace)`.
    pub fn insert_table(&mut self, language: &str, namespace: &str, table: &Table) {
        let mut conflicts = Vec::new();
        if let Some(target) = table_mut(&mut self.resources, language, namespace) {
            merge_table(target, table, &self.placeholder, &mut Vec::new(), &mut conflicts);
        }
        self.report(namespace, conflicts);
    }

    /// Fold `other` into this store, keeping this store's values on conflict.
    pub fn merge(&mut self, other: ResourceStore) {
        self.reported.extend(other.reported);
        for (language, namespaces) in other.resources {
            let Value::Object(namespaces) = namespaces else {
                continue;
            };
            for (namespace, table) in namespaces {
                if let Value::Object(table) = table {
                    self.insert_table(&language, &namespace, &table);
                }
            }
        }
    }

    /// Drop every key that does not also exist in `reference`.
    ///
    /// Languages and namespaces are kept, even when they end up empty.
    pub fn prune_to(&mut self, reference: &ResourceStore) {
        for (language, namespaces) in self.resources.iter_mut() {
            let Value::Object(namespaces) = namespaces else {
                continue;
            };
            for (namespace, table) in namespaces.iter_mut() {
                let Value::Object(table) = table else {
                    continue;
                };
                match reference
                    .resources
                    .get(language)
                    .and_then(|namespaces| namespaces.get(namespace))
                    .and_then(Value::as_object)
                {
                    Some(kept) => prune_table(table, kept),
                    None => table.clear(),
                }
            }
        }
    }

    /// Snapshot the store. With `sort`, keys inside every namespace are
    /// ordered lexicographically at every depth.
    pub fn get(&self, sort: bool) -> Resources {
        let mut resources = self.resources.clone();
        if sort {
            for namespaces in resources.values_mut() {
                if let Value::Object(namespaces) = namespaces {
                    for table in namespaces.values_mut() {
                        table.sort_all_objects();
                    }
                }
            }
        }
        Resources(resources)
    }

    fn merge_path(&mut self, language: &str, namespace: &str, path: &[String], value: &str) {
        let Some(table) = table_mut(&mut self.resources, language, namespace) else {
            return;
        };
        if let Some(conflict) = insert_path(table, path, value, &self.placeholder) {
            self.report(namespace, vec![conflict]);
        }
    }

    fn report(&mut self, namespace: &str, conflicts: Vec<Conflict>) {
        for conflict in conflicts {
            let marker = (namespace.to_string(), conflict.key.clone(), conflict.detail.to_string());
            if !self.reported.insert(marker) {
                continue;
            }
            match conflict.detail {
                ConflictDetail::Path => {
                    warn!(namespace, key = %conflict.key, "key path conflicts with an existing entry; skipping");
                }
                ConflictDetail::Value { kept, ignored } => {
                    warn!(
                        namespace,
                        key = %conflict.key,
                        kept = %kept,
                        ignored = %ignored,
                        "conflicting default values; keeping the first"
                    );
                }
            }
        }
    }
}

#[derive(Debug)]
struct Conflict {
    key: String,
    detail: ConflictDetail,
}

#[derive(Debug)]
enum ConflictDetail {
    /// A string sits where an object is needed, or the reverse.
    Path,
    Value { kept: String, ignored: String },
}

impl std::fmt::Display for ConflictDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictDetail::Path => write!(f, "path"),
            ConflictDetail::Value { ignored, .. } => write!(f, "value:{ignored}"),
        }
    }
}

impl Conflict {
    fn new(key: String, detail: ConflictDetail) -> Self {
        Self { key, detail }
    }

    fn path(key: String) -> Self {
        Self::new(key, ConflictDetail::Path)
    }
}

fn table_mut<'m>(resources: &'m mut Table, language: &str, namespace: &str) -> Option<&'m mut Table> {
    let namespaces = child_object(resources, language)?;
    child_object(namespaces, namespace)
}

fn child_object<'m>(map: &'m mut Table, name: &str) -> Option<&'m mut Table> {
    match map.entry(name).or_insert_with(|| Value::Object(Map::new())) {
        Value::Object(child) => Some(child),
        _ => None,
    }
}

/// A value that carries no information: empty, or the configured placeholder.
fn is_blank(value: &Value, placeholder: &str) -> bool {
    matches!(value, Value::String(text) if text.is_empty() || text == placeholder)
}

/// Apply the overwrite policy to one leaf. Returns the conflict to report, if any.
fn merge_leaf(existing: &mut Value, incoming: &Value, placeholder: &str) -> Option<ConflictDetail> {
    if existing.is_object() || incoming.is_object() {
        return (existing.is_object() != incoming.is_object()).then_some(ConflictDetail::Path);
    }
    if existing == incoming || is_blank(incoming, placeholder) {
        return None;
    }
    if is_blank(existing, placeholder) {
        *existing = incoming.clone();
        return None;
    }
    Some(ConflictDetail::Value {
        kept: display_value(existing),
        ignored: display_value(incoming),
    })
}

fn insert_path(table: &mut Table, path: &[String], value: &str, placeholder: &str) -> Option<Conflict> {
    let (leaf, parents) = path.split_last()?;

    let mut node = table;
    for segment in parents {
        node = match node
            .entry(segment.as_str())
            .or_insert_with(|| Value::Object(Map::new()))
        {
            Value::Object(child) => child,
            _ => return Some(Conflict::path(path.join("."))),
        };
    }

    let incoming = Value::String(value.to_string());
    match node.get_mut(leaf.as_str()) {
        None => {
            node.insert(leaf.clone(), incoming);
            None
        }
        Some(existing) => merge_leaf(existing, &incoming, placeholder)
            .map(|detail| Conflict::new(path.join("."), detail)),
    }
}

fn merge_table(
    target: &mut Table,
    source: &Table,
    placeholder: &str,
    path: &mut Vec<String>,
    conflicts: &mut Vec<Conflict>,
) {
    for (name, incoming) in source {
        path.push(name.clone());
        match target.get_mut(name) {
            None => {
                target.insert(name.clone(), incoming.clone());
            }
            Some(Value::Object(existing)) if incoming.is_object() => {
                if let Value::Object(incoming) = incoming {
                    merge_table(existing, incoming, placeholder, path, conflicts);
                }
            }
            Some(existing) => {
                if let Some(detail) = merge_leaf(existing, incoming, placeholder) {
                    conflicts.push(Conflict::new(path.join("."), detail));
                }
            }
        }
        path.pop();
    }
}

fn prune_table(table: &mut Table, kept: &Table) {
    table.retain(|name, value| match (value, kept.get(name)) {
        (_, None) => false,
        (Value::Object(children), Some(Value::Object(kept))) => {
            prune_table(children, kept);
            true
        }
        _ => true,
    });
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
