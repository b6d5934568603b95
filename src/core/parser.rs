use std::sync::Arc;

use crate::core::{
    attr::AttrStrategy,
    func::FuncStrategy,
    key::KeyReference,
    options::{OptionsError, RendererKind, ScanOptions},
    path::ResourcePathFormatter,
    store::{ResourceStore, Resources},
    trans::{IndexedRenderer, MarkupRenderer, TransStrategy, VerbatimRenderer},
};

/// One scan session: validated options, the three strategies and the store
/// they write into.
///
/// A parser is single-threaded. Parallel scans [`fork`](Parser::fork) one
/// parser per worker and [`merge`](Parser::merge) them back in file order.
#[derive(Debug, Clone)]
pub struct Parser {
    options: ScanOptions,
    store: ResourceStore,
    attr: AttrStrategy,
    func: FuncStrategy,
    trans: TransStrategy,
    save_path: ResourcePathFormatter,
    load_path: Option<ResourcePathFormatter>,
}

impl Parser {
    /// Validate `options` and build a parser using the configured renderer.
    pub fn new(options: ScanOptions) -> Result<Self, OptionsError> {
        let renderer: Arc<dyn MarkupRenderer> = match options.trans.renderer {
            RendererKind::Verbatim => Arc::new(VerbatimRenderer::new(&options.interpolation)),
            RendererKind::Indexed => Arc::new(IndexedRenderer::new(&options.interpolation, &options.trans)),
        };
        Self::with_renderer(options, renderer)
    }

    /// Like [`Parser::new`], with a caller-supplied markup renderer.
    pub fn with_renderer(options: ScanOptions, renderer: Arc<dyn MarkupRenderer>) -> Result<Self, OptionsError> {
        options.validate()?;

        let language_count = options.languages.len();
        let save_path = ResourcePathFormatter::new(&options.resource.save_path, language_count)?;
        let load_path = options
            .resource
            .load_path
            .as_deref()
            .map(|template| ResourcePathFormatter::new(template, language_count))
            .transpose()?;

        Ok(Self {
            store: seeded_store(&options),
            attr: AttrStrategy::new(&options.attr)?,
            func: FuncStrategy::new(&options.func)?,
            trans: TransStrategy::new(&options.trans, renderer)?,
            save_path,
            load_path,
            options,
        })
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Extract attribute keys from markup. Returns the number of references stored.
    pub fn parse_attr_from_string(&mut self, text: &str) -> usize {
        let references = self.attr.extract(text);
        self.merge_references(&references)
    }

    /// Extract translation function calls. Returns the number of references stored.
    pub fn parse_func_from_string(&mut self, text: &str) -> usize {
        let references = self.func.extract(text);
        self.merge_references(&references)
    }

    /// Extract translation components. Returns the number of references stored.
    pub fn parse_trans_from_string(&mut self, text: &str) -> usize {
        let references = self.trans.extract(text);
        self.merge_references(&references)
    }

    /// Merge a hand-built reference into every configured language.
    ///
    /// Returns `false` when the reference was discarded, e.g. for an empty key.
    pub fn set(&mut self, reference: &KeyReference) -> bool {
        let mut stored = false;
        for language in &self.options.languages {
            stored |= self.store.merge_key(language, reference);
        }
        stored
    }

    pub fn get(&self, sort: bool) -> Resources {
        self.store.get(sort)
    }

    pub fn format_resource_save_path(&self, language: &str, namespace: &str) -> String {
        self.save_path.format(language, namespace)
    }

    /// `None` when no load path is configured.
    pub fn format_resource_load_path(&self, language: &str, namespace: &str) -> Option<String> {
        self.load_path
            .as_ref()
            .map(|template| template.format(language, namespace))
    }

    /// A parser with the same configuration and a fresh, seeded store.
    pub fn fork(&self) -> Self {
        Self {
            options: self.options.clone(),
            store: seeded_store(&self.options),
            attr: self.attr.clone(),
            func: self.func.clone(),
            trans: self.trans.clone(),
            save_path: self.save_path.clone(),
            load_path: self.load_path.clone(),
        }
    }

    /// Fold another parser's store into this one. Values already here win.
    pub fn merge(&mut self, other: Parser) {
        self.store.merge(other.store);
    }

    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ResourceStore {
        &mut self.store
    }

    pub fn into_store(self) -> ResourceStore {
        self.store
    }

    fn merge_references(&mut self, references: &[KeyReference]) -> usize {
        references
            .iter()
            .filter(|reference| self.set(reference))
            .count()
    }
}

/// Empty tables for every language, covering the configured namespaces and
/// the default namespace.
fn seeded_store(options: &ScanOptions) -> ResourceStore {
    let mut store = ResourceStore::new(options);
    for language in &options.languages {
        for namespace in &options.namespaces {
            store.ensure_namespace(language, namespace);
        }
        store.ensure_namespace(language, &options.default_ns);
    }
    store
}
