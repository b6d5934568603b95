//! Extraction and aggregation engine.
//!
//! - `options`: validated scanner configuration
//! - `key`: key references and their resolution into storage paths
//! - `store`: the language -> namespace -> key tree accumulator
//! - `attr`, `func`, `trans`: the three extraction strategies
//! - `scan`, `literal`: balanced scanning and static evaluation helpers
//! - `path`: resource path templates
//! - `parser`: the orchestrator tying options, strategies and store together

pub mod attr;
pub mod func;
pub mod key;
pub mod literal;
pub mod options;
pub mod parser;
pub mod path;
pub mod scan;
pub mod store;
pub mod trans;

pub use key::{KeyReference, KeyResolver, ResolvedKeys};
pub use options::{OptionsError, RendererKind, ScanOptions};
pub use parser::Parser;
pub use path::ResourcePathFormatter;
pub use store::{ResourceStore, Resources, Table};
pub use trans::{IndexedRenderer, MarkupRenderer, VerbatimRenderer};
