//! Component-markup strategy.
//!
//! Finds translation components such as `<Trans i18nKey="welcome">` in
//! markup, reads their key attributes, and flattens their children through
//! a [`MarkupRenderer`]. Without a key attribute the rendered text doubles as
//! key and default value.

pub mod markup;
pub mod render;


use std::sync::Arc;

use regex::Regex;
use tracing::debug;

use crate::core::{
    key::KeyReference,
    literal,
    options::{OptionsError, TransOptions},
    scan,
};

pub use markup::{AttrValue, Element, MarkupError, Node};
pub use render::{IndexedRenderer, MarkupRenderer, VerbatimRenderer};

#[derive(Debug, Clone)]
pub struct TransStrategy {
    opening: Regex,
    options: TransOptions,
    renderer: Arc<dyn MarkupRenderer>,
}

impl TransStrategy {
    pub fn new(options: &TransOptions, renderer: Arc<dyn MarkupRenderer>) -> Result<Self, OptionsError> {
        let mut names: Vec<&str> = options.component.iter().map(String::as_str).collect();
        names.sort_by_key(|name| std::cmp::Reverse(name.len()));
        let names = names.into_iter().map(regex::escape).collect::<Vec<_>>().join("|");
        let opening = Regex::new(&format!("<(?:{names})"))
            .map_err(|err| OptionsError::Pattern(err.to_string()))?;

        Ok(Self {
            opening,
            options: options.clone(),
            renderer,
        })
    }

    pub fn extract(&self, text: &str) -> Vec<KeyReference> {
        let mut references = Vec::new();
        let mut cursor = 0;

        while let Some(found) = self.opening.find_at(text, cursor) {
            // Step inside the tag so components nested in the children are found too.
            cursor = found.end();
            let boundary = text[found.end()..].chars().next();
            if !boundary.is_some_and(|c| c.is_whitespace() || c == '/' || c == '>') {
                continue;
            }

            match markup::parse_element(text, found.start()) {
                Ok((element, _)) => references.extend(self.reference(&element, text, found.start())),
                Err(err) => debug!(
                    line = scan::line_of(text, found.start()),
                    error = %err,
                    "skipping unparseable component"
                ),
            }
        }

        references
    }

    fn reference(&self, element: &Element, text: &str, offset: usize) -> Option<KeyReference> {
        let explicit_key = match element.attribute(&self.options.i18n_key) {
            Some(value) => match render::attribute_text(value) {
                Some(key) => Some(key),
                None => {
                    debug!(line = scan::line_of(text, offset), "skipping component with a dynamic key");
                    return None;
                }
            },
            None => None,
        };
        let defaults = element
            .attribute(&self.options.defaults_key)
            .and_then(render::attribute_text);
        let rendered = self.renderer.render(&element.children);

        let mut reference = match explicit_key.filter(|key| !key.is_empty()) {
            Some(key) => {
                let default_value = defaults.or_else(|| (!rendered.is_empty()).then_some(rendered));
                KeyReference {
                    key,
                    default_value,
                    ..Default::default()
                }
            }
            None if self.options.fallback_key && !rendered.is_empty() => KeyReference {
                default_value: Some(defaults.unwrap_or_else(|| rendered.clone())),
                key: rendered,
                ..Default::default()
            },
            None => {
                debug!(line = scan::line_of(text, offset), "skipping component without a key");
                return None;
            }
        };

        reference.namespace = element.attribute("ns").and_then(namespace_of);
        reference.context = element.attribute("context").and_then(render::attribute_text);
        reference.has_count = element.attribute("count").is_some();
        Some(reference)
    }
}

/// `ns="common"`, `ns={"common"}` or `ns={["common", "other"]}`.
fn namespace_of(value: &AttrValue) -> Option<String> {
    match value {
        AttrValue::Expression(source) => {
            literal::static_strings(&*literal::parse_expression(source)?)?.into_iter().next()
        }
        other => render::attribute_text(other),
    }
}
