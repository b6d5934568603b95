//! Attribute strategy: keys declared directly in markup, e.g.
//! `<button data-i18n="[title]nav.home;nav.home.label">`.

use regex::Regex;

use crate::core::{
    key::KeyReference,
    options::{AttrOptions, OptionsError},
    trans::markup::decode_entities,
};

#[derive(Debug, Clone)]
pub struct AttrStrategy {
    pattern: Regex,
}

impl AttrStrategy {
    pub fn new(options: &AttrOptions) -> Result<Self, OptionsError> {
        let names = options
            .list
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|");
        // A value must close on its own line; unterminated values never match.
        let pattern = format!(
            r#"(?:^|\s)(?i:{names})\s*=\s*(?:"([^"\r\n<]*)"|'([^'\r\n<]*)')"#
        );
        let pattern = Regex::new(&pattern).map_err(|err| OptionsError::Pattern(err.to_string()))?;

        Ok(Self { pattern })
    }

    pub fn extract(&self, text: &str) -> Vec<KeyReference> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .flat_map(|value| split_keys(&decode_entities(value.as_str())))
            .map(KeyReference::new)
            .collect()
    }
}

/// Split `[attr]a;b` style values into bare keys.
fn split_keys(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(|entry| {
            let entry = entry.trim();
            match entry.strip_prefix('[').and_then(|rest| rest.split_once(']')) {
                Some((_, key)) => key.trim(),
                None => entry,
            }
        })
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}
