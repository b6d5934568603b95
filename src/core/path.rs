//! Resource path templates.

use crate::core::options::OptionsError;

const LANGUAGE_TOKEN: &str = "{{lng}}";
const NAMESPACE_TOKEN: &str = "{{ns}}";

/// Turns `(language, namespace)` into a resource file path.
///
/// The template is checked once at construction; formatting is a pure,
/// single-pass substitution, so a language or namespace that itself contains
/// `{{ns}}` is never substituted twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePathFormatter {
    template: String,
}

impl ResourcePathFormatter {
    /// `{{ns}}` is always required. `{{lng}}` may only be omitted when a single
    /// language is configured, otherwise every language would write the same file.
    pub fn new(template: &str, language_count: usize) -> Result<Self, OptionsError> {
        if !template.contains(NAMESPACE_TOKEN) {
            return Err(OptionsError::MissingPlaceholder {
                template: template.to_string(),
                placeholder: NAMESPACE_TOKEN,
            });
        }
        if language_count > 1 && !template.contains(LANGUAGE_TOKEN) {
            return Err(OptionsError::MissingPlaceholder {
                template: template.to_string(),
                placeholder: LANGUAGE_TOKEN,
            });
        }

        Ok(Self {
            template: template.to_string(),
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn format(&self, language: &str, namespace: &str) -> String {
        let mut formatted = String::with_capacity(self.template.len() + 16);
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find("{{") {
            formatted.push_str(&rest[..start]);
            let tail = &rest[start..];
            if let Some(after) = tail.strip_prefix(LANGUAGE_TOKEN) {
                formatted.push_str(language);
                rest = after;
            } else if let Some(after) = tail.strip_prefix(NAMESPACE_TOKEN) {
                formatted.push_str(namespace);
                rest = after;
            } else {
                formatted.push_str("{{");
                rest = &tail[2..];
            }
        }
        formatted.push_str(rest);

        formatted
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_format_substitutes_both_tokens() {
        let formatter = ResourcePathFormatter::new("locales/{{lng}}/{{ns}}.json", 1).unwrap();
        assert_eq!(formatter.format("en", "common"), "locales/en/common.json");
    }

    #[test]
    fn test_format_repeated_and_unknown_tokens() {
        let formatter = ResourcePathFormatter::new("{{lng}}/{{ns}}.{{lng}}.{{other}}.json", 2).unwrap();
        assert_eq!(formatter.format("de", "app"), "de/app.de.{{other}}.json");
    }

    #[test]
    fn test_format_does_not_substitute_twice() {
        let formatter = ResourcePathFormatter::new("{{lng}}/{{ns}}.json", 1).unwrap();
        assert_eq!(formatter.format("{{ns}}", "x"), "{{ns}}/x.json");
    }

    #[test]
    fn test_namespace_token_is_required() {
        let result = ResourcePathFormatter::new("locales/{{lng}}.json", 1);
        assert_eq!(
            result,
            Err(OptionsError::MissingPlaceholder {
                template: "locales/{{lng}}.json".to_string(),
                placeholder: "{{ns}}",
            })
        );
    }

    #[test]
    fn test_language_token_only_required_for_several_languages() {
        assert!(ResourcePathFormatter::new("locales/{{ns}}.json", 1).is_ok());
        assert!(ResourcePathFormatter::new("locales/{{ns}}.json", 2).is_err());
    }
}
