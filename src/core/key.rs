//! Key references and their resolution into storage paths.
//!
//! A [`KeyReference`] is what a strategy reports for one usage site. The
//! [`KeyResolver`] applies the namespace, context and plural rules from the
//! options and yields every concrete key path the reference occupies in one
//! language.

use tracing::debug;

use crate::core::options::{ContextOptions, PluralOptions, ScanOptions};

/// One discovered usage of a translation key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyReference {
    /// The key as written in source. May carry a `ns:` prefix.
    pub key: String,
    /// Explicit namespace, e.g. from `{ ns: "common" }`.
    pub namespace: Option<String>,
    pub default_value: Option<String>,
    pub context: Option<String>,
    pub has_count: bool,
}

impl KeyReference {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_default_value(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_count(mut self, has_count: bool) -> Self {
        self.has_count = has_count;
        self
    }
}

/// Where a reference lands in one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKeys {
    pub namespace: String,
    /// Key paths, already split by the key separator, in insertion order.
    pub paths: Vec<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct KeyResolver {
    default_ns: String,
    key_separator: Option<String>,
    ns_separator: Option<String>,
    context: ContextOptions,
    plural: PluralOptions,
}

impl KeyResolver {
    pub fn new(options: &ScanOptions) -> Self {
        Self {
            default_ns: options.default_ns.clone(),
            key_separator: options.key_separator.clone(),
            ns_separator: options.ns_separator.clone(),
            context: options.context.clone(),
            plural: options.plural.clone(),
        }
    }

    /// Resolve `reference` for `language`.
    ///
    /// Returns `None` when the key is empty after stripping the namespace
    /// prefix, or when the namespace cannot be used as a file name.
    pub fn resolve(&self, language: &str, reference: &KeyReference) -> Option<ResolvedKeys> {
        let (prefix, key) = self.split_namespace(&reference.key);
        if key.is_empty() {
            return None;
        }

        let namespace = reference
            .namespace
            .as_deref()
            .filter(|ns| !ns.is_empty())
            .or(prefix)
            .unwrap_or(&self.default_ns)
            .to_string();
        if !is_file_name(&namespace) {
            debug!(%namespace, key = %reference.key, "skipping key with a namespace that is not a file name");
            return None;
        }

        let mut keys = Vec::with_capacity(2);
        match reference
            .context
            .as_deref()
            .filter(|context| self.context.enabled && !context.is_empty())
        {
            Some(context) => {
                if self.context.fallback {
                    keys.push(key.to_string());
                }
                keys.push(format!("{}{}{}", key, self.context.separator, context));
            }
            None => keys.push(key.to_string()),
        }

        if reference.has_count && self.plural.enabled {
            let forms = self.plural.forms_for(language);
            keys = keys
                .into_iter()
                .flat_map(|key| {
                    let variants = forms
                        .iter()
                        .map(|form| format!("{}{}{}", key, self.plural.separator, form))
                        .collect::<Vec<_>>();
                    self.plural.fallback.then_some(key).into_iter().chain(variants)
                })
                .collect();
        }

        // A key that does not split cleanly, like a sentence ending in `.`,
        // is stored flat along with all of its variants.
        let flat = self.split_path(key).is_none();
        let paths = keys
            .into_iter()
            .map(|key| match self.split_path(&key) {
                Some(segments) if !flat => segments,
                _ => vec![key],
            })
            .collect();

        Some(ResolvedKeys { namespace, paths })
    }

    fn split_namespace<'k>(&self, key: &'k str) -> (Option<&'k str>, &'k str) {
        let Some(separator) = self.ns_separator.as_deref() else {
            return (None, key);
        };
        match key.split_once(separator) {
            Some((namespace, rest)) => (Some(namespace).filter(|ns| !ns.is_empty()), rest),
            None => (None, key),
        }
    }

    /// `None` when the key separator would produce an empty segment.
    fn split_path(&self, key: &str) -> Option<Vec<String>> {
        let Some(separator) = self.key_separator.as_deref() else {
            return Some(vec![key.to_string()]);
        };
        let segments: Vec<String> = key.split(separator).map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return None;
        }
        Some(segments)
    }
}

/// Whether `name` can be substituted into a resource path as a single
/// file name component.
pub fn is_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', ':', '\0'])
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn resolver() -> KeyResolver {
        KeyResolver::new(&ScanOptions::default())
    }

    fn paths(resolved: &ResolvedKeys) -> Vec<String> {
        resolved.paths.iter().map(|path| path.join(".")).collect()
    }

    #[test]
    fn test_plain_key_uses_default_namespace() {
        let resolved = resolver().resolve("en", &KeyReference::new("greeting")).unwrap();
        assert_eq!(resolved.namespace, "translation");
        assert_eq!(resolved.paths, vec![vec!["greeting".to_string()]]);
    }

    #[test]
    fn test_namespace_prefix_is_stripped() {
        let resolved = resolver().resolve("en", &KeyReference::new("common:title")).unwrap();
        assert_eq!(resolved.namespace, "common");
        assert_eq!(paths(&resolved), vec!["title"]);
    }

    #[test]
    fn test_explicit_namespace_wins_over_prefix() {
        let reference = KeyReference::new("common:title").with_namespace("admin");
        let resolved = resolver().resolve("en", &reference).unwrap();
        assert_eq!(resolved.namespace, "admin");
        assert_eq!(paths(&resolved), vec!["title"]);
    }

    #[test]
    fn test_empty_prefix_falls_back_to_default_namespace() {
        let resolved = resolver().resolve("en", &KeyReference::new(":title")).unwrap();
        assert_eq!(resolved.namespace, "translation");
    }

    #[test]
    fn test_empty_keys_are_discarded() {
        let resolver = resolver();
        assert_eq!(resolver.resolve("en", &KeyReference::new("")), None);
        assert_eq!(resolver.resolve("en", &KeyReference::new("common:")), None);
    }

    #[test]
    fn test_keys_with_empty_segments_are_stored_flat() {
        let resolver = resolver();
        for key in ["Welcome back.", "a..b", ".hidden", "Wait... what?"] {
            let resolved = resolver.resolve("en", &KeyReference::new(key)).unwrap();
            assert_eq!(resolved.paths, vec![vec![key.to_string()]], "{key:?}");
        }
    }

    #[test]
    fn test_flat_key_variants_stay_flat() {
        let reference = KeyReference::new("You have items.")
            .with_context("male")
            .with_count(true);
        let resolved = resolver().resolve("en", &reference).unwrap();
        assert!(resolved.paths.iter().all(|path| path.len() == 1));
        assert_eq!(
            paths(&resolved),
            vec![
                "You have items.",
                "You have items._plural",
                "You have items._male",
                "You have items._male_plural",
            ]
        );
    }

    #[test]
    fn test_namespaces_that_escape_the_output_directory_are_discarded() {
        let resolver = resolver();
        let escaping = [
            KeyReference::new("key").with_namespace("../../../../tmp/pwned"),
            KeyReference::new("key").with_namespace("nested/common"),
            KeyReference::new("key").with_namespace(r"..\windows"),
            KeyReference::new("key").with_namespace(".."),
            KeyReference::new("../../x:key"),
            KeyReference::new("..:key"),
        ];
        for reference in &escaping {
            assert_eq!(resolver.resolve("en", reference), None, "{reference:?}");
        }

        let resolved = resolver
            .resolve("en", &KeyReference::new("key").with_namespace("common.v2"))
            .unwrap();
        assert_eq!(resolved.namespace, "common.v2");
    }

    #[test]
    fn test_is_file_name() {
        assert!(is_file_name("translation"));
        assert!(is_file_name("common.v2"));
        assert!(!is_file_name(""));
        assert!(!is_file_name("."));
        assert!(!is_file_name(".."));
        assert!(!is_file_name("a/b"));
        assert!(!is_file_name(r"a\b"));
        assert!(!is_file_name("C:"));
    }

    #[test]
    fn test_key_separator_nests_paths() {
        let resolved = resolver().resolve("en", &KeyReference::new("menu.file.open")).unwrap();
        assert_eq!(
            resolved.paths,
            vec![vec!["menu".to_string(), "file".to_string(), "open".to_string()]]
        );
    }

    #[test]
    fn test_disabled_separators_keep_key_verbatim() {
        let options = ScanOptions {
            key_separator: None,
            ns_separator: None,
            ..Default::default()
        };
        let resolved = KeyResolver::new(&options)
            .resolve("en", &KeyReference::new("Note: see docs."))
            .unwrap();
        assert_eq!(resolved.namespace, "translation");
        assert_eq!(paths(&resolved), vec!["Note: see docs."]);
    }

    #[test]
    fn test_plural_variants() {
        let reference = KeyReference::new("item").with_count(true);
        let resolved = resolver().resolve("en", &reference).unwrap();
        assert_eq!(paths(&resolved), vec!["item", "item_plural"]);
    }

    #[test]
    fn test_plural_without_fallback() {
        let mut options = ScanOptions::default();
        options.plural.fallback = false;
        options.plural.forms = vec!["one".into(), "other".into()];
        let reference = KeyReference::new("item").with_count(true);
        let resolved = KeyResolver::new(&options).resolve("en", &reference).unwrap();
        assert_eq!(paths(&resolved), vec!["item_one", "item_other"]);
    }

    #[test]
    fn test_plural_forms_per_language() {
        let mut options = ScanOptions::default();
        options
            .plural
            .forms_by_language
            .insert("ru".into(), vec!["0".into(), "1".into(), "2".into()]);
        let resolver = KeyResolver::new(&options);
        let reference = KeyReference::new("apple").with_count(true);

        let en = resolver.resolve("en", &reference).unwrap();
        let ru = resolver.resolve("ru", &reference).unwrap();
        assert_eq!(paths(&en), vec!["apple", "apple_plural"]);
        assert_eq!(paths(&ru), vec!["apple", "apple_0", "apple_1", "apple_2"]);
    }

    #[test]
    fn test_context_and_plural_combine() {
        let reference = KeyReference::new("friend").with_context("male").with_count(true);
        let resolved = resolver().resolve("en", &reference).unwrap();
        assert_eq!(
            paths(&resolved),
            vec!["friend", "friend_plural", "friend_male", "friend_male_plural"]
        );
    }

    #[test]
    fn test_context_without_fallback() {
        let mut options = ScanOptions::default();
        options.context.fallback = false;
        let reference = KeyReference::new("friend").with_context("female");
        let resolved = KeyResolver::new(&options).resolve("en", &reference).unwrap();
        assert_eq!(paths(&resolved), vec!["friend_female"]);
    }

    #[test]
    fn test_disabled_context_and_plural_are_ignored() {
        let mut options = ScanOptions::default();
        options.context.enabled = false;
        options.plural.enabled = false;
        let reference = KeyReference::new("friend").with_context("male").with_count(true);
        let resolved = KeyResolver::new(&options).resolve("en", &reference).unwrap();
        assert_eq!(paths(&resolved), vec!["friend"]);
    }
}
