//! Function-call strategy: `t('key')`, `i18n.t('key', 'Default')`,
//! `t(['a', 'b'], { ns: 'common', count })`.

use std::ops::Range;

use regex::Regex;
use swc_ecma_ast::{Expr, ExprOrSpread, ObjectLit};
use tracing::debug;

use crate::core::{
    key::KeyReference,
    literal::{self, Property},
    options::{FuncOptions, OptionsError},
    scan,
};

#[derive(Debug, Clone)]
pub struct FuncStrategy {
    pattern: Regex,
}

impl FuncStrategy {
    pub fn new(options: &FuncOptions) -> Result<Self, OptionsError> {
        let mut names: Vec<&str> = options.list.iter().map(String::as_str).collect();
        // Longest first, so `i18n.t` is preferred over `t` at the same offset.
        names.sort_by_key(|name| std::cmp::Reverse(name.len()));
        let names = names.into_iter().map(regex::escape).collect::<Vec<_>>().join("|");

        let pattern = Regex::new(&format!(r"(?:{names})\s*\("))
            .map_err(|err| OptionsError::Pattern(err.to_string()))?;
        Ok(Self { pattern })
    }

    pub fn extract(&self, text: &str) -> Vec<KeyReference> {
        let mut references = Vec::new();
        let mut cursor = 0;
        // Literals inside the argument lists of enclosing calls.
        let mut literals: Vec<Range<usize>> = Vec::new();

        while let Some(found) = self.pattern.find_at(text, cursor) {
            literals.retain(|span| span.end > found.start());
            if literals.iter().any(|span| span.contains(&found.start()))
                || text[..found.start()].chars().next_back().is_some_and(is_identifier_char)
            {
                cursor = next_char_boundary(text, found.start());
                continue;
            }
            // Resume right after `(` so calls nested in the arguments are found too.
            cursor = found.end();

            let open = found.end() - 1;
            let Some(close) = scan::find_closing(text, open) else {
                debug!(line = scan::line_of(text, found.start()), "skipping unbalanced call");
                continue;
            };
            literals.extend(scan::literal_spans(text, open + 1, close));

            match parse_call(&text[open + 1..close]) {
                Some(call) => references.extend(call),
                None => debug!(
                    line = scan::line_of(text, found.start()),
                    call = found.as_str(),
                    "skipping call without a static key"
                ),
            }
        }

        references
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn next_char_boundary(text: &str, offset: usize) -> usize {
    text[offset..]
        .chars()
        .next()
        .map_or(text.len(), |c| offset + c.len_utf8())
}

/// Evaluate an argument list. `None` when the key is not statically known.
fn parse_call(arguments: &str) -> Option<Vec<KeyReference>> {
    let expr = literal::parse_expression(&format!("[{arguments}]"))?;
    let Expr::Array(array) = *expr else {
        return None;
    };
    let args: Vec<&ExprOrSpread> = array.elems.iter().flatten().collect();
    if args.iter().any(|arg| arg.spread.is_some()) {
        return None;
    }

    let keys = literal::static_strings(&args.first()?.expr)?;
    let mut default_value = args.get(1).and_then(|arg| literal::static_string(&arg.expr));
    let mut namespace = None;
    let mut context = None;
    let mut has_count = false;

    if let Some(options) = args.iter().skip(1).last().and_then(|arg| object_literal(&arg.expr)) {
        if let Some(value) = literal::property(options, "defaultValue").and_then(|p| p.static_string()) {
            default_value = Some(value);
        }
        namespace = literal::property(options, "ns").and_then(|p| match p {
            Property::Value(expr) => literal::static_strings(expr)?.into_iter().next(),
            Property::Shorthand => None,
        });
        context = literal::property(options, "context").and_then(|p| p.static_string());
        has_count = literal::property(options, "count").is_some();
    }

    let references = keys
        .into_iter()
        .map(|key| {
            let mut reference = KeyReference::new(key).with_count(has_count);
            reference.namespace = namespace.clone();
            reference.default_value = default_value.clone();
            reference.context = context.clone();
            reference
        })
        .collect();
    Some(references)
}

fn object_literal(expr: &Expr) -> Option<&ObjectLit> {
    match literal::unwrap_expr(expr) {
        Expr::Object(object) => Some(object),
        _ => None,
    }
}
