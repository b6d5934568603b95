//! Flattening component children into translatable text.

use tracing::debug;

use crate::core::{
    literal,
    options::{InterpolationOptions, TransOptions},
    trans::markup::{AttrValue, Element, Node},
};

/// Renders the children of a translation component to a single string.
///
/// Implementations must be deterministic: the same children always render
/// to the same text, with placeholders in source order.
pub trait MarkupRenderer: Send + Sync + std::fmt::Debug {
    fn render(&self, children: &[Node]) -> String;
}

/// Keeps nested element names: `Hello <strong>{{name}}</strong>`.
#[derive(Debug, Clone)]
pub struct VerbatimRenderer {
    interpolation: InterpolationOptions,
}

impl VerbatimRenderer {
    pub fn new(interpolation: &InterpolationOptions) -> Self {
        Self {
            interpolation: interpolation.clone(),
        }
    }

    fn render_nodes(&self, nodes: &[Node], out: &mut String) {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(&clean_jsx_text(text)),
                Node::Expression(source) => {
                    if let Some(text) = render_expression(source, &self.interpolation) {
                        out.push_str(&text);
                    }
                }
                Node::Element(element) if element.is_fragment() => self.render_nodes(&element.children, out),
                Node::Element(element) if element.children.is_empty() => {
                    out.push_str(&format!("<{}/>", element.name));
                }
                Node::Element(element) => {
                    out.push_str(&format!("<{}>", element.name));
                    self.render_nodes(&element.children, out);
                    out.push_str(&format!("</{}>", element.name));
                }
            }
        }
    }
}

impl MarkupRenderer for VerbatimRenderer {
    fn render(&self, children: &[Node]) -> String {
        let mut out = String::new();
        self.render_nodes(children, &mut out);
        out.trim().to_string()
    }
}

/// react-i18next convention: `Hello <1>{{name}}</1>`, basic HTML kept.
#[derive(Debug, Clone)]
pub struct IndexedRenderer {
    interpolation: InterpolationOptions,
    keep_basic_html_nodes_for: Vec<String>,
}

impl IndexedRenderer {
    pub fn new(interpolation: &InterpolationOptions, trans: &TransOptions) -> Self {
        Self {
            interpolation: interpolation.clone(),
            keep_basic_html_nodes_for: trans.keep_basic_html_nodes_for.clone(),
        }
    }

    fn keeps(&self, element: &Element) -> bool {
        element.attributes.is_empty() && self.keep_basic_html_nodes_for.contains(&element.name)
    }

    fn render_nodes(&self, nodes: &[Node], out: &mut String) {
        // Indexes count the children a JSX compiler would emit.
        let children = nodes.iter().filter_map(|node| match node {
            Node::Text(text) => {
                let text = clean_jsx_text(text);
                (!text.is_empty()).then_some(Child::Text(text))
            }
            Node::Expression(source) if literal::is_comment_only(source) => None,
            Node::Expression(source) => Some(Child::Expression(source)),
            Node::Element(element) => Some(Child::Element(element)),
        });

        for (index, child) in children.enumerate() {
            match child {
                Child::Text(text) => out.push_str(&text),
                Child::Expression(source) => {
                    if let Some(text) = render_expression(source, &self.interpolation) {
                        out.push_str(&text);
                    }
                }
                Child::Element(element) => self.render_element(index, element, out),
            }
        }
    }

    fn render_element(&self, index: usize, element: &Element, out: &mut String) {
        let keep = self.keeps(element);
        if element.children.is_empty() {
            if keep {
                out.push_str(&format!("<{}/>", element.name));
            } else {
                out.push_str(&format!("<{index}></{index}>"));
            }
            return;
        }

        if keep && let [Node::Text(text)] = element.children.as_slice() {
            let text = clean_jsx_text(text);
            out.push_str(&format!("<{name}>{text}</{name}>", name = element.name));
            return;
        }

        out.push_str(&format!("<{index}>"));
        self.render_nodes(&element.children, out);
        out.push_str(&format!("</{index}>"));
    }
}

impl MarkupRenderer for IndexedRenderer {
    fn render(&self, children: &[Node]) -> String {
        let mut out = String::new();
        self.render_nodes(children, &mut out);
        out.trim().to_string()
    }
}

enum Child<'a> {
    Text(String),
    Expression(&'a str),
    Element(&'a Element),
}

/// Text an expression container contributes, or `None` when it vanishes.
fn render_expression(source: &str, interpolation: &InterpolationOptions) -> Option<String> {
    if literal::is_comment_only(source) {
        return None;
    }
    let Some(expr) = literal::parse_expression(source) else {
        debug!(expression = source.trim(), "dropping unparseable expression");
        return None;
    };
    if let Some(text) = literal::literal_text(&expr) {
        return Some(text);
    }
    match literal::interpolation_name(&expr) {
        Some(name) => Some(interpolation.placeholder(&name)),
        None => {
            debug!(expression = source.trim(), "dropping dynamic expression");
            None
        }
    }
}

/// JSX text whitespace: lines are trimmed, lines separated by newlines are
/// joined by a single space and whitespace-only lines disappear. Only spaces
/// and tabs count as whitespace, so `&nbsp;` survives.
pub fn clean_jsx_text(text: &str) -> String {
    let lines: Vec<&str> = text.split("\r\n").flat_map(|line| line.split(['\n', '\r'])).collect();
    let last_non_empty = lines
        .iter()
        .rposition(|line| line.chars().any(|c| c != ' ' && c != '\t'));

    let mut cleaned = String::new();
    for (index, line) in lines.iter().enumerate() {
        let mut line = line.replace('\t', " ");
        if index > 0 {
            line = line.trim_start_matches(' ').to_string();
        }
        if index + 1 < lines.len() {
            line = line.trim_end_matches(' ').to_string();
        }
        if line.is_empty() {
            continue;
        }
        cleaned.push_str(&line);
        if Some(index) != last_non_empty {
            cleaned.push(' ');
        }
    }
    cleaned
}

/// Static text of an attribute value, if it has one.
pub fn attribute_text(value: &AttrValue) -> Option<String> {
    match value {
        AttrValue::Text(text) => Some(text.clone()),
        AttrValue::Expression(source) => literal::static_string(&*literal::parse_expression(source)?),
        AttrValue::Flag => None,
    }
}
