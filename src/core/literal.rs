//! Static evaluation of JavaScript literal expressions.
//!
//! Source regions located by the textual scanners are parsed with swc and
//! reduced to plain strings when they are statically known.

use swc_common::{FileName, GLOBALS, Globals, SourceMap};
use swc_ecma_ast::{Expr, Lit, MemberProp, ObjectLit, Prop, PropName, PropOrSpread};
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

/// Parse a single expression. Returns `None` on any syntax error.
pub fn parse_expression(source: &str) -> Option<Box<Expr>> {
    GLOBALS.set(&Globals::new(), || {
        let source_map = SourceMap::default();
        let source_file = source_map.new_source_file(FileName::Anon.into(), source.to_string());

        let syntax = Syntax::Typescript(TsSyntax {
            tsx: true,
            ..Default::default()
        });
        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), None);

        let expr = parser.parse_expr().ok()?;
        if !parser.take_errors().is_empty() {
            return None;
        }
        Some(expr)
    })
}

/// Strip parentheses and type-only wrappers.
pub fn unwrap_expr(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unwrap_expr(&paren.expr),
        Expr::TsAs(ts_as) => unwrap_expr(&ts_as.expr),
        Expr::TsConstAssertion(ts_const) => unwrap_expr(&ts_const.expr),
        Expr::TsSatisfies(ts_sat) => unwrap_expr(&ts_sat.expr),
        Expr::TsNonNull(non_null) => unwrap_expr(&non_null.expr),
        _ => expr,
    }
}

/// The value of a string literal, an expression-free template literal,
/// or a `+` concatenation of those.
pub fn static_string(expr: &Expr) -> Option<String> {
    match unwrap_expr(expr) {
        Expr::Lit(Lit::Str(s)) => s.value.as_str().map(str::to_string),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => tpl
            .quasis
            .first()
            .and_then(|quasi| quasi.cooked.as_ref())
            .and_then(|cooked| cooked.as_str())
            .map(str::to_string),
        Expr::Bin(bin) if bin.op == swc_ecma_ast::BinaryOp::Add => {
            let mut value = static_string(&bin.left)?;
            value.push_str(&static_string(&bin.right)?);
            Some(value)
        }
        _ => None,
    }
}

/// Keys from a first argument: one static string, or an array of them.
///
/// Dynamic array elements are dropped; an array with no static element, or
/// a dynamic non-array expression, yields `None`.
pub fn static_strings(expr: &Expr) -> Option<Vec<String>> {
    match unwrap_expr(expr) {
        Expr::Array(array) => {
            let values: Vec<String> = array
                .elems
                .iter()
                .flatten()
                .filter(|element| element.spread.is_none())
                .filter_map(|element| static_string(&element.expr))
                .collect();
            (!values.is_empty()).then_some(values)
        }
        other => static_string(other).map(|value| vec![value]),
    }
}

/// Text a literal contributes when rendered: strings as-is, numbers in
/// their shortest JavaScript form.
pub fn literal_text(expr: &Expr) -> Option<String> {
    match unwrap_expr(expr) {
        Expr::Lit(Lit::Num(num)) => Some(format_number(num.value)),
        other => static_string(other),
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// A named property of an object literal.
#[derive(Debug, Clone, Copy)]
pub enum Property<'a> {
    /// `name: value`
    Value(&'a Expr),
    /// `{ name }`
    Shorthand,
}

impl Property<'_> {
    pub fn static_string(&self) -> Option<String> {
        match self {
            Property::Value(expr) => static_string(expr),
            Property::Shorthand => None,
        }
    }
}

/// Look up `name` in an object literal. Spread elements are skipped; the
/// last matching property wins, as in JavaScript.
pub fn property<'a>(object: &'a ObjectLit, name: &str) -> Option<Property<'a>> {
    object
        .props
        .iter()
        .filter_map(|prop| match prop {
            PropOrSpread::Prop(prop) => Some(prop.as_ref()),
            PropOrSpread::Spread(_) => None,
        })
        .filter_map(|prop| match prop {
            Prop::KeyValue(kv) if prop_name(&kv.key).as_deref() == Some(name) => {
                Some(Property::Value(&kv.value))
            }
            Prop::Shorthand(ident) if ident.sym.as_str() == name => Some(Property::Shorthand),
            _ => None,
        })
        .last()
}

pub fn prop_name(name: &PropName) -> Option<String> {
    match name {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => s.value.as_str().map(str::to_string),
        _ => None,
    }
}

/// Interpolation name of an expression container.
///
/// `name`, `user.name`, `{ name }` and `{ name: value }` all name a value;
/// anything else does not.
pub fn interpolation_name(expr: &Expr) -> Option<String> {
    match unwrap_expr(expr) {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::This(_) => Some("this".to_string()),
        Expr::Member(member) => {
            let MemberProp::Ident(prop) = &member.prop else {
                return None;
            };
            Some(format!("{}.{}", interpolation_name(&member.obj)?, prop.sym))
        }
        Expr::Object(object) => match object.props.first()? {
            PropOrSpread::Prop(prop) => match prop.as_ref() {
                Prop::Shorthand(ident) => Some(ident.sym.to_string()),
                Prop::KeyValue(kv) => prop_name(&kv.key),
                _ => None,
            },
            PropOrSpread::Spread(_) => None,
        },
        _ => None,
    }
}

/// Whether `source` contains nothing but whitespace and comments.
pub fn is_comment_only(source: &str) -> bool {
    let mut rest = source.trim_start();
    loop {
        if rest.is_empty() {
            return true;
        }
        if let Some(body) = rest.strip_prefix("/*") {
            let Some(end) = body.find("*/") else {
                return false;
            };
            rest = body[end + 2..].trim_start();
        } else if let Some(body) = rest.strip_prefix("//") {
            rest = body.find('\n').map_or("", |end| &body[end..]).trim_start();
        } else {
            return false;
        }
    }
}
