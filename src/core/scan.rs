//! Balanced delimiter scanning over JavaScript-like source text.
//!
//! The scanner only needs to know enough syntax to not be fooled by
//! delimiters inside strings, template literals and comments. Regex literals
//! are not recognized.

use std::ops::Range;

/// Byte offset of the delimiter closing the one at `open`.
///
/// `open` must point at `(`, `[` or `{`. Returns `None` when the region is
/// unbalanced or runs into an unterminated string or comment.
pub fn find_closing(text: &str, open: usize) -> Option<usize> {
    closing(text.as_bytes(), open)
}

/// 1-based line number of a byte offset.
pub fn line_of(text: &str, offset: usize) -> usize {
    let end = offset.min(text.len());
    text.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

/// Byte ranges within `start..end` covered by string literals, the text parts
/// of template literals and comments.
///
/// Template substitutions (`${...}`) are code and stay uncovered, except for
/// the literals inside them. A literal left unterminated runs to `end`.
pub fn literal_spans(text: &str, start: usize, end: usize) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    collect_literals(text.as_bytes(), start, end.min(text.len()), &mut spans);
    spans
}

fn collect_literals(bytes: &[u8], start: usize, end: usize, spans: &mut Vec<Range<usize>>) {
    let mut i = start;
    while i < end {
        match bytes[i] {
            quote @ (b'\'' | b'"') => {
                let close = skip_string(bytes, i, quote).map_or(end, |close| (close + 1).min(end));
                spans.push(i..close);
                i = close;
                continue;
            }
            b'`' => {
                i = template_literals(bytes, i, end, spans);
                continue;
            }
            b'/' if i + 1 < end && bytes[i + 1] == b'/' => {
                let close = bytes[i..end]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map_or(end, |offset| i + offset);
                spans.push(i..close);
                i = close;
                continue;
            }
            b'/' if i + 1 < end && bytes[i + 1] == b'*' => {
                let close = bytes[i + 2..end]
                    .windows(2)
                    .position(|pair| pair == b"*/")
                    .map_or(end, |offset| i + 2 + offset + 2);
                spans.push(i..close);
                i = close;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
}

/// Records the text parts of the template starting at `start` and returns
/// the offset just past its closing backtick.
fn template_literals(bytes: &[u8], start: usize, end: usize, spans: &mut Vec<Range<usize>>) -> usize {
    let mut segment = start;
    let mut i = start + 1;
    while i < end {
        match bytes[i] {
            b'\\' => i += 1,
            b'`' => {
                spans.push(segment..i + 1);
                return i + 1;
            }
            b'$' if i + 1 < end && bytes[i + 1] == b'{' => {
                spans.push(segment..i + 2);
                let Some(close) = closing(bytes, i + 1).filter(|&close| close < end) else {
                    collect_literals(bytes, i + 2, end, spans);
                    return end;
                };
                collect_literals(bytes, i + 2, close, spans);
                segment = close;
                i = close;
            }
            _ => {}
        }
        i += 1;
    }
    spans.push(segment..end);
    end
}

fn closer_for(open: u8) -> Option<u8> {
    match open {
        b'(' => Some(b')'),
        b'[' => Some(b']'),
        b'{' => Some(b'}'),
        _ => None,
    }
}

fn closing(bytes: &[u8], open: usize) -> Option<usize> {
    let mut expected = vec![closer_for(*bytes.get(open)?)?];
    let mut i = open + 1;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"') => i = skip_string(bytes, i, quote)?,
            b'`' => i = skip_template(bytes, i)?,
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = bytes[i..]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map_or(bytes.len(), |offset| i + offset);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = bytes[i + 2..].windows(2).position(|pair| pair == b"*/")?;
                i += 2 + end + 1;
            }
            b @ (b'(' | b'[' | b'{') => expected.extend(closer_for(b)),
            b @ (b')' | b']' | b'}') => {
                if expected.pop() != Some(b) {
                    return None;
                }
                if expected.is_empty() {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }

    None
}

/// Index of the closing quote. Strings cannot span lines.
fn skip_string(bytes: &[u8], start: usize, quote: u8) -> Option<usize> {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'\n' => return None,
            b if b == quote => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

/// Index of the closing backtick, stepping over `${...}` substitutions.
fn skip_template(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'`' => return Some(i),
            b'$' if bytes.get(i + 1) == Some(&b'{') => i = closing(bytes, i + 1)?,
            _ => {}
        }
        i += 1;
    }
    None
}
