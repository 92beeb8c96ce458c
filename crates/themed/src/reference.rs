//! Scanner for theme references inside declaration values.
//!
//! Two forms are recognized:
//!
//! ```css
//! .a { color: @theme color; }            /* `$` prefix accepted: @theme $color */
//! .b { border: 1px solid theme('colors.purple'); }
//! ```
//!
//! A value is split once into literal and reference [`Segment`]s. Substitution
//! then walks the segments left to right, so every reference is resolved
//! exactly once and replacement text is never rescanned for references.

use crate::error::{Result, SyntaxErrorKind, ThemeError};
use crate::tokens::TokenPath;

const AT_THEME: &[u8] = b"@theme";
const THEME_FN: &[u8] = b"theme";

/// How a reference was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceSyntax {
    /// `@theme path` or `@theme $path`
    At,
    /// `theme('path')` or `theme("path")`
    Function,
}

/// A single token reference found in a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub path: TokenPath,
    pub syntax: ReferenceSyntax,
    /// The path was written with a leading `$`.
    pub dollar: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Reference(Reference),
}

/// A declaration value split into literal text and references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedValue {
    segments: Vec<Segment>,
}

impl ParsedValue {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Reference(reference) => Some(reference),
            Segment::Literal(_) => None,
        })
    }

    pub fn reference_count(&self) -> usize {
        self.references().count()
    }

    pub fn has_references(&self) -> bool {
        self.references().next().is_some()
    }

    /// Rebuilds the value, replacing each reference with what `resolve`
    /// returns for it.
    ///
    /// Returns `Ok(None)` as soon as `resolve` yields `None`, meaning the
    /// whole declaration should be dropped.
    pub fn substitute<F>(&self, mut resolve: F) -> Result<Option<String>>
    where
        F: FnMut(&Reference) -> Result<Option<String>>,
    {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Reference(reference) => match resolve(reference)? {
                    Some(value) => out.push_str(&value),
                    None => return Ok(None),
                },
            }
        }

        if has_leftover_reference(&out) {
            return Err(ThemeError::syntax(SyntaxErrorKind::InvalidUsage, &out));
        }

        Ok(Some(out))
    }
}

/// Splits `value` into literal and reference segments.
///
/// # Errors
///
/// [`ThemeError::Syntax`] when a reference is malformed: `@theme` without
/// following whitespace, whitespace between `theme` and `(`, or a reference
/// opener that does not lead to a valid path.
pub fn parse(value: &str) -> Result<ParsedValue> {
    let bytes = value.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        // Quoted strings are plain text.
        if matches!(bytes[i], b'\'' | b'"') {
            i = skip_string(bytes, i);
            continue;
        }

        let found = if bytes[i..].starts_with(AT_THEME) {
            Some(scan_at_reference(value, i)?)
        } else if bytes[i..].starts_with(THEME_FN) && (i == 0 || !is_ident_byte(bytes[i - 1])) {
            scan_function_reference(value, i)?
        } else {
            None
        };

        match found {
            Some((reference, end)) => {
                if literal_start < i {
                    segments.push(Segment::Literal(value[literal_start..i].to_string()));
                }
                segments.push(Segment::Reference(reference));
                i = end;
                literal_start = end;
            }
            None => i += 1,
        }
    }

    if literal_start < bytes.len() {
        segments.push(Segment::Literal(value[literal_start..].to_string()));
    }

    Ok(ParsedValue { segments })
}

/// Quick check used to skip declarations without any reference.
pub fn mentions_theme(value: &str) -> bool {
    value.contains("theme")
}

fn scan_at_reference(value: &str, start: usize) -> Result<(Reference, usize)> {
    let bytes = value.as_bytes();
    let mut i = start + AT_THEME.len();

    match bytes.get(i) {
        None => return Err(ThemeError::syntax(SyntaxErrorKind::InvalidUsage, value)),
        Some(b) if !b.is_ascii_whitespace() => {
            return Err(ThemeError::syntax(SyntaxErrorKind::MissingSpace, value))
        }
        Some(_) => {}
    }

    i = skip_whitespace(bytes, i);
    let dollar = bytes.get(i) == Some(&b'$');
    if dollar {
        i += 1;
    }

    let end = scan_path(bytes, i);
    if end == i {
        return Err(ThemeError::syntax(SyntaxErrorKind::InvalidUsage, value));
    }

    let reference = Reference {
        path: TokenPath::new(&value[i..end]),
        syntax: ReferenceSyntax::At,
        dollar,
    };
    Ok((reference, end))
}

/// Returns `None` when `theme` at `start` is an ordinary word.
fn scan_function_reference(value: &str, start: usize) -> Result<Option<(Reference, usize)>> {
    let bytes = value.as_bytes();
    let mut i = start + THEME_FN.len();

    match bytes.get(i) {
        Some(b'(') => {}
        Some(b) if b.is_ascii_whitespace() => {
            if bytes.get(skip_whitespace(bytes, i)) == Some(&b'(') {
                return Err(ThemeError::syntax(
                    SyntaxErrorKind::SpaceBeforeParenthesis,
                    value,
                ));
            }
            return Ok(None);
        }
        _ => return Ok(None),
    }

    let invalid = || ThemeError::syntax(SyntaxErrorKind::InvalidUsage, value);

    i = skip_whitespace(bytes, i + 1);
    let quote = match bytes.get(i) {
        Some(q @ (b'\'' | b'"')) => *q,
        _ => return Err(invalid()),
    };
    i += 1;

    let path_start = i;
    i = scan_path(bytes, i);
    if i == path_start || bytes.get(i) != Some(&quote) {
        return Err(invalid());
    }
    let path_end = i;

    i = skip_whitespace(bytes, i + 1);
    if bytes.get(i) != Some(&b')') {
        return Err(invalid());
    }

    let reference = Reference {
        path: TokenPath::new(&value[path_start..path_end]),
        syntax: ReferenceSyntax::Function,
        dollar: false,
    };
    Ok(Some((reference, i + 1)))
}

/// Scans `segment(.segment)*` and returns the end offset. A trailing dot is
/// not part of the path.
fn scan_path(bytes: &[u8], start: usize) -> usize {
    let mut end = scan_segment(bytes, start);
    if end == start {
        return start;
    }

    while bytes.get(end) == Some(&b'.') {
        let next = scan_segment(bytes, end + 1);
        if next == end + 1 {
            break;
        }
        end = next;
    }
    end
}

fn scan_segment(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while bytes.get(end).is_some_and(|b| is_path_byte(*b)) {
        end += 1;
    }
    end
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while bytes.get(i).is_some_and(|b| b.is_ascii_whitespace()) {
        i += 1;
    }
    i
}

/// Returns the offset just past the string opened at `start`, or the end of
/// input when it is never closed.
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while let Some(&b) = bytes.get(i) {
        match b {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn is_path_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

fn is_ident_byte(b: u8) -> bool {
    is_path_byte(b) || !b.is_ascii()
}

fn has_leftover_reference(value: &str) -> bool {
    if !mentions_theme(value) {
        return false;
    }
    parse(value).map_or(true, |parsed| parsed.has_references())
}
