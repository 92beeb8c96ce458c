//! Reference checks for editors and CI.
//!
//! Linting reports problems without stopping at the first one: malformed
//! `@theme` usage, the unneeded `$` prefix, and paths missing from the
//! authority theme (with close matches as suggestions).

use std::fmt;

use serde::Serialize;

use crate::config::ResolvedConfig;
use crate::error::{Location, SyntaxErrorKind, ThemeError};
use crate::reference::{self, mentions_theme};
use crate::stylesheet::{Declaration, Stylesheet};
use crate::tokens::{flatten, lookup, Lookup, TokenMap};

const MAX_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LintKind {
    /// `@theme` directly followed by the path.
    Spacing,
    /// `@theme $path`.
    Dollar,
    /// The path is not in the authority theme.
    VariableNotFound,
    /// Any other malformed reference.
    InvalidUsage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintMessage {
    pub kind: LintKind,
    pub message: String,
    pub property: String,
    pub location: Location,
}

impl fmt::Display for LintMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.location, self.property, self.message)
    }
}

/// Checks every declaration of `sheet` against the light tokens of
/// `default_theme`.
pub fn lint_stylesheet(
    sheet: &Stylesheet,
    config: &ResolvedConfig,
    default_theme: &str,
) -> Vec<LintMessage> {
    let empty = TokenMap::new();
    let tokens = config
        .get(default_theme)
        .map(|theme| &theme.light)
        .unwrap_or(&empty);

    sheet
        .declarations()
        .into_iter()
        .filter_map(|declaration| lint_declaration(declaration, tokens))
        .collect()
}

/// Checks a single declaration value. Returns the first problem found.
pub fn lint_value(value: &str, tokens: &TokenMap) -> Option<(LintKind, String)> {
    if !mentions_theme(value) {
        return None;
    }

    let parsed = match reference::parse(value) {
        Ok(parsed) => parsed,
        Err(ThemeError::Syntax {
            kind: SyntaxErrorKind::MissingSpace,
            ..
        }) => {
            return Some((
                LintKind::Spacing,
                "There needs to be some form of whitespace after @theme".to_string(),
            ))
        }
        Err(e) => return Some((LintKind::InvalidUsage, e.to_string())),
    };

    if parsed.references().any(|r| r.dollar) {
        return Some((
            LintKind::Dollar,
            "The $ sign is not needed when pulling from a theme".to_string(),
        ));
    }

    let missing = parsed
        .references()
        .find(|r| !matches!(lookup(tokens, r.path.as_str()), Lookup::Value(_)))
        .map(|r| {
            let path = r.path.as_str();
            (LintKind::VariableNotFound, not_found_message(path, tokens))
        });
    missing
}

/// Whether `path` names a value in `default_theme`'s light tokens.
pub fn has_token(config: &ResolvedConfig, default_theme: &str, path: &str) -> bool {
    config
        .get(default_theme)
        .is_some_and(|theme| matches!(lookup(&theme.light, path), Lookup::Value(_)))
}

fn lint_declaration(declaration: &Declaration, tokens: &TokenMap) -> Option<LintMessage> {
    let (kind, message) = lint_value(&declaration.value, tokens)?;
    Some(LintMessage {
        kind,
        message,
        property: declaration.property.clone(),
        location: declaration.location,
    })
}

fn not_found_message(path: &str, tokens: &TokenMap) -> String {
    let suggestions = suggestions(path, tokens);
    let mut message = format!("You used a variable with no base value: {}", path);
    if !suggestions.is_empty() {
        message.push_str(&format!(". Did you mean: {}", suggestions.join(", ")));
    }
    message
}

/// Up to three known paths closest to `path` by edit distance.
fn suggestions(path: &str, tokens: &TokenMap) -> Vec<String> {
    let mut candidates: Vec<(usize, String)> = flatten(tokens)
        .into_iter()
        .map(|(candidate, _)| (strsim::levenshtein(path, &candidate), candidate))
        .filter(|(distance, candidate)| *distance <= path.len().max(candidate.len()) / 2)
        .collect();

    candidates.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    candidates
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, candidate)| candidate)
        .collect()
}
