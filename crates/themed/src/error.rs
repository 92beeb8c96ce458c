//! Error types for theme resolution and token substitution.
//!
//! Every fatal condition in the pipeline is a [`ThemeError`]. Configuration
//! errors (missing config, broken `extends` graphs) are raised before any
//! output is produced; reference errors are raised while a stylesheet is
//! rewritten and carry the [`Location`] of the offending declaration when
//! one is known.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// A 1-based line/column position inside a processed stylesheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl From<cssparser::SourceLocation> for Location {
    fn from(location: cssparser::SourceLocation) -> Self {
        // cssparser lines are 0-based, columns 1-based.
        Self {
            line: location.line + 1,
            column: location.column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The different ways a theme reference can be malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// `@themecolor` - no whitespace between `@theme` and the path.
    MissingSpace,
    /// `theme ('color')` - whitespace between `theme` and `(`.
    SpaceBeforeParenthesis,
    /// Anything else that looks like a reference but cannot be resolved.
    InvalidUsage,
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxErrorKind::MissingSpace => write!(f, "Missing space after @theme"),
            SyntaxErrorKind::SpaceBeforeParenthesis => {
                write!(f, "No space allowed between theme and '('")
            }
            SyntaxErrorKind::InvalidUsage => write!(f, "Invalid theme usage"),
        }
    }
}

/// Errors raised while loading, resolving or applying a theme configuration.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// The options carry no global configuration.
    #[error("No config provided to themed")]
    MissingConfig,

    /// A configuration file could not be read or deserialized.
    #[error("Failed to load theme config{}: {message}", source_suffix(.path))]
    Config {
        path: Option<PathBuf>,
        message: String,
    },

    /// The stylesheet could not be tokenized into rules and declarations.
    #[error("Failed to parse stylesheet{}: {message}", location_suffix(.location))]
    Parse {
        location: Option<Location>,
        message: String,
    },

    /// `theme` names itself in `extends`.
    #[error("A theme cannot extend itself! '{theme}' extends '{theme}'")]
    SelfExtension { theme: String },

    /// `theme` extends a theme that is not configured.
    #[error("Theme to extend from not found! '{target}'")]
    MissingExtension { theme: String, target: String },

    /// The `extends` chain revisits a theme. `chain` is in visitation order and
    /// ends with the revisited theme.
    #[error("Circular theme extension found! {}", format_chain(.chain))]
    CircularExtension { chain: Vec<String> },

    /// A referenced token path does not exist in the authority theme.
    #[error("Could not find key {key} in theme configuration{}", location_suffix(.location))]
    UnknownToken {
        key: String,
        location: Option<Location>,
    },

    /// A referenced token path names a group of tokens rather than a value.
    #[error(
        "Could not find key {key} in theme configuration: it names a group of tokens, not a value{}",
        location_suffix(.location)
    )]
    NotAValue {
        key: String,
        location: Option<Location>,
    },

    /// The theme needed for a substitution is not configured.
    #[error("Theme '{theme}' does not contain key '{key}'{}", location_suffix(.location))]
    MissingThemeKey {
        theme: String,
        key: String,
        location: Option<Location>,
    },

    /// A reference in a declaration value is malformed.
    #[error("{kind}: '{value}'{}", location_suffix(.location))]
    Syntax {
        kind: SyntaxErrorKind,
        value: String,
        location: Option<Location>,
    },
}

impl ThemeError {
    /// Attaches a source location to errors that can carry one and do not
    /// have one yet.
    pub fn at(mut self, at: Location) -> Self {
        match &mut self {
            ThemeError::Parse { location, .. }
            | ThemeError::UnknownToken { location, .. }
            | ThemeError::NotAValue { location, .. }
            | ThemeError::MissingThemeKey { location, .. }
            | ThemeError::Syntax { location, .. } => {
                location.get_or_insert(at);
            }
            _ => {}
        }
        self
    }

    /// The source location of the error, if known.
    pub fn location(&self) -> Option<Location> {
        match self {
            ThemeError::Parse { location, .. }
            | ThemeError::UnknownToken { location, .. }
            | ThemeError::NotAValue { location, .. }
            | ThemeError::MissingThemeKey { location, .. }
            | ThemeError::Syntax { location, .. } => *location,
            _ => None,
        }
    }

    pub(crate) fn syntax(kind: SyntaxErrorKind, value: &str) -> Self {
        ThemeError::Syntax {
            kind,
            value: value.to_string(),
            location: None,
        }
    }
}

/// Result type for theme operations.
pub type Result<T> = std::result::Result<T, ThemeError>;

fn format_chain(chain: &[String]) -> String {
    chain
        .iter()
        .map(|name| format!("'{}'", name))
        .collect::<Vec<_>>()
        .join(" => ")
}

fn location_suffix(location: &Option<Location>) -> String {
    location
        .map(|l| format!(" at {}", l))
        .unwrap_or_default()
}

fn source_suffix(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circular_extension_display() {
        let err = ThemeError::CircularExtension {
            chain: vec!["A".into(), "B".into(), "A".into()],
        };
        assert_eq!(
            err.to_string(),
            "Circular theme extension found! 'A' => 'B' => 'A'"
        );
    }

    #[test]
    fn test_self_extension_display() {
        let err = ThemeError::SelfExtension {
            theme: "myTheme".into(),
        };
        assert_eq!(
            err.to_string(),
            "A theme cannot extend itself! 'myTheme' extends 'myTheme'"
        );
    }

    #[test]
    fn test_unknown_token_with_location() {
        let err = ThemeError::UnknownToken {
            key: "colors.black".into(),
            location: None,
        }
        .at(Location::new(3, 14));
        assert_eq!(
            err.to_string(),
            "Could not find key colors.black in theme configuration at 3:14"
        );
        assert_eq!(err.location(), Some(Location::new(3, 14)));
    }

    #[test]
    fn test_at_keeps_existing_location() {
        let err = ThemeError::UnknownToken {
            key: "color".into(),
            location: Some(Location::new(1, 1)),
        }
        .at(Location::new(9, 9));
        assert_eq!(err.location(), Some(Location::new(1, 1)));
    }

    #[test]
    fn test_syntax_display() {
        let err = ThemeError::syntax(SyntaxErrorKind::MissingSpace, "@themecolor");
        assert!(err.to_string().contains("Missing space after @theme"));
        assert!(err.to_string().contains("@themecolor"));
    }
}
