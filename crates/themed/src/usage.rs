use indexmap::IndexMap;

use crate::error::Result;
use crate::reference::{self, mentions_theme};
use crate::stylesheet::Stylesheet;

/// How often each token path is referenced across a stylesheet.
///
/// A path referenced exactly once can carry its value inline as a `var()`
/// fallback; anything used more often is declared once in a shared block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableUsage {
    counts: IndexMap<String, usize>,
}

impl VariableUsage {
    /// Counts references in every declaration of `sheet`.
    pub fn analyze(sheet: &Stylesheet) -> Result<Self> {
        let mut counts = IndexMap::new();
        for declaration in sheet.declarations() {
            if !mentions_theme(&declaration.value) {
                continue;
            }
            let parsed =
                reference::parse(&declaration.value).map_err(|e| e.at(declaration.location))?;
            for reference in parsed.references() {
                *counts.entry(reference.path.to_string()).or_insert(0) += 1;
            }
        }
        Ok(Self { counts })
    }

    pub fn count(&self, path: &str) -> usize {
        self.counts.get(path).copied().unwrap_or(0)
    }

    pub fn is_used(&self, path: &str) -> bool {
        self.count(path) > 0
    }

    /// Referenced paths in first-use order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }
}
