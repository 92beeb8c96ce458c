use tracing::warn;

use crate::config::LightDarkTheme;
use crate::error::{Location, Result, ThemeError};
use crate::localize::Localizer;
use crate::processor::Warning;
use crate::reference::{self, mentions_theme, Reference};
use crate::selector::strip_theme_root;
use crate::stylesheet::{Declaration, Stylesheet};
use crate::tokens::{lookup, Lookup};
use crate::usage::VariableUsage;

/// How references are rewritten in modern output.
pub(super) struct Substitution<'a> {
    /// Every reference must exist in this theme's light tokens.
    pub authority: &'a LightDarkTheme,
    /// Source of inlined fallbacks and literal values.
    pub values: &'a LightDarkTheme,
    pub usage: &'a VariableUsage,
    pub localizer: &'a Localizer<'a>,
    /// Write values instead of `var()` references.
    pub literal: bool,
    /// Inline the value of tokens used once as a `var()` fallback.
    pub inline: bool,
}

impl Substitution<'_> {
    /// Rewrites every reference in `sheet` and strips `:theme-root` markers.
    pub fn apply(&self, sheet: &mut Stylesheet) -> Result<Vec<Warning>> {
        for rule in sheet.rules_mut() {
            rule.selector = strip_theme_root(&rule.selector);
        }

        let mut warnings = Vec::new();
        for declarations in sheet.declaration_lists_mut() {
            let mut kept = Vec::with_capacity(declarations.len());
            for declaration in declarations.drain(..) {
                if let Some(declaration) = self.rewrite(declaration, &mut warnings)? {
                    kept.push(declaration);
                }
            }
            *declarations = kept;
        }
        Ok(warnings)
    }

    fn rewrite(
        &self,
        declaration: Declaration,
        warnings: &mut Vec<Warning>,
    ) -> Result<Option<Declaration>> {
        if !mentions_theme(&declaration.value) {
            return Ok(Some(declaration));
        }

        let location = declaration.location;
        let parsed = reference::parse(&declaration.value).map_err(|e| e.at(location))?;
        if !parsed.has_references() {
            return Ok(Some(declaration));
        }

        let value = parsed
            .substitute(|reference| self.resolve(reference, location, warnings))
            .map_err(|e| e.at(location))?;

        Ok(value.map(|value| Declaration {
            value,
            ..declaration
        }))
    }

    fn resolve(
        &self,
        reference: &Reference,
        location: Location,
        warnings: &mut Vec<Warning>,
    ) -> Result<Option<String>> {
        let path = reference.path.as_str();

        if self.literal {
            return Ok(match lookup(&self.values.light, path) {
                Lookup::Value(value) => Some(value.to_string()),
                Lookup::Group | Lookup::Missing => {
                    let message = format!(
                        "Could not find key {} in theme configuration. Removing declaration.",
                        path
                    );
                    warn!("{} ({})", message, location);
                    warnings.push(Warning {
                        message,
                        location: Some(location),
                    });
                    None
                }
            });
        }

        match lookup(&self.authority.light, path) {
            Lookup::Value(_) => {}
            Lookup::Group => {
                return Err(ThemeError::NotAValue {
                    key: path.to_string(),
                    location: Some(location),
                })
            }
            Lookup::Missing => {
                return Err(ThemeError::UnknownToken {
                    key: path.to_string(),
                    location: Some(location),
                })
            }
        }

        let name = self.localizer.localize(&reference.path.variable_name());
        let fallback = if self.inline && self.usage.count(path) == 1 {
            lookup(&self.values.light, path).value()
        } else {
            None
        };

        Ok(Some(match fallback {
            Some(fallback) => format!("var(--{}, {})", name, fallback),
            None => format!("var(--{})", name),
        }))
    }
}
