//! Resolution of `extends` between themes.
//!
//! A theme may name a parent at the theme level (both schemes inherit) and at
//! each scheme level (only that scheme inherits). Resolution treats every
//! `(theme, scheme)` pair as a node and computes each node once, parents
//! first:
//!
//! ```text
//! effective = deep_merge(resolved(theme parent, s), own s tokens)
//! effective = resolved(scheme parent, s) overlaid with effective
//! ```
//!
//! The graph is validated before anything is computed, so a broken
//! configuration never produces partial output.

use std::collections::HashMap;

use tracing::debug;

use super::normalize::{ThemeConfig, ThemeDefinition};
use super::resolved::{LightDarkTheme, ResolvedConfig};
use super::ColorScheme;
use crate::error::{Result, ThemeError};
use crate::tokens::{deep_merge, TokenMap};

/// Scopes in the order they are validated: theme level, light, dark.
const SCOPES: [Option<ColorScheme>; 3] = [None, Some(ColorScheme::Light), Some(ColorScheme::Dark)];

/// Applies every `extends` in `config`, producing a new resolved
/// configuration in the same theme order.
///
/// # Errors
///
/// - [`ThemeError::MissingExtension`] when a parent is not configured
/// - [`ThemeError::SelfExtension`] when a theme names itself
/// - [`ThemeError::CircularExtension`] when a chain of parents loops
pub fn resolve_extensions(config: &ThemeConfig) -> Result<ResolvedConfig> {
    validate(config)?;

    let mut resolver = Resolver::new(config);
    let mut resolved = ResolvedConfig::new();
    for (name, _) in config.iter() {
        let light = resolver.resolve(name, ColorScheme::Light)?;
        let dark = resolver.resolve(name, ColorScheme::Dark)?;
        resolved.insert(name, LightDarkTheme::new(light, dark));
    }

    debug!(themes = resolved.len(), "resolved theme extensions");
    Ok(resolved)
}

fn validate(config: &ThemeConfig) -> Result<()> {
    for (name, theme) in config.iter() {
        for scope in SCOPES {
            let Some(parent) = theme.parent(scope) else {
                continue;
            };

            if !config.contains(parent) {
                return Err(ThemeError::MissingExtension {
                    theme: name.to_string(),
                    target: parent.to_string(),
                });
            }

            if parent == name {
                return Err(ThemeError::SelfExtension {
                    theme: name.to_string(),
                });
            }

            check_cycle(config, name, scope)?;
        }
    }
    Ok(())
}

/// Follows the parents of `name` within one scope. The walk ends quietly at a
/// theme that is not configured; its owner reports it when validated.
fn check_cycle(config: &ThemeConfig, name: &str, scope: Option<ColorScheme>) -> Result<()> {
    let mut chain = vec![name.to_string()];
    let mut current = config.get(name).and_then(|theme| theme.parent(scope));

    while let Some(next) = current {
        let seen = chain.iter().any(|visited| visited == next);
        chain.push(next.to_string());
        if seen {
            return Err(ThemeError::CircularExtension { chain });
        }
        current = config.get(next).and_then(|theme| theme.parent(scope));
    }

    Ok(())
}

/// Memoized resolution of `(theme, scheme)` nodes.
struct Resolver<'a> {
    config: &'a ThemeConfig,
    cache: HashMap<(&'a str, ColorScheme), TokenMap>,
    // Themes currently being computed, used to catch loops that cross from a
    // theme-level parent into a scheme-level one.
    stack: Vec<&'a str>,
}

impl<'a> Resolver<'a> {
    fn new(config: &'a ThemeConfig) -> Self {
        Self {
            config,
            cache: HashMap::new(),
            stack: Vec::new(),
        }
    }

    fn resolve(&mut self, name: &'a str, scheme: ColorScheme) -> Result<TokenMap> {
        if let Some(done) = self.cache.get(&(name, scheme)) {
            return Ok(done.clone());
        }

        if let Some(pos) = self.stack.iter().position(|active| *active == name) {
            let mut chain: Vec<String> =
                self.stack[pos..].iter().map(|n| n.to_string()).collect();
            chain.push(name.to_string());
            return Err(ThemeError::CircularExtension { chain });
        }

        let config = self.config;
        let theme = config
            .get(name)
            .ok_or_else(|| ThemeError::MissingExtension {
                theme: self.stack.last().map(|n| n.to_string()).unwrap_or_default(),
                target: name.to_string(),
            })?;

        self.stack.push(name);
        let computed = self.compute(theme, scheme);
        self.stack.pop();

        let tokens = computed?;
        self.cache.insert((name, scheme), tokens.clone());
        Ok(tokens)
    }

    fn compute(&mut self, theme: &'a ThemeDefinition, scheme: ColorScheme) -> Result<TokenMap> {
        let own = theme.scheme(scheme);

        let mut effective = match theme.extends.as_deref() {
            Some(parent) => self.resolve(parent, scheme)?,
            None => TokenMap::new(),
        };
        deep_merge(&mut effective, &own.tokens);

        if let Some(parent) = own.extends.as_deref() {
            let mut base = self.resolve(parent, scheme)?;
            for (key, value) in effective {
                base.insert(key, value);
            }
            effective = base;
        }

        Ok(effective)
    }
}
