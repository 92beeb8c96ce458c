//! Theme configuration stages.
//!
//! A configuration moves through three types, one per stage:
//!
//! 1. [`RawConfig`]: what was read from YAML or JSON.
//! 2. [`ThemeConfig`]: every theme normalized into a [`ThemeDefinition`] with
//!    light and dark tokens and optional parents.
//! 3. [`ResolvedConfig`]: every parent applied; each theme is a
//!    [`LightDarkTheme`] holding its effective tokens.
//!
//! [`resolve`] runs the whole chain for a global configuration and an
//! optional component override.

mod extend;
mod normalize;
mod raw;
mod resolved;

use std::fmt;

pub use extend::resolve_extensions;
pub use normalize::{normalize, SchemeTokens, ThemeConfig, ThemeDefinition};
pub use raw::RawConfig;
pub use resolved::{LightDarkTheme, ResolvedConfig};

use crate::error::Result;

/// The two color schemes every theme is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorScheme {
    Light,
    Dark,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 2] = [ColorScheme::Light, ColorScheme::Dark];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalizes `global`, merges the normalized `component` override on top and
/// resolves every `extends`.
pub fn resolve(global: &RawConfig, component: Option<&RawConfig>) -> Result<ResolvedConfig> {
    let mut config = normalize(global);
    if let Some(component) = component {
        config.merge(&normalize(component));
    }
    resolve_extensions(&config)
}
