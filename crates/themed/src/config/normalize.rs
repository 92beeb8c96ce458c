//! Normalization of raw themes into light/dark pairs.
//!
//! Three input shapes are accepted per theme:
//!
//! | Raw shape | Normalized |
//! |---|---|
//! | `{ light: {..}, dark: {..}, ..shared }` | passed through, `extends` kept at every level, `shared` under both schemes |
//! | `{ extends: X, ..rest }` | `{ extends: X, light: rest, dark: {} }` |
//! | `{ ..tokens }` | `{ light: tokens, dark: {} }` |
//!
//! After this step every theme is a [`ThemeDefinition`]; later stages never
//! look at the raw shape again.

use indexmap::IndexMap;

use super::raw::RawConfig;
use super::ColorScheme;
use crate::tokens::{deep_merge, TokenMap, TokenValue};

const EXTENDS: &str = "extends";

/// Tokens of one color scheme, with an optional scheme-level parent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemeTokens {
    pub extends: Option<String>,
    pub tokens: TokenMap,
}

impl SchemeTokens {
    pub fn new(tokens: TokenMap) -> Self {
        Self {
            extends: None,
            tokens,
        }
    }

    /// Splits a string `extends` key out of `tokens`.
    fn from_map(map: &TokenMap) -> Self {
        let mut tokens = map.clone();
        let extends = take_extends(&mut tokens);
        Self { extends, tokens }
    }

    fn to_map(&self) -> TokenMap {
        let mut map = TokenMap::new();
        if let Some(parent) = &self.extends {
            map.insert(EXTENDS.to_string(), TokenValue::Value(parent.clone()));
        }
        for (key, value) in &self.tokens {
            map.insert(key.clone(), value.clone());
        }
        map
    }

    fn merge(&mut self, overrides: &SchemeTokens) {
        if overrides.extends.is_some() {
            self.extends = overrides.extends.clone();
        }
        deep_merge(&mut self.tokens, &overrides.tokens);
    }
}

/// A normalized theme: a theme-level parent plus light and dark tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeDefinition {
    pub extends: Option<String>,
    pub light: SchemeTokens,
    pub dark: SchemeTokens,
}

impl ThemeDefinition {
    pub fn scheme(&self, scheme: ColorScheme) -> &SchemeTokens {
        match scheme {
            ColorScheme::Light => &self.light,
            ColorScheme::Dark => &self.dark,
        }
    }

    /// The parent named by `scope`: the theme-level parent for `None`,
    /// otherwise the parent of that scheme.
    pub fn parent(&self, scope: Option<ColorScheme>) -> Option<&str> {
        match scope {
            None => self.extends.as_deref(),
            Some(scheme) => self.scheme(scheme).extends.as_deref(),
        }
    }

    fn from_raw(raw: &TokenMap) -> Self {
        if let (Some(TokenValue::Group(light)), Some(TokenValue::Group(dark))) =
            (raw.get("light"), raw.get("dark"))
        {
            let mut rest = raw.clone();
            rest.shift_remove("light");
            rest.shift_remove("dark");
            let extends = take_extends(&mut rest);

            // Remaining top-level tokens are shared by both schemes.
            let with_shared = |map: &TokenMap| {
                let mut scheme = SchemeTokens::from_map(map);
                let mut tokens = rest.clone();
                deep_merge(&mut tokens, &scheme.tokens);
                scheme.tokens = tokens;
                scheme
            };

            return Self {
                extends,
                light: with_shared(light),
                dark: with_shared(dark),
            };
        }

        let mut rest = raw.clone();
        match take_extends(&mut rest) {
            Some(parent) => Self {
                extends: Some(parent),
                light: SchemeTokens::new(rest),
                dark: SchemeTokens::default(),
            },
            None => Self {
                extends: None,
                light: SchemeTokens::new(raw.clone()),
                dark: SchemeTokens::default(),
            },
        }
    }

    fn to_raw(&self) -> TokenMap {
        let mut map = TokenMap::new();
        if let Some(parent) = &self.extends {
            map.insert(EXTENDS.to_string(), TokenValue::Value(parent.clone()));
        }
        map.insert("light".to_string(), TokenValue::Group(self.light.to_map()));
        map.insert("dark".to_string(), TokenValue::Group(self.dark.to_map()));
        map
    }
}

/// A configuration where every theme has been normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeConfig {
    themes: IndexMap<String, ThemeDefinition>,
}

impl ThemeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, theme: ThemeDefinition) {
        self.themes.insert(name.into(), theme);
    }

    pub fn get(&self, name: &str) -> Option<&ThemeDefinition> {
        self.themes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.themes.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ThemeDefinition)> {
        self.themes.iter().map(|(name, theme)| (name.as_str(), theme))
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    /// Converts back to the explicit light/dark raw form.
    pub fn to_raw(&self) -> RawConfig {
        self.themes
            .iter()
            .map(|(name, theme)| (name.clone(), theme.to_raw()))
            .collect()
    }

    /// Merges `overrides` into this configuration. Parents named in the
    /// overrides replace existing ones; token trees merge recursively.
    pub fn merge(&mut self, overrides: &ThemeConfig) {
        for (name, incoming) in &overrides.themes {
            match self.themes.get_mut(name) {
                Some(existing) => {
                    if incoming.extends.is_some() {
                        existing.extends = incoming.extends.clone();
                    }
                    existing.light.merge(&incoming.light);
                    existing.dark.merge(&incoming.dark);
                }
                None => {
                    self.themes.insert(name.clone(), incoming.clone());
                }
            }
        }
    }
}

/// Normalizes every theme of `raw` into a [`ThemeDefinition`].
pub fn normalize(raw: &RawConfig) -> ThemeConfig {
    ThemeConfig {
        themes: raw
            .iter()
            .map(|(name, theme)| (name.to_string(), ThemeDefinition::from_raw(theme)))
            .collect(),
    }
}

fn take_extends(map: &mut TokenMap) -> Option<String> {
    match map.get(EXTENDS) {
        Some(TokenValue::Value(parent)) => {
            let parent = parent.clone();
            map.shift_remove(EXTENDS);
            Some(parent)
        }
        _ => None,
    }
}
