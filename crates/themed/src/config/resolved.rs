use indexmap::IndexMap;

use super::ColorScheme;
use crate::tokens::{deep_merge, TokenMap};

/// A fully resolved theme: the effective light and dark token trees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LightDarkTheme {
    pub light: TokenMap,
    pub dark: TokenMap,
}

impl LightDarkTheme {
    pub fn new(light: TokenMap, dark: TokenMap) -> Self {
        Self { light, dark }
    }

    pub fn scheme(&self, scheme: ColorScheme) -> &TokenMap {
        match scheme {
            ColorScheme::Light => &self.light,
            ColorScheme::Dark => &self.dark,
        }
    }

    /// A theme supports dark mode only when both schemes carry tokens.
    pub fn has_dark_mode(&self) -> bool {
        !self.light.is_empty() && !self.dark.is_empty()
    }

    /// Returns `base` with this theme's tokens merged on top.
    pub fn merged_over(&self, base: &LightDarkTheme) -> LightDarkTheme {
        let mut merged = base.clone();
        deep_merge(&mut merged.light, &self.light);
        deep_merge(&mut merged.dark, &self.dark);
        merged
    }
}

/// A configuration with every `extends` resolved. Themes keep the order of
/// the configuration they were resolved from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedConfig {
    themes: IndexMap<String, LightDarkTheme>,
}

impl ResolvedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, theme: LightDarkTheme) {
        self.themes.insert(name.into(), theme);
    }

    pub fn get(&self, name: &str) -> Option<&LightDarkTheme> {
        self.themes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.themes.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LightDarkTheme)> {
        self.themes.iter().map(|(name, theme)| (name.as_str(), theme))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenValue;

    fn tokens(pairs: &[(&str, &str)]) -> TokenMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), TokenValue::from(*v)))
            .collect()
    }

    #[test]
    fn test_has_dark_mode_needs_both() {
        let light_only = LightDarkTheme::new(tokens(&[("color", "red")]), TokenMap::new());
        let dark_only = LightDarkTheme::new(TokenMap::new(), tokens(&[("color", "black")]));
        let both = LightDarkTheme::new(
            tokens(&[("color", "red")]),
            tokens(&[("color", "black")]),
        );

        assert!(!light_only.has_dark_mode());
        assert!(!dark_only.has_dark_mode());
        assert!(both.has_dark_mode());
    }

    #[test]
    fn test_merged_over_keeps_base_keys() {
        let base = LightDarkTheme::new(
            tokens(&[("color", "red"), ("bgColor", "white")]),
            tokens(&[("color", "black")]),
        );
        let theme = LightDarkTheme::new(tokens(&[("color", "teal")]), TokenMap::new());

        let merged = theme.merged_over(&base);
        assert_eq!(merged.light, tokens(&[("color", "teal"), ("bgColor", "white")]));
        assert_eq!(merged.dark, tokens(&[("color", "black")]));
    }
}
