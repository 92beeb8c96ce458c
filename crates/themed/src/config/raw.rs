//! Theme configuration as written by users.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{Result, ThemeError};
use crate::tokens::TokenMap;

/// A theme configuration before normalization.
///
/// Each theme is either a flat token tree (optionally with `extends`) or an
/// object with `light` and `dark` token trees. The shape is decided once by
/// [`normalize`](crate::config::normalize).
///
/// ```yaml
/// default:
///   color: red
///   colors:
///     purple: "#800080"
/// mint:
///   extends: default
///   color: teal
/// chair:
///   light:
///     color: brown
///   dark:
///     extends: mint
///     color: darkbrown
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RawConfig(IndexMap<String, TokenMap>);

impl RawConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from YAML content.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| ThemeError::Config {
            path: None,
            message: e.to_string(),
        })
    }

    /// Parses a configuration from JSON content.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ThemeError::Config {
            path: None,
            message: e.to_string(),
        })
    }

    /// Loads a configuration file. `.json` files are read as JSON, anything
    /// else as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ThemeError::Config {
            path: Some(path.to_path_buf()),
            message: e.to_string(),
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        };

        parsed.map_err(|e| match e {
            ThemeError::Config { message, .. } => ThemeError::Config {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        })
    }

    pub fn insert(&mut self, name: impl Into<String>, theme: TokenMap) {
        self.0.insert(name.into(), theme);
    }

    pub fn get(&self, name: &str) -> Option<&TokenMap> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TokenMap)> {
        self.0.iter().map(|(name, theme)| (name.as_str(), theme))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, TokenMap)> for RawConfig {
    fn from_iter<I: IntoIterator<Item = (String, TokenMap)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{lookup, Lookup};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_from_yaml_keeps_order() {
        let config = RawConfig::from_yaml(
            r#"
            zeta:
              color: red
            alpha:
              color: blue
            "#,
        )
        .unwrap();

        let names: Vec<&str> = config.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_from_json_nested() {
        let config =
            RawConfig::from_json(r##"{ "default": { "colors": { "purple": "#800080" } } }"##)
                .unwrap();
        let theme = config.get("default").unwrap();
        assert_eq!(lookup(theme, "colors.purple"), Lookup::Value("#800080"));
    }

    #[test]
    fn test_from_yaml_invalid() {
        let result = RawConfig::from_yaml("default: [1, 2");
        assert!(matches!(result, Err(ThemeError::Config { path: None, .. })));
    }

    #[test]
    fn test_from_file_by_extension() {
        let temp_dir = TempDir::new().unwrap();
        let json_path = temp_dir.path().join("theme.json");
        let yaml_path = temp_dir.path().join("theme.yml");
        fs::write(&json_path, r#"{ "default": { "color": "red" } }"#).unwrap();
        fs::write(&yaml_path, "default:\n  color: blue\n").unwrap();

        let json = RawConfig::from_file(&json_path).unwrap();
        let yaml = RawConfig::from_file(&yaml_path).unwrap();
        assert_eq!(lookup(json.get("default").unwrap(), "color"), Lookup::Value("red"));
        assert_eq!(lookup(yaml.get("default").unwrap(), "color"), Lookup::Value("blue"));
    }

    #[test]
    fn test_from_file_error_carries_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        match RawConfig::from_file(&path) {
            Err(ThemeError::Config { path: Some(p), .. }) => assert_eq!(p, path),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_from_file_not_found() {
        let result = RawConfig::from_file("/nonexistent/path/theme.yaml");
        assert!(matches!(result, Err(ThemeError::Config { path: Some(_), .. })));
    }
}
