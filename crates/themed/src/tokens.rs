//! Token trees and dotted token paths.
//!
//! A theme's tokens form a tree: leaves are string values, inner nodes are
//! ordered maps. Stylesheets address leaves with a [`TokenPath`] such as
//! `colors.purple`.
//!
//! ```yaml
//! color: red
//! colors:
//!   purple: "#800080"
//!   black: "#000"
//! ```
//!
//! Maps keep insertion order so that generated output follows the order the
//! configuration was written in.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};

/// An ordered map of token names to values or nested groups.
pub type TokenMap = IndexMap<String, TokenValue>;

/// A node in a token tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValue {
    /// A scalar value substituted into stylesheets.
    Value(String),
    /// A nested group of tokens.
    Group(TokenMap),
}

impl TokenValue {
    /// Returns the scalar value, if this is a leaf.
    pub fn as_value(&self) -> Option<&str> {
        match self {
            TokenValue::Value(value) => Some(value),
            TokenValue::Group(_) => None,
        }
    }

    /// Returns the nested group, if this is an inner node.
    pub fn as_group(&self) -> Option<&TokenMap> {
        match self {
            TokenValue::Group(group) => Some(group),
            TokenValue::Value(_) => None,
        }
    }
}

impl From<&str> for TokenValue {
    fn from(value: &str) -> Self {
        TokenValue::Value(value.to_string())
    }
}

impl From<String> for TokenValue {
    fn from(value: String) -> Self {
        TokenValue::Value(value)
    }
}

impl From<TokenMap> for TokenValue {
    fn from(group: TokenMap) -> Self {
        TokenValue::Group(group)
    }
}

impl<'de> Deserialize<'de> for TokenValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TokenValueVisitor)
    }
}

/// Accepts strings, numbers and booleans as values, maps as groups.
struct TokenValueVisitor;

impl<'de> Visitor<'de> for TokenValueVisitor {
    type Value = TokenValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a token value or a map of tokens")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<TokenValue, E> {
        Ok(TokenValue::Value(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<TokenValue, E> {
        Ok(TokenValue::Value(value))
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<TokenValue, E> {
        Ok(TokenValue::Value(value.to_string()))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<TokenValue, E> {
        Ok(TokenValue::Value(value.to_string()))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<TokenValue, E> {
        Ok(TokenValue::Value(value.to_string()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<TokenValue, E> {
        Ok(TokenValue::Value(value.to_string()))
    }

    /// A bare key (`dark:`) is an empty group.
    fn visit_unit<E: de::Error>(self) -> Result<TokenValue, E> {
        Ok(TokenValue::Group(TokenMap::new()))
    }

    fn visit_none<E: de::Error>(self) -> Result<TokenValue, E> {
        self.visit_unit()
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<TokenValue, A::Error> {
        let mut group = TokenMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, TokenValue>()? {
            group.insert(key, value);
        }
        Ok(TokenValue::Group(group))
    }
}

/// A dot-separated path addressing a leaf in a token tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenPath(String);

impl TokenPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// The custom property stem for this path: dots become dashes.
    pub fn variable_name(&self) -> String {
        self.0.replace('.', "-")
    }
}

impl fmt::Display for TokenPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TokenPath {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

/// Result of walking a [`TokenPath`] through a token tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Value(&'a str),
    Group,
    Missing,
}

impl<'a> Lookup<'a> {
    pub fn value(self) -> Option<&'a str> {
        match self {
            Lookup::Value(value) => Some(value),
            _ => None,
        }
    }
}

/// Walks the dotted segments of `path` through `tokens`.
pub fn lookup<'a>(tokens: &'a TokenMap, path: &str) -> Lookup<'a> {
    let mut current = tokens;
    let mut segments = path.split('.').peekable();

    while let Some(segment) = segments.next() {
        match current.get(segment) {
            None => return Lookup::Missing,
            Some(TokenValue::Value(value)) => {
                return if segments.peek().is_none() {
                    Lookup::Value(value)
                } else {
                    Lookup::Missing
                };
            }
            Some(TokenValue::Group(group)) => {
                if segments.peek().is_none() {
                    return Lookup::Group;
                }
                current = group;
            }
        }
    }

    Lookup::Missing
}

/// Merges `overlay` into `base`. Groups merge recursively, everything else is
/// replaced by the overlay. New keys are appended in overlay order.
pub fn deep_merge(base: &mut TokenMap, overlay: &TokenMap) {
    for (key, value) in overlay {
        match (base.get_mut(key), value) {
            (Some(TokenValue::Group(existing)), TokenValue::Group(incoming)) => {
                deep_merge(existing, incoming);
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Lists every leaf of `tokens` as `(dotted path, value)`, depth first, in
/// insertion order.
pub fn flatten(tokens: &TokenMap) -> Vec<(String, &str)> {
    fn walk<'a>(prefix: &str, tokens: &'a TokenMap, out: &mut Vec<(String, &'a str)>) {
        for (key, value) in tokens {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };
            match value {
                TokenValue::Value(v) => out.push((path, v)),
                TokenValue::Group(group) => walk(&path, group, out),
            }
        }
    }

    let mut out = Vec::new();
    walk("", tokens, &mut out);
    out
}
