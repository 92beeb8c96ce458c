use std::collections::BTreeMap;

use proptest::prelude::*;
use proptest::sample::Index;
use themed::config::resolve;
use themed::{RawConfig, ThemeError, TokenMap, TokenValue};

fn raw(yaml: &str) -> RawConfig {
    RawConfig::from_yaml(yaml).unwrap()
}

#[test]
fn long_cycle_is_reported_in_order() {
    let err = resolve(
        &raw(
            r#"
one:
  extends: five
two:
  extends: one
three:
  extends: two
four:
  extends: three
five:
  extends: four
"#,
        ),
        None,
    )
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Circular theme extension found! 'one' => 'five' => 'four' => 'three' => 'two' => 'one'"
    );
}

#[test]
fn self_extension() {
    let err = resolve(&raw("myTheme:\n  extends: myTheme\n"), None).unwrap_err();
    assert!(matches!(err, ThemeError::SelfExtension { ref theme } if theme == "myTheme"));
}

#[test]
fn missing_extension() {
    let err = resolve(&raw("mint:\n  extends: nope\n"), None).unwrap_err();
    assert_eq!(err.to_string(), "Theme to extend from not found! 'nope'");
}

#[test]
fn scheme_level_cycle() {
    let err = resolve(
        &raw(
            r#"
a:
  light:
    extends: b
  dark: {}
b:
  light:
    extends: a
  dark: {}
"#,
        ),
        None,
    )
    .unwrap_err();

    assert!(matches!(err, ThemeError::CircularExtension { .. }));
}

#[test]
fn chained_extension_inherits_transitively() {
    let resolved = resolve(
        &raw(
            r#"
default:
  color: red
  width: 1px
mint:
  extends: default
  color: teal
ocean:
  extends: mint
  width: 2px
"#,
        ),
        None,
    )
    .unwrap();

    let ocean = resolved.get("ocean").unwrap();
    assert_eq!(ocean.light.get("color").and_then(TokenValue::as_value), Some("teal"));
    assert_eq!(ocean.light.get("width").and_then(TokenValue::as_value), Some("2px"));
}

#[test]
fn scheme_parent_declared_later() {
    let resolved = resolve(
        &raw(
            r#"
chair:
  light:
    extends: base
    width: 2px
  dark:
base:
  color: red
  width: 1px
"#,
        ),
        None,
    )
    .unwrap();

    let chair = resolved.get("chair").unwrap();
    assert_eq!(chair.light.get("color").and_then(TokenValue::as_value), Some("red"));
    assert_eq!(chair.light.get("width").and_then(TokenValue::as_value), Some("2px"));
    assert!(chair.dark.is_empty());
}

type ThemeSpec = (BTreeMap<String, String>, [Option<Index>; 3]);

/// Themes where each may extend an earlier one at the theme level and in
/// either scheme, so the graph has no cycles.
fn acyclic_themes() -> impl Strategy<Value = Vec<ThemeSpec>> {
    prop::collection::vec(
        (
            prop::collection::btree_map("t[a-z]{0,3}", "[a-z]{1,5}", 0..4),
            prop::array::uniform3(prop::option::of(any::<Index>())),
        ),
        1..6,
    )
}

fn token_map(tokens: &BTreeMap<String, String>, extends: Option<String>) -> TokenMap {
    let mut map = TokenMap::new();
    if let Some(parent) = extends {
        map.insert("extends".to_string(), TokenValue::Value(parent));
    }
    for (key, value) in tokens {
        map.insert(key.clone(), TokenValue::Value(value.clone()));
    }
    map
}

fn build(themes: &[ThemeSpec], reversed: bool) -> RawConfig {
    let mut entries: Vec<(String, TokenMap)> = themes
        .iter()
        .enumerate()
        .map(|(i, (tokens, [theme, light, dark]))| {
            let parent = |index: &Option<Index>| {
                index
                    .filter(|_| i > 0)
                    .map(|index| format!("theme{}", index.index(i)))
            };

            let map = if light.is_none() && dark.is_none() {
                token_map(tokens, parent(theme))
            } else {
                let mut map = TokenMap::new();
                if let Some(theme) = parent(theme) {
                    map.insert("extends".to_string(), TokenValue::Value(theme));
                }
                map.insert("light".to_string(), token_map(tokens, parent(light)).into());
                map.insert("dark".to_string(), token_map(tokens, parent(dark)).into());
                map
            };
            (format!("theme{}", i), map)
        })
        .collect();

    if reversed {
        entries.reverse();
    }
    entries.into_iter().collect()
}

proptest! {
    #[test]
    fn resolution_ignores_theme_order(themes in acyclic_themes()) {
        let forward = resolve(&build(&themes, false), None).unwrap();
        let backward = resolve(&build(&themes, true), None).unwrap();

        for i in 0..themes.len() {
            let name = format!("theme{}", i);
            prop_assert_eq!(forward.get(&name), backward.get(&name));
        }
    }

    #[test]
    fn themes_without_extends_resolve_to_themselves(
        tokens in prop::collection::vec(
            prop::collection::btree_map("t[a-z]{0,3}", "[a-z]{1,5}", 0..4),
            1..5,
        )
    ) {
        let themes: Vec<ThemeSpec> =
            tokens.into_iter().map(|t| (t, [None, None, None])).collect();
        let resolved = resolve(&build(&themes, false), None).unwrap();

        for (i, (tokens, _)) in themes.iter().enumerate() {
            let theme = resolved.get(&format!("theme{}", i)).unwrap();
            prop_assert_eq!(theme.light.len(), tokens.len());
            for (key, value) in tokens {
                prop_assert_eq!(theme.light.get(key).and_then(TokenValue::as_value), Some(value.as_str()));
            }
            prop_assert!(theme.dark.is_empty());
        }
    }
}
