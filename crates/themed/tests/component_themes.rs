use std::fs;
use std::path::Path;

use tempfile::TempDir;
use themed::{
    ComponentTheme, RawConfig, SiblingThemeFile, ThemeError, ThemeOptions, ThemeProcessor,
};

fn processor(options: ThemeOptions) -> ThemeProcessor {
    let config = RawConfig::from_yaml("default:\n  color: red\nmint:\n  color: teal\n").unwrap();
    ThemeProcessor::new(options.config(config)).unwrap()
}

#[test]
fn sibling_theme_overrides_global_config() {
    let dir = TempDir::new().unwrap();
    let css_path = dir.path().join("button.css");
    let theme_path = dir.path().join("theme.yaml");
    fs::write(&theme_path, "default:\n  color: purple\n").unwrap();

    let output = processor(ThemeOptions::new())
        .process(".button { color: @theme color; }", Some(css_path.as_path()))
        .unwrap();

    assert!(output.css.contains("var(--color, purple)"));
    assert!(output.css.contains(".mint {\n  --color: teal;\n}"));
    assert_eq!(output.dependencies, vec![theme_path]);
}

#[test]
fn json_sibling_theme() {
    let dir = TempDir::new().unwrap();
    let css_path = dir.path().join("button.css");
    fs::write(
        dir.path().join("theme.json"),
        r#"{ "mint": { "color": "green" } }"#,
    )
    .unwrap();

    let output = processor(ThemeOptions::new())
        .process(".button { color: @theme color; }", Some(css_path.as_path()))
        .unwrap();

    assert!(output.css.contains("--color: green;"));
    assert_eq!(output.dependencies.len(), 1);
}

#[test]
fn no_sibling_theme() {
    let dir = TempDir::new().unwrap();
    let css_path = dir.path().join("button.css");

    let output = processor(ThemeOptions::new())
        .process(".button { color: @theme color; }", Some(css_path.as_path()))
        .unwrap();

    assert!(output.css.contains("var(--color, red)"));
    assert!(output.dependencies.is_empty());
}

#[test]
fn custom_file_names() {
    let dir = TempDir::new().unwrap();
    let css_path = dir.path().join("button.css");
    fs::write(dir.path().join("button.theme.yml"), "default:\n  color: pink\n").unwrap();
    fs::write(dir.path().join("theme.yaml"), "default:\n  color: purple\n").unwrap();

    let output = processor(
        ThemeOptions::new().component_themes(SiblingThemeFile::with_names(["button.theme.yml"])),
    )
    .process(".button { color: @theme color; }", Some(css_path.as_path()))
    .unwrap();

    assert!(output.css.contains("var(--color, pink)"));
}

#[test]
fn invalid_sibling_theme_is_an_error() {
    let dir = TempDir::new().unwrap();
    let css_path = dir.path().join("button.css");
    let theme_path = dir.path().join("theme.yaml");
    fs::write(&theme_path, "default: [not, a, theme]\n").unwrap();

    let err = processor(ThemeOptions::new())
        .process(".button { color: @theme color; }", Some(css_path.as_path()))
        .unwrap_err();

    match err {
        ThemeError::Config { path, .. } => assert_eq!(path, Some(theme_path)),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn component_theme_can_introduce_cycles() {
    let resolver = |_: &Path| -> themed::Result<Option<ComponentTheme>> {
        Ok(Some(ComponentTheme {
            config: RawConfig::from_yaml("default:\n  extends: mint\nmint:\n  extends: default\n")?,
            source: None,
        }))
    };
    let options = ThemeOptions::new().component_themes(resolver);

    let err = processor(options)
        .process(".button { color: @theme color; }", Some(Path::new("button.css")))
        .unwrap_err();
    assert!(matches!(err, ThemeError::CircularExtension { .. }));
}
