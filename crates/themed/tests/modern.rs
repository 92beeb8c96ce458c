use std::path::Path;

use themed::{
    ProcessOutput, RawConfig, ScopedName, SyntaxErrorKind, ThemeError, ThemeOptions,
    ThemeProcessor,
};

fn process(css: &str, yaml: &str, options: ThemeOptions) -> themed::Result<ProcessOutput> {
    process_at(css, yaml, options, None)
}

fn process_at(
    css: &str,
    yaml: &str,
    options: ThemeOptions,
    path: Option<&Path>,
) -> themed::Result<ProcessOutput> {
    let config = RawConfig::from_yaml(yaml)?;
    let processor = ThemeProcessor::new(options.config(config).without_component_themes())?;
    processor.process(css, path)
}

/// Output with indentation and line breaks removed.
fn squash(css: &str) -> String {
    css.lines().map(str::trim).collect()
}

const COLORS: &str = r#"
default:
  color: red
  colors:
    primary: red
    secondary: blue
mint:
  color: teal
"#;

#[test]
fn shared_tokens_are_declared_on_root() {
    let output = process(
        ".test {\n  background-image: linear-gradient(@theme colors.primary, @theme colors.secondary);\n  color: @theme colors.primary;\n}",
        "default:\n  colors:\n    primary: red\n    secondary: blue\n",
        ThemeOptions::new(),
    )
    .unwrap();

    assert_eq!(
        squash(&output.css),
        ".test {\
         background-image: linear-gradient(var(--colors-primary), var(--colors-secondary, blue));\
         color: var(--colors-primary);\
         }\
         :root {--colors-primary: red;}"
    );
    assert!(output.warnings.is_empty());
}

#[test]
fn dark_scheme_of_default_theme() {
    let output = process(
        ".test { color: @theme color; }",
        "default:\n  light:\n    color: black\n  dark:\n    color: white\n",
        ThemeOptions::new(),
    )
    .unwrap();

    assert_eq!(
        squash(&output.css),
        ".test {color: var(--color, black);}.dark {--color: white;}"
    );
}

#[test]
fn other_themes_declare_differences() {
    let output = process(".test { color: theme('color'); }", COLORS, ThemeOptions::new()).unwrap();

    assert_eq!(
        squash(&output.css),
        ".test {color: var(--color, red);}.mint {--color: teal;}"
    );
}

#[test]
fn identical_blocks_are_merged() {
    let output = process(
        ".test { color: @theme color; }",
        "default:\n  color: red\nmint:\n  color: teal\nocean:\n  color: teal\n",
        ThemeOptions::new(),
    )
    .unwrap();

    assert_eq!(
        squash(&output.css),
        ".test {color: var(--color, red);}.mint, .ocean {--color: teal;}"
    );
}

#[test]
fn single_theme_is_merged_over_default() {
    let output = process(
        ".test {\n  color: @theme color;\n  background: @theme bgColor;\n}",
        r#"
default:
  light:
    color: red
    bgColor: white
  dark:
    color: blue
mint:
  light:
    bgColor: teal
  dark:
    bgColor: magenta
"#,
        ThemeOptions::new().force_single_theme("mint"),
    )
    .unwrap();

    assert_eq!(
        squash(&output.css),
        ".test {color: var(--color, red);background: var(--bgColor, teal);}\
         .dark {--color: blue;--bgColor: magenta;}"
    );
}

#[test]
fn optimized_single_theme_writes_values() {
    let output = process(
        ".test { color: @theme color; }",
        COLORS,
        ThemeOptions::new()
            .force_single_theme("mint")
            .optimize_single_theme(true),
    )
    .unwrap();

    assert_eq!(squash(&output.css), ".test {color: teal;}");
}

#[test]
fn scoped_variable_names() {
    let output = process_at(
        ".test { color: @theme color; }",
        COLORS,
        ThemeOptions::new().modules(ScopedName::template("[folder]-[name]-[local]")),
        Some(Path::new("/app/foo.css")),
    )
    .unwrap();

    assert!(output.css.contains("var(--app-foo-color, red)"));
    assert!(output.css.contains("--app-foo-color: teal;"));
}

#[test]
fn scoped_variable_names_from_function() {
    let output = process(
        ".a { color: @theme color; }\n.b { color: @theme color; }",
        COLORS,
        ThemeOptions::new().modules(ScopedName::function(|name, _, _| format!("x-{}", name))),
    )
    .unwrap();

    assert!(output.css.contains("color: var(--x-color);"));
    assert!(output.css.contains(":root {\n  --x-color: red;\n}"));
}

#[test]
fn references_inside_media_queries() {
    let output = process(
        "@media (max-width: 10px) {\n  .a { color: @theme color; }\n}",
        COLORS,
        ThemeOptions::new(),
    )
    .unwrap();

    assert!(squash(&output.css).starts_with("@media (max-width: 10px) {.a {color: var(--color, red);}}"));
}

#[test]
fn unknown_token_is_an_error() {
    let err = process(".test { color: @theme colors.purple; }", COLORS, ThemeOptions::new())
        .unwrap_err();

    match err {
        ThemeError::UnknownToken { key, location } => {
            assert_eq!(key, "colors.purple");
            assert_eq!(location.map(|l| l.line), Some(1));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn group_reference_is_an_error() {
    let err = process(".test { color: @theme colors; }", COLORS, ThemeOptions::new()).unwrap_err();
    assert!(matches!(err, ThemeError::NotAValue { ref key, .. } if key == "colors"));
}

#[test]
fn missing_space_is_an_error() {
    let err = process(".test { color: @themecolor; }", COLORS, ThemeOptions::new()).unwrap_err();
    assert!(matches!(
        err,
        ThemeError::Syntax {
            kind: SyntaxErrorKind::MissingSpace,
            location: Some(_),
            ..
        }
    ));
}

#[test]
fn declarations_without_references_are_untouched() {
    let output = process(
        ".test { width: 1px; font-family: theme-sans; }",
        COLORS,
        ThemeOptions::new(),
    )
    .unwrap();

    assert_eq!(squash(&output.css), ".test {width: 1px;font-family: theme-sans;}");
}

#[test]
fn quoted_strings_are_not_references() {
    let output = process(
        ".test { content: \"pick a theme (x)\"; color: @theme color; }",
        COLORS,
        ThemeOptions::new(),
    )
    .unwrap();

    assert!(output
        .css
        .contains("content: \"pick a theme (x)\";\n  color: var(--color, red);"));
}
