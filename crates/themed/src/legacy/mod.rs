//! Output for targets without custom property support.
//!
//! References are replaced by the authority theme's literal values, and every
//! other (theme, scheme) pair gets a copy of the rule that only carries the
//! themed declarations, scoped under the theme's class:
//!
//! ```css
//! .test { color: purple; }
//! .mint .test { color: teal; }
//! .mint.dark .test { color: darkteal; }
//! ```

use indexmap::IndexSet;

use crate::config::{ColorScheme, LightDarkTheme, ResolvedConfig};
use crate::error::{Result, ThemeError};
use crate::processor::ThemeOptions;
use crate::reference::{self, mentions_theme, ParsedValue};
use crate::selector::{has_theme_root, split_selector_list, strip_marker, strip_theme_root};
use crate::stylesheet::{AtRuleBody, Declaration, Node, Rule, Stylesheet};
use crate::tokens::{lookup, Lookup};

/// Rewrites `sheet` for legacy targets, appending override rules.
pub fn apply(sheet: &mut Stylesheet, config: &ResolvedConfig, options: &ThemeOptions) -> Result<()> {
    let default_theme = options.get_default_theme();
    let authority = config.get(default_theme);

    let single = options.single_theme().and_then(|name| config.get(name));
    let base = match (single, authority) {
        (Some(theme), Some(authority)) => Some(theme.merged_over(authority)),
        (Some(theme), None) => Some(theme.clone()),
        (None, authority) => authority.cloned(),
    };
    let base_name = match single {
        Some(_) => options.single_theme().unwrap_or(default_theme),
        None => default_theme,
    };

    let generator = LegacyGenerator {
        config,
        options,
        authority,
        base: base.as_ref(),
        base_name,
    };
    generator.process_nodes(&mut sheet.nodes)?;

    if options.force_empty_theme_selectors {
        let mut names = IndexSet::new();
        for name in config.names() {
            names.insert(name.to_string());
            names.insert(options.light_class.clone());
            names.insert(options.dark_class.clone());
        }
        for name in names {
            sheet.push_rule(Rule::new(format!(".{}", name)));
        }
    }

    Ok(())
}

struct LegacyGenerator<'a> {
    config: &'a ResolvedConfig,
    options: &'a ThemeOptions,
    authority: Option<&'a LightDarkTheme>,
    /// The theme substituted into the original rules.
    base: Option<&'a LightDarkTheme>,
    base_name: &'a str,
}

/// A declaration that referenced tokens, kept for the override rules.
struct ThemedDeclaration {
    original: Declaration,
    parsed: ParsedValue,
}

impl LegacyGenerator<'_> {
    /// Processes the rules of one container and appends their overrides to
    /// the same container.
    fn process_nodes(&self, nodes: &mut Vec<Node>) -> Result<()> {
        let mut overrides = Vec::new();

        for node in nodes.iter_mut() {
            match node {
                Node::Rule(rule) => overrides.extend(self.process_rule(rule)?),
                Node::AtRule(at_rule) => match &mut at_rule.body {
                    AtRuleBody::Rules(children) => self.process_nodes(children)?,
                    AtRuleBody::Declarations(declarations) => {
                        self.substitute_base(declarations)?;
                    }
                    AtRuleBody::None => {}
                },
            }
        }

        nodes.extend(overrides.into_iter().map(Node::Rule));
        Ok(())
    }

    /// Substitutes base values into `declarations`, returning the ones that
    /// referenced tokens in their original form.
    fn substitute_base(&self, declarations: &mut Vec<Declaration>) -> Result<Vec<ThemedDeclaration>> {
        let mut themed = Vec::new();
        let mut kept = Vec::with_capacity(declarations.len());

        for declaration in declarations.drain(..) {
            if !mentions_theme(&declaration.value) {
                kept.push(declaration);
                continue;
            }

            let location = declaration.location;
            let parsed = reference::parse(&declaration.value).map_err(|e| e.at(location))?;
            if !parsed.has_references() {
                kept.push(declaration);
                continue;
            }

            let value = self
                .substitute(&parsed, self.base, self.base_name, ColorScheme::Light)
                .map_err(|e| e.at(location))?;

            if let Some(value) = value {
                kept.push(Declaration {
                    value,
                    ..declaration.clone()
                });
            }
            themed.push(ThemedDeclaration {
                original: declaration,
                parsed,
            });
        }

        *declarations = kept;
        Ok(themed)
    }

    fn process_rule(&self, rule: &mut Rule) -> Result<Vec<Rule>> {
        let original_selector = rule.selector.clone();
        rule.selector = strip_theme_root(&rule.selector);

        let themed = self.substitute_base(&mut rule.declarations)?;
        if self.options.single_theme().is_some() || themed.is_empty() {
            return Ok(Vec::new());
        }

        let default_theme = self.options.get_default_theme();
        let mut overrides = Vec::new();

        for (name, theme) in self.config.iter() {
            for scheme in ColorScheme::ALL {
                if name == default_theme && scheme == ColorScheme::Light {
                    continue;
                }
                if theme.scheme(scheme).is_empty() {
                    continue;
                }

                let class = match scheme {
                    ColorScheme::Light => format!(".{}", name),
                    ColorScheme::Dark if name == default_theme => {
                        format!(".{}", self.options.dark_class)
                    }
                    ColorScheme::Dark => format!(".{}.{}", name, self.options.dark_class),
                };

                let mut declarations = Vec::new();
                for item in &themed {
                    let value = self
                        .substitute(&item.parsed, Some(theme), name, scheme)
                        .map_err(|e| e.at(item.original.location))?;
                    if let Some(value) = value {
                        declarations.push(Declaration {
                            value,
                            ..item.original.clone()
                        });
                    }
                }

                if declarations.is_empty() && !self.options.force_empty_theme_selectors {
                    continue;
                }

                overrides.push(Rule {
                    selector: scope_selector(&original_selector, &class),
                    declarations,
                    location: rule.location,
                });
            }
        }

        Ok(overrides)
    }

    /// Replaces every reference in `parsed` with the value from `theme`'s
    /// `scheme` tokens.
    ///
    /// A value missing from the theme falls back to the authority theme when
    /// the declaration holds more than one reference. When it is still
    /// missing the declaration is dropped (`Ok(None)`).
    fn substitute(
        &self,
        parsed: &ParsedValue,
        theme: Option<&LightDarkTheme>,
        name: &str,
        scheme: ColorScheme,
    ) -> Result<Option<String>> {
        let multiple = parsed.reference_count() > 1;

        parsed.substitute(|reference| {
            let path = reference.path.as_str();
            let Some(theme) = theme else {
                return Err(ThemeError::MissingThemeKey {
                    theme: name.to_string(),
                    key: path.to_string(),
                    location: None,
                });
            };

            match lookup(theme.scheme(scheme), path) {
                Lookup::Value(value) => Ok(Some(value.to_string())),
                Lookup::Group => Err(ThemeError::NotAValue {
                    key: path.to_string(),
                    location: None,
                }),
                Lookup::Missing if multiple => Ok(self
                    .authority
                    .and_then(|authority| lookup(authority.scheme(scheme), path).value())
                    .map(str::to_string)),
                Lookup::Missing => Ok(None),
            }
        })
    }
}

/// Scopes each branch of `selector` under `class`. Branches containing
/// `:theme-root` put the class on the marked element instead.
fn scope_selector(selector: &str, class: &str) -> String {
    split_selector_list(selector)
        .iter()
        .map(|branch| {
            if !has_theme_root(branch) {
                return format!("{} {}", class, branch);
            }

            let stripped = strip_marker(branch);
            if stripped == "*" {
                format!("*{}", class)
            } else if stripped.starts_with(char::is_whitespace) {
                format!("{} {}", class, stripped.trim_start())
            } else {
                format!("{}{}", class, stripped)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_plain_branches() {
        assert_eq!(
            scope_selector(".expanded, .foo", ".light"),
            ".light .expanded, .light .foo"
        );
    }

    #[test]
    fn test_scope_theme_root() {
        assert_eq!(scope_selector(":theme-root(*)", ".light"), "*.light");
        assert_eq!(scope_selector(":theme-root.test", ".mint.dark"), ".mint.dark.test");
        assert_eq!(scope_selector(":theme-root .another", ".light"), ".light .another");
        assert_eq!(scope_selector(":theme-root > .child", ".light"), ".light > .child");
    }

    #[test]
    fn test_scope_mixed_branches() {
        assert_eq!(
            scope_selector(".a,\n:theme-root.b", ".mint"),
            ".mint .a, .mint.b"
        );
    }
}
