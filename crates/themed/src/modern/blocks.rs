use tracing::debug;

use crate::config::{LightDarkTheme, ResolvedConfig};
use crate::localize::Localizer;
use crate::stylesheet::{Declaration, Rule};
use crate::tokens::{flatten, lookup, TokenMap};
use crate::usage::VariableUsage;

/// Builds the custom property blocks appended to modern output.
pub(super) struct BlockGenerator<'a> {
    pub config: &'a ResolvedConfig,
    pub default_theme: &'a str,
    pub authority: &'a LightDarkTheme,
    pub usage: &'a VariableUsage,
    pub localizer: &'a Localizer<'a>,
    pub inline: bool,
    pub light_class: &'a str,
    pub dark_class: &'a str,
}

impl BlockGenerator<'_> {
    /// Blocks for every configured theme, in configuration order.
    pub fn themes(&self) -> Vec<Rule> {
        let mut blocks = Vec::new();

        for (name, theme) in self.config.iter() {
            if name == self.default_theme {
                blocks.push(self.block(":root", &theme.light, |path, _| self.needs_root(path)));
                blocks.push(self.block(&format!(".{}", self.dark_class), &theme.dark, |_, _| true));
                continue;
            }

            let light = |path: &str, value: &str| {
                lookup(&self.authority.light, path).value() != Some(value)
            };
            let dark = |path: &str, value: &str| {
                let base = lookup(&self.authority.dark, path)
                    .value()
                    .or_else(|| lookup(&self.authority.light, path).value());
                base != Some(value)
            };

            if !theme.has_dark_mode() && !self.authority.has_dark_mode() {
                blocks.push(self.block(&format!(".{}", name), &theme.light, light));
            } else {
                blocks.push(self.block(
                    &format!(".{}.{}", name, self.light_class),
                    &theme.light,
                    light,
                ));
                blocks.push(self.block(
                    &format!(".{}.{}", name, self.dark_class),
                    &theme.dark,
                    dark,
                ));
            }
        }

        merge_identical(blocks.into_iter().flatten().collect())
    }

    /// Blocks for a single theme already merged over the authority.
    pub fn single(&self, theme: &LightDarkTheme, optimize: bool) -> Vec<Rule> {
        let mut blocks = Vec::new();
        if theme.has_dark_mode() {
            blocks.push(self.block(":root", &theme.light, |path, _| self.needs_root(path)));
            blocks.push(self.block(&format!(".{}", self.dark_class), &theme.dark, |_, _| true));
        } else if !optimize {
            blocks.push(self.block(":root", &theme.light, |path, _| self.needs_root(path)));
        }
        blocks.into_iter().flatten().collect()
    }

    /// Tokens used exactly once are inlined as fallbacks and need no
    /// declaration in `:root`.
    fn needs_root(&self, path: &str) -> bool {
        !(self.inline && self.usage.count(path) == 1)
    }

    /// A block with every referenced token of `tokens` that passes `keep`.
    /// Returns `None` when nothing is left.
    fn block<F>(&self, selector: &str, tokens: &TokenMap, keep: F) -> Option<Rule>
    where
        F: Fn(&str, &str) -> bool,
    {
        let declarations: Vec<Declaration> = flatten(tokens)
            .into_iter()
            .filter(|(path, value)| self.usage.is_used(path) && keep(path.as_str(), *value))
            .map(|(path, value)| {
                let name = self.localizer.localize(&path.replace('.', "-"));
                Declaration::new(format!("--{}", name), value)
            })
            .collect();

        if declarations.is_empty() {
            return None;
        }

        debug!("Generated {} with {} variables", selector, declarations.len());
        let mut rule = Rule::new(selector);
        rule.declarations = declarations;
        Some(rule)
    }
}

/// Merges blocks with identical declarations into one block with a selector
/// list, at the position of the first.
fn merge_identical(blocks: Vec<Rule>) -> Vec<Rule> {
    let mut merged: Vec<Rule> = Vec::with_capacity(blocks.len());
    for block in blocks {
        match merged
            .iter_mut()
            .find(|existing| same_declarations(&existing.declarations, &block.declarations))
        {
            Some(existing) => {
                existing.selector = format!("{}, {}", existing.selector, block.selector);
            }
            None => merged.push(block),
        }
    }
    merged
}

fn same_declarations(a: &[Declaration], b: &[Declaration]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| x.property == y.property && x.value == y.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_identical_keeps_first_position() {
        let rule = |selector: &str, value: &str| {
            let mut rule = Rule::new(selector);
            rule.declarations.push(Declaration::new("--color", value));
            rule
        };

        let merged = merge_identical(vec![
            rule(".a", "teal"),
            rule(".b", "red"),
            rule(".c", "teal"),
        ]);

        let selectors: Vec<&str> = merged.iter().map(|r| r.selector.as_str()).collect();
        assert_eq!(selectors, vec![".a, .c", ".b"]);
    }
}
