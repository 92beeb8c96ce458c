//! Output for targets with custom property support.
//!
//! References become `var(--name)`. The authority theme's values are
//! declared on `:root` (and `.dark` for its dark scheme); every other theme
//! only declares what differs from the authority:
//!
//! ```css
//! .test { color: var(--color, red); }   /* used once: value inlined */
//! .dark { --color: blue; }
//! .mint.light { --color: teal; }
//! ```

mod blocks;
mod substitute;

use crate::config::{LightDarkTheme, ResolvedConfig};
use crate::error::Result;
use crate::localize::Localizer;
use crate::processor::{ThemeOptions, Warning};
use crate::stylesheet::{Node, Stylesheet};
use crate::usage::VariableUsage;

use blocks::BlockGenerator;
use substitute::Substitution;

/// Rewrites `sheet` for modern targets and appends the theme blocks.
pub fn apply(
    sheet: &mut Stylesheet,
    config: &ResolvedConfig,
    options: &ThemeOptions,
    localizer: &Localizer<'_>,
) -> Result<Vec<Warning>> {
    let default_theme = options.get_default_theme();
    let authority = config.get(default_theme).cloned().unwrap_or_default();

    // The single theme is completed with the authority's tokens.
    let single: Option<LightDarkTheme> =
        options
            .single_theme()
            .map(|name| match config.get(name) {
                Some(theme) if name != default_theme => theme.merged_over(&authority),
                _ => authority.clone(),
            });

    let optimize = options.optimize_single_theme;
    let literal = optimize && single.as_ref().is_some_and(|theme| !theme.has_dark_mode());
    let inline = options.inline_root_theme_variables && !(single.is_some() && optimize);

    let usage = VariableUsage::analyze(sheet)?;
    let values = single.as_ref().unwrap_or(&authority);

    let warnings = Substitution {
        authority: &authority,
        values,
        usage: &usage,
        localizer,
        literal,
        inline,
    }
    .apply(sheet)?;

    let generator = BlockGenerator {
        config,
        default_theme,
        authority: &authority,
        usage: &usage,
        localizer,
        inline,
        light_class: &options.light_class,
        dark_class: &options.dark_class,
    };

    let blocks = match &single {
        Some(theme) => generator.single(theme, optimize),
        None => generator.themes(),
    };
    sheet.nodes.extend(blocks.into_iter().map(Node::Rule));

    Ok(warnings)
}
