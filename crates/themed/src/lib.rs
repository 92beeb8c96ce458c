//! # Themed - build-time theme tokens for stylesheets
//!
//! Stylesheets reference named design tokens instead of literal values:
//!
//! ```css
//! .button {
//!   color: @theme colors.primary;
//!   background: theme('colors.background');
//! }
//! ```
//!
//! The tokens live in a YAML or JSON configuration that maps theme names to
//! token trees. A theme can split its tokens into `light` and `dark` schemes
//! and inherit from another theme with `extends`:
//!
//! ```yaml
//! default:
//!   light:
//!     colors:
//!       primary: purple
//!   dark:
//!     colors:
//!       primary: violet
//! mint:
//!   extends: default
//!   colors:
//!     primary: teal
//! ```
//!
//! [`ThemeProcessor`] rewrites each reference and appends the rules that make
//! theme switching work. Two targets are supported:
//!
//! - [`Target::Modern`]: references become `var(--colors-primary)` and every
//!   theme gets a block of custom properties (`:root`, `.dark`, `.mint.light`).
//! - [`Target::Legacy`]: references become literal values and every other
//!   theme gets a scoped copy of the rule (`.mint .button { .. }`).
//!
//! ## Quick start
//!
//! ```rust
//! use themed::{RawConfig, Target, ThemeOptions, ThemeProcessor};
//!
//! let config = RawConfig::from_yaml(
//!     "default:\n  color: purple\nmint:\n  color: teal\n",
//! )?;
//! let processor = ThemeProcessor::new(
//!     ThemeOptions::new()
//!         .config(config)
//!         .target(Target::Legacy)
//!         .without_component_themes(),
//! )?;
//!
//! let output = processor.process(".test { color: @theme color; }", None)?;
//! assert!(output.css.contains(".test {\n  color: purple;\n}"));
//! assert!(output.css.contains(".mint .test {\n  color: teal;\n}"));
//! # Ok::<(), themed::ThemeError>(())
//! ```
//!
//! ## Modules
//!
//! - [`config`]: loading, normalizing and resolving theme configurations
//! - [`stylesheet`]: the rule tree that is rewritten and printed
//! - [`reference`]: parsing of `@theme` and `theme()` references
//! - [`modern`] and [`legacy`]: the two output generators
//! - [`lint`]: reference checks that report instead of failing

pub mod config;
pub mod error;
pub mod legacy;
pub mod lint;
pub mod localize;
pub mod modern;
pub mod processor;
pub mod reference;
pub mod selector;
pub mod stylesheet;
pub mod tokens;
pub mod usage;

pub use config::{ColorScheme, LightDarkTheme, RawConfig, ResolvedConfig};
pub use error::{Location, Result, SyntaxErrorKind, ThemeError};
pub use lint::{has_token, lint_stylesheet, lint_value, LintKind, LintMessage};
pub use localize::ScopedName;
pub use processor::{
    ComponentTheme, ComponentThemeResolver, ProcessOutput, SiblingThemeFile, Target,
    ThemeOptions, ThemeProcessor, Warning, COMPONENT_THEME_FILES,
};
pub use stylesheet::Stylesheet;
pub use tokens::{TokenMap, TokenPath, TokenValue};
