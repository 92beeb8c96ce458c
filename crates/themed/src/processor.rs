//! Options and the per-stylesheet pipeline.
//!
//! A [`ThemeProcessor`] owns the global configuration and options. Each call
//! to [`process`](ThemeProcessor::process) resolves the configuration for one
//! stylesheet (global config plus an optional component theme found beside
//! it), rewrites every theme reference and appends the generated rules.
//!
//! ```rust
//! use themed::{RawConfig, ThemeOptions, ThemeProcessor};
//!
//! let config = RawConfig::from_yaml("default:\n  color: red\nmint:\n  color: teal\n").unwrap();
//! let processor = ThemeProcessor::new(
//!     ThemeOptions::new().config(config).without_component_themes(),
//! )
//! .unwrap();
//!
//! let output = processor.process(".test { color: @theme color; }", None).unwrap();
//! assert!(output.css.contains("var(--color, red)"));
//! assert!(output.css.contains(".mint {"));
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::config::{self, RawConfig, ResolvedConfig};
use crate::error::{Location, Result, ThemeError};
use crate::legacy;
use crate::localize::{Localizer, ScopedName};
use crate::modern;
use crate::stylesheet::Stylesheet;

/// File names looked up beside a stylesheet for a component theme.
pub const COMPONENT_THEME_FILES: &[&str] = &["theme.yaml", "theme.yml", "theme.json"];

/// Which kind of output to generate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Target {
    /// Custom properties with per-theme override blocks.
    #[default]
    Modern,
    /// Literal values with per-theme override rules, for targets without
    /// custom property support.
    Legacy,
}

/// A recoverable problem reported alongside the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub message: String,
    pub location: Option<Location>,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(location) => write!(f, "{} ({})", self.message, location),
            None => f.write_str(&self.message),
        }
    }
}

/// Theme overrides that apply to a single stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentTheme {
    pub config: RawConfig,
    /// The file the overrides came from, reported as a dependency.
    pub source: Option<PathBuf>,
}

/// Finds the component theme for a stylesheet.
pub trait ComponentThemeResolver: Send + Sync {
    fn resolve(&self, stylesheet: &Path) -> Result<Option<ComponentTheme>>;
}

impl<F> ComponentThemeResolver for F
where
    F: Fn(&Path) -> Result<Option<ComponentTheme>> + Send + Sync,
{
    fn resolve(&self, stylesheet: &Path) -> Result<Option<ComponentTheme>> {
        self(stylesheet)
    }
}

/// Looks for `theme.yaml`, `theme.yml` or `theme.json` in the stylesheet's
/// directory.
#[derive(Debug, Clone)]
pub struct SiblingThemeFile {
    names: Vec<String>,
}

impl SiblingThemeFile {
    /// Looks for the given file names instead of the defaults, in order.
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for SiblingThemeFile {
    fn default() -> Self {
        Self::with_names(COMPONENT_THEME_FILES.iter().copied())
    }
}

impl ComponentThemeResolver for SiblingThemeFile {
    fn resolve(&self, stylesheet: &Path) -> Result<Option<ComponentTheme>> {
        let Some(dir) = stylesheet.parent() else {
            return Ok(None);
        };

        for name in &self.names {
            let candidate = dir.join(name);
            if candidate.is_file() {
                debug!("Using component theme {}", candidate.display());
                let config = RawConfig::from_file(&candidate)?;
                return Ok(Some(ComponentTheme {
                    config,
                    source: Some(candidate),
                }));
            }
        }

        debug!("No component theme next to {}", stylesheet.display());
        Ok(None)
    }
}

/// Options for [`ThemeProcessor`].
#[derive(Clone)]
pub struct ThemeOptions {
    pub(crate) config: Option<RawConfig>,
    pub(crate) component_themes: Option<Arc<dyn ComponentThemeResolver>>,
    pub(crate) default_theme: String,
    pub(crate) force_single_theme: Option<String>,
    pub(crate) optimize_single_theme: bool,
    pub(crate) inline_root_theme_variables: bool,
    pub(crate) modules: Option<ScopedName>,
    pub(crate) force_empty_theme_selectors: bool,
    pub(crate) light_class: String,
    pub(crate) dark_class: String,
    pub(crate) target: Target,
}

impl Default for ThemeOptions {
    fn default() -> Self {
        Self {
            config: None,
            component_themes: Some(Arc::new(SiblingThemeFile::default())),
            default_theme: "default".to_string(),
            force_single_theme: None,
            optimize_single_theme: false,
            inline_root_theme_variables: true,
            modules: None,
            force_empty_theme_selectors: false,
            light_class: "light".to_string(),
            dark_class: "dark".to_string(),
            target: Target::Modern,
        }
    }
}

impl fmt::Debug for ThemeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeOptions")
            .field("config", &self.config)
            .field("component_themes", &self.component_themes.is_some())
            .field("default_theme", &self.default_theme)
            .field("force_single_theme", &self.force_single_theme)
            .field("optimize_single_theme", &self.optimize_single_theme)
            .field("inline_root_theme_variables", &self.inline_root_theme_variables)
            .field("modules", &self.modules)
            .field("force_empty_theme_selectors", &self.force_empty_theme_selectors)
            .field("light_class", &self.light_class)
            .field("dark_class", &self.dark_class)
            .field("target", &self.target)
            .finish()
    }
}

impl ThemeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// The global theme configuration. Required.
    pub fn config(mut self, config: RawConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replaces the component theme lookup.
    pub fn component_themes(mut self, resolver: impl ComponentThemeResolver + 'static) -> Self {
        self.component_themes = Some(Arc::new(resolver));
        self
    }

    /// Disables component themes; only the global configuration is used.
    pub fn without_component_themes(mut self) -> Self {
        self.component_themes = None;
        self
    }

    /// The authority theme every reference must exist in. Defaults to
    /// `default`.
    pub fn default_theme(mut self, name: impl Into<String>) -> Self {
        self.default_theme = name.into();
        self
    }

    /// Generates output for one theme only.
    pub fn force_single_theme(mut self, name: impl Into<String>) -> Self {
        self.force_single_theme = Some(name.into());
        self
    }

    /// With a single theme and no dark mode, writes literal values instead of
    /// custom properties.
    pub fn optimize_single_theme(mut self, enable: bool) -> Self {
        self.optimize_single_theme = enable;
        self
    }

    /// Inlines the value of tokens used once as a `var()` fallback. On by
    /// default.
    pub fn inline_root_theme_variables(mut self, enable: bool) -> Self {
        self.inline_root_theme_variables = enable;
        self
    }

    /// Renames generated custom properties.
    pub fn modules(mut self, scoped: ScopedName) -> Self {
        self.modules = Some(scoped);
        self
    }

    /// Legacy output: emit empty theme selectors and keep empty overrides.
    pub fn force_empty_theme_selectors(mut self, enable: bool) -> Self {
        self.force_empty_theme_selectors = enable;
        self
    }

    pub fn light_class(mut self, class: impl Into<String>) -> Self {
        self.light_class = class.into();
        self
    }

    pub fn dark_class(mut self, class: impl Into<String>) -> Self {
        self.dark_class = class.into();
        self
    }

    pub fn target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn get_default_theme(&self) -> &str {
        &self.default_theme
    }

    pub fn get_target(&self) -> Target {
        self.target
    }

    pub(crate) fn single_theme(&self) -> Option<&str> {
        self.force_single_theme.as_deref()
    }
}

/// The result of processing one stylesheet.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub css: String,
    pub stylesheet: Stylesheet,
    pub warnings: Vec<Warning>,
    /// Files other than the stylesheet that the output depends on.
    pub dependencies: Vec<PathBuf>,
}

/// Applies a theme configuration to stylesheets.
#[derive(Debug, Clone)]
pub struct ThemeProcessor {
    options: ThemeOptions,
    config: RawConfig,
}

impl ThemeProcessor {
    /// # Errors
    ///
    /// [`ThemeError::MissingConfig`] when the options carry no configuration.
    pub fn new(options: ThemeOptions) -> Result<Self> {
        let config = options.config.clone().ok_or(ThemeError::MissingConfig)?;
        Ok(Self { options, config })
    }

    pub fn options(&self) -> &ThemeOptions {
        &self.options
    }

    /// Resolves the configuration that applies to the stylesheet at `path`,
    /// returning it with the files it was read from.
    pub fn resolve_config(&self, path: Option<&Path>) -> Result<(ResolvedConfig, Vec<PathBuf>)> {
        let component = match (path, &self.options.component_themes) {
            (Some(path), Some(resolver)) => resolver.resolve(path)?,
            _ => None,
        };

        let resolved = config::resolve(&self.config, component.as_ref().map(|c| &c.config))?;
        let dependencies = component.and_then(|c| c.source).into_iter().collect();
        Ok((resolved, dependencies))
    }

    /// Rewrites `css` and appends the generated theme rules.
    ///
    /// # Errors
    ///
    /// Any configuration, parse or reference error. No output is produced
    /// when an error is returned.
    pub fn process(&self, css: &str, path: Option<&Path>) -> Result<ProcessOutput> {
        let (config, dependencies) = self.resolve_config(path)?;
        let mut stylesheet = Stylesheet::parse(css)?;

        debug!(
            "Processing {} as {:?}",
            path.map(|p| p.display().to_string())
                .unwrap_or_else(|| "<input>".to_string()),
            self.options.target
        );

        let warnings = match self.options.target {
            Target::Modern => {
                let localizer = Localizer::new(self.options.modules.as_ref(), path, css);
                modern::apply(&mut stylesheet, &config, &self.options, &localizer)?
            }
            Target::Legacy => {
                legacy::apply(&mut stylesheet, &config, &self.options)?;
                Vec::new()
            }
        };

        Ok(ProcessOutput {
            css: stylesheet.to_string(),
            stylesheet,
            warnings,
            dependencies,
        })
    }
}
