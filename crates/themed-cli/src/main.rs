//! `themed` - apply theme tokens to stylesheets from the command line.
//!
//! ```text
//! themed build button.css --config themes.yaml -o dist/button.css
//! themed lint src/*.css --config themes.yaml
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use console::Style;
use themed::{
    lint_stylesheet, LintMessage, RawConfig, ScopedName, Stylesheet, Target, ThemeOptions,
    ThemeProcessor, Warning,
};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "themed")]
#[command(version)]
#[command(about = "Build-time theme tokens for stylesheets")]
struct Cli {
    /// Show debug logs (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rewrite theme references and append the theme rules
    Build(BuildArgs),
    /// Report invalid theme references without writing output
    Lint(LintArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Stylesheet to process
    input: PathBuf,

    /// Theme configuration (YAML or JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Literal values with per-theme override rules instead of custom properties
    #[arg(long)]
    legacy: bool,

    /// Theme every reference must exist in
    #[arg(long, default_value = "default")]
    default_theme: String,

    /// Only generate output for this theme
    #[arg(long, value_name = "THEME")]
    single_theme: Option<String>,

    /// With --single-theme, write values instead of custom properties
    #[arg(long, requires = "single_theme")]
    optimize: bool,

    /// Do not inline tokens used once as var() fallbacks
    #[arg(long)]
    no_inline: bool,

    /// Rename custom properties with a template such as "[name]-[local]"
    #[arg(long, value_name = "TEMPLATE")]
    modules: Option<String>,

    /// Legacy output: emit empty theme selectors
    #[arg(long)]
    empty_theme_selectors: bool,

    #[arg(long, default_value = "light")]
    light_class: String,

    #[arg(long, default_value = "dark")]
    dark_class: String,

    /// Ignore theme files next to the stylesheet
    #[arg(long)]
    no_component_themes: bool,
}

#[derive(Args, Debug)]
struct LintArgs {
    /// Stylesheets to check
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Theme configuration (YAML or JSON)
    #[arg(short, long)]
    config: PathBuf,

    #[arg(long, default_value = "default")]
    default_theme: String,

    /// Print problems as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{} {:#}", Style::new().red().bold().apply_to("error:"), e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Runs a command. `Ok(false)` means it completed but found problems.
fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Command::Build(args) => {
            let warnings = build(&args)?;
            print_warnings(&args.input, &warnings);
            Ok(true)
        }
        Command::Lint(args) => {
            let reports = lint(&args)?;
            let clean = reports.iter().all(|(_, messages)| messages.is_empty());
            if args.json {
                print_json(&reports)?;
            } else {
                print_lint(&reports);
            }
            Ok(clean)
        }
    }
}

fn load_config(path: &Path) -> Result<RawConfig> {
    RawConfig::from_file(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn build_options(args: &BuildArgs, config: RawConfig) -> ThemeOptions {
    let mut options = ThemeOptions::new()
        .config(config)
        .default_theme(&args.default_theme)
        .optimize_single_theme(args.optimize)
        .inline_root_theme_variables(!args.no_inline)
        .force_empty_theme_selectors(args.empty_theme_selectors)
        .light_class(&args.light_class)
        .dark_class(&args.dark_class)
        .target(if args.legacy {
            Target::Legacy
        } else {
            Target::Modern
        });

    if let Some(theme) = &args.single_theme {
        options = options.force_single_theme(theme);
    }
    if let Some(template) = &args.modules {
        options = options.modules(ScopedName::template(template));
    }
    if args.no_component_themes {
        options = options.without_component_themes();
    }
    options
}

/// Processes the input and writes the result. Returns the warnings.
fn build(args: &BuildArgs) -> Result<Vec<Warning>> {
    let config = load_config(&args.config)?;
    let processor = ThemeProcessor::new(build_options(args, config))?;

    let css = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let output = processor
        .process(&css, Some(args.input.as_path()))
        .with_context(|| format!("Failed to process {}", args.input.display()))?;

    for dependency in &output.dependencies {
        debug!("{} depends on {}", args.input.display(), dependency.display());
    }

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, &output.css)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => io::stdout()
            .write_all(output.css.as_bytes())
            .context("Failed to write to stdout")?,
    }

    Ok(output.warnings)
}

type LintReport = (PathBuf, Vec<LintMessage>);

fn lint(args: &LintArgs) -> Result<Vec<LintReport>> {
    let config = load_config(&args.config)?;
    let processor = ThemeProcessor::new(
        ThemeOptions::new()
            .config(config)
            .default_theme(&args.default_theme),
    )?;

    let mut reports = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        let css = fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        let (resolved, _) = processor
            .resolve_config(Some(input.as_path()))
            .with_context(|| format!("Failed to resolve themes for {}", input.display()))?;
        let sheet = Stylesheet::parse(&css)
            .with_context(|| format!("Failed to parse {}", input.display()))?;

        let messages = lint_stylesheet(&sheet, &resolved, &args.default_theme);
        debug!("{}: {} problems", input.display(), messages.len());
        reports.push((input.clone(), messages));
    }
    Ok(reports)
}

fn print_warnings(input: &Path, warnings: &[Warning]) {
    let label = Style::new().yellow().bold();
    for warning in warnings {
        eprintln!(
            "{} {}: {}",
            label.apply_to("warning:"),
            input.display(),
            warning
        );
    }
}

fn print_lint(reports: &[LintReport]) {
    let file = Style::new().bold().underlined();
    let location = Style::new().dim();
    let kind = Style::new().red();

    for (path, messages) in reports.iter().filter(|(_, m)| !m.is_empty()) {
        println!("{}", file.apply_to(path.display()));
        for message in messages {
            println!(
                "  {}  {}  {}",
                location.apply_to(message.location),
                kind.apply_to(&message.property),
                message.message
            );
        }
    }
}

fn print_json(reports: &[LintReport]) -> Result<()> {
    let value: Vec<serde_json::Value> = reports
        .iter()
        .map(|(path, messages)| {
            serde_json::json!({
                "file": path.display().to_string(),
                "messages": messages,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
