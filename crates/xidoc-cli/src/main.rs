use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use xidoc_core::Diagnostic;
use xidoc_renderer::{DEFAULT_CLASS_PREFIX, RenderError, Renderer, Theme, tag_code_blocks};

/// Highlight the code blocks of a documentation page.
#[derive(Debug, Parser)]
#[command(name = "xidoc", version)]
struct Cli {
    /// HTML page to process; stdin when omitted.
    input: Option<PathBuf>,

    /// Where to write the page; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Add a language class to `<pre><code>` blocks that have none.
    #[arg(long)]
    tag_blocks: bool,

    /// Emit class-based spans instead of inline colors.
    #[arg(long)]
    class_spans: bool,

    /// Prefix of the category classes, used with `--class-spans`.
    #[arg(long, default_value = DEFAULT_CLASS_PREFIX)]
    class_prefix: String,

    #[arg(long, value_enum, default_value_t = ThemeArg::Auto)]
    theme: ThemeArg,

    /// Pass the output through the HTML sanitizer.
    #[arg(long)]
    sanitized: bool,

    #[arg(long, value_enum)]
    diagnostics: Option<DiagnosticsMode>,

    /// Also write the category stylesheet into this directory.
    #[arg(long)]
    css_dir: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ThemeArg {
    Auto,
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Auto => Theme::Auto,
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DiagnosticsMode {
    Json,
    Pretty,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {path}: {source}", path = .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),
    #[error("failed to write {path}: {source}", path = .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to write stdout: {0}")]
    Stdout(#[source] io::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("failed to encode diagnostics: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("xidoc: {}", err);
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Returns whether the page was processed without error diagnostics.
fn run(cli: &Cli) -> Result<bool, CliError> {
    let source = read_input(cli)?;

    let mut renderer = Renderer::new(cli.theme.into());
    if cli.class_spans {
        renderer = renderer.with_class_spans(cli.class_prefix.clone());
    }

    let page = if cli.tag_blocks {
        tag_code_blocks(&source)
    } else {
        source
    };
    let rendered = renderer.highlight_html(&page);
    info!(
        highlighted = rendered.stats.highlighted,
        escaped = rendered.stats.escaped,
        untagged = rendered.stats.untagged,
        "processed page"
    );

    if let Some(mode) = cli.diagnostics {
        emit_diagnostics(&rendered.diagnostics, mode)?;
    }

    let html = if cli.sanitized {
        renderer.sanitize(&rendered.html)
    } else {
        rendered.html.clone()
    };
    write_output(cli, &html)?;

    if let Some(dir) = &cli.css_dir {
        debug!(dir = %dir.display(), "writing stylesheet");
        renderer.generate_files(dir)?;
    }

    Ok(!rendered.has_errors())
}

fn read_input(cli: &Cli) -> Result<String, CliError> {
    match &cli.input {
        Some(path) => fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.clone(),
            source,
        }),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(CliError::Stdin)?;
            Ok(buffer)
        }
    }
}

fn write_output(cli: &Cli, html: &str) -> Result<(), CliError> {
    match &cli.output {
        Some(path) => fs::write(path, html).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        }),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(html.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(CliError::Stdout)
        }
    }
}

fn emit_diagnostics(diagnostics: &[Diagnostic], mode: DiagnosticsMode) -> Result<(), CliError> {
    match mode {
        DiagnosticsMode::Json => {
            eprintln!("{}", serde_json::to_string_pretty(diagnostics)?);
        }
        DiagnosticsMode::Pretty => {
            for diagnostic in diagnostics {
                eprintln!("{}", diagnostic.to_pretty());
            }
        }
    }
    Ok(())
}
