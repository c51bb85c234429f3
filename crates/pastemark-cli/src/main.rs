mod config;
#[cfg(feature = "os-clipboard")]
mod os_clipboard;

use std::fs;
use std::io::{self, BufWriter, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use miette::IntoDiagnostic;
use pastemark::{ConversionResult, Format, MarkdownConverter};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, Loader};

#[derive(Parser, Debug)]
#[command(name = "pastemark")]
#[command(version, about = "Normalize pasted rich text between HTML and Markdown")]
struct Cli {
    /// Configuration file layered over the built-in defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the detected format of the input
    Detect {
        /// Input file (reads from stdin if not provided)
        input: Option<PathBuf>,
    },
    /// Convert HTML, Markdown or plain text to Markdown
    ToMarkdown {
        /// Input file (reads from stdin if not provided)
        input: Option<PathBuf>,

        /// Skip detection and treat the input as this format
        #[arg(short, long)]
        from: Option<FormatArg>,

        /// Print the full conversion result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render stored Markdown, or sanitize stored HTML, for display
    ToHtml {
        /// Input file (reads from stdin if not provided)
        input: Option<PathBuf>,
    },
    /// Strip empty editor paragraphs from HTML
    Sanitize {
        /// Input file (reads from stdin if not provided)
        input: Option<PathBuf>,
    },
    /// Print whether the input is stored rich-text HTML
    IsHtml {
        /// Input file (reads from stdin if not provided)
        input: Option<PathBuf>,
    },
    /// Convert the current desktop clipboard content to Markdown
    #[cfg(feature = "os-clipboard")]
    Paste {
        /// Print the full conversion result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Html,
    Markdown,
    Plain,
    Unknown,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Html => Format::Html,
            FormatArg::Markdown => Format::Markdown,
            FormatArg::Plain => Format::Plain,
            FormatArg::Unknown => Format::Unknown,
        }
    }
}

fn load_config(path: Option<&Path>) -> miette::Result<AppConfig> {
    let mut loader = Loader::new();
    if let Some(path) = path {
        loader = loader.with_file(path);
    }
    let config = loader.with_env().build().into_diagnostic()?;
    config.markdown.validate().into_diagnostic()?;
    Ok(config)
}

fn init_tracing(level: &str, verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new(level)
        }
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(input: Option<&Path>) -> miette::Result<String> {
    if let Some(path) = input {
        return fs::read_to_string(path).into_diagnostic();
    }
    if io::stdin().is_terminal() {
        return Err(miette::miette!(
            "No input file specified and stdin is a terminal.\nUsage: pastemark <COMMAND> <FILE> or pipe data to stdin"
        ));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf).into_diagnostic()?;
    Ok(buf)
}

fn write_result(result: &ConversionResult, json: bool, writer: &mut dyn Write) -> miette::Result<()> {
    if json {
        let encoded = serde_json::to_string(result).into_diagnostic()?;
        writeln!(writer, "{encoded}").into_diagnostic()
    } else {
        writeln!(writer, "{}", result.markdown).into_diagnostic()
    }
}

#[cfg(feature = "os-clipboard")]
fn read_clipboard() -> miette::Result<String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .into_diagnostic()?;
    runtime
        .block_on(pastemark::extract_clipboard_content(&os_clipboard::OsClipboard))
        .into_diagnostic()
}

fn run(command: Command, config: &AppConfig, writer: &mut dyn Write) -> miette::Result<()> {
    match command {
        Command::Detect { input } => {
            let text = read_input(input.as_deref())?;
            writeln!(writer, "{}", pastemark::detect_format(&text)).into_diagnostic()
        }
        Command::ToMarkdown { input, from, json } => {
            let text = read_input(input.as_deref())?;
            let format = from
                .map(Format::from)
                .unwrap_or_else(|| pastemark::detect_format(&text));
            debug!(%format, forced = from.is_some(), "converting to markdown");
            let converter = MarkdownConverter::with_options(config.markdown.clone());
            let result = pastemark::convert_as_with(&text, format, &converter);
            write_result(&result, json, writer)
        }
        Command::ToHtml { input } => {
            let text = read_input(input.as_deref())?;
            writeln!(writer, "{}", pastemark::description_to_html(&text)).into_diagnostic()
        }
        Command::Sanitize { input } => {
            let text = read_input(input.as_deref())?;
            writeln!(writer, "{}", pastemark::sanitize_html(&text)).into_diagnostic()
        }
        Command::IsHtml { input } => {
            let text = read_input(input.as_deref())?;
            writeln!(writer, "{}", pastemark::is_html(&text)).into_diagnostic()
        }
        #[cfg(feature = "os-clipboard")]
        Command::Paste { json } => {
            let text = read_clipboard()?;
            let format = pastemark::detect_format(&text);
            let converter = MarkdownConverter::with_options(config.markdown.clone());
            let result = pastemark::convert_as_with(&text, format, &converter);
            write_result(&result, json, writer)
        }
    }
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.log.level, cli.verbose);

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    run(cli.command, &config, &mut writer)?;
    writer.flush().into_diagnostic()?;

    Ok(())
}
