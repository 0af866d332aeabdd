mod echo;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Instant;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use owo_colors::OwoColorize;
use precis_core::{
    Digest, DomainRules, JsonConfig, MarkdownConfig, Precis, PrecisConfig, TextConfig, convert_to_json,
    convert_to_markdown, convert_to_text, fetch_file, fetch_stdin,
};
use tracing_subscriber::EnvFilter;
use url::Url;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit status when the engine produced an error digest
const EXIT_ERROR_DIGEST: u8 = 2;

/// Output format for the digest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Markdown,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: text, markdown, json", s)),
        }
    }
}

/// Summarize article pages into a short extractive digest
#[derive(Parser, Debug)]
#[command(name = "precis")]
#[command(author = "Precis Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Summarize article pages into a short digest", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT", required_unless_present = "completions")]
    input: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (text, markdown, json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,

    /// Include TOML frontmatter (Markdown only)
    #[arg(long)]
    frontmatter: bool,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "20", value_name = "SECS")]
    timeout: u64,

    /// Number of keywords to report
    #[arg(long, default_value = "20", value_name = "NUM")]
    keywords: usize,

    /// Domain rules file (JSON); defaults to the user config directory
    #[arg(long, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Source URL for file or stdin input
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Wrap text output at this width (0 = no wrapping)
    #[arg(long, default_value = "0", value_name = "COLS")]
    width: usize,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("precis=debug,precis_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("precis_core=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn is_remote(input: &str) -> bool {
    Url::parse(input).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

fn load_rules(path: Option<&PathBuf>) -> anyhow::Result<DomainRules> {
    match path {
        Some(path) => Ok(DomainRules::from_file(path)
            .with_context(|| format!("Failed to load domain rules: {}", path.display()))?
            .merge(DomainRules::default())),
        None => DomainRules::load_default().context("Failed to load domain rules"),
    }
}

fn render(digest: &Digest, args: &Args) -> anyhow::Result<String> {
    let output = match args.format {
        OutputFormat::Text => {
            let config = TextConfig { line_width: args.width, ..Default::default() };
            convert_to_text(digest, &config)
        }
        OutputFormat::Markdown => {
            let config = MarkdownConfig { include_frontmatter: args.frontmatter, ..Default::default() };
            convert_to_markdown(digest, &config)
        }
        OutputFormat::Json => {
            convert_to_json(digest, &JsonConfig { pretty: args.pretty }).context("Failed to convert to JSON")?
        }
    };

    Ok(if output.ends_with('\n') { output } else { format!("{}\n", output) })
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "precis", &mut std::io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    let Some(input) = args.input.as_deref() else {
        anyhow::bail!("An INPUT argument is required");
    };

    init_tracing(args.verbose);
    tracing::debug!(input, format = ?args.format, "starting");

    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    let rules = load_rules(args.rules.as_ref())?;
    let config = PrecisConfig::builder().timeout(args.timeout).keyword_count(args.keywords).build();
    let engine = Precis::with_config(config).with_rules(rules);

    let started = Instant::now();
    let digest = if is_remote(input) {
        if args.verbose {
            echo::print_step(1, 2, &format!("Fetching and summarizing {}", input.bright_white().underline()));
        }
        engine.summarize(input).await
    } else {
        let bytes = if input == "-" {
            if args.verbose {
                echo::print_step(1, 2, "Reading from stdin");
            }
            fetch_stdin().context("Failed to read from stdin")?
        } else {
            if args.verbose {
                echo::print_step(1, 2, &format!("Reading from file {}", input.bright_white()));
            }
            fetch_file(input).with_context(|| format!("Failed to read file: {}", input))?
        };

        if args.verbose {
            eprintln!("  {} {}", "Size:".dimmed(), echo::format_size(bytes.len()).bright_white());
        }

        engine.summarize_bytes(&bytes, None, args.url.as_deref().unwrap_or_default())
    };

    if args.verbose {
        echo::print_timing("Summarize", started.elapsed());
        match &digest {
            Digest::Article(article) => echo::print_digest_details(article),
            Digest::Error(error) => echo::print_warning(&error.message),
        }
        echo::print_step(2, 2, &format!("Writing {:?} output", args.format));
    }

    let output = render(&digest, &args)?;

    match &args.output {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => print!("{}", output),
    }

    if digest.is_error() {
        if args.verbose {
            echo::print_error("No digest could be produced");
        }
        Ok(ExitCode::from(EXIT_ERROR_DIGEST))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
