use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use colored::Colorize;
use json_dedupe_core::{
    deduplicate_owned, fingerprint, is_equivalent, normalize, parse_items, parse_value,
    selftest, serialize_canonical, Error, JsonValue,
};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const EXIT_OK: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_ERROR: i32 = 2;

/// json-dedupe — structural deduplication of JSON values
///
/// Deduplicate, normalize, fingerprint, and compare JSON documents.
/// Mapping key order never matters; primitive-list order always does;
/// lists holding objects or lists compare as multisets.
#[derive(Parser)]
#[command(name = "json-dedupe", version, about, long_about = None)]
struct Cli {
    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove structural duplicates from a JSON array
    Dedupe {
        /// Path to a .json file, or `-` for stdin
        file: PathBuf,
        /// Read one JSON value per line instead of a single array
        #[arg(long)]
        lines: bool,
        /// Write the result on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Print the canonical form of a JSON document
    Normalize {
        /// Path to a .json file, or `-` for stdin
        file: PathBuf,
    },

    /// Compute the SHA-256 fingerprint of a document's canonical form
    Hash {
        /// Path to a .json file, or `-` for stdin
        file: PathBuf,
    },

    /// Check whether two documents are duplicates of each other
    Equiv {
        /// First .json file
        file_a: PathBuf,
        /// Second .json file
        file_b: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the bundled scenario checks
    SelfTest {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

/// Failures that end a command with exit code 2
#[derive(Debug)]
enum CliError {
    Io { path: PathBuf, source: io::Error },
    Core(Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CliError::Io { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            CliError::Core(e) => write!(f, "{}", e),
        }
    }
}

impl From<Error> for CliError {
    fn from(e: Error) -> Self {
        CliError::Core(e)
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            EXIT_ERROR
        }
    };

    process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // Logs go to stderr so stdout stays machine-readable
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}

fn run(cli: &Cli) -> Result<i32, CliError> {
    match &cli.command {
        Commands::Dedupe {
            file,
            lines,
            compact,
        } => cmd_dedupe(file, *lines, *compact, cli.quiet),
        Commands::Normalize { file } => {
            let value = parse_value(&read_input(file)?)?;
            println!("{}", serialize_canonical(&normalize(&value)?));
            Ok(EXIT_OK)
        }
        Commands::Hash { file } => {
            let value = parse_value(&read_input(file)?)?;
            println!("{}", fingerprint(&value)?);
            Ok(EXIT_OK)
        }
        Commands::Equiv {
            file_a,
            file_b,
            json,
        } => cmd_equiv(file_a, file_b, *json, cli.quiet),
        Commands::SelfTest { json } => Ok(cmd_self_test(*json, cli.quiet)),
        Commands::Version => {
            println!(
                "json-dedupe {} (json-dedupe-core {})",
                env!("CARGO_PKG_VERSION"),
                json_dedupe_core::VERSION
            );
            Ok(EXIT_OK)
        }
    }
}

// ── Commands ──────────────────────────────────────────────

fn cmd_dedupe(file: &Path, lines: bool, compact: bool, quiet: bool) -> Result<i32, CliError> {
    let text = read_input(file)?;
    let items = if lines {
        parse_lines(&text)?
    } else {
        parse_items(&text)?
    };
    let total = items.len();
    let kept = deduplicate_owned(items)?;

    let rendered = if compact {
        serde_json::to_string(&kept)
    } else {
        serde_json::to_string_pretty(&kept)
    }
    .map_err(|e| Error::SerializationError(e.to_string()))?;
    println!("{}", rendered);

    if !quiet {
        let removed = total - kept.len();
        eprintln!(
            "{} kept {} of {} items ({} duplicate{} removed)",
            "dedupe:".green().bold(),
            kept.len(),
            total,
            removed,
            if removed == 1 { "" } else { "s" }
        );
    }
    Ok(EXIT_OK)
}

fn cmd_equiv(file_a: &Path, file_b: &Path, json: bool, quiet: bool) -> Result<i32, CliError> {
    let a = parse_value(&read_input(file_a)?)?;
    let b = parse_value(&read_input(file_b)?)?;
    let equivalent = is_equivalent(&a, &b)?;

    if json {
        let output = serde_json::json!({
            "equivalent": equivalent,
            "fingerprint_a": fingerprint(&a)?,
            "fingerprint_b": fingerprint(&b)?,
        });
        println!("{}", output);
    } else if !quiet {
        if equivalent {
            println!("{} documents are equivalent", "✓".green().bold());
        } else {
            println!("{} documents are not equivalent", "✗".red().bold());
        }
    }

    Ok(if equivalent { EXIT_OK } else { EXIT_FAILURE })
}

fn cmd_self_test(json: bool, quiet: bool) -> i32 {
    let report = selftest::run();
    let failed = report.failures().len();

    if json {
        let output = serde_json::json!({
            "passed": report.passed(),
            "total": report.len(),
            "failed": failed,
            "scenarios": report.scenarios,
        });
        println!("{}", output);
    } else if !quiet {
        for outcome in &report.scenarios {
            if outcome.passed {
                println!("  {} {}", "PASS".green(), outcome.name);
            } else {
                println!(
                    "  {} {}: {}",
                    "FAIL".red().bold(),
                    outcome.name,
                    outcome.detail.as_deref().unwrap_or("")
                );
            }
        }
        println!(
            "{} of {} scenarios passed",
            report.len() - failed,
            report.len()
        );
    }

    if report.passed() {
        EXIT_OK
    } else {
        EXIT_FAILURE
    }
}

// ── Input helpers ─────────────────────────────────────────

fn read_input(path: &Path) -> Result<String, CliError> {
    let io_error = |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map_err(io_error)?;
        Ok(text)
    } else {
        debug!(path = %path.display(), "reading input");
        fs::read_to_string(path).map_err(io_error)
    }
}

/// One JSON document per non-blank line (JSON Lines)
fn parse_lines(text: &str) -> Result<Vec<JsonValue>, Error> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            parse_value(line).map_err(|e| match e {
                Error::ParseError(msg) => Error::ParseError(format!("line {}: {}", n + 1, msg)),
                other => other,
            })
        })
        .collect()
}
