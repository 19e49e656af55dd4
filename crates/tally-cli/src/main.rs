//! Tally CLI - evaluate math blocks from files or stdin

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tally::prelude::*;

#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version, about = "Line-based calculation ledger")]
struct Cli {
    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a math block and print each line with its result
    Eval {
        #[command(flatten)]
        solve: SolveArgs,

        /// Print the whole ledger as JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Fail if any line of a math block does not evaluate
    Check {
        #[command(flatten)]
        solve: SolveArgs,
    },
}

#[derive(Args)]
struct SolveArgs {
    /// Math block file (default: stdin, also `-`)
    input: Option<PathBuf>,

    /// Round plain numbers to this many significant digits
    #[arg(short, long)]
    precision: Option<u32>,

    /// Keep "..." and {...} segments verbatim
    #[arg(long)]
    passthrough: bool,

    /// Currency symbol to keep in expressions (repeatable)
    #[arg(long = "currency", value_name = "SYMBOL")]
    currencies: Vec<String>,

    /// JSON options file; flags override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Eval { solve, json } => eval(&solve, json),
        Commands::Check { solve } => check(&solve),
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tally={level},tally_expr={level}")));

    fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn eval(args: &SolveArgs, json: bool) -> Result<()> {
    let ledger = solve(args)?;

    let output = if json {
        let mut text =
            serde_json::to_string_pretty(&ledger).context("Failed to serialize ledger")?;
        text.push('\n');
        text
    } else {
        render(&ledger)
    };

    io::stdout()
        .write_all(output.as_bytes())
        .context("Failed to write to stdout")?;
    Ok(())
}

fn check(args: &SolveArgs) -> Result<()> {
    let ledger = solve(args)?;

    let mut failed = 0;
    for line in ledger.errors() {
        failed += 1;
        eprintln!(
            "line {}: {}: {}",
            line.row + 1,
            line.original_text.trim(),
            line.error.as_deref().unwrap_or("error")
        );
    }
    if failed > 0 {
        bail!("{} of {} lines failed to evaluate", failed, ledger.row_count());
    }
    println!("{} lines ok", ledger.row_count());
    Ok(())
}

fn solve(args: &SolveArgs) -> Result<Ledger> {
    let options = options(args)?;
    let solver = Solver::new(options).context("Invalid solver options")?;
    let text = read_input(args.input.as_deref())?;
    tracing::debug!(lines = text.lines().count(), "solving block");
    Ok(solver.solve_block(&text))
}

/// Options from `--config`, overridden by the command-line flags
fn options(args: &SolveArgs) -> Result<SolverOptions> {
    let mut options = match &args.config {
        Some(path) => SolverOptions::from_path(path)
            .with_context(|| format!("Failed to load options from '{}'", path.display()))?,
        None => SolverOptions::default(),
    };
    if args.precision.is_some() {
        options.precision = args.precision;
    }
    options.passthrough |= args.passthrough;
    options.currencies.extend(args.currencies.iter().cloned());
    Ok(options)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display())),
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

/// Every line as written, followed by its result or error
fn render(ledger: &Ledger) -> String {
    let mut output = String::new();
    for line in ledger.lines() {
        let text = strip_annotation(&line.original_text);
        match (&line.display_value, &line.error) {
            (_, Some(error)) => {
                output.push_str(&format!("{} // error: {}", text, error));
            }
            (Some(display), None) => {
                output.push_str(&format!("{} {}", text, display));
            }
            (None, None) => output.push_str(&line.original_text),
        }
        output.push('\n');
    }
    output
}

/// Drop a result annotation left by an earlier run so output can be fed back
fn strip_annotation(text: &str) -> &str {
    let end = ["//=", "// error:"]
        .iter()
        .filter_map(|marker| text.find(marker))
        .min()
        .unwrap_or(text.len());
    text[..end].trim_end()
}
