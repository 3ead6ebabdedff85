//! The `ttlc` command line: check and evaluate type transformation
//! expressions against the standard host type system.
//!
//! Set the `TTLC_LOG` environment variable (or pass `--debug`) to enable
//! tracing output on stderr.

use std::fs;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ttl_eval::{Bindings, Evaluator};
use ttl_types::{StandardHost, Type};
use ttl_validate::{parse_and_validate, AnnotationResult};

mod diagnostic;
use diagnostic::SourceDb;

#[derive(Parser, Debug)]
#[command(name = "ttlc", version, about = "Type transformation expression tool")]
struct Cli {
    /// Enable verbose debug logging (or set TTLC_LOG=debug)
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse and validate an expression
    Check {
        /// The expression, or a path to a file containing it with --file
        input: String,
        /// Treat the input as a file path
        #[arg(short, long)]
        file: bool,
    },
    /// Parse, validate, and evaluate an expression
    Eval {
        /// The expression, or a path to a file containing it with --file
        input: String,
        /// Treat the input as a file path
        #[arg(short, long)]
        file: bool,
        /// Bind a type variable: NAME=EXPR, where EXPR is itself a closed
        /// transformation expression (may reference earlier bindings)
        #[arg(short, long = "bind", value_name = "NAME=EXPR")]
        bind: Vec<String>,
        /// Bind a name variable: NAME=STRING
        #[arg(short = 'n', long = "name", value_name = "NAME=STRING")]
        name: Vec<String>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed binding `{0}`, expected NAME=VALUE")]
    MalformedBinding(String),
    #[error("the expression bound to `{0}` is not a valid type transformation")]
    InvalidBinding(String),
    #[error("invalid type transformation expression")]
    Invalid,
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("TTLC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(true),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let outcome = match cli.command {
        Command::Check { input, file } => run_check(&input, file),
        Command::Eval {
            input,
            file,
            bind,
            name,
        } => run_eval(&input, file, &bind, &name),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Invalid) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn load_input(input: &str, is_file: bool) -> Result<(String, String), CliError> {
    if is_file {
        let source = fs::read_to_string(input)?;
        Ok((source.trim_end().to_string(), input.to_string()))
    } else {
        Ok((input.to_string(), "<expression>".to_string()))
    }
}

/// Run the front end over one annotation and render everything it reports.
fn check_annotation(source: &str, origin: &str) -> (AnnotationResult, SourceDb) {
    let result = parse_and_validate(source, origin, 1, 0);
    let db = SourceDb::new(origin.to_string(), source.to_string());
    for error in &result.parse_errors {
        db.report_error(&error.message, &error.span);
    }
    for warning in &result.warnings {
        db.report_warning(&warning.to_string(), &warning.span);
    }
    (result, db)
}

fn run_check(input: &str, is_file: bool) -> Result<(), CliError> {
    let (source, origin) = load_input(input, is_file)?;
    let (result, _db) = check_annotation(&source, &origin);
    if !result.is_valid() {
        return Err(CliError::Invalid);
    }
    println!("ok");
    Ok(())
}

fn run_eval(
    input: &str,
    is_file: bool,
    binds: &[String],
    names: &[String],
) -> Result<(), CliError> {
    let (source, origin) = load_input(input, is_file)?;
    let host = StandardHost::with_natives();

    let mut type_vars: Bindings<Type> = Bindings::new();
    for entry in binds {
        let (name, expr) = split_binding(entry)?;
        let ty = eval_binding(&host, name, expr, &type_vars)?;
        tracing::debug!(name, %ty, "bound type variable");
        type_vars = type_vars.bind(name, ty);
    }

    let mut name_vars: Bindings<String> = Bindings::new();
    for entry in names {
        let (name, value) = split_binding(entry)?;
        name_vars = name_vars.bind(name, value.to_string());
    }

    let (result, db) = check_annotation(&source, &origin);
    let term = result.term.ok_or(CliError::Invalid)?;

    let mut evaluator = Evaluator::new(&host);
    let ty = evaluator.eval_with_names(&term, &type_vars, &name_vars);
    for warning in evaluator.warnings() {
        db.report_warning(&warning.code.to_string(), &warning.span);
    }
    println!("{ty}");
    Ok(())
}

fn split_binding(entry: &str) -> Result<(&str, &str), CliError> {
    match entry.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name, value)),
        _ => Err(CliError::MalformedBinding(entry.to_string())),
    }
}

/// Evaluate the right-hand side of a `--bind` entry as its own annotation.
/// Earlier bindings are visible, so binds can build on each other.
fn eval_binding(
    host: &StandardHost,
    name: &str,
    expr: &str,
    type_vars: &Bindings<Type>,
) -> Result<Type, CliError> {
    let origin = format!("<bind {name}>");
    let (result, db) = check_annotation(expr, &origin);
    let term = result
        .term
        .ok_or_else(|| CliError::InvalidBinding(name.to_string()))?;

    let mut evaluator = Evaluator::new(host);
    let ty = evaluator.eval(&term, type_vars);
    for warning in evaluator.warnings() {
        db.report_warning(&warning.code.to_string(), &warning.span);
    }
    Ok(ty)
}
