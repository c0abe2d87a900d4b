mod demo;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use verbline_core::{ParseError, ParserSettings, VerbInfo, tokenize};

use crate::demo::task_parser;

/// Exit status for input the parser rejected.
const EXIT_PARSE_FAILURE: i32 = 2;

#[derive(Debug, Parser)]
#[command(name = "verbline")]
#[command(about = "Tokenize and parse verb-style command lines")]
struct Cli {
    /// YAML file with parser settings (help switches, case sensitivity).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Split a line into tokens and print them as a JSON array.
    Tokenize(LineArgs),
    /// Parse a line against the built-in task tracker verbs (add, list, done).
    Demo(LineArgs),
}

#[derive(Debug, Args)]
struct LineArgs {
    /// The command line; several arguments are joined with spaces.
    #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    line: Vec<String>,
}

impl LineArgs {
    fn line(&self) -> String {
        self.line.join(" ")
    }
}

/// JSON body printed when a demo line fails to parse.
#[derive(Debug, Serialize)]
struct FailureReport<'a> {
    verb: Option<&'a str>,
    errors: &'a [ParseError],
}

/// JSON body printed when help was requested.
#[derive(Debug, Serialize)]
struct HelpReport<'a> {
    help: Vec<&'a VerbInfo>,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Tokenize(args) => run_tokenize(&args),
        Command::Demo(args) => run_demo(&args, cli.settings.as_deref()),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_PARSE_FAILURE),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn run_tokenize(args: &LineArgs) -> Result<bool, String> {
    let line = args.line();
    let tokens: Vec<&str> = tokenize(&line).collect();
    debug!(count = tokens.len(), "Tokenized line");
    print_json(&tokens)?;
    Ok(true)
}

/// Returns `Ok(false)` when the line was rejected; help counts as success.
fn run_demo(args: &LineArgs, settings_path: Option<&Path>) -> Result<bool, String> {
    let settings = load_settings(settings_path)?;
    let parser = task_parser(settings).map_err(|err| format!("Invalid demo schema: {err}"))?;

    let line = args.line();
    match parser.parse_line(&line) {
        Ok(command) => {
            print_json(&command)?;
            Ok(true)
        }
        Err(failure) if failure.is_help() => {
            let help = match failure.verb() {
                Some(verb) => vec![verb],
                None => parser.verbs().collect(),
            };
            print_json(&HelpReport { help })?;
            Ok(true)
        }
        Err(failure) => {
            debug!(errors = failure.errors().len(), "Demo line rejected");
            let errors: Vec<ParseError> = failure
                .errors()
                .iter()
                .filter(|e| e.show_to_user)
                .cloned()
                .collect();
            print_json(&FailureReport {
                verb: failure.verb().map(|v| v.name.as_str()),
                errors: &errors,
            })?;
            Ok(false)
        }
    }
}

fn load_settings(path: Option<&Path>) -> Result<ParserSettings, String> {
    match path {
        Some(path) => ParserSettings::load(path)
            .map_err(|err| format!("Failed to load settings '{}': {err}", path.display())),
        None => Ok(ParserSettings::default()),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let raw = serde_json::to_string_pretty(value)
        .map_err(|err| format!("Failed to serialize output: {err}"))?;
    println!("{raw}");
    Ok(())
}
