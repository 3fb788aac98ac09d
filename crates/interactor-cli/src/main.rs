//! Interactor CLI
//!
//! The `interactor` command runs the bundled interactions against JSON
//! inputs and prints what they return.
//!
//! ## Commands
//!
//! - `list`: Show the bundled interactions
//! - `run`: Run one interaction and print its record or outcome

mod demos;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use interactor_core::{telemetry, Engine, EngineConfig, ErrorCollection};
use serde_json::{Map, Value as Json};
use tracing::{debug, Level};

use crate::demos::{run_demo, Report, DEMOS};

#[derive(Parser)]
#[command(name = "interactor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run interactions with typed inputs and collected errors", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Engine configuration file (JSON)
    #[arg(short, long, global = true, env = "INTERACTOR_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the bundled interactions
    List,

    /// Run a bundled interaction
    Run {
        /// Interaction name, as shown by `list`
        name: String,

        /// Inputs as a JSON object, or `@path` to read them from a file
        #[arg(short, long, default_value = "{}")]
        inputs: String,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    telemetry::init_tracing(cli.json, level);

    let config = load_config(cli.config.as_deref())?;
    debug!(diagnostics = %config.diagnostics, "engine configured");
    let engine = Engine::from_config(&config);

    match cli.command {
        Commands::List => cmd_list(),
        Commands::Run { name, inputs } => cmd_run(&engine, &name, &inputs),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    config
        .merge_env_with(|key| std::env::var(key).ok())
        .context("Invalid INTERACTOR_* environment variable")
}

fn cmd_list() -> Result<ExitCode> {
    for demo in DEMOS {
        let kind = match demo.returning {
            Some(filter) => format!("returns `{filter}`"),
            None => "plain".to_string(),
        };
        println!("{:<16} {:<18} {}", demo.name, kind, demo.summary);
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_run(engine: &Engine, name: &str, raw_inputs: &str) -> Result<ExitCode> {
    let inputs = parse_inputs(raw_inputs)?;
    let Report { output, errors } = run_demo(engine, name, inputs)?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    if errors.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }

    eprintln!("{}", render_errors(&errors));
    Ok(ExitCode::FAILURE)
}

/// Parse `--inputs`: inline JSON or `@path` to a JSON file.
fn parse_inputs(raw: &str) -> Result<Map<String, Json>> {
    let text = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read inputs from {path}"))?,
        None => raw.to_string(),
    };
    match serde_json::from_str::<Json>(&text).context("Inputs are not valid JSON")? {
        Json::Object(map) => Ok(map),
        other => bail!("Inputs must be a JSON object, got {other}"),
    }
}

fn render_errors(errors: &ErrorCollection) -> String {
    let mut out = format!("{} error(s):", errors.len());
    for (attribute, messages) in errors.grouped_by_attribute() {
        for message in messages {
            out.push_str(&format!("\n  {attribute}: {message}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_inline_inputs() {
        let inputs = parse_inputs(r#"{"email": "ada@example.com"}"#).unwrap();
        assert_eq!(inputs["email"], "ada@example.com");
    }

    #[test]
    fn test_parse_inputs_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"newsletter": true}}"#).unwrap();

        let inputs = parse_inputs(&format!("@{}", file.path().display())).unwrap();
        assert_eq!(inputs["newsletter"], true);
    }

    #[test]
    fn test_parse_inputs_rejects_non_objects() {
        let err = parse_inputs("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("must be a JSON object"));
        assert!(parse_inputs("{nope").is_err());
    }

    #[test]
    fn test_render_errors_groups_by_attribute() {
        let mut errors = ErrorCollection::new();
        errors.add("email", "is invalid");
        errors.add("base", "try again");
        errors.add("email", "can't be blank");

        assert_eq!(
            render_errors(&errors),
            "3 error(s):\n  base: try again\n  email: is invalid\n  email: can't be blank"
        );
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"diagnostics": "stderr", "indent_width": 4}}"#).unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.indent_width, 4);
        assert!(load_config(Some(Path::new("/nonexistent/interactor.json"))).is_err());
    }

    #[test]
    fn test_cli_parses_run() {
        let cli = Cli::try_parse_from(["interactor", "--verbose", "run", "send-welcome", "-i", "{}"])
            .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Run { ref name, .. } if name == "send-welcome"));
    }
}
