//! CLI entrypoint for Agent Router
//!
//! This is the main binary that wires together all layers using
//! dependency injection and maps routing failures to exit codes.

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use router_application::{RouteTaskError, RouteTaskInput, RouteTaskUseCase};
use router_domain::{TaskDescription, compress};
use router_infrastructure::{ConfigLoader, FileConfig, PathAgentAvailability};
use router_presentation::{Cli, JsonFormatter, formatter_for};
use std::io::{IsTerminal, Read};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Missing task text or bad usage
const EXIT_USAGE: u8 = 1;
/// Every candidate agent was excluded or is not installed
const EXIT_NO_AGENT: u8 = 2;
/// Unknown forced agent or invalid configuration
const EXIT_CONFIG: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    // stderr keeps stdout clean for JSON
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_CONFIG)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    info!("Starting Agent Router");

    // === Configuration ===
    let config = load_config(&cli)?;

    if cli.show_config {
        for line in ConfigLoader::describe_sources() {
            println!("{}", line);
        }
        println!();
        println!("{}", JsonFormatter::new(cli.compact).render(&config));
        return Ok(ExitCode::SUCCESS);
    }

    // === Dependency Injection ===
    let matrix = config
        .capability_matrix()
        .context("Invalid agent configuration")?;
    let use_case = RouteTaskUseCase::with_availability(
        Arc::new(matrix),
        Arc::new(PathAgentAvailability::new()),
    );
    let formatter = formatter_for(cli.format, cli.compact);

    if cli.health {
        println!("{}", formatter.health(&use_case.health()));
        return Ok(ExitCode::SUCCESS);
    }

    if cli.list_agents {
        println!("{}", formatter.agents(&use_case.list_agents()));
        return Ok(ExitCode::SUCCESS);
    }

    let Some(text) = read_task(&cli)? else {
        let _ = Cli::command().print_help();
        return Ok(ExitCode::from(EXIT_USAGE));
    };

    if let Some((level, max_tokens)) = cli.compression(config.compression_defaults().max_tokens) {
        let result = compress(&text, level, max_tokens);
        println!("{}", formatter.compression(&result));
        return Ok(ExitCode::SUCCESS);
    }

    let mut task = TaskDescription::new(text)?;
    if let Some(context) = &cli.context {
        task = task.with_context(context.as_str());
    }

    if cli.classify_only {
        println!("{}", formatter.profile(&use_case.classify(&task)));
        return Ok(ExitCode::SUCCESS);
    }

    let defaults = config.routing_defaults();
    let input = RouteTaskInput::new(task)
        .with_preferences(cli.preferences(&defaults))
        .with_only_available(cli.only_available(&defaults));

    match use_case.route(input) {
        Ok(output) => {
            println!("{}", formatter.decision(&output.decision));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Ok(ExitCode::from(exit_code_for(&e)))
        }
    }
}

/// Load and validate configuration, honoring `--no-config` and `--config`
fn load_config(cli: &Cli) -> Result<FileConfig> {
    if cli.no_config {
        return Ok(ConfigLoader::load_defaults());
    }

    if let Some(path) = &cli.config
        && !path.exists()
    {
        bail!("Config file not found: {}", path.display());
    }

    let config = ConfigLoader::load(cli.config.as_ref())
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    let issues = config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("{}", issue);
    }
    let errors: Vec<String> = issues
        .iter()
        .filter(|i| i.is_error())
        .map(ToString::to_string)
        .collect();
    if !errors.is_empty() {
        bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }

    Ok(config)
}

/// Task text from the arguments, falling back to piped stdin
fn read_task(cli: &Cli) -> Result<Option<String>> {
    if let Some(text) = cli.task_text() {
        return Ok(Some(text));
    }

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin
        .lock()
        .read_to_string(&mut buffer)
        .context("Failed to read task from stdin")?;
    let text = buffer.trim();
    Ok((!text.is_empty()).then(|| text.to_string()))
}

fn exit_code_for(error: &RouteTaskError) -> u8 {
    if error.is_no_agent() {
        EXIT_NO_AGENT
    } else {
        EXIT_CONFIG
    }
}
