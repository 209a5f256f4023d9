//! CLI command definitions

use clap::{Parser, ValueEnum};
use router_application::RoutingDefaults;
use router_domain::{AgentId, CompressionLevel, RoutingPreferences};
use std::path::PathBuf;

/// Output format for routing results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON document (pretty unless --compact)
    #[default]
    Json,
    /// Colored human-readable summary
    Text,
}

/// Compression level accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CompressionArg {
    /// Whitespace cleanup only
    Minimal,
    /// Drop narrative prose
    Moderate,
    /// Keep only code, errors, paths and outcomes
    Aggressive,
}

impl From<CompressionArg> for CompressionLevel {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::Minimal => CompressionLevel::Minimal,
            CompressionArg::Moderate => CompressionLevel::Moderate,
            CompressionArg::Aggressive => CompressionLevel::Aggressive,
        }
    }
}

/// CLI arguments for agent-router
#[derive(Parser, Debug)]
#[command(name = "agent-router")]
#[command(author, version, about = "Route coding tasks to the best-suited AI agent")]
#[command(long_about = r#"
Agent Router classifies a task description and picks the coding agent best
suited to it (codex, cursor, gemini or copilot).

Routing works in two steps:
1. Classify: task type (debugging, refactoring, ...) and complexity
2. Select: walk the capability matrix, applying preferences and exclusions

The task is read from the positional argument, --prompt, or stdin.

Configuration files are loaded from (in priority order):
1. AGENT_ROUTER_* environment variables
2. --config <path>                          Explicit config file
3. ./agent-router.toml                      Project-level config
4. ~/.config/agent-router/config.toml       Global config

Exit codes: 0 success, 1 no task, 2 no agent available,
3 unknown forced agent or invalid configuration.

Example:
  agent-router "Fix the authentication bug in login.py"
  agent-router --prefer-speed --exclude codex "Add unit tests for the parser"
  agent-router --exclude codex,gemini --force cursor "Fix the login bug"
  cat agent-output.log | agent-router --compress aggressive --max-tokens 500
"#)]
pub struct Cli {
    /// The task description
    pub task: Option<String>,

    /// Task description (alternative to the positional argument)
    #[arg(short, long, value_name = "TASK")]
    pub prompt: Option<String>,

    /// Extra context to classify alongside the task
    #[arg(long, value_name = "TEXT")]
    pub context: Option<String>,

    /// Prefer faster agents
    #[arg(long)]
    pub prefer_speed: bool,

    /// Prefer cheaper agents
    #[arg(long)]
    pub prefer_cost: bool,

    /// Agents to exclude (repeat the flag or separate with commas)
    #[arg(long, value_name = "AGENT", action = clap::ArgAction::Append, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Route to this agent regardless of scores and exclusions
    #[arg(long, value_name = "AGENT")]
    pub force: Option<String>,

    /// Consider agents that are not installed
    #[arg(long)]
    pub include_unavailable: bool,

    /// Only classify the task, don't select an agent
    #[arg(long)]
    pub classify_only: bool,

    /// Output compact single-line JSON
    #[arg(long)]
    pub compact: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Compress the input text at this level instead of routing it
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub compress: Option<CompressionArg>,

    /// Token budget for --compress
    #[arg(long, value_name = "N", requires = "compress")]
    pub max_tokens: Option<usize>,

    /// Report classifier health and exit
    #[arg(long)]
    pub health: bool,

    /// List known agents with their availability and exit
    #[arg(long)]
    pub list_agents: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and the merged configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Task text from the positional argument or `--prompt`, if non-blank
    pub fn task_text(&self) -> Option<String> {
        self.task
            .as_deref()
            .or(self.prompt.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    }

    /// Combine configured routing defaults with command-line flags.
    ///
    /// Flags only ever add: a `true` preference or an extra exclusion.
    pub fn preferences(&self, defaults: &RoutingDefaults) -> RoutingPreferences {
        let mut preferences = defaults
            .preferences()
            .with_prefer_speed(defaults.prefer_speed || self.prefer_speed)
            .with_prefer_cost(defaults.prefer_cost || self.prefer_cost)
            .with_exclusions(self.exclude.iter().map(|a| AgentId::new(a.as_str())));
        if let Some(agent) = &self.force {
            preferences = preferences.with_forced_agent(agent.as_str());
        }
        preferences
    }

    /// Whether routing should skip agents that are not installed
    pub fn only_available(&self, defaults: &RoutingDefaults) -> bool {
        defaults.only_available && !self.include_unavailable
    }

    /// Compression level and token budget, when `--compress` was given
    pub fn compression(&self, default_max_tokens: usize) -> Option<(CompressionLevel, usize)> {
        self.compress.map(|level| {
            (
                CompressionLevel::from(level),
                self.max_tokens.unwrap_or(default_max_tokens),
            )
        })
    }
}
