//! Console output formatter for routing results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use router_application::{AgentStatus, HealthStatus};
use router_domain::{CompressionResult, RoutingDecision, TaskProfile};

/// Formats routing results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete routing decision
    pub fn format_decision(decision: &RoutingDecision) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Routing Decision"));
        output.push('\n');

        output.push_str(&format!(
            "{} {} {}\n",
            "Agent:".cyan().bold(),
            decision.selected_agent.as_str().green().bold(),
            format!("({})", decision.pick_rule).dimmed()
        ));
        output.push_str(&format!(
            "{} {:.2}\n",
            "Confidence:".cyan().bold(),
            decision.confidence
        ));
        if let Some(task) = &decision.specialized_task {
            output.push_str(&format!("{} {}\n", "Specialized:".cyan().bold(), task));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Reasoning:".cyan().bold(),
            decision.reasoning
        ));

        if !decision.recommended_flags.is_empty() {
            output.push_str(&Self::section_header("Recommended flags"));
            for (key, value) in &decision.recommended_flags {
                output.push_str(&format!("  {} = {}\n", key.yellow(), value));
            }
        }

        if !decision.alternatives.is_empty() {
            output.push_str(&Self::section_header("Alternatives"));
            for alt in &decision.alternatives {
                output.push_str(&format!("  * {} ({:.2})\n", alt.agent, alt.score));
            }
        }

        output.push_str(&Self::section_header("Task profile"));
        output.push_str(&Self::indent(&Self::profile_lines(&decision.task_profile), "  "));
        output.push('\n');

        output.push_str(&Self::footer());
        output
    }

    /// Format a classification on its own
    pub fn format_profile(profile: &TaskProfile) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Task Classification"));
        output.push('\n');
        output.push_str(&Self::profile_lines(profile));
        output.push('\n');
        output.push_str(&Self::footer());
        output
    }

    pub fn format_compression(result: &CompressionResult) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n",
            format!("=== Compressed ({}) ===", result.level).cyan().bold()
        ));
        output.push_str(&result.compressed);
        output.push('\n');

        let stats = format!(
            "{} -> {} chars, ratio {:.2}",
            result.original_length, result.compressed_length, result.compression_ratio
        );
        output.push_str(&format!("\n{}\n", stats.dimmed()));
        if result.truncated {
            output.push_str(&format!("{}\n", "Output was truncated to fit the token budget".yellow()));
        }
        output
    }

    pub fn format_health(health: &HealthStatus) -> String {
        let status = if health.status == "healthy" {
            health.status.green().bold()
        } else {
            health.status.red().bold()
        };
        format!(
            "{} {}\n{} {}\n{} {}\n",
            "Status:".cyan().bold(),
            status,
            "Classifier:".cyan().bold(),
            health.classifier_variant,
            "Agents:".cyan().bold(),
            health.agents
        )
    }

    pub fn format_agents(agents: &[AgentStatus]) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Agents"));
        output.push('\n');
        for agent in agents {
            let marker = if agent.available {
                "installed".green()
            } else {
                "missing".red()
            };
            output.push_str(&format!(
                "{:<10} {:<10} speed={:<6} cost={:<6} {}\n",
                agent.id.as_str().bold(),
                marker,
                agent.speed.as_str(),
                agent.cost.as_str(),
                agent.description.dimmed()
            ));
        }
        output.push_str(&Self::footer());
        output
    }

    fn profile_lines(profile: &TaskProfile) -> String {
        let mut lines = vec![
            format!("{} {}", "Type:".bold(), profile.task_type),
            format!(
                "{} {} ({:.2})",
                "Complexity:".bold(),
                profile.complexity,
                profile.complexity_score
            ),
            format!("{} {:.2}", "Confidence:".bold(), profile.confidence),
        ];
        if profile.fallback {
            lines.push(format!("{}", "No rule matched; assumed open_qa".yellow()));
        }
        if !profile.signals.is_empty() {
            lines.push(format!("{} {}", "Signals:".bold(), profile.signals.join(", ")));
        }
        lines.join("\n")
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn decision(&self, decision: &RoutingDecision) -> String {
        Self::format_decision(decision)
    }

    fn profile(&self, profile: &TaskProfile) -> String {
        Self::format_profile(profile)
    }

    fn compression(&self, result: &CompressionResult) -> String {
        Self::format_compression(result)
    }

    fn health(&self, health: &HealthStatus) -> String {
        Self::format_health(health)
    }

    fn agents(&self, agents: &[AgentStatus]) -> String {
        Self::format_agents(agents)
    }
}
