use colored::Colorize;
use std::path::Path;

use crate::config::Settings;
use crate::skills::SkillRegistry;

/// Human-facing progress output for the interactive commands
#[derive(Debug, Clone, Copy, Default)]
pub struct Console {
    quiet: bool,
}

impl Console {
    pub fn new() -> Self {
        Self { quiet: false }
    }

    /// Console that prints nothing
    pub fn quiet() -> Self {
        Self { quiet: true }
    }

    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        println!("{} {}", "[INFO]".blue(), message);
    }

    pub fn warn(&self, message: &str) {
        if self.quiet {
            return;
        }
        println!("{} {}", "[WARN]".yellow(), message);
    }

    pub fn task(&self, task: &str) {
        if self.quiet {
            return;
        }
        println!("\n{} {}", "[TASK]".yellow().bold(), task.white());
        println!("{}", "━".repeat(60).dimmed());
    }

    pub fn iteration(&self, iteration: usize, max_iterations: usize) {
        if self.quiet {
            return;
        }
        println!(
            "\n{} {}/{}",
            "[ITERATION]".blue().bold(),
            iteration.to_string().cyan(),
            max_iterations.to_string().dimmed()
        );
    }

    pub fn agent_message(&self, message: &str) {
        if self.quiet {
            return;
        }
        println!(
            "\n{} {}\n{}",
            "[AGENT]".green().bold(),
            "━".repeat(50).dimmed(),
            message
        );
    }

    pub fn tool_call(&self, tool: &str, arguments: &str) {
        if self.quiet {
            return;
        }
        println!("\n{} {}({})", "[TOOL]".magenta(), tool.cyan(), arguments.dimmed());
    }

    pub fn tool_result(&self, tool: &str, result: &str) {
        if self.quiet {
            return;
        }
        println!(
            "{} {}\n{}",
            format!("[TOOL:{}]", tool).magenta(),
            "─".repeat(40).dimmed(),
            result.dimmed()
        );
    }

    pub fn completed(&self, summary: &str, iterations: usize) {
        if self.quiet {
            return;
        }
        println!("\n{}", "━".repeat(60).green());
        println!(
            "{} Task completed in {} iterations",
            "✓".green().bold(),
            iterations.to_string().cyan()
        );
        println!("{}", summary);
    }

    pub fn list_skills(&self, registry: &SkillRegistry) {
        println!("\n{}", "AVAILABLE SKILLS".bold().underline());
        println!("{}", "─".repeat(50));
        for skill in registry.list() {
            println!(
                "    {} {}",
                skill.name.cyan(),
                format!("- {}", skill.description).dimmed()
            );
        }
        println!();
    }

    pub fn show_config(&self, settings: &Settings, path: &Path, rendered: &str) {
        println!("\n{}", "CONFIGURATION".bold().underline());
        println!("{}", "─".repeat(50));

        let key_source = match (&settings.model.api_key, &settings.model.api_key_env) {
            (Some(_), _) => "inline".to_string(),
            (None, Some(var)) if std::env::var(var).is_ok() => format!("${} (set)", var),
            (None, Some(var)) => format!("${} (not set)", var),
            (None, None) => "none".to_string(),
        };
        println!("  {} {}", "API key:".yellow(), key_source);

        let status = if path.exists() { "" } else { " (not found, using defaults)" };
        println!(
            "  {} {}{}",
            "Config file:".yellow(),
            path.display().to_string().dimmed(),
            status
        );

        println!("\n{}", rendered);
    }
}
