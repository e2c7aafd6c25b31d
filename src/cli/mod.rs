use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "planguard")]
#[command(author = "planguard contributors")]
#[command(version)]
#[command(about = "Redact plans and prepare them for LLM review", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (defaults to the user config directory)
    #[arg(short, long, global = true, env = "PLANGUARD_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Strip private keys, API key lines and bearer tokens from a file
    Redact {
        /// File to read
        input: PathBuf,

        /// Where to write the redacted text; the count goes to <OUTPUT>.meta
        output: PathBuf,
    },

    /// Print the JSON chat request asking a model to review a plan
    BuildRequest {
        /// Plan file to embed
        plan: PathBuf,

        /// Model identifier for the request
        model: String,
    },

    /// Run a task with the tool-using agent loop
    Agent {
        /// The task to execute
        #[arg(required = true)]
        task: String,

        /// Maximum iterations (defaults to agent.max_iterations from settings)
        #[arg(short, long)]
        max_iterations: Option<usize>,
    },

    /// List the tools available to the agent
    Skills,

    /// Show current configuration
    Config,
}
