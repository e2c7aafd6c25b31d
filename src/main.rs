use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use planguard::cli::{Cli, Commands};
use planguard::config::Settings;
use planguard::core::{AgentOutcome, AgentRunner};
use planguard::llm::LlmClient;
use planguard::redact::{redact_file, Redactor};
use planguard::review::ReviewRequest;
use planguard::skills::SkillRegistry;
use planguard::ui::Console;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Redact { input, output } => {
            redact_file(&Redactor::new(), &input, &output)?;
        }
        Commands::BuildRequest { plan, model } => {
            let request = ReviewRequest::from_plan_file(model, &plan)?;
            println!("{}", request.to_json()?);
        }
        Commands::Agent {
            task,
            max_iterations,
        } => {
            let settings = Settings::load(cli.config.as_deref())?;
            let mut agent_config = settings.agent.clone();
            if let Some(max) = max_iterations {
                agent_config.max_iterations = max;
            }

            let console = Console::new();
            console.info(&format!(
                "Model: {} | max {} iterations",
                settings.model.model, agent_config.max_iterations
            ));

            let client = LlmClient::new(&settings)?;
            let skills = SkillRegistry::new();
            let run = AgentRunner::new(&client, &skills, agent_config)
                .with_console(console)
                .run(&task)
                .await?;

            if let AgentOutcome::MaxIterationsReached { .. } = run.outcome {
                console.info(&format!("Final result: {}", run.outcome));
            }
        }
        Commands::Skills => {
            Console::new().list_skills(&SkillRegistry::new());
        }
        Commands::Config => {
            let settings = Settings::load(cli.config.as_deref())?;
            let path = Settings::resolve_path(cli.config.as_deref())?;
            let rendered = settings.to_display_toml()?;
            Console::new().show_config(&settings, &path, &rendered);
        }
    }

    Ok(())
}

/// Logs go to stderr so `redact` and `build-request` output stays pipeable.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "planguard=debug"
    } else {
        "planguard=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
