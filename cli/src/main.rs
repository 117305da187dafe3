use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use filmebot_core::agent::session::{FAREWELL, Reply};
use filmebot_core::{agent, catalog, config, providers, tools};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "filmebot")]
#[command(about = "filmebot - movie tips and where to stream them", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.filmebot/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        tracing::warn!(error = %e, "Ignoring unreadable .env file");
    }

    let config = config::Config::load(cli.config.as_deref())?;
    let backend_key = config.backend_api_key()?;

    let provider = providers::create_provider(&config, backend_key)?;

    let mut tool_registry = agent::ToolRegistry::new();
    if config.persona.uses_tools() {
        let catalog_key = config.catalog_api_key()?;
        let catalog = catalog::TmdbCatalog::new(
            catalog_key,
            Duration::from_secs(config.catalog.timeout_secs),
        )
        .with_base_url(config.catalog.base_url.clone());
        let tool = tools::FindStreamingPlatformsTool::new(Arc::new(catalog)).with_locale(
            config.catalog.language.clone(),
            config.catalog.region.clone(),
            config.catalog.region_name.clone(),
        );
        tool_registry.register(tool);
    }

    let agent_loop = agent::AgentLoop::new(
        provider,
        agent::ContextBuilder::new(config.persona),
        Arc::new(tool_registry),
    )
    .with_max_tool_calls(config.max_tool_calls);
    let mut session = agent::Session::new(agent_loop);

    tracing::info!(
        provider = config.provider_name(),
        persona = ?config.persona,
        "Session started"
    );

    let mut editor = DefaultEditor::new().context("Failed to initialize the line editor")?;
    let skin = termimad::MadSkin::default();

    println!("{} {}\n", style("Bot:").cyan().bold(), config.persona.greeting());

    loop {
        let line = match editor.readline("Você: ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                println!("\n{} {}", style("Bot:").cyan().bold(), FAREWELL);
                break;
            }
            Err(e) => return Err(e).context("Failed to read input"),
        };

        match session.handle(&line).await {
            Ok(Reply::Exit) => {
                println!("{} {}", style("Bot:").cyan().bold(), FAREWELL);
                break;
            }
            Ok(Reply::Skip) => continue,
            Ok(Reply::Answer(answer)) => {
                let _ = editor.add_history_entry(line.as_str());
                println!("{}", style("Bot:").cyan().bold());
                skin.print_text(&answer);
                println!();
            }
            Err(e) => {
                tracing::error!(error = %e, "Turn failed");
                eprintln!(
                    "{} Não consegui responder agora ({e}). Tente novamente.\n",
                    style("❌").red()
                );
            }
        }
    }

    Ok(())
}
