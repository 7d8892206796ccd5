use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use listing_enhancer::config::AppConfig;
use listing_enhancer::generator::claude::{ClaudeClient, ClaudeGenerator};
use listing_enhancer::listing::DraftListing;
use listing_enhancer::server::{create_router, AppState};
use listing_enhancer::shutdown::{graceful_shutdown, wait_for_shutdown};
use listing_enhancer::workflow::{EditingSession, TracingSink, WorkflowState};

#[derive(Parser)]
#[command(name = "listing-enhancer", about = "AI-assisted marketplace listing descriptions")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the editing-session HTTP API (default)
    Serve,
    /// Enhance a single draft and print the outcome as JSON
    Enhance {
        #[arg(long)]
        title: String,
        /// Category id, e.g. "electronics"
        #[arg(long)]
        category: String,
        #[arg(long)]
        description: String,
        /// Print the draft with the suggestion applied instead of the raw state
        #[arg(long)]
        apply: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Enhance {
            title,
            category,
            description,
            apply,
        } => {
            let draft = DraftListing {
                title,
                category,
                description,
                ..Default::default()
            };
            enhance_once(config, draft, apply).await
        }
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        model = %config.claude.model,
        "Starting listing enhancer"
    );

    let address = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config));
    let app = create_router(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind(address).await?;

    tracing::info!("Listening on {}", listener.local_addr()?);

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await?;

    graceful_shutdown(&state).await;

    Ok(())
}

async fn enhance_once(config: AppConfig, draft: DraftListing, apply: bool) -> anyhow::Result<()> {
    let generator = Arc::new(ClaudeGenerator::new(ClaudeClient::new(&config.claude)));
    let session = Arc::new(EditingSession::new(
        1,
        draft,
        generator,
        Arc::new(TracingSink),
        config.enhancement.timeout(),
    ));

    session.request_enhancement()?.await?;

    match session.state() {
        WorkflowState::Succeeded(_) if apply => {
            let draft = session.apply_result()?;
            println!("{}", serde_json::to_string_pretty(&draft)?);
            Ok(())
        }
        WorkflowState::Failed(info) => {
            println!("{}", serde_json::to_string_pretty(&session.state())?);
            anyhow::bail!("Enhancement failed ({}): {}", info.kind, info.reason)
        }
        state => {
            println!("{}", serde_json::to_string_pretty(&state)?);
            Ok(())
        }
    }
}
