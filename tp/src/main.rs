//! Tripplanner - RAG-backed travel itinerary planning service
//!
//! Binary entry point: load config, wire up the collaborators, serve.

use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::info;

use tripplanner::cli::Cli;
use tripplanner::config::Config;
use tripplanner::llm::create_client;
use tripplanner::planner::TripPlanner;
use tripplanner::prompts::PromptBuilder;
use tripplanner::retrieval::{DocumentIndex, PineconeIndex, PlacesProvider, RapidApiPlaces, RetrievalAugmentor};
use tripplanner::server;

fn setup_logging(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    // Load and validate configuration; a missing LLM or index credential
    // prevents startup
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        model = %config.llm.model,
        index = %config.index.index_name,
        "tripplanner starting"
    );

    // Wire up the collaborators
    let llm = create_client(&config.llm).context("Failed to create LLM client")?;

    let places: Arc<dyn PlacesProvider> =
        Arc::new(RapidApiPlaces::from_config(&config.places).context("Failed to create places client")?);
    let index: Arc<dyn DocumentIndex> = Arc::new(
        PineconeIndex::from_config(&config.index, &config.llm).context("Failed to create index client")?,
    );
    let augmentor = RetrievalAugmentor::new(places, index, config.index.top_k, config.index.context_budget);

    let planner = Arc::new(TripPlanner::new(llm, augmentor, PromptBuilder::new()));

    // Serve
    let app = server::router(planner);
    let port = cli.port.unwrap_or(config.server.port);
    let addr = format!("{}:{}", config.server.host, port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {addr}"))?;

    info!(%addr, "listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
