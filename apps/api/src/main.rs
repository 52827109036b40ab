mod config;
mod db;
mod embeddings;
mod errors;
mod ingestion;
mod llm_client;
mod matching;
mod models;
mod routes;
mod state;
mod vector_store;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::embeddings::gemini::GeminiEmbeddings;
use crate::embeddings::openai::OpenAiEmbeddings;
use crate::embeddings::EmbeddingProvider;
use crate::ingestion::ingest_postings;
use crate::llm_client::LlmClient;
use crate::models::job::fetch_active_postings;
use crate::routes::build_router;
use crate::state::AppState;
use crate::vector_store::pinecone::PineconeClient;
use crate::vector_store::VectorIndex;

/// Per-call timeout for embedding and vector-store requests.
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobScout API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize embedding backend (OpenAI by default — swap via EMBEDDING_PROVIDER)
    let embedder = build_embedder(&config)?;
    info!("Embedding backend initialized (model: {})", embedder.model_id());

    // Initialize vector index client
    let vectors: Arc<dyn VectorIndex> = Arc::new(PineconeClient::new(
        config.pinecone_api_key.clone(),
        config.pinecone_index_host.clone(),
        UPSTREAM_TIMEOUT,
    ));
    info!("Vector index client initialized");

    // Build app state
    let state = AppState {
        db,
        llm,
        embedder,
        vectors,
        config: config.clone(),
    };

    // Startup population + periodic refresh of the vector index
    spawn_ingest_refresh(state.clone());

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs the configured embedding backend. The chosen backend serves
/// both ingestion and queries — mixing backends across the two would put
/// query vectors in a different space than the index.
fn build_embedder(config: &Config) -> Result<Arc<dyn EmbeddingProvider>> {
    match config.embedding_provider.as_str() {
        "openai" => {
            let api_key = config
                .openai_api_key
                .clone()
                .context("OPENAI_API_KEY is required when EMBEDDING_PROVIDER=openai")?;
            Ok(Arc::new(OpenAiEmbeddings::new(api_key, UPSTREAM_TIMEOUT)))
        }
        "gemini" => {
            let api_key = config
                .gemini_api_key
                .clone()
                .context("GEMINI_API_KEY is required when EMBEDDING_PROVIDER=gemini")?;
            Ok(Arc::new(GeminiEmbeddings::new(api_key, UPSTREAM_TIMEOUT)))
        }
        other => anyhow::bail!("Unknown EMBEDDING_PROVIDER '{other}' (expected 'openai' or 'gemini')"),
    }
}

/// Spawns the background task that re-indexes active postings. The first tick
/// fires immediately, which doubles as startup population; later ticks run on
/// the configured interval. Failures are logged and the next tick retries
/// from scratch.
fn spawn_ingest_refresh(state: AppState) {
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(Duration::from_secs(state.config.ingest_refresh_secs));
        loop {
            interval.tick().await;
            match refresh_index(&state).await {
                Ok(report) => info!(
                    "scheduled ingest refreshed {} postings ({} chunks)",
                    report.postings, report.chunks
                ),
                Err(e) => warn!("scheduled ingest failed: {e}"),
            }
        }
    });
}

async fn refresh_index(state: &AppState) -> Result<ingestion::IngestReport, errors::AppError> {
    let postings = fetch_active_postings(&state.db).await?;
    ingest_postings(
        &postings,
        state.embedder.as_ref(),
        state.vectors.as_ref(),
        state.config.chunking(),
    )
    .await
}
