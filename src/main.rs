//! Perkflow HTTP server entrypoint.

use std::net::SocketAddr;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use perkflow::config::Config;
use perkflow::embedding::{EmbedderConfig, HttpEmbedder};
use perkflow::gateway::{HandlerState, create_router_with_state};
use perkflow::llm::GenaiLlm;
use perkflow::moderation::ForbiddenWordFilter;
use perkflow::recommend::{Recommender, RecommenderConfig};
use perkflow::repository::PgRepository;
use perkflow::vectordb::QdrantClient;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!(
        r#"
██████╗ ███████╗██████╗ ██╗  ██╗███████╗██╗      ██████╗ ██╗    ██╗
██╔══██╗██╔════╝██╔══██╗██║ ██╔╝██╔════╝██║     ██╔═══██╗██║    ██║
██████╔╝█████╗  ██████╔╝█████╔╝ █████╗  ██║     ██║   ██║██║ █╗ ██║
██╔═══╝ ██╔══╝  ██╔══██╗██╔═██╗ ██╔══╝  ██║     ██║   ██║██║███╗██║
██║     ███████╗██║  ██║██║  ██╗██║     ███████╗╚██████╔╝╚███╔███╔╝
╚═╝     ╚══════╝╚═╝  ╚═╝╚═╝  ╚═╝╚═╝     ╚══════╝ ╚═════╝  ╚══╝╚══╝

        ASK. MATCH. PERK.
                                        AGPL-3.0
"#
    );

    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        "Perkflow starting"
    );

    let repository = PgRepository::connect(&config.database_url).await?;
    repository.run_migrations().await?;
    tracing::info!("Database migrations applied");

    let vectordb = QdrantClient::new(&config.qdrant_url).await?;
    vectordb.health_check().await?;

    let embedder = HttpEmbedder::new(
        EmbedderConfig::new(config.embeddings_url.clone(), config.embeddings_model.clone())
            .api_key(config.embeddings_api_key.clone())
            .embedding_dim(config.embedding_dim),
    );

    let llm = GenaiLlm::new(config.llm_model.clone());

    let filter = ForbiddenWordFilter::with_extra_words(&config.extra_forbidden_words);

    let recommender = Recommender::new(
        embedder,
        vectordb,
        llm,
        repository,
        filter,
        RecommenderConfig::from_config(&config),
    );

    recommender.ensure_collections().await?;
    tracing::info!(
        question_collection = %config.question_collection,
        benefit_collection = %config.benefit_collection,
        "Vector collections ready"
    );

    let state = HandlerState::new(recommender);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Perkflow shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("PERKFLOW_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    rt.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .expect("failed to build client");

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
