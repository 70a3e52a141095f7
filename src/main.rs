use items_predict_api::{app, build_state, config::AppConfig, storage};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    info!("🚀 Starting Items & Prediction API Server");

    // Load configuration
    let config = AppConfig::load()?;
    info!("📋 Configuration loaded");
    info!("   - Database: {}", config.database.url);
    info!("   - Classifier: {}", config.model.classifier_path.display());
    info!("   - Features: {}", config.model.features_path.display());
    info!("   - Cache artifacts: {}", config.model.cache_artifacts);
    info!("   - Persist predictions: {}", config.model.persist_predictions);
    info!("   - Server: {}:{}", config.server.host, config.server.port);

    // Open the store
    info!("💾 Connecting to database...");
    let pool = storage::connect(&config.database).await?;
    if config.database.init_schema {
        storage::ensure_schema(&pool).await?;
        info!("✅ Schema ensured");
    }

    let state = build_state(&config, pool.clone())?;
    let app = app(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📡 Available endpoints:");
    info!("   GET    /health               - Health check");
    info!("   GET    /items?skip=&limit=   - List items");
    info!("   POST   /items                - Create item");
    info!("   GET    /items/{{id}}           - Read item");
    info!("   PUT    /items/{{id}}           - Update item");
    info!("   DELETE /items/{{id}}           - Delete item");
    info!("   GET    /items/search/{{query}} - Search items by name");
    info!("   POST   /predict              - Predict from CSV upload");
    info!("");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("👋 Server shutting down gracefully");

    Ok(())
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received");
}
