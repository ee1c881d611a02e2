use std::sync::Arc;

use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dish_recommender::{
    api::{create_router, AppState},
    config::Config,
    db::{create_pool, run_migrations, PgSignalRepository},
    services::RecommendationService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dish_recommender=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    info!("Connecting to database...");
    let pool = create_pool(&config).await?;
    if config.run_migrations {
        run_migrations(&pool).await?;
        info!("Migrations applied");
    }

    let repository = Arc::new(PgSignalRepository::new(pool));
    let recommender = RecommendationService::from_config(repository, &config);
    let app = create_router(AppState::new(recommender));

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!(
        address = %address,
        deadline_ms = config.request_timeout_ms,
        max_results = config.max_results,
        "Recommendation service running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
}
