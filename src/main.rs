use std::sync::Arc;

use anyhow::Context;
use stock_tracker::api::routes::{AppState, app_router};
use stock_tracker::config::Config;
use stock_tracker::persistence::{InvestmentStore, MemoryStore, PgStore, create_pool_and_migrate};
use stock_tracker::quotes::AlphaVantageClient;
use tokio::signal;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = Config::from_env().context("invalid configuration")?;

    let store: Arc<dyn InvestmentStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool_and_migrate(url, config.db_max_connections)
                .await
                .context("could not connect to database")?;
            info!("using postgres investment store");
            Arc::new(PgStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set, investments are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let quotes = AlphaVantageClient::new(
        &config.quote_base_url,
        &config.quote_api_key,
        config.quote_timeout,
    )
    .context("could not build quote client")?;

    let app_state = AppState {
        store,
        quotes: Arc::new(quotes),
        jwt_secret: config.jwt_secret.clone(),
    };

    let app = app_router(app_state).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("could not bind {}", config.bind_addr))?;
    info!("listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server crashed")?;

    info!("shut down");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "could not listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "could not listen for SIGTERM");
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
