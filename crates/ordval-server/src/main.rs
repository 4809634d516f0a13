mod api;
mod middleware;

use std::{sync::Arc, time::Duration};

use ordval_extractor::OpenAiExtractor;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::{AuthState, RateLimitState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ordval_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let Some(openai_api_key) = config.openai_api_key.as_deref() else {
        anyhow::bail!("OPENAI_API_KEY is required to run the order validation server");
    };
    let extractor = OpenAiExtractor::with_base_url(
        openai_api_key,
        &config.openai_model,
        config.llm_timeout_secs,
        &config.openai_base_url,
    )?;

    let pool_config = ordval_db::PoolConfig::from_app_config(&config);
    let pool = ordval_db::connect_pool(&config.database_url, pool_config).await?;
    ordval_db::run_migrations(&pool).await?;

    let auth = AuthState::from_keys(
        &config.api_keys,
        matches!(config.env, ordval_core::Environment::Development),
    )?;
    let rate_limit = RateLimitState::new(config.rate_limit_per_minute, Duration::from_secs(60));
    let app = build_app(
        AppState {
            pool,
            extractor: Arc::new(extractor),
        },
        auth,
        rate_limit,
    );

    tracing::info!(
        addr = %config.bind_addr,
        env = %config.env,
        model = %config.openai_model,
        "order validation server listening"
    );
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
