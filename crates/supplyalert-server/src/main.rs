mod api;
mod middleware;

use std::sync::Arc;

use supplyalert_risk::{GeminiClient, PipelineConfig, RiskPipeline, TavilyClient};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = supplyalert_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = supplyalert_db::PoolConfig::from_app_config(&config);
    let pool = supplyalert_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = supplyalert_db::run_migrations(&pool).await?;
    tracing::info!(applied, "database migrations complete");

    let news = TavilyClient::with_base_url(
        &config.search_api_key,
        config.upstream_timeout_secs,
        &config.search_base_url,
    )?;
    let model = GeminiClient::with_base_url(
        &config.model_api_key,
        &config.model_name,
        config.upstream_timeout_secs,
        &config.model_base_url,
    )?;
    let pipeline_config = PipelineConfig::from_app_config(&config);
    tracing::info!(
        model = %config.model_name,
        output_mode = %pipeline_config.output_mode,
        profile = %pipeline_config.profile,
        "risk pipeline configured"
    );
    let pipeline = RiskPipeline::new(Arc::new(news), Arc::new(model), pipeline_config);

    let auth = AuthState::from_env(
        &config.api_key_hash_salt,
        matches!(config.env, supplyalert_core::Environment::Development),
    )?;
    let app = build_app(
        AppState {
            pool,
            pipeline,
            history_limit: config.history_limit,
        },
        auth,
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "supplyalert server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
