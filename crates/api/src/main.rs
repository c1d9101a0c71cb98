use anyhow::{Context, Result};
use safar_api::{build_router, spawn_limiter_janitor, ApiConfig, ApiState};
use safar_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing("safar_api");

    let config = ApiConfig::from_env();
    let bind = config.bind.clone();

    let state = ApiState::new(config)?;
    spawn_limiter_janitor(&state);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;
    tracing::info!(bind = %bind, "safar trip planner api started");

    axum::serve(listener, app).await?;
    Ok(())
}
