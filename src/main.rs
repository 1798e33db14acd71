use std::sync::Arc;

use simposio::{config::Config, create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simposio=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Using conference API at {}", config.api_base_url);

    let state = Arc::new(AppState::new(config)?);
    let app = create_router(state);

    tracing::info!("Simposio listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
