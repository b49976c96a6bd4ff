use anyhow::Result;
use propleads::{app_state::AppState, config::Config, router};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    let bind_addr = config.bind_addr().to_string();

    let state = AppState::new(config);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "scraper API listening");
    axum::serve(listener, app).await?;
    Ok(())
}
