use anyhow::Context;

use solestore_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    solestore_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let products = config.load_products().context("failed to load catalog")?;

    let app = solestore_api::app::build_app(&config, products);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
