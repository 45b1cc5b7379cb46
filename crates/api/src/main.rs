use std::sync::Arc;

use anyhow::Context;

use clientsvc_infra::PgClientStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    clientsvc_observability::init();

    let dsn = std::env::var("DATABASE_URL")
        .context("DATABASE_URL environment variable is not set")?;

    let store = PgClientStore::connect(&dsn)
        .await
        .context("unable to connect to database")?;
    tracing::info!("connected to database");

    let app = clientsvc_api::app::build_app(Arc::new(store));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
