use std::sync::Arc;

use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    campusgate_observability::init();

    let config = campusgate_erp::ErpConfig::from_env().context("reading ERP configuration")?;
    let client =
        Arc::new(campusgate_erp::ErpClient::new(config).context("building ERP client")?);

    let bind = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let app = campusgate_api::app::build_app(client);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
