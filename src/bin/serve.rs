//! HTTP server entry point
//!
//! ```bash
//! cargo run --bin serve
//! PARSE_PDF_PORT=8080 cargo run --bin serve
//! ```

use pdf_toc_service::{app, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ServerConfig::from_env();
    let addr = config.bind_addr();
    let router = app(config);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("pdf-toc-service listening on {addr}");
    tracing::info!("  - POST /parse-pdf");
    tracing::info!("  - GET  /health");
    tracing::info!("  - GET  /openapi.json");

    axum::serve(listener, router).await?;
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pdf_toc_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
