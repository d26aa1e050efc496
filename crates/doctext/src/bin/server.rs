//! Extraction server binary
//!
//! Run with: cargo run -p doctext --bin doctext-server

use doctext::{config::DoctextConfig, server::ExtractionServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doctext=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration: optional TOML file, then environment overrides
    let mut config = match std::env::var("DOCTEXT_CONFIG") {
        Ok(path) => {
            tracing::info!("Loading configuration from {}", path);
            DoctextConfig::load(&path)?
        }
        Err(_) => DoctextConfig::default(),
    };
    config.apply_env();
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - PDF OCR threshold: {} chars", config.pipeline.pdf_ocr_threshold);
    tracing::info!(
        "  - Image retry threshold: {} chars",
        config.pipeline.image_retry_threshold
    );
    tracing::info!(
        "  - Conversion timeout: {}s",
        config.pipeline.conversion_timeout_secs
    );
    tracing::info!("  - Upload dir: {}", config.storage.upload_dir.display());

    let server = ExtractionServer::new(config)?;

    println!("\nText extraction service starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /extract-text         - Upload a document");
    println!("  POST /extract-text-base64  - Send base64 file data");
    println!("  POST /batch-extract        - Upload multiple documents");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
