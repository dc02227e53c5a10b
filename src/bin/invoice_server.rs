//! Invoice automation server
//!
//! Usage: `invoice-server [config.yaml]`
//!
//! The config path may also be given through `INVOICE_CONFIG`. Without
//! either, built-in defaults are used. Log verbosity follows `RUST_LOG`.

use anyhow::Result;
use invoice::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("INVOICE_CONFIG").ok());

    let config = match &config_path {
        Some(path) => {
            tracing::info!(path = %path, "loading configuration");
            AppConfig::from_yaml_file(path).inspect_err(|e| {
                tracing::error!(kind = ?e.kind(), error = %e, "configuration rejected");
            })?
        }
        None => AppConfig::default_config(),
    };

    tracing::info!(
        template = %config.template_path.display(),
        output_dir = %config.output_dir.display(),
        clients = %config.clients_path.display(),
        "starting invoice server"
    );

    ServerBuilder::from_config(&config)
        .await?
        .serve(&config.listen_addr)
        .await
}
