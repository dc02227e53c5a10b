//! ServerBuilder for fluent API to build the invoice HTTP server

use super::exposure::RestExposure;
use crate::config::AppConfig;
use crate::core::schema::FieldSchema;
use crate::core::service::InvoiceService;
use crate::core::store::{ClientDirectory, TemplateStore};
use crate::storage::{JsonClientDirectory, XlsxTemplateStore};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the invoice server
///
/// # Example
///
/// ```ignore
/// let schema = Arc::new(FieldSchema::default());
/// let app = ServerBuilder::new()
///     .with_template_store(InMemoryTemplateStore::new(schema))
///     .with_client_directory(InMemoryClientDirectory::default())
///     .build()?;
/// ```
pub struct ServerBuilder {
    schema: Option<Arc<FieldSchema>>,
    template_store: Option<Arc<dyn TemplateStore>>,
    client_directory: Option<Arc<dyn ClientDirectory>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            schema: None,
            template_store: None,
            client_directory: None,
            custom_routes: Vec::new(),
        }
    }

    /// Wire the spreadsheet template and JSON client directory described by `config`
    ///
    /// A template that fails to load is logged and left unloaded; template
    /// reads and saves then fail until it is fixed and the server restarted.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let schema = Arc::new(config.field_schema()?);

        let templates = XlsxTemplateStore::new(
            &config.template_path,
            &config.output_dir,
            schema.clone(),
        )
        .with_sheet_name(&config.sheet_name);

        if let Err(e) = templates.load().await {
            tracing::warn!(error = %e, "template not loaded");
        }

        let clients =
            JsonClientDirectory::open(&config.clients_path, config.first_invoice_number).await?;

        Ok(Self {
            schema: Some(schema),
            template_store: Some(Arc::new(templates)),
            client_directory: Some(Arc::new(clients)),
            custom_routes: Vec::new(),
        })
    }

    /// Use a custom field schema (defaults to the standard table)
    pub fn with_schema(mut self, schema: FieldSchema) -> Self {
        self.schema = Some(Arc::new(schema));
        self
    }

    /// Set the template store (required)
    pub fn with_template_store(mut self, store: impl TemplateStore + 'static) -> Self {
        self.template_store = Some(Arc::new(store));
        self
    }

    /// Set the client directory (required)
    pub fn with_client_directory(mut self, directory: impl ClientDirectory + 'static) -> Self {
        self.client_directory = Some(Arc::new(directory));
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the invoice service from the configured parts
    pub fn build_service(&mut self) -> Result<Arc<InvoiceService>> {
        let schema = self
            .schema
            .clone()
            .unwrap_or_else(|| Arc::new(FieldSchema::default()));

        let templates = self.template_store.take().ok_or_else(|| {
            anyhow::anyhow!("TemplateStore is required. Call .with_template_store()")
        })?;

        let clients = self.client_directory.take().ok_or_else(|| {
            anyhow::anyhow!("ClientDirectory is required. Call .with_client_directory()")
        })?;

        Ok(Arc::new(InvoiceService::new(schema, templates, clients)))
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let service = self.build_service()?;
        let custom_routes = std::mem::take(&mut self.custom_routes);
        Ok(RestExposure::build_router(service, custom_routes))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `addr` and handles SIGTERM and SIGINT (Ctrl+C).
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
