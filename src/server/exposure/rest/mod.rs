//! REST API exposure of the invoice service
//!
//! Consumes an `InvoiceService` and produces an Axum `Router` with CORS and
//! request tracing applied to every route.

use crate::core::service::InvoiceService;
use crate::server::handlers::AppState;
use crate::server::router::{build_health_routes, build_invoice_routes};
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router for `service`
    ///
    /// Returns a router with:
    /// - Health and description routes
    /// - Invoice and client routes
    /// - Custom routes
    pub fn build_router(service: Arc<InvoiceService>, custom_routes: Vec<Router>) -> Router {
        let state = AppState::new(service);

        let mut app = build_health_routes().merge(build_invoice_routes(state));
        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
    }
}
