//! Server module for building the invoice HTTP server
//!
//! `ServerBuilder` wires a template store and a client directory into an
//! `InvoiceService` and exposes it over REST.

pub mod builder;
pub mod exposure;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use exposure::RestExposure;
pub use handlers::AppState;
