//! API exposure modules
//!
//! Each exposure consumes the invoice service and produces a Router for its protocol.

pub mod rest;

pub use rest::RestExposure;
