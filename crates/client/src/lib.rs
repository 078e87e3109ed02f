//! REST client layer for the catalog console.
//!
//! This crate contains:
//! - The transport seam (HTTP via reqwest, scripted mock for tests)
//! - Entity services with their narrow mutators
//! - List controllers and the dashboard loader

pub mod controller;
pub mod error;
pub mod metrics;
pub mod services;
pub mod transport;

pub use error::ServiceError;
