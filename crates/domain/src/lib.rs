//! Domain layer for the catalog console.
//!
//! This crate contains:
//! - Domain models (Product, Event, Partner, ProductEvent, Subscription)
//! - List derivation, form state and relationship resolution
//! - The notification output channel

pub mod models;
pub mod services;
