//! Shared utilities and common types for the catalog console.
//!
//! This crate provides common functionality used across all other crates:
//! - Page arithmetic for client-side pagination
//! - Case-insensitive search matching
//! - Common validation logic

pub mod pagination;
pub mod search;
pub mod validation;
