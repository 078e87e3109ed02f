//! Administrative console for the catalog API.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod notify;
pub mod render;
