//! Page-level controllers built on the entity services.

pub mod dashboard;
pub mod list;

pub use dashboard::load_dashboard;
pub use list::{ListController, Mutation, SubmitError};
