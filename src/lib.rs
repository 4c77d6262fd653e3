//! revtrack: revenue pipeline tracking service
//!
//! Stores sales-pipeline entries with twelve months of estimated and actual
//! revenue, and aggregates them into probability-weighted reports.

pub mod app;
pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use app::{build_app, AppState, Repositories};
pub use modules::entries;
pub use modules::reports;
