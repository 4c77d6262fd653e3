// Reports module: revenue aggregation engine and report views

pub mod controllers;
pub mod models;
pub mod services;

pub use controllers::configure;
pub use models::{Dimension, EntryTotals, GrandTotals};
pub use services::ReportService;
