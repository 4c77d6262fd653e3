// Entries module: revenue pipeline line items and their editing API

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{EntryRequest, EntryUpdate, Month, MonthlyRevenue, RevenueEntry};
pub use repositories::EntryRepository;
pub use services::EntryService;
