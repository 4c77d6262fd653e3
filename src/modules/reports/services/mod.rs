pub mod report_service;
pub mod revenue_aggregator;

pub use report_service::ReportService;
pub use revenue_aggregator::{
    aggregate_by_dimension, aggregate_grand_totals, aggregate_monthly_grand_totals,
    compute_entry_totals,
};
