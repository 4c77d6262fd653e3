pub mod revenue_report;

pub use revenue_report::{
    BreakdownReport, Dimension, DimensionTotal, EntryTotals, EntryTotalsRow, FormattedTotals,
    GrandTotalReport, GrandTotals, MonthlyTotals, SummaryReport,
};
