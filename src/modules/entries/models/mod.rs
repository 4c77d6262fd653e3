mod access_scope;
mod entry_update;
mod revenue_entry;

pub use access_scope::{AccessScope, EntryFilter};
pub use entry_update::{EntryUpdate, RevenueKind};
pub use revenue_entry::{
    owner_key, EntryRequest, Month, MonthlyRevenue, ProbabilityStage, ProjectType, RevenueEntry,
    SalesType,
};
