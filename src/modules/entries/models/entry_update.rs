use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::revenue_entry::{Month, ProjectType, RevenueEntry, SalesType};
use crate::core::Result;

/// Which half of a monthly cell is being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevenueKind {
    Estimated,
    Actual,
}

/// A single-field edit, as sent by the grid editor.
///
/// ```json
/// { "field": "monthly_revenue", "month": "June", "kind": "actual", "value": 1200 }
/// { "field": "probability", "value": 0.75 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum EntryUpdate {
    MonthlyRevenue {
        month: Month,
        kind: RevenueKind,
        value: Decimal,
    },
    /// Also re-derives the stage label
    Probability { value: Decimal },
    Type { value: SalesType },
    Bd { value: String },
    Dl { value: String },
    Pm { value: String },
    AccountName { value: String },
    ProjectName { value: String },
    ProjectType { value: ProjectType },
    UpdateDate { value: NaiveDate },
}

impl EntryUpdate {
    /// Apply the edit in place. Only the probability can be rejected here;
    /// amount and name rules are checked by `RevenueEntry::validate` afterwards.
    pub fn apply(&self, entry: &mut RevenueEntry) -> Result<()> {
        match self {
            EntryUpdate::MonthlyRevenue { month, kind, value } => {
                let cell = entry.monthly_revenues.entry(*month).or_default();
                match kind {
                    RevenueKind::Estimated => cell.estimated = *value,
                    RevenueKind::Actual => cell.actual = *value,
                }
            }
            EntryUpdate::Probability { value } => entry.set_probability(*value)?,
            EntryUpdate::Type { value } => entry.sales_type = *value,
            EntryUpdate::Bd { value } => entry.bd = value.trim().to_string(),
            EntryUpdate::Dl { value } => entry.dl = value.trim().to_string(),
            EntryUpdate::Pm { value } => entry.pm = value.trim().to_string(),
            EntryUpdate::AccountName { value } => entry.account_name = value.trim().to_string(),
            EntryUpdate::ProjectName { value } => entry.project_name = value.trim().to_string(),
            EntryUpdate::ProjectType { value } => entry.project_type = *value,
            EntryUpdate::UpdateDate { value } => entry.update_date = *value,
        }

        Ok(())
    }

    /// Apply a batch in order, stopping at the first rejected edit
    pub fn apply_all(updates: &[EntryUpdate], entry: &mut RevenueEntry) -> Result<()> {
        updates.iter().try_for_each(|update| update.apply(entry))
    }
}
