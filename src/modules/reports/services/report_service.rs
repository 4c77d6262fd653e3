use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::core::{Currency, ReportClock, Result};
use crate::modules::auth::models::AuthenticatedUser;
use crate::modules::entries::services::EntryService;
use crate::modules::reports::models::{
    BreakdownReport, Dimension, EntryTotalsRow, FormattedTotals, GrandTotalReport, SummaryReport,
};
use crate::modules::reports::services::revenue_aggregator::{
    aggregate_by_dimension, aggregate_grand_totals, aggregate_monthly_grand_totals,
    compute_entry_totals,
};

/// Builds report views over the entries visible to a user
pub struct ReportService {
    entry_service: Arc<EntryService>,
    clock: ReportClock,
    currency: Currency,
}

impl ReportService {
    pub fn new(entry_service: Arc<EntryService>, clock: ReportClock, currency: Currency) -> Self {
        Self {
            entry_service,
            clock,
            currency,
        }
    }

    /// Full grand-total table
    ///
    /// `as_of` selects the reference month for weighting; defaults to today
    /// in the reporting offset.
    pub async fn grand_total(
        &self,
        user: &AuthenticatedUser,
        as_of: Option<NaiveDate>,
    ) -> Result<GrandTotalReport> {
        let as_of = self.clock.resolve(as_of);
        let entries = self.entry_service.visible_entries(user).await?;

        let grand_totals = aggregate_grand_totals(&entries, as_of);
        let monthly_totals = aggregate_monthly_grand_totals(&entries);
        let rows: Vec<EntryTotalsRow> = entries
            .into_iter()
            .map(|entry| {
                let totals = compute_entry_totals(&entry, as_of);
                EntryTotalsRow { entry, totals }
            })
            .collect();

        info!(
            username = %user.username,
            as_of = %as_of,
            entries = rows.len(),
            "Grand total report generated"
        );

        Ok(GrandTotalReport {
            as_of,
            currency: self.currency,
            rows,
            monthly_totals,
            formatted: FormattedTotals::new(&grand_totals, self.currency),
            grand_totals,
        })
    }

    pub async fn summary(
        &self,
        user: &AuthenticatedUser,
        as_of: Option<NaiveDate>,
    ) -> Result<SummaryReport> {
        let as_of = self.clock.resolve(as_of);
        let entries = self.entry_service.visible_entries(user).await?;
        let grand_totals = aggregate_grand_totals(&entries, as_of);

        debug!(username = %user.username, as_of = %as_of, "Summary report generated");

        Ok(SummaryReport {
            as_of,
            currency: self.currency,
            entry_count: entries.len(),
            formatted: FormattedTotals::new(&grand_totals, self.currency),
            grand_totals,
        })
    }

    /// Estimated revenue grouped by one owner or classification field
    pub async fn breakdown(
        &self,
        user: &AuthenticatedUser,
        dimension: Dimension,
    ) -> Result<BreakdownReport> {
        let entries = self.entry_service.visible_entries(user).await?;
        let items = aggregate_by_dimension(&entries, |entry| dimension.key(entry));
        let total: Decimal = items.iter().map(|item| item.value).sum();

        debug!(
            username = %user.username,
            dimension = %dimension,
            groups = items.len(),
            "Breakdown report generated"
        );

        Ok(BreakdownReport {
            dimension,
            title: dimension.title().to_string(),
            currency: self.currency,
            items,
            total,
        })
    }
}
