//! Revenue aggregation over borrowed entry slices.
//!
//! Every function here is pure: no I/O, no errors, same output for the same
//! input. Entries are only read.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::modules::entries::models::{Month, MonthlyRevenue, RevenueEntry};
use crate::modules::reports::models::{DimensionTotal, EntryTotals, GrandTotals, MonthlyTotals};

/// Twelve-month totals of one entry.
///
/// Months up to and including the reference month are weighted on the actual
/// amount, falling back to the estimate when the actual is zero. Later months
/// are weighted on the estimate. Absent months count as zero.
pub fn compute_entry_totals(entry: &RevenueEntry, reference_date: NaiveDate) -> EntryTotals {
    let reference = Month::of_date(reference_date).index();
    let mut totals = EntryTotals::default();

    for month in Month::ALL {
        let revenue = entry.revenue_for(month);
        totals.total_estimated += revenue.estimated;
        totals.total_actual += revenue.actual;

        // a zero actual is indistinguishable from "not yet booked"
        let basis = if month.index() <= reference && !revenue.actual.is_zero() {
            revenue.actual
        } else {
            revenue.estimated
        };
        totals.total_weighted += basis * entry.probability;
    }

    totals
}

/// Element-wise sum of [`compute_entry_totals`]; zero for an empty slice
pub fn aggregate_grand_totals(entries: &[RevenueEntry], reference_date: NaiveDate) -> GrandTotals {
    entries
        .iter()
        .fold(GrandTotals::default(), |mut grand, entry| {
            grand += compute_entry_totals(entry, reference_date);
            grand
        })
}

/// Twelve-month estimated revenue grouped by `selector`.
///
/// Returns one item per distinct key, in ascending key order.
pub fn aggregate_by_dimension<K, F>(entries: &[RevenueEntry], selector: F) -> Vec<DimensionTotal<K>>
where
    K: Ord,
    F: Fn(&RevenueEntry) -> K,
{
    let mut groups: BTreeMap<K, Decimal> = BTreeMap::new();

    for entry in entries {
        let estimated: Decimal = Month::ALL
            .iter()
            .map(|&month| entry.revenue_for(month).estimated)
            .sum();
        *groups.entry(selector(entry)).or_default() += estimated;
    }

    groups
        .into_iter()
        .map(|(key, value)| DimensionTotal { key, value })
        .collect()
}

/// Per-month column sums; every month is present in the result
pub fn aggregate_monthly_grand_totals(entries: &[RevenueEntry]) -> MonthlyTotals {
    let mut monthly: MonthlyTotals = Month::ALL
        .iter()
        .map(|&month| (month, MonthlyRevenue::default()))
        .collect();

    for entry in entries {
        for (month, revenue) in &entry.monthly_revenues {
            let column = monthly.entry(*month).or_default();
            column.estimated += revenue.estimated;
            column.actual += revenue.actual;
        }
    }

    monthly
}
