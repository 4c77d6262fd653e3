use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::ops::AddAssign;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::Currency;
use crate::modules::entries::models::{Month, MonthlyRevenue, RevenueEntry};

/// Twelve-month totals of one entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryTotals {
    pub total_estimated: Decimal,
    pub total_actual: Decimal,
    /// Probability-weighted pipeline value
    pub total_weighted: Decimal,
}

/// Totals summed over a collection of entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrandTotals {
    pub grand_total_estimated: Decimal,
    pub grand_total_actual: Decimal,
    pub grand_total_weighted: Decimal,
}

impl AddAssign<EntryTotals> for GrandTotals {
    fn add_assign(&mut self, totals: EntryTotals) {
        self.grand_total_estimated += totals.total_estimated;
        self.grand_total_actual += totals.total_actual;
        self.grand_total_weighted += totals.total_weighted;
    }
}

/// Per-month column totals; always holds all twelve months
pub type MonthlyTotals = BTreeMap<Month, MonthlyRevenue>;

/// One group of a dimension breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionTotal<K> {
    pub key: K,
    /// Summed twelve-month estimated revenue of the group
    pub value: Decimal,
}

/// Grouping field for breakdown reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dimension {
    Account,
    Bd,
    Dl,
    Pm,
    BusinessType,
}

impl Dimension {
    /// Grouping key of an entry under this dimension
    pub fn key(self, entry: &RevenueEntry) -> String {
        match self {
            Dimension::Account => entry.account_name.clone(),
            Dimension::Bd => entry.bd.clone(),
            Dimension::Dl => entry.dl.clone(),
            Dimension::Pm => entry.pm.clone(),
            Dimension::BusinessType => entry.sales_type.code().to_string(),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Dimension::Account => "Revenue by Account",
            Dimension::Bd => "Revenue by Business Developer",
            Dimension::Dl => "Revenue by Delivery Lead",
            Dimension::Pm => "Revenue by Project Manager",
            Dimension::BusinessType => "Revenue by Business Type",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Account => write!(f, "account"),
            Dimension::Bd => write!(f, "bd"),
            Dimension::Dl => write!(f, "dl"),
            Dimension::Pm => write!(f, "pm"),
            Dimension::BusinessType => write!(f, "business-type"),
        }
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "account" => Ok(Dimension::Account),
            "bd" => Ok(Dimension::Bd),
            "dl" => Ok(Dimension::Dl),
            "pm" => Ok(Dimension::Pm),
            "business-type" => Ok(Dimension::BusinessType),
            _ => Err(format!(
                "Invalid dimension: '{}'. Expected one of account, bd, dl, pm, business-type",
                s
            )),
        }
    }
}

/// Grand totals rendered for display in the reporting currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedTotals {
    pub estimated: String,
    pub actual: String,
    pub weighted: String,
}

impl FormattedTotals {
    pub fn new(totals: &GrandTotals, currency: Currency) -> Self {
        Self {
            estimated: currency.format_amount(totals.grand_total_estimated),
            actual: currency.format_amount(totals.grand_total_actual),
            weighted: currency.format_amount(totals.grand_total_weighted),
        }
    }
}

/// One row of the grand-total table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryTotalsRow {
    #[serde(flatten)]
    pub entry: RevenueEntry,
    pub totals: EntryTotals,
}

/// The grand-total table: every visible entry with its totals, the month
/// column totals and the overall totals
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrandTotalReport {
    pub as_of: NaiveDate,
    pub currency: Currency,
    pub rows: Vec<EntryTotalsRow>,
    pub monthly_totals: MonthlyTotals,
    pub grand_totals: GrandTotals,
    pub formatted: FormattedTotals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub as_of: NaiveDate,
    pub currency: Currency,
    pub entry_count: usize,
    pub grand_totals: GrandTotals,
    pub formatted: FormattedTotals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownReport {
    pub dimension: Dimension,
    pub title: String,
    pub currency: Currency,
    pub items: Vec<DimensionTotal<String>>,
    /// Sum of all item values
    pub total: Decimal,
}
