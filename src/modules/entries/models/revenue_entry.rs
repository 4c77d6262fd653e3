// Revenue entry model
//
// A revenue entry is one sales-pipeline line item tracked across the twelve
// calendar months, each month holding an estimated and an actual amount.
// The probability of the entry determines its pipeline stage label.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Currency, Result};

/// Canonical calendar months, declared in calendar order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// All months, January first
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// 0-based calendar index (January = 0)
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Month> {
        Self::ALL.get(index).copied()
    }

    /// Month containing the given date
    pub fn of_date(date: NaiveDate) -> Month {
        Self::ALL[date.month0() as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Month {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Month::ALL
            .iter()
            .copied()
            .find(|month| month.name() == s)
            .ok_or_else(|| format!("Invalid month: {}", s))
    }
}

/// Estimated and actual revenue for one month
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    #[serde(default)]
    pub estimated: Decimal,
    #[serde(default)]
    pub actual: Decimal,
}

impl MonthlyRevenue {
    pub fn new(estimated: Decimal, actual: Decimal) -> Self {
        Self { estimated, actual }
    }
}

/// Pipeline stage, fixed one-to-one with a probability value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProbabilityStage {
    #[serde(rename = "Lost")]
    Lost,
    #[serde(rename = "Non-Active")]
    NonActive,
    #[serde(rename = "Qualification")]
    Qualification,
    #[serde(rename = "Estimation")]
    Estimation,
    #[serde(rename = "Proposal")]
    Proposal,
    #[serde(rename = "Negotiation")]
    Negotiation,
    #[serde(rename = "Legal")]
    Legal,
    #[serde(rename = "Signed contract")]
    SignedContract,
    #[serde(rename = "Won")]
    Won,
}

impl ProbabilityStage {
    pub const ALL: [ProbabilityStage; 9] = [
        ProbabilityStage::Lost,
        ProbabilityStage::NonActive,
        ProbabilityStage::Qualification,
        ProbabilityStage::Estimation,
        ProbabilityStage::Proposal,
        ProbabilityStage::Negotiation,
        ProbabilityStage::Legal,
        ProbabilityStage::SignedContract,
        ProbabilityStage::Won,
    ];

    pub fn probability(self) -> Decimal {
        match self {
            ProbabilityStage::Lost => Decimal::ZERO,
            ProbabilityStage::NonActive => Decimal::new(5, 2),
            ProbabilityStage::Qualification => Decimal::new(1, 1),
            ProbabilityStage::Estimation => Decimal::new(25, 2),
            ProbabilityStage::Proposal => Decimal::new(5, 1),
            ProbabilityStage::Negotiation => Decimal::new(75, 2),
            ProbabilityStage::Legal => Decimal::new(9, 1),
            ProbabilityStage::SignedContract => Decimal::new(95, 2),
            ProbabilityStage::Won => Decimal::ONE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProbabilityStage::Lost => "Lost",
            ProbabilityStage::NonActive => "Non-Active",
            ProbabilityStage::Qualification => "Qualification",
            ProbabilityStage::Estimation => "Estimation",
            ProbabilityStage::Proposal => "Proposal",
            ProbabilityStage::Negotiation => "Negotiation",
            ProbabilityStage::Legal => "Legal",
            ProbabilityStage::SignedContract => "Signed contract",
            ProbabilityStage::Won => "Won",
        }
    }

    /// Stage for an exact probability value (scale-insensitive: 0.50 == 0.5)
    pub fn from_probability(probability: Decimal) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|stage| stage.probability() == probability)
    }
}

impl fmt::Display for ProbabilityStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProbabilityStage {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|stage| stage.label() == s)
            .ok_or_else(|| format!("Invalid stage: {}", s))
    }
}

/// Sales-motion code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SalesType {
    /// New Business / Opportunity
    #[default]
    #[serde(rename = "NB")]
    NewBusiness,
    /// Existing Business
    #[serde(rename = "EB")]
    ExistingBusiness,
    /// EB Prolongation
    #[serde(rename = "EB PR")]
    Prolongation,
    /// EB Upsell
    #[serde(rename = "EB UP")]
    Upsell,
    /// EB Potential
    #[serde(rename = "EB PT")]
    Potential,
}

impl SalesType {
    pub const ALL: [SalesType; 5] = [
        SalesType::NewBusiness,
        SalesType::ExistingBusiness,
        SalesType::Prolongation,
        SalesType::Upsell,
        SalesType::Potential,
    ];

    /// Short code as stored and transmitted
    pub fn code(self) -> &'static str {
        match self {
            SalesType::NewBusiness => "NB",
            SalesType::ExistingBusiness => "EB",
            SalesType::Prolongation => "EB PR",
            SalesType::Upsell => "EB UP",
            SalesType::Potential => "EB PT",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SalesType::NewBusiness => "New Business / Opportunity",
            SalesType::ExistingBusiness => "Existing Business",
            SalesType::Prolongation => "EB Prolongation",
            SalesType::Upsell => "EB Upsell",
            SalesType::Potential => "EB Potential",
        }
    }
}

impl fmt::Display for SalesType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SalesType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.code() == s)
            .ok_or_else(|| format!("Invalid sales type: {}", s))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectType {
    Project,
    #[default]
    Opportunity,
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectType::Project => write!(f, "Project"),
            ProjectType::Opportunity => write!(f, "Opportunity"),
        }
    }
}

impl FromStr for ProjectType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Project" => Ok(ProjectType::Project),
            "Opportunity" => Ok(ProjectType::Opportunity),
            _ => Err(format!("Invalid project type: {}", s)),
        }
    }
}

/// Owner key used for delivery-lead scoping: lower-cased with the first
/// space removed, so "Alice Johnson" belongs to user "alicejohnson".
pub fn owner_key(name: &str) -> String {
    name.to_lowercase().replacen(' ', "", 1)
}

/// One sales-pipeline line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueEntry {
    /// Opaque unique ID (UUID), immutable after creation
    pub id: String,

    /// Stage confidence, one of the nine stage values
    pub probability: Decimal,

    /// Stage label derived from `probability`
    pub stage: ProbabilityStage,

    #[serde(rename = "type")]
    pub sales_type: SalesType,

    /// Business developer
    pub bd: String,

    /// Delivery lead
    pub dl: String,

    /// Project manager
    pub pm: String,

    pub account_name: String,

    pub project_name: String,

    pub project_type: ProjectType,

    /// Last-modified marker set by the editor
    pub update_date: NaiveDate,

    /// Per-month amounts; absent months count as zero
    #[serde(default)]
    pub monthly_revenues: BTreeMap<Month, MonthlyRevenue>,
}

/// Body for creating or replacing an entry. `id` and `stage` are never read
/// from the client: the id is server-assigned and the stage is derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRequest {
    #[serde(default = "default_probability")]
    pub probability: Decimal,

    #[serde(rename = "type", default)]
    pub sales_type: SalesType,

    #[serde(default)]
    pub bd: String,

    #[serde(default)]
    pub dl: String,

    #[serde(default)]
    pub pm: String,

    pub account_name: String,

    pub project_name: String,

    #[serde(default)]
    pub project_type: ProjectType,

    #[serde(default)]
    pub update_date: Option<NaiveDate>,

    #[serde(default)]
    pub monthly_revenues: BTreeMap<Month, MonthlyRevenue>,
}

/// New entries start at the Qualification stage
fn default_probability() -> Decimal {
    ProbabilityStage::Qualification.probability()
}

impl RevenueEntry {
    /// Build an entry from a client request
    ///
    /// # Arguments
    /// * `id` - Server-assigned identifier
    /// * `request` - Client payload
    /// * `today` - Used when the request carries no `updateDate`
    ///
    /// # Returns
    /// * `Result<Self>` - Entry with its stage derived from the probability
    pub fn from_request(id: String, request: EntryRequest, today: NaiveDate) -> Result<Self> {
        let stage = Self::stage_for(request.probability)?;

        Ok(Self {
            id,
            probability: request.probability,
            stage,
            sales_type: request.sales_type,
            bd: request.bd.trim().to_string(),
            dl: request.dl.trim().to_string(),
            pm: request.pm.trim().to_string(),
            account_name: request.account_name.trim().to_string(),
            project_name: request.project_name.trim().to_string(),
            project_type: request.project_type,
            update_date: request.update_date.unwrap_or(today),
            monthly_revenues: request.monthly_revenues,
        })
    }

    /// Revenue for a month, zero when absent
    pub fn revenue_for(&self, month: Month) -> MonthlyRevenue {
        self.monthly_revenues.get(&month).copied().unwrap_or_default()
    }

    /// Set the probability and keep the stage label in step
    pub fn set_probability(&mut self, probability: Decimal) -> Result<()> {
        self.stage = Self::stage_for(probability)?;
        self.probability = probability;
        Ok(())
    }

    /// Key matched against usernames for delivery-lead scoping
    pub fn owner_key(&self) -> String {
        owner_key(&self.dl)
    }

    /// Validate editing-boundary rules: names present, amounts valid for the
    /// reporting currency, stage consistent with probability.
    pub fn validate(&self, currency: Currency) -> Result<()> {
        if self.account_name.is_empty() {
            return Err(AppError::validation("Account name cannot be empty"));
        }

        if self.project_name.is_empty() {
            return Err(AppError::validation("Project name cannot be empty"));
        }

        if Self::stage_for(self.probability)? != self.stage {
            return Err(AppError::validation(format!(
                "Stage '{}' does not match probability {}",
                self.stage, self.probability
            )));
        }

        for (month, revenue) in &self.monthly_revenues {
            currency
                .validate_amount(revenue.estimated)
                .and_then(|_| currency.validate_amount(revenue.actual))
                .map_err(|e| AppError::validation(format!("{}: {}", month, e)))?;
        }

        Ok(())
    }

    fn stage_for(probability: Decimal) -> Result<ProbabilityStage> {
        ProbabilityStage::from_probability(probability).ok_or_else(|| {
            AppError::validation(format!(
                "Probability {} is not a pipeline stage value",
                probability
            ))
        })
    }
}
