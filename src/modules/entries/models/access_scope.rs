use serde::Deserialize;

use super::revenue_entry::{ProjectType, ProbabilityStage, RevenueEntry, SalesType};

/// Which entries a caller may see. Repositories apply this in the query
/// itself rather than filtering after the fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessScope {
    /// Every entry (administrators)
    All,
    /// Entries whose delivery-lead owner key equals the given username
    DeliveryLead(String),
}

impl AccessScope {
    /// Owner key to filter on, `None` when unrestricted
    pub fn owner_key(&self) -> Option<&str> {
        match self {
            AccessScope::All => None,
            AccessScope::DeliveryLead(username) => Some(username.as_str()),
        }
    }

    pub fn permits(&self, entry: &RevenueEntry) -> bool {
        match self.owner_key() {
            None => true,
            Some(key) => entry.owner_key() == key,
        }
    }
}

/// Optional equality filters on the entry list
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryFilter {
    pub stage: Option<ProbabilityStage>,
    #[serde(rename = "type")]
    pub sales_type: Option<SalesType>,
    pub bd: Option<String>,
    pub dl: Option<String>,
    pub pm: Option<String>,
    pub account_name: Option<String>,
    pub project_type: Option<ProjectType>,
}

impl EntryFilter {
    pub fn is_empty(&self) -> bool {
        self.stage.is_none()
            && self.sales_type.is_none()
            && self.bd.is_none()
            && self.dl.is_none()
            && self.pm.is_none()
            && self.account_name.is_none()
            && self.project_type.is_none()
    }

    pub fn matches(&self, entry: &RevenueEntry) -> bool {
        fn text_eq(filter: &Option<String>, value: &str) -> bool {
            filter.as_deref().map_or(true, |f| f == value)
        }

        self.stage.map_or(true, |s| s == entry.stage)
            && self.sales_type.map_or(true, |t| t == entry.sales_type)
            && text_eq(&self.bd, &entry.bd)
            && text_eq(&self.dl, &entry.dl)
            && text_eq(&self.pm, &entry.pm)
            && text_eq(&self.account_name, &entry.account_name)
            && self.project_type.map_or(true, |p| p == entry.project_type)
    }
}
