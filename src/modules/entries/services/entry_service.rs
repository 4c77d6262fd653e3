use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::core::{AppError, Currency, ReportClock, Result};
use crate::modules::auth::models::AuthenticatedUser;
use crate::modules::entries::models::{EntryFilter, EntryRequest, EntryUpdate, RevenueEntry};
use crate::modules::entries::repositories::EntryRepository;

/// Service for revenue entry CRUD with per-user visibility
pub struct EntryService {
    entry_repo: Arc<dyn EntryRepository>,
    currency: Currency,
    clock: ReportClock,
}

impl EntryService {
    pub fn new(entry_repo: Arc<dyn EntryRepository>, currency: Currency, clock: ReportClock) -> Self {
        Self {
            entry_repo,
            currency,
            clock,
        }
    }

    /// Entries visible to the user, narrowed by the optional filter
    pub async fn list_entries(
        &self,
        user: &AuthenticatedUser,
        filter: &EntryFilter,
    ) -> Result<Vec<RevenueEntry>> {
        let entries = self.entry_repo.list(&user.scope()).await?;

        if filter.is_empty() {
            return Ok(entries);
        }

        Ok(entries.into_iter().filter(|e| filter.matches(e)).collect())
    }

    /// Unfiltered visible entries, as consumed by the report views
    pub async fn visible_entries(&self, user: &AuthenticatedUser) -> Result<Vec<RevenueEntry>> {
        self.entry_repo.list(&user.scope()).await
    }

    pub async fn get_entry(&self, id: &str, user: &AuthenticatedUser) -> Result<RevenueEntry> {
        self.entry_repo
            .find_by_id(id, &user.scope())
            .await?
            .ok_or_else(|| AppError::not_found(format!("Revenue entry '{}'", id)))
    }

    /// Create an entry with a fresh ID. A non-admin's blank delivery lead
    /// defaults to their own username so the entry stays visible to them.
    pub async fn create_entry(
        &self,
        mut request: EntryRequest,
        user: &AuthenticatedUser,
    ) -> Result<RevenueEntry> {
        if !user.is_admin() && request.dl.trim().is_empty() {
            request.dl = user.username.clone();
        }

        let id = Uuid::new_v4().to_string();
        let entry = RevenueEntry::from_request(id, request, self.clock.today())?;
        self.ensure_writable(&entry, user)?;

        let created = self.entry_repo.create(&entry).await?;

        info!(
            entry_id = %created.id,
            account = %created.account_name,
            user = %user.username,
            "Revenue entry created"
        );

        Ok(created)
    }

    /// Replace every editable field; the ID is kept and the stage re-derived
    pub async fn replace_entry(
        &self,
        id: &str,
        request: EntryRequest,
        user: &AuthenticatedUser,
    ) -> Result<RevenueEntry> {
        let existing = self.get_entry(id, user).await?;

        let entry = RevenueEntry::from_request(existing.id, request, self.clock.today())?;
        self.ensure_writable(&entry, user)?;

        let updated = self.entry_repo.update(&entry).await?;
        info!(entry_id = %updated.id, user = %user.username, "Revenue entry replaced");

        Ok(updated)
    }

    /// Apply field-level edits in order against the latest stored entry;
    /// nothing is stored if any edit fails
    pub async fn apply_updates(
        &self,
        id: &str,
        updates: &[EntryUpdate],
        user: &AuthenticatedUser,
    ) -> Result<RevenueEntry> {
        if updates.is_empty() {
            return Err(AppError::validation("At least one update is required"));
        }

        let edit = |entry: &mut RevenueEntry| -> Result<()> {
            EntryUpdate::apply_all(updates, entry)?;
            self.ensure_writable(entry, user)
        };

        let updated = self
            .entry_repo
            .modify(id, &user.scope(), &edit)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Revenue entry '{}'", id)))?;
        debug!(
            entry_id = %updated.id,
            updates = updates.len(),
            user = %user.username,
            "Revenue entry updated"
        );

        Ok(updated)
    }

    pub async fn delete_entry(&self, id: &str, user: &AuthenticatedUser) -> Result<()> {
        // Visibility check first so hidden entries read as missing
        let entry = self.get_entry(id, user).await?;

        if !self.entry_repo.delete(&entry.id).await? {
            return Err(AppError::not_found(format!("Revenue entry '{}'", id)));
        }

        info!(entry_id = %id, user = %user.username, "Revenue entry deleted");
        Ok(())
    }

    /// Distinct account names the user can see
    pub async fn list_accounts(&self, user: &AuthenticatedUser) -> Result<Vec<String>> {
        self.entry_repo.list_account_names(&user.scope()).await
    }

    pub async fn ping(&self) -> Result<()> {
        self.entry_repo.ping().await
    }

    /// Shared checks for any write: field rules, and a delivery lead may not
    /// hand an entry to someone else.
    fn ensure_writable(&self, entry: &RevenueEntry, user: &AuthenticatedUser) -> Result<()> {
        entry.validate(self.currency)?;

        if !user.scope().permits(entry) {
            return Err(AppError::forbidden(format!(
                "Delivery lead '{}' is outside your accounts",
                entry.dl
            )));
        }

        Ok(())
    }
}
