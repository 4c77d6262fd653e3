// EntryRepository: storage for revenue entries and their monthly amounts
//
// Two implementations:
// - MySqlEntryRepository: entry rows plus one row per month, written in a
//   single transaction
// - InMemoryEntryRepository: process-local store for development and tests
//
// Every read takes an AccessScope so delivery leads only ever load their own
// entries.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{FromRow, MySql, MySqlPool, Transaction};
use tokio::sync::RwLock;

use crate::core::{AppError, Result};
use crate::modules::entries::models::{AccessScope, Month, MonthlyRevenue, RevenueEntry};

#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// All entries visible in the scope, oldest first
    async fn list(&self, scope: &AccessScope) -> Result<Vec<RevenueEntry>>;

    /// Entry by ID if it exists and is visible in the scope
    async fn find_by_id(&self, id: &str, scope: &AccessScope) -> Result<Option<RevenueEntry>>;

    /// Insert a new entry (ID already assigned)
    async fn create(&self, entry: &RevenueEntry) -> Result<RevenueEntry>;

    /// Replace all fields and monthly amounts of an existing entry
    async fn update(&self, entry: &RevenueEntry) -> Result<RevenueEntry>;

    /// Read an entry visible in the scope, run `edit` on it and store the
    /// result, holding the entry locked from read to write. `None` when the
    /// entry is not visible; an `edit` error leaves it unchanged.
    async fn modify(
        &self,
        id: &str,
        scope: &AccessScope,
        edit: &(dyn for<'e> Fn(&'e mut RevenueEntry) -> Result<()> + Send + Sync),
    ) -> Result<Option<RevenueEntry>>;

    /// Remove an entry; returns false when it did not exist
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Distinct account names visible in the scope, sorted
    async fn list_account_names(&self, scope: &AccessScope) -> Result<Vec<String>>;

    /// Storage connectivity check for readiness probes
    async fn ping(&self) -> Result<()>;
}

#[derive(Debug, FromRow)]
struct EntryRow {
    id: String,
    probability: Decimal,
    stage: String,
    sales_type: String,
    bd: String,
    dl: String,
    pm: String,
    account_name: String,
    project_name: String,
    project_type: String,
    update_date: NaiveDate,
}

#[derive(Debug, FromRow)]
struct MonthRow {
    entry_id: String,
    month: u8,
    estimated: Decimal,
    actual: Decimal,
}

impl EntryRow {
    fn into_entry(self, monthly_revenues: BTreeMap<Month, MonthlyRevenue>) -> Result<RevenueEntry> {
        let corrupt = |e: String| AppError::internal(format!("Corrupt entry {}: {}", self.id, e));

        Ok(RevenueEntry {
            stage: self.stage.parse().map_err(corrupt)?,
            sales_type: self.sales_type.parse().map_err(corrupt)?,
            project_type: self.project_type.parse().map_err(corrupt)?,
            id: self.id,
            probability: self.probability,
            bd: self.bd,
            dl: self.dl,
            pm: self.pm,
            account_name: self.account_name,
            project_name: self.project_name,
            update_date: self.update_date,
            monthly_revenues,
        })
    }
}

/// Group month rows by entry ID
fn group_months(rows: Vec<MonthRow>) -> Result<HashMap<String, BTreeMap<Month, MonthlyRevenue>>> {
    let mut grouped: HashMap<String, BTreeMap<Month, MonthlyRevenue>> = HashMap::new();

    for row in rows {
        let month = Month::from_index(row.month as usize).ok_or_else(|| {
            AppError::internal(format!(
                "Corrupt month index {} for entry {}",
                row.month, row.entry_id
            ))
        })?;

        grouped
            .entry(row.entry_id)
            .or_default()
            .insert(month, MonthlyRevenue::new(row.estimated, row.actual));
    }

    Ok(grouped)
}

/// MySQL-backed entry repository
#[derive(Clone)]
pub struct MySqlEntryRepository {
    pool: MySqlPool,
}

impl MySqlEntryRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn write_fields(tx: &mut Transaction<'_, MySql>, entry: &RevenueEntry) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE revenue_entries
            SET probability = ?, stage = ?, sales_type = ?, bd = ?, dl = ?, dl_key = ?,
                pm = ?, account_name = ?, project_name = ?, project_type = ?, update_date = ?
            WHERE id = ?
            "#,
        )
        .bind(entry.probability)
        .bind(entry.stage.label())
        .bind(entry.sales_type.code())
        .bind(&entry.bd)
        .bind(&entry.dl)
        .bind(entry.owner_key())
        .bind(&entry.pm)
        .bind(&entry.account_name)
        .bind(&entry.project_name)
        .bind(entry.project_type.to_string())
        .bind(entry.update_date)
        .bind(&entry.id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn write_months(
        tx: &mut Transaction<'_, MySql>,
        entry: &RevenueEntry,
    ) -> Result<()> {
        sqlx::query("DELETE FROM revenue_entry_months WHERE entry_id = ?")
            .bind(&entry.id)
            .execute(&mut **tx)
            .await?;

        for (month, revenue) in &entry.monthly_revenues {
            sqlx::query(
                r#"
                INSERT INTO revenue_entry_months (entry_id, month, estimated, actual)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(&entry.id)
            .bind(month.index() as u8)
            .bind(revenue.estimated)
            .bind(revenue.actual)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl EntryRepository for MySqlEntryRepository {
    async fn list(&self, scope: &AccessScope) -> Result<Vec<RevenueEntry>> {
        let owner_key = scope.owner_key();

        let rows = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT id, probability, stage, sales_type, bd, dl, pm,
                   account_name, project_name, project_type, update_date
            FROM revenue_entries
            WHERE ? IS NULL OR dl_key = ?
            ORDER BY created_at, id
            "#,
        )
        .bind(owner_key)
        .bind(owner_key)
        .fetch_all(&self.pool)
        .await?;

        let month_rows = sqlx::query_as::<_, MonthRow>(
            r#"
            SELECT m.entry_id, m.month, m.estimated, m.actual
            FROM revenue_entry_months m
            JOIN revenue_entries e ON e.id = m.entry_id
            WHERE ? IS NULL OR e.dl_key = ?
            "#,
        )
        .bind(owner_key)
        .bind(owner_key)
        .fetch_all(&self.pool)
        .await?;

        let mut months = group_months(month_rows)?;

        rows.into_iter()
            .map(|row| {
                let monthly = months.remove(&row.id).unwrap_or_default();
                row.into_entry(monthly)
            })
            .collect()
    }

    async fn find_by_id(&self, id: &str, scope: &AccessScope) -> Result<Option<RevenueEntry>> {
        let owner_key = scope.owner_key();

        let row = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT id, probability, stage, sales_type, bd, dl, pm,
                   account_name, project_name, project_type, update_date
            FROM revenue_entries
            WHERE id = ? AND (? IS NULL OR dl_key = ?)
            "#,
        )
        .bind(id)
        .bind(owner_key)
        .bind(owner_key)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let month_rows = sqlx::query_as::<_, MonthRow>(
            r#"
            SELECT entry_id, month, estimated, actual
            FROM revenue_entry_months
            WHERE entry_id = ?
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let monthly = group_months(month_rows)?.remove(id).unwrap_or_default();
        Ok(Some(row.into_entry(monthly)?))
    }

    async fn create(&self, entry: &RevenueEntry) -> Result<RevenueEntry> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO revenue_entries (
                id, probability, stage, sales_type, bd, dl, dl_key, pm,
                account_name, project_name, project_type, update_date
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(entry.probability)
        .bind(entry.stage.label())
        .bind(entry.sales_type.code())
        .bind(&entry.bd)
        .bind(&entry.dl)
        .bind(entry.owner_key())
        .bind(&entry.pm)
        .bind(&entry.account_name)
        .bind(&entry.project_name)
        .bind(entry.project_type.to_string())
        .bind(entry.update_date)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::conflict(format!("Entry '{}' already exists", entry.id));
                }
            }
            AppError::Database(e)
        })?;

        Self::write_months(&mut tx, entry).await?;
        tx.commit().await?;

        Ok(entry.clone())
    }

    async fn update(&self, entry: &RevenueEntry) -> Result<RevenueEntry> {
        let mut tx = self.pool.begin().await?;

        Self::write_fields(&mut tx, entry).await?;
        Self::write_months(&mut tx, entry).await?;
        tx.commit().await?;

        Ok(entry.clone())
    }

    async fn modify(
        &self,
        id: &str,
        scope: &AccessScope,
        edit: &(dyn for<'e> Fn(&'e mut RevenueEntry) -> Result<()> + Send + Sync),
    ) -> Result<Option<RevenueEntry>> {
        let owner_key = scope.owner_key();
        let mut tx = self.pool.begin().await?;

        // row lock serializes concurrent edits of the same entry
        let row = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT id, probability, stage, sales_type, bd, dl, pm,
                   account_name, project_name, project_type, update_date
            FROM revenue_entries
            WHERE id = ? AND (? IS NULL OR dl_key = ?)
            FOR UPDATE
            "#,
        )
        .bind(id)
        .bind(owner_key)
        .bind(owner_key)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let month_rows = sqlx::query_as::<_, MonthRow>(
            r#"
            SELECT entry_id, month, estimated, actual
            FROM revenue_entry_months
            WHERE entry_id = ?
            "#,
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let monthly = group_months(month_rows)?.remove(id).unwrap_or_default();
        let mut entry = row.into_entry(monthly)?;
        edit(&mut entry)?;

        Self::write_fields(&mut tx, &entry).await?;
        Self::write_months(&mut tx, &entry).await?;
        tx.commit().await?;

        Ok(Some(entry))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM revenue_entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_account_names(&self, scope: &AccessScope) -> Result<Vec<String>> {
        let owner_key = scope.owner_key();

        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT account_name
            FROM revenue_entries
            WHERE ? IS NULL OR dl_key = ?
            ORDER BY account_name
            "#,
        )
        .bind(owner_key)
        .bind(owner_key)
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Process-local entry store, insertion ordered
#[derive(Default)]
pub struct InMemoryEntryRepository {
    entries: RwLock<Vec<RevenueEntry>>,
}

impl InMemoryEntryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntryRepository for InMemoryEntryRepository {
    async fn list(&self, scope: &AccessScope) -> Result<Vec<RevenueEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.iter().filter(|e| scope.permits(e)).cloned().collect())
    }

    async fn find_by_id(&self, id: &str, scope: &AccessScope) -> Result<Option<RevenueEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .find(|e| e.id == id && scope.permits(e))
            .cloned())
    }

    async fn create(&self, entry: &RevenueEntry) -> Result<RevenueEntry> {
        let mut entries = self.entries.write().await;
        if entries.iter().any(|e| e.id == entry.id) {
            return Err(AppError::conflict(format!("Entry '{}' already exists", entry.id)));
        }
        entries.push(entry.clone());
        Ok(entry.clone())
    }

    async fn update(&self, entry: &RevenueEntry) -> Result<RevenueEntry> {
        let mut entries = self.entries.write().await;
        let slot = entries
            .iter_mut()
            .find(|e| e.id == entry.id)
            .ok_or_else(|| AppError::not_found(format!("Revenue entry '{}'", entry.id)))?;
        *slot = entry.clone();
        Ok(entry.clone())
    }

    async fn modify(
        &self,
        id: &str,
        scope: &AccessScope,
        edit: &(dyn for<'e> Fn(&'e mut RevenueEntry) -> Result<()> + Send + Sync),
    ) -> Result<Option<RevenueEntry>> {
        let mut entries = self.entries.write().await;
        let Some(slot) = entries.iter_mut().find(|e| e.id == id && scope.permits(e)) else {
            return Ok(None);
        };

        let mut entry = slot.clone();
        edit(&mut entry)?;
        *slot = entry.clone();

        Ok(Some(entry))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        Ok(entries.len() < before)
    }

    async fn list_account_names(&self, scope: &AccessScope) -> Result<Vec<String>> {
        let entries = self.entries.read().await;
        let names: BTreeSet<String> = entries
            .iter()
            .filter(|e| scope.permits(e))
            .map(|e| e.account_name.clone())
            .collect();
        Ok(names.into_iter().collect())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
