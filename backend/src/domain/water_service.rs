//! Storage adapter for the water tracker.
//!
//! [`WaterStorage`] is the nine-operation API consumed by the state
//! reconciler; [`WaterService`] is its SQLite-backed implementation and the
//! only component that calls the repositories. Every write path runs the
//! validators first and short-circuits with a [`WaterError`] before touching
//! storage.

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use shared::{
    DailyGoal, QuickAddSettings, WaterEntry, WaterEntryFilters, DAILY_GOAL_ID,
    DEFAULT_DAILY_GOAL_ML, DEFAULT_QUICK_ADDS_ML, QUICK_ADDS_ID,
};

use crate::domain::errors::WaterError;
use crate::domain::validation::{
    validate_amount, validate_goal, validate_quick_adds, validate_water_entry,
};
use crate::storage::{DbConnection, EntryRepository, SettingsRepository};

/// The storage adapter API.
///
/// All operations return a structured result and never panic. Implementations
/// other than [`WaterService`] exist only for tests.
#[async_trait]
pub trait WaterStorage: Send + Sync {
    /// Validate and persist a new entry, returning the validated record
    async fn add_entry(&self, entry: WaterEntry) -> Result<WaterEntry, WaterError>;

    /// List entries most recent first, optionally range-filtered and paginated
    async fn get_entries(
        &self,
        filters: Option<WaterEntryFilters>,
    ) -> Result<Vec<WaterEntry>, WaterError>;

    /// Replace an entry's amount and refresh its `updated_at`
    async fn update_entry(&self, id: &str, amount: i64) -> Result<WaterEntry, WaterError>;

    /// Delete an entry. Deleting a nonexistent id is not an error.
    async fn delete_entry(&self, id: &str) -> Result<(), WaterError>;

    /// Read the goal, falling back to the documented default if none is persisted
    async fn get_goal(&self) -> Result<DailyGoal, WaterError>;

    /// Validate and upsert the goal with a refreshed `updated_at`
    async fn set_goal(&self, goal_ml: i64) -> Result<DailyGoal, WaterError>;

    /// Read the quick-add list, falling back to the documented default
    async fn get_quick_adds(&self) -> Result<QuickAddSettings, WaterError>;

    /// Validate and upsert the quick-add list with a refreshed `updated_at`
    async fn set_quick_adds(&self, values: &[i64]) -> Result<QuickAddSettings, WaterError>;

    /// Empty both collections. Used for resets and tests.
    async fn clear_all(&self) -> Result<(), WaterError>;
}

/// SQLite-backed [`WaterStorage`] implementation
#[derive(Clone)]
pub struct WaterService {
    entry_repository: EntryRepository,
    settings_repository: SettingsRepository,
}

impl WaterService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            entry_repository: EntryRepository::new(db.clone()),
            settings_repository: SettingsRepository::new(db),
        }
    }

    async fn get_settings_record<T: serde::de::DeserializeOwned>(
        &self,
        id: &str,
    ) -> Result<Option<T>, WaterError> {
        let raw = self
            .settings_repository
            .get_setting(id)
            .await
            .map_err(WaterError::storage)?;
        match raw {
            Some(json) => {
                let record = serde_json::from_str(&json)
                    .map_err(|e| WaterError::storage(anyhow!("corrupt {} record: {}", id, e)))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn put_settings_record<T: serde::Serialize>(
        &self,
        id: &str,
        record: &T,
    ) -> Result<(), WaterError> {
        let json = serde_json::to_string(record).map_err(|e| WaterError::storage(anyhow!(e)))?;
        self.settings_repository
            .put_setting(id, &json)
            .await
            .map_err(WaterError::storage)
    }
}

#[async_trait]
impl WaterStorage for WaterService {
    async fn add_entry(&self, entry: WaterEntry) -> Result<WaterEntry, WaterError> {
        let validated = validate_water_entry(&entry)?;

        self.entry_repository
            .store_entry(&validated)
            .await
            .map_err(WaterError::storage)?;

        info!("added entry {} ({}ml)", validated.id, validated.amount);
        Ok(validated)
    }

    async fn get_entries(
        &self,
        filters: Option<WaterEntryFilters>,
    ) -> Result<Vec<WaterEntry>, WaterError> {
        let filters = filters.unwrap_or_default();
        self.entry_repository
            .list_entries(&filters)
            .await
            .map_err(WaterError::storage)
    }

    async fn update_entry(&self, id: &str, amount: i64) -> Result<WaterEntry, WaterError> {
        let amount = validate_amount(amount)?;

        let entry = self
            .entry_repository
            .get_entry(id)
            .await
            .map_err(WaterError::storage)?;
        let mut entry = match entry {
            Some(entry) => entry,
            None => return Err(WaterError::NotFound(id.to_string())),
        };

        entry.amount = amount;
        entry.updated_at = Some(Utc::now().timestamp_millis());

        self.entry_repository
            .update_entry(&entry)
            .await
            .map_err(WaterError::storage)?;

        info!("updated entry {} to {}ml", entry.id, entry.amount);
        Ok(entry)
    }

    async fn delete_entry(&self, id: &str) -> Result<(), WaterError> {
        let removed = self
            .entry_repository
            .delete_entry(id)
            .await
            .map_err(WaterError::storage)?;

        if removed {
            info!("deleted entry {}", id);
        }
        Ok(())
    }

    async fn get_goal(&self) -> Result<DailyGoal, WaterError> {
        let goal = self.get_settings_record::<DailyGoal>(DAILY_GOAL_ID).await?;
        Ok(goal.unwrap_or_else(|| DailyGoal {
            id: DAILY_GOAL_ID.to_string(),
            goal_ml: DEFAULT_DAILY_GOAL_ML,
            updated_at: Utc::now().timestamp_millis(),
        }))
    }

    async fn set_goal(&self, goal_ml: i64) -> Result<DailyGoal, WaterError> {
        let goal_ml = validate_goal(goal_ml)?;

        let goal = DailyGoal {
            id: DAILY_GOAL_ID.to_string(),
            goal_ml,
            updated_at: Utc::now().timestamp_millis(),
        };
        self.put_settings_record(DAILY_GOAL_ID, &goal).await?;

        info!("set daily goal to {}ml", goal.goal_ml);
        Ok(goal)
    }

    async fn get_quick_adds(&self) -> Result<QuickAddSettings, WaterError> {
        let quick_adds = self
            .get_settings_record::<QuickAddSettings>(QUICK_ADDS_ID)
            .await?;
        Ok(quick_adds.unwrap_or_else(|| QuickAddSettings {
            id: QUICK_ADDS_ID.to_string(),
            values: DEFAULT_QUICK_ADDS_ML.to_vec(),
            updated_at: Utc::now().timestamp_millis(),
        }))
    }

    async fn set_quick_adds(&self, values: &[i64]) -> Result<QuickAddSettings, WaterError> {
        let values = validate_quick_adds(values)?;

        let quick_adds = QuickAddSettings {
            id: QUICK_ADDS_ID.to_string(),
            values,
            updated_at: Utc::now().timestamp_millis(),
        };
        self.put_settings_record(QUICK_ADDS_ID, &quick_adds).await?;

        info!("set quick adds to {:?}", quick_adds.values);
        Ok(quick_adds)
    }

    async fn clear_all(&self) -> Result<(), WaterError> {
        self.entry_repository
            .clear()
            .await
            .map_err(WaterError::storage)?;
        self.settings_repository
            .clear()
            .await
            .map_err(WaterError::storage)?;

        info!("cleared all entries and settings");
        Ok(())
    }
}
