//! In-memory view-model synchronized with the storage adapter.
//!
//! [`WaterTracker`] holds the projection the UI renders from: today's
//! entries (most recent first), the goal and the quick-add list. Every
//! mutation follows the same three-phase protocol: apply the projected delta
//! in memory, issue the durable operation, and on failure run a
//! [`Compensation`] - either the inverse delta (for add) or a full reload
//! from storage (for update/delete/goal). The error is surfaced to the
//! caller only after the projection is consistent again.

use chrono::{Local, Utc};
use tracing::warn;
use uuid::Uuid;

use shared::{
    DailyGoal, DailyStats, QuickAddSettings, WaterEntry, WaterEntryFilters, DAILY_GOAL_ID,
    DEFAULT_DAILY_GOAL_ML, DEFAULT_QUICK_ADDS_ML,
};

use crate::domain::{WaterError, WaterStorage};

/// How to repair the in-memory projection after a failed durable operation
enum Compensation {
    /// Remove the optimistically added entry by id
    RemoveEntry(String),
    /// Re-fetch today's entries from storage
    ReloadEntries,
    /// Re-fetch the goal from storage
    ReloadGoal,
    /// Re-fetch the quick-add list from storage
    ReloadQuickAdds,
}

/// State reconciler for one UI session
pub struct WaterTracker<S: WaterStorage> {
    storage: S,
    entries: Vec<WaterEntry>,
    goal: DailyGoal,
    quick_adds: Vec<i64>,
    loading: bool,
}

impl<S: WaterStorage> WaterTracker<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            entries: Vec::new(),
            goal: DailyGoal {
                id: DAILY_GOAL_ID.to_string(),
                goal_ml: DEFAULT_DAILY_GOAL_ML,
                updated_at: Utc::now().timestamp_millis(),
            },
            quick_adds: DEFAULT_QUICK_ADDS_ML.to_vec(),
            loading: true,
        }
    }

    /// Today's entries, most recent first
    pub fn entries(&self) -> &[WaterEntry] {
        &self.entries
    }

    pub fn goal(&self) -> &DailyGoal {
        &self.goal
    }

    pub fn quick_adds(&self) -> &[i64] {
        &self.quick_adds
    }

    /// True until the initial load has resolved
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Fetch today's entries, the goal and the quick-add list.
    ///
    /// All three fetches are attempted regardless of individual failures;
    /// loading completes either way and the first error is returned.
    pub async fn load_initial_data(&mut self) -> Result<(), WaterError> {
        self.loading = true;

        let entries = self.storage.get_entries(Some(today_filters())).await;
        let goal = self.storage.get_goal().await;
        let quick_adds = self.storage.get_quick_adds().await;

        self.loading = false;

        let mut first_error = None;
        match entries {
            Ok(entries) => self.entries = entries,
            Err(e) => first_error = first_error.or(Some(e)),
        }
        match goal {
            Ok(goal) => self.goal = goal,
            Err(e) => first_error = first_error.or(Some(e)),
        }
        match quick_adds {
            Ok(quick_adds) => self.quick_adds = quick_adds.values,
            Err(e) => first_error = first_error.or(Some(e)),
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Log a new consumption event of `amount` millilitres.
    ///
    /// The synthesized entry is prepended immediately; a failed persist
    /// removes it again before the error is returned. On success the
    /// optimistic copy is already correct since the id is client-generated.
    pub async fn add_entry(&mut self, amount: i64) -> Result<WaterEntry, WaterError> {
        let now = Utc::now().timestamp_millis();
        let entry = WaterEntry {
            id: Uuid::new_v4().to_string(),
            amount,
            timestamp: now,
            created_at: now,
            updated_at: None,
        };

        self.entries.insert(0, entry.clone());

        let outcome = self.storage.add_entry(entry.clone()).await;
        self.reconcile(outcome, Compensation::RemoveEntry(entry.id))
            .await
    }

    /// Change an entry's amount. A failed persist reloads the whole day from
    /// storage rather than undoing field by field.
    pub async fn update_entry(&mut self, id: &str, amount: i64) -> Result<WaterEntry, WaterError> {
        let now = Utc::now().timestamp_millis();
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.amount = amount;
            entry.updated_at = Some(now);
        }

        let outcome = self.storage.update_entry(id, amount).await;
        self.reconcile(outcome, Compensation::ReloadEntries).await
    }

    /// Remove an entry. A failed persist reloads the whole day from storage.
    pub async fn delete_entry(&mut self, id: &str) -> Result<(), WaterError> {
        self.entries.retain(|e| e.id != id);

        let outcome = self.storage.delete_entry(id).await;
        self.reconcile(outcome, Compensation::ReloadEntries).await
    }

    /// Change the daily goal. A failed persist reloads the goal from storage.
    pub async fn update_goal(&mut self, goal_ml: i64) -> Result<DailyGoal, WaterError> {
        self.goal.goal_ml = goal_ml;
        self.goal.updated_at = Utc::now().timestamp_millis();

        let outcome = self.storage.set_goal(goal_ml).await;
        self.reconcile(outcome, Compensation::ReloadGoal).await
    }

    /// Replace the quick-add list. A failed persist reloads it from storage.
    pub async fn update_quick_adds(
        &mut self,
        values: Vec<i64>,
    ) -> Result<QuickAddSettings, WaterError> {
        self.quick_adds = values.clone();

        let outcome = self.storage.set_quick_adds(&values).await;
        self.reconcile(outcome, Compensation::ReloadQuickAdds).await
    }

    /// Aggregate progress computed from the current projection
    pub fn stats(&self) -> DailyStats {
        let total_ml: i64 = self.entries.iter().map(|e| e.amount).sum();
        let goal_ml = self.goal.goal_ml;
        let percentage = if goal_ml > 0 {
            (total_ml as f64 * 100.0 / goal_ml as f64).min(100.0)
        } else {
            0.0
        };

        DailyStats {
            date: Local::now().format("%Y-%m-%d").to_string(),
            total_ml,
            goal_ml,
            percentage,
            entries_count: self.entries.len(),
            goal_achieved: total_ml >= goal_ml,
        }
    }

    /// Phase three of the optimistic protocol: on failure, repair the
    /// projection with the operation's compensation, then surface the error.
    ///
    /// A failed compensation reload leaves the projection as-is; the next
    /// successful reload reconverges it with storage.
    async fn reconcile<T>(
        &mut self,
        outcome: Result<T, WaterError>,
        compensation: Compensation,
    ) -> Result<T, WaterError> {
        let err = match outcome {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        match compensation {
            Compensation::RemoveEntry(id) => {
                self.entries.retain(|e| e.id != id);
            }
            Compensation::ReloadEntries => {
                match self.storage.get_entries(Some(today_filters())).await {
                    Ok(entries) => self.entries = entries,
                    Err(reload_err) => {
                        warn!("failed to reload entries after error: {}", reload_err)
                    }
                }
            }
            Compensation::ReloadGoal => match self.storage.get_goal().await {
                Ok(goal) => self.goal = goal,
                Err(reload_err) => warn!("failed to reload goal after error: {}", reload_err),
            },
            Compensation::ReloadQuickAdds => match self.storage.get_quick_adds().await {
                Ok(quick_adds) => self.quick_adds = quick_adds.values,
                Err(reload_err) => {
                    warn!("failed to reload quick adds after error: {}", reload_err)
                }
            },
        }

        Err(err)
    }
}

/// Inclusive filter covering the current local day
fn today_filters() -> WaterEntryFilters {
    let (start, end) = local_day_bounds();
    WaterEntryFilters {
        start_date: Some(start),
        end_date: Some(end),
        ..Default::default()
    }
}

fn local_day_bounds() -> (i64, i64) {
    let now = Local::now();
    let date = now.date_naive();
    let start = date
        .and_hms_opt(0, 0, 0)
        .and_then(|dt| dt.and_local_timezone(Local).earliest())
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| now.timestamp_millis());
    let end = date
        .and_hms_milli_opt(23, 59, 59, 999)
        .and_then(|dt| dt.and_local_timezone(Local).latest())
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| now.timestamp_millis());
    (start, end)
}
