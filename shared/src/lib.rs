use serde::{Deserialize, Serialize};

/// Minimum accepted amount for a single entry, in millilitres.
pub const MIN_AMOUNT_ML: i64 = 1;
/// Maximum accepted amount for a single entry, in millilitres.
pub const MAX_AMOUNT_ML: i64 = 5000;
/// Minimum accepted daily goal, in millilitres.
pub const MIN_GOAL_ML: i64 = 500;
/// Maximum accepted daily goal, in millilitres.
pub const MAX_GOAL_ML: i64 = 5000;

/// Minimum number of configured quick-add values.
pub const MIN_QUICK_ADDS: usize = 1;
/// Maximum number of configured quick-add values.
pub const MAX_QUICK_ADDS: usize = 5;

/// Goal used when no goal record has ever been written.
pub const DEFAULT_DAILY_GOAL_ML: i64 = 2500;
/// Quick-add values used when no quick-add record has ever been written.
pub const DEFAULT_QUICK_ADDS_ML: [i64; 3] = [250, 500, 1000];

/// Singleton settings key for the daily goal record.
pub const DAILY_GOAL_ID: &str = "daily-goal";
/// Singleton settings key for the quick-add record.
pub const QUICK_ADDS_ID: &str = "quick-adds";

/// Oldest accepted entry timestamp, relative to validation time.
pub const MAX_TIMESTAMP_AGE_MS: i64 = 24 * 60 * 60 * 1000;
/// Clock-skew tolerance for entry timestamps slightly in the future.
pub const MAX_TIMESTAMP_SKEW_MS: i64 = 60 * 1000;

/// One logged water-consumption event.
///
/// `timestamp` is the moment the water was drunk; `created_at` is the moment
/// the record was created. They usually coincide but only `amount` and
/// `updated_at` ever change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterEntry {
    /// UUID v4, generated by the client at creation time
    pub id: String,
    /// Amount in millilitres
    pub amount: i64,
    /// Event time, epoch milliseconds
    pub timestamp: i64,
    /// Record creation time, epoch milliseconds; immutable
    pub created_at: i64,
    /// Set on every edit, epoch milliseconds
    pub updated_at: Option<i64>,
}

/// Daily consumption target. Singleton record keyed by [`DAILY_GOAL_ID`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyGoal {
    pub id: String,
    /// Target in millilitres
    pub goal_ml: i64,
    /// Refreshed on every write, epoch milliseconds
    pub updated_at: i64,
}

/// Configured preset amounts. Singleton record keyed by [`QUICK_ADDS_ID`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickAddSettings {
    pub id: String,
    /// Ordered, distinct amounts in millilitres (1-5 of them)
    pub values: Vec<i64>,
    /// Refreshed on every write, epoch milliseconds
    pub updated_at: i64,
}

/// Aggregate progress for one day. Derived on every read, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    /// Local date, "YYYY-MM-DD"
    pub date: String,
    /// Sum of entry amounts in millilitres
    pub total_ml: i64,
    /// Goal in effect when the stats were computed
    pub goal_ml: i64,
    /// total / goal as a percentage, capped at 100
    pub percentage: f64,
    /// Number of entries contributing to the total
    pub entries_count: usize,
    /// Whether the total meets or exceeds the goal
    pub goal_achieved: bool,
}

/// Filters applied when listing entries.
///
/// Filtering, sorting (most recent first) and pagination are applied in that
/// fixed order. Range bounds are inclusive epoch milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaterEntryFilters {
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}
