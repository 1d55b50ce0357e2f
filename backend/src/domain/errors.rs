use shared::{
    MAX_AMOUNT_ML, MAX_GOAL_ML, MAX_QUICK_ADDS, MIN_AMOUNT_ML, MIN_GOAL_ML, MIN_QUICK_ADDS,
};

/// A documented input constraint was violated. Always recoverable; the
/// message names the rule and the limit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Amount must be at least {}ml", MIN_AMOUNT_ML)]
    AmountTooSmall,
    #[error("Amount cannot exceed {}ml", MAX_AMOUNT_ML)]
    AmountTooLarge,
    #[error("Goal must be at least {}ml", MIN_GOAL_ML)]
    GoalTooSmall,
    #[error("Goal cannot exceed {}ml", MAX_GOAL_ML)]
    GoalTooLarge,
    #[error("Timestamp too far in the past")]
    TimestampTooOld,
    #[error("Timestamp cannot be in the future")]
    TimestampInFuture,
    #[error("Quick adds must have {}-{} values", MIN_QUICK_ADDS, MAX_QUICK_ADDS)]
    QuickAddsLength,
    #[error("Quick adds cannot have duplicates")]
    QuickAddsDuplicate,
    #[error("Entry must have a valid ID")]
    MissingEntryId,
}

/// Uniform failure type for every storage adapter operation.
///
/// - `Validation` is recoverable; the caller fixes the input.
/// - `NotFound` is non-fatal; the referenced entry may already be gone.
/// - `Storage` is transient by default; the caller reloads to reconcile the
///   in-memory view with what is actually persisted.
#[derive(Debug, thiserror::Error)]
pub enum WaterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Entry not found: {0}")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl WaterError {
    /// Wrap an underlying store failure, passing its message through
    pub(crate) fn storage(err: anyhow::Error) -> Self {
        WaterError::Storage(err.to_string())
    }
}
