//! Pure validation functions for amounts, goals, timestamps and quick-add
//! lists.
//!
//! Each function either returns the accepted value or a [`ValidationError`]
//! naming the violated rule; none of them panic. The timestamp window is
//! evaluated against the clock at call time, so two calls a day apart accept
//! different ranges.

use std::collections::HashSet;

use chrono::Utc;
use shared::{
    WaterEntry, MAX_AMOUNT_ML, MAX_GOAL_ML, MAX_QUICK_ADDS, MAX_TIMESTAMP_AGE_MS,
    MAX_TIMESTAMP_SKEW_MS, MIN_AMOUNT_ML, MIN_GOAL_ML, MIN_QUICK_ADDS,
};

use crate::domain::errors::ValidationError;

/// Validate a single entry amount in millilitres
pub fn validate_amount(amount: i64) -> Result<i64, ValidationError> {
    if amount < MIN_AMOUNT_ML {
        return Err(ValidationError::AmountTooSmall);
    }
    if amount > MAX_AMOUNT_ML {
        return Err(ValidationError::AmountTooLarge);
    }
    Ok(amount)
}

/// Validate a daily goal in millilitres
pub fn validate_goal(goal_ml: i64) -> Result<i64, ValidationError> {
    if goal_ml < MIN_GOAL_ML {
        return Err(ValidationError::GoalTooSmall);
    }
    if goal_ml > MAX_GOAL_ML {
        return Err(ValidationError::GoalTooLarge);
    }
    Ok(goal_ml)
}

/// Validate an event timestamp against a bounded past/future window.
///
/// Accepts anything between 24 hours in the past and 60 seconds in the
/// future (clock-skew tolerance), both relative to now.
pub fn validate_timestamp(timestamp: i64) -> Result<i64, ValidationError> {
    let now = Utc::now().timestamp_millis();
    if timestamp < now - MAX_TIMESTAMP_AGE_MS {
        return Err(ValidationError::TimestampTooOld);
    }
    if timestamp > now + MAX_TIMESTAMP_SKEW_MS {
        return Err(ValidationError::TimestampInFuture);
    }
    Ok(timestamp)
}

/// Validate a quick-add list: 1-5 values, each amount-valid, no duplicates.
///
/// Each element is range-checked first; the duplicate check runs over the
/// validated list. Element order is preserved.
pub fn validate_quick_adds(values: &[i64]) -> Result<Vec<i64>, ValidationError> {
    if values.len() < MIN_QUICK_ADDS || values.len() > MAX_QUICK_ADDS {
        return Err(ValidationError::QuickAddsLength);
    }

    let mut validated = Vec::with_capacity(values.len());
    for value in values {
        validated.push(validate_amount(*value)?);
    }

    let unique: HashSet<i64> = validated.iter().copied().collect();
    if unique.len() != validated.len() {
        return Err(ValidationError::QuickAddsDuplicate);
    }

    Ok(validated)
}

/// Composite structural check for a full entry.
///
/// Requires a non-empty id, a valid amount and a valid timestamp;
/// `updated_at` passes through untouched.
pub fn validate_water_entry(entry: &WaterEntry) -> Result<WaterEntry, ValidationError> {
    if entry.id.trim().is_empty() {
        return Err(ValidationError::MissingEntryId);
    }

    let amount = validate_amount(entry.amount)?;
    let timestamp = validate_timestamp(entry.timestamp)?;

    Ok(WaterEntry {
        id: entry.id.clone(),
        amount,
        timestamp,
        created_at: entry.created_at,
        updated_at: entry.updated_at,
    })
}
