//! Field validation for create and update input.
//!
//! Pure checks with no side effects. Violations are reported in a fixed
//! order (message length, source length, timestamp) and the first one wins,
//! so a payload with several problems gets a single deterministic error.

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::model::LogPatch;

const MESSAGE_MIN: usize = 3;
const MESSAGE_MAX: usize = 5000;
const SOURCE_MIN: usize = 2;
const SOURCE_MAX: usize = 255;

/// Validates creation input.
///
/// `now` is the reference instant for the future-timestamp check; handlers
/// pass `Utc::now()`.
pub fn validate_create(
    message: &str,
    source: &str,
    timestamp: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<()> {
    check_message(message)?;
    check_source(source)?;
    if let Some(ts) = timestamp {
        check_timestamp(ts, now)?;
    }
    Ok(())
}

/// Validates a partial update.
///
/// Identical bounds to creation, applied only to fields present in the
/// patch.
pub fn validate_patch(patch: &LogPatch, now: DateTime<Utc>) -> Result<()> {
    if let Some(message) = &patch.message {
        check_message(message)?;
    }
    if let Some(source) = &patch.source {
        check_source(source)?;
    }
    if let Some(ts) = patch.timestamp {
        check_timestamp(ts, now)?;
    }
    Ok(())
}

fn check_message(message: &str) -> Result<()> {
    if message.trim().chars().count() < MESSAGE_MIN {
        return Err(Error::validation("Message must be at least 3 characters"));
    }
    if message.chars().count() > MESSAGE_MAX {
        return Err(Error::validation(
            "Message must not exceed 5000 characters",
        ));
    }
    Ok(())
}

fn check_source(source: &str) -> Result<()> {
    if source.trim().chars().count() < SOURCE_MIN {
        return Err(Error::validation("Source must be at least 2 characters"));
    }
    if source.chars().count() > SOURCE_MAX {
        return Err(Error::validation("Source must not exceed 255 characters"));
    }
    Ok(())
}

fn check_timestamp(ts: DateTime<Utc>, now: DateTime<Utc>) -> Result<()> {
    if ts > now {
        return Err(Error::validation("Timestamp cannot be in the future"));
    }
    Ok(())
}
