//! Kitchen ETA validation.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::patch::OrderPatch;

/// Estimate rejected before any write.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateError {
    #[error("estimate must be at least one minute, got {0}")]
    NotPositive(i64),
    #[error("estimate of {0} minutes is out of range")]
    OutOfRange(i64),
}

/// Build the mutation that overwrites an order's estimate.
///
/// Any status is accepted; the previous estimate, if any, is replaced.
pub fn plan_estimate(minutes: i64, now: DateTime<Utc>) -> Result<OrderPatch, EstimateError> {
    if minutes < 1 {
        return Err(EstimateError::NotPositive(minutes));
    }
    let minutes = u32::try_from(minutes).map_err(|_| EstimateError::OutOfRange(minutes))?;

    Ok(OrderPatch {
        kitchen_estimated_time: Some(minutes),
        kitchen_response_timestamp: Some(now),
        ..OrderPatch::default()
    })
}
