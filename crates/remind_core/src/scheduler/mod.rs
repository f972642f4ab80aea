//! Pure reminder-scheduling logic. Stateless between calls: all task state
//! lives in the store, all pending notifications in the spool.

use crate::error::AppError;
use crate::model::ReminderRequest;
use time::format_description::well_known::Rfc3339;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time};

mod picker;

pub use picker::{DueDatePicker, PickerState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleDecision {
    Schedule(ReminderRequest),
    TooLate,
}

/// Parse a free-text lead-time field into minutes.
///
/// The value must be a finite number; anything else (including literal
/// "inf"/"NaN" spellings, which `f64::from_str` would otherwise accept) is a
/// validation failure and no scheduling attempt is made.
pub fn parse_lead_minutes(raw: &str) -> Result<f64, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("lead minutes are required"));
    }

    let minutes: f64 = trimmed
        .parse()
        .map_err(|_| AppError::invalid_input("lead minutes must be a number"))?;
    if !minutes.is_finite() {
        return Err(AppError::invalid_input(
            "lead minutes must be a finite number",
        ));
    }

    Ok(minutes)
}

/// Subtract the lead time from the due instant. No rounding beyond the
/// precision of the inputs themselves. Leads too large to represent saturate
/// to the edge of the supported datetime range, so a huge positive lead reads
/// as far in the past instead of overflowing.
pub fn compute_fire_time(
    due_at: OffsetDateTime,
    lead_raw: &str,
) -> Result<OffsetDateTime, AppError> {
    let minutes = parse_lead_minutes(lead_raw)?;
    let seconds = minutes * 60.0;
    if seconds.abs() >= i64::MAX as f64 {
        return Ok(saturated_fire_time(seconds > 0.0));
    }

    let lead = Duration::seconds_f64(seconds);
    Ok(due_at
        .checked_sub(lead)
        .unwrap_or_else(|| saturated_fire_time(lead.is_positive())))
}

fn saturated_fire_time(past: bool) -> OffsetDateTime {
    if past {
        PrimitiveDateTime::MIN.assume_utc()
    } else {
        PrimitiveDateTime::MAX.assume_utc()
    }
}

/// Decide whether a reminder can still be scheduled. The fire time must be
/// strictly in the future; `fire_at == now` is already too late.
pub fn decide_schedule(
    task_id: &str,
    message: &str,
    fire_at: OffsetDateTime,
    now: OffsetDateTime,
) -> Result<ScheduleDecision, AppError> {
    if fire_at <= now {
        return Ok(ScheduleDecision::TooLate);
    }

    let fire_at = fire_at
        .format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;

    Ok(ScheduleDecision::Schedule(ReminderRequest {
        task_id: task_id.to_string(),
        fire_at,
        message: message.to_string(),
    }))
}

/// Combine a calendar date with a clock time into one timestamp. Seconds and
/// sub-seconds are normalized to zero, so merging is idempotent on the time
/// component.
pub fn merge_date_and_time(date: Date, time: Time) -> Result<PrimitiveDateTime, AppError> {
    date.with_hms(time.hour(), time.minute(), 0)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}
