//! Local preview of registered-job schedules.
//!
//! Schedules use six fields: second, minute, hour, day-of-month, month, day-of-week.

use chrono::{DateTime, Utc};
use cron::Schedule;
use std::str::FromStr;

const FIELD_COUNT: usize = 6;

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("failed to parse cron schedule '{expr}': expected 6 fields, got {found}")]
    FieldCount { expr: String, found: usize },
    #[error("failed to parse cron schedule '{expr}': {reason}")]
    Invalid { expr: String, reason: String },
    #[error("cron schedule '{0}' never fires again")]
    Exhausted(String),
}

fn parse(expr: &str) -> Result<Schedule, ScheduleError> {
    let fields: Vec<&str> = expr.split_whitespace().collect();
    if fields.len() != FIELD_COUNT {
        return Err(ScheduleError::FieldCount {
            expr: expr.to_string(),
            found: fields.len(),
        });
    }
    let invalid = |reason: String| ScheduleError::Invalid {
        expr: expr.to_string(),
        reason,
    };
    let day_of_week = shift_day_of_week(fields[FIELD_COUNT - 1]).map_err(invalid)?;
    let normalized = format!("{} {day_of_week}", fields[..FIELD_COUNT - 1].join(" "));
    Schedule::from_str(&normalized).map_err(|e| invalid(e.to_string()))
}

/// Day-of-week numbers are 0-6 with 0 = Sunday; the parser counts 1-7 from Sunday.
/// Shifts every numeric bound in lists and ranges; steps and names pass through.
fn shift_day_of_week(field: &str) -> Result<String, String> {
    let items = field
        .split(',')
        .map(|item| -> Result<String, String> {
            let (range, step) = match item.split_once('/') {
                Some((range, step)) => (range, Some(step)),
                None => (item, None),
            };
            let bounds = range
                .split('-')
                .map(|bound| match bound.parse::<u8>() {
                    Ok(day) if day <= 6 => Ok((day + 1).to_string()),
                    Ok(day) => Err(format!("day of week {day} out of range 0-6")),
                    Err(_) => Ok(bound.to_string()),
                })
                .collect::<Result<Vec<_>, _>>()?;
            let mut shifted = bounds.join("-");
            if let Some(step) = step {
                shifted.push('/');
                shifted.push_str(step);
            }
            Ok(shifted)
        })
        .collect::<Result<Vec<_>, String>>()?;
    Ok(items.join(","))
}

/// Next time `expr` fires strictly after `after`.
pub fn next_run_after(expr: &str, after: DateTime<Utc>) -> Result<DateTime<Utc>, ScheduleError> {
    parse(expr)?
        .after(&after)
        .next()
        .ok_or_else(|| ScheduleError::Exhausted(expr.to_string()))
}

/// Next time `expr` fires from now.
pub fn next_run_time(expr: &str) -> Result<DateTime<Utc>, ScheduleError> {
    next_run_after(expr, Utc::now())
}
