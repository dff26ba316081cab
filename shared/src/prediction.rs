//! Turning the service's month count into dates and display labels.

use chrono::{Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{PredictionError, ELAPSED_LABEL, MINUTES_PER_MONTH};

pub const TARGET_DATE_FORMAT: &str = "%m/%Y";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub months: f64,
    pub start_date: NaiveDate,
    pub target_date: NaiveDate,
}

impl PredictionResult {
    /// `target_date = start_date + months`, with `months` truncated toward
    /// zero.
    pub fn derive(months: f64, start_date: NaiveDate) -> Result<Self, PredictionError> {
        if !months.is_finite() {
            return Err(PredictionError::NonFinite);
        }

        let target_date = add_months(start_date, months).ok_or_else(|| {
            PredictionError::DateOutOfRange {
                start: start_date.to_string(),
                months,
            }
        })?;

        Ok(Self {
            months,
            start_date,
            target_date,
        })
    }

    #[must_use]
    pub fn is_past(&self, now: NaiveDateTime) -> bool {
        midnight(self.target_date) < now
    }

    #[must_use]
    pub fn remaining_label(&self, now: NaiveDateTime) -> String {
        match remaining_months(now, self.target_date) {
            Some(months) => month_phrase(months),
            None => ELAPSED_LABEL.to_string(),
        }
    }

    /// Always plural, whatever the count: "1 meses", "6.5 meses".
    #[must_use]
    pub fn total_duration_label(&self) -> String {
        format!("{} meses", self.months)
    }

    #[must_use]
    pub fn target_date_label(&self) -> String {
        self.target_date.format(TARGET_DATE_FORMAT).to_string()
    }
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Calendar-month addition. The day of month is kept where it exists and
/// clamped to the month's last day otherwise.
#[must_use]
pub fn add_months(start: NaiveDate, months: f64) -> Option<NaiveDate> {
    let whole = months.trunc();
    if !whole.is_finite() || whole.abs() > f64::from(u32::MAX) {
        return None;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = Months::new(whole.abs() as u32);

    if whole < 0.0 {
        start.checked_sub_months(count)
    } else {
        start.checked_add_months(count)
    }
}

/// Whole months from `now` until midnight of `target`, with 30-day months
/// rounded to the nearest unit. `None` once the target has passed.
#[must_use]
pub fn remaining_months(now: NaiveDateTime, target: NaiveDate) -> Option<f64> {
    let target = midnight(target);
    if target < now {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let minutes = (target - now).num_seconds() as f64 / 60.0;
    Some((minutes / MINUTES_PER_MONTH).round())
}

/// pt-BR month phrasing: "1 mês", "0 meses", "6 meses", "6.5 meses".
#[must_use]
pub fn month_phrase(months: f64) -> String {
    if (months - 1.0).abs() < f64::EPSILON {
        "1 mês".to_string()
    } else {
        format!("{months} meses")
    }
}

/// Reads the month count from a prediction response body. The service
/// answers with a bare JSON number; a string holding a number is tolerated.
pub fn parse_months(body: &[u8]) -> Result<f64, PredictionError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| PredictionError::MalformedResponse(e.to_string()))?;

    let months = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| PredictionError::MalformedResponse(value.to_string()))?;

    if months.is_finite() {
        Ok(months)
    } else {
        Err(PredictionError::NonFinite)
    }
}
