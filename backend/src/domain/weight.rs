//! Daily weight samples.

use chrono::NaiveDate;
use serde::Serialize;

use super::profile::WeightKg;

/// One weight reading for a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightSample {
    pub date: NaiveDate,
    pub weight: WeightKg,
}

impl WeightSample {
    /// Pair a weight with the day it was recorded.
    pub fn new(date: NaiveDate, weight: WeightKg) -> Self {
        Self { date, weight }
    }
}

/// Result of logging a weight for a day.
///
/// The first log of a day creates the sample; later logs for the same day
/// overwrite its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightLogOutcome {
    /// No sample existed for the day.
    Created,
    /// The day's sample was overwritten.
    Updated,
}
