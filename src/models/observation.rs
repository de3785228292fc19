use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::constants::{SENTINEL_MISSING, TENTHS_DIVISOR};

/// One raw daily reading from a station file.
///
/// Numeric fields are kept exactly as stored: integer tenths of a unit
/// (0.1°C for temperatures, 0.1mm for precipitation). An absent
/// measurement is `None`, never zero and never the source sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub station_id: String,
    pub date: NaiveDate,
    pub max_temp: Option<i32>,
    pub min_temp: Option<i32>,
    pub precipitation: Option<i32>,
}

impl ObservationRecord {
    pub fn new(
        station_id: String,
        date: NaiveDate,
        max_temp: Option<i32>,
        min_temp: Option<i32>,
        precipitation: Option<i32>,
    ) -> Self {
        Self {
            station_id,
            date,
            max_temp,
            min_temp,
            precipitation,
        }
    }

    pub fn has_any_measurement(&self) -> bool {
        self.max_temp.is_some() || self.min_temp.is_some() || self.precipitation.is_some()
    }
}

/// Map the source sentinel to an absent value.
///
/// This is the only place the -9999 encoding is interpreted; both the
/// parser and any future reader must go through it.
pub fn filter_sentinel(value: i32) -> Option<i32> {
    if value == SENTINEL_MISSING {
        None
    } else {
        Some(value)
    }
}

/// Rescale a stored tenths-of-unit value to decimal units.
pub fn tenths_to_units(tenths: i32) -> f64 {
    f64::from(tenths) / TENTHS_DIVISOR
}
