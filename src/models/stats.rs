use serde::{Deserialize, Serialize};

/// Yearly aggregate for one station, in decimal units.
///
/// Temperatures are stored-tenths averaged then divided by 10;
/// precipitation is stored-tenths summed then divided by 100. The
/// divisors differ on purpose. An aggregate over no present values is
/// `None`, not zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StationYearStats {
    pub station_id: String,
    pub year: i32,
    pub avg_max_temp: Option<f64>,
    pub avg_min_temp: Option<f64>,
    pub total_precipitation: Option<f64>,
}

impl StationYearStats {
    pub fn new(
        station_id: String,
        year: i32,
        avg_max_temp: Option<f64>,
        avg_min_temp: Option<f64>,
        total_precipitation: Option<f64>,
    ) -> Self {
        Self {
            station_id,
            year,
            avg_max_temp,
            avg_min_temp,
            total_precipitation,
        }
    }
}
