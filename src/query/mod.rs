//! Read-side pagination and filtering over both stores.
//!
//! This is the surface an API layer consumes. Raw observations come back
//! rescaled from stored tenths to decimal units; aggregated stats are
//! stored pre-scaled and are returned unchanged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::Result;
use crate::models::{tenths_to_units, StationYearStats};
use crate::store::{Database, ObservationStore, StatsStore};
use crate::utils::constants::{DEFAULT_PAGE, DEFAULT_PER_PAGE};

/// 1-indexed pagination parameters.
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct PageRequest {
    #[validate(range(min = 1))]
    pub page: u32,
    #[validate(range(min = 1))]
    pub per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.per_page)
    }
}

/// Optional filters for the raw-observations listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObservationFilter {
    pub station_id: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Optional filters for the stats listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsFilter {
    pub station_id: Option<String>,
    pub year: Option<i32>,
}

/// One raw observation in decimal units. `date` serializes as ISO-8601;
/// absent measurements stay null (a stored zero is `0.0`, never null).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationDto {
    pub station_id: String,
    pub date: NaiveDate,
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
    pub precipitation: Option<f64>,
}

/// Read-only query access over both tables.
pub struct QueryService<'a> {
    observations: ObservationStore<'a>,
    stats: StatsStore<'a>,
}

impl<'a> QueryService<'a> {
    pub fn new(db: &'a Database, raw_table: &str, stats_table: &str) -> Result<Self> {
        Ok(Self {
            observations: ObservationStore::new(db, raw_table)?,
            stats: StatsStore::new(db, stats_table)?,
        })
    }

    /// One page of raw observations, rescaled to decimal units.
    ///
    /// A page past the end of the result set is an empty list, not an
    /// error; `page = 0` or `per_page = 0` is a validation error.
    pub async fn list_observations(
        &self,
        filter: &ObservationFilter,
        page: &PageRequest,
    ) -> Result<Vec<ObservationDto>> {
        page.validate()?;

        let rows = self
            .observations
            .fetch_page(
                filter.station_id.as_deref(),
                filter.date,
                page.limit(),
                page.offset(),
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| ObservationDto {
                station_id: row.station_id,
                date: row.date,
                max_temp: row.max_temp.map(tenths_to_units),
                min_temp: row.min_temp.map(tenths_to_units),
                precipitation: row.precipitation.map(tenths_to_units),
            })
            .collect())
    }

    /// One page of aggregated stats, values as stored.
    pub async fn list_stats(
        &self,
        filter: &StatsFilter,
        page: &PageRequest,
    ) -> Result<Vec<StationYearStats>> {
        page.validate()?;

        let rows = self
            .stats
            .fetch_page(
                filter.station_id.as_deref(),
                filter.year,
                page.limit(),
                page.offset(),
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| StationYearStats {
                station_id: row.station_id,
                year: row.year,
                avg_max_temp: row.avg_max_temp,
                avg_min_temp: row.avg_min_temp,
                total_precipitation: row.total_precipitation,
            })
            .collect())
    }
}
