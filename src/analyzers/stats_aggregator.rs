use crate::error::Result;
use crate::models::StationYearStats;
use crate::store::{Database, StatsStore};
use crate::store::database::validate_table_name;

/// Outcome of one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationReport {
    /// Distinct (station, year) groups computed and written.
    pub groups_written: u64,
}

impl AggregationReport {
    pub fn summary(&self) -> String {
        format!(
            "Aggregation Summary\n\
             ===================\n\
             Station/year groups written: {}",
            self.groups_written
        )
    }
}

/// Computes per-station yearly statistics from the raw table and appends
/// them to the stats table.
///
/// The whole run is one read plus one transactional write: a failure on
/// either side leaves the stats table untouched. Absent measurements are
/// excluded from their aggregate by SQL NULL semantics, never counted as
/// zero. Temperatures rescale by 10, precipitation totals by 100; the
/// divisors are intentionally different.
pub struct StatsAggregator<'a> {
    db: &'a Database,
    raw_table: String,
    stats_table: String,
}

impl<'a> StatsAggregator<'a> {
    pub fn new(db: &'a Database, raw_table: &str, stats_table: &str) -> Result<Self> {
        validate_table_name(raw_table)?;
        validate_table_name(stats_table)?;
        Ok(Self {
            db,
            raw_table: raw_table.to_owned(),
            stats_table: stats_table.to_owned(),
        })
    }

    /// Run the aggregation. An empty raw table computes an empty result
    /// and skips the write entirely.
    pub async fn aggregate(&self) -> Result<AggregationReport> {
        let computed = self.compute_stats().await?;

        if computed.is_empty() {
            tracing::warn!(
                raw_table = %self.raw_table,
                "Raw store is empty, skipping stats write"
            );
            return Ok(AggregationReport::default());
        }

        let store = StatsStore::new(self.db, &self.stats_table)?;
        let groups_written = store.append(&computed).await?;

        tracing::info!(
            raw_table = %self.raw_table,
            stats_table = %self.stats_table,
            groups = groups_written,
            "Aggregation complete"
        );
        Ok(AggregationReport { groups_written })
    }

    /// The grouped aggregation query. Appends nothing; read-only on the
    /// raw table.
    async fn compute_stats(&self) -> Result<Vec<StationYearStats>> {
        let sql = format!(
            "SELECT station_id,
                    CAST(strftime('%Y', date) AS INTEGER) AS year,
                    AVG(max_temp) / 10.0 AS avg_max_temp,
                    AVG(min_temp) / 10.0 AS avg_min_temp,
                    SUM(precipitation) / 100.0 AS total_precipitation
             FROM {}
             GROUP BY station_id, year
             ORDER BY station_id, year",
            self.raw_table
        );

        let rows = sqlx::query_as::<_, StationYearStats>(&sql)
            .fetch_all(self.db.pool())
            .await?;
        Ok(rows)
    }
}
