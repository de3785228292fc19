use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::StationYearStats;
use crate::store::database::{validate_table_name, Database};

/// Write/read access to the per-station yearly stats table.
///
/// Append-only like the raw store: a re-run of the aggregation appends a
/// fresh copy of every computed row rather than upserting.
pub struct StatsStore<'a> {
    pool: &'a SqlitePool,
    table: String,
}

/// A stored stats row. Values are persisted pre-scaled (decimal units).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StatsRow {
    pub id: i64,
    pub station_id: String,
    pub year: i32,
    pub avg_max_temp: Option<f64>,
    pub avg_min_temp: Option<f64>,
    pub total_precipitation: Option<f64>,
}

impl<'a> StatsStore<'a> {
    pub fn new(db: &'a Database, table: &str) -> Result<Self> {
        validate_table_name(table)?;
        Ok(Self {
            pool: db.pool(),
            table: table.to_owned(),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Append all computed rows inside a single transaction; a failure
    /// rolls back the whole set so no partial aggregate is visible.
    pub async fn append(&self, rows: &[StationYearStats]) -> Result<u64> {
        if rows.is_empty() {
            return Ok(0);
        }

        let sql = format!(
            "INSERT INTO {} (station_id, year, avg_max_temp, avg_min_temp, total_precipitation)
             VALUES (?, ?, ?, ?, ?)",
            self.table
        );

        let mut tx = self.pool.begin().await?;
        for row in rows {
            sqlx::query(&sql)
                .bind(&row.station_id)
                .bind(row.year)
                .bind(row.avg_max_temp)
                .bind(row.avg_min_temp)
                .bind(row.total_precipitation)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        tracing::debug!(count = rows.len(), table = %self.table, "Appended stats");
        Ok(rows.len() as u64)
    }

    /// Fetch one page of stats rows, optionally filtered by station
    /// and/or year, in insertion order.
    pub async fn fetch_page(
        &self,
        station_id: Option<&str>,
        year: Option<i32>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<StatsRow>> {
        let sql = format!(
            "SELECT id, station_id, year, avg_max_temp, avg_min_temp, total_precipitation
             FROM {}
             WHERE (? IS NULL OR station_id = ?)
               AND (? IS NULL OR year = ?)
             ORDER BY id
             LIMIT ? OFFSET ?",
            self.table
        );

        let rows = sqlx::query_as::<_, StatsRow>(&sql)
            .bind(station_id)
            .bind(station_id)
            .bind(year)
            .bind(year)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        Ok(rows)
    }
}
