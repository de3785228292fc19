use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::ObservationRecord;
use crate::store::database::{validate_table_name, Database};

/// Write/read access to the raw-observations table.
///
/// This is the only component that writes raw observations. Writes are
/// append-only: rows are never updated or deleted, and loading the same
/// batch twice stores two copies.
#[derive(Debug)]
pub struct ObservationStore<'a> {
    pool: &'a SqlitePool,
    table: String,
}

/// A stored raw observation, exactly as persisted (tenths of a unit).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ObservationRow {
    pub id: i64,
    pub station_id: String,
    pub date: NaiveDate,
    pub max_temp: Option<i32>,
    pub min_temp: Option<i32>,
    pub precipitation: Option<i32>,
}

impl<'a> ObservationStore<'a> {
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

    /// Append a batch of records inside a single transaction.
    ///
    /// Either every record becomes visible or none does; a storage
    /// failure rolls the whole batch back and surfaces as
    /// [`crate::error::PipelineError::Storage`]. The schema is an
    /// external precondition; nothing is created here.
    pub async fn append(&self, records: &[ObservationRecord]) -> Result<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let sql = format!(
            "INSERT INTO {} (station_id, date, max_temp, min_temp, precipitation)
             VALUES (?, ?, ?, ?, ?)",
            self.table
        );

        let mut tx = self.pool.begin().await?;
        for record in records {
            sqlx::query(&sql)
                .bind(&record.station_id)
                .bind(record.date)
                .bind(record.max_temp)
                .bind(record.min_temp)
                .bind(record.precipitation)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        tracing::debug!(
            count = records.len(),
            table = %self.table,
            "Appended observations"
        );
        Ok(records.len() as u64)
    }

    /// Fetch one page of stored rows, optionally filtered by station
    /// and/or exact date. Rows come back in insertion order so pages are
    /// stable; a page past the end of the result set is simply empty.
    pub async fn fetch_page(
        &self,
        station_id: Option<&str>,
        date: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ObservationRow>> {
        let sql = format!(
            "SELECT id, station_id, date, max_temp, min_temp, precipitation
             FROM {}
             WHERE (? IS NULL OR station_id = ?)
               AND (? IS NULL OR date = ?)
             ORDER BY id
             LIMIT ? OFFSET ?",
            self.table
        );

        let rows = sqlx::query_as::<_, ObservationRow>(&sql)
            .bind(station_id)
            .bind(station_id)
            .bind(date)
            .bind(date)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::utils::constants::DEFAULT_RAW_TABLE;

    fn record(
        station: &str,
        y: i32,
        m: u32,
        d: u32,
        max_temp: Option<i32>,
        min_temp: Option<i32>,
        precipitation: Option<i32>,
    ) -> ObservationRecord {
        ObservationRecord::new(
            station.to_string(),
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            max_temp,
            min_temp,
            precipitation,
        )
    }

    async fn test_db() -> Database {
        let db = Database::connect_in_memory().await.unwrap();
        db.ensure_schema(DEFAULT_RAW_TABLE, "weather_stats")
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_append_and_fetch_roundtrip() {
        let db = test_db().await;
        let store = ObservationStore::new(&db, DEFAULT_RAW_TABLE).unwrap();

        let records = vec![
            record("S1", 2023, 1, 1, Some(305), Some(-21), Some(0)),
            record("S1", 2023, 1, 2, None, Some(40), None),
        ];
        assert_eq!(store.append(&records).await.unwrap(), 2);

        let rows = store.fetch_page(None, None, 10, 0).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].station_id, "S1");
        assert_eq!(rows[0].max_temp, Some(305));
        assert_eq!(rows[1].max_temp, None);
        assert_eq!(rows[1].precipitation, None);
    }

    #[tokio::test]
    async fn test_double_append_doubles_rows() {
        // Re-loading a batch stores a second copy; the store never dedups.
        let db = test_db().await;
        let store = ObservationStore::new(&db, DEFAULT_RAW_TABLE).unwrap();

        let records = vec![record("S1", 2023, 1, 1, Some(100), Some(50), Some(10))];
        store.append(&records).await.unwrap();
        store.append(&records).await.unwrap();

        let rows = store.fetch_page(None, None, 10, 0).await.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_no_op() {
        let db = test_db().await;
        let store = ObservationStore::new(&db, DEFAULT_RAW_TABLE).unwrap();
        assert_eq!(store.append(&[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_batch_leaves_no_partial_rows() {
        let db = Database::connect_in_memory().await.unwrap();
        sqlx::query(
            "CREATE TABLE guarded (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                station_id TEXT NOT NULL,
                date TEXT NOT NULL,
                max_temp INTEGER,
                min_temp INTEGER,
                precipitation INTEGER,
                UNIQUE (station_id, date)
            )",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let store = ObservationStore::new(&db, "guarded").unwrap();
        let records = vec![
            record("S1", 2023, 1, 1, Some(100), Some(50), Some(10)),
            record("S1", 2023, 1, 1, Some(200), Some(60), Some(20)),
        ];

        let err = store.append(&records).await.unwrap_err();
        assert!(matches!(err, PipelineError::Storage(_)));
        assert!(err.is_fatal());

        let rows = store.fetch_page(None, None, 10, 0).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_filters_and_pagination() {
        let db = test_db().await;
        let store = ObservationStore::new(&db, DEFAULT_RAW_TABLE).unwrap();

        let mut records = Vec::new();
        for day in 1..=5 {
            records.push(record("S1", 2023, 1, day, Some(100 + day as i32), None, None));
        }
        records.push(record("S2", 2023, 1, 1, Some(999), None, None));
        store.append(&records).await.unwrap();

        let s1 = store.fetch_page(Some("S1"), None, 100, 0).await.unwrap();
        assert_eq!(s1.len(), 5);

        let jan2 = store
            .fetch_page(None, NaiveDate::from_ymd_opt(2023, 1, 2), 100, 0)
            .await
            .unwrap();
        assert_eq!(jan2.len(), 1);
        assert_eq!(jan2[0].max_temp, Some(102));

        let page2 = store.fetch_page(Some("S1"), None, 2, 2).await.unwrap();
        assert_eq!(page2.len(), 2);
        assert_eq!(page2[0].max_temp, Some(103));

        let past_end = store.fetch_page(Some("S1"), None, 10, 20).await.unwrap();
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn test_bad_table_name_rejected() {
        let db = test_db().await;
        let err = ObservationStore::new(&db, "weather data").unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
