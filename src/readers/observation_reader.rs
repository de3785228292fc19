use crate::error::{PipelineError, Result};
use crate::models::{filter_sentinel, ObservationRecord};
use crate::utils::constants::SOURCE_DATE_FORMAT;
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

/// Reads one station file of tab-separated daily observations.
///
/// Expected line format, no header:
/// `date[YYYYMMDD] <tab> max_temp <tab> min_temp <tab> precipitation`
/// with all numeric fields in integer tenths and -9999 meaning missing.
pub struct ObservationReader;

impl ObservationReader {
    pub fn new() -> Self {
        Self
    }

    /// Read all valid observations from a file, preserving line order.
    ///
    /// Lines with an unparseable date (or too few columns) are dropped
    /// entirely and counted in the logs. An unreadable or non-UTF-8 file
    /// surfaces as [`PipelineError::FileRead`] and yields no records.
    pub fn read_observations(&self, path: &Path) -> Result<Vec<ObservationRecord>> {
        let station_id = Self::station_id_from_path(path)?;

        let contents = fs::read_to_string(path).map_err(|source| PipelineError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let mut records = Vec::new();
        let mut dropped = 0usize;

        for line in contents.lines() {
            if line.trim().is_empty() {
                continue;
            }

            match self.parse_observation_line(line, &station_id) {
                Some(record) => records.push(record),
                None => dropped += 1,
            }
        }

        tracing::debug!(
            file = %path.display(),
            parsed = records.len(),
            dropped,
            "parsed station file"
        );

        Ok(records)
    }

    /// Derive the station id from the file's base name: the text before
    /// the first dot (e.g. `USC00110072.txt` -> `USC00110072`).
    pub fn station_id_from_path(path: &Path) -> Result<String> {
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .ok_or_else(|| PipelineError::InvalidFormat("Invalid file path".to_string()))?;

        let station_id = file_name.split('.').next().unwrap_or_default();
        if station_id.is_empty() {
            return Err(PipelineError::InvalidFormat(format!(
                "Could not derive a station id from filename: {}",
                file_name
            )));
        }

        Ok(station_id.to_string())
    }

    /// Parse a single data line. Returns `None` for lines that must be
    /// dropped (bad date, too few columns).
    fn parse_observation_line(&self, line: &str, station_id: &str) -> Option<ObservationRecord> {
        let parts: Vec<&str> = line.split('\t').map(|s| s.trim()).collect();

        if parts.len() < 4 {
            return None;
        }

        // A record without a parseable date is invalid as a whole; the
        // numeric fields are individually nullable.
        let date = NaiveDate::parse_from_str(parts[0], SOURCE_DATE_FORMAT).ok()?;

        Some(ObservationRecord::new(
            station_id.to_string(),
            date,
            parse_measurement(parts[1]),
            parse_measurement(parts[2]),
            parse_measurement(parts[3]),
        ))
    }
}

impl Default for ObservationReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one tenths-of-unit field. The -9999 sentinel and any token that
/// is not an integer both map to absent.
fn parse_measurement(field: &str) -> Option<i32> {
    field.parse::<i32>().ok().and_then(filter_sentinel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_station_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", contents).unwrap();
        path
    }

    #[test]
    fn test_parse_valid_line() {
        let reader = ObservationReader::new();
        let record = reader
            .parse_observation_line("20230115\t305\t-21\t0", "S1")
            .unwrap();

        assert_eq!(record.station_id, "S1");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2023, 1, 15).unwrap());
        assert_eq!(record.max_temp, Some(305));
        assert_eq!(record.min_temp, Some(-21));
        assert_eq!(record.precipitation, Some(0));
    }

    #[test]
    fn test_sentinel_maps_to_absent() {
        let reader = ObservationReader::new();
        let record = reader
            .parse_observation_line("20230115\t-9999\t-9999\t53", "S1")
            .unwrap();

        assert_eq!(record.max_temp, None);
        assert_eq!(record.min_temp, None);
        assert_eq!(record.precipitation, Some(53));
    }

    #[test]
    fn test_bad_date_drops_line() {
        let reader = ObservationReader::new();
        assert!(reader
            .parse_observation_line("2023-01-15\t305\t-21\t0", "S1")
            .is_none());
        assert!(reader
            .parse_observation_line("notadate\t305\t-21\t0", "S1")
            .is_none());
    }

    #[test]
    fn test_short_line_drops() {
        let reader = ObservationReader::new();
        assert!(reader.parse_observation_line("20230115\t305", "S1").is_none());
    }

    #[test]
    fn test_garbage_measurement_becomes_absent() {
        let reader = ObservationReader::new();
        let record = reader
            .parse_observation_line("20230115\tabc\t-21\t0", "S1")
            .unwrap();
        assert_eq!(record.max_temp, None);
        assert_eq!(record.min_temp, Some(-21));
    }

    #[test]
    fn test_station_id_from_path() {
        let id = ObservationReader::station_id_from_path(Path::new("wx/USC00110072.txt")).unwrap();
        assert_eq!(id, "USC00110072");

        // Everything after the first dot is extension
        let id = ObservationReader::station_id_from_path(Path::new("S1.v2.txt")).unwrap();
        assert_eq!(id, "S1");
    }

    #[test]
    fn test_read_file_preserves_order_and_drops_bad_dates() {
        let dir = TempDir::new().unwrap();
        let path = write_station_file(
            &dir,
            "STATION9.txt",
            "20230101\t100\t50\t10\n\
             badline\t100\t50\t10\n\
             20230102\t-9999\t40\t-9999\n\
             \n\
             20230103\t120\t60\t0\n",
        );

        let reader = ObservationReader::new();
        let records = reader.read_observations(&path).unwrap();

        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.station_id == "STATION9"));
        assert_eq!(
            records[0].date,
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
        );
        assert_eq!(records[1].max_temp, None);
        assert_eq!(records[1].min_temp, Some(40));
        assert_eq!(
            records[2].date,
            NaiveDate::from_ymd_opt(2023, 1, 3).unwrap()
        );
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let reader = ObservationReader::new();
        let err = reader
            .read_observations(Path::new("/nonexistent/S1.txt"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::FileRead { .. }));
        assert!(!err.is_fatal());
    }
}
