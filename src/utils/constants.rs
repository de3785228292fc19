/// Sentinel value marking a missing measurement in source files
pub const SENTINEL_MISSING: i32 = -9999;

/// Date format used by source files (e.g. 20230115)
pub const SOURCE_DATE_FORMAT: &str = "%Y%m%d";

/// Default extension of source observation files
pub const DEFAULT_FILE_EXTENSION: &str = ".txt";

/// Default table names
pub const DEFAULT_RAW_TABLE: &str = "weather_data";
pub const DEFAULT_STATS_TABLE: &str = "weather_stats";

/// Raw readings are stored in integer tenths of a unit; the read path
/// rescales every field by this divisor. The aggregation query uses its
/// own divisors (10.0 for temperatures, 100.0 for precipitation totals);
/// they are deliberately distinct from this one.
pub const TENTHS_DIVISOR: f64 = 10.0;

/// Pagination defaults
pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 10;
