pub mod observation;
pub mod stats;

pub use observation::{filter_sentinel, tenths_to_units, ObservationRecord};
pub use stats::StationYearStats;
