pub mod database;
pub mod observation_store;
pub mod stats_store;

pub use database::{validate_table_name, Database, StoreConfig};
pub use observation_store::{ObservationRow, ObservationStore};
pub use stats_store::{StatsRow, StatsStore};
