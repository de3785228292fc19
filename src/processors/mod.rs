pub mod directory_ingestor;

pub use directory_ingestor::{DirectoryIngestor, IngestReport};
