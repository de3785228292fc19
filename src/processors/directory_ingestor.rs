use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};
use crate::readers::ObservationReader;
use crate::store::{Database, ObservationStore};
use crate::utils::constants::DEFAULT_FILE_EXTENSION;
use crate::utils::ProgressReporter;

/// Outcome counts for one directory ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub files_discovered: usize,
    pub files_ingested: usize,
    /// Files that parsed to zero valid records.
    pub files_skipped: usize,
    /// Files that could not be read or parsed at all.
    pub files_failed: usize,
    pub records_loaded: u64,
}

impl IngestReport {
    pub fn summary(&self) -> String {
        format!(
            "Ingestion Summary\n\
             =================\n\
             Files discovered: {}\n\
             Files ingested:   {}\n\
             Files skipped:    {} (no valid records)\n\
             Files failed:     {} (unreadable or unparseable)\n\
             Records loaded:   {}",
            self.files_discovered,
            self.files_ingested,
            self.files_skipped,
            self.files_failed,
            self.records_loaded,
        )
    }
}

/// Ingests every matching file in a directory, one file at a time.
///
/// Each file is an independent unit: a file that cannot be read or
/// parsed is logged and skipped, and the remaining files are still
/// attempted. Storage failures abort the whole run instead; skipping
/// past a compromised store would mask data loss.
///
/// Runs are sequential; concurrent ingestion against the same table
/// needs external coordination by the caller.
pub struct DirectoryIngestor<'a> {
    store: ObservationStore<'a>,
    reader: ObservationReader,
    extension: String,
}

impl<'a> DirectoryIngestor<'a> {
    pub fn new(db: &'a Database, table: &str) -> Result<Self> {
        Ok(Self {
            store: ObservationStore::new(db, table)?,
            reader: ObservationReader::new(),
            extension: DEFAULT_FILE_EXTENSION.to_string(),
        })
    }

    #[must_use]
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.to_string();
        self
    }

    /// Process every file in `dir` whose name ends with the configured
    /// extension. A missing or empty directory is a warning, not an
    /// error.
    pub async fn ingest_directory(
        &self,
        dir: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<IngestReport> {
        let mut report = IngestReport::default();

        if !dir.is_dir() {
            tracing::warn!(dir = %dir.display(), "Not a directory, nothing to ingest");
            return Ok(report);
        }

        let files = self.discover_files(dir)?;
        report.files_discovered = files.len();

        if files.is_empty() {
            tracing::warn!(
                dir = %dir.display(),
                extension = %self.extension,
                "No matching files found"
            );
            return Ok(report);
        }

        for path in &files {
            if let Some(pb) = progress {
                pb.set_message(format!("Ingesting {}", path.display()).as_str());
            }

            match self.ingest_file(path).await {
                Ok(0) => {
                    tracing::warn!(file = %path.display(), "No valid records, file skipped");
                    report.files_skipped += 1;
                }
                Ok(count) => {
                    report.files_ingested += 1;
                    report.records_loaded += count;
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    tracing::warn!(file = %path.display(), error = %err, "File skipped");
                    report.files_failed += 1;
                }
            }

            if let Some(pb) = progress {
                pb.increment(1);
            }
        }

        tracing::info!(
            dir = %dir.display(),
            ingested = report.files_ingested,
            skipped = report.files_skipped,
            failed = report.files_failed,
            records = report.records_loaded,
            "Directory ingestion complete"
        );
        Ok(report)
    }

    /// Parse one file and load its records. Returns the number of
    /// records loaded; zero means the file had no valid records and the
    /// loader was not invoked.
    async fn ingest_file(&self, path: &Path) -> Result<u64> {
        let records = self.reader.read_observations(path)?;
        if records.is_empty() {
            return Ok(0);
        }
        self.store.append(&records).await
    }

    /// Immediate entries of `dir` matching the extension, sorted by name
    /// for deterministic processing order. Subdirectories are ignored.
    fn discover_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(dir).map_err(|source| PipelineError::FileRead {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| PipelineError::FileRead {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();

            let matches = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| name.ends_with(&self.extension));
            if path.is_file() && matches {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}
