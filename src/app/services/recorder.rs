//! Run-scoped persistence of enrichment results and audit metadata
//!
//! Pure side-effecting sink: writes the finalized run under a directory
//! keyed by run identifier so historical runs stay inspectable, and reads
//! them back for the report command. Write failures surface to the caller
//! as fatal persistence errors; there is no recovery here.

use crate::app::models::telemetry::RunMetadata;
use crate::app::services::orchestrator::EnrichmentRun;
use crate::constants::{RUN_ID_PREFIX, RUN_METADATA_FILENAME, STATIONS_OUTPUT_FILENAME};
use crate::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Paths of the artifacts written for one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunArtifacts {
    /// Run-scoped directory holding both artifacts
    pub run_dir: PathBuf,
    /// Persisted run metadata
    pub metadata_path: PathBuf,
    /// Persisted enriched record set
    pub records_path: PathBuf,
}

/// Persists finalized runs under an output root, one directory per run
#[derive(Debug, Clone)]
pub struct RunRecorder {
    output_root: PathBuf,
}

impl RunRecorder {
    /// Create a recorder rooted at the given output directory
    pub fn new(output_root: PathBuf) -> Self {
        Self { output_root }
    }

    /// The configured output root
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Persist a finalized run's metadata and record set
    ///
    /// Allocates a directory named after the run identifier; when a
    /// directory with that name already exists a numeric suffix is added,
    /// so a prior run's output is never overwritten.
    pub fn persist(&self, run: &EnrichmentRun) -> Result<RunArtifacts> {
        let run_dir = self.allocate_run_dir(&run.metadata.run_id)?;

        let metadata_path = run_dir.join(RUN_METADATA_FILENAME);
        write_json(&metadata_path, &run.metadata)?;

        let records_path = run_dir.join(STATIONS_OUTPUT_FILENAME);
        write_json(&records_path, &run.records)?;

        info!(
            "Persisted run {} ({} records) to {}",
            run.metadata.run_id,
            run.records.len(),
            run_dir.display()
        );

        Ok(RunArtifacts {
            run_dir,
            metadata_path,
            records_path,
        })
    }

    /// List persisted run directory names, sorted ascending
    ///
    /// Run identifiers embed the start timestamp, so the sort is
    /// chronological.
    pub fn list_runs(&self) -> Result<Vec<String>> {
        if !self.output_root.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.output_root).map_err(|e| {
            Error::persistence(
                format!("Failed to read output root '{}'", self.output_root.display()),
                e,
            )
        })?;

        let mut runs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                Error::persistence("Failed to read output root entry".to_string(), e)
            })?;
            let path = entry.path();
            if path.is_dir() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    if name.starts_with(RUN_ID_PREFIX) {
                        runs.push(name.to_string());
                    }
                }
            }
        }

        runs.sort();
        Ok(runs)
    }

    /// Load the persisted metadata for a run
    pub fn load_metadata(&self, run_id: &str) -> Result<RunMetadata> {
        let path = self.output_root.join(run_id).join(RUN_METADATA_FILENAME);
        if !path.exists() {
            return Err(Error::run_not_found(run_id));
        }

        let raw = fs::read_to_string(&path).map_err(|e| {
            Error::persistence(format!("Failed to read '{}'", path.display()), e)
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::json(format!("Failed to decode '{}'", path.display()), e))
    }

    /// Allocate a fresh directory for a run identifier
    fn allocate_run_dir(&self, run_id: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_root).map_err(|e| {
            Error::persistence(
                format!(
                    "Failed to create output root '{}'",
                    self.output_root.display()
                ),
                e,
            )
        })?;

        let base = self.output_root.join(run_id);
        match fs::create_dir(&base) {
            Ok(()) => return Ok(base),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(Error::persistence(
                    format!("Failed to create run directory '{}'", base.display()),
                    e,
                ));
            }
        }

        // Same-second collision; suffix rather than touch the prior run
        for suffix in 2..100u32 {
            let candidate = self.output_root.join(format!("{}-{}", run_id, suffix));
            match fs::create_dir(&candidate) {
                Ok(()) => return Ok(candidate),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(Error::persistence(
                        format!("Failed to create run directory '{}'", candidate.display()),
                        e,
                    ));
                }
            }
        }

        Err(Error::persistence_message(format!(
            "Could not allocate a unique run directory for {}",
            run_id
        )))
    }
}

/// Write a value as pretty-printed JSON
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value)
        .map_err(|e| Error::json("Failed to encode run artifact", e))?;
    fs::write(path, body)
        .map_err(|e| Error::persistence(format!("Failed to write '{}'", path.display()), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::telemetry::RunMetadata;
    use crate::app::models::{EnrichedStationRecord, EnrichmentResult, RawStationRecord};
    use tempfile::TempDir;

    fn sample_run() -> EnrichmentRun {
        let raw = RawStationRecord::new("Texaco Spanish Town", Some("Main St".to_string()));
        let enrichment = EnrichmentResult {
            latitude: Some(17.99),
            longitude: Some(-76.95),
            ..Default::default()
        };

        let mut metadata = RunMetadata::new(false);
        metadata.finalize();

        EnrichmentRun {
            records: vec![EnrichedStationRecord::enriched(raw, enrichment)],
            metadata,
        }
    }

    #[test]
    fn test_persist_writes_both_artifacts() {
        let temp_dir = TempDir::new().unwrap();
        let recorder = RunRecorder::new(temp_dir.path().to_path_buf());
        let run = sample_run();

        let artifacts = recorder.persist(&run).unwrap();

        assert!(artifacts.metadata_path.exists());
        assert!(artifacts.records_path.exists());
        assert_eq!(
            artifacts.run_dir.file_name().unwrap().to_str().unwrap(),
            run.metadata.run_id
        );

        let loaded = recorder.load_metadata(&run.metadata.run_id).unwrap();
        assert_eq!(loaded, run.metadata);

        let records: Vec<EnrichedStationRecord> = serde_json::from_str(
            &std::fs::read_to_string(&artifacts.records_path).unwrap(),
        )
        .unwrap();
        assert_eq!(records, run.records);
    }

    #[test]
    fn test_repeated_run_id_never_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let recorder = RunRecorder::new(temp_dir.path().to_path_buf());
        let run = sample_run();

        let first = recorder.persist(&run).unwrap();
        let second = recorder.persist(&run).unwrap();

        assert_ne!(first.run_dir, second.run_dir);
        assert!(first.metadata_path.exists());
        assert!(second.metadata_path.exists());
        assert!(
            second
                .run_dir
                .file_name()
                .unwrap()
                .to_str()
                .unwrap()
                .ends_with("-2")
        );
    }

    #[test]
    fn test_list_runs_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let recorder = RunRecorder::new(temp_dir.path().to_path_buf());

        std::fs::create_dir(temp_dir.path().join("run-20260102-000000")).unwrap();
        std::fs::create_dir(temp_dir.path().join("run-20260101-000000")).unwrap();
        // Non-run directories are ignored
        std::fs::create_dir(temp_dir.path().join("scratch")).unwrap();

        let runs = recorder.list_runs().unwrap();
        assert_eq!(runs, vec!["run-20260101-000000", "run-20260102-000000"]);
    }

    #[test]
    fn test_list_runs_with_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let recorder = RunRecorder::new(temp_dir.path().join("nonexistent"));
        assert!(recorder.list_runs().unwrap().is_empty());
    }

    #[test]
    fn test_load_metadata_for_unknown_run() {
        let temp_dir = TempDir::new().unwrap();
        let recorder = RunRecorder::new(temp_dir.path().to_path_buf());

        let err = recorder.load_metadata("run-19990101-000000").unwrap_err();
        assert!(matches!(err, Error::RunNotFound { .. }));
    }
}
