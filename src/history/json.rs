//! Experiment history stored as a flat JSON array on disk.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use tracing::{debug, info};

use crate::circuit::{ParameterSet, Topology};
use crate::error::{KirchhoffError, Result};
use crate::solver::ResultSet;
use crate::verify::VerificationReport;

use super::{for_user, next_id, Experiment, ExperimentHistory, UserId};

/// History persisted as one JSON array of experiments.
///
/// Each append rewrites the file through a sibling temporary file and a
/// rename. The lock serializes appends within this process only.
#[derive(Debug)]
pub struct JsonFileHistory {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileHistory {
    /// Open (or lazily create) the log at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record; a missing file is an empty log.
    fn load(&self) -> Result<Vec<Experiment>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no experiment log yet");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(KirchhoffError::HistoryRead {
                    path: self.path.display().to_string(),
                    source: e,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn store(&self, records: &[Experiment]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        let write_err = |source| KirchhoffError::HistoryWrite {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)
    }
}

impl ExperimentHistory for JsonFileHistory {
    fn append(
        &self,
        user_id: UserId,
        topology: Topology,
        parameters: ParameterSet,
        results: ResultSet,
        verification: VerificationReport,
    ) -> Result<Experiment> {
        let _guard = self.lock.lock().map_err(|_| KirchhoffError::HistoryPoisoned)?;

        let mut records = self.load()?;
        let experiment = Experiment {
            id: next_id(&records),
            user_id,
            topology,
            parameters,
            results,
            verification,
            created_at: Utc::now(),
        };
        records.push(experiment.clone());
        self.store(&records)?;

        info!(
            id = experiment.id,
            user_id,
            %topology,
            path = %self.path.display(),
            "experiment recorded"
        );
        Ok(experiment)
    }

    fn list(&self, user_id: UserId) -> Result<Vec<Experiment>> {
        let _guard = self.lock.lock().map_err(|_| KirchhoffError::HistoryPoisoned)?;
        Ok(for_user(&self.load()?, user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::fixtures::append_series;
    use crate::solver::solve;
    use crate::verify::{verify, Law};
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let history = JsonFileHistory::new(dir.path().join("virtual_lab.json"));
        assert!(history.list(1).unwrap().is_empty());
    }

    #[test]
    fn test_append_persists_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lab").join("virtual_lab.json");

        let first = JsonFileHistory::new(&path);
        append_series(&first, 1, 12.0);
        append_series(&first, 2, 9.0);

        let second = JsonFileHistory::new(&path);
        let exp = append_series(&second, 1, 6.0);
        assert_eq!(exp.id, 3);

        let mine = second.list(1).unwrap();
        assert_eq!(mine.iter().map(|e| e.id).collect::<Vec<_>>(), [3, 1]);
        assert_eq!(mine[1].results.get("I_total"), Some(0.4));
        assert_eq!(mine[1].verification.checks()[0].law, Law::Kcl);
    }

    #[test]
    fn test_file_is_flat_json_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("virtual_lab.json");
        let history = JsonFileHistory::new(&path);
        append_series(&history, 5, 12.0);

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let entry = &value.as_array().unwrap()[0];
        assert_eq!(entry["id"], 1);
        assert_eq!(entry["user_id"], 5);
        assert_eq!(entry["topology"], "series");
        assert_eq!(entry["parameters"]["R1"], 10.0);
        assert_eq!(entry["results"]["P_total"], 4.8);
        assert!(entry["verification"].is_array());
        assert!(entry["created_at"].is_string());
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("virtual_lab.json");
        fs::write(&path, "{not json").unwrap();
        let history = JsonFileHistory::new(&path);
        assert!(matches!(
            history.list(1),
            Err(KirchhoffError::Json(_))
        ));
    }

    #[test]
    fn test_extreme_values_keep_log_readable() {
        let dir = tempdir().unwrap();
        let history = JsonFileHistory::new(dir.path().join("virtual_lab.json"));

        let params = ParameterSet::new()
            .with("voltage", 1.0)
            .with("R1", 1e306)
            .with("R2", 1.0);
        let results = solve(Topology::Series, &params).unwrap();
        let report = verify(Topology::Series, &params, &results).unwrap();
        history
            .append(1, Topology::Series, params, results, report)
            .unwrap();

        let listed = history.list(1).unwrap();
        assert_eq!(listed[0].results.get("R_total"), Some(1e306));
        assert!(listed[0].results.iter().all(|(_, value)| value.is_finite()));

        // Appending again must re-read the extreme record
        let exp = append_series(&history, 1, 12.0);
        assert_eq!(exp.id, 2);
        assert_eq!(history.list(1).unwrap().len(), 2);
    }

    #[test]
    fn test_reads_legacy_log() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("virtual_lab.json");
        fs::write(
            &path,
            r#"[{
                "id": 1,
                "user_id": 2,
                "circuit_type": "series",
                "parameters": {"voltage": 12.0, "R1": 10.0, "R2": 20.0},
                "results": {"R_total": 30.0, "I_total": 0.4},
                "analysis": "KVL ok",
                "created_at": "2024-05-01T10:00:00.123456"
            }]"#,
        )
        .unwrap();

        let history = JsonFileHistory::new(&path);
        let listed = history.list(2).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].topology, Topology::Series);
        assert!(listed[0].verification.is_empty());

        let exp = append_series(&history, 2, 9.0);
        assert_eq!(exp.id, 2);
        assert_eq!(history.list(2).unwrap().len(), 2);
    }
}
