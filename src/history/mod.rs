//! Experiment history.
//!
//! An append-only, per-user log of solved circuits. Every persisted solve
//! becomes a new [`Experiment`]; records are never merged, edited or
//! removed. Ids are assigned from one monotonically increasing counter
//! per collection, inside the same critical section as the insert, so
//! concurrent appends never share an id.

mod json;
mod memory;

pub use json::JsonFileHistory;
pub use memory::MemoryHistory;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::circuit::{ParameterSet, Topology};
use crate::error::Result;
use crate::solver::ResultSet;
use crate::verify::VerificationReport;

/// Identifier of the user owning an experiment.
pub type UserId = u64;

/// Identifier of an experiment within its collection.
pub type ExperimentId = u64;

/// One persisted solve.
///
/// Older logs name the topology `circuit_type`, keep a free-text
/// `analysis` instead of a structured report and stamp records with a
/// naive local timestamp. Such records load with an empty verification
/// report and the timestamp read as UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub id: ExperimentId,
    pub user_id: UserId,
    #[serde(alias = "circuit_type")]
    pub topology: Topology,
    pub parameters: ParameterSet,
    pub results: ResultSet,
    #[serde(default)]
    pub verification: VerificationReport,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Accept RFC 3339 timestamps and offset-less ISO 8601 ones.
fn deserialize_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    if let Ok(at) = DateTime::parse_from_rfc3339(&text) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp {text:?}: {e}")))
}

/// Storage for experiments.
pub trait ExperimentHistory: Send + Sync {
    /// Store a new experiment and return it with its id and timestamp.
    fn append(
        &self,
        user_id: UserId,
        topology: Topology,
        parameters: ParameterSet,
        results: ResultSet,
        verification: VerificationReport,
    ) -> Result<Experiment>;

    /// All experiments of one user, most recent first.
    fn list(&self, user_id: UserId) -> Result<Vec<Experiment>>;
}

/// Next id for a collection: one past the largest id, starting at 1.
fn next_id(records: &[Experiment]) -> ExperimentId {
    records.iter().map(|e| e.id).max().map_or(1, |max| max + 1)
}

/// Records owned by `user_id`, newest (highest id) first.
fn for_user(records: &[Experiment], user_id: UserId) -> Vec<Experiment> {
    let mut owned: Vec<Experiment> = records
        .iter()
        .filter(|e| e.user_id == user_id)
        .cloned()
        .collect();
    owned.sort_by(|a, b| b.id.cmp(&a.id));
    owned
}


#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: ExperimentId, user_id: UserId) -> Experiment {
        Experiment {
            id,
            user_id,
            topology: Topology::Series,
            parameters: ParameterSet::new(),
            results: ResultSet::new(),
            verification: VerificationReport::default(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_next_id() {
        assert_eq!(next_id(&[]), 1);
        assert_eq!(next_id(&[record(1, 7), record(4, 8), record(2, 7)]), 5);
    }

    #[test]
    fn test_reads_legacy_record() {
        let json = r#"{
            "id": 3,
            "user_id": 2,
            "circuit_type": "complex",
            "parameters": {"V1": 12.0, "V2": 6.0, "R1": 10.0, "R2": 20.0, "R3": 30.0},
            "results": {"I1": 0.436, "I2": -0.055},
            "analysis": "KVL ok",
            "created_at": "2024-05-01T10:00:00.123456"
        }"#;
        let exp: Experiment = serde_json::from_str(json).unwrap();
        assert_eq!(exp.topology, Topology::TwoMesh);
        assert_eq!(exp.results.get("I1"), Some(0.436));
        assert!(exp.verification.is_empty());
        assert_eq!(exp.created_at.to_rfc3339(), "2024-05-01T10:00:00.123456+00:00");

        // Written back in the current shape
        let value = serde_json::to_value(&exp).unwrap();
        assert_eq!(value["topology"], "complex");
        assert!(value.get("circuit_type").is_none());
    }

    #[test]
    fn test_timestamp_round_trip() {
        let exp = record(1, 7);
        let json = serde_json::to_string(&exp).unwrap();
        let back: Experiment = serde_json::from_str(&json).unwrap();
        assert_eq!(back.created_at, exp.created_at);
    }

    #[test]
    fn test_rejects_bad_timestamp() {
        let json = r#"{"id":1,"user_id":1,"topology":"series","parameters":{},
            "results":{},"created_at":"yesterday"}"#;
        assert!(serde_json::from_str::<Experiment>(json).is_err());
    }

    #[test]
    fn test_for_user_newest_first() {
        let records = [record(1, 7), record(2, 8), record(3, 7)];
        let ids: Vec<_> = for_user(&records, 7).iter().map(|e| e.id).collect();
        assert_eq!(ids, [3, 1]);
        assert!(for_user(&records, 9).is_empty());
    }
}
