//! In-process experiment history.

use std::sync::Mutex;

use chrono::Utc;
use tracing::info;

use crate::circuit::{ParameterSet, Topology};
use crate::error::{KirchhoffError, Result};
use crate::solver::ResultSet;
use crate::verify::VerificationReport;

use super::{for_user, next_id, Experiment, ExperimentHistory, UserId};

/// History kept in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    records: Mutex<Vec<Experiment>>,
}

impl MemoryHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of experiments across all users.
    pub fn len(&self) -> Result<usize> {
        let records = self
            .records
            .lock()
            .map_err(|_| KirchhoffError::HistoryPoisoned)?;
        Ok(records.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl ExperimentHistory for MemoryHistory {
    fn append(
        &self,
        user_id: UserId,
        topology: Topology,
        parameters: ParameterSet,
        results: ResultSet,
        verification: VerificationReport,
    ) -> Result<Experiment> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| KirchhoffError::HistoryPoisoned)?;

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

        info!(id = experiment.id, user_id, %topology, "experiment recorded");
        Ok(experiment)
    }

    fn list(&self, user_id: UserId) -> Result<Vec<Experiment>> {
        let records = self
            .records
            .lock()
            .map_err(|_| KirchhoffError::HistoryPoisoned)?;
        Ok(for_user(&records, user_id))
    }
}
