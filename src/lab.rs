//! The engine facade used by the application layer.

use tracing::debug;

use crate::circuit::{ParameterSet, Topology};
use crate::error::Result;
use crate::history::{Experiment, ExperimentHistory, UserId};
use crate::solver::{self, ResultSet, SolverConfig};
use crate::verify::{self, VerificationReport, VerifierConfig};

/// Configuration for a [`KirchhoffLab`].
#[derive(Debug, Clone, Default)]
pub struct LabConfig {
    pub solver: SolverConfig,
    pub verifier: VerifierConfig,
}

impl LabConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the relative determinant threshold for singular mesh systems.
    pub fn with_singular_epsilon(mut self, singular_epsilon: f64) -> Self {
        self.solver.singular_epsilon = singular_epsilon;
        self
    }

    /// Set the absolute tolerance for law checks.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.verifier.tolerance = tolerance;
        self
    }
}

/// Solver, verifier and experiment history behind one handle.
///
/// Solving and verifying are pure; only the history is stateful, and its
/// backend handles its own locking, so a lab can be shared across threads.
pub struct KirchhoffLab<H> {
    config: LabConfig,
    history: H,
}

impl<H: ExperimentHistory> KirchhoffLab<H> {
    /// Create a lab with the default configuration.
    pub fn new(history: H) -> Self {
        Self::with_config(history, LabConfig::default())
    }

    pub fn with_config(history: H, config: LabConfig) -> Self {
        Self { config, history }
    }

    pub fn config(&self) -> &LabConfig {
        &self.config
    }

    pub fn history_backend(&self) -> &H {
        &self.history
    }

    /// Solve a circuit.
    pub fn solve(&self, topology: Topology, params: &ParameterSet) -> Result<ResultSet> {
        solver::solve_with(topology, params, &self.config.solver)
    }

    /// Check a result set against Kirchhoff's laws.
    pub fn verify(
        &self,
        topology: Topology,
        params: &ParameterSet,
        results: &ResultSet,
    ) -> Result<VerificationReport> {
        verify::verify_with(topology, params, results, &self.config.verifier)
    }

    /// Persist a solved and verified circuit.
    pub fn record_experiment(
        &self,
        user_id: UserId,
        topology: Topology,
        params: ParameterSet,
        results: ResultSet,
        verification: VerificationReport,
    ) -> Result<Experiment> {
        self.history
            .append(user_id, topology, params, results, verification)
    }

    /// A user's experiments, most recent first.
    pub fn history(&self, user_id: UserId) -> Result<Vec<Experiment>> {
        self.history.list(user_id)
    }

    /// Solve, verify and record in one step.
    ///
    /// Nothing is recorded when the circuit cannot be solved.
    pub fn run(&self, user_id: UserId, topology: Topology, params: ParameterSet) -> Result<Experiment> {
        let results = self.solve(topology, &params)?;
        let verification = self.verify(topology, &params, &results)?;
        debug!(
            user_id,
            %topology,
            satisfied = verification.all_satisfied(),
            "recording experiment"
        );
        self.record_experiment(user_id, topology, params, results, verification)
    }
}
