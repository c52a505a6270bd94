//! Kirchhoff law verification.
//!
//! Restates a solver result as KCL and KVL statements and reports the
//! numeric residual behind each one. Residuals are computed from the
//! full-precision values the solver kept, so for a fresh result they
//! certify the solver rather than the rounding.
//!
//! | Topology | KCL | KVL |
//! |----------|-----|-----|
//! | series   | structural: one current everywhere | `ΣV_k` vs source EMF |
//! | parallel | `ΣI_k` vs `I_total` | structural: same voltage on every branch |
//! | two-mesh | node `I_R1 − I_R2 − I_R3` | loop 1 and loop 2 residuals |

mod report;

pub use report::{Law, LawCheck, VerificationReport};

use tracing::{debug, warn};

use crate::circuit::{single_source, two_source, ParameterSet, Topology};
use crate::error::Result;
use crate::solver::quantity::*;
use crate::solver::{ResultSet, PRECISION};

/// Default absolute tolerance for a law check.
pub const DEFAULT_TOLERANCE: f64 = 1e-3;

/// Configuration for the verifier.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Absolute residual below which a law counts as satisfied.
    pub tolerance: f64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl VerifierConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the absolute tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Allowed residual for a sum over `terms` published quantities.
    ///
    /// Each rounded quantity may be off by half a unit in the last place,
    /// so a result set reloaded from storage still verifies.
    pub fn allowance(&self, terms: usize) -> f64 {
        let half_step = 0.5 * 10f64.powi(-PRECISION);
        self.tolerance.max(half_step * terms as f64) + 1e-12
    }
}

/// Verify a result set with the default configuration.
pub fn verify(
    topology: Topology,
    params: &ParameterSet,
    results: &ResultSet,
) -> Result<VerificationReport> {
    verify_with(topology, params, results, &VerifierConfig::default())
}

/// Verify a result set against the laws for its topology.
///
/// Fails only if `results` lacks a quantity the topology produces.
pub fn verify_with(
    topology: Topology,
    params: &ParameterSet,
    results: &ResultSet,
    config: &VerifierConfig,
) -> Result<VerificationReport> {
    let checks = match topology {
        Topology::Series => series_checks(params, results, config)?,
        Topology::Parallel => parallel_checks(params, results, config)?,
        Topology::TwoMesh => mesh_checks(params, results, config)?,
    };

    let report = VerificationReport::new(checks);
    for check in report.iter().filter(|c| !c.satisfied) {
        warn!(law = %check.law, subject = %check.subject, residual = check.residual, "law check failed");
    }
    debug!(%topology, max_residual = report.max_residual(), "verification complete");
    Ok(report)
}

fn series_checks(
    params: &ParameterSet,
    results: &ResultSet,
    config: &VerifierConfig,
) -> Result<Vec<LawCheck>> {
    let inputs = single_source(params)?;
    let i_total = results.require(I_TOTAL)?;
    let drops = [
        results.require(V1)?,
        results.require(V2)?,
        results.require(V3)?,
    ];
    let sum: f64 = drops.iter().sum();

    Ok(vec![
        LawCheck::structural(
            Law::Kcl,
            "series",
            format!("the same current I_total = {i_total:.3} A flows through every element"),
            i_total,
        ),
        LawCheck::numeric(
            Law::Kvl,
            "loop",
            format!(
                "V1 + V2 + V3 = {:.3} V equals the source voltage {:.3} V",
                sum, inputs.voltage
            ),
            sum,
            inputs.voltage,
            config.allowance(drops.len()),
        ),
    ])
}

fn parallel_checks(
    params: &ParameterSet,
    results: &ResultSet,
    config: &VerifierConfig,
) -> Result<Vec<LawCheck>> {
    let inputs = single_source(params)?;
    let i_total = results.require(I_TOTAL)?;
    let branches = [
        results.require(I1)?,
        results.require(I2)?,
        results.require(I3)?,
    ];
    let sum: f64 = branches.iter().sum();

    Ok(vec![
        LawCheck::numeric(
            Law::Kcl,
            "node",
            format!("I1 + I2 + I3 = {sum:.3} A equals I_total = {i_total:.3} A"),
            sum,
            i_total,
            config.allowance(branches.len() + 1),
        ),
        LawCheck::structural(
            Law::Kvl,
            "branches",
            format!(
                "every branch sits across the source voltage {:.3} V",
                inputs.voltage
            ),
            inputs.voltage,
        ),
    ])
}

fn mesh_checks(
    params: &ParameterSet,
    results: &ResultSet,
    config: &VerifierConfig,
) -> Result<Vec<LawCheck>> {
    let inputs = two_source(params)?;
    let i_r1 = results.require(I_R1)?;
    let i_r2 = results.require(I_R2)?;
    let i_r3 = results.require(I_R3)?;
    let v_r1 = results.require(V_R1)?;
    let v_r2 = results.require(V_R2)?;
    let v_r3 = results.require(V_R3)?;

    // Mesh 2 traversed with I1 - I2 flowing through R2: V2 = V_R2 - V_R3
    let loop1_drops = v_r1 + v_r2;
    let loop2_drops = v_r2 - v_r3;

    Ok(vec![
        LawCheck::numeric(
            Law::Kcl,
            "node",
            format!(
                "I_R1 = {i_r1:.3} A into the shared node equals I_R2 + I_R3 = {:.3} A out",
                i_r2 + i_r3
            ),
            i_r1 - i_r2 - i_r3,
            0.0,
            config.allowance(3),
        ),
        LawCheck::numeric(
            Law::Kvl,
            "loop1",
            format!(
                "V1 = {:.3} V equals V_R1 + V_R2 = {loop1_drops:.3} V",
                inputs.v1
            ),
            inputs.v1 - loop1_drops,
            0.0,
            config.allowance(2),
        ),
        LawCheck::numeric(
            Law::Kvl,
            "loop2",
            format!(
                "V2 = {:.3} V equals V_R2 - V_R3 = {loop2_drops:.3} V",
                inputs.v2
            ),
            inputs.v2 - loop2_drops,
            0.0,
            config.allowance(2),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::solve;
    use proptest::prelude::*;

    fn series_params(voltage: f64, r1: f64, r2: f64, r3: f64) -> ParameterSet {
        ParameterSet::new()
            .with("voltage", voltage)
            .with("R1", r1)
            .with("R2", r2)
            .with("R3", r3)
    }

    fn mesh_params(v1: f64, v2: f64, r1: f64, r2: f64, r3: f64) -> ParameterSet {
        ParameterSet::new()
            .with("V1", v1)
            .with("V2", v2)
            .with("R1", r1)
            .with("R2", r2)
            .with("R3", r3)
    }

    #[test]
    fn test_series_report() {
        let params = series_params(12.0, 10.0, 20.0, 0.0);
        let results = solve(Topology::Series, &params).unwrap();
        let report = verify(Topology::Series, &params, &results).unwrap();

        assert_eq!(report.len(), 2);
        assert_eq!(report.checks()[0].law, Law::Kcl);
        assert!(report.checks()[0].structural);
        assert_eq!(report.checks()[0].computed, results.exact(I_TOTAL).unwrap());

        let kvl = &report.checks()[1];
        assert_eq!(kvl.law, Law::Kvl);
        assert!((kvl.computed - 12.0).abs() < 1e-9);
        assert_eq!(kvl.expected, 12.0);
        assert!(report.all_satisfied());
    }

    #[test]
    fn test_parallel_report() {
        let params = series_params(12.0, 10.0, 20.0, 0.0);
        let results = solve(Topology::Parallel, &params).unwrap();
        let report = verify(Topology::Parallel, &params, &results).unwrap();

        let kcl = report.find(Law::Kcl, "node").unwrap();
        assert!((kcl.computed - 1.8).abs() < 1e-9);
        assert!(kcl.residual < 1e-9);

        let kvl = report.find(Law::Kvl, "branches").unwrap();
        assert!(kvl.structural);
        assert_eq!(kvl.computed, 12.0);
        assert!(report.all_satisfied());
    }

    #[test]
    fn test_mesh_report_order_and_residuals() {
        let params = mesh_params(12.0, 6.0, 10.0, 20.0, 30.0);
        let results = solve(Topology::TwoMesh, &params).unwrap();
        let report = verify(Topology::TwoMesh, &params, &results).unwrap();

        let subjects: Vec<_> = report.iter().map(|c| (c.law, c.subject.as_str())).collect();
        assert_eq!(
            subjects,
            [(Law::Kcl, "node"), (Law::Kvl, "loop1"), (Law::Kvl, "loop2")]
        );
        for check in report.iter() {
            assert!(check.residual < 1e-6, "{check}");
        }
    }

    #[test]
    fn test_reloaded_results_still_verify() {
        let params = mesh_params(12.0, 6.0, 10.0, 20.0, 30.0);
        let results = solve(Topology::TwoMesh, &params).unwrap();
        let json = serde_json::to_string(&results).unwrap();
        let reloaded: ResultSet = serde_json::from_str(&json).unwrap();

        let report = verify(Topology::TwoMesh, &params, &reloaded).unwrap();
        let kcl = report.find(Law::Kcl, "node").unwrap();
        assert!(kcl.residual > 0.0);
        assert!(report.all_satisfied());
    }

    #[test]
    fn test_inconsistent_results_fail() {
        let params = series_params(12.0, 10.0, 20.0, 0.0);
        let mut results = solve(Topology::Series, &params).unwrap();
        results.insert(V2, 7.0);
        let report = verify(Topology::Series, &params, &results).unwrap();
        assert!(!report.all_satisfied());
        assert!((report.find(Law::Kvl, "loop").unwrap().residual - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_quantity() {
        let params = series_params(12.0, 10.0, 20.0, 0.0);
        let results = ResultSet::new();
        assert!(matches!(
            verify(Topology::Series, &params, &results),
            Err(crate::error::KirchhoffError::MissingQuantity { .. })
        ));
    }

    #[test]
    fn test_allowance_scales_with_terms() {
        let config = VerifierConfig::default();
        assert!((config.allowance(2) - 1e-3).abs() < 1e-9);
        assert!((config.allowance(4) - 2e-3).abs() < 1e-9);
        let strict = VerifierConfig::new().with_tolerance(1e-6);
        assert!((strict.allowance(0) - 1e-6).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn mesh_residuals_near_zero(
            v1 in -100.0_f64..100.0,
            v2 in -100.0_f64..100.0,
            r1 in 0.1_f64..1e3,
            r2 in 0.1_f64..1e3,
            r3 in 0.1_f64..1e3,
        ) {
            let params = mesh_params(v1, v2, r1, r2, r3);
            let results = solve(Topology::TwoMesh, &params).unwrap();
            let report = verify(Topology::TwoMesh, &params, &results).unwrap();
            prop_assert_eq!(report.len(), 3);
            for check in report.iter() {
                prop_assert!(check.residual.abs() < 1e-6);
            }
        }
    }
}
