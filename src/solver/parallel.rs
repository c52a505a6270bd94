//! Parallel circuit: the source voltage across every branch.

use crate::circuit::SingleSource;

use super::quantity::{I1, I2, I3, I_TOTAL, P_TOTAL, R_TOTAL};
use super::ResultSet;

/// Solve a parallel circuit.
///
/// Each present branch contributes conductance `1/R_k`; an absent R3
/// (zero) carries no current and adds no conductance.
pub(super) fn solve(inputs: &SingleSource) -> ResultSet {
    let branch_current = |r: f64| if r > 0.0 { inputs.voltage / r } else { 0.0 };

    let conductance: f64 = inputs
        .resistances()
        .iter()
        .filter(|&&r| r > 0.0)
        .map(|r| 1.0 / r)
        .sum();
    let r_total = 1.0 / conductance;
    let i_total = inputs.voltage / r_total;

    let mut results = ResultSet::new();
    results.insert(R_TOTAL, r_total);
    results.insert(I1, branch_current(inputs.r1));
    results.insert(I2, branch_current(inputs.r2));
    results.insert(I3, branch_current(inputs.r3));
    results.insert(I_TOTAL, i_total);
    results.insert(P_TOTAL, inputs.voltage * i_total);
    results
}
