//! Series circuit: one current through every element.

use crate::circuit::SingleSource;

use super::quantity::{I_TOTAL, P_TOTAL, R_TOTAL, V1, V2, V3};
use super::ResultSet;

/// Solve a series circuit.
///
/// `R_total = R1 + R2 + R3`, `I_total = V / R_total`, `V_k = I_total * R_k`.
/// Validation guarantees `R1 > 0`, so `R_total` is a safe divisor.
pub(super) fn solve(inputs: &SingleSource) -> ResultSet {
    let r_total = inputs.r1 + inputs.r2 + inputs.r3;
    let i_total = inputs.voltage / r_total;

    let mut results = ResultSet::new();
    results.insert(R_TOTAL, r_total);
    results.insert(I_TOTAL, i_total);
    results.insert(V1, i_total * inputs.r1);
    results.insert(V2, i_total * inputs.r2);
    results.insert(V3, i_total * inputs.r3);
    results.insert(P_TOTAL, inputs.voltage * i_total);
    results
}
