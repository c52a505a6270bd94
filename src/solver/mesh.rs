//! Two-mesh circuit analysis.

use tracing::warn;

use crate::circuit::TwoSource;
use crate::error::{KirchhoffError, Result};

use super::quantity::{I1, I2, I_R1, I_R2, I_R3, P_TOTAL, V_R1, V_R2, V_R3};
use super::ResultSet;

/// Mesh equations `A i = z` for two meshes sharing R2.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshMatrix {
    /// Resistance matrix A (row-major)
    pub a: [[f64; 2]; 2],
    /// Source vector z
    pub z: [f64; 2],
}

impl MeshMatrix {
    /// Assemble the mesh equations.
    ///
    /// Mesh 1 sees R1 and R2, mesh 2 sees R2 and R3; the shared R2
    /// couples them with `-R2` off the diagonal. V2 opposes the
    /// clockwise mesh-2 current, hence `-V2`.
    pub fn new(inputs: &TwoSource) -> Self {
        Self {
            a: [
                [inputs.r1 + inputs.r2, -inputs.r2],
                [-inputs.r2, inputs.r2 + inputs.r3],
            ],
            z: [inputs.v1, -inputs.v2],
        }
    }

    /// Determinant of A.
    pub fn determinant(&self) -> f64 {
        self.a[0][0] * self.a[1][1] - self.a[0][1] * self.a[1][0]
    }

    /// Largest absolute entry of A.
    pub fn scale(&self) -> f64 {
        self.a
            .iter()
            .flatten()
            .fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }

    /// Whether A is singular relative to its own scale.
    pub fn is_singular(&self, epsilon: f64) -> bool {
        let scale = self.scale();
        scale == 0.0 || self.determinant().abs() <= epsilon * scale * scale
    }

    /// Solve for the mesh currents `[I1, I2]` by Cramer's rule.
    pub fn solve(&self, epsilon: f64) -> Result<[f64; 2]> {
        if self.is_singular(epsilon) {
            return Err(KirchhoffError::singular());
        }

        let det = self.determinant();
        let [[a, b], [c, d]] = self.a;
        let [z1, z2] = self.z;

        Ok([(z1 * d - b * z2) / det, (a * z2 - c * z1) / det])
    }
}

/// Solve a two-mesh circuit.
pub(super) fn solve(inputs: &TwoSource, epsilon: f64) -> Result<ResultSet> {
    let matrix = MeshMatrix::new(inputs);

    let [i1, i2] = matrix.solve(epsilon).inspect_err(|_| {
        warn!(
            determinant = matrix.determinant(),
            scale = matrix.scale(),
            "mesh system is singular"
        );
    })?;

    // R2 carries the net of both mesh currents
    let i_r1 = i1;
    let i_r2 = i1 - i2;
    let i_r3 = i2;

    let mut results = ResultSet::new();
    results.insert(I1, i1);
    results.insert(I2, i2);
    results.insert(I_R1, i_r1);
    results.insert(I_R2, i_r2);
    results.insert(I_R3, i_r3);
    results.insert(V_R1, i_r1 * inputs.r1);
    results.insert(V_R2, i_r2 * inputs.r2);
    results.insert(V_R3, i_r3 * inputs.r3);
    results.insert(P_TOTAL, inputs.v1 * i1 + inputs.v2 * i2);
    Ok(results)
}
