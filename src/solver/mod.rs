//! Circuit solver.
//!
//! Maps a topology and parameter set to a [`ResultSet`]. Series and
//! parallel circuits have closed-form solutions; the two-mesh circuit is
//! solved by mesh analysis, a 2x2 linear system built from KVL around
//! each mesh:
//!
//! ```text
//! [ R1+R2   -R2  ] [ I1 ]   [  V1 ]
//! [ -R2    R2+R3 ] [ I2 ] = [ -V2 ]
//! ```
//!
//! Every published value is rounded to [`PRECISION`] decimals with
//! round-half-away-from-zero, so identical inputs give bit-identical
//! results.

mod mesh;
mod parallel;
mod results;
mod series;

pub use mesh::MeshMatrix;
pub use results::ResultSet;

use tracing::debug;

use crate::circuit::{single_source, two_source, ParameterSet, Topology};
use crate::error::Result;

/// Decimal places kept in published results.
pub const PRECISION: i32 = 3;

/// Relative determinant threshold below which the mesh system is singular.
pub const DEFAULT_SINGULAR_EPSILON: f64 = 1e-9;

/// Result quantity names.
pub mod quantity {
    pub const R_TOTAL: &str = "R_total";
    pub const I_TOTAL: &str = "I_total";
    pub const P_TOTAL: &str = "P_total";
    /// Series: per-resistor voltages.
    pub const V1: &str = "V1";
    pub const V2: &str = "V2";
    pub const V3: &str = "V3";
    /// Parallel: per-branch currents. Two-mesh: mesh currents.
    pub const I1: &str = "I1";
    pub const I2: &str = "I2";
    pub const I3: &str = "I3";
    /// Two-mesh branch currents.
    pub const I_R1: &str = "I_R1";
    pub const I_R2: &str = "I_R2";
    pub const I_R3: &str = "I_R3";
    /// Two-mesh branch voltages.
    pub const V_R1: &str = "V_R1";
    pub const V_R2: &str = "V_R2";
    pub const V_R3: &str = "V_R3";
}

/// Configuration for the solver.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// `|det| <= singular_epsilon * scale^2` marks the mesh system singular.
    pub singular_epsilon: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            singular_epsilon: DEFAULT_SINGULAR_EPSILON,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the relative singularity threshold.
    pub fn with_singular_epsilon(mut self, singular_epsilon: f64) -> Self {
        self.singular_epsilon = singular_epsilon;
        self
    }
}

/// Solve a circuit with the default configuration.
pub fn solve(topology: Topology, params: &ParameterSet) -> Result<ResultSet> {
    solve_with(topology, params, &SolverConfig::default())
}

/// Solve a circuit.
///
/// Parameters are fully validated before any arithmetic, so a failed
/// solve never exposes partial results.
pub fn solve_with(
    topology: Topology,
    params: &ParameterSet,
    config: &SolverConfig,
) -> Result<ResultSet> {
    debug!(%topology, %params, "solving circuit");

    let results = match topology {
        Topology::Series => series::solve(&single_source(params)?),
        Topology::Parallel => parallel::solve(&single_source(params)?),
        Topology::TwoMesh => mesh::solve(&two_source(params)?, config.singular_epsilon)?,
    };

    results.ensure_finite()?;
    debug!(%topology, quantities = results.len(), "circuit solved");
    Ok(results)
}

/// Round to [`PRECISION`] decimals, half away from zero.
///
/// Ties are judged on the exact binary value, so `1.0005` (stored as
/// slightly less than 1.0005) rounds down. Magnitudes too large to scale
/// have no fractional digits and pass through unchanged.
pub fn round_to_precision(value: f64) -> f64 {
    let scale = 10f64.powi(PRECISION);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }

    // Exact remainder of the scaling multiplication
    let error = value.mul_add(scale, -scaled);
    let whole = if (scaled - scaled.trunc()).abs() == 0.5
        && error != 0.0
        && error.signum() != scaled.signum()
    {
        scaled.trunc()
    } else {
        scaled.round()
    };

    let rounded = whole / scale;
    // Avoid publishing -0.0
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
