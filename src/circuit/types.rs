//! Core types for circuit description.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KirchhoffError;

/// Source EMF for series and parallel circuits.
pub const VOLTAGE: &str = "voltage";
/// First resistor.
pub const R1: &str = "R1";
/// Second resistor (the shared branch in a two-mesh circuit).
pub const R2: &str = "R2";
/// Third resistor (optional branch in series/parallel circuits).
pub const R3: &str = "R3";
/// Source EMF of the first mesh.
pub const V1: &str = "V1";
/// Source EMF of the second mesh.
pub const V2: &str = "V2";

/// The wiring pattern of a circuit.
///
/// The set is closed: each topology selects a fixed set of formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// One source driving R1, R2 and optionally R3 end to end.
    Series,
    /// One source driving R1, R2 and optionally R3 side by side.
    Parallel,
    /// Two sources in two meshes sharing R2.
    #[serde(rename = "complex", alias = "two_mesh")]
    TwoMesh,
}

impl Topology {
    /// Parameters the solver cannot run without.
    pub fn required_parameters(&self) -> &'static [&'static str] {
        match self {
            Topology::Series | Topology::Parallel => &[VOLTAGE, R1, R2],
            Topology::TwoMesh => &[V1, V2, R1, R2, R3],
        }
    }

    /// Parameters the solver reads when present.
    pub fn optional_parameters(&self) -> &'static [&'static str] {
        match self {
            Topology::Series | Topology::Parallel => &[R3],
            Topology::TwoMesh => &[],
        }
    }

    /// Name used in stored experiment logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Topology::Series => "series",
            Topology::Parallel => "parallel",
            Topology::TwoMesh => "complex",
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topology {
    type Err = KirchhoffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "series" => Ok(Topology::Series),
            "parallel" => Ok(Topology::Parallel),
            "complex" | "two_mesh" | "two-mesh" | "twomesh" | "mesh" => Ok(Topology::TwoMesh),
            _ => Err(KirchhoffError::UnknownTopology {
                name: s.to_string(),
            }),
        }
    }
}

/// Validated inputs for a single-source circuit (series or parallel).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleSource {
    /// Source EMF in volts.
    pub voltage: f64,
    /// Resistances in ohms. `r3` is zero when the branch is absent.
    pub r1: f64,
    pub r2: f64,
    pub r3: f64,
}

impl SingleSource {
    /// Whether the optional third branch is part of the circuit.
    pub fn has_r3(&self) -> bool {
        self.r3 > 0.0
    }

    /// Resistances in order R1, R2, R3.
    pub fn resistances(&self) -> [f64; 3] {
        [self.r1, self.r2, self.r3]
    }
}

/// Validated inputs for a two-mesh circuit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoSource {
    /// Source EMF driving mesh 1, in volts.
    pub v1: f64,
    /// Source EMF driving mesh 2, in volts.
    pub v2: f64,
    /// R1 belongs to mesh 1 only.
    pub r1: f64,
    /// R2 is shared by both meshes.
    pub r2: f64,
    /// R3 belongs to mesh 2 only.
    pub r3: f64,
}
