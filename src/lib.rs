//! # Kirchhoff Lab
//!
//! The circuit analysis engine behind the physics virtual lab.
//!
//! This library provides:
//! - A solver for series, parallel and two-mesh DC resistor circuits
//! - A verifier that restates each solution as Kirchhoff's Current and
//!   Voltage Law checks, with the numeric residual behind each one
//! - An append-only, per-user experiment history
//!
//! ## Architecture
//!
//! - [`circuit`] - Topologies, parameter sets and validation
//! - [`solver`] - Closed-form and mesh-analysis solutions
//! - [`verify`] - KCL/KVL conformance reports
//! - [`history`] - Experiment storage (in memory or a JSON file)
//! - [`lab`] - The [`KirchhoffLab`] facade tying them together
//!
//! ## Usage
//!
//! ```
//! use kirchhoff_lab::{KirchhoffLab, MemoryHistory, ParameterSet, Topology};
//!
//! let lab = KirchhoffLab::new(MemoryHistory::new());
//! let params: ParameterSet = "V1=12 V2=6 R1=10 R2=20 R3=30".parse()?;
//!
//! let results = lab.solve(Topology::TwoMesh, &params)?;
//! let report = lab.verify(Topology::TwoMesh, &params, &results)?;
//! assert!(report.all_satisfied());
//!
//! lab.record_experiment(1, Topology::TwoMesh, params, results, report)?;
//! assert_eq!(lab.history(1)?.len(), 1);
//! # Ok::<(), kirchhoff_lab::KirchhoffError>(())
//! ```
//!
//! ### CLI
//!
//! ```bash
//! kirchhoff solve parallel "voltage=6 R1=2 R2=3 R3=6"
//! kirchhoff solve complex "V1=12 V2=6 R1=10 R2=20 R3=30" --record --user 7
//! kirchhoff history --user 7
//! ```

pub mod circuit;
pub mod error;
pub mod history;
pub mod lab;
pub mod solver;
pub mod verify;

// Re-export main types for convenience
pub use circuit::{ParameterSet, Topology};
pub use error::{KirchhoffError, Result};
pub use history::{Experiment, ExperimentHistory, JsonFileHistory, MemoryHistory, UserId};
pub use lab::{KirchhoffLab, LabConfig};
pub use solver::{solve, ResultSet};
pub use verify::{verify, Law, LawCheck, VerificationReport};

/// Default experiment log file name.
pub const DEFAULT_HISTORY_FILE: &str = "virtual_lab.json";
