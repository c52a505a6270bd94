//! Parameter validation.
//!
//! The solver never sees a raw [`ParameterSet`]; it works on the typed
//! inputs produced here, so every divisor it uses has already been checked.

use crate::error::{KirchhoffError, Result};

use super::params::ParameterSet;
use super::types::{SingleSource, Topology, TwoSource, R1, R2, R3, V1, V2, VOLTAGE};

/// Validate a parameter set for the given topology.
///
/// Checks:
/// - All required parameters are present and finite
/// - All resistances are non-negative
/// - Series/parallel R1 and R2 are strictly positive
pub fn validate_parameters(topology: Topology, params: &ParameterSet) -> Result<()> {
    match topology {
        Topology::Series | Topology::Parallel => single_source(params).map(|_| ()),
        Topology::TwoMesh => two_source(params).map(|_| ()),
    }
}

/// Extract validated series/parallel inputs.
pub fn single_source(params: &ParameterSet) -> Result<SingleSource> {
    let voltage = required(params, VOLTAGE)?;
    let r1 = positive_resistance(params, R1)?;
    let r2 = positive_resistance(params, R2)?;

    // Absent R3 means the branch is not there
    let r3 = match params.get(R3) {
        Some(value) => resistance(R3, value)?,
        None => 0.0,
    };

    Ok(SingleSource {
        voltage,
        r1,
        r2,
        r3,
    })
}

/// Extract validated two-mesh inputs.
///
/// Zero resistances are accepted here; whether the mesh equations are
/// solvable is the solver's call.
pub fn two_source(params: &ParameterSet) -> Result<TwoSource> {
    let v1 = required(params, V1)?;
    let v2 = required(params, V2)?;
    let r1 = resistance(R1, required(params, R1)?)?;
    let r2 = resistance(R2, required(params, R2)?)?;
    let r3 = resistance(R3, required(params, R3)?)?;

    Ok(TwoSource { v1, v2, r1, r2, r3 })
}

fn required(params: &ParameterSet, name: &str) -> Result<f64> {
    let value = params
        .get(name)
        .ok_or_else(|| KirchhoffError::invalid_parameter(name, "required parameter is missing"))?;

    if !value.is_finite() {
        return Err(KirchhoffError::invalid_parameter(
            name,
            format!("value {value} is not finite"),
        ));
    }

    Ok(value)
}

fn resistance(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(KirchhoffError::invalid_parameter(
            name,
            format!("resistance {value} is not finite"),
        ));
    }
    if value < 0.0 {
        return Err(KirchhoffError::invalid_parameter(
            name,
            format!("resistance {value} must not be negative"),
        ));
    }
    Ok(value)
}

fn positive_resistance(params: &ParameterSet, name: &str) -> Result<f64> {
    let value = resistance(name, required(params, name)?)?;
    if value == 0.0 {
        return Err(KirchhoffError::invalid_parameter(
            name,
            "resistance must be greater than zero",
        ));
    }
    Ok(value)
}
