//! Circuit description and parameter validation.
//!
//! A circuit is a [`Topology`] plus a [`ParameterSet`] of named component
//! values. Validation turns the loosely-typed parameter map into the typed
//! inputs ([`SingleSource`], [`TwoSource`]) the solver consumes.

mod params;
mod types;
mod validate;

pub use params::{parse_value, ParameterSet};
pub use types::*;
pub use validate::{single_source, two_source, validate_parameters};
