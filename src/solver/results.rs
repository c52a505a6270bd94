//! Solver output.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{KirchhoffError, Result};

use super::round_to_precision;

/// One derived quantity: the value as computed and as published.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Quantity {
    exact: f64,
    rounded: f64,
}

/// Derived quantities keyed by name (`I_total`, `V_R2`, ...).
///
/// Published values are rounded to three decimals. The full-precision
/// values are kept alongside so law checks can certify the solver itself
/// rather than the rounding. Only rounded values are serialized; a result
/// set loaded from JSON treats them as exact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct ResultSet {
    values: BTreeMap<String, Quantity>,
}

impl ResultSet {
    /// Create an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a full-precision value; the published value is derived from it.
    pub fn insert(&mut self, name: impl Into<String>, exact: f64) {
        self.values.insert(
            name.into(),
            Quantity {
                exact,
                rounded: round_to_precision(exact),
            },
        );
    }

    /// Published (rounded) value.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).map(|q| q.rounded)
    }

    /// Full-precision value.
    pub fn exact(&self, name: &str) -> Option<f64> {
        self.values.get(name).map(|q| q.exact)
    }

    /// Full-precision value, or [`KirchhoffError::MissingQuantity`].
    pub fn require(&self, name: &str) -> Result<f64> {
        self.exact(name)
            .ok_or_else(|| KirchhoffError::missing_quantity(name))
    }

    /// Iterate over `(name, rounded value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, q)| (k.as_str(), q.rounded))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fail if any quantity is NaN or infinite.
    pub(crate) fn ensure_finite(&self) -> Result<()> {
        for (name, q) in &self.values {
            if let Some(value) = [q.exact, q.rounded].into_iter().find(|v| !v.is_finite()) {
                return Err(KirchhoffError::NumericalOverflow {
                    quantity: name.clone(),
                    value,
                });
            }
        }
        Ok(())
    }
}

impl From<BTreeMap<String, f64>> for ResultSet {
    fn from(map: BTreeMap<String, f64>) -> Self {
        let values = map
            .into_iter()
            .map(|(name, value)| {
                let rounded = round_to_precision(value);
                (
                    name,
                    Quantity {
                        exact: rounded,
                        rounded,
                    },
                )
            })
            .collect();
        Self { values }
    }
}

impl From<ResultSet> for BTreeMap<String, f64> {
    fn from(results: ResultSet) -> Self {
        results
            .values
            .into_iter()
            .map(|(name, q)| (name, q.rounded))
            .collect()
    }
}

impl fmt::Display for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{name:>8} = {value:.3}")?;
        }
        Ok(())
    }
}
