//! Named parameter sets.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{KirchhoffError, Result};

/// Component values keyed by parameter name (`voltage`, `R1`, ...).
///
/// Serializes as a plain JSON object so stored experiment logs stay
/// readable by other tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet {
    values: BTreeMap<String, f64>,
}

impl ParameterSet {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.set(name, value);
        self
    }

    /// Insert or replace a value.
    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Look up a value by name.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}

/// Parses `name=value` pairs separated by commas or whitespace,
/// e.g. `voltage=12, R1=10, R2=4.7k`.
impl FromStr for ParameterSet {
    type Err = KirchhoffError;

    fn from_str(s: &str) -> Result<Self> {
        let mut params = ParameterSet::new();

        // Whitespace around '=' belongs to the pair, not between pairs
        let text = s.split('=').map(str::trim).collect::<Vec<_>>().join("=");

        for pair in text.split(|c: char| c == ',' || c.is_whitespace()) {
            if pair.is_empty() {
                continue;
            }

            let (name, value) = pair
                .split_once('=')
                .ok_or_else(|| KirchhoffError::parameter_parse(pair, "expected name=value"))?;

            let name = name.trim();
            if name.is_empty() {
                return Err(KirchhoffError::parameter_parse(pair, "empty parameter name"));
            }

            let value = parse_value(value)
                .ok_or_else(|| KirchhoffError::parameter_parse(pair, "value is not a number"))?;

            params.set(name, value);
        }

        Ok(params)
    }
}

/// Parse a number string with optional SI suffix (`4.7k`, `220m`).
pub fn parse_value(text: &str) -> Option<f64> {
    let text = text.trim();
    let last = text.chars().last()?;

    let multiplier = match last {
        'p' => 1e-12,
        'n' => 1e-9,
        'u' | 'µ' => 1e-6,
        'm' => 1e-3,
        'k' | 'K' => 1e3,
        'M' => 1e6,
        'G' => 1e9,
        _ => 1.0,
    };

    let num_str = if multiplier != 1.0 {
        &text[..text.len() - last.len_utf8()]
    } else {
        text
    };

    num_str.parse::<f64>().ok().map(|v| v * multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_value() {
        assert_relative_eq!(parse_value("10k").unwrap(), 10_000.0);
        assert_relative_eq!(parse_value("4.7u").unwrap(), 4.7e-6);
        assert_relative_eq!(parse_value("220m").unwrap(), 0.22);
        assert_relative_eq!(parse_value("1M").unwrap(), 1_000_000.0);
        assert_relative_eq!(parse_value("12").unwrap(), 12.0);
        assert_relative_eq!(parse_value("1e-3").unwrap(), 1e-3);
        assert!(parse_value("").is_none());
        assert!(parse_value("ohm").is_none());
    }

    #[test]
    fn test_parse_parameter_set() {
        let params: ParameterSet = "voltage=12, R1=10 R2=4.7k".parse().unwrap();
        assert_eq!(params.len(), 3);
        assert_eq!(params.get("voltage"), Some(12.0));
        assert_eq!(params.get("R1"), Some(10.0));
        assert_relative_eq!(params.get("R2").unwrap(), 4700.0);
        assert_eq!(params.get("R3"), None);
    }

    #[test]
    fn test_parse_spaces_around_equals() {
        let params: ParameterSet = "R1 = 10, R2 =4.7k voltage= 12".parse().unwrap();
        assert_eq!(params.len(), 3);
        assert_eq!(params.get("R1"), Some(10.0));
        assert_relative_eq!(params.get("R2").unwrap(), 4700.0);
        assert_eq!(params.get("voltage"), Some(12.0));

        assert!(matches!(
            "R1 = ".parse::<ParameterSet>(),
            Err(KirchhoffError::ParameterParse { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_malformed_pairs() {
        assert!(matches!(
            "voltage".parse::<ParameterSet>(),
            Err(KirchhoffError::ParameterParse { .. })
        ));
        assert!(matches!(
            "R1=ten".parse::<ParameterSet>(),
            Err(KirchhoffError::ParameterParse { .. })
        ));
        assert!(matches!(
            "=5".parse::<ParameterSet>(),
            Err(KirchhoffError::ParameterParse { .. })
        ));
    }

    #[test]
    fn test_json_shape() {
        let params = ParameterSet::new().with("R1", 10.0).with("voltage", 12.0);
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(json, r#"{"R1":10.0,"voltage":12.0}"#);
        let back: ParameterSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}
