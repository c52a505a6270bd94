//! Verification report types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which conservation law a check certifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Law {
    /// Kirchhoff's Current Law: current into a node equals current out.
    Kcl,
    /// Kirchhoff's Voltage Law: drops around a loop equal its EMFs.
    Kvl,
}

impl fmt::Display for Law {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Law::Kcl => write!(f, "KCL"),
            Law::Kvl => write!(f, "KVL"),
        }
    }
}

/// One law-conformance statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LawCheck {
    pub law: Law,
    /// Node or loop the check applies to (`node`, `loop1`, ...).
    pub subject: String,
    /// Human-readable statement of what was checked.
    pub statement: String,
    /// Left-hand side as computed from the results.
    pub computed: f64,
    /// Right-hand side the law demands.
    pub expected: f64,
    /// Absolute discrepancy between the two sides.
    pub residual: f64,
    /// True when the law holds by construction of the topology.
    pub structural: bool,
    pub satisfied: bool,
}

impl LawCheck {
    /// A numeric check; `satisfied` is decided against `allowance`.
    pub fn numeric(
        law: Law,
        subject: impl Into<String>,
        statement: impl Into<String>,
        computed: f64,
        expected: f64,
        allowance: f64,
    ) -> Self {
        let residual = (computed - expected).abs();
        Self {
            law,
            subject: subject.into(),
            statement: statement.into(),
            computed,
            expected,
            residual,
            structural: false,
            satisfied: residual <= allowance,
        }
    }

    /// A check that holds because of how the circuit is wired.
    pub fn structural(
        law: Law,
        subject: impl Into<String>,
        statement: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            law,
            subject: subject.into(),
            statement: statement.into(),
            computed: value,
            expected: value,
            residual: 0.0,
            structural: true,
            satisfied: true,
        }
    }
}

impl fmt::Display for LawCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.satisfied { "ok" } else { "FAIL" };
        write!(f, "[{}] {} {}: {}", mark, self.law, self.subject, self.statement)?;
        if !self.structural {
            write!(f, " (residual {:.3e})", self.residual)?;
        }
        Ok(())
    }
}

/// Ordered law checks: all KCL statements, then all KVL statements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationReport {
    checks: Vec<LawCheck>,
}

impl VerificationReport {
    /// Build a report, ordering KCL statements before KVL ones.
    ///
    /// The sort is stable, so checks of the same law keep their order.
    pub fn new(mut checks: Vec<LawCheck>) -> Self {
        checks.sort_by_key(|c| c.law == Law::Kvl);
        Self { checks }
    }

    pub fn checks(&self) -> &[LawCheck] {
        &self.checks
    }

    pub fn iter(&self) -> impl Iterator<Item = &LawCheck> {
        self.checks.iter()
    }

    /// Checks for one law, in report order.
    pub fn by_law(&self, law: Law) -> impl Iterator<Item = &LawCheck> {
        self.checks.iter().filter(move |c| c.law == law)
    }

    /// Find a check by law and subject.
    pub fn find(&self, law: Law, subject: &str) -> Option<&LawCheck> {
        self.checks
            .iter()
            .find(|c| c.law == law && c.subject == subject)
    }

    /// Whether every check passed.
    pub fn all_satisfied(&self) -> bool {
        self.checks.iter().all(|c| c.satisfied)
    }

    /// Largest residual in the report.
    pub fn max_residual(&self) -> f64 {
        self.checks.iter().fold(0.0, |acc, c| acc.max(c.residual))
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, check) in self.checks.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{check}")?;
        }
        Ok(())
    }
}
