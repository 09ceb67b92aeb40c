use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn numeric_value(&self) -> u8 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
            Severity::Critical => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One entry of the static pattern library: (name, expression, severity),
/// grouped under a category. Compiled once at scanner construction.
#[derive(Debug, Clone, Copy)]
pub struct PatternRule {
    pub category: &'static str,
    pub name: &'static str,
    pub pattern: &'static str,
    pub severity: Severity,
}

/// A single regex match against response text. Carries no timestamp so that
/// scanning the same text twice yields identical findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub endpoint: String,
    pub category: String,
    pub pattern: String,
    pub severity: Severity,
    pub matched: String,
    pub offset: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    pub endpoint: String,
    pub findings: Vec<Finding>,
}

impl ScanOutcome {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn count_at(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }

    pub fn max_severity(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }
}
