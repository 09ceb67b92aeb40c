use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::TestCase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    Length,
    Numeric,
    Format,
    Enum,
    Validation,
    RateLimit,
    Header,
    Exposure,
    Encoding,
    Injection,
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TestKind::Length => "length",
            TestKind::Numeric => "numeric",
            TestKind::Format => "format",
            TestKind::Enum => "enum",
            TestKind::Validation => "validation",
            TestKind::RateLimit => "rate_limit",
            TestKind::Header => "header",
            TestKind::Exposure => "exposure",
            TestKind::Encoding => "encoding",
            TestKind::Injection => "injection",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of one executed test case. Created once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub kind: TestKind,
    pub field: String,
    pub input: serde_json::Value,
    pub expected: String,
    pub actual: String,
    pub passed: bool,
    pub error: Option<String>,
    pub duration_ms: u64,
    pub timestamp: DateTime<Utc>,
}

impl TestResult {
    pub fn new(
        name: impl Into<String>,
        kind: TestKind,
        field: impl Into<String>,
        input: serde_json::Value,
        expected: impl Into<String>,
        actual: impl Into<String>,
        passed: bool,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            field: field.into(),
            input,
            expected: expected.into(),
            actual: actual.into(),
            passed,
            error: None,
            duration_ms: 0,
            timestamp: Utc::now(),
        }
    }

    pub fn from_case(case: &TestCase, actual: impl Into<String>, passed: bool) -> Self {
        Self::new(
            case.name.clone(),
            case.kind,
            case.field.clone(),
            case.input.clone(),
            case.expectation.description.clone(),
            actual,
            passed,
        )
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Accumulated run report. `total_tests == passed_tests + failed_tests`
/// holds after every `add_result`.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ProbeReport {
    pub total_tests: usize,
    pub passed_tests: usize,
    pub failed_tests: usize,
    pub field_coverage: BTreeMap<String, usize>,
    pub kind_coverage: BTreeMap<String, usize>,
    pub total_duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl ProbeReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_result(&mut self, result: TestResult) {
        self.total_tests += 1;
        if result.passed {
            self.passed_tests += 1;
        } else {
            self.failed_tests += 1;
        }
        *self.field_coverage.entry(result.field.clone()).or_insert(0) += 1;
        *self.kind_coverage.entry(result.kind.to_string()).or_insert(0) += 1;
        self.total_duration_ms += result.duration_ms;
        self.results.push(result);
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total_tests == 0 {
            return 0.0;
        }
        (self.passed_tests as f64 / self.total_tests as f64) * 100.0
    }

    pub fn average_duration_ms(&self) -> f64 {
        if self.total_tests == 0 {
            return 0.0;
        }
        self.total_duration_ms as f64 / self.total_tests as f64
    }

    pub fn is_clean(&self) -> bool {
        self.failed_tests == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(field: &str, passed: bool) -> TestResult {
        TestResult::new(
            format!("{} check", field),
            TestKind::Length,
            field,
            json!("AAAA"),
            "Accept",
            if passed { "Accepted" } else { "Rejected" },
            passed,
        )
        .with_duration(10)
    }

    #[test]
    fn test_totals_invariant_after_every_add() {
        let mut report = ProbeReport::new();
        for (i, passed) in [true, false, true, true, false].iter().enumerate() {
            report.add_result(result(&format!("field{}", i), *passed));
            assert_eq!(
                report.passed_tests + report.failed_tests,
                report.total_tests
            );
        }
        assert_eq!(report.total_tests, 5);
        assert_eq!(report.passed_tests, 3);
        assert_eq!(report.failed_tests, 2);
    }

    #[test]
    fn test_field_coverage_sums_to_total() {
        let mut report = ProbeReport::new();
        report.add_result(result("fullName", true));
        report.add_result(result("fullName", false));
        report.add_result(result("street", true));

        let covered: usize = report.field_coverage.values().sum();
        assert_eq!(covered, report.total_tests);
        assert_eq!(report.field_coverage["fullName"], 2);
        assert_eq!(report.field_coverage["street"], 1);
    }

    #[test]
    fn test_pass_rate_zero_when_empty() {
        let report = ProbeReport::new();
        assert_eq!(report.pass_rate(), 0.0);
        assert_eq!(report.average_duration_ms(), 0.0);
    }

    #[test]
    fn test_pass_rate_ratio() {
        let mut report = ProbeReport::new();
        report.add_result(result("a", true));
        report.add_result(result("b", true));
        report.add_result(result("c", false));
        report.add_result(result("d", false));
        assert_eq!(report.pass_rate(), 50.0);
        assert_eq!(report.average_duration_ms(), 10.0);
    }
}
