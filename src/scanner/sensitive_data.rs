use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use serde::Serialize;
use serde_json::{json, Value};

use crate::analyzer::PatternScanner;
use crate::http::HttpClient;
use crate::models::{Finding, ProbeReport, Severity, TestKind, TestResult};
use crate::stimulus::LoanApplication;

/// Scan counters. `total_scans == clean_scans + vulnerable scans` by
/// construction; severity counters tally individual findings.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ScanStats {
    pub total_scans: usize,
    pub clean_scans: usize,
    pub critical_issues: usize,
    pub high_issues: usize,
    pub medium_issues: usize,
    pub low_issues: usize,
}

impl ScanStats {
    pub fn record(&mut self, findings: &[Finding]) {
        self.total_scans += 1;
        if findings.is_empty() {
            self.clean_scans += 1;
            return;
        }
        for finding in findings {
            match finding.severity {
                Severity::Critical => self.critical_issues += 1,
                Severity::High => self.high_issues += 1,
                Severity::Medium => self.medium_issues += 1,
                Severity::Low => self.low_issues += 1,
            }
        }
    }

    pub fn clean_percentage(&self) -> f64 {
        if self.total_scans == 0 {
            return 0.0;
        }
        let pct = 100.0 * self.clean_scans as f64 / self.total_scans as f64;
        (pct * 100.0).round() / 100.0
    }
}

/// Finished run: statistics plus every finding, for the reporters.
#[derive(Debug, Serialize)]
pub struct ExposureRun {
    pub base_url: String,
    pub statistics: ScanStats,
    pub findings: Vec<Finding>,
    pub transport_errors: Vec<String>,
    #[serde(skip)]
    pub report: ProbeReport,
}

impl ExposureRun {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty() && self.transport_errors.is_empty()
    }

    /// Text report, findings ordered by severity (critical first).
    pub fn render_text(&self) -> String {
        let mut report = Vec::new();
        let bar = "=".repeat(80);

        report.push(bar.clone());
        report.push("SENSITIVE DATA EXPOSURE SCAN REPORT".to_string());
        report.push(bar.clone());
        report.push(format!("Generated: {}", Utc::now().to_rfc3339()));
        report.push(String::new());

        report.push("STATISTICS".to_string());
        report.push("-".repeat(40));
        report.push(format!("Total Scans: {}", self.statistics.total_scans));
        report.push(format!(
            "Clean Scans: {} ({}%)",
            self.statistics.clean_scans,
            self.statistics.clean_percentage()
        ));
        report.push(format!("Critical Issues: {}", self.statistics.critical_issues));
        report.push(format!("High Issues: {}", self.statistics.high_issues));
        report.push(format!("Medium Issues: {}", self.statistics.medium_issues));
        report.push(String::new());

        if self.findings.is_empty() {
            report.push("NO SENSITIVE DATA EXPOSURE FOUND".to_string());
        } else {
            report.push("FINDINGS (sorted by severity)".to_string());
            report.push("-".repeat(40));

            let mut sorted = self.findings.clone();
            sorted.sort_by(|a, b| b.severity.cmp(&a.severity).then(a.offset.cmp(&b.offset)));

            for finding in &sorted {
                report.push(String::new());
                report.push(format!(
                    "[{}] {}",
                    finding.severity.label().to_uppercase(),
                    finding.endpoint
                ));
                report.push(format!("  Category: {}", finding.category));
                report.push(format!("  Pattern: {}", finding.pattern));
                report.push(format!("  Match: {}", finding.matched));
                report.push(format!("  Position: {}", finding.offset));
            }
        }

        if !self.transport_errors.is_empty() {
            report.push(String::new());
            report.push("TRANSPORT ERRORS".to_string());
            report.push("-".repeat(40));
            for error in &self.transport_errors {
                report.push(format!("  ✗ {}", error));
            }
        }

        report.push(String::new());
        report.push(bar);
        report.join("\n")
    }
}

/// Fetches a fixed set of endpoints and pattern-scans every response body
/// for leaked credentials, PII, secrets, and internals.
pub struct SensitiveDataScanner {
    client: HttpClient,
    scanner: PatternScanner,
}

impl SensitiveDataScanner {
    pub fn new(base_url: &str, timeout: u64) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(base_url, timeout)?,
            scanner: PatternScanner::new(),
        })
    }

    pub async fn run(self) -> Result<ExposureRun> {
        let mut stats = ScanStats::default();
        let mut findings = Vec::new();
        let mut transport_errors = Vec::new();
        let mut report = ProbeReport::new();

        println!("[*] Scanning API responses for sensitive data exposure...\n");

        for (label, procedure, payload) in Self::probe_targets() {
            let outcome = match payload {
                Some(body) => self.client.post_json(procedure, &body, None).await,
                None => self.client.get(procedure, None).await,
            };

            match outcome {
                Ok(response) => {
                    let scan = self.scanner.scan_json(&response.text, label);
                    stats.record(&scan.findings);

                    if scan.is_clean() {
                        println!("  {} {}: clean", "✓".green(), label);
                    } else {
                        println!(
                            "  {} {}: {} finding(s), worst {}",
                            "✗".red(),
                            label,
                            scan.findings.len(),
                            scan.max_severity()
                                .map(|s| s.label())
                                .unwrap_or("low")
                        );
                    }

                    report.add_result(
                        TestResult::new(
                            label,
                            TestKind::Exposure,
                            procedure,
                            json!(null),
                            "No sensitive data patterns in response",
                            if scan.is_clean() {
                                "clean".to_string()
                            } else {
                                format!("{} finding(s)", scan.findings.len())
                            },
                            scan.is_clean(),
                        )
                        .with_duration(response.duration_ms),
                    );
                    findings.extend(scan.findings);
                }
                Err(e) => {
                    println!("  {} {}: {}", "✗".red(), label, e);
                    transport_errors.push(format!("{}: {}", label, e));
                    report.add_result(
                        TestResult::new(
                            label,
                            TestKind::Exposure,
                            procedure,
                            json!(null),
                            "No sensitive data patterns in response",
                            "transport failure",
                            false,
                        )
                        .with_error(e.to_string()),
                    );
                }
            }
        }

        Ok(ExposureRun {
            base_url: self.client.base_url().to_string(),
            statistics: stats,
            findings,
            transport_errors,
            report,
        })
    }

    /// The fixed probe set: error paths and data-bearing responses most
    /// likely to leak.
    fn probe_targets() -> Vec<(&'static str, &'static str, Option<Value>)> {
        vec![
            (
                "POST auth.login (wrong password)",
                "auth.login",
                Some(json!({
                    "email": "probe@example.com",
                    "password": "WrongPassword123",
                })),
            ),
            (
                "POST auth.login (missing password)",
                "auth.login",
                Some(json!({ "email": "probe@example.com" })),
            ),
            (
                "POST otp.requestCode",
                "otp.requestCode",
                Some(json!({
                    "email": "probe@example.com",
                    "purpose": "login",
                })),
            ),
            (
                "POST otp.resetPasswordWithOTP (invalid code)",
                "otp.resetPasswordWithOTP",
                Some(json!({
                    "email": "probe@example.com",
                    "code": "000000",
                    "newPassword": "ProbePassword123",
                })),
            ),
            (
                "POST loans.submit",
                "loans.submit",
                Some(LoanApplication::baseline("sensitive.probe").to_value()),
            ),
            ("GET loans.search", "loans.search", None),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::PatternScanner;

    #[test]
    fn test_stats_totals() {
        let scanner = PatternScanner::new();
        let mut stats = ScanStats::default();

        let clean = scanner.scan_json(r#"{"success":true}"#, "a");
        stats.record(&clean.findings);

        let dirty = scanner.scan_json(r#"{"password":"MyPassword123"}"#, "b");
        stats.record(&dirty.findings);

        assert_eq!(stats.total_scans, 2);
        assert_eq!(stats.clean_scans, 1);
        assert!(stats.critical_issues >= 1);
        assert_eq!(stats.clean_percentage(), 50.0);
    }

    #[test]
    fn test_clean_percentage_zero_without_scans() {
        let stats = ScanStats::default();
        assert_eq!(stats.clean_percentage(), 0.0);
    }

    #[test]
    fn test_text_report_orders_by_severity() {
        let scanner = PatternScanner::new();
        let mut stats = ScanStats::default();
        let scan = scanner.scan_json(
            r#"{"password":"MyPassword123","dateOfBirth":"1990-01-15","path":"/home/app/dist/server/"}"#,
            "GET user.details",
        );
        stats.record(&scan.findings);

        let run = ExposureRun {
            base_url: "http://localhost:3000".to_string(),
            statistics: stats,
            findings: scan.findings,
            transport_errors: Vec::new(),
            report: ProbeReport::new(),
        };

        let text = run.render_text();
        let critical_at = text.find("[CRITICAL]").expect("critical finding in report");
        let high_at = text.find("[HIGH]").expect("high finding in report");
        assert!(critical_at < high_at);
        assert!(text.contains("SENSITIVE DATA EXPOSURE SCAN REPORT"));
    }

    #[test]
    fn test_probe_targets_are_fixed() {
        let targets = SensitiveDataScanner::probe_targets();
        assert_eq!(targets.len(), 6);
        assert!(targets.iter().any(|(_, p, _)| *p == "loans.search"));
        assert!(targets.iter().filter(|(_, p, _)| *p == "auth.login").count() == 2);
    }
}
