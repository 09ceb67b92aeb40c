/// Integration tests for report exports: JSON and HTML files are written
/// with the report contents embedded.
use std::fs;

use serde_json::json;

use lendprobe::reporter::{write_text, HtmlExporter, JsonExporter};
use lendprobe::{Finding, PatternScanner, ProbeReport, Severity, TestKind, TestResult};

fn sample_report() -> ProbeReport {
    let mut report = ProbeReport::new();
    report.add_result(
        TestResult::new(
            "fullName at max length (100 chars)",
            TestKind::Length,
            "fullName",
            json!("A"),
            "Accept 100 character string",
            "HTTP 200",
            true,
        )
        .with_duration(42),
    );
    report.add_result(
        TestResult::new(
            "fullName exceeds max length (101 chars)",
            TestKind::Length,
            "fullName",
            json!("A"),
            "Reject 101 character string",
            "HTTP 200",
            false,
        )
        .with_duration(38),
    );
    report
}

fn sample_findings() -> Vec<Finding> {
    let scanner = PatternScanner::new();
    scanner
        .scan_json(r#"{"password":"MyPassword123"}"#, "POST auth.login")
        .findings
}

#[test]
fn json_export_creates_file_with_totals() {
    let path = std::env::temp_dir().join("lendprobe-test-report.json");
    let report = sample_report();

    JsonExporter::export(&report, &path).expect("JSON export should succeed");

    let content = fs::read_to_string(&path).expect("JSON file should exist");
    let parsed: serde_json::Value = serde_json::from_str(&content).expect("valid JSON");

    assert_eq!(parsed["total_tests"], 2);
    assert_eq!(parsed["passed_tests"], 1);
    assert_eq!(parsed["failed_tests"], 1);
    assert!(parsed["scan_time"].is_string());
    assert_eq!(parsed["results"].as_array().map(Vec::len), Some(2));
    assert_eq!(parsed["field_coverage"]["fullName"], 2);

    let _ = fs::remove_file(&path);
}

#[test]
fn html_export_is_self_contained() {
    let path = std::env::temp_dir().join("lendprobe-test-report.html");
    let report = sample_report();
    let findings = sample_findings();

    HtmlExporter::export("Boundary Condition Test Report", &report, &findings, &path)
        .expect("HTML export should succeed");

    let html = fs::read_to_string(&path).expect("HTML file should exist");
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("<style>"), "styling must be inline");
    assert!(html.contains("Boundary Condition Test Report"));
    assert!(html.contains("fullName exceeds max length"));
    assert!(html.contains("FAIL"));
    assert!(html.contains("CRITICAL"));
    assert!(html.contains("plaintext_password"));

    let _ = fs::remove_file(&path);
}

#[test]
fn html_export_without_findings_omits_findings_table() {
    let path = std::env::temp_dir().join("lendprobe-test-clean.html");
    let report = sample_report();

    HtmlExporter::export("Report", &report, &[], &path).expect("HTML export should succeed");

    let html = fs::read_to_string(&path).expect("HTML file should exist");
    assert!(!html.contains("<h2>Findings</h2>"));

    let _ = fs::remove_file(&path);
}

#[test]
fn text_report_roundtrip() {
    let path = std::env::temp_dir().join("lendprobe-test-report.txt");
    write_text("RATE LIMITING API SECURITY ASSESSMENT REPORT\n", &path)
        .expect("text write should succeed");

    let content = fs::read_to_string(&path).expect("text file should exist");
    assert!(content.contains("ASSESSMENT REPORT"));

    let _ = fs::remove_file(&path);
}

#[test]
fn findings_sample_is_critical_passwords() {
    let findings = sample_findings();
    assert!(!findings.is_empty());
    assert!(findings
        .iter()
        .any(|f| f.category == "passwords" && f.severity == Severity::Critical));
}
