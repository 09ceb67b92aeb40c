use colored::Colorize;
use tabled::{Table, Tabled, settings::{Style, Modify, object::Rows, Alignment}};

use crate::models::{Finding, ProbeReport, Severity};

pub struct ConsoleReporter;

#[derive(Tabled)]
struct TableRow {
    #[tabled(rename = "Test")]
    test: String,
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Expected")]
    expected: String,
    #[tabled(rename = "Actual")]
    actual: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn print_results(&self, report: &ProbeReport) {
        if report.results.is_empty() {
            return;
        }

        let rows: Vec<TableRow> = report
            .results
            .iter()
            .map(|r| TableRow {
                test: r.name.clone(),
                field: r.field.clone(),
                kind: r.kind.to_string(),
                expected: r.expected.clone(),
                actual: r.actual.clone(),
                status: if r.passed {
                    "PASS".green().to_string()
                } else {
                    "FAIL".red().bold().to_string()
                },
            })
            .collect();

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()))
            .to_string();

        println!("\n{}", table);
    }

    pub fn print_summary(&self, title: &str, report: &ProbeReport) {
        println!("\n{}", "=".repeat(60));
        println!("{}", format!("{} SUMMARY", title).bold());
        println!("{}", "=".repeat(60));
        println!("Total Tests: {}", report.total_tests);
        println!("Passed: {}", report.passed_tests.to_string().green());
        println!("Failed: {}", report.failed_tests.to_string().red());
        println!("Pass Rate: {:.1}%", report.pass_rate());
        println!("Average Response Time: {:.2}ms", report.average_duration_ms());

        if !report.field_coverage.is_empty() {
            println!("\n[*] Field Coverage:");
            for (field, count) in &report.field_coverage {
                println!("  - {}: {} tests", field, count);
            }
        }

        if !report.kind_coverage.is_empty() {
            println!("\n[*] Test Type Coverage:");
            for (kind, count) in &report.kind_coverage {
                println!("  - {}: {} tests", kind, count);
            }
        }
        println!();
    }

    /// Findings grouped by severity, worst first.
    pub fn print_findings(&self, findings: &[Finding]) {
        if findings.is_empty() {
            println!("\n{}", "No sensitive data exposure found.".green());
            return;
        }

        println!("\n{}", "Findings".bold().underline());

        for severity in [
            Severity::Critical,
            Severity::High,
            Severity::Medium,
            Severity::Low,
        ] {
            for finding in findings.iter().filter(|f| f.severity == severity) {
                println!(
                    "\n[{}] {}",
                    Self::severity_str(severity),
                    finding.endpoint.white().bold()
                );
                println!(
                    "  → {}: {} at offset {}",
                    finding.category.yellow(),
                    finding.pattern,
                    finding.offset
                );
                println!("    Match: {}", finding.matched);
            }
        }
    }

    fn severity_str(severity: Severity) -> String {
        match severity {
            Severity::Critical => "CRITICAL".red().bold().to_string(),
            Severity::High => "HIGH".red().to_string(),
            Severity::Medium => "MEDIUM".yellow().to_string(),
            Severity::Low => "LOW".blue().to_string(),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
