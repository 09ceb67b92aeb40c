use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tera::{Context as TeraContext, Tera};

use crate::models::{Finding, ProbeReport, Severity};

pub struct JsonExporter;

impl JsonExporter {
    /// Write any serializable report wrapped with the generation timestamp.
    pub fn export<T: Serialize>(data: &T, path: &Path) -> Result<()> {
        let envelope = ExportEnvelope {
            scan_time: Utc::now().to_rfc3339(),
            data,
        };

        let json = serde_json::to_string_pretty(&envelope)?;
        fs::write(path, json).with_context(|| format!("Failed to write to {}", path.display()))?;
        Ok(())
    }
}

#[derive(Serialize)]
struct ExportEnvelope<'a, T: Serialize> {
    scan_time: String,
    #[serde(flatten)]
    data: &'a T,
}

pub fn write_text(content: &str, path: &Path) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write to {}", path.display()))?;
    Ok(())
}

pub struct HtmlExporter;

impl HtmlExporter {
    pub fn export(
        title: &str,
        report: &ProbeReport,
        findings: &[Finding],
        path: &Path,
    ) -> Result<()> {
        let mut tera = Tera::default();
        tera.add_raw_template("report", &Self::get_template())?;

        let mut context = TeraContext::new();
        context.insert("title", title);
        context.insert(
            "scan_time",
            &Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        );
        context.insert("total_tests", &report.total_tests);
        context.insert("passed_tests", &report.passed_tests);
        context.insert("failed_tests", &report.failed_tests);
        context.insert("pass_rate", &format!("{:.1}", report.pass_rate()));
        context.insert(
            "avg_response_time",
            &format!("{:.2}", report.average_duration_ms()),
        );

        let rows: Vec<HtmlRow> = report
            .results
            .iter()
            .map(|r| HtmlRow {
                test: r.name.clone(),
                field: r.field.clone(),
                kind: r.kind.to_string(),
                expected: r.expected.clone(),
                actual: r.actual.clone(),
                passed: r.passed,
                duration_ms: r.duration_ms,
            })
            .collect();
        context.insert("rows", &rows);

        let finding_rows: Vec<FindingRow> = findings
            .iter()
            .map(|f| FindingRow {
                severity: f.severity.label().to_uppercase(),
                severity_class: f.severity.label().to_string(),
                endpoint: f.endpoint.clone(),
                category: f.category.clone(),
                pattern: f.pattern.clone(),
                matched: f.matched.clone(),
            })
            .collect();
        context.insert("findings", &finding_rows);
        context.insert(
            "critical_count",
            &count_at(findings, Severity::Critical),
        );
        context.insert("high_count", &count_at(findings, Severity::High));
        context.insert("medium_count", &count_at(findings, Severity::Medium));

        let html = tera.render("report", &context)?;
        fs::write(path, html).with_context(|| format!("Failed to write to {}", path.display()))?;
        Ok(())
    }

    fn get_template() -> String {
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #0d1117; color: #c9d1d9; line-height: 1.6; }
        .container { max-width: 1200px; margin: 0 auto; padding: 2rem; }
        h1 { color: #58a6ff; margin-bottom: 0.5rem; }
        h2 { color: #c9d1d9; margin: 2rem 0 1rem; }
        .subtitle { color: #8b949e; margin-bottom: 2rem; }
        .summary { display: grid; grid-template-columns: repeat(auto-fit, minmax(150px, 1fr)); gap: 1rem; margin-bottom: 2rem; }
        .stat { background: #161b22; border: 1px solid #30363d; border-radius: 6px; padding: 1rem; text-align: center; }
        .stat-value { font-size: 2rem; font-weight: bold; }
        .stat-label { color: #8b949e; font-size: 0.875rem; }
        .passed .stat-value { color: #3fb950; }
        .failed .stat-value { color: #f85149; }
        .critical .stat-value { color: #f85149; }
        .high .stat-value { color: #f85149; }
        .medium .stat-value { color: #d29922; }
        table { width: 100%; border-collapse: collapse; background: #161b22; border: 1px solid #30363d; border-radius: 6px; overflow: hidden; }
        th, td { padding: 0.75rem 1rem; text-align: left; border-bottom: 1px solid #30363d; }
        th { background: #21262d; color: #c9d1d9; font-weight: 600; }
        tr:hover { background: #21262d; }
        .verdict { padding: 0.25rem 0.5rem; border-radius: 4px; font-size: 0.75rem; font-weight: 600; }
        .verdict.pass { background: #3fb95033; color: #3fb950; }
        .verdict.fail { background: #f8514933; color: #f85149; }
        .severity { padding: 0.25rem 0.5rem; border-radius: 4px; font-size: 0.75rem; font-weight: 600; }
        .severity.critical { background: #f8514933; color: #f85149; }
        .severity.high { background: #f8514933; color: #f85149; }
        .severity.medium { background: #d2992233; color: #d29922; }
        .severity.low { background: #58a6ff33; color: #58a6ff; }
        .match-preview { font-family: monospace; font-size: 0.8rem; color: #8b949e; }
    </style>
</head>
<body>
    <div class="container">
        <h1>{{ title }}</h1>
        <p class="subtitle">Generated: {{ scan_time }}</p>

        <div class="summary">
            <div class="stat">
                <div class="stat-value">{{ total_tests }}</div>
                <div class="stat-label">Total Tests</div>
            </div>
            <div class="stat passed">
                <div class="stat-value">{{ passed_tests }}</div>
                <div class="stat-label">Passed</div>
            </div>
            <div class="stat failed">
                <div class="stat-value">{{ failed_tests }}</div>
                <div class="stat-label">Failed</div>
            </div>
            <div class="stat">
                <div class="stat-value">{{ pass_rate }}%</div>
                <div class="stat-label">Pass Rate</div>
            </div>
            {% if findings %}
            <div class="stat critical">
                <div class="stat-value">{{ critical_count }}</div>
                <div class="stat-label">Critical</div>
            </div>
            <div class="stat high">
                <div class="stat-value">{{ high_count }}</div>
                <div class="stat-label">High</div>
            </div>
            <div class="stat medium">
                <div class="stat-value">{{ medium_count }}</div>
                <div class="stat-label">Medium</div>
            </div>
            {% endif %}
        </div>

        {% if rows %}
        <h2>Test Results</h2>
        <table>
            <thead>
                <tr>
                    <th>Test</th>
                    <th>Field</th>
                    <th>Kind</th>
                    <th>Expected</th>
                    <th>Actual</th>
                    <th>Status</th>
                    <th>Time (ms)</th>
                </tr>
            </thead>
            <tbody>
                {% for row in rows %}
                <tr>
                    <td>{{ row.test }}</td>
                    <td>{{ row.field }}</td>
                    <td>{{ row.kind }}</td>
                    <td>{{ row.expected }}</td>
                    <td>{{ row.actual }}</td>
                    <td><span class="verdict {% if row.passed %}pass{% else %}fail{% endif %}">{% if row.passed %}PASS{% else %}FAIL{% endif %}</span></td>
                    <td>{{ row.duration_ms }}</td>
                </tr>
                {% endfor %}
            </tbody>
        </table>
        {% endif %}

        {% if findings %}
        <h2>Findings</h2>
        <table>
            <thead>
                <tr>
                    <th>Severity</th>
                    <th>Endpoint</th>
                    <th>Category</th>
                    <th>Pattern</th>
                    <th>Match</th>
                </tr>
            </thead>
            <tbody>
                {% for finding in findings %}
                <tr>
                    <td><span class="severity {{ finding.severity_class }}">{{ finding.severity }}</span></td>
                    <td>{{ finding.endpoint }}</td>
                    <td>{{ finding.category }}</td>
                    <td>{{ finding.pattern }}</td>
                    <td class="match-preview">{{ finding.matched }}</td>
                </tr>
                {% endfor %}
            </tbody>
        </table>
        {% endif %}
    </div>
</body>
</html>"#
            .to_string()
    }
}

fn count_at(findings: &[Finding], severity: Severity) -> usize {
    findings.iter().filter(|f| f.severity == severity).count()
}

#[derive(Serialize)]
struct HtmlRow {
    test: String,
    field: String,
    kind: String,
    expected: String,
    actual: String,
    passed: bool,
    duration_ms: u64,
}

#[derive(Serialize)]
struct FindingRow {
    severity: String,
    severity_class: String,
    endpoint: String,
    category: String,
    pattern: String,
    matched: String,
}
