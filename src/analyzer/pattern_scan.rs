use regex::Regex;

use crate::models::{Finding, PatternRule, ScanOutcome, Severity};

use super::patterns::SENSITIVE_PATTERNS;

const MATCH_PREVIEW_CHARS: usize = 100;

/// Matches response text against the sensitive-data pattern library. Rules
/// are compiled once at construction and read-only afterwards.
pub struct PatternScanner {
    rules: Vec<CompiledRule>,
}

struct CompiledRule {
    category: &'static str,
    name: &'static str,
    severity: Severity,
    regex: Regex,
}

impl PatternScanner {
    pub fn new() -> Self {
        Self::with_rules(SENSITIVE_PATTERNS)
    }

    pub fn with_rules(rules: &[PatternRule]) -> Self {
        let rules = rules
            .iter()
            .map(|rule| CompiledRule {
                category: rule.category,
                name: rule.name,
                severity: rule.severity,
                regex: Regex::new(rule.pattern).expect("pattern rule compiles"),
            })
            .collect();

        Self { rules }
    }

    /// Scan raw text. Findings come out in rule order, then match order.
    pub fn scan_text(&self, text: &str, endpoint: &str) -> ScanOutcome {
        let mut findings = Vec::new();

        for rule in &self.rules {
            for m in rule.regex.find_iter(text) {
                findings.push(Finding {
                    endpoint: endpoint.to_string(),
                    category: rule.category.to_string(),
                    pattern: rule.name.to_string(),
                    severity: rule.severity,
                    matched: truncate_match(m.as_str()),
                    offset: m.start(),
                });
            }
        }

        ScanOutcome {
            endpoint: endpoint.to_string(),
            findings,
        }
    }

    /// Scan a JSON body. The body is re-serialized canonically (sorted keys,
    /// compact) so verdicts do not depend on the target's JSON encoder; on
    /// parse failure the raw text is scanned as-is.
    pub fn scan_json(&self, raw: &str, endpoint: &str) -> ScanOutcome {
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(value) => self.scan_text(&value.to_string(), endpoint),
            Err(_) => self.scan_text(raw, endpoint),
        }
    }
}

impl Default for PatternScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate_match(text: &str) -> String {
    text.chars().take(MATCH_PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_response() {
        let scanner = PatternScanner::new();
        let body = r#"{"success":true,"data":{"id":"123","name":"John Doe"}}"#;

        let outcome = scanner.scan_json(body, "GET user.profile");
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_exposed_password_is_critical() {
        let scanner = PatternScanner::new();
        let body = r#"{"error":{"details":{"password":"MyPassword123"}}}"#;

        let outcome = scanner.scan_json(body, "POST auth.login");
        assert!(!outcome.is_clean());

        let finding = outcome
            .findings
            .iter()
            .find(|f| f.category == "passwords")
            .expect("password finding");
        assert_eq!(finding.severity, Severity::Critical);
        assert_eq!(finding.pattern, "plaintext_password");
    }

    #[test]
    fn test_exposed_ssn() {
        let scanner = PatternScanner::new();
        let outcome = scanner.scan_json(r#"{"data":{"ssn":"123-45-6789"}}"#, "GET user.details");

        assert!(outcome.findings.iter().any(|f| f.pattern == "ssn"));
        assert_eq!(outcome.max_severity(), Some(Severity::Critical));
    }

    #[test]
    fn test_stack_trace_in_raw_text() {
        let scanner = PatternScanner::new();
        let body = "Error: DB failed\n  at Function (file.ts:123:45)\n  at async Server";

        let outcome = scanner.scan_text(body, "POST loans.submit");
        assert!(outcome.findings.iter().any(|f| f.pattern == "stack_trace"));
        assert_eq!(outcome.max_severity(), Some(Severity::High));
    }

    #[test]
    fn test_non_json_body_degrades_to_raw_scan() {
        let scanner = PatternScanner::new();
        let body = "<html>password = \"hunter2\"</html>";

        let outcome = scanner.scan_json(body, "GET status");
        assert!(outcome.findings.iter().any(|f| f.pattern == "plaintext_password"));
    }

    #[test]
    fn test_scan_is_idempotent() {
        let scanner = PatternScanner::new();
        let body = r#"{"ssn":"123-45-6789","password":"MyPassword123","phone":"(555) 123-4567"}"#;

        let first = scanner.scan_json(body, "GET user.details");
        let second = scanner.scan_json(body, "GET user.details");
        assert_eq!(first.findings, second.findings);
        assert!(!first.is_clean());
    }

    #[test]
    fn test_normalization_is_canonical() {
        let scanner = PatternScanner::new();
        // Same document, different key order and whitespace.
        let spaced = "{ \"b\": 1,\n  \"ssn\": \"123-45-6789\" }";
        let reordered = r#"{"ssn":"123-45-6789","b":1}"#;

        let first = scanner.scan_json(spaced, "ep");
        let second = scanner.scan_json(reordered, "ep");
        assert_eq!(first.findings, second.findings);
    }

    #[test]
    fn test_severity_totals() {
        let scanner = PatternScanner::new();
        let outcome = scanner.scan_json(
            r#"{"password":"x","dateOfBirth":"1990-01-15"}"#,
            "GET user.profile",
        );

        assert!(outcome.count_at(Severity::Critical) >= 1);
        assert!(outcome.count_at(Severity::High) >= 1);
    }
}
