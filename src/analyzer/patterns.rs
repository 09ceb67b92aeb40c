//! Static sensitive-data pattern library. Severity is baked into each rule;
//! anything not worth a named rule would default to low.

use crate::models::{PatternRule, Severity};

const fn rule(
    category: &'static str,
    name: &'static str,
    pattern: &'static str,
    severity: Severity,
) -> PatternRule {
    PatternRule {
        category,
        name,
        pattern,
        severity,
    }
}

pub const SENSITIVE_PATTERNS: &[PatternRule] = &[
    // passwords
    rule(
        "passwords",
        "plaintext_password",
        r#"(?i)password["']?\s*[:=]\s*["'][^"']*["']"#,
        Severity::Critical,
    ),
    rule(
        "passwords",
        "plaintext_password",
        r#"(?i)pwd["']?\s*[:=]\s*["'][^"']*["']"#,
        Severity::Critical,
    ),
    rule(
        "passwords",
        "plaintext_password",
        r#"(?i)pass\s*[:=]\s*["'][^"']*["']"#,
        Severity::Critical,
    ),
    rule(
        "passwords",
        "old_password",
        r#"(?i)oldPassword["']?\s*[:=]\s*["'][^"']*["']"#,
        Severity::Critical,
    ),
    rule(
        "passwords",
        "old_password",
        r"(?i)previous.*password",
        Severity::Critical,
    ),
    // tokens
    rule(
        "tokens",
        "jwt_token",
        r"(?i)bearer\s+eyJ[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+",
        Severity::Critical,
    ),
    rule(
        "tokens",
        "jwt_token",
        r#"(?i)token["']?\s*[:=]\s*"?eyJ[A-Za-z0-9_-]+"#,
        Severity::Critical,
    ),
    rule(
        "tokens",
        "session_id",
        r#"(?i)session["']?\s*[:=]\s*["'][a-f0-9]{32,}["']"#,
        Severity::Critical,
    ),
    rule(
        "tokens",
        "session_id",
        r#"(?i)app_session_id["']?\s*[:=]\s*["']"#,
        Severity::Critical,
    ),
    rule(
        "tokens",
        "api_key",
        r#"(?i)api[_-]?key["']?\s*[:=]\s*["'][^"']{20,}["']"#,
        Severity::Critical,
    ),
    // pii
    rule("pii", "ssn", r"\d{3}-\d{2}-\d{4}", Severity::Critical),
    rule(
        "pii",
        "ssn",
        r#"(?i)ssn["']?\s*[:=]\s*["'][0-9]+-[0-9]+-[0-9]+["']"#,
        Severity::Critical,
    ),
    rule(
        "pii",
        "bank_account",
        r#"(?i)bankAccount["']?\s*[:=]\s*["'][0-9]{10,}["']"#,
        Severity::Critical,
    ),
    rule(
        "pii",
        "bank_account",
        r#"(?i)accountNumber["']?\s*[:=]\s*["'][0-9]{10,}["']"#,
        Severity::Critical,
    ),
    rule(
        "pii",
        "credit_card",
        r"\d{4}[-\s]?\d{4}[-\s]?\d{4}[-\s]?\d{4}",
        Severity::Critical,
    ),
    rule(
        "pii",
        "credit_card",
        r#"(?i)cardNumber["']?\s*[:=]\s*["'][0-9]{13,19}["']"#,
        Severity::Critical,
    ),
    rule(
        "pii",
        "phone",
        r#"(?i)phone["']?\s*[:=]\s*["']\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}["']"#,
        Severity::High,
    ),
    rule(
        "pii",
        "dob",
        r#"(?i)dateOfBirth["']?\s*[:=]\s*["']([0-9]{4}-[0-9]{2}-[0-9]{2}|[0-9]{1,2}/[0-9]{1,2}/[0-9]{4})["']"#,
        Severity::High,
    ),
    // secrets
    rule(
        "secrets",
        "database_url",
        r#"(?i)database[_-]?url["']?\s*[:=]\s*["'][^"']*user=[^"']*["']"#,
        Severity::Critical,
    ),
    rule(
        "secrets",
        "database_url",
        r"(?i)(postgresql|mysql|mongodb)://[^\s]*:[^\s]*@",
        Severity::Critical,
    ),
    rule("secrets", "aws_credentials", r"AKIA[0-9A-Z]{16}", Severity::Critical),
    rule(
        "secrets",
        "aws_credentials",
        r#"(?i)aws[_-]?secret["']?\s*[:=]"#,
        Severity::Critical,
    ),
    // internal
    rule(
        "internal",
        "stack_trace",
        r"at\s+\w+\s+\([^)]*:\d+:\d+\)",
        Severity::High,
    ),
    rule(
        "internal",
        "stack_trace",
        r"Error:\s+.*\n\s+at\s+",
        Severity::High,
    ),
    rule("internal", "file_path", r"/home/\w+/.*/server/", Severity::Medium),
    rule(
        "internal",
        "file_path",
        r"C:\\Users\\.*\\server\\",
        Severity::Medium,
    ),
    rule(
        "internal",
        "sql_query",
        r"(?i)SELECT\s+.*\s+FROM\s+\w+.*WHERE",
        Severity::High,
    ),
    rule(
        "internal",
        "sql_query",
        r"(?i)INSERT\s+INTO\s+.*VALUES",
        Severity::High,
    ),
];

/// Keywords that must not appear in a rate-limit error body.
pub const LEAK_KEYWORDS: &[&str] = &[
    "password",
    "token",
    "secret",
    "api_key",
    "database_url",
    "jwt",
    "session",
    "auth",
    "credential",
    "private_key",
];
