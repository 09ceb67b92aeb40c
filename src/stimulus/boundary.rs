//! Deterministic boundary stimuli: exact-length strings, numeric limit
//! tables, format samples, and enum value tables. Same output every run.

pub fn exact_length_string(length: usize) -> String {
    "A".repeat(length)
}

pub fn over_length_string(length: usize) -> String {
    "A".repeat(length + 1)
}

/// Declared maximum lengths of the free-text application fields.
pub const LENGTH_LIMITS: &[(&str, usize)] = &[
    ("fullName", 100),
    ("street", 255),
    ("city", 100),
    ("employer", 100),
    ("loanPurpose", 500),
];

#[derive(Debug, Clone, Copy)]
pub struct NumericBoundary {
    pub field: &'static str,
    pub value: i64,
    pub should_pass: bool,
}

pub const NUMERIC_BOUNDARIES: &[NumericBoundary] = &[
    NumericBoundary { field: "monthlyIncome", value: 1, should_pass: true },
    NumericBoundary { field: "monthlyIncome", value: 0, should_pass: false },
    NumericBoundary { field: "monthlyIncome", value: -1000, should_pass: false },
    NumericBoundary { field: "monthlyIncome", value: 999_999, should_pass: true },
    NumericBoundary { field: "requestedAmount", value: 1, should_pass: true },
    NumericBoundary { field: "requestedAmount", value: 0, should_pass: false },
    NumericBoundary { field: "requestedAmount", value: -50_000, should_pass: false },
    NumericBoundary { field: "requestedAmount", value: 10_000_000, should_pass: true },
];

#[derive(Debug, Clone, Copy)]
pub struct FormatCheck {
    pub field: &'static str,
    pub pattern: &'static str,
    pub conformant: &'static str,
    pub non_conformant: &'static str,
}

pub const FORMAT_CHECKS: &[FormatCheck] = &[
    FormatCheck {
        field: "email",
        pattern: r"^[\w.-]+@[\w.-]+\.\w+$",
        conformant: "test@example.com",
        non_conformant: "invalid-email",
    },
    FormatCheck {
        field: "ssn",
        pattern: r"^\d{3}-\d{2}-\d{4}$",
        conformant: "123-45-6789",
        non_conformant: "123456789",
    },
    FormatCheck {
        field: "dateOfBirth",
        pattern: r"^\d{4}-\d{2}-\d{2}$",
        conformant: "1990-01-15",
        non_conformant: "01/15/1990",
    },
    FormatCheck {
        field: "state",
        pattern: r"^[A-Z]{2}$",
        conformant: "TX",
        non_conformant: "Texas",
    },
    FormatCheck {
        field: "zipCode",
        pattern: r"^\d{5}$",
        conformant: "12345",
        non_conformant: "1234",
    },
    FormatCheck {
        field: "phone",
        pattern: r"^\d{10}$",
        conformant: "1234567890",
        non_conformant: "555-123-4567",
    },
];

/// Declared valid values of the enum fields; each is expected accepted.
pub const ENUM_FIELDS: &[(&str, &[&str])] = &[
    (
        "employmentStatus",
        &["employed", "self_employed", "unemployed", "retired"],
    ),
    ("loanType", &["installment", "short_term"]),
    (
        "disbursementMethod",
        &["bank_transfer", "check", "debit_card", "paypal", "crypto"],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_exact_and_over_lengths() {
        assert_eq!(exact_length_string(100).len(), 100);
        assert_eq!(over_length_string(100).len(), 101);
        assert_eq!(exact_length_string(0), "");
    }

    #[test]
    fn test_format_samples_agree_with_their_patterns() {
        for check in FORMAT_CHECKS {
            let regex = Regex::new(check.pattern).expect("format pattern compiles");
            assert!(
                regex.is_match(check.conformant),
                "{} conformant sample should match",
                check.field
            );
            assert!(
                !regex.is_match(check.non_conformant),
                "{} non-conformant sample should not match",
                check.field
            );
        }
    }

    #[test]
    fn test_numeric_table_covers_both_fields() {
        let income: Vec<_> = NUMERIC_BOUNDARIES
            .iter()
            .filter(|b| b.field == "monthlyIncome")
            .collect();
        assert_eq!(income.len(), 4);
        assert!(income.iter().any(|b| b.value == 0 && !b.should_pass));
        assert!(income.iter().any(|b| b.value == 1 && b.should_pass));
    }
}
