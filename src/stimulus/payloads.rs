//! Fixed special-character payload table. Each case overrides a subset of
//! application fields; unset fields keep the baseline values.

use std::collections::BTreeMap;

use super::LoanApplication;

#[derive(Debug, Clone, Copy)]
pub struct SpecialCharCase {
    pub name: &'static str,
    pub description: &'static str,
    pub full_name: Option<&'static str>,
    pub street: Option<&'static str>,
    pub city: Option<&'static str>,
    pub employer: Option<&'static str>,
    pub loan_purpose: Option<&'static str>,
}

impl SpecialCharCase {
    pub fn apply(&self, app: &mut LoanApplication) {
        for (field, value) in self.overrides() {
            app.set_text_field(field, value);
        }
    }

    /// The overridden fields, keyed by wire name.
    pub fn overrides(&self) -> BTreeMap<&'static str, &'static str> {
        let mut fields = BTreeMap::new();
        if let Some(v) = self.full_name {
            fields.insert("fullName", v);
        }
        if let Some(v) = self.street {
            fields.insert("street", v);
        }
        if let Some(v) = self.city {
            fields.insert("city", v);
        }
        if let Some(v) = self.employer {
            fields.insert("employer", v);
        }
        if let Some(v) = self.loan_purpose {
            fields.insert("loanPurpose", v);
        }
        fields
    }

    pub fn field_tag(&self) -> String {
        self.overrides()
            .keys()
            .copied()
            .collect::<Vec<_>>()
            .join("+")
    }

    pub fn is_injection(&self) -> bool {
        self.name.starts_with("sql_") || self.name.starts_with("xss_")
    }
}

const fn case(name: &'static str, description: &'static str) -> SpecialCharCase {
    SpecialCharCase {
        name,
        description,
        full_name: None,
        street: None,
        city: None,
        employer: None,
        loan_purpose: None,
    }
}

pub const SPECIAL_CHARACTER_CASES: &[SpecialCharCase] = &[
    SpecialCharCase {
        full_name: Some("Jean-Claude François"),
        street: Some("Rue de l'Église"),
        city: Some("Montréal"),
        employer: Some("Société Générale"),
        loan_purpose: Some("Rénovation de maison"),
        ..case("unicode_accents", "Unicode and accented characters")
    },
    SpecialCharCase {
        full_name: Some("Владимир Петровский"),
        street: Some("Улица Ленина 100"),
        city: Some("Москва"),
        employer: Some("Компания Россия"),
        loan_purpose: Some("Расширение бизнеса"),
        ..case("unicode_cyrillic", "Cyrillic characters (Russian)")
    },
    SpecialCharCase {
        full_name: Some("王小明"),
        street: Some("中关村大街 200 号"),
        city: Some("北京"),
        employer: Some("中国公司"),
        loan_purpose: Some("商业扩展和设备购置"),
        ..case("unicode_chinese", "Chinese characters")
    },
    SpecialCharCase {
        full_name: Some("John <Test> Smith"),
        employer: Some("Tech & Associates"),
        street: Some("123 Main Street & Oak Ave"),
        loan_purpose: Some("Home improvement & expansion"),
        ..case("html_special_chars", "HTML special characters")
    },
    SpecialCharCase {
        full_name: Some("Robert'; DROP TABLE--"),
        street: Some("123 Street'; SELECT * FROM"),
        loan_purpose: Some("Loan for 'admin' access"),
        ..case("sql_injection_single_quote", "SQL injection - single quote")
    },
    SpecialCharCase {
        full_name: Some(r#"Robert" OR "1"="1"#),
        loan_purpose: Some(r#"Loan purpose" OR "1"="1"#),
        ..case("sql_injection_double_quote", "SQL injection - double quote")
    },
    SpecialCharCase {
        full_name: Some("Robert; DELETE FROM"),
        loan_purpose: Some("Test; DROP TABLE loans;"),
        ..case("sql_injection_semicolon", "SQL injection - semicolon")
    },
    SpecialCharCase {
        full_name: Some("John<script>alert('XSS')</script>"),
        loan_purpose: Some("Loan <script>alert('test')</script> purpose"),
        ..case("xss_script_tag", "XSS - script tag")
    },
    SpecialCharCase {
        full_name: Some("Test<img src=x onerror=alert('XSS')>"),
        loan_purpose: Some("Purpose<img src=x onerror=alert(1)>"),
        ..case("xss_img_onerror", "XSS - img onerror")
    },
    SpecialCharCase {
        full_name: Some(r#"John" onload="alert('XSS')" x=""#),
        street: Some(r#"Street" onclick="alert(1)" x=""#),
        ..case("xss_event_handler", "XSS - event handler")
    },
    SpecialCharCase {
        full_name: Some("Mary-Ann O'Brien"),
        street: Some("123 Main St., Suite 200"),
        employer: Some("Smith & Associates, Inc."),
        loan_purpose: Some("Home improvement (Phase 1 & 2); Equipment: $5K-$10K"),
        ..case("basic_symbols", "Basic symbols and punctuation")
    },
    SpecialCharCase {
        full_name: Some("Test User"),
        loan_purpose: Some("Equipment purchase ($5000) & expansion (€2000)"),
        ..case("currency_symbols", "Currency symbols")
    },
    SpecialCharCase {
        full_name: Some("Test User"),
        loan_purpose: Some("Phase 1 (±2 weeks) + Phase 2 (±4 weeks) = expansion"),
        ..case("math_operators", "Mathematical operators")
    },
    SpecialCharCase {
        full_name: Some(r#"John "Jack" O'Brien"#),
        employer: Some(r#""Premium" Services Inc."#),
        loan_purpose: Some("Office for 'team' expansion"),
        ..case("quotes_mixed", "Mixed quotes")
    },
    SpecialCharCase {
        full_name: Some("Test User"),
        street: Some("123 Street (rear building) [Section B]"),
        loan_purpose: Some("(Phase 1) - Equipment; [Phase 2] - Expansion {2024}"),
        ..case("parentheses_brackets", "Parentheses and brackets")
    },
    SpecialCharCase {
        full_name: Some("John Doe 🚀"),
        loan_purpose: Some("Expansion ✅ Phase 1, ❌ Phase 2 pending 💰"),
        ..case("emoji", "Emoji characters")
    },
    SpecialCharCase {
        full_name: Some("Jean-Pierre Müller"),
        street: Some("Rue St. Jean, 北京 Street"),
        loan_purpose: Some("Expansion & renovations; Этап 1 ✅"),
        ..case("mixed_unicode", "Mixed Unicode sets")
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_table_is_fixed() {
        assert_eq!(SPECIAL_CHARACTER_CASES.len(), 17);
        let names: Vec<_> = SPECIAL_CHARACTER_CASES.iter().map(|c| c.name).collect();
        assert!(names.contains(&"xss_script_tag"));
        assert!(names.contains(&"unicode_chinese"));
    }

    #[test]
    fn test_apply_overrides_only_named_fields() {
        let case = SPECIAL_CHARACTER_CASES
            .iter()
            .find(|c| c.name == "xss_script_tag")
            .expect("case exists");

        let mut app = LoanApplication::baseline("t");
        case.apply(&mut app);

        assert_eq!(app.full_name, "John<script>alert('XSS')</script>");
        assert!(app.loan_purpose.contains("<script>"));
        assert_eq!(app.city, "Boston");
        assert_eq!(case.field_tag(), "fullName+loanPurpose");
    }

    #[test]
    fn test_injection_tagging() {
        let sql = SPECIAL_CHARACTER_CASES
            .iter()
            .find(|c| c.name == "sql_injection_semicolon")
            .expect("case exists");
        let emoji = SPECIAL_CHARACTER_CASES
            .iter()
            .find(|c| c.name == "emoji")
            .expect("case exists");
        assert!(sql.is_injection());
        assert!(!emoji.is_injection());
    }
}
