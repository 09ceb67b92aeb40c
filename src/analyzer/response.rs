//! Response-body analysis for the special-character scanner: escaping
//! checks, injection indicators, and character preservation.

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct EscapingChecks {
    pub angle_brackets_escaped: bool,
    pub ampersand_escaped: bool,
    pub quotes_escaped: bool,
    pub script_tags_removed: bool,
    pub event_handlers_removed: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InjectionChecks {
    pub sql_injection: bool,
    pub xss: bool,
    pub command_injection: bool,
    pub path_traversal: bool,
}

impl InjectionChecks {
    pub fn any(&self) -> bool {
        self.sql_injection || self.xss || self.command_injection || self.path_traversal
    }
}

pub struct ResponseAnalyzer {
    sql_patterns: Vec<Regex>,
    xss_patterns: Vec<Regex>,
    command_patterns: Vec<Regex>,
    traversal_patterns: Vec<Regex>,
    event_handlers: Regex,
}

impl ResponseAnalyzer {
    pub fn new() -> Self {
        // The `[^\\]` tails skip occurrences whose value is a JSON-escaped
        // quote, i.e. handler text held inside a string literal.
        Self {
            sql_patterns: compile(&[
                r"drop\s+table",
                r"delete\s+from",
                r"union\s+select",
                r"exec\s*\(",
            ]),
            xss_patterns: compile(&[
                r"<script>",
                r"onerror\s*=\s*[^\\]",
                r"onclick\s*=\s*[^\\]",
                r"javascript:",
            ]),
            command_patterns: compile(&[r"\|\s*cat", r";\s*rm\s+", r"`[^`]+`", r"\$\([^)]*\)"]),
            traversal_patterns: compile(&[r"\.\./\.\./", r"%2e%2e%2f", r"/etc/passwd"]),
            event_handlers: Regex::new(r"(?i)on(error|click|load)\s*=\s*[^\\]")
                .expect("event handler pattern compiles"),
        }
    }

    /// HTML-escaping posture of a raw response body.
    pub fn escaping(&self, body_text: &str) -> EscapingChecks {
        let has_raw_script =
            body_text.contains("<script>") && !body_text.contains("&lt;script&gt;");

        EscapingChecks {
            angle_brackets_escaped: body_text.contains("&lt;")
                || body_text.contains("\\u003c"),
            ampersand_escaped: body_text.contains("&amp;") || body_text.contains("\\u0026"),
            quotes_escaped: body_text.contains("&quot;")
                || body_text.contains("\\u0022")
                || body_text.contains(r#"\""#),
            script_tags_removed: !has_raw_script,
            event_handlers_removed: !self.event_handlers.is_match(body_text),
        }
    }

    /// Injection indicators over the lowercased body.
    pub fn injection(&self, body_text: &str) -> InjectionChecks {
        let lower = body_text.to_lowercase();

        InjectionChecks {
            sql_injection: self.sql_patterns.iter().any(|re| re.is_match(&lower)),
            xss: self.xss_patterns.iter().any(|re| re.is_match(&lower)),
            command_injection: self.command_patterns.iter().any(|re| re.is_match(&lower)),
            path_traversal: self.traversal_patterns.iter().any(|re| re.is_match(&lower)),
        }
    }

    /// Whether each submitted field came back with its special characters
    /// intact. Fields without special characters check plain containment.
    pub fn preservation(
        &self,
        inputs: &BTreeMap<&'static str, &'static str>,
        body: Option<&Value>,
    ) -> BTreeMap<String, bool> {
        let mut preservation = BTreeMap::new();

        let Some(data) = body.and_then(|b| b.get("data")).and_then(Value::as_object) else {
            return preservation;
        };

        for (field, input) in inputs {
            let Some(echoed) = data.get(*field).and_then(Value::as_str) else {
                continue;
            };

            let special_in = count_special(input);
            let preserved = if special_in > 0 {
                count_special(echoed) > 0
            } else {
                echoed.contains(input)
            };
            preservation.insert((*field).to_string(), preserved);
        }

        preservation
    }

    /// Unique non-ASCII codepoints across the submitted values, as U+XXXX.
    pub fn non_ascii_codepoints<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
        let mut points: Vec<String> = values
            .flat_map(|v| v.chars())
            .filter(|c| (*c as u32) > 127)
            .map(|c| format!("U+{:04X}", c as u32))
            .collect();
        points.sort();
        points.dedup();
        points
    }
}

impl Default for ResponseAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("injection pattern compiles"))
        .collect()
}

fn count_special(text: &str) -> usize {
    text.chars()
        .filter(|c| (*c as u32) > 127 || matches!(c, '<' | '>' | '&' | '"' | '\''))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unescaped_script_tag_is_flagged() {
        let analyzer = ResponseAnalyzer::new();
        let body = r#"{"data":{"fullName":"John<script>alert('XSS')</script>"}}"#;

        let escaping = analyzer.escaping(body);
        assert!(!escaping.script_tags_removed);
        assert!(analyzer.injection(body).xss);
    }

    #[test]
    fn test_escaped_script_tag_is_clean() {
        let analyzer = ResponseAnalyzer::new();
        let body = r#"{"data":{"fullName":"John&lt;script&gt;alert('XSS')&lt;/script&gt;"}}"#;

        let escaping = analyzer.escaping(body);
        assert!(escaping.script_tags_removed);
        assert!(escaping.angle_brackets_escaped);
    }

    #[test]
    fn test_sql_echo_is_detected() {
        let analyzer = ResponseAnalyzer::new();
        let body = r#"{"data":{"fullName":"Robert'; DROP TABLE--"}}"#;

        let injection = analyzer.injection(body);
        assert!(injection.sql_injection);
        assert!(!injection.path_traversal);
    }

    #[test]
    fn test_clean_body() {
        let analyzer = ResponseAnalyzer::new();
        let body = r#"{"success":true,"data":{"fullName":"Mary Smith"}}"#;

        let escaping = analyzer.escaping(body);
        assert!(escaping.script_tags_removed);
        assert!(escaping.event_handlers_removed);
        assert!(!analyzer.injection(body).any());
    }

    #[test]
    fn test_preservation_checks_special_characters() {
        let analyzer = ResponseAnalyzer::new();
        let mut inputs = BTreeMap::new();
        inputs.insert("fullName", "Jean-Claude François");
        inputs.insert("city", "Boston");

        let body = json!({
            "success": true,
            "data": {"fullName": "Jean-Claude François", "city": "Boston"}
        });

        let preservation = analyzer.preservation(&inputs, Some(&body));
        assert_eq!(preservation.get("fullName"), Some(&true));
        assert_eq!(preservation.get("city"), Some(&true));
    }

    #[test]
    fn test_preservation_detects_stripped_characters() {
        let analyzer = ResponseAnalyzer::new();
        let mut inputs = BTreeMap::new();
        inputs.insert("fullName", "王小明");

        let body = json!({"data": {"fullName": "???"}});
        let preservation = analyzer.preservation(&inputs, Some(&body));
        assert_eq!(preservation.get("fullName"), Some(&false));
    }

    #[test]
    fn test_non_ascii_codepoints_are_sorted_unique() {
        let points =
            ResponseAnalyzer::non_ascii_codepoints(["Montréal", "Église"].into_iter());
        assert!(points.contains(&"U+00E9".to_string()));
        assert!(points.contains(&"U+00C9".to_string()));
        let mut sorted = points.clone();
        sorted.sort();
        assert_eq!(points, sorted);
    }
}
