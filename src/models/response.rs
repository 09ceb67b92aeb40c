use serde_json::Value;
use std::collections::HashMap;

/// Captured HTTP response. Header names are stored lowercased; the body is
/// kept both raw and, when it parses, as JSON.
#[derive(Debug, Clone)]
pub struct ResponseInfo {
    pub status: u16,
    pub body: Option<Value>,
    pub text: String,
    pub headers: HashMap<String, String>,
    pub duration_ms: u64,
}

impl ResponseInfo {
    pub fn new(
        status: u16,
        text: String,
        headers: HashMap<String, String>,
        duration_ms: u64,
    ) -> Self {
        let body = serde_json::from_str(&text).ok();
        Self {
            status,
            body,
            text,
            headers,
            duration_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn rate_limit_headers(&self) -> HashMap<String, String> {
        self.headers
            .iter()
            .filter(|(k, _)| k.contains("ratelimit"))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("retry-after".to_string(), "30".to_string());
        let response = ResponseInfo::new(429, String::new(), headers, 12);

        assert_eq!(response.header("Retry-After"), Some("30"));
        assert_eq!(response.header("RETRY-AFTER"), Some("30"));
        assert_eq!(response.header("x-missing"), None);
    }

    #[test]
    fn test_body_parse_fallback() {
        let parsed = ResponseInfo::new(200, r#"{"ok":true}"#.to_string(), HashMap::new(), 1);
        assert!(parsed.body.is_some());

        let raw = ResponseInfo::new(200, "<html>oops</html>".to_string(), HashMap::new(), 1);
        assert!(raw.body.is_none());
        assert_eq!(raw.text, "<html>oops</html>");
    }
}
