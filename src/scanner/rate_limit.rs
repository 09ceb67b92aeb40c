use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use futures::future::join_all;
use serde::Serialize;
use serde_json::json;
use tokio::sync::Semaphore;
use tokio::time::sleep;

use crate::analyzer::patterns::LEAK_KEYWORDS;
use crate::http::HttpClient;
use crate::models::{ProbeReport, ResponseInfo, TestKind, TestResult};

const SPOOFED_CLIENT_IP: &str = "192.168.1.100";
const TRIGGER_ATTEMPTS: usize = 15;

/// Per-endpoint burst outcome.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointProbe {
    pub endpoint: String,
    pub total_attempts: usize,
    pub rate_limited: usize,
    pub rate_limit_percentage: f64,
    pub avg_response_time_ms: f64,
    pub errors: usize,
    pub violation: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RetryAfterCheck {
    pub triggered: bool,
    pub has_retry_after: bool,
    pub retry_after_value: Option<String>,
    pub rate_limit_headers: BTreeMap<String, String>,
    pub violation: bool,
}

impl RetryAfterCheck {
    /// Pure evaluation of a 429 response's headers.
    pub fn evaluate(response: &ResponseInfo) -> Self {
        let retry_after = response.header("Retry-After").map(str::to_string);
        let rate_limit_headers: BTreeMap<String, String> =
            response.rate_limit_headers().into_iter().collect();
        let has_retry_after = retry_after.is_some();

        Self {
            triggered: true,
            has_retry_after,
            retry_after_value: retry_after,
            rate_limit_headers,
            violation: !has_retry_after,
        }
    }

    pub fn not_triggered() -> Self {
        Self {
            triggered: false,
            has_retry_after: false,
            retry_after_value: None,
            rate_limit_headers: BTreeMap::new(),
            violation: true,
        }
    }
}

/// Assessment rendered into the text/JSON reports.
#[derive(Debug, Default, Serialize)]
pub struct RateLimitAssessment {
    pub base_url: String,
    pub endpoints_tested: Vec<EndpointProbe>,
    pub retry_after: Option<RetryAfterCheck>,
    pub leaked_keywords: Vec<String>,
    pub violations: Vec<String>,
    pub statistics: BTreeMap<String, String>,
}

impl RateLimitAssessment {
    pub fn render_text(&self) -> String {
        let mut report = Vec::new();
        let bar = "=".repeat(70);

        report.push(bar.clone());
        report.push("RATE LIMITING API SECURITY ASSESSMENT REPORT".to_string());
        report.push(bar.clone());
        report.push(String::new());
        report.push(format!("Timestamp: {}", Utc::now().to_rfc3339()));
        report.push(format!("Base URL: {}", self.base_url));

        if !self.endpoints_tested.is_empty() {
            report.push(String::new());
            report.push(format!("Endpoints Tested: {}", self.endpoints_tested.len()));
            for probe in &self.endpoints_tested {
                report.push(format!(
                    "  • {} ({} attempts, {} rate limited)",
                    probe.endpoint, probe.total_attempts, probe.rate_limited
                ));
            }
        }

        report.push(String::new());
        if self.violations.is_empty() {
            report.push("✓ NO VIOLATIONS FOUND".to_string());
        } else {
            report.push(format!("VIOLATIONS FOUND: {}", self.violations.len()));
            for violation in &self.violations {
                report.push(format!("  ✗ {}", violation));
            }
        }

        if !self.statistics.is_empty() {
            report.push(String::new());
            report.push("Statistics:".to_string());
            for (key, value) in &self.statistics {
                report.push(format!("  • {}: {}", key, value));
            }
        }

        report.push(String::new());
        report.push(bar);
        report.join("\n")
    }
}

pub struct RateLimitRun {
    pub report: ProbeReport,
    pub assessment: RateLimitAssessment,
}

/// Probes whether the target enforces rate limiting at all, and whether its
/// 429 responses are well-formed and safe.
pub struct RateLimitScanner {
    client: HttpClient,
    attempts: usize,
    concurrency: usize,
    report: ProbeReport,
    assessment: RateLimitAssessment,
}

impl RateLimitScanner {
    pub fn new(base_url: &str, timeout: u64, attempts: usize, concurrency: usize) -> Result<Self> {
        let client = HttpClient::new(base_url, timeout)?;
        let assessment = RateLimitAssessment {
            base_url: client.base_url().to_string(),
            ..RateLimitAssessment::default()
        };

        Ok(Self {
            client,
            attempts,
            concurrency,
            report: ProbeReport::new(),
            assessment,
        })
    }

    pub async fn run(mut self) -> Result<RateLimitRun> {
        self.login_burst().await;
        self.otp_burst().await;
        self.concurrent_burst().await;
        self.retry_after_check().await;
        self.ip_header_cases().await;
        self.body_safety_check().await;

        Ok(RateLimitRun {
            report: self.report,
            assessment: self.assessment,
        })
    }

    /// Repeated failed logins from one identity must eventually yield 429.
    async fn login_burst(&mut self) {
        println!(
            "\n[*] Testing login rate limiting ({} attempts)...",
            self.attempts
        );

        let payload = json!({
            "email": "ratelimit@test.com",
            "password": "wrongpassword123",
        });

        let mut rate_limited = 0;
        let mut errors = 0;
        let mut durations = Vec::new();

        for attempt in 1..=self.attempts {
            match self.client.post_json("auth.login", &payload, None).await {
                Ok(response) => {
                    durations.push(response.duration_ms);
                    match response.status {
                        429 => {
                            rate_limited += 1;
                            println!(
                                "  [{}] {} Rate limited (429) - {}ms",
                                attempt,
                                "✓".green(),
                                response.duration_ms
                            );
                        }
                        400 | 401 => println!(
                            "  [{}] • Regular response ({}) - {}ms",
                            attempt, response.status, response.duration_ms
                        ),
                        status => println!(
                            "  [{}] ? Unexpected status ({}) - {}ms",
                            attempt, status, response.duration_ms
                        ),
                    }
                }
                Err(e) => {
                    errors += 1;
                    println!("  [{}] {} Error: {}", attempt, "✗".red(), e);
                }
            }
            sleep(Duration::from_millis(100)).await;
        }

        let violation = rate_limited == 0 && self.attempts > 5;
        self.record_burst("auth.login", self.attempts, rate_limited, errors, &durations, violation);
        if violation {
            self.assessment
                .violations
                .push("Login endpoint not properly rate limited".to_string());
        }
    }

    /// OTP issuance should be limited after a few requests.
    async fn otp_burst(&mut self) {
        let attempts = 5;
        println!("\n[*] Testing OTP rate limiting ({} attempts)...", attempts);

        let payload = json!({
            "email": "otp@test.com",
            "purpose": "login",
        });

        let mut rate_limited = 0;
        let mut errors = 0;
        let mut durations = Vec::new();

        for attempt in 1..=attempts {
            match self.client.post_json("otp.requestCode", &payload, None).await {
                Ok(response) => {
                    durations.push(response.duration_ms);
                    match response.status {
                        429 => {
                            rate_limited += 1;
                            println!("  [{}] {} Rate limited (429)", attempt, "✓".green());
                        }
                        200 => println!("  [{}] • OTP sent (200)", attempt),
                        status => println!("  [{}] ? Status: {}", attempt, status),
                    }
                }
                Err(e) => {
                    errors += 1;
                    println!("  [{}] {} Error: {}", attempt, "✗".red(), e);
                }
            }
            sleep(Duration::from_millis(500)).await;
        }

        let violation = rate_limited == 0 && attempts > 3;
        self.record_burst("otp.requestCode", attempts, rate_limited, errors, &durations, violation);
        if violation {
            self.assessment
                .violations
                .push("OTP endpoint not properly rate limited".to_string());
        }
    }

    /// Concurrent requests from one spoofed IP. Workers only append to the
    /// shared counters, serialized by a single lock.
    async fn concurrent_burst(&mut self) {
        let workers = self.concurrency;
        println!("\n[*] Testing concurrent requests ({} workers)...", workers);

        let mut headers = HashMap::new();
        headers.insert("X-Forwarded-For".to_string(), SPOOFED_CLIENT_IP.to_string());

        let shared: Arc<Mutex<BurstState>> = Arc::new(Mutex::new(BurstState::default()));
        let semaphore = Arc::new(Semaphore::new(workers));
        let client = &self.client;

        let futures: Vec<_> = (0..workers)
            .map(|worker| {
                let shared = Arc::clone(&shared);
                let semaphore = Arc::clone(&semaphore);
                let headers = headers.clone();
                async move {
                    let _permit = semaphore.acquire().await.expect("semaphore closed");
                    match client.get("loans.search", Some(&headers)).await {
                        Ok(response) => {
                            let mut state = shared.lock().expect("burst state lock");
                            *state.by_status.entry(response.status).or_insert(0) += 1;
                            state.durations.push(response.duration_ms);
                            drop(state);

                            let marker = match response.status {
                                200 => "✓",
                                429 => "!",
                                _ => "?",
                            };
                            println!(
                                "  [Worker {:2}] {} Status: {} - {}ms",
                                worker, marker, response.status, response.duration_ms
                            );
                        }
                        Err(e) => {
                            let mut state = shared.lock().expect("burst state lock");
                            state.errors += 1;
                            drop(state);
                            println!("  [Worker {:2}] {} Error: {}", worker, "✗".red(), e);
                        }
                    }
                }
            })
            .collect();

        join_all(futures).await;

        let state = shared.lock().expect("burst state lock");
        let rate_limited = state.by_status.get(&429).copied().unwrap_or(0);
        let errors = state.errors;
        let durations = state.durations.clone();
        drop(state);

        let violation = rate_limited == 0 && workers > 5;
        self.record_burst("loans.search", workers, rate_limited, errors, &durations, violation);
        if violation {
            self.assessment
                .violations
                .push("Concurrent requests not properly handled".to_string());
        }
    }

    /// The first 429 must carry a Retry-After header.
    async fn retry_after_check(&mut self) {
        println!("\n[*] Testing Retry-After header in rate limit responses...");

        let mut check = RetryAfterCheck::not_triggered();

        for i in 0..TRIGGER_ATTEMPTS {
            let payload = json!({
                "email": format!("user{}@test.com", i),
                "password": "wrong",
            });

            match self.client.post_json("auth.login", &payload, None).await {
                Ok(response) if response.status == 429 => {
                    check = RetryAfterCheck::evaluate(&response);
                    println!("  {} Rate limit response found", "✓".green());
                    println!("    Retry-After: {:?}", check.retry_after_value);
                    println!(
                        "    Rate-Limit Headers: {}",
                        !check.rate_limit_headers.is_empty()
                    );
                    break;
                }
                Ok(_) => {}
                Err(e) => println!("  {} Error: {}", "✗".red(), e),
            }
            sleep(Duration::from_millis(100)).await;
        }

        let (passed, actual) = if !check.triggered {
            (false, "Could not trigger rate limit response".to_string())
        } else if check.violation {
            (false, "429 without Retry-After header".to_string())
        } else {
            (true, "429 with Retry-After header".to_string())
        };

        if check.violation {
            self.assessment
                .violations
                .push("Rate limit responses missing Retry-After header".to_string());
        }

        self.report.add_result(TestResult::new(
            "429 carries Retry-After header",
            TestKind::Header,
            "auth.login",
            json!(null),
            "Retry-After present on first 429",
            actual,
            passed,
        ));
        self.assessment.retry_after = Some(check);
    }

    /// Spoofed client-identity headers must be handled, not crash on.
    async fn ip_header_cases(&mut self) {
        println!("\n[*] Testing IP header extraction...");

        let cases: &[(&str, &str, &str)] = &[
            ("X-Forwarded-For single IP", "X-Forwarded-For", "192.168.1.100"),
            ("X-Forwarded-For chain", "X-Forwarded-For", "192.168.1.100, 10.0.0.1"),
            ("X-Real-IP", "X-Real-IP", "192.168.1.101"),
            ("CF-Connecting-IP (Cloudflare)", "CF-Connecting-IP", "192.168.1.102"),
        ];

        let payload = json!({
            "email": "test@example.com",
            "successful": false,
        });

        let mut all_passed = true;

        for (name, header, value) in cases {
            let mut headers = HashMap::new();
            headers.insert(header.to_string(), value.to_string());

            let (passed, actual) = match self
                .client
                .post_json("auth.recordAttempt", &payload, Some(&headers))
                .await
            {
                Ok(response) => {
                    let ok = matches!(response.status, 200 | 400);
                    println!(
                        "  {} {}: {}",
                        if ok { "✓" } else { "✗" },
                        name,
                        response.status
                    );
                    (ok, format!("HTTP {}", response.status))
                }
                Err(e) => {
                    println!("  ✗ {}: {}", name, e);
                    (false, format!("transport failure: {}", e))
                }
            };

            all_passed &= passed;
            self.report.add_result(TestResult::new(
                format!("IP header handling: {}", name),
                TestKind::Header,
                "auth.recordAttempt",
                json!({ "header": header, "value": value }),
                "HTTP 200 or 400",
                actual,
                passed,
            ));
        }

        if !all_passed {
            self.assessment
                .violations
                .push("IP header extraction not working properly".to_string());
        }
    }

    /// A 429 body must not leak credentials or internals.
    async fn body_safety_check(&mut self) {
        println!("\n[*] Testing error response safety...");

        let payload = json!({
            "email": "test@example.com",
            "password": "wrong",
        });

        let mut leaked: Option<Vec<String>> = None;
        let mut triggered = false;

        for _ in 0..TRIGGER_ATTEMPTS {
            match self.client.post_json("auth.login", &payload, None).await {
                Ok(response) if response.status == 429 => {
                    triggered = true;
                    let body = response.text.to_lowercase();
                    let found: Vec<String> = LEAK_KEYWORDS
                        .iter()
                        .filter(|kw| body.contains(**kw))
                        .map(|kw| kw.to_string())
                        .collect();

                    if found.is_empty() {
                        println!("  {} Response contains no sensitive data", "✓".green());
                    } else {
                        println!("  {} Found sensitive patterns: {:?}", "✗".red(), found);
                    }
                    leaked = Some(found);
                    break;
                }
                Ok(_) => {}
                Err(e) => println!("  {} Error: {}", "✗".red(), e),
            }
            sleep(Duration::from_millis(50)).await;
        }

        let (passed, actual) = match &leaked {
            Some(found) if found.is_empty() => (true, "429 body clean".to_string()),
            Some(found) => (false, format!("leaked keywords: {}", found.join(", "))),
            None => (false, "Rate limit not triggered".to_string()),
        };

        if !passed {
            self.assessment.violations.push(if triggered {
                "Rate limit error responses may leak sensitive data".to_string()
            } else {
                "Could not trigger rate limit for body safety check".to_string()
            });
        }
        self.assessment.leaked_keywords = leaked.unwrap_or_default();

        self.report.add_result(TestResult::new(
            "429 body safety",
            TestKind::Exposure,
            "auth.login",
            json!(null),
            "No sensitive keywords in 429 body",
            actual,
            passed,
        ));
    }

    fn record_burst(
        &mut self,
        endpoint: &str,
        attempts: usize,
        rate_limited: usize,
        errors: usize,
        durations: &[u64],
        violation: bool,
    ) {
        let avg = if durations.is_empty() {
            0.0
        } else {
            durations.iter().sum::<u64>() as f64 / durations.len() as f64
        };

        self.assessment.endpoints_tested.push(EndpointProbe {
            endpoint: endpoint.to_string(),
            total_attempts: attempts,
            rate_limited,
            rate_limit_percentage: if attempts > 0 {
                rate_limited as f64 / attempts as f64 * 100.0
            } else {
                0.0
            },
            avg_response_time_ms: avg,
            errors,
            violation,
        });
        self.assessment.statistics.insert(
            format!("{} avg response time", endpoint),
            format!("{:.1}ms", avg),
        );

        self.report.add_result(
            TestResult::new(
                format!("{} rate limiting", endpoint),
                TestKind::RateLimit,
                endpoint,
                json!(attempts),
                "At least one 429 across the burst",
                format!("{} of {} requests rate limited", rate_limited, attempts),
                !violation,
            )
            .with_duration(durations.iter().sum()),
        );
    }
}

#[derive(Debug, Default)]
struct BurstState {
    by_status: BTreeMap<u16, usize>,
    durations: Vec<u64>,
    errors: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn response_with_headers(pairs: &[(&str, &str)]) -> ResponseInfo {
        let headers: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ResponseInfo::new(429, "{}".to_string(), headers, 5)
    }

    #[test]
    fn test_retry_after_present() {
        let response = response_with_headers(&[
            ("retry-after", "30"),
            ("x-ratelimit-remaining", "0"),
        ]);
        let check = RetryAfterCheck::evaluate(&response);

        assert!(check.triggered);
        assert!(check.has_retry_after);
        assert!(!check.violation);
        assert_eq!(check.retry_after_value.as_deref(), Some("30"));
        assert!(check.rate_limit_headers.contains_key("x-ratelimit-remaining"));
    }

    #[test]
    fn test_missing_retry_after_is_violation_not_crash() {
        let response = response_with_headers(&[("content-type", "application/json")]);
        let check = RetryAfterCheck::evaluate(&response);

        assert!(check.triggered);
        assert!(!check.has_retry_after);
        assert!(check.violation);
    }

    #[test]
    fn test_leak_keywords_cover_credentials() {
        assert!(LEAK_KEYWORDS.contains(&"password"));
        assert!(LEAK_KEYWORDS.contains(&"database_url"));
        assert!(LEAK_KEYWORDS.contains(&"private_key"));
    }
}
