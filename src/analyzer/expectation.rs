use crate::error::TransportError;
use crate::models::{ResponseInfo, TestCase, TestResult};

/// Turns a transport outcome into a pass/fail result by checking the actual
/// status against the case's expected status set. A transport failure is a
/// failed result, never an abort.
pub struct ExpectationClassifier;

impl ExpectationClassifier {
    pub fn classify(
        case: &TestCase,
        outcome: &Result<ResponseInfo, TransportError>,
    ) -> TestResult {
        match outcome {
            Ok(response) => {
                let passed = case.expectation.verdict(response.status);
                TestResult::from_case(case, format!("HTTP {}", response.status), passed)
                    .with_duration(response.duration_ms)
            }
            Err(err) => TestResult::from_case(case, "transport failure", false)
                .with_error(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Expectation, TestKind};
    use serde_json::json;
    use std::collections::HashMap;

    fn case(expectation: Expectation) -> TestCase {
        TestCase {
            name: "fullName exceeds max length".to_string(),
            endpoint: "loans.submit",
            kind: TestKind::Length,
            field: "fullName".to_string(),
            input: json!("A"),
            payload: json!({}),
            expectation,
        }
    }

    fn response(status: u16) -> Result<ResponseInfo, TransportError> {
        Ok(ResponseInfo::new(status, String::new(), HashMap::new(), 25))
    }

    #[test]
    fn test_expected_rejection_passes() {
        let case = case(Expectation::rejected("Reject 101 character string"));
        let result = ExpectationClassifier::classify(&case, &response(422));
        assert!(result.passed);
        assert_eq!(result.actual, "HTTP 422");
        assert_eq!(result.duration_ms, 25);
    }

    #[test]
    fn test_unexpected_acceptance_fails() {
        let case = case(Expectation::rejected("Reject 101 character string"));
        let result = ExpectationClassifier::classify(&case, &response(200));
        assert!(!result.passed);
    }

    #[test]
    fn test_transport_error_becomes_failed_result() {
        let case = case(Expectation::accepted("Accept 100 character string"));
        let outcome = Err(TransportError::Timeout(5));
        let result = ExpectationClassifier::classify(&case, &outcome);

        assert!(!result.passed);
        assert_eq!(result.actual, "transport failure");
        assert_eq!(result.error.as_deref(), Some("request timed out after 5s"));
    }
}
