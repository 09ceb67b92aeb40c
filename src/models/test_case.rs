use serde_json::Value;

use super::TestKind;

/// One stimulus plus its expected outcome. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: String,
    pub endpoint: &'static str,
    pub kind: TestKind,
    pub field: String,
    /// The interesting value under test, for reporting.
    pub input: Value,
    /// The full request body sent to the endpoint.
    pub payload: Value,
    pub expectation: Expectation,
}

/// The set of status codes that count as the expected outcome.
#[derive(Debug, Clone)]
pub struct Expectation {
    pub statuses: Vec<u16>,
    pub description: String,
}

impl Expectation {
    pub fn accepted(description: impl Into<String>) -> Self {
        Self {
            statuses: vec![200, 201],
            description: description.into(),
        }
    }

    pub fn rejected(description: impl Into<String>) -> Self {
        Self {
            statuses: vec![400, 422],
            description: description.into(),
        }
    }

    pub fn statuses(statuses: &[u16], description: impl Into<String>) -> Self {
        Self {
            statuses: statuses.to_vec(),
            description: description.into(),
        }
    }

    pub fn verdict(&self, status: u16) -> bool {
        self.statuses.contains(&status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_statuses() {
        let expectation = Expectation::rejected("Reject 101 character string");
        assert!(expectation.verdict(400));
        assert!(expectation.verdict(422));
        assert!(!expectation.verdict(200));
    }

    #[test]
    fn test_custom_statuses() {
        let expectation = Expectation::statuses(&[400, 404], "Reject invalid code");
        assert!(expectation.verdict(404));
        assert!(!expectation.verdict(422));
    }
}
