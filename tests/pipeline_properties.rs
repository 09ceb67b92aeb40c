/// End-to-end properties of the stimulus → classifier → aggregator pipeline,
/// exercised with synthetic responses.
use std::collections::HashMap;

use serde_json::json;

use lendprobe::stimulus::{
    exact_length_string, over_length_string, LoanApplication, LENGTH_LIMITS, NUMERIC_BOUNDARIES,
};
use lendprobe::{
    Expectation, ExpectationClassifier, ProbeReport, ResponseInfo, TestCase, TestKind,
};

fn response(status: u16) -> Result<ResponseInfo, lendprobe::TransportError> {
    Ok(ResponseInfo::new(status, String::new(), HashMap::new(), 5))
}

fn length_case(field: &str, max_length: usize, at_limit: bool) -> TestCase {
    let value = if at_limit {
        exact_length_string(max_length)
    } else {
        over_length_string(max_length)
    };
    let mut app = LoanApplication::baseline("pipeline");
    app.set_text_field(field, &value);

    let expectation = if at_limit {
        Expectation::accepted(format!("Accept {} character string", value.len()))
    } else {
        Expectation::rejected(format!("Reject {} character string", value.len()))
    };

    TestCase {
        name: format!("{} length {}", field, value.len()),
        endpoint: "loans.submit",
        kind: TestKind::Length,
        field: field.to_string(),
        input: json!(value),
        payload: app.to_value(),
        expectation,
    }
}

#[test]
fn length_limit_verdicts_follow_declared_limits() {
    // A compliant target accepts length L and rejects L+1.
    for (field, max_length) in LENGTH_LIMITS {
        let at_max = length_case(field, *max_length, true);
        let result = ExpectationClassifier::classify(&at_max, &response(200));
        assert!(result.passed, "{} at limit should classify as accept", field);

        let over = length_case(field, *max_length, false);
        let result = ExpectationClassifier::classify(&over, &response(422));
        assert!(result.passed, "{} over limit should classify as reject", field);

        // A target that accepts the over-limit string is a failure.
        let result = ExpectationClassifier::classify(&over, &response(200));
        assert!(!result.passed);
    }
}

#[test]
fn numeric_verdicts_match_declared_table() {
    for boundary in NUMERIC_BOUNDARIES {
        let expectation = if boundary.should_pass {
            Expectation::accepted(format!("Accept value {}", boundary.value))
        } else {
            Expectation::rejected(format!("Reject value {}", boundary.value))
        };
        let case = TestCase {
            name: format!("{} with value {}", boundary.field, boundary.value),
            endpoint: "loans.submit",
            kind: TestKind::Numeric,
            field: boundary.field.to_string(),
            input: json!(boundary.value),
            payload: json!({}),
            expectation,
        };

        // The compliant status per declared expectation.
        let compliant = if boundary.should_pass { 200 } else { 400 };
        let result = ExpectationClassifier::classify(&case, &response(compliant));
        assert!(
            result.passed,
            "{} = {} should match its declared expectation",
            boundary.field, boundary.value
        );
    }
}

#[test]
fn aggregated_pipeline_report_keeps_invariants() {
    let mut report = ProbeReport::new();

    for (field, max_length) in LENGTH_LIMITS {
        let case = length_case(field, *max_length, true);
        report.add_result(ExpectationClassifier::classify(&case, &response(200)));
        let case = length_case(field, *max_length, false);
        report.add_result(ExpectationClassifier::classify(&case, &response(422)));

        assert_eq!(report.passed_tests + report.failed_tests, report.total_tests);
    }

    assert_eq!(report.total_tests, LENGTH_LIMITS.len() * 2);
    assert_eq!(report.pass_rate(), 100.0);

    let covered: usize = report.field_coverage.values().sum();
    assert_eq!(covered, report.total_tests);
    assert_eq!(report.kind_coverage["length"], report.total_tests);
}
