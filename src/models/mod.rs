mod finding;
mod response;
mod result;
mod test_case;

pub use finding::{Finding, PatternRule, ScanOutcome, Severity};
pub use response::ResponseInfo;
pub use result::{ProbeReport, TestKind, TestResult};
pub use test_case::{Expectation, TestCase};
