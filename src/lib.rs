pub mod analyzer;
pub mod cli;
pub mod error;
pub mod http;
pub mod models;
pub mod reporter;
pub mod scanner;
pub mod stimulus;

pub use analyzer::{ExpectationClassifier, PatternScanner, ResponseAnalyzer};
pub use error::TransportError;
pub use models::{
    Expectation, Finding, PatternRule, ProbeReport, ResponseInfo, ScanOutcome, Severity, TestCase,
    TestKind, TestResult,
};
pub use reporter::{ConsoleReporter, HtmlExporter, JsonExporter};
pub use scanner::{
    BoundaryScanner, PasswordResetScanner, RateLimitScanner, SensitiveDataScanner,
    SpecialCharScanner,
};
