mod boundary;
mod password_reset;
mod rate_limit;
mod sensitive_data;
mod special_chars;

pub use boundary::BoundaryScanner;
pub use password_reset::PasswordResetScanner;
pub use rate_limit::{EndpointProbe, RateLimitAssessment, RateLimitRun, RateLimitScanner, RetryAfterCheck};
pub use sensitive_data::{ExposureRun, ScanStats, SensitiveDataScanner};
pub use special_chars::{CharCaseResult, SpecialCharScanner, SpecialCharsRun};
