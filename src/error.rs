use thiserror::Error;

/// Failure of a single outbound request. Callers convert these into failed
/// test results; a transport error never aborts the remaining test cases.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("network error: {0}")]
    Network(String),
}
