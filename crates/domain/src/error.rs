use crate::setting::ValueType;

/// Shared error type used across all TenantCore crates.
///
/// Nothing in this workspace retries or recovers internally. Every variant
/// propagates unchanged to the caller, which owns retry policy and the
/// mapping to protocol-level status codes.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The OS entropy source could not supply the requested bytes. Fatal;
    /// there is no weaker fallback source.
    #[error("entropy source: {0}")]
    Entropy(String),

    #[error("persistence: {0}")]
    Persistence(String),

    /// Covers missing, revoked, and expired sessions alike so that an
    /// unauthenticated caller cannot tell them apart.
    #[error("session not found")]
    SessionNotFound,

    #[error("setting '{key}' holds a {actual} value, not {expected}")]
    TypeMismatch {
        key: String,
        expected: ValueType,
        actual: ValueType,
    },

    #[error("invalid session status: {0}")]
    InvalidStatus(String),

    #[error("invalid setting value type: {0}")]
    InvalidValueType(String),

    #[error("config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
