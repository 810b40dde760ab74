//! Error types for license handling.

use thiserror::Error;

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;

/// Reasons a license fails to load or verify.
///
/// None of these are fatal to the process: a failed verification simply
/// leaves the entitlement in the trial state.
#[derive(Debug, Error)]
pub enum LicenseError {
    #[error("cannot read license file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed license JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid public key: {0}")]
    InvalidKey(String),

    #[error("signature is not valid base64: {0}")]
    BadEncoding(#[from] base64::DecodeError),

    #[error("signature verification failed")]
    BadSignature,

    #[error("edition {0:?} is not licensed for Pro features")]
    WrongEdition(String),

    #[error("license expired on {0}")]
    Expired(String),
}
