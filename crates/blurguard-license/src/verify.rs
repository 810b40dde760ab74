//! Signature and policy checks for license records.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rsa::pkcs8::DecodePublicKey;
use rsa::{Pkcs1v15Sign, RsaPublicKey};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{LicenseError, LicenseResult};
use crate::record::LicenseRecord;

/// Public half of the BlurGuard signing key. The private half never ships.
pub const BUILTIN_PUBLIC_KEY_PEM: &str = "-----BEGIN PUBLIC KEY-----
MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEAqjWVO7YKF6nUAGLzUs6i
2yN5TAprMLLlMDMaDGGNQwDWG2q7K2+KZWRd2tBRhx+zF49J98XM0sPQa5Q5E9Uv
W1Qq6nS7zJk2iba+KDOZUaecN0Ym7M5ng9Ms08DQ2rO7Pn2HtEB0MWHC54MNDVOS
tPjyQfl++VlTXilFTp1WAykFIUmpKgpOHC11k4xP2ApARMbz5MVdjt+ga+8/U7W4
3kKJ8XC/81ahe1VSSOFqP/u6GKE0OPpL4NRzxw0qPaSDJx99FaQoy3GRbhUJr6ST
thG5zU9QkzT6xAC+HQA5JPayaupWXkAAaRaoLw6wtDb0w9upcYvffSjVTQa1Dgsw
HwIDAQAB
-----END PUBLIC KEY-----
";

/// Verifies license records against a fixed RSA public key.
pub struct LicenseVerifier {
    key: RsaPublicKey,
}

impl LicenseVerifier {
    /// Verifier bound to the embedded BlurGuard public key.
    pub fn builtin() -> LicenseResult<Self> {
        Self::with_public_key_pem(BUILTIN_PUBLIC_KEY_PEM)
    }

    /// Verifier for an explicit SPKI public key PEM. Used by tests and for
    /// key rotation.
    pub fn with_public_key_pem(pem: &str) -> LicenseResult<Self> {
        let key = RsaPublicKey::from_public_key_pem(pem)
            .map_err(|e| LicenseError::InvalidKey(e.to_string()))?;
        Ok(Self { key })
    }

    /// Read, parse and verify a license file.
    pub fn verify_file(&self, path: &Path) -> LicenseResult<LicenseRecord> {
        let json = std::fs::read_to_string(path)?;
        let record: LicenseRecord = serde_json::from_str(&json)?;
        self.verify_record(&record)?;
        Ok(record)
    }

    /// Verify signature, edition and expiry of a parsed record.
    pub fn verify_record(&self, record: &LicenseRecord) -> LicenseResult<()> {
        let sig = STANDARD.decode(&record.sig)?;
        let digest = Sha256::digest(record.payload().as_bytes());
        self.key
            .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, &sig)
            .map_err(|_| LicenseError::BadSignature)?;

        if !record.edition.eq_ignore_ascii_case("pro") {
            return Err(LicenseError::WrongEdition(record.edition.clone()));
        }

        // An expiry that does not parse is not a rejection; only a date that
        // parses and lies strictly in the past invalidates the license.
        if let Some(expiry) = parse_expiry(&record.expires) {
            if expiry < Utc::now() {
                return Err(LicenseError::Expired(record.expires.clone()));
            }
        } else {
            debug!(expires = %record.expires, "unparseable expiry, skipping expiry check");
        }

        Ok(())
    }
}

/// Parse an expiry string as `YYYY-MM-DD` (midnight UTC) or RFC 3339.
fn parse_expiry(expires: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(expires, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(expires)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
