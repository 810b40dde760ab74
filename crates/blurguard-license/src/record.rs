//! The on-disk license record.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{LicenseError, LicenseResult};

/// Parsed license file.
///
/// Field names match the JSON produced by the `licgen` tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseRecord {
    pub email: String,
    pub edition: String,
    /// Expiry date, conventionally `YYYY-MM-DD`.
    pub expires: String,
    /// Base64 RSA-SHA256-PKCS#1v1.5 signature over the canonical payload.
    pub sig: String,
}

impl LicenseRecord {
    /// Canonical signed payload: pipe-joined, fixed field order.
    pub fn payload(&self) -> String {
        format!("{}|{}|{}", self.email, self.edition, self.expires)
    }

    /// Create a signed record with the given private key.
    ///
    /// Used by `licgen` and by tests; the application itself only verifies.
    pub fn signed(
        key: &RsaPrivateKey,
        email: &str,
        edition: &str,
        expires: &str,
    ) -> LicenseResult<Self> {
        let payload = format!("{email}|{edition}|{expires}");
        let digest = Sha256::digest(payload.as_bytes());
        let sig = key
            .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
            .map_err(|_| LicenseError::BadSignature)?;
        Ok(Self {
            email: email.to_string(),
            edition: edition.to_string(),
            expires: expires.to_string(),
            sig: STANDARD.encode(sig),
        })
    }
}
