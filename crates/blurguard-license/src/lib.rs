//! Offline license verification and trial entitlement.
//!
//! A license is a small JSON file `{email, edition, expires, sig}` where
//! `sig` is the base64 RSA-SHA256-PKCS#1v1.5 signature over the pipe-joined
//! payload `email|edition|expires`. Verification is a pure local trust
//! decision against an embedded public key: no network call and no
//! revocation list. A leaked but validly signed license is a known, accepted
//! risk of the offline model.
//!
//! A successful verification latches the process-wide entitlement flag from
//! trial to paid; the latch is one-way for the process lifetime. Batch code
//! should take an [`Entitlement`] snapshot once up front instead of reading
//! the flag mid-job.

pub mod entitlement;
pub mod error;
pub mod record;
pub mod verify;

pub use entitlement::{is_pro, load_and_verify, Entitlement};
pub use error::{LicenseError, LicenseResult};
pub use record::LicenseRecord;
pub use verify::LicenseVerifier;
