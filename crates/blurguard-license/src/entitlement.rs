//! Process-wide entitlement latch.
//!
//! The latch is one-way: once a license verifies, the process stays Pro
//! until exit. Failed verifications never change state.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::verify::LicenseVerifier;

static PRO: AtomicBool = AtomicBool::new(false);

/// Current process-wide entitlement flag.
pub fn is_pro() -> bool {
    PRO.load(Ordering::Relaxed)
}

/// Verify a license file against the embedded key and, on success, latch the
/// process into the Pro state.
///
/// Returns whether verification succeeded. Failure is never fatal and leaves
/// the entitlement at its prior value.
pub fn load_and_verify(path: &Path) -> bool {
    let verifier = match LicenseVerifier::builtin() {
        Ok(v) => v,
        Err(e) => {
            warn!("builtin license key unusable: {e}");
            return false;
        }
    };
    match verifier.verify_file(path) {
        Ok(record) => {
            PRO.store(true, Ordering::Relaxed);
            info!(email = %record.email, expires = %record.expires, "license verified, Pro features enabled");
            true
        }
        Err(e) => {
            warn!(path = %path.display(), "license rejected: {e}");
            false
        }
    }
}

/// Immutable entitlement snapshot, taken once before a batch starts.
///
/// Jobs receive the snapshot instead of reading the global flag mid-run, so
/// a batch is deterministic even if a license is loaded concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entitlement {
    pro: bool,
}

impl Entitlement {
    /// Snapshot the current process entitlement.
    pub fn capture() -> Self {
        Self { pro: is_pro() }
    }

    /// A paid entitlement, for tests.
    pub fn pro() -> Self {
        Self { pro: true }
    }

    /// An unentitled (trial) snapshot, for tests.
    pub fn trial() -> Self {
        Self { pro: false }
    }

    /// Whether this snapshot grants paid (watermark-free) output.
    pub fn is_pro(&self) -> bool {
        self.pro
    }
}
