//! Per-call detection and redaction configuration.

use serde::{Deserialize, Serialize};

/// Which detectors run for a frame, and which face backend is preferred.
///
/// Face and plate detection are independent pipelines combined additively;
/// the neural preference only affects the face class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionPolicy {
    /// Prefer the DNN face detector when its model artifacts exist on disk.
    pub prefer_neural_faces: bool,
    /// Run face detection.
    pub detect_faces: bool,
    /// Run license-plate detection (always cascade-based).
    pub detect_plates: bool,
}

impl Default for DetectionPolicy {
    fn default() -> Self {
        Self {
            prefer_neural_faces: false,
            detect_faces: true,
            detect_plates: true,
        }
    }
}

/// How detected regions are obscured, and whether a trial watermark is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionPolicy {
    /// Requested Gaussian kernel side. Normalized via [`RedactionPolicy::kernel`].
    pub blur_kernel: i32,
    /// Pixelate (mosaic) instead of blurring.
    pub pixelate: bool,
    /// Stamp the trial watermark on every output frame.
    pub watermark: bool,
}

impl Default for RedactionPolicy {
    fn default() -> Self {
        Self {
            blur_kernel: 35,
            pixelate: false,
            watermark: false,
        }
    }
}

impl RedactionPolicy {
    /// Effective Gaussian kernel side: the next odd integer >= 1.
    pub fn kernel(&self) -> i32 {
        let k = self.blur_kernel.max(1);
        if k % 2 == 0 {
            k + 1
        } else {
            k
        }
    }
}
