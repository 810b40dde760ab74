//! Region detection.
//!
//! Two detection classes, combined additively:
//! - faces, via a Haar cascade or (when preferred and available) a DNN
//!   single-shot detector
//! - license plates, always via a Haar cascade
//!
//! Outputs are the unordered union of the enabled class pipelines. Duplicate
//! or overlapping boxes are kept as-is; redaction is applied per box and the
//! transforms tolerate repeated application on the same region.
//!
//! Model artifacts are loaded once when a [`Detector`] is opened and reused
//! read-only for every subsequent detection call.

pub mod cascade;
pub mod ssd;

use std::path::{Path, PathBuf};

use opencv::core::Mat;
use tracing::{debug, info, warn};

use blurguard_models::{DetectionPolicy, Rect};

use crate::error::MediaResult;

pub use cascade::{CascadeDetector, FACE_CASCADE_FILE, PLATE_CASCADE_FILE};
pub use ssd::SsdFaceDetector;

/// Environment variable overriding the model directory.
pub const MODEL_DIR_ENV: &str = "BLURGUARD_MODEL_DIR";

/// Model directory candidates, in preference order.
const MODEL_DIR_CANDIDATES: &[&str] = &[
    "./assets/models",
    "/usr/share/blurguard/models",
    "/usr/share/opencv4/haarcascades",
];

/// Resolve the model directory: env override first, then the first existing
/// candidate, then the development default.
pub fn default_model_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(MODEL_DIR_ENV) {
        return PathBuf::from(dir);
    }
    for candidate in MODEL_DIR_CANDIDATES {
        if Path::new(candidate).is_dir() {
            return PathBuf::from(candidate);
        }
    }
    PathBuf::from(MODEL_DIR_CANDIDATES[0])
}

#[derive(Debug)]
enum FaceBackend {
    Cascade(CascadeDetector),
    Neural(SsdFaceDetector),
}

/// Face and plate detection over single frames.
///
/// Construction loads every required model artifact; a missing cascade file
/// is a fatal configuration error, while missing DNN artifacts silently fall
/// back to the cascade face detector.
#[derive(Debug)]
pub struct Detector {
    faces: Option<FaceBackend>,
    plates: Option<CascadeDetector>,
}

impl Detector {
    /// Open the detectors selected by `policy` from `model_dir`.
    pub fn open(model_dir: &Path, policy: &DetectionPolicy) -> MediaResult<Self> {
        let faces = if policy.detect_faces {
            if policy.prefer_neural_faces && SsdFaceDetector::is_available(model_dir) {
                info!("using DNN face detector");
                Some(FaceBackend::Neural(SsdFaceDetector::open(model_dir)?))
            } else {
                if policy.prefer_neural_faces {
                    warn!(
                        dir = %model_dir.display(),
                        "DNN face model artifacts not found, falling back to cascade"
                    );
                }
                Some(FaceBackend::Cascade(CascadeDetector::open(
                    &model_dir.join(FACE_CASCADE_FILE),
                )?))
            }
        } else {
            None
        };

        let plates = if policy.detect_plates {
            Some(CascadeDetector::open(&model_dir.join(PLATE_CASCADE_FILE))?)
        } else {
            None
        };

        Ok(Self { faces, plates })
    }

    /// Detect all candidate regions in one frame.
    pub fn detect(&mut self, frame: &Mat) -> MediaResult<Vec<Rect>> {
        let needs_gray =
            matches!(self.faces, Some(FaceBackend::Cascade(_))) || self.plates.is_some();
        let gray = if needs_gray {
            cascade::grayscale_equalized(frame)?
        } else {
            Mat::default()
        };

        let mut regions = Vec::new();
        match &mut self.faces {
            Some(FaceBackend::Cascade(faces)) => regions.extend(faces.detect(&gray)?),
            Some(FaceBackend::Neural(faces)) => regions.extend(faces.detect(frame)?),
            None => {}
        }
        if let Some(plates) = &mut self.plates {
            regions.extend(plates.detect(&gray)?);
        }

        debug!(count = regions.len(), "frame detection complete");
        Ok(regions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_cascade_artifacts_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = Detector::open(dir.path(), &DetectionPolicy::default()).unwrap_err();
        assert!(matches!(err, crate::MediaError::MissingModel(_)));
    }

    #[test]
    fn disabled_classes_need_no_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let policy = DetectionPolicy {
            detect_faces: false,
            detect_plates: false,
            ..Default::default()
        };
        let mut detector = Detector::open(dir.path(), &policy).unwrap();
        let frame = Mat::default();
        assert!(detector.detect(&frame).unwrap().is_empty());
    }

    #[test]
    fn neural_preference_without_artifacts_still_requires_cascade() {
        // The DNN fallback is silent, but the cascade it falls back to must
        // exist; an empty model dir is still a fatal configuration error.
        let dir = tempfile::tempdir().unwrap();
        let policy = DetectionPolicy {
            prefer_neural_faces: true,
            detect_plates: false,
            ..Default::default()
        };
        let err = Detector::open(dir.path(), &policy).unwrap_err();
        assert!(matches!(err, crate::MediaError::MissingModel(_)));
    }

    #[test]
    fn ssd_is_unavailable_in_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!SsdFaceDetector::is_available(dir.path()));
    }
}
