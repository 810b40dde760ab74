//! Classical multi-scale cascade detection.

use std::path::Path;

use opencv::core::{Mat, Size, Vector};
use opencv::prelude::*;
use opencv::{imgproc, objdetect};

use blurguard_models::Rect;

use crate::error::{MediaError, MediaResult};

/// Frontal-face cascade artifact filename.
pub const FACE_CASCADE_FILE: &str = "haarcascade_frontalface_default.xml";

/// License-plate cascade artifact filename.
pub const PLATE_CASCADE_FILE: &str = "haarcascade_russian_plate_number.xml";

const SCALE_FACTOR: f64 = 1.1;
const MIN_NEIGHBORS: i32 = 4;
const MIN_FEATURE_SIZE: i32 = 24;

/// Convert a BGR frame to a histogram-equalized single-channel image.
///
/// All cascade classes share one grayscale conversion per frame.
pub fn grayscale_equalized(frame: &Mat) -> MediaResult<Mat> {
    let mut gray = Mat::default();
    imgproc::cvt_color(frame, &mut gray, imgproc::COLOR_BGR2GRAY, 0)?;
    let mut equalized = Mat::default();
    imgproc::equalize_hist(&gray, &mut equalized)?;
    Ok(equalized)
}

/// One loaded Haar cascade classifier.
#[derive(Debug)]
pub struct CascadeDetector {
    classifier: objdetect::CascadeClassifier,
}

impl CascadeDetector {
    /// Load a cascade XML file. A missing or unloadable artifact is a fatal
    /// configuration error for the whole detection call.
    pub fn open(path: &Path) -> MediaResult<Self> {
        if !path.is_file() {
            return Err(MediaError::MissingModel(path.to_path_buf()));
        }
        let classifier = objdetect::CascadeClassifier::new(path.to_str().unwrap_or(""))?;
        if classifier.empty()? {
            return Err(MediaError::MissingModel(path.to_path_buf()));
        }
        Ok(Self { classifier })
    }

    /// Run the multi-scale sweep over an equalized grayscale image.
    pub fn detect(&mut self, gray: &Mat) -> MediaResult<Vec<Rect>> {
        if gray.empty() {
            return Ok(Vec::new());
        }
        let mut hits = Vector::<opencv::core::Rect>::new();
        self.classifier.detect_multi_scale(
            gray,
            &mut hits,
            SCALE_FACTOR,
            MIN_NEIGHBORS,
            objdetect::CASCADE_SCALE_IMAGE,
            Size::new(MIN_FEATURE_SIZE, MIN_FEATURE_SIZE),
            Size::new(0, 0),
        )?;
        Ok(hits
            .iter()
            .map(|r| Rect::new(r.x, r.y, r.width, r.height))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_xml_reports_missing_model() {
        let dir = tempfile::tempdir().unwrap();
        let err = CascadeDetector::open(&dir.path().join(FACE_CASCADE_FILE)).unwrap_err();
        match err {
            MediaError::MissingModel(path) => {
                assert!(path.ends_with(FACE_CASCADE_FILE));
            }
            other => panic!("expected MissingModel, got {other:?}"),
        }
    }
}
