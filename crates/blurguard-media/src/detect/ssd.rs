//! Single-shot DNN face detection (ResNet-10 SSD, Caffe weights).

use std::path::Path;

use opencv::core::{Mat, Scalar, Size};
use opencv::dnn;
use opencv::prelude::*;
use tracing::debug;

use blurguard_models::Rect;

use crate::error::{MediaError, MediaResult};

/// Network definition artifact filename.
pub const SSD_PROTOTXT_FILE: &str = "deploy.prototxt";

/// Pretrained weights artifact filename.
pub const SSD_WEIGHTS_FILE: &str = "res10_300x300_ssd_iter_140000.caffemodel";

/// Fixed network input side.
const INPUT_SIZE: i32 = 300;

/// Minimum confidence for a detection to be kept.
const CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Values per detection row in the network output: [batch_id, class_id,
/// confidence, x1, y1, x2, y2], coordinates normalized to [0, 1].
const DETECTION_STRIDE: usize = 7;

/// Per-channel BGR mean subtracted before the forward pass.
fn input_mean() -> Scalar {
    Scalar::new(104.0, 177.0, 123.0, 0.0)
}

/// Pretrained single-shot face detector.
#[derive(Debug)]
pub struct SsdFaceDetector {
    net: dnn::Net,
}

impl SsdFaceDetector {
    /// Whether both model artifacts exist under `model_dir`.
    ///
    /// Absence is not an error: the caller falls back to the cascade face
    /// detector instead.
    pub fn is_available(model_dir: &Path) -> bool {
        model_dir.join(SSD_PROTOTXT_FILE).is_file() && model_dir.join(SSD_WEIGHTS_FILE).is_file()
    }

    /// Load the network from `model_dir`.
    pub fn open(model_dir: &Path) -> MediaResult<Self> {
        let prototxt = model_dir.join(SSD_PROTOTXT_FILE);
        let weights = model_dir.join(SSD_WEIGHTS_FILE);
        if !Self::is_available(model_dir) {
            return Err(MediaError::MissingModel(weights));
        }
        let net = dnn::read_net_from_caffe(
            prototxt.to_str().unwrap_or(""),
            weights.to_str().unwrap_or(""),
        )?;
        Ok(Self { net })
    }

    /// Detect faces in a BGR frame.
    pub fn detect(&mut self, frame: &Mat) -> MediaResult<Vec<Rect>> {
        if frame.empty() {
            return Ok(Vec::new());
        }
        let frame_width = frame.cols() as f32;
        let frame_height = frame.rows() as f32;

        let blob = dnn::blob_from_image(
            frame,
            1.0,
            Size::new(INPUT_SIZE, INPUT_SIZE),
            input_mean(),
            false,
            false,
            opencv::core::CV_32F,
        )?;
        self.net.set_input(&blob, "", 1.0, Scalar::default())?;
        let output = self.net.forward_single("")?;

        // Output shape is [1, 1, N, 7]; read it as a flat run of rows.
        let data = output.data_typed::<f32>()?;
        let mut regions = Vec::new();
        for row in data.chunks_exact(DETECTION_STRIDE) {
            let confidence = row[2];
            if confidence < CONFIDENCE_THRESHOLD {
                continue;
            }
            let x1 = row[3] * frame_width;
            let y1 = row[4] * frame_height;
            let x2 = row[5] * frame_width;
            let y2 = row[6] * frame_height;
            regions.push(Rect::new(
                x1.round() as i32,
                y1.round() as i32,
                (x2 - x1).round() as i32,
                (y2 - y1).round() as i32,
            ));
        }
        debug!(count = regions.len(), "SSD face pass complete");
        Ok(regions)
    }
}
