//! OpenCV detection and redaction engine.
//!
//! This crate provides:
//! - Cascade and DNN face/plate detection behind one [`Detector`]
//! - In-place region redaction (Gaussian blur or pixelation)
//! - The trial watermark overlay
//! - Still-image and frame-by-frame video pipelines with codec fallback
//!
//! Redaction is destructive by design: there is no recoverable form of the
//! obscured pixels in the output.

pub mod detect;
pub mod error;
pub mod image;
pub mod redact;
pub mod video;
pub mod watermark;

use std::path::PathBuf;

use blurguard_models::{MediaJob, MediaKind};

pub use detect::{default_model_dir, Detector};
pub use error::{MediaError, MediaResult};
pub use image::{process_image, redact_image_regions};
pub use redact::redact_region;
pub use video::{process_video, VideoCodec, VideoOutcome};
pub use watermark::apply_trial_watermark;

/// Result of one completed media job.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    /// Path actually written; differs from the requested output only on the
    /// video codec fallback path.
    pub output: PathBuf,
    /// Frames written, for video jobs.
    pub frames: Option<u64>,
}

/// Run one job end to end, dispatching on the input's media kind.
pub fn run_job(job: &MediaJob, detector: &mut Detector) -> MediaResult<JobOutcome> {
    match job.kind() {
        Some(MediaKind::Image) => {
            image::process_image(&job.input, &job.output, detector, &job.redaction)?;
            Ok(JobOutcome {
                output: job.output.clone(),
                frames: None,
            })
        }
        Some(MediaKind::Video) => {
            let outcome = video::process_video(&job.input, &job.output, detector, &job.redaction)?;
            Ok(JobOutcome {
                output: outcome.output,
                frames: Some(outcome.frames),
            })
        }
        None => Err(MediaError::UnreadableInput(job.input.clone())),
    }
}
