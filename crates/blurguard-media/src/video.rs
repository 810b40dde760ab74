//! Frame-by-frame video pipeline with codec/container fallback.

use std::path::{Path, PathBuf};

use opencv::core::{Mat, Size};
use opencv::prelude::*;
use opencv::videoio::{
    VideoCapture, VideoWriter, CAP_ANY, CAP_PROP_FPS, CAP_PROP_FRAME_HEIGHT, CAP_PROP_FRAME_WIDTH,
};
use tracing::{info, warn};

use blurguard_models::RedactionPolicy;

use crate::detect::Detector;
use crate::error::{MediaError, MediaResult};
use crate::redact::redact_region;
use crate::watermark::apply_trial_watermark;

/// Frame rate used when the source reports a non-positive value.
const FALLBACK_FPS: f64 = 25.0;

/// Suffix of the sibling file written when the requested codec fails.
const FALLBACK_SUFFIX: &str = "_reencoded";

/// Output codec selected by container extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoCodec {
    /// MPEG-4 part 2, for .mp4/.mov containers.
    Mpeg4,
    /// Xvid, for .avi; also the guaranteed fallback codec.
    Xvid,
    /// Motion-JPEG, for everything else.
    MotionJpeg,
}

impl VideoCodec {
    /// Pick the codec for an output extension (without dot, any case).
    pub fn for_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "mp4" | "mov" => Self::Mpeg4,
            "avi" => Self::Xvid,
            _ => Self::MotionJpeg,
        }
    }

    /// Fourcc code for this codec.
    pub fn fourcc(self) -> MediaResult<i32> {
        let (a, b, c, d) = match self {
            Self::Mpeg4 => ('m', 'p', '4', 'v'),
            Self::Xvid => ('X', 'V', 'I', 'D'),
            Self::MotionJpeg => ('M', 'J', 'P', 'G'),
        };
        Ok(VideoWriter::fourcc(a, b, c, d)?)
    }
}

/// Sibling path written when the requested writer cannot be opened:
/// `<stem>_reencoded.avi` next to the requested output.
pub fn reencoded_fallback_path(requested: &Path) -> PathBuf {
    let stem = requested
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    requested.with_file_name(format!("{stem}{FALLBACK_SUFFIX}.avi"))
}

/// Result of a completed video job.
#[derive(Debug, Clone)]
pub struct VideoOutcome {
    /// File actually written; the fallback sibling when `fallback_used`.
    pub output: PathBuf,
    /// Number of frames written. Equals the input frame count.
    pub frames: u64,
    /// Whether the Xvid/AVI fallback writer was used.
    pub fallback_used: bool,
}

/// Redact a video stream frame by frame.
///
/// Exactly one frame buffer is reused across iterations and output frame
/// order equals input order. A per-frame error aborts the whole job: the
/// writer is released and the partial output file removed, never leaving a
/// truncated result in place. Codec fallback is different: it writes a
/// complete file under the `_reencoded.avi` name instead of failing.
pub fn process_video(
    input: &Path,
    output: &Path,
    detector: &mut Detector,
    policy: &RedactionPolicy,
) -> MediaResult<VideoOutcome> {
    let mut capture = VideoCapture::from_file(input.to_str().unwrap_or(""), CAP_ANY)?;
    if !capture.is_opened().unwrap_or(false) {
        return Err(MediaError::UnreadableInput(input.to_path_buf()));
    }

    let width = capture.get(CAP_PROP_FRAME_WIDTH)? as i32;
    let height = capture.get(CAP_PROP_FRAME_HEIGHT)? as i32;
    let reported_fps = capture.get(CAP_PROP_FPS)?;
    let fps = if reported_fps > 0.0 {
        reported_fps
    } else {
        FALLBACK_FPS
    };

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let ext = output
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    let primary = VideoCodec::for_extension(&ext).fourcc()?;
    let (mut writer, actual_output, fallback_used) =
        open_writer_with_fallback(output, primary, fps, Size::new(width, height))?;

    let streamed = stream_frames(&mut capture, &mut writer, detector, policy);

    // Handles are released on every exit path. A failed release means an
    // unflushed file, so it fails the job like any mid-stream error.
    let release = writer.release().map_err(MediaError::from);
    let _ = capture.release();

    let frames = discard_on_error(
        streamed.and_then(|frames| release.map(|()| frames)),
        &actual_output,
    )?;

    info!(
        input = %input.display(),
        output = %actual_output.display(),
        frames,
        fallback_used,
        "video written"
    );
    Ok(VideoOutcome {
        output: actual_output,
        frames,
        fallback_used,
    })
}

/// Remove the output file when the job failed, so no truncated or unflushed
/// result survives on disk.
fn discard_on_error<T>(result: MediaResult<T>, output: &Path) -> MediaResult<T> {
    if result.is_err() {
        let _ = std::fs::remove_file(output);
    }
    result
}

/// Open a writer at the requested path with the given primary fourcc,
/// falling back to an Xvid `.avi` sibling when that codec/container
/// combination cannot be opened.
fn open_writer_with_fallback(
    requested: &Path,
    primary_fourcc: i32,
    fps: f64,
    frame_size: Size,
) -> MediaResult<(VideoWriter, PathBuf, bool)> {
    if let Ok(writer) = VideoWriter::new(
        requested.to_str().unwrap_or(""),
        primary_fourcc,
        fps,
        frame_size,
        true,
    ) {
        if writer.is_opened().unwrap_or(false) {
            return Ok((writer, requested.to_path_buf(), false));
        }
    }

    let fallback = reencoded_fallback_path(requested);
    warn!(
        requested = %requested.display(),
        fallback = %fallback.display(),
        "requested codec unavailable, re-encoding as Xvid/AVI"
    );
    let writer = VideoWriter::new(
        fallback.to_str().unwrap_or(""),
        VideoCodec::Xvid.fourcc()?,
        fps,
        frame_size,
        true,
    )?;
    if !writer.is_opened().unwrap_or(false) {
        return Err(MediaError::WriterUnavailable(requested.to_path_buf()));
    }
    Ok((writer, fallback, true))
}

/// Copy frames from reader to writer, redacting each one. Detection and
/// redaction stay sequential within a frame: redaction mutates the buffer
/// the detector just read.
fn stream_frames(
    capture: &mut VideoCapture,
    writer: &mut VideoWriter,
    detector: &mut Detector,
    policy: &RedactionPolicy,
) -> MediaResult<u64> {
    let mut frame = Mat::default();
    let mut frames = 0u64;
    loop {
        if !capture.read(&mut frame)? || frame.empty() {
            break;
        }
        for region in detector.detect(&frame)? {
            redact_region(&mut frame, region, policy)?;
        }
        if policy.watermark {
            apply_trial_watermark(&mut frame)?;
        }
        writer.write(&frame)?;
        frames += 1;
    }
    Ok(frames)
}
