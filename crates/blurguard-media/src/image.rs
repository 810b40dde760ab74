//! Still-image pipeline.

use std::path::Path;

use opencv::core::{Mat, Vector};
use opencv::imgcodecs;
use opencv::prelude::*;
use tracing::{debug, info};

use blurguard_models::{Rect, RedactionPolicy};

use crate::detect::Detector;
use crate::error::{MediaError, MediaResult};
use crate::redact::redact_region;
use crate::watermark::apply_trial_watermark;

/// Redact one still image: detect, obscure each region, optionally
/// watermark, persist.
///
/// Given identical input bytes and policy, the output is byte-reproducible.
pub fn process_image(
    input: &Path,
    output: &Path,
    detector: &mut Detector,
    policy: &RedactionPolicy,
) -> MediaResult<()> {
    let mut frame = load_image(input)?;
    let regions = detector.detect(&frame)?;
    debug!(input = %input.display(), regions = regions.len(), "image detection complete");
    write_redacted(frame, output, &regions, policy)
}

/// Manual-review variant: redact externally supplied rectangles, bypassing
/// detection entirely.
pub fn redact_image_regions(
    input: &Path,
    output: &Path,
    regions: &[Rect],
    policy: &RedactionPolicy,
) -> MediaResult<()> {
    let frame = load_image(input)?;
    write_redacted(frame, output, regions, policy)
}

fn load_image(input: &Path) -> MediaResult<Mat> {
    let frame = imgcodecs::imread(input.to_str().unwrap_or(""), imgcodecs::IMREAD_COLOR)?;
    if frame.empty() {
        return Err(MediaError::UnreadableInput(input.to_path_buf()));
    }
    Ok(frame)
}

fn write_redacted(
    mut frame: Mat,
    output: &Path,
    regions: &[Rect],
    policy: &RedactionPolicy,
) -> MediaResult<()> {
    for region in regions {
        redact_region(&mut frame, *region, policy)?;
    }
    if policy.watermark {
        apply_trial_watermark(&mut frame)?;
    }

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let written = imgcodecs::imwrite(
        output.to_str().unwrap_or(""),
        &frame,
        &Vector::<i32>::new(),
    )?;
    if !written {
        return Err(MediaError::EncodeFailed(output.to_path_buf()));
    }
    info!(output = %output.display(), regions = regions.len(), "image written");
    Ok(())
}
