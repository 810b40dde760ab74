//! Trial watermark overlay for unentitled output.

use opencv::core::{Mat, Point, Scalar};
use opencv::imgproc;
use opencv::prelude::*;

use crate::error::MediaResult;

const WATERMARK_TEXT: &str = "TRIAL";
const WATERMARK_OPACITY: f64 = 0.35;

/// Divisor relating the larger frame dimension to the font scale.
const SCALE_BASE: f64 = 500.0;

/// Composite a semi-transparent centered "TRIAL" label over the frame.
///
/// The label is sized proportionally to the larger frame dimension and
/// blended at 35% opacity, mutating the frame in place.
pub fn apply_trial_watermark(frame: &mut Mat) -> MediaResult<()> {
    if frame.empty() {
        return Ok(());
    }
    let width = frame.cols();
    let height = frame.rows();

    let scale = f64::from(width.max(height)) / SCALE_BASE;
    let thickness = ((scale * 2.0).round() as i32).max(1);

    let mut baseline = 0;
    let text_size = imgproc::get_text_size(
        WATERMARK_TEXT,
        imgproc::FONT_HERSHEY_SIMPLEX,
        scale,
        thickness,
        &mut baseline,
    )?;
    let origin = Point::new(
        (width - text_size.width) / 2,
        (height + text_size.height) / 2,
    );

    let mut overlay = frame.try_clone()?;
    imgproc::put_text(
        &mut overlay,
        WATERMARK_TEXT,
        origin,
        imgproc::FONT_HERSHEY_SIMPLEX,
        scale,
        Scalar::all(255.0),
        thickness,
        imgproc::LINE_AA,
        false,
    )?;

    let base = frame.try_clone()?;
    opencv::core::add_weighted(
        &overlay,
        WATERMARK_OPACITY,
        &base,
        1.0 - WATERMARK_OPACITY,
        0.0,
        frame,
        -1,
    )?;
    Ok(())
}
