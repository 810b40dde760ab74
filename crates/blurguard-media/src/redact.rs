//! In-place region redaction: Gaussian blur or pixelation.

use opencv::core::{Mat, Size, BORDER_DEFAULT};
use opencv::imgproc;
use opencv::prelude::*;

use blurguard_models::{Rect, RedactionPolicy};

use crate::error::MediaResult;

/// Linear downsample divisor for the pixelation mosaic.
const PIXELATE_DIVISOR: i32 = 10;

/// Irreversibly obscure one region of `frame` in place.
///
/// The rectangle is clamped to the frame first; a region that clamps to
/// empty is a no-op, never an error. Blur uses an odd square Gaussian kernel
/// of side [`RedactionPolicy::kernel`]; pixelation downsamples the region to
/// roughly 1/10 linear size with area averaging and scales back up with
/// nearest-neighbor, producing the blocky mosaic. Both transforms are
/// deterministic functions of the input pixels.
pub fn redact_region(frame: &mut Mat, rect: Rect, policy: &RedactionPolicy) -> MediaResult<()> {
    let safe = rect.clamp_to(frame.cols(), frame.rows());
    if safe.is_empty() {
        return Ok(());
    }
    let roi = opencv::core::Rect::new(safe.x, safe.y, safe.width, safe.height);

    let region = Mat::roi(frame, roi)?.try_clone()?;
    let mut obscured = Mat::default();
    if policy.pixelate {
        let mut coarse = Mat::default();
        imgproc::resize(
            &region,
            &mut coarse,
            Size::new(
                (safe.width / PIXELATE_DIVISOR).max(1),
                (safe.height / PIXELATE_DIVISOR).max(1),
            ),
            0.0,
            0.0,
            imgproc::INTER_AREA,
        )?;
        imgproc::resize(
            &coarse,
            &mut obscured,
            Size::new(safe.width, safe.height),
            0.0,
            0.0,
            imgproc::INTER_NEAREST,
        )?;
    } else {
        let k = policy.kernel();
        imgproc::gaussian_blur(
            &region,
            &mut obscured,
            Size::new(k, k),
            0.0,
            0.0,
            BORDER_DEFAULT,
        )?;
    }

    let mut target = Mat::roi_mut(frame, roi)?;
    obscured.copy_to(&mut target)?;
    Ok(())
}
