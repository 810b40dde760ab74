//! Axis-aligned pixel rectangles.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in integer pixel coordinates.
///
/// Detectors may produce rectangles with a negative origin or extending past
/// the frame at image edges; [`Rect::clamp_to`] brings them back inside the
/// frame before any pixel access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// X coordinate of the top-left corner.
    pub x: i32,
    /// Y coordinate of the top-left corner.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True if the rectangle covers no pixels.
    ///
    /// Empty rectangles are legal output of [`Rect::clamp_to`] and mean
    /// "nothing to redact", never an error.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Clamp the rectangle to a frame of `frame_width` x `frame_height`.
    ///
    /// The result always satisfies `0 <= x`, `0 <= y`,
    /// `x + width <= frame_width` and `y + height <= frame_height`, shrinking
    /// the rectangle as needed. A rectangle fully outside the frame clamps to
    /// an empty one.
    pub fn clamp_to(self, frame_width: i32, frame_height: i32) -> Self {
        let x0 = self.x.clamp(0, frame_width.max(0));
        let y0 = self.y.clamp(0, frame_height.max(0));
        let x1 = self
            .x
            .saturating_add(self.width)
            .clamp(x0, frame_width.max(0));
        let y1 = self
            .y
            .saturating_add(self.height)
            .clamp(y0, frame_height.max(0));
        Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_inside(r: Rect, w: i32, h: i32) {
        assert!(r.x >= 0, "x >= 0: {:?}", r);
        assert!(r.y >= 0, "y >= 0: {:?}", r);
        assert!(r.x + r.width <= w, "x+w <= {}: {:?}", w, r);
        assert!(r.y + r.height <= h, "y+h <= {}: {:?}", h, r);
        assert!(r.width >= 0 && r.height >= 0, "non-negative size: {:?}", r);
    }

    #[test]
    fn clamp_keeps_interior_rect_unchanged() {
        let r = Rect::new(100, 100, 50, 50);
        assert_eq!(r.clamp_to(800, 600), r);
    }

    #[test]
    fn clamp_negative_origin_shrinks_size() {
        let r = Rect::new(-10, -20, 50, 50).clamp_to(800, 600);
        assert_eq!(r, Rect::new(0, 0, 40, 30));
        assert_inside(r, 800, 600);
    }

    #[test]
    fn clamp_cuts_overshoot_at_far_edge() {
        let r = Rect::new(780, 590, 50, 50).clamp_to(800, 600);
        assert_eq!(r, Rect::new(780, 590, 20, 10));
        assert_inside(r, 800, 600);
    }

    #[test]
    fn clamp_fully_outside_is_empty() {
        let left = Rect::new(-100, 10, 50, 50).clamp_to(800, 600);
        let below = Rect::new(10, 700, 50, 50).clamp_to(800, 600);
        assert!(left.is_empty());
        assert!(below.is_empty());
        assert_inside(left, 800, 600);
        assert_inside(below, 800, 600);
    }

    #[test]
    fn clamp_survives_extreme_coordinates() {
        for r in [
            Rect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX),
            Rect::new(i32::MAX, i32::MAX, i32::MAX, i32::MAX),
            Rect::new(0, 0, i32::MAX, i32::MAX),
        ] {
            assert_inside(r.clamp_to(1920, 1080), 1920, 1080);
        }
    }
}
