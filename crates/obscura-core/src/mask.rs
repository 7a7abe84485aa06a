//! Geometric clip shapes for paste-back.
//!
//! The mask decides, per pixel of a rectangle, whether the anonymized
//! tile may overwrite the canvas there. Pixels are tested at their
//! centers in the rectangle's local coordinate space.

use crate::types::MaskShape;

/// Fraction of the shorter rectangle edge used as the corner radius for
/// [`MaskShape::RoundedRect`].
const CORNER_RADIUS_FACTOR: f32 = 0.15;

/// Whether local pixel `(x, y)` of a `width × height` rectangle lies
/// inside the clip shape.
pub fn contains(shape: MaskShape, width: u32, height: u32, x: u32, y: u32) -> bool {
    let px = x as f32 + 0.5;
    let py = y as f32 + 0.5;
    let w = width as f32;
    let h = height as f32;

    match shape {
        MaskShape::Ellipse => {
            let rx = w / 2.0;
            let ry = h / 2.0;
            if rx <= 0.0 || ry <= 0.0 {
                return false;
            }
            let dx = (px - rx) / rx;
            let dy = (py - ry) / ry;
            dx * dx + dy * dy <= 1.0
        }
        MaskShape::RoundedRect => {
            let r = CORNER_RADIUS_FACTOR * w.min(h);
            // Nearest corner-circle center; pixels outside a corner
            // square are always inside the shape.
            let cx = if px < r {
                r
            } else if px > w - r {
                w - r
            } else {
                return true;
            };
            let cy = if py < r {
                r
            } else if py > h - r {
                h - r
            } else {
                return true;
            };
            let dx = px - cx;
            let dy = py - cy;
            dx * dx + dy * dy <= r * r
        }
    }
}
