//! Mapping detector polygons to paddable pixel rectangles.
//!
//! The detector reports each face as one or two polygons. The tight
//! `fdBoundingPoly` hugs the skin region and is preferred; the loose
//! `boundingPoly` covers the whole head and is the fallback. A polygon
//! with fewer than four vertices cannot describe a box and disqualifies
//! itself; a region where both polygons are unusable is skipped entirely.

use crate::types::{BoundingPoly, FaceRegion, PixelRect, Rect};

/// A polygon needs at least this many vertices to yield a bounding box.
const MIN_POLY_VERTICES: usize = 4;

fn usable(poly: &Option<BoundingPoly>) -> Option<&BoundingPoly> {
    poly.as_ref().filter(|p| p.vertices.len() >= MIN_POLY_VERTICES)
}

impl FaceRegion {
    /// Axis-aligned bounding box of the preferred polygon, or `None` if
    /// neither polygon has enough vertices.
    ///
    /// Absent vertex coordinates count as 0, matching the detector's
    /// omission of zero-valued fields.
    pub fn bounding_box(&self) -> Option<Rect> {
        let poly = usable(&self.fd_bounding_poly).or_else(|| usable(&self.bounding_poly))?;

        let mut min_x = i32::MAX;
        let mut max_x = i32::MIN;
        let mut min_y = i32::MAX;
        let mut max_y = i32::MIN;
        for vertex in &poly.vertices {
            let (x, y) = vertex.resolved();
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        Some(Rect {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        })
    }
}

/// Grow `rect` by `padding` on every side and clamp it into a
/// `canvas_width × canvas_height` canvas.
///
/// The size bound is computed against the rectangle's original origin,
/// not the padded one:
///
/// ```text
/// width' = min(canvas_width - rect.x + padding, rect.width + 2 * padding)
/// ```
///
/// so a rectangle closer than `padding` to the left/top edge gives up
/// part of its padding there rather than shifting right/down. A final
/// containment clamp keeps `x + width <= canvas_width` when that bound
/// alone would overshoot the far edge.
///
/// Returns `None` for rectangles that end up empty or entirely outside
/// the canvas; such regions are skipped.
pub fn expand(rect: Rect, padding: u32, canvas_width: u32, canvas_height: u32) -> Option<PixelRect> {
    let pad = i64::from(padding);
    let cw = i64::from(canvas_width);
    let ch = i64::from(canvas_height);

    let x = (i64::from(rect.x) - pad).max(0);
    let y = (i64::from(rect.y) - pad).max(0);
    let width = (cw - i64::from(rect.x) + pad).min(i64::from(rect.width) + 2 * pad);
    let height = (ch - i64::from(rect.y) + pad).min(i64::from(rect.height) + 2 * pad);

    let width = width.min(cw - x);
    let height = height.min(ch - y);

    if x >= cw || y >= ch || width <= 0 || height <= 0 {
        return None;
    }

    Some(PixelRect {
        x: x as u32,
        y: y as u32,
        width: width as u32,
        height: height as u32,
    })
}
