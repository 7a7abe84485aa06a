//! Per-region orchestration over a shared canvas.
//!
//! Regions are processed strictly in input order against one mutable
//! canvas, so overlapping regions compound: a later region re-anonymizes
//! pixels an earlier region already wrote. That sequential compounding is
//! observable behavior and must not be reordered or parallelized without
//! serializing the paste-back step.

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};
use thiserror::Error;

use crate::types::{BlurConfig, FaceRegion, PixelRect};
use crate::{blur, mask, region};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to decode source image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("processing failed: {0}")]
    Processing(String),
    #[error("failed to encode output image: {0}")]
    Encode(#[source] image::ImageError),
}

/// Anonymize every valid region of `image`, returning a new canvas.
///
/// The input is cloned up front; on error the caller's buffer is
/// untouched and no partially processed canvas escapes. Regions whose
/// polygons cannot produce a usable rectangle are skipped silently
/// (logged at debug level), per the detector contract.
pub fn process(
    image: &RgbaImage,
    regions: &[FaceRegion],
    config: &BlurConfig,
) -> Result<RgbaImage, PipelineError> {
    let (canvas_w, canvas_h) = image.dimensions();
    if canvas_w == 0 || canvas_h == 0 {
        return Err(PipelineError::Processing(
            "canvas has zero dimensions".into(),
        ));
    }

    let mut canvas = image.clone();
    let mut applied = 0usize;

    for (index, face) in regions.iter().enumerate() {
        let Some(raw) = face.bounding_box() else {
            tracing::debug!(index, "region skipped: no polygon with 4+ vertices");
            continue;
        };
        let Some(rect) = region::expand(raw, config.padding, canvas_w, canvas_h) else {
            tracing::debug!(index, ?raw, "region skipped: empty after clamping");
            continue;
        };

        let tile = image::imageops::crop_imm(&canvas, rect.x, rect.y, rect.width, rect.height)
            .to_image();
        let anonymized = blur::anonymize(&tile, config.blur_radius, config.blur_passes);
        paste_masked(&mut canvas, &anonymized, rect, config);

        tracing::debug!(
            index,
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            "region anonymized"
        );
        applied += 1;
    }

    tracing::info!(
        total = regions.len(),
        applied,
        skipped = regions.len() - applied,
        "canvas processed"
    );

    Ok(canvas)
}

/// Write `tile` into `canvas` at `rect`, overwriting only pixels inside
/// the configured clip shape. Canvas pixels outside the shape (the
/// rectangle corners, for an ellipse) keep whatever the canvas currently
/// holds there.
fn paste_masked(canvas: &mut RgbaImage, tile: &RgbaImage, rect: PixelRect, config: &BlurConfig) {
    debug_assert_eq!(tile.dimensions(), (rect.width, rect.height));
    for y in 0..rect.height {
        for x in 0..rect.width {
            if mask::contains(config.shape, rect.width, rect.height, x, y) {
                canvas.put_pixel(rect.x + x, rect.y + y, *tile.get_pixel(x, y));
            }
        }
    }
}

/// Full run over encoded bytes: decode, process every region, encode as
/// PNG (lossless, so repeated runs are byte-identical).
///
/// All-or-nothing: a decode, processing, or encode failure returns the
/// corresponding error and no output bytes.
pub fn anonymize_bytes(
    source: &[u8],
    regions: &[FaceRegion],
    config: &BlurConfig,
) -> Result<Vec<u8>, PipelineError> {
    let decoded = image::load_from_memory(source)
        .map_err(PipelineError::Decode)?
        .to_rgba8();
    tracing::debug!(
        width = decoded.width(),
        height = decoded.height(),
        regions = regions.len(),
        "source decoded"
    );

    let processed = process(&decoded, regions, config)?;

    let mut out = Vec::new();
    processed
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .map_err(PipelineError::Encode)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BoundingPoly, MaskShape, Vertex};
    use image::Rgba;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([
                (x * 5 % 256) as u8,
                (y * 5 % 256) as u8,
                ((x * y) % 256) as u8,
                255,
            ])
        })
    }

    fn square_region(x: i32, y: i32, size: i32) -> FaceRegion {
        let vertices = [(x, y), (x + size, y), (x + size, y + size), (x, y + size)]
            .into_iter()
            .map(|(x, y)| Vertex { x: Some(x), y: Some(y) })
            .collect();
        FaceRegion {
            fd_bounding_poly: Some(BoundingPoly { vertices }),
            ..FaceRegion::default()
        }
    }

    #[test]
    fn no_regions_returns_identical_canvas() {
        let img = gradient(100, 100);
        let out = process(&img, &[], &BlurConfig::default()).unwrap();
        assert_eq!(out.as_raw(), img.as_raw());
    }

    #[test]
    fn invalid_polygon_is_a_silent_noop() {
        let img = gradient(100, 100);
        let degenerate = FaceRegion {
            fd_bounding_poly: Some(BoundingPoly {
                vertices: vec![
                    Vertex { x: Some(1), y: Some(1) },
                    Vertex { x: Some(9), y: Some(1) },
                    Vertex { x: Some(9), y: Some(9) },
                ],
            }),
            ..FaceRegion::default()
        };
        let out = process(&img, &[degenerate], &BlurConfig::default()).unwrap();
        assert_eq!(out.as_raw(), img.as_raw());
    }

    #[test]
    fn zero_sized_canvas_is_a_processing_error() {
        let img = RgbaImage::new(0, 0);
        let err = process(&img, &[], &BlurConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Processing(_)));
    }

    #[test]
    fn region_changes_interior_and_leaves_exterior_untouched() {
        let img = gradient(100, 100);
        let out = process(
            &img,
            &[square_region(10, 10, 40)],
            &BlurConfig::default(),
        )
        .unwrap();

        // Padded rect per the expansion formula: (0, 0, 80, 80).
        // Ellipse center must be rewritten.
        assert_ne!(out.get_pixel(40, 40), img.get_pixel(40, 40));

        // Everything right of / below the padded rect is untouched.
        for i in 0..100 {
            assert_eq!(out.get_pixel(90, i), img.get_pixel(90, i));
            assert_eq!(out.get_pixel(i, 90), img.get_pixel(i, 90));
        }
    }

    #[test]
    fn ellipse_leaves_rect_corners_original() {
        let img = gradient(200, 200);
        let out = process(
            &img,
            &[square_region(60, 60, 60)],
            &BlurConfig::default(),
        )
        .unwrap();

        // Padded rect is (40, 40, 100, 100); its corners sit outside the
        // inscribed ellipse and must keep the source pixels.
        for &(x, y) in &[(40u32, 40u32), (139, 40), (40, 139), (139, 139)] {
            assert_eq!(out.get_pixel(x, y), img.get_pixel(x, y), "corner ({x},{y})");
        }
        assert_ne!(out.get_pixel(90, 90), img.get_pixel(90, 90));
    }

    #[test]
    fn rounded_rect_shape_fills_edge_midpoints() {
        let img = gradient(200, 200);
        let config = BlurConfig {
            shape: MaskShape::RoundedRect,
            ..BlurConfig::default()
        };
        let out = process(&img, &[square_region(60, 60, 60)], &config).unwrap();

        // Midpoint of the padded rect's top edge is inside a rounded rect
        // (it is outside an ellipse only at the corners).
        assert_ne!(out.get_pixel(90, 40), img.get_pixel(90, 40));
        // Corners are still clipped by the corner arcs.
        assert_eq!(out.get_pixel(40, 40), img.get_pixel(40, 40));
    }

    #[test]
    fn overlapping_regions_compound_sequentially() {
        let img = gradient(160, 160);
        let a = square_region(20, 20, 60);
        let b = square_region(50, 50, 60);
        let config = BlurConfig::default();

        let combined = process(&img, &[a.clone(), b.clone()], &config).unwrap();

        // Folding one region at a time over the shared canvas is exactly
        // what the combined run does.
        let staged = process(&process(&img, &[a], &config).unwrap(), &[b], &config).unwrap();
        assert_eq!(combined.as_raw(), staged.as_raw());

        // And it differs from anonymizing B against the pristine source:
        // B's input in the overlap was already anonymized by A.
        let b_only = process(&img, &[square_region(50, 50, 60)], &config).unwrap();
        let differs = (50..110u32)
            .flat_map(|y| (50..110u32).map(move |x| (x, y)))
            .any(|(x, y)| combined.get_pixel(x, y) != b_only.get_pixel(x, y));
        assert!(differs, "overlap shows no compounding");
    }

    #[test]
    fn process_is_deterministic() {
        let img = gradient(120, 120);
        let regions = [square_region(30, 30, 50)];
        let config = BlurConfig::default();
        let a = process(&img, &regions, &config).unwrap();
        let b = process(&img, &regions, &config).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn decode_failure_surfaces_as_decode_error() {
        let err = anonymize_bytes(b"not an image", &[], &BlurConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Decode(_)));
    }
}
