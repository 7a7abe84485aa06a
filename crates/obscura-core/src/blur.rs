//! Two-stage region anonymization: pixelation followed by repeated blur.
//!
//! Pixelation (nearest-neighbor downsample, smoothed upsample) is what
//! destroys identifying detail: many source pixels collapse into one
//! block, so nothing above the block grid survives. Averaging alone can
//! leak high-frequency edges. The blur passes afterwards only soften the
//! block boundaries so the tile composites without visible structure.
//!
//! Each blur pass samples from an enlarged copy of the tile so the
//! filter kernel never runs off the tile edge; blurring in place would
//! pull in dark fringing at the boundary and show a seam after paste-back.

use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Smallest pixelation block edge, in source pixels.
const MIN_PIXEL_SIZE: u32 = 8;
/// Smallest low-resolution dimension the downsample may produce.
const MIN_LOWRES_DIM: u32 = 4;
/// Smallest per-pass blur strength.
const MIN_BLUR_AMOUNT: u32 = 10;

/// Irreversibly obscure a region buffer.
///
/// Output has the same dimensions as `region` and is fully determined by
/// the input bytes, `radius`, and `passes`. Tiny regions are safe: the
/// low-resolution dimensions are floored at 4×4 and the block size at 8,
/// so both stages stay valid.
pub fn anonymize(region: &RgbaImage, radius: u32, passes: u32) -> RgbaImage {
    let (width, height) = region.dimensions();

    let pixel_size = (radius / 4).max(MIN_PIXEL_SIZE);
    let small_w = (width / pixel_size).max(MIN_LOWRES_DIM);
    let small_h = (height / pixel_size).max(MIN_LOWRES_DIM);

    let small = imageops::resize(region, small_w, small_h, FilterType::Nearest);
    let mut current = imageops::resize(&small, width, height, FilterType::CatmullRom);

    let blur_amount = (radius / 2).max(MIN_BLUR_AMOUNT);
    for _ in 0..passes {
        current = blur_pass(&current, blur_amount);
    }
    current
}

/// One margin-extended blur pass.
///
/// The tile is smoothly upscaled by `2 * blur_amount` pixels on every
/// side, Gaussian-blurred, and the central window cropped back out.
fn blur_pass(tile: &RgbaImage, blur_amount: u32) -> RgbaImage {
    let (width, height) = tile.dimensions();
    let margin = blur_amount * 2;

    let enlarged = imageops::resize(
        tile,
        width + 2 * margin,
        height + 2 * margin,
        FilterType::CatmullRom,
    );
    // sigma ~ radius/2 matches the visual weight of a box-radius filter
    let blurred = imageops::blur(&enlarged, blur_amount as f32 / 2.0);

    imageops::crop_imm(&blurred, margin, margin, width, height).to_image()
}
