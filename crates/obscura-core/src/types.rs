use serde::{Deserialize, Serialize};

/// A single polygon vertex as reported by the face detector.
///
/// Either coordinate may be absent on the wire; an absent coordinate
/// means 0 (the detector omits zero-valued fields).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
}

impl Vertex {
    /// Resolved coordinates, with absent values mapped to 0.
    pub fn resolved(&self) -> (i32, i32) {
        (self.x.unwrap_or(0), self.y.unwrap_or(0))
    }
}

/// An ordered list of vertices outlining a detected face.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingPoly {
    #[serde(default)]
    pub vertices: Vec<Vertex>,
}

/// One face annotation from the external detector.
///
/// Only the two polygons drive processing. Confidence, landmarks, and
/// head-pose angles are carried through unmodified so callers can log or
/// display them, but the pipeline never reads them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceRegion {
    /// Sequence index assigned by the detector client, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    /// Loose box around the whole head. Fallback when the tight box is unusable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_poly: Option<BoundingPoly>,
    /// Tight box around the skin region of the face. Preferred.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fd_bounding_poly: Option<BoundingPoly>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection_confidence: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmarks: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_angle: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan_angle: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilt_angle: Option<f32>,
}

/// Axis-aligned bounding box in detector coordinates.
///
/// Produced by [`FaceRegion::bounding_box`](crate::region) before padding
/// and clamping, so it may extend outside the canvas and is kept signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// A padded, clamped rectangle guaranteed to lie within its canvas:
/// `x + width <= canvas width` and `y + height <= canvas height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Clip shape applied when pasting an anonymized tile back onto the canvas.
///
/// The wire names follow the detector-client convention: `"ellipse"` and
/// `"rectangle"`. Any other string is a deserialization error; there is no
/// silent fallback shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaskShape {
    #[default]
    #[serde(rename = "ellipse")]
    Ellipse,
    /// Rounded rectangle with corner radius `0.15 * min(width, height)`.
    #[serde(rename = "rectangle")]
    RoundedRect,
}

/// Processing configuration for one anonymization run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlurConfig {
    /// Drives both the pixelation block size and the per-pass blur strength.
    pub blur_radius: u32,
    /// Extra pixels added around each mapped bounding box.
    pub padding: u32,
    pub shape: MaskShape,
    /// Number of sequential blur passes after pixelation.
    pub blur_passes: u32,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            blur_radius: 40,
            padding: 20,
            shape: MaskShape::Ellipse,
            blur_passes: 3,
        }
    }
}
