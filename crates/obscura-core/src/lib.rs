//! obscura-core — Face-region anonymization engine.
//!
//! Consumes a decoded raster image plus externally detected face regions
//! and irreversibly obscures each region with pixelation followed by
//! multiple margin-extended blur passes, clipped to an ellipse or
//! rounded-rectangle mask and composited back without seams.

pub mod blur;
pub mod compositor;
pub mod mask;
pub mod region;
pub mod types;

pub use compositor::{anonymize_bytes, process, PipelineError};
pub use types::{BlurConfig, BoundingPoly, FaceRegion, MaskShape, PixelRect, Rect, Vertex};
